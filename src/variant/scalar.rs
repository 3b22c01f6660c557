//! Scalar payloads that carry a width or encoding tag.

use std::fmt;

use crate::bintoken::token::{RealWidth, Width};
use crate::error::BintokenError;

/// A signed integer with the width it was created or parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    value: i64,
    width: Width,
}

impl Integer {
    /// Creates an integer tagged with the narrowest width that holds `value`.
    pub fn new(value: i64) -> Self {
        Self {
            value,
            width: Width::of_integer(value),
        }
    }

    /// Creates an integer with an explicit width.
    pub fn with_width(value: i64, width: Width) -> Result<Self, BintokenError> {
        if !width.holds(value) {
            return Err(BintokenError::Overflow);
        }
        Ok(Self { value, width })
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn width(&self) -> Width {
        self.width
    }

    /// Replaces the value, keeping the width.
    pub fn set(&mut self, value: i64) -> Result<(), BintokenError> {
        if !self.width.holds(value) {
            return Err(BintokenError::Overflow);
        }
        self.value = value;
        Ok(())
    }
}

/// A real number with the precision it was created or parsed with.
///
/// 32-bit reals keep their `f32` bit pattern, so NaN payloads survive a
/// round trip through the wire format unchanged.
#[derive(Clone, Copy)]
pub struct Real {
    bits: u64,
    width: RealWidth,
}

impl Real {
    pub fn new32(value: f32) -> Self {
        Self {
            bits: u64::from(value.to_bits()),
            width: RealWidth::W32,
        }
    }

    pub fn new64(value: f64) -> Self {
        Self {
            bits: value.to_bits(),
            width: RealWidth::W64,
        }
    }

    /// A real that originated from a type wider than 64 bits.
    ///
    /// Only the 64-bit approximation is stored, and the wire format rejects it.
    pub fn extended(value: f64) -> Self {
        Self {
            bits: value.to_bits(),
            width: RealWidth::Extended,
        }
    }

    pub fn value(&self) -> f64 {
        match self.width {
            RealWidth::W32 => f64::from(self.as_f32()),
            _ => f64::from_bits(self.bits),
        }
    }

    /// The value as `f32`; exact for 32-bit reals, rounded otherwise.
    pub fn as_f32(&self) -> f32 {
        match self.width {
            RealWidth::W32 => f32::from_bits(self.bits as u32),
            _ => f64::from_bits(self.bits) as f32,
        }
    }

    pub fn width(&self) -> RealWidth {
        self.width
    }

    /// Replaces the value, keeping the width. 32-bit reals round to `f32`.
    pub fn set(&mut self, value: f64) {
        self.bits = match self.width {
            RealWidth::W32 => u64::from((value as f32).to_bits()),
            _ => value.to_bits(),
        };
    }
}

impl fmt::Debug for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Real")
            .field("value", &self.value())
            .field("width", &self.width)
            .finish()
    }
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.value() == other.value()
    }
}

/// Encoding of the bytes held by a [`Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Encoding {
    /// UTF-8 text; the wire string type.
    Utf8,
    /// Uninterpreted bytes; the wire binary type.
    Binary,
    /// UTF-16 code units, little-endian. Not representable on the wire.
    Utf16,
    /// UTF-32 code units, little-endian. Not representable on the wire.
    Utf32,
}

/// A string-family value: bytes plus their encoding.
///
/// UTF-8 content is not validated; the wire format carries raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Text {
    bytes: Vec<u8>,
    encoding: Encoding,
}

impl Text {
    pub fn new(encoding: Encoding, bytes: Vec<u8>) -> Self {
        Self { bytes, encoding }
    }

    pub fn utf8(value: impl Into<String>) -> Self {
        Self::new(Encoding::Utf8, value.into().into_bytes())
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Encoding::Binary, bytes.into())
    }

    pub fn utf16(units: &[u16]) -> Self {
        let bytes = units.iter().flat_map(|u| u.to_le_bytes()).collect();
        Self::new(Encoding::Utf16, bytes)
    }

    pub fn utf32(chars: &[char]) -> Self {
        let bytes = chars.iter().flat_map(|&c| u32::from(c).to_le_bytes()).collect();
        Self::new(Encoding::Utf32, bytes)
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The content as `&str`, if it is valid UTF-8 text.
    pub fn as_str(&self) -> Option<&str> {
        match self.encoding {
            Encoding::Utf8 => std::str::from_utf8(&self.bytes).ok(),
            _ => None,
        }
    }

    /// Decodes the content as text, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> String {
        match self.encoding {
            Encoding::Utf8 | Encoding::Binary => String::from_utf8_lossy(&self.bytes).into_owned(),
            Encoding::Utf16 => {
                let units: Vec<u16> = self
                    .bytes
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
            Encoding::Utf32 => self
                .bytes
                .chunks_exact(4)
                .map(|c| {
                    char::from_u32(u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                        .unwrap_or(char::REPLACEMENT_CHARACTER)
                })
                .collect(),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Empties the content, keeping the encoding.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_records_narrowest_width() {
        assert_eq!(Integer::new(2).width(), Width::W8);
        assert_eq!(Integer::new(-129).width(), Width::W16);
        assert_eq!(Integer::new(70000).width(), Width::W32);
        assert_eq!(Integer::new(i64::MIN).width(), Width::W64);
    }

    #[test]
    fn integer_explicit_width() {
        let i = Integer::with_width(5, Width::W16).unwrap();
        assert_eq!((i.value(), i.width()), (5, Width::W16));
        assert_eq!(Integer::with_width(300, Width::W8), Err(BintokenError::Overflow));
    }

    #[test]
    fn integer_set_keeps_width() {
        let mut i = Integer::with_width(1, Width::W16).unwrap();
        i.set(2).unwrap();
        assert_eq!((i.value(), i.width()), (2, Width::W16));
        assert_eq!(i.set(1 << 20), Err(BintokenError::Overflow));
        assert_eq!(i.value(), 2);
    }

    #[test]
    fn real_set_keeps_precision() {
        let mut r = Real::new32(1.0);
        r.set(0.1);
        assert_eq!(r.value(), f64::from(0.1f32));
        assert_eq!(r.width(), RealWidth::W32);
    }

    #[test]
    fn real32_keeps_nan_payload() {
        let quiet = f32::from_bits(0x7FC0_1234);
        let signalling = f32::from_bits(0x7F80_0001);
        assert_eq!(Real::new32(quiet).as_f32().to_bits(), 0x7FC0_1234);
        assert_eq!(Real::new32(signalling).as_f32().to_bits(), 0x7F80_0001);
        assert!(Real::new32(signalling).value().is_nan());
        assert_eq!(Real::new32(-0.0).as_f32().to_bits(), (-0.0f32).to_bits());
    }

    #[test]
    fn real_equality_uses_value_and_width() {
        assert_eq!(Real::new32(0.5), Real::new32(0.5));
        assert_ne!(Real::new32(0.5), Real::new64(0.5));
        assert_ne!(Real::new64(f64::NAN), Real::new64(f64::NAN));
    }

    #[test]
    fn text_encodings() {
        let t = Text::utf8("héllo");
        assert_eq!(t.as_str(), Some("héllo"));
        assert_eq!(t.len(), 6);

        let w = Text::utf16(&[0x0041, 0x0042]);
        assert_eq!(w.as_bytes(), &[0x41, 0x00, 0x42, 0x00]);
        assert_eq!(w.as_str(), None);
        assert_eq!(w.to_string_lossy(), "AB");

        let u = Text::utf32(&['x']);
        assert_eq!(u.to_string_lossy(), "x");
    }

    #[test]
    fn text_clear_keeps_encoding() {
        let mut t = Text::binary(vec![1, 2, 3]);
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.encoding(), Encoding::Binary);
    }
}
