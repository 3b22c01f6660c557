//! Token decoding: bytes → one current token at a time.
//!
//! The decoder knows nothing about nesting; see [`Reader`](super::reader::Reader)
//! for container validation.

use bytes::{Buf, Bytes};

use super::buffer::Source;
use super::encode::Element;
use super::encode::sealed::Widen;
use super::token::{Category, Code, ElementType, RealWidth, Symbol, Width};
use crate::error::BintokenError;

/// Byte ranges of the current token within the input.
#[derive(Debug, Clone, Copy)]
struct Token {
    code: Code,
    start: usize,
    payload: usize,
    end: usize,
}

impl Token {
    const fn status(code: Code, at: usize) -> Self {
        Self {
            code,
            start: at,
            payload: at,
            end: at,
        }
    }
}

/// Pull decoder positioned on one token.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    source: Source<'a>,
    current: Token,
    error: Option<BintokenError>,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder positioned on the first token of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        let mut decoder = Self {
            source: Source::new(input),
            current: Token::status(Code::End, 0),
            error: None,
        };
        decoder.next();
        decoder
    }

    /// Advances to the next token and returns its code.
    ///
    /// Once the decoder reports `Code::End` or `Code::Error` it stays there.
    pub fn next(&mut self) -> Code {
        if matches!(self.current.code, Code::Error) {
            return Code::Error;
        }
        match self.scan() {
            Ok(token) => {
                self.source.advance(token.end - token.start);
                self.current = token;
            }
            Err(e) => {
                self.current.start = self.source.position();
                self.fail(e);
            }
        }
        self.current.code
    }

    /// Puts the decoder into its terminal error state.
    pub fn fail(&mut self, error: BintokenError) {
        let at = self.current.start;
        self.current = Token::status(Code::Error, at);
        self.error = Some(error);
    }

    pub fn code(&self) -> Code {
        self.current.code
    }

    pub fn category(&self) -> Category {
        self.current.code.category()
    }

    pub fn symbol(&self) -> Symbol {
        self.current.code.symbol()
    }

    pub fn error(&self) -> Option<BintokenError> {
        self.error
    }

    /// Offset of the current token within the input.
    pub fn offset(&self) -> usize {
        self.current.start
    }

    /// Raw payload bytes of the current token, without marker or length field.
    ///
    /// For an inline small integer this is the token byte itself.
    pub fn literal(&self) -> &'a [u8] {
        self.source.slice(self.current.payload, self.current.end)
    }

    /// Every byte of the current token, including marker and length field.
    pub fn token_bytes(&self) -> &'a [u8] {
        self.source.slice(self.current.start, self.current.end)
    }

    /// Input following the current token.
    pub fn tail(&self) -> &'a [u8] {
        self.source.rest()
    }

    pub fn boolean(&self) -> Result<bool, BintokenError> {
        match self.current.code {
            Code::True => Ok(true),
            Code::False => Ok(false),
            _ => Err(self.mismatch()),
        }
    }

    /// The current integer and the width it was encoded with.
    pub fn integer(&self) -> Result<(i64, Width), BintokenError> {
        let Some(width) = self.current.code.integer_width() else {
            return Err(self.mismatch());
        };
        let mut payload = self.literal();
        let value = match self.current.code {
            Code::SmallInt | Code::Int8 => i64::from(payload.get_i8()),
            Code::Int16 => i64::from(payload.get_i16_le()),
            Code::Int32 => i64::from(payload.get_i32_le()),
            _ => payload.get_i64_le(),
        };
        Ok((value, width))
    }

    /// The current real and the width it was encoded with.
    pub fn real(&self) -> Result<(f64, RealWidth), BintokenError> {
        let mut payload = self.literal();
        match self.current.code {
            Code::Float32 => Ok((f64::from(payload.get_f32_le()), RealWidth::W32)),
            Code::Float64 => Ok((payload.get_f64_le(), RealWidth::W64)),
            _ => Err(self.mismatch()),
        }
    }

    /// The current real as `f32`, bit for bit. A 64-bit real fails with `Overflow`.
    pub fn real32(&self) -> Result<f32, BintokenError> {
        match self.current.code {
            Code::Float32 => Ok(self.literal().get_f32_le()),
            Code::Float64 => Err(BintokenError::Overflow),
            _ => Err(self.mismatch()),
        }
    }

    /// The raw bytes of the current string token. Not validated as UTF-8.
    pub fn string(&self) -> Result<&'a [u8], BintokenError> {
        match self.current.code.symbol() {
            Symbol::String => Ok(self.literal()),
            _ => Err(self.mismatch()),
        }
    }

    pub fn binary(&self) -> Result<&'a [u8], BintokenError> {
        match self.current.code.symbol() {
            Symbol::Binary => Ok(self.literal()),
            _ => Err(self.mismatch()),
        }
    }

    /// Element type and packed payload of the current compact array.
    pub fn compact_array(&self) -> Result<(ElementType, &'a [u8]), BintokenError> {
        match self.current.code {
            Code::CompactArray { element, .. } => Ok((element, self.literal())),
            _ => Err(self.mismatch()),
        }
    }

    /// Decodes the current token as `T`.
    pub fn value<T: FromToken<'a>>(&self) -> Result<T, BintokenError> {
        T::from_token(self)
    }

    /// The error to report when the current token has the wrong category.
    fn mismatch(&self) -> BintokenError {
        match self.current.code {
            Code::Error => self.error.unwrap_or(BintokenError::UnexpectedToken),
            _ => BintokenError::IncompatibleType,
        }
    }

    /// Measures the token at the cursor without consuming it.
    fn scan(&self) -> Result<Token, BintokenError> {
        let start = self.source.position();
        let Some(byte) = self.source.peek_byte() else {
            return Ok(Token::status(Code::End, start));
        };
        let code = Code::from_byte(byte).ok_or(BintokenError::UnexpectedToken)?;

        if code == Code::SmallInt {
            return Ok(Token {
                code,
                start,
                payload: start,
                end: start + 1,
            });
        }

        let (payload_start, payload_len) = match (code.fixed_payload(), code.length_width()) {
            (Some(len), _) => (start + 1, len),
            (None, Some(width)) => {
                let field = self
                    .source
                    .peek_slice(1 + width.bytes())
                    .ok_or(BintokenError::InvalidLength)?;
                let len = read_length(&field[1..]);
                let len = usize::try_from(len).map_err(|_| BintokenError::InvalidLength)?;
                if let Code::CompactArray { element, .. } = code {
                    if len % element.size() != 0 {
                        return Err(BintokenError::InvalidLength);
                    }
                }
                (start + 1 + width.bytes(), len)
            }
            (None, None) => return Err(BintokenError::UnexpectedToken),
        };

        let header_len = payload_start - start;
        let total = header_len
            .checked_add(payload_len)
            .ok_or(BintokenError::InvalidLength)?;
        if self.source.remaining() < total {
            return Err(BintokenError::InvalidLength);
        }
        Ok(Token {
            code,
            start,
            payload: payload_start,
            end: start + total,
        })
    }
}

/// Reads a little-endian unsigned length field of 1, 2, 4 or 8 bytes.
fn read_length(mut field: &[u8]) -> u64 {
    match field.len() {
        1 => u64::from(field.get_u8()),
        2 => u64::from(field.get_u16_le()),
        4 => u64::from(field.get_u32_le()),
        _ => field.get_u64_le(),
    }
}

/// Reads one packed integer element.
pub(crate) fn read_integer(element: ElementType, mut bytes: &[u8]) -> i64 {
    match element {
        ElementType::Int8 => i64::from(bytes.get_i8()),
        ElementType::Int16 => i64::from(bytes.get_i16_le()),
        ElementType::Int32 => i64::from(bytes.get_i32_le()),
        _ => bytes.get_i64_le(),
    }
}

/// Reads one packed real element.
pub(crate) fn read_real(element: ElementType, mut bytes: &[u8]) -> f64 {
    match element {
        ElementType::Float32 => f64::from(bytes.get_f32_le()),
        _ => bytes.get_f64_le(),
    }
}

/// A native type that can be decoded from the current token.
///
/// Integers and reals widen losslessly from any narrower encoding; asking
/// for a width narrower than the encoded one fails with `Overflow`, and
/// asking for the wrong category fails with `IncompatibleType`.
pub trait FromToken<'a>: Sized {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError>;
}

impl<'a> FromToken<'a> for () {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
        match decoder.code() {
            Code::Null => Ok(()),
            _ => Err(decoder.mismatch()),
        }
    }
}

impl<'a> FromToken<'a> for bool {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
        decoder.boolean()
    }
}

macro_rules! impl_from_token_integer {
    ($($ty:ty => $width:ident),*) => {
        $(
            impl<'a> FromToken<'a> for $ty {
                fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
                    let (value, width) = decoder.integer()?;
                    if width > Width::$width {
                        return Err(BintokenError::Overflow);
                    }
                    <$ty>::try_from(value).map_err(|_| BintokenError::Overflow)
                }
            }
        )*
    };
}

impl_from_token_integer!(i8 => W8, i16 => W16, i32 => W32, i64 => W64);

impl<'a> FromToken<'a> for f32 {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
        decoder.real32()
    }
}

impl<'a> FromToken<'a> for f64 {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
        decoder.real().map(|(value, _)| value)
    }
}

impl<'a> FromToken<'a> for &'a str {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
        std::str::from_utf8(decoder.string()?).map_err(|_| BintokenError::InvalidValue)
    }
}

impl<'a> FromToken<'a> for String {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
        <&str>::from_token(decoder).map(str::to_owned)
    }
}

impl<'a> FromToken<'a> for &'a [u8] {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
        decoder.binary()
    }
}

impl<'a> FromToken<'a> for Bytes {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
        decoder.binary().map(Bytes::copy_from_slice)
    }
}

impl<'a, T: FromToken<'a>> FromToken<'a> for Option<T> {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
        match decoder.code() {
            Code::Null => Ok(None),
            _ => T::from_token(decoder).map(Some),
        }
    }
}

impl<'a, E: Element> FromToken<'a> for Vec<E> {
    fn from_token(decoder: &Decoder<'a>) -> Result<Self, BintokenError> {
        let (element, payload) = decoder.compact_array()?;
        let chunks = payload.chunks_exact(element.size());
        if element == E::TYPE {
            return Ok(chunks.map(|mut c| E::get_le(&mut c)).collect());
        }
        match (E::TYPE.integer_width(), element.integer_width()) {
            (Some(wanted), Some(encoded)) if encoded > wanted => Err(BintokenError::Overflow),
            (Some(_), Some(_)) => chunks
                .map(|c| E::widen_integer(read_integer(element, c)).ok_or(BintokenError::Overflow))
                .collect(),
            (None, None) if element.real_width() > E::TYPE.real_width() => Err(BintokenError::Overflow),
            (None, None) => chunks
                .map(|c| E::widen_real(read_real(element, c)).ok_or(BintokenError::Overflow))
                .collect(),
            _ => Err(BintokenError::IncompatibleType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bintoken::marker;

    #[test]
    fn decode_empty_input() {
        let decoder = Decoder::new(&[]);
        assert_eq!(decoder.code(), Code::End);
        assert_eq!(decoder.error(), None);
    }

    #[test]
    fn decode_scalars_in_sequence() {
        let data = [marker::NULL, marker::TRUE, 0x02, marker::FALSE];
        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.code(), Code::Null);
        assert_eq!(decoder.next(), Code::True);
        assert!(decoder.boolean().unwrap());
        assert_eq!(decoder.next(), Code::SmallInt);
        assert_eq!(decoder.integer().unwrap(), (2, Width::W8));
        assert_eq!(decoder.next(), Code::False);
        assert_eq!(decoder.next(), Code::End);
        assert_eq!(decoder.next(), Code::End);
    }

    #[test]
    fn decode_negative_small_int() {
        let decoder = Decoder::new(&[0xE0]);
        assert_eq!(decoder.value::<i8>().unwrap(), -32);
        assert_eq!(decoder.literal(), &[0xE0]);
    }

    #[test]
    fn decode_integer_widths() {
        let data = [marker::INT_16, 0x05, 0x00];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.integer().unwrap(), (5, Width::W16));
        assert_eq!(decoder.literal(), &[0x05, 0x00]);
        assert_eq!(decoder.token_bytes(), &data);
    }

    #[test]
    fn narrower_request_overflows() {
        let data = [marker::INT_32, 0x70, 0x11, 0x01, 0x00];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.value::<i32>().unwrap(), 70000);
        assert_eq!(decoder.value::<i64>().unwrap(), 70000);
        assert_eq!(decoder.value::<i8>(), Err(BintokenError::Overflow));
        assert_eq!(decoder.value::<i16>(), Err(BintokenError::Overflow));
    }

    #[test]
    fn narrower_request_overflows_even_when_value_fits() {
        let data = [marker::INT_16, 0x05, 0x00];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.value::<i8>(), Err(BintokenError::Overflow));
    }

    #[test]
    fn category_mismatch_is_incompatible() {
        let decoder = Decoder::new(&[0x01]);
        assert_eq!(decoder.value::<bool>(), Err(BintokenError::IncompatibleType));
        assert_eq!(decoder.value::<f64>(), Err(BintokenError::IncompatibleType));
        assert_eq!(decoder.value::<String>(), Err(BintokenError::IncompatibleType));
        assert_eq!(decoder.value::<()>(), Err(BintokenError::IncompatibleType));
    }

    #[test]
    fn decode_reals() {
        let data = [marker::FLOAT_32, 0x00, 0x00, 0x40, 0x40];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.value::<f32>().unwrap(), 3.0);
        assert_eq!(decoder.value::<f64>().unwrap(), 3.0);

        let mut data = vec![marker::FLOAT_64];
        data.extend_from_slice(&2.5f64.to_le_bytes());
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.real().unwrap(), (2.5, RealWidth::W64));
        assert_eq!(decoder.value::<f32>(), Err(BintokenError::Overflow));
    }

    #[test]
    fn decode_strings_and_binary() {
        let data = [marker::STRING_8, 0x03, b'A', b'B', b'C', marker::BINARY_8, 0x01, 0xFF];
        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.value::<&str>().unwrap(), "ABC");
        assert_eq!(decoder.value::<&[u8]>(), Err(BintokenError::IncompatibleType));
        decoder.next();
        assert_eq!(decoder.value::<Bytes>().unwrap(), Bytes::from_static(&[0xFF]));
        assert_eq!(decoder.value::<String>(), Err(BintokenError::IncompatibleType));
    }

    #[test]
    fn invalid_utf8_string_is_invalid_value() {
        let data = [marker::STRING_8, 0x01, 0xFF];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.string().unwrap(), &[0xFF]);
        assert_eq!(decoder.value::<String>(), Err(BintokenError::InvalidValue));
    }

    #[test]
    fn decode_optional() {
        let data = [marker::NULL, 0x07];
        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.value::<Option<i32>>().unwrap(), None);
        decoder.next();
        assert_eq!(decoder.value::<Option<i32>>().unwrap(), Some(7));
    }

    #[test]
    fn decode_compact_arrays() {
        let data = [marker::ARRAY8_INT16, 0x04, 0x01, 0x00, 0xFF, 0xFF];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.value::<Vec<i16>>().unwrap(), vec![1, -1]);
        assert_eq!(decoder.value::<Vec<i64>>().unwrap(), vec![1, -1]);
        assert_eq!(decoder.value::<Vec<i8>>(), Err(BintokenError::Overflow));
        assert_eq!(decoder.value::<Vec<f64>>(), Err(BintokenError::IncompatibleType));
        assert_eq!(decoder.literal(), &[0x01, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn compact_array_length_must_be_whole_elements() {
        let data = [marker::ARRAY8_INT32, 0x03, 0x00, 0x00, 0x00];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.code(), Code::Error);
        assert_eq!(decoder.error(), Some(BintokenError::InvalidLength));
    }

    #[test]
    fn truncated_payload_is_invalid_length() {
        let data = [marker::INT_32, 0x01, 0x02];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.code(), Code::Error);
        assert_eq!(decoder.error(), Some(BintokenError::InvalidLength));

        let data = [marker::STRING_16, 0x01];
        assert_eq!(Decoder::new(&data).error(), Some(BintokenError::InvalidLength));

        let data = [marker::STRING_8, 0x05, b'a'];
        assert_eq!(Decoder::new(&data).error(), Some(BintokenError::InvalidLength));
    }

    #[test]
    fn unassigned_marker_is_unexpected() {
        let mut decoder = Decoder::new(&[0x00, 0xC5]);
        assert_eq!(decoder.next(), Code::Error);
        assert_eq!(decoder.error(), Some(BintokenError::UnexpectedToken));
        assert_eq!(decoder.next(), Code::Error);
        assert_eq!(decoder.value::<i8>(), Err(BintokenError::UnexpectedToken));
    }

    #[test]
    fn decode_wide_length_fields() {
        let mut data = vec![marker::BINARY_16, 0x00, 0x01];
        data.extend_from_slice(&[0x5A; 256]);
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.binary().unwrap().len(), 256);
        assert_eq!(decoder.value::<&str>(), Err(BintokenError::IncompatibleType));

        let mut data = vec![marker::STRING_16, 0xFF, 0xFF];
        data.extend_from_slice(&[b'z'; 65535]);
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.value::<&str>().unwrap().len(), 65535);

        let mut data = vec![marker::BINARY_32, 0x00, 0x00, 0x01, 0x00];
        data.extend_from_slice(&[0x5A; 65536]);
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.binary().unwrap().len(), 65536);
        assert_eq!(decoder.token_bytes().len(), 5 + 65536);

        let mut data = vec![marker::STRING_32, 0x02, 0x00, 0x00, 0x00, b'o', b'k'];
        data.push(marker::TRUE);
        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.value::<&str>().unwrap(), "ok");
        assert_eq!(decoder.next(), Code::True);
    }

    #[test]
    fn decode_64_bit_length_fields() {
        let data = [marker::STRING_64, 0x03, 0, 0, 0, 0, 0, 0, 0, b'a', b'b', b'c'];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.code().length_width(), Some(Width::W64));
        assert_eq!(decoder.value::<&str>().unwrap(), "abc");

        let data = [marker::BINARY_64, 0x01, 0, 0, 0, 0, 0, 0, 0, 0xEE];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.symbol(), Symbol::Binary);
        assert_eq!(decoder.binary().unwrap(), &[0xEE]);

        // A length beyond the input is truncation, not an allocation.
        let data = [marker::BINARY_64, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F, 0x00];
        assert_eq!(Decoder::new(&data).error(), Some(BintokenError::InvalidLength));
        let data = [marker::STRING_64, 0x01, 0, 0, 0];
        assert_eq!(Decoder::new(&data).error(), Some(BintokenError::InvalidLength));
    }

    #[test]
    fn real32_keeps_bits() {
        let bits = 0x7F80_0001u32;
        let mut data = vec![marker::FLOAT_32];
        data.extend_from_slice(&bits.to_le_bytes());
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.real32().map(f32::to_bits), Ok(bits));
        assert_eq!(decoder.value::<f32>().map(f32::to_bits), Ok(bits));

        let mut data = vec![marker::FLOAT_64];
        data.extend_from_slice(&1.5f64.to_le_bytes());
        assert_eq!(Decoder::new(&data).real32(), Err(BintokenError::Overflow));
        assert_eq!(Decoder::new(&[0x01]).real32(), Err(BintokenError::IncompatibleType));
    }

    #[test]
    fn compact_array_widening() {
        let data = [marker::ARRAY8_FLOAT32, 0x04, 0x00, 0x00, 0xC0, 0x3F];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.value::<Vec<f32>>().unwrap(), vec![1.5]);
        assert_eq!(decoder.value::<Vec<f64>>().unwrap(), vec![1.5]);
        assert_eq!(decoder.value::<Vec<i32>>(), Err(BintokenError::IncompatibleType));

        let data = [marker::ARRAY8_INT8, 0x02, 0x80, 0x7F];
        let decoder = Decoder::new(&data);
        assert_eq!(decoder.value::<Vec<i8>>().unwrap(), vec![-128, 127]);
        assert_eq!(decoder.value::<Vec<i32>>().unwrap(), vec![-128, 127]);
    }
}
