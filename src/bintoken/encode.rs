//! Token encoding: native values → bytes.
//!
//! Every operation is atomic: it either writes the complete token and
//! returns its length, or writes nothing and returns 0.

use bytes::{Buf, BufMut};

use super::buffer::Sink;
use super::marker;
use super::token::{Code, Container, ElementType, Width};

/// Stateless token encoder over a sink.
#[derive(Debug, Default)]
pub struct Encoder<S> {
    sink: S,
}

impl<S: Sink> Encoder<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    pub fn null(&mut self) -> usize {
        self.marker(marker::NULL)
    }

    pub fn boolean(&mut self, value: bool) -> usize {
        self.marker(if value { marker::TRUE } else { marker::FALSE })
    }

    /// Encodes an integer using the smallest representation.
    pub fn integer(&mut self, value: i64) -> usize {
        match Width::of_integer(value) {
            Width::W8 => self.int8(value as i8),
            Width::W16 => self.int16(value as i16),
            Width::W32 => self.int32(value as i32),
            Width::W64 => self.int64(value),
        }
    }

    /// Encodes an integer at `width`. Returns 0 if the value does not fit.
    pub fn integer_as(&mut self, value: i64, width: Width) -> usize {
        match width {
            Width::W8 => i8::try_from(value).map_or(0, |v| self.int8(v)),
            Width::W16 => i16::try_from(value).map_or(0, |v| self.int16(v)),
            Width::W32 => i32::try_from(value).map_or(0, |v| self.int32(v)),
            Width::W64 => self.int64(value),
        }
    }

    /// Encodes an 8-bit integer, inline when it lies in -32..=127.
    pub fn int8(&mut self, value: i8) -> usize {
        if (marker::SMALL_INT_MIN..=marker::SMALL_INT_MAX).contains(&i64::from(value)) {
            self.marker(value as u8)
        } else {
            self.fixed(marker::INT_8, 1, |buf| buf.put_i8(value))
        }
    }

    pub fn int16(&mut self, value: i16) -> usize {
        self.fixed(marker::INT_16, 2, |buf| buf.put_i16_le(value))
    }

    pub fn int32(&mut self, value: i32) -> usize {
        self.fixed(marker::INT_32, 4, |buf| buf.put_i32_le(value))
    }

    pub fn int64(&mut self, value: i64) -> usize {
        self.fixed(marker::INT_64, 8, |buf| buf.put_i64_le(value))
    }

    pub fn real32(&mut self, value: f32) -> usize {
        self.fixed(marker::FLOAT_32, 4, |buf| buf.put_f32_le(value))
    }

    pub fn real64(&mut self, value: f64) -> usize {
        self.fixed(marker::FLOAT_64, 8, |buf| buf.put_f64_le(value))
    }

    /// Encodes a string. The bytes are written as-is, without validation.
    pub fn string(&mut self, value: &[u8]) -> usize {
        let code = Code::string(Width::of_length(value.len()));
        self.length_prefixed(code, value.len(), |buf| buf.put_slice(value))
    }

    pub fn binary(&mut self, value: &[u8]) -> usize {
        let code = Code::binary(Width::of_length(value.len()));
        self.length_prefixed(code, value.len(), |buf| buf.put_slice(value))
    }

    /// Encodes a homogeneous numeric array as one compact array token.
    pub fn array<T: Element>(&mut self, values: &[T]) -> usize {
        let Some(payload) = values.len().checked_mul(T::TYPE.size()) else {
            return 0;
        };
        let code = Code::CompactArray {
            element: T::TYPE,
            length: Width::of_length(payload),
        };
        self.length_prefixed(code, payload, |buf| {
            for &value in values {
                value.put_le(buf);
            }
        })
    }

    /// Encodes a begin or end marker. Returns 0 for non-structural codes.
    pub fn structural(&mut self, code: Code) -> usize {
        if code.opens().is_none() && code.closes().is_none() {
            return 0;
        }
        code.marker().map_or(0, |byte| self.marker(byte))
    }

    pub fn begin(&mut self, container: Container) -> usize {
        self.structural(container.begin_code())
    }

    pub fn end(&mut self, container: Container) -> usize {
        self.structural(container.end_code())
    }

    /// Writes pre-encoded token bytes verbatim.
    pub fn literal(&mut self, bytes: &[u8]) -> usize {
        if self.sink.remaining_mut() < bytes.len() {
            return 0;
        }
        self.sink.put_slice(bytes);
        bytes.len()
    }

    fn marker(&mut self, byte: u8) -> usize {
        self.fixed(byte, 0, |_| {})
    }

    /// A marker byte followed by a payload of exactly `size` bytes.
    fn fixed(&mut self, marker: u8, size: usize, payload: impl FnOnce(&mut S)) -> usize {
        let total = 1 + size;
        if self.sink.remaining_mut() < total {
            return 0;
        }
        self.sink.put_u8(marker);
        payload(&mut self.sink);
        total
    }

    /// A marker byte, a little-endian length field and `len` payload bytes.
    fn length_prefixed(&mut self, code: Code, len: usize, payload: impl FnOnce(&mut S)) -> usize {
        let (Some(marker), Some(width)) = (code.marker(), code.length_width()) else {
            return 0;
        };
        let Some(total) = len.checked_add(1 + width.bytes()) else {
            return 0;
        };
        if self.sink.remaining_mut() < total {
            return 0;
        }
        self.sink.put_u8(marker);
        self.sink.put_uint_le(len as u64, width.bytes());
        payload(&mut self.sink);
        total
    }
}

pub(crate) mod sealed {
    /// Checked conversions from a compact array element of another type.
    ///
    /// Only lossless widenings succeed; anything else yields `None`.
    pub trait Widen: Sized {
        fn widen_integer(value: i64) -> Option<Self>;

        fn widen_real(value: f64) -> Option<Self>;
    }
}

/// A numeric type that can be packed into a compact array.
pub trait Element: Copy + sealed::Widen {
    const TYPE: ElementType;

    fn put_le<B: BufMut + ?Sized>(self, buf: &mut B);

    /// Reads one element from the next `TYPE.size()` little-endian bytes.
    fn get_le<B: Buf>(buf: &mut B) -> Self;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident, $put:ident, $get:ident) => {
        impl Element for $ty {
            const TYPE: ElementType = ElementType::$variant;

            fn put_le<B: BufMut + ?Sized>(self, buf: &mut B) {
                buf.$put(self);
            }

            fn get_le<B: Buf>(buf: &mut B) -> Self {
                buf.$get()
            }
        }
    };
}

impl_element!(i8, Int8, put_i8, get_i8);
impl_element!(i16, Int16, put_i16_le, get_i16_le);
impl_element!(i32, Int32, put_i32_le, get_i32_le);
impl_element!(i64, Int64, put_i64_le, get_i64_le);
impl_element!(f32, Float32, put_f32_le, get_f32_le);
impl_element!(f64, Float64, put_f64_le, get_f64_le);

macro_rules! impl_widen_integer {
    ($($ty:ty),*) => {
        $(
            impl sealed::Widen for $ty {
                fn widen_integer(value: i64) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }

                fn widen_real(_: f64) -> Option<Self> {
                    None
                }
            }
        )*
    };
}

impl_widen_integer!(i8, i16, i32, i64);

impl sealed::Widen for f32 {
    fn widen_integer(_: i64) -> Option<Self> {
        None
    }

    // f32 is the narrowest real, so nothing widens into it.
    fn widen_real(_: f64) -> Option<Self> {
        None
    }
}

impl sealed::Widen for f64 {
    fn widen_integer(_: i64) -> Option<Self> {
        None
    }

    fn widen_real(value: f64) -> Option<Self> {
        Some(value)
    }
}

/// A native value with a direct token encoding.
pub trait Encode {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize;
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
        (**self).encode(encoder)
    }
}

impl Encode for () {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
        encoder.null()
    }
}

impl Encode for bool {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
        encoder.boolean(*self)
    }
}

macro_rules! impl_encode_integer {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
                    encoder.integer(i64::from(*self))
                }
            }
        )*
    };
}

impl_encode_integer!(i8, i16, i32, i64, u8, u16, u32);

impl Encode for f32 {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
        encoder.real32(*self)
    }
}

impl Encode for f64 {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
        encoder.real64(*self)
    }
}

impl Encode for str {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
        encoder.string(self.as_bytes())
    }
}

impl Encode for String {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
        encoder.string(self.as_bytes())
    }
}

impl Encode for [u8] {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
        encoder.binary(self)
    }
}

impl Encode for Vec<u8> {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
        encoder.binary(self)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<S: Sink>(&self, encoder: &mut Encoder<S>) -> usize {
        match self {
            Some(value) => value.encode(encoder),
            None => encoder.null(),
        }
    }
}
