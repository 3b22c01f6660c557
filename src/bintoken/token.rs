//! Token catalog: wire codes, their categories and coarse symbols.

use super::marker;
use crate::error::BintokenError;

/// Width of an integer payload or of a length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    /// Number of bytes occupied on the wire.
    pub const fn bytes(self) -> usize {
        match self {
            Self::W8 => 1,
            Self::W16 => 2,
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }

    /// Narrowest signed width that holds `value`.
    pub fn of_integer(value: i64) -> Self {
        if i8::try_from(value).is_ok() {
            Self::W8
        } else if i16::try_from(value).is_ok() {
            Self::W16
        } else if i32::try_from(value).is_ok() {
            Self::W32
        } else {
            Self::W64
        }
    }

    /// Narrowest unsigned length field that holds `len`.
    pub fn of_length(len: usize) -> Self {
        let len = len as u64;
        if len <= u64::from(u8::MAX) {
            Self::W8
        } else if len <= u64::from(u16::MAX) {
            Self::W16
        } else if len <= u64::from(u32::MAX) {
            Self::W32
        } else {
            Self::W64
        }
    }

    /// Returns true if `value` is representable as a signed integer of this width.
    pub fn holds(self, value: i64) -> bool {
        Self::of_integer(value) <= self
    }

    const fn index(self) -> u8 {
        match self {
            Self::W8 => 0,
            Self::W16 => 1,
            Self::W32 => 2,
            Self::W64 => 3,
        }
    }

    const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Self::W8,
            1 => Self::W16,
            2 => Self::W32,
            _ => Self::W64,
        }
    }
}

/// Width of a real number.
///
/// `Extended` is wider than 64 bits and has no wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RealWidth {
    W32,
    W64,
    Extended,
}

/// Element type of a compact array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl ElementType {
    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 | Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
        }
    }

    /// Integer width of the elements, if they are integers.
    pub const fn integer_width(self) -> Option<Width> {
        match self {
            Self::Int8 => Some(Width::W8),
            Self::Int16 => Some(Width::W16),
            Self::Int32 => Some(Width::W32),
            Self::Int64 => Some(Width::W64),
            Self::Float32 | Self::Float64 => None,
        }
    }

    /// Real width of the elements, if they are reals.
    pub const fn real_width(self) -> Option<RealWidth> {
        match self {
            Self::Float32 => Some(RealWidth::W32),
            Self::Float64 => Some(RealWidth::W64),
            _ => None,
        }
    }

    const fn index(self) -> u8 {
        match self {
            Self::Int8 => 0,
            Self::Int16 => 1,
            Self::Int32 => 2,
            Self::Int64 => 3,
            Self::Float32 => 4,
            Self::Float64 => 5,
        }
    }

    const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Int8),
            1 => Some(Self::Int16),
            2 => Some(Self::Int32),
            3 => Some(Self::Int64),
            4 => Some(Self::Float32),
            5 => Some(Self::Float64),
            _ => None,
        }
    }
}

/// Kind of a nested container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Record,
    Array,
    AssocArray,
}

impl Container {
    pub const fn begin_code(self) -> Code {
        match self {
            Self::Record => Code::BeginRecord,
            Self::Array => Code::BeginArray,
            Self::AssocArray => Code::BeginAssocArray,
        }
    }

    pub const fn end_code(self) -> Code {
        match self {
            Self::Record => Code::EndRecord,
            Self::Array => Code::EndArray,
            Self::AssocArray => Code::EndAssocArray,
        }
    }

    /// The error reported when input ends while this container is open.
    pub const fn missing_end(self) -> BintokenError {
        match self {
            Self::Record => BintokenError::ExpectedEndRecord,
            Self::Array => BintokenError::ExpectedEndArray,
            Self::AssocArray => BintokenError::ExpectedEndAssocArray,
        }
    }
}

/// Coarse classification of a token code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// End of input or error.
    Status,
    Nullable,
    Data,
    Structural,
}

/// Coarse token type, independent of encoded width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    End,
    Error,
    Null,
    Boolean,
    Integer,
    Real,
    String,
    Binary,
    CompactArray,
    BeginRecord,
    EndRecord,
    BeginArray,
    EndArray,
    BeginAssocArray,
    EndAssocArray,
}

/// Discriminant of one wire token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// Input exhausted.
    End,
    /// Decoding failed; see the reader's error.
    Error,
    Null,
    False,
    True,
    /// Integer in -32..=127 stored as the token byte itself.
    SmallInt,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String8,
    String16,
    String32,
    String64,
    Binary8,
    Binary16,
    Binary32,
    Binary64,
    BeginRecord,
    EndRecord,
    BeginArray,
    EndArray,
    BeginAssocArray,
    EndAssocArray,
    /// Homogeneous numeric array; `length` is the width of the byte-length field.
    CompactArray { element: ElementType, length: Width },
}

impl Code {
    /// Classifies the first byte of a token. Returns `None` for unassigned markers.
    pub fn from_byte(byte: u8) -> Option<Self> {
        let code = match byte {
            0x00..=0x7F | 0xE0..=0xFF => Self::SmallInt,
            marker::NULL => Self::Null,
            marker::FALSE => Self::False,
            marker::TRUE => Self::True,
            marker::INT_8 => Self::Int8,
            marker::INT_16 => Self::Int16,
            marker::INT_32 => Self::Int32,
            marker::INT_64 => Self::Int64,
            marker::FLOAT_32 => Self::Float32,
            marker::FLOAT_64 => Self::Float64,
            marker::STRING_8 => Self::String8,
            marker::STRING_16 => Self::String16,
            marker::STRING_32 => Self::String32,
            marker::STRING_64 => Self::String64,
            marker::BINARY_8 => Self::Binary8,
            marker::BINARY_16 => Self::Binary16,
            marker::BINARY_32 => Self::Binary32,
            marker::BINARY_64 => Self::Binary64,
            marker::BEGIN_RECORD => Self::BeginRecord,
            marker::END_RECORD => Self::EndRecord,
            marker::BEGIN_ARRAY => Self::BeginArray,
            marker::END_ARRAY => Self::EndArray,
            marker::BEGIN_ASSOC_ARRAY => Self::BeginAssocArray,
            marker::END_ASSOC_ARRAY => Self::EndAssocArray,
            marker::COMPACT_ARRAY_BASE..=marker::COMPACT_ARRAY_LAST => {
                let offset = byte - marker::COMPACT_ARRAY_BASE;
                let element = ElementType::from_index(offset / 4)?;
                Self::CompactArray {
                    element,
                    length: Width::from_index(offset % 4),
                }
            }
            _ => return None,
        };
        Some(code)
    }

    /// The marker byte of this code. `SmallInt` and the status codes have none.
    pub fn marker(self) -> Option<u8> {
        let byte = match self {
            Self::End | Self::Error | Self::SmallInt => return None,
            Self::Null => marker::NULL,
            Self::False => marker::FALSE,
            Self::True => marker::TRUE,
            Self::Int8 => marker::INT_8,
            Self::Int16 => marker::INT_16,
            Self::Int32 => marker::INT_32,
            Self::Int64 => marker::INT_64,
            Self::Float32 => marker::FLOAT_32,
            Self::Float64 => marker::FLOAT_64,
            Self::String8 => marker::STRING_8,
            Self::String16 => marker::STRING_16,
            Self::String32 => marker::STRING_32,
            Self::String64 => marker::STRING_64,
            Self::Binary8 => marker::BINARY_8,
            Self::Binary16 => marker::BINARY_16,
            Self::Binary32 => marker::BINARY_32,
            Self::Binary64 => marker::BINARY_64,
            Self::BeginRecord => marker::BEGIN_RECORD,
            Self::EndRecord => marker::END_RECORD,
            Self::BeginArray => marker::BEGIN_ARRAY,
            Self::EndArray => marker::END_ARRAY,
            Self::BeginAssocArray => marker::BEGIN_ASSOC_ARRAY,
            Self::EndAssocArray => marker::END_ASSOC_ARRAY,
            Self::CompactArray { element, length } => {
                marker::COMPACT_ARRAY_BASE + element.index() * 4 + length.index()
            }
        };
        Some(byte)
    }

    pub fn string(length: Width) -> Self {
        match length {
            Width::W8 => Self::String8,
            Width::W16 => Self::String16,
            Width::W32 => Self::String32,
            Width::W64 => Self::String64,
        }
    }

    pub fn binary(length: Width) -> Self {
        match length {
            Width::W8 => Self::Binary8,
            Width::W16 => Self::Binary16,
            Width::W32 => Self::Binary32,
            Width::W64 => Self::Binary64,
        }
    }

    pub fn category(self) -> Category {
        match self {
            Self::End | Self::Error => Category::Status,
            Self::Null => Category::Nullable,
            Self::BeginRecord
            | Self::EndRecord
            | Self::BeginArray
            | Self::EndArray
            | Self::BeginAssocArray
            | Self::EndAssocArray => Category::Structural,
            _ => Category::Data,
        }
    }

    pub fn symbol(self) -> Symbol {
        match self {
            Self::End => Symbol::End,
            Self::Error => Symbol::Error,
            Self::Null => Symbol::Null,
            Self::False | Self::True => Symbol::Boolean,
            Self::SmallInt | Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => {
                Symbol::Integer
            }
            Self::Float32 | Self::Float64 => Symbol::Real,
            Self::String8 | Self::String16 | Self::String32 | Self::String64 => Symbol::String,
            Self::Binary8 | Self::Binary16 | Self::Binary32 | Self::Binary64 => Symbol::Binary,
            Self::CompactArray { .. } => Symbol::CompactArray,
            Self::BeginRecord => Symbol::BeginRecord,
            Self::EndRecord => Symbol::EndRecord,
            Self::BeginArray => Symbol::BeginArray,
            Self::EndArray => Symbol::EndArray,
            Self::BeginAssocArray => Symbol::BeginAssocArray,
            Self::EndAssocArray => Symbol::EndAssocArray,
        }
    }

    /// Integer width encoded by this code. `SmallInt` counts as 8 bits.
    pub fn integer_width(self) -> Option<Width> {
        match self {
            Self::SmallInt | Self::Int8 => Some(Width::W8),
            Self::Int16 => Some(Width::W16),
            Self::Int32 => Some(Width::W32),
            Self::Int64 => Some(Width::W64),
            _ => None,
        }
    }

    /// Width of the length field following the marker, for length-prefixed codes.
    pub fn length_width(self) -> Option<Width> {
        match self {
            Self::String8 | Self::Binary8 => Some(Width::W8),
            Self::String16 | Self::Binary16 => Some(Width::W16),
            Self::String32 | Self::Binary32 => Some(Width::W32),
            Self::String64 | Self::Binary64 => Some(Width::W64),
            Self::CompactArray { length, .. } => Some(length),
            _ => None,
        }
    }

    /// Payload size for codes whose payload is not length-prefixed.
    pub fn fixed_payload(self) -> Option<usize> {
        match self {
            Self::Int8 => Some(1),
            Self::Int16 => Some(2),
            Self::Int32 | Self::Float32 => Some(4),
            Self::Int64 | Self::Float64 => Some(8),
            Self::Null
            | Self::False
            | Self::True
            | Self::BeginRecord
            | Self::EndRecord
            | Self::BeginArray
            | Self::EndArray
            | Self::BeginAssocArray
            | Self::EndAssocArray => Some(0),
            _ => None,
        }
    }

    /// The container opened by this code, if it is a begin marker.
    pub fn opens(self) -> Option<Container> {
        match self {
            Self::BeginRecord => Some(Container::Record),
            Self::BeginArray => Some(Container::Array),
            Self::BeginAssocArray => Some(Container::AssocArray),
            _ => None,
        }
    }

    /// The container closed by this code, if it is an end marker.
    pub fn closes(self) -> Option<Container> {
        match self {
            Self::EndRecord => Some(Container::Record),
            Self::EndArray => Some(Container::Array),
            Self::EndAssocArray => Some(Container::AssocArray),
            _ => None,
        }
    }
}
