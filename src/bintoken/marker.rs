//! Wire marker byte constants.

// SMALL_INT: single byte with no marker, range -32..=127
// Positive: 0x00..=0x7F (0..127)
// Negative: 0xE0..=0xFF (-32..-1)
pub const SMALL_INT_MIN: i64 = -32;
pub const SMALL_INT_MAX: i64 = 127;

// Null
pub const NULL: u8 = 0x80;

// Boolean
pub const FALSE: u8 = 0x81;
pub const TRUE: u8 = 0x82;

// Integer (beyond SMALL_INT range), little-endian payload
pub const INT_8: u8 = 0x83;
pub const INT_16: u8 = 0x84;
pub const INT_32: u8 = 0x85;
pub const INT_64: u8 = 0x86;

// Real (IEEE 754), little-endian payload
pub const FLOAT_32: u8 = 0x87;
pub const FLOAT_64: u8 = 0x88;

// String: marker + length field + raw bytes
pub const STRING_8: u8 = 0x89;
pub const STRING_16: u8 = 0x8A;
pub const STRING_32: u8 = 0x8B;
pub const STRING_64: u8 = 0x8C;

// Binary: marker + length field + raw bytes
pub const BINARY_8: u8 = 0x8D;
pub const BINARY_16: u8 = 0x8E;
pub const BINARY_32: u8 = 0x8F;
pub const BINARY_64: u8 = 0x90;

// Structural
pub const BEGIN_RECORD: u8 = 0x91;
pub const END_RECORD: u8 = 0x92;
pub const BEGIN_ARRAY: u8 = 0x93;
pub const END_ARRAY: u8 = 0x94;
pub const BEGIN_ASSOC_ARRAY: u8 = 0x95;
pub const END_ASSOC_ARRAY: u8 = 0x96;

// Compact arrays: 0xA0..=0xB7
// marker = COMPACT_ARRAY_BASE + element_type * 4 + length_width
// element_type: int8=0, int16=1, int32=2, int64=3, float32=4, float64=5
// length_width: 8-bit=0, 16-bit=1, 32-bit=2, 64-bit=3
// The length field holds the payload byte length, not the element count.
pub const COMPACT_ARRAY_BASE: u8 = 0xA0;
pub const COMPACT_ARRAY_LAST: u8 = 0xB7;

pub const ARRAY8_INT8: u8 = 0xA0;
pub const ARRAY16_INT8: u8 = 0xA1;
pub const ARRAY32_INT8: u8 = 0xA2;
pub const ARRAY64_INT8: u8 = 0xA3;
pub const ARRAY8_INT16: u8 = 0xA4;
pub const ARRAY16_INT16: u8 = 0xA5;
pub const ARRAY32_INT16: u8 = 0xA6;
pub const ARRAY64_INT16: u8 = 0xA7;
pub const ARRAY8_INT32: u8 = 0xA8;
pub const ARRAY16_INT32: u8 = 0xA9;
pub const ARRAY32_INT32: u8 = 0xAA;
pub const ARRAY64_INT32: u8 = 0xAB;
pub const ARRAY8_INT64: u8 = 0xAC;
pub const ARRAY16_INT64: u8 = 0xAD;
pub const ARRAY32_INT64: u8 = 0xAE;
pub const ARRAY64_INT64: u8 = 0xAF;
pub const ARRAY8_FLOAT32: u8 = 0xB0;
pub const ARRAY16_FLOAT32: u8 = 0xB1;
pub const ARRAY32_FLOAT32: u8 = 0xB2;
pub const ARRAY64_FLOAT32: u8 = 0xB3;
pub const ARRAY8_FLOAT64: u8 = 0xB4;
pub const ARRAY16_FLOAT64: u8 = 0xB5;
pub const ARRAY32_FLOAT64: u8 = 0xB6;
pub const ARRAY64_FLOAT64: u8 = 0xB7;
