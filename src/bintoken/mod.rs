//! Binary token wire format.
//!
//! Every value is one or more self-describing tokens. Small integers in
//! [-32, 127] are a single byte; everything else starts with a marker byte
//! in 0x80..=0xDF. All multi-byte payloads and length fields are
//! little-endian.

pub mod buffer;
pub mod collection;
pub mod decode;
pub mod encode;
pub mod format;
pub mod marker;
pub mod options;
pub mod parse;
pub mod reader;
pub mod token;
pub mod writer;

pub use buffer::{FixedBuffer, Sink};
pub use collection::Prefix;
pub use decode::{Decoder, FromToken};
pub use encode::{Element, Encode, Encoder};
pub use format::{format, format_into, format_partial, format_with};
pub use options::CodecOptions;
pub use parse::{parse, parse_partial, parse_with};
pub use reader::Reader;
pub use token::{Category, Code, Container, ElementType, RealWidth, Symbol, Width};
pub use writer::Writer;
