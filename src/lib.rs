//! bintoken: a compact binary token format and the dynamic value it carries.
//!
//! # Architecture
//!
//! - **`bintoken`**: the wire format. Token catalog, encoder/decoder,
//!   writer/reader with container validation, `format`/`parse` for whole values
//! - **`variant`**: `Variant`, a dynamically typed value whose scalars remember
//!   the width they were created or parsed with
//! - **`error`**: error taxonomy shared by every fallible operation
//!
//! ```
//! use bintoken::{Variant, format, parse};
//!
//! let value = Variant::array([Variant::Null, Variant::from(true), Variant::from(2)]);
//! let bytes = format(&value).unwrap();
//! assert_eq!(parse(&bytes).unwrap(), value);
//! ```

pub mod bintoken;
pub mod error;
pub mod variant;

pub use bintoken::{
    CodecOptions, Decoder, Encoder, Reader, Writer, format, format_into, format_with, parse,
    parse_with,
};
pub use error::BintokenError;
pub use variant::{Map, Variant};
