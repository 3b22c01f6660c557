//! Dynamically typed values serialized by the codec.

mod map;
mod order;
mod scalar;
mod value;

pub use map::{Map, Values};
pub use scalar::{Encoding, Integer, Real, Text};
pub use value::{Iter, Kind, Variant};
