//! Formatting: `Variant` → bytes.
//!
//! Scalars are written at their own width tag, so a parsed value formats
//! back to the same width. Arrays and maps are written as begin marker,
//! children, end marker; a count or sentinel prefix is added only when
//! [`CodecOptions::prefixed`] asks for it.

use bytes::BytesMut;

use super::buffer::Sink;
use super::options::CodecOptions;
use super::token::{Container, RealWidth};
use super::writer::Writer;
use crate::error::BintokenError;
use crate::variant::{Encoding, Variant};

/// Formats a variant into a new buffer.
pub fn format(value: &Variant) -> Result<BytesMut, BintokenError> {
    format_with(value, &CodecOptions::default())
}

pub fn format_with(value: &Variant, options: &CodecOptions) -> Result<BytesMut, BintokenError> {
    let mut writer = Writer::new(BytesMut::new());
    format_partial(&mut writer, value, options)?;
    Ok(writer.into_inner())
}

/// Formats a variant into `sink` and returns the number of bytes written.
///
/// With a fixed-capacity sink that runs out of room this fails with
/// `BufferFull`; the tokens written before that point remain in the sink.
pub fn format_into<S: Sink>(
    value: &Variant,
    sink: &mut S,
    options: &CodecOptions,
) -> Result<usize, BintokenError> {
    let mut writer = Writer::new(sink);
    format_partial(&mut writer, value, options)
}

/// Formats one variant through an existing writer.
///
/// The writer may already be inside containers opened by the caller; the
/// variant is written as a single child of the innermost one.
pub fn format_partial<S: Sink>(
    writer: &mut Writer<S>,
    value: &Variant,
    options: &CodecOptions,
) -> Result<usize, BintokenError> {
    format_value(writer, value, options, 0)
}

impl<S: Sink> Writer<S> {
    /// Writes a whole variant with default options.
    pub fn variant(&mut self, value: &Variant) -> Result<usize, BintokenError> {
        format_partial(self, value, &CodecOptions::default())
    }
}

fn format_value<S: Sink>(
    writer: &mut Writer<S>,
    value: &Variant,
    options: &CodecOptions,
    depth: usize,
) -> Result<usize, BintokenError> {
    match value {
        Variant::Null => writer.value(&()),
        Variant::Boolean(b) => writer.value(b),
        Variant::Integer(i) => writer.encode_with(|e| e.integer_as(i.value(), i.width())),
        Variant::Real(r) => match r.width() {
            RealWidth::W32 => writer.encode_with(|e| e.real32(r.as_f32())),
            RealWidth::W64 => writer.encode_with(|e| e.real64(r.value())),
            RealWidth::Extended => Err(BintokenError::IncompatibleType),
        },
        Variant::String(t) => match t.encoding() {
            Encoding::Utf8 => writer.encode_with(|e| e.string(t.as_bytes())),
            Encoding::Binary => writer.encode_with(|e| e.binary(t.as_bytes())),
            Encoding::Utf16 | Encoding::Utf32 => Err(BintokenError::IncompatibleType),
        },
        Variant::Array(items) => {
            let mut written = open(writer, Container::Array, items.len(), options, depth)?;
            for item in items {
                written += format_value(writer, item, options, depth + 1)?;
            }
            written += writer.end(Container::Array)?;
            Ok(written)
        }
        Variant::Map(map) => {
            let mut written = open(writer, Container::AssocArray, map.len(), options, depth)?;
            for (key, item) in map.entries() {
                written += format_value(writer, key, options, depth + 1)?;
                written += format_value(writer, item, options, depth + 1)?;
            }
            written += writer.end(Container::AssocArray)?;
            Ok(written)
        }
    }
}

fn open<S: Sink>(
    writer: &mut Writer<S>,
    container: Container,
    len: usize,
    options: &CodecOptions,
    depth: usize,
) -> Result<usize, BintokenError> {
    enter(depth, options.max_depth)?;
    if options.prefixed {
        writer.begin_collection(container, len)
    } else {
        writer.begin(container)
    }
}

fn enter(depth: usize, max_depth: usize) -> Result<(), BintokenError> {
    if depth >= max_depth {
        tracing::debug!(max_depth, "format nesting limit reached");
        return Err(BintokenError::NestingTooDeep);
    }
    Ok(())
}
