//! Parsing: bytes → `Variant`.
//!
//! Every scalar keeps the width it was encoded with. Records and arrays
//! both become `Variant::Array`; associative arrays become `Variant::Map`.
//! Only the end marker terminates a container. A map whose children are odd
//! in number and led by a count or Null sentinel has that prefix dropped;
//! arrays drop one only under [`CodecOptions::prefixed`].

use super::decode::read_integer;
use super::encode::Element;
use super::options::CodecOptions;
use super::reader::Reader;
use super::token::{Code, Container, ElementType};
use crate::error::BintokenError;
use crate::variant::{Encoding, Integer, Map, Real, Text, Variant};

/// Parses exactly one value that spans all of `input`.
pub fn parse(input: &[u8]) -> Result<Variant, BintokenError> {
    parse_with(input, &CodecOptions::default())
}

pub fn parse_with(input: &[u8], options: &CodecOptions) -> Result<Variant, BintokenError> {
    let mut reader = Reader::new(input);
    let value = parse_partial(&mut reader, options)?;
    if reader.code() != Code::End && !options.allow_trailing {
        tracing::debug!(offset = reader.decoder().offset(), "trailing data after value");
        return Err(BintokenError::UnexpectedToken);
    }
    Ok(value)
}

/// Parses the value at the reader's current token.
///
/// On success the reader is left on the token immediately after the value,
/// which may be further siblings, the end of an enclosing container opened
/// by the caller, or the end of input.
pub fn parse_partial(reader: &mut Reader<'_>, options: &CodecOptions) -> Result<Variant, BintokenError> {
    parse_value(reader, options, 0)
}

impl Reader<'_> {
    /// Reads one whole value with default options.
    pub fn variant(&mut self) -> Result<Variant, BintokenError> {
        parse_partial(self, &CodecOptions::default())
    }
}

fn parse_value(reader: &mut Reader<'_>, options: &CodecOptions, depth: usize) -> Result<Variant, BintokenError> {
    let code = reader.code();
    let value = match code {
        Code::Error => return Err(reader.error().unwrap_or(BintokenError::UnexpectedToken)),
        Code::End => return Err(BintokenError::InvalidValue),
        Code::EndRecord | Code::EndArray | Code::EndAssocArray => {
            reader.fail(BintokenError::UnexpectedToken);
            return Err(BintokenError::UnexpectedToken);
        }
        Code::BeginRecord => return parse_sequence(reader, Container::Record, options, depth),
        Code::BeginArray => return parse_sequence(reader, Container::Array, options, depth),
        Code::BeginAssocArray => return parse_map(reader, options, depth),
        Code::Null => Variant::Null,
        Code::False => Variant::Boolean(false),
        Code::True => Variant::Boolean(true),
        Code::CompactArray { element, .. } => {
            let (_, payload) = reader.decoder().compact_array()?;
            let items = payload
                .chunks_exact(element.size())
                .map(|mut chunk| match element {
                    ElementType::Float32 => Ok(Variant::Real(Real::new32(f32::get_le(&mut chunk)))),
                    ElementType::Float64 => Ok(Variant::Real(Real::new64(f64::get_le(&mut chunk)))),
                    _ => {
                        let width = element.integer_width().ok_or(BintokenError::IncompatibleType)?;
                        Integer::with_width(read_integer(element, chunk), width).map(Variant::Integer)
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            Variant::Array(items)
        }
        _ => scalar(reader)?,
    };
    // The value is complete; a scan failure on the following token belongs
    // to whoever reads next.
    reader.next();
    Ok(value)
}

fn scalar(reader: &Reader<'_>) -> Result<Variant, BintokenError> {
    let decoder = reader.decoder();
    if let Ok((value, width)) = decoder.integer() {
        return Ok(Variant::Integer(Integer::with_width(value, width)?));
    }
    match decoder.code() {
        Code::Float32 => return Ok(Variant::Real(Real::new32(decoder.real32()?))),
        Code::Float64 => return Ok(Variant::Real(Real::new64(decoder.real()?.0))),
        _ => {}
    }
    if let Ok(bytes) = decoder.string() {
        return Ok(Variant::String(Text::new(Encoding::Utf8, bytes.to_vec())));
    }
    let bytes = decoder.binary()?;
    Ok(Variant::String(Text::binary(bytes)))
}

fn enter(reader: &mut Reader<'_>, max_depth: usize, depth: usize) -> Result<(), BintokenError> {
    if depth >= max_depth {
        tracing::debug!(max_depth, offset = reader.decoder().offset(), "parse nesting limit reached");
        reader.fail(BintokenError::NestingTooDeep);
        return Err(BintokenError::NestingTooDeep);
    }
    reader.advance()
}

/// Parses children until the matching end marker.
///
/// The reader has already validated that any end marker it reports closes
/// the innermost open container, so only `container`'s end can appear here.
fn parse_sequence(
    reader: &mut Reader<'_>,
    container: Container,
    options: &CodecOptions,
    depth: usize,
) -> Result<Variant, BintokenError> {
    enter(reader, options.max_depth, depth)?;
    if options.prefixed {
        reader.skip_prefix(container)?;
    }
    let mut items = Vec::new();
    while reader.code() != container.end_code() {
        items.push(parse_value(reader, options, depth + 1)?);
    }
    reader.next();
    Ok(Variant::Array(items))
}

fn parse_map(reader: &mut Reader<'_>, options: &CodecOptions, depth: usize) -> Result<Variant, BintokenError> {
    enter(reader, options.max_depth, depth)?;
    let mut children = Vec::new();
    while reader.code() != Container::AssocArray.end_code() {
        children.push(parse_value(reader, options, depth + 1)?);
    }
    if children.len() % 2 == 1 && children.first().is_some_and(is_prefix) {
        children.remove(0);
    }
    if children.len() % 2 == 1 {
        tracing::debug!(offset = reader.decoder().offset(), "map key without value");
        reader.fail(BintokenError::InvalidValue);
        return Err(BintokenError::InvalidValue);
    }

    let mut map = Map::new();
    let mut children = children.into_iter();
    while let (Some(key), Some(value)) = (children.next(), children.next()) {
        map.insert(key, value);
    }
    reader.next();
    Ok(Variant::Map(map))
}

/// A child that can stand for a map's count or sentinel.
fn is_prefix(child: &Variant) -> bool {
    match child {
        Variant::Null => true,
        Variant::Integer(count) => count.value() >= 0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bintoken::format::format;
    use crate::bintoken::marker;
    use crate::bintoken::token::{RealWidth, Width};
    use crate::bintoken::writer::Writer;

    #[test]
    fn parse_scalars_with_encoded_width() {
        let value = parse(&[marker::INT_16, 0x05, 0x00]).unwrap();
        assert_eq!(value.as_integer().map(|i| i.width()), Some(Width::W16));
        assert_eq!(value.as_i64(), Some(5));

        let value = parse(&[0x05]).unwrap();
        assert_eq!(value.as_integer().map(|i| i.width()), Some(Width::W8));

        let value = parse(&[marker::FLOAT_32, 0x00, 0x00, 0x40, 0x40]).unwrap();
        assert_eq!(value.as_real().map(|r| r.width()), Some(RealWidth::W32));
        assert_eq!(value.as_f64(), Some(3.0));

        assert_eq!(parse(&[marker::NULL]).unwrap(), Variant::Null);
        assert_eq!(parse(&[marker::FALSE]).unwrap(), Variant::from(false));
    }

    #[test]
    fn parse_string_and_binary() {
        let value = parse(&[marker::STRING_8, 0x02, b'h', b'i']).unwrap();
        assert_eq!(value.as_str(), Some("hi"));

        let value = parse(&[marker::BINARY_8, 0x02, 0x00, 0xFF]).unwrap();
        let text = value.as_text().unwrap();
        assert_eq!(text.encoding(), Encoding::Binary);
        assert_eq!(text.as_bytes(), &[0x00, 0xFF]);
    }

    #[test]
    fn parse_mixed_array() {
        let data = [
            marker::BEGIN_ARRAY,
            marker::NULL,
            marker::TRUE,
            0x02,
            marker::FLOAT_32,
            0x00,
            0x00,
            0x40,
            0x40,
            marker::STRING_8,
            0x03,
            b'A',
            b'B',
            b'C',
            marker::END_ARRAY,
        ];
        let expected = Variant::array([
            Variant::Null,
            Variant::from(true),
            Variant::from(2),
            Variant::from(3.0f32),
            Variant::from("ABC"),
        ]);
        assert_eq!(parse(&data).unwrap(), expected);
    }

    #[test]
    fn record_becomes_array() {
        let data = [marker::BEGIN_RECORD, 0x01, 0x02, marker::END_RECORD];
        assert_eq!(parse(&data).unwrap(), Variant::array([1, 2]));
    }

    #[test]
    fn count_and_sentinel_are_children() {
        let counted = [marker::BEGIN_ARRAY, 0x02, 0x0A, 0x0B, marker::END_ARRAY];
        assert_eq!(parse(&counted).unwrap(), Variant::array([2, 10, 11]));

        let sentinel = [marker::BEGIN_ARRAY, marker::NULL, 0x0A, marker::END_ARRAY];
        assert_eq!(
            parse(&sentinel).unwrap(),
            Variant::array([Variant::Null, Variant::from(10)])
        );
    }

    #[test]
    fn parse_compact_array() {
        let data = [marker::ARRAY8_INT16, 0x04, 0x01, 0x00, 0xFF, 0xFF];
        let value = parse(&data).unwrap();
        assert_eq!(value, Variant::array([1, -1]));
        let widths: Vec<_> = value
            .iter()
            .filter_map(|v| v.as_integer().map(|i| i.width()))
            .collect();
        assert_eq!(widths, vec![Width::W16, Width::W16]);

        let data = [marker::ARRAY8_FLOAT32, 0x04, 0x00, 0x00, 0x80, 0x3F];
        let value = parse(&data).unwrap();
        assert_eq!(value.get(0).and_then(Variant::as_real).map(|r| r.width()), Some(RealWidth::W32));
    }

    #[test]
    fn parse_map_pairs() {
        let data = [
            marker::BEGIN_ASSOC_ARRAY,
            marker::STRING_8,
            0x01,
            b'b',
            0x02,
            marker::STRING_8,
            0x01,
            b'a',
            0x01,
            marker::END_ASSOC_ARRAY,
        ];
        let value = parse(&data).unwrap();
        assert_eq!(value, Variant::map([("a", 1), ("b", 2)]));
        let values: Vec<_> = value.iter().filter_map(Variant::as_i64).collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn map_key_without_value() {
        let data = [marker::BEGIN_ASSOC_ARRAY, marker::STRING_8, 0x01, b'k', marker::END_ASSOC_ARRAY];
        assert_eq!(parse(&data), Err(BintokenError::InvalidValue));

        // A negative integer is never a count.
        let data = [marker::BEGIN_ASSOC_ARRAY, 0xFF, marker::END_ASSOC_ARRAY];
        assert_eq!(parse(&data), Err(BintokenError::InvalidValue));

        let data = [
            marker::BEGIN_ASSOC_ARRAY,
            marker::TRUE,
            0x01,
            0x02,
            marker::END_ASSOC_ARRAY,
        ];
        assert_eq!(parse(&data), Err(BintokenError::InvalidValue));
    }

    #[test]
    fn map_prefix_is_dropped() {
        let sentinel = [
            marker::BEGIN_ASSOC_ARRAY,
            marker::NULL,
            0x01,
            marker::TRUE,
            marker::END_ASSOC_ARRAY,
        ];
        assert_eq!(parse(&sentinel).unwrap(), Variant::map([(1, true)]));

        let counted = [
            marker::BEGIN_ASSOC_ARRAY,
            0x01,
            0x01,
            marker::TRUE,
            marker::END_ASSOC_ARRAY,
        ];
        assert_eq!(parse(&counted).unwrap(), Variant::map([(1, true)]));

        let empty = [marker::BEGIN_ASSOC_ARRAY, marker::NULL, marker::END_ASSOC_ARRAY];
        assert_eq!(parse(&empty).unwrap(), Variant::Map(Map::new()));

        // An even number of children is all pairs, even with a Null key.
        let null_key = [
            marker::BEGIN_ASSOC_ARRAY,
            marker::NULL,
            0x07,
            marker::END_ASSOC_ARRAY,
        ];
        assert_eq!(parse(&null_key).unwrap(), Variant::map([(Variant::Null, Variant::from(7))]));
    }

    #[test]
    fn parse_writer_mapping() {
        let mut writer = Writer::new(Vec::new());
        writer.mapping([("a", 1i64), ("b", 2)]).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(parse(&bytes).unwrap(), Variant::map([("a", 1), ("b", 2)]));
        let prefixed = CodecOptions::new().prefixed(true);
        assert_eq!(parse_with(&bytes, &prefixed).unwrap(), Variant::map([("a", 1), ("b", 2)]));
    }

    #[test]
    fn parse_writer_sequence() {
        let mut writer = Writer::new(Vec::new());
        writer.sequence(&[10i64, 20]).unwrap();
        let bytes = writer.into_inner();

        let prefixed = CodecOptions::new().prefixed(true);
        assert_eq!(parse_with(&bytes, &prefixed).unwrap(), Variant::array([10, 20]));
        // Without the switch the count cannot be told from an element.
        assert_eq!(parse(&bytes).unwrap(), Variant::array([2, 10, 20]));
    }

    #[test]
    fn prefixed_records_keep_leading_integer() {
        let data = [marker::BEGIN_RECORD, 0x02, 0x0A, marker::END_RECORD];
        let prefixed = CodecOptions::new().prefixed(true);
        assert_eq!(parse_with(&data, &prefixed).unwrap(), Variant::array([2, 10]));

        let data = [marker::BEGIN_ARRAY, marker::TRUE, marker::END_ARRAY];
        assert_eq!(parse_with(&data, &prefixed).unwrap(), Variant::array([true]));
    }

    #[test]
    fn prefixed_round_trip() {
        let value = Variant::array([
            Variant::Null,
            Variant::from(3),
            Variant::map([(Variant::Null, Variant::array([1, 2]))]),
            Variant::array(Vec::<Variant>::new()),
        ]);
        let options = CodecOptions::new().prefixed(true);
        let bytes = crate::bintoken::format::format_with(&value, &options).unwrap();
        assert_eq!(parse_with(&bytes, &options).unwrap(), value);
    }

    #[test]
    fn real32_bits_round_trip() {
        let value = Variant::Real(Real::new32(f32::from_bits(0x7F80_0001)));
        let parsed = parse(&format(&value).unwrap()).unwrap();
        assert_eq!(parsed.as_real().map(|r| r.as_f32().to_bits()), Some(0x7F80_0001));

        let data = [marker::ARRAY8_FLOAT32, 0x04, 0x01, 0x00, 0x80, 0x7F];
        let parsed = parse(&data).unwrap();
        assert_eq!(parsed[0].as_real().map(|r| r.as_f32().to_bits()), Some(0x7F80_0001));
    }

    #[test]
    fn structural_errors() {
        assert_eq!(
            parse(&[marker::BEGIN_ARRAY, marker::END_RECORD]),
            Err(BintokenError::UnexpectedToken)
        );
        assert_eq!(parse(&[marker::BEGIN_ARRAY, 0x01]), Err(BintokenError::ExpectedEndArray));
        assert_eq!(
            parse(&[marker::BEGIN_ASSOC_ARRAY]),
            Err(BintokenError::ExpectedEndAssocArray)
        );
        assert_eq!(parse(&[marker::END_ARRAY]), Err(BintokenError::UnexpectedToken));
        assert_eq!(parse(&[]), Err(BintokenError::InvalidValue));
        assert_eq!(parse(&[marker::STRING_8, 0x05, b'a']), Err(BintokenError::InvalidLength));
    }

    #[test]
    fn trailing_data() {
        assert_eq!(parse(&[0x01, 0x02]), Err(BintokenError::UnexpectedToken));
        assert_eq!(parse(&[0x01, marker::END_ARRAY]), Err(BintokenError::UnexpectedToken));

        let options = CodecOptions::new().allow_trailing(true);
        assert_eq!(parse_with(&[0x01, 0x02], &options), Ok(Variant::from(1)));
    }

    #[test]
    fn nesting_limit() {
        let data = [
            marker::BEGIN_ARRAY,
            marker::BEGIN_ARRAY,
            marker::BEGIN_ARRAY,
            marker::END_ARRAY,
            marker::END_ARRAY,
            marker::END_ARRAY,
        ];
        let options = CodecOptions::new().max_depth(2);
        assert_eq!(parse_with(&data, &options), Err(BintokenError::NestingTooDeep));
        let options = CodecOptions::new().max_depth(3);
        assert!(parse_with(&data, &options).is_ok());
    }

    #[test]
    fn partial_parse_inside_manual_container() {
        let data = [
            marker::BEGIN_RECORD,
            marker::STRING_8,
            0x01,
            b'x',
            marker::BEGIN_ARRAY,
            0x01,
            0x02,
            marker::END_ARRAY,
            marker::END_RECORD,
        ];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.code(), Code::BeginRecord);
        reader.advance().unwrap();
        assert_eq!(reader.value::<&str>(), Ok("x"));
        reader.advance().unwrap();
        assert_eq!(reader.variant(), Ok(Variant::array([1, 2])));
        assert_eq!(reader.code(), Code::EndRecord);
        assert_eq!(reader.level(), 0);
        reader.advance().unwrap();
        assert_eq!(reader.code(), Code::End);
    }

    #[test]
    fn round_trip_preserves_widths() {
        let value = Variant::array([
            Variant::Integer(Integer::with_width(1, Width::W64).unwrap()),
            Variant::Real(Real::new32(0.5)),
            Variant::binary(vec![1, 2]),
            Variant::map([(1, "one")]),
        ]);
        let bytes = format(&value).unwrap();
        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed, value);
        assert_eq!(parsed[0].as_integer().map(|i| i.width()), Some(Width::W64));
        assert_eq!(format(&parsed).unwrap(), bytes);
    }
}
