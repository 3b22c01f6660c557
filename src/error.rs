//! Error types for the binary token codec.

/// Errors reported by the Writer, Reader, parser and formatter.
///
/// The Encoder never produces these; it reports a full buffer by returning
/// zero bytes written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BintokenError {
    #[error("unexpected token")]
    UnexpectedToken,

    #[error("expected end of record")]
    ExpectedEndRecord,

    #[error("expected end of array")]
    ExpectedEndArray,

    #[error("expected end of associative array")]
    ExpectedEndAssocArray,

    #[error("invalid key")]
    InvalidKey,

    #[error("invalid value")]
    InvalidValue,

    #[error("incompatible type")]
    IncompatibleType,

    #[error("overflow")]
    Overflow,

    #[error("invalid length")]
    InvalidLength,

    #[error("buffer full")]
    BufferFull,

    #[error("nesting too deep")]
    NestingTooDeep,
}

impl BintokenError {
    /// Returns the snake_case identifier of this error.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected_token",
            Self::ExpectedEndRecord => "expected_end_record",
            Self::ExpectedEndArray => "expected_end_array",
            Self::ExpectedEndAssocArray => "expected_end_assoc_array",
            Self::InvalidKey => "invalid_key",
            Self::InvalidValue => "invalid_value",
            Self::IncompatibleType => "incompatible_type",
            Self::Overflow => "overflow",
            Self::InvalidLength => "invalid_length",
            Self::BufferFull => "buffer_full",
            Self::NestingTooDeep => "nesting_too_deep",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_taxonomy() {
        assert_eq!(BintokenError::UnexpectedToken.name(), "unexpected_token");
        assert_eq!(BintokenError::ExpectedEndAssocArray.name(), "expected_end_assoc_array");
        assert_eq!(BintokenError::Overflow.name(), "overflow");
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(BintokenError::IncompatibleType.to_string(), "incompatible type");
        assert_eq!(BintokenError::ExpectedEndArray.to_string(), "expected end of array");
    }
}
