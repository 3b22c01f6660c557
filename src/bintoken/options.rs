//! Configuration for [`parse_with`](super::parse::parse_with) and
//! [`format_with`](super::format::format_with).

/// Default limit on container nesting.
const DEFAULT_MAX_DEPTH: usize = 128;

/// Limits and switches for converting between bytes and variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    pub(crate) max_depth: usize,
    pub(crate) allow_trailing: bool,
    pub(crate) prefixed: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing: false,
            prefixed: false,
        }
    }
}

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deepest container nesting accepted by parse and produced by format.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Lets a top-level parse stop after one value instead of rejecting
    /// trailing bytes.
    pub fn allow_trailing(mut self, allow: bool) -> Self {
        self.allow_trailing = allow;
        self
    }

    /// Follows the count-or-sentinel convention of [`Prefix::of`]: format
    /// writes a count before array children and a Null sentinel before map
    /// children, and parse drops a leading count or Null from arrays.
    ///
    /// Without it a leading count or Null in an array is an ordinary element,
    /// since it cannot be told apart from one. Maps never need the switch:
    /// an odd number of children led by a count or Null is always a prefix.
    ///
    /// [`Prefix::of`]: super::collection::Prefix::of
    pub fn prefixed(mut self, prefixed: bool) -> Self {
        self.prefixed = prefixed;
        self
    }
}
