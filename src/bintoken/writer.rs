//! Writer: an encoder plus a stack of open containers.

use super::buffer::Sink;
use super::encode::{Element, Encode, Encoder};
use super::token::Container;
use crate::error::BintokenError;

/// Encodes values and enforces that every `end` matches the open container.
#[derive(Debug)]
pub struct Writer<S> {
    encoder: Encoder<S>,
    stack: Vec<Container>,
}

impl<S: Sink> Writer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            encoder: Encoder::new(sink),
            stack: Vec::new(),
        }
    }

    pub fn sink(&self) -> &S {
        self.encoder.sink()
    }

    pub fn into_inner(self) -> S {
        self.encoder.into_inner()
    }

    /// Number of currently open containers.
    pub fn level(&self) -> usize {
        self.stack.len()
    }

    /// Writes one scalar value and returns the number of bytes written.
    pub fn value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<usize, BintokenError> {
        let written = value.encode(&mut self.encoder);
        self.check(written)
    }

    /// Writes a homogeneous numeric array as one compact token.
    pub fn array<T: Element>(&mut self, values: &[T]) -> Result<usize, BintokenError> {
        let written = self.encoder.array(values);
        self.check(written)
    }

    /// Opens a container.
    pub fn begin(&mut self, container: Container) -> Result<usize, BintokenError> {
        let written = self.encoder.begin(container);
        let written = self.check(written)?;
        self.stack.push(container);
        Ok(written)
    }

    /// Closes the innermost container, which must be of kind `container`.
    ///
    /// On mismatch nothing is written and the stack is left unchanged.
    pub fn end(&mut self, container: Container) -> Result<usize, BintokenError> {
        if self.stack.last() != Some(&container) {
            tracing::debug!(
                expected = ?self.stack.last(),
                got = ?container,
                "unbalanced end rejected",
            );
            return Err(BintokenError::UnexpectedToken);
        }
        let written = self.encoder.end(container);
        let written = self.check(written)?;
        self.stack.pop();
        Ok(written)
    }

    /// Writes pre-encoded token bytes verbatim, bypassing nesting checks.
    pub fn literal(&mut self, bytes: &[u8]) -> Result<usize, BintokenError> {
        let written = self.encoder.literal(bytes);
        self.check(written)
    }

    /// Runs one encoder operation with the writer's error reporting.
    pub(crate) fn encode_with(
        &mut self,
        f: impl FnOnce(&mut Encoder<S>) -> usize,
    ) -> Result<usize, BintokenError> {
        let written = f(&mut self.encoder);
        self.check(written)
    }

    fn check(&self, written: usize) -> Result<usize, BintokenError> {
        if written == 0 {
            Err(BintokenError::BufferFull)
        } else {
            Ok(written)
        }
    }
}
