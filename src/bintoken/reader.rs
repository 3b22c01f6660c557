//! Pull reader: a decoder plus container nesting validation.

use super::decode::{Decoder, FromToken};
use super::token::{Category, Code, Container, Symbol};
use crate::error::BintokenError;

/// Reads tokens one at a time and validates that containers are balanced.
///
/// A begin token and its matching end token report the same level as the
/// siblings of the container; the container's children report one more.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    decoder: Decoder<'a>,
    stack: Vec<Container>,
    level: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned on the first token of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        let mut reader = Self {
            decoder: Decoder::new(input),
            stack: Vec::new(),
            level: 0,
        };
        reader.settle();
        reader
    }

    /// Advances to the next token.
    ///
    /// Returns false at the end of input or on error; [`error`](Self::error)
    /// tells the two apart.
    pub fn next(&mut self) -> bool {
        if self.category() == Category::Status {
            return false;
        }
        self.decoder.next();
        self.settle();
        self.category() != Category::Status
    }

    /// Advances to the next token, turning a failure into an error.
    ///
    /// Reaching the end of input is not an error here.
    pub fn advance(&mut self) -> Result<(), BintokenError> {
        if !self.next() {
            if let Some(e) = self.error() {
                return Err(e);
            }
        }
        Ok(())
    }

    /// Decodes the current token as `T`. Does not change the reader state.
    pub fn value<T: FromToken<'a>>(&self) -> Result<T, BintokenError> {
        self.decoder.value()
    }

    /// Raw payload bytes of the current token.
    pub fn literal(&self) -> &'a [u8] {
        self.decoder.literal()
    }

    pub fn code(&self) -> Code {
        self.decoder.code()
    }

    pub fn symbol(&self) -> Symbol {
        self.decoder.symbol()
    }

    pub fn category(&self) -> Category {
        self.decoder.category()
    }

    /// Nesting depth of the current token.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn error(&self) -> Option<BintokenError> {
        self.decoder.error()
    }

    pub fn decoder(&self) -> &Decoder<'a> {
        &self.decoder
    }

    /// Input following the current token.
    pub fn tail(&self) -> &'a [u8] {
        self.decoder.tail()
    }

    /// Puts the reader into its terminal error state.
    pub fn fail(&mut self, error: BintokenError) {
        tracing::debug!(error = %error, offset = self.decoder.offset(), "bintoken reader error");
        self.decoder.fail(error);
    }

    /// Updates the nesting state for the token the decoder just moved to.
    fn settle(&mut self) {
        let code = self.decoder.code();
        match code {
            Code::Error => {
                if let Some(e) = self.decoder.error() {
                    tracing::debug!(error = %e, offset = self.decoder.offset(), "bintoken reader error");
                }
                return;
            }
            Code::End => {
                if let Some(&open) = self.stack.last() {
                    self.fail(open.missing_end());
                    return;
                }
                self.level = 0;
            }
            _ => {
                if let Some(container) = code.opens() {
                    self.level = self.stack.len();
                    self.stack.push(container);
                } else if let Some(container) = code.closes() {
                    if self.stack.last() != Some(&container) {
                        self.fail(BintokenError::UnexpectedToken);
                        return;
                    }
                    self.stack.pop();
                    self.level = self.stack.len();
                } else {
                    self.level = self.stack.len();
                }
            }
        }
        tracing::trace!(code = ?code, level = self.level, "token");
    }
}
