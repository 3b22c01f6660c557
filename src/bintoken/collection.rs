//! Count-or-sentinel container convention.
//!
//! A container's children may be preceded by an element count or by a Null
//! sentinel meaning "count unknown". The choice is fixed per container kind
//! (see [`Prefix::of`]). Either way the end marker terminates the container;
//! a count is only a sizing hint.

use super::buffer::Sink;
use super::decode::FromToken;
use super::encode::Encode;
use super::reader::Reader;
use super::token::{Category, Code, Container};
use super::writer::Writer;
use crate::error::BintokenError;

/// What a writer places between a begin marker and the first child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// An integer token holding the number of elements.
    Count,
    /// A Null token; the element count is not stated.
    Sentinel,
    /// Nothing; children follow the begin marker directly.
    None,
}

impl Prefix {
    /// The prefix written for each container kind.
    pub const fn of(container: Container) -> Self {
        match container {
            Container::Array => Self::Count,
            Container::AssocArray => Self::Sentinel,
            Container::Record => Self::None,
        }
    }
}

impl<S: Sink> Writer<S> {
    /// Opens `container` and writes the prefix its kind calls for.
    ///
    /// `len` is the number of elements (pairs, for associative arrays); it is
    /// ignored by kinds that do not write a count.
    pub fn begin_collection(&mut self, container: Container, len: usize) -> Result<usize, BintokenError> {
        let mut written = self.begin(container)?;
        written += match Prefix::of(container) {
            Prefix::Count => {
                let count = i64::try_from(len).map_err(|_| BintokenError::Overflow)?;
                self.value(&count)?
            }
            Prefix::Sentinel => self.value(&())?,
            Prefix::None => 0,
        };
        Ok(written)
    }

    /// Writes a whole array of scalars, count first.
    pub fn sequence<T: Encode>(&mut self, values: &[T]) -> Result<usize, BintokenError> {
        let mut written = self.begin_collection(Container::Array, values.len())?;
        for value in values {
            written += self.value(value)?;
        }
        written += self.end(Container::Array)?;
        Ok(written)
    }

    /// Writes a whole associative array of scalar pairs behind a sentinel.
    pub fn mapping<K, V, I>(&mut self, pairs: I) -> Result<usize, BintokenError>
    where
        K: Encode,
        V: Encode,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut written = self.begin_collection(Container::AssocArray, 0)?;
        for (key, value) in pairs {
            written += self.value(&key)?;
            written += self.value(&value)?;
        }
        written += self.end(Container::AssocArray)?;
        Ok(written)
    }
}

impl<'a> Reader<'a> {
    /// Consumes the begin marker of `container` and its prefix, if any.
    ///
    /// Arrays and associative arrays accept either a count or a sentinel,
    /// whichever the writer chose; records have no prefix. Returns the count
    /// when one was present.
    pub fn enter_collection(&mut self, container: Container) -> Result<Option<u64>, BintokenError> {
        self.require(container.begin_code())?;
        self.advance()?;
        self.skip_prefix(container)
    }

    /// Consumes a count or sentinel at the current token, if `container`'s
    /// kind takes one. Any other token is left in place.
    pub(crate) fn skip_prefix(&mut self, container: Container) -> Result<Option<u64>, BintokenError> {
        if Prefix::of(container) == Prefix::None {
            return Ok(None);
        }
        match self.code() {
            Code::Null => {
                self.advance()?;
                Ok(None)
            }
            code if code.integer_width().is_some() => {
                let count: i64 = self.value()?;
                let count = u64::try_from(count).map_err(|_| self.reject(BintokenError::InvalidLength))?;
                self.advance()?;
                Ok(Some(count))
            }
            _ => Ok(None),
        }
    }

    /// True when the current token closes `container`.
    pub fn at_end(&self, container: Container) -> bool {
        self.code() == container.end_code()
    }

    /// Consumes the end marker of `container`.
    pub fn leave(&mut self, container: Container) -> Result<(), BintokenError> {
        self.require(container.end_code())?;
        self.advance()
    }

    /// Reads an array of scalars written with either prefix convention.
    pub fn sequence<T: FromToken<'a>>(&mut self) -> Result<Vec<T>, BintokenError> {
        let hint = self.enter_collection(Container::Array)?;
        let mut items = Vec::with_capacity(self.capacity_hint(hint));
        while !self.at_end(Container::Array) {
            items.push(self.value()?);
            self.advance()?;
        }
        self.leave(Container::Array)?;
        Ok(items)
    }

    /// Reads an associative array of scalar pairs.
    ///
    /// Keys of any scalar category are accepted; a structural token in key
    /// position fails `InvalidKey` and a key without a value fails
    /// `InvalidValue`.
    pub fn mapping<K: FromToken<'a>, V: FromToken<'a>>(&mut self) -> Result<Vec<(K, V)>, BintokenError> {
        let hint = self.enter_collection(Container::AssocArray)?;
        let mut pairs = Vec::with_capacity(self.capacity_hint(hint));
        while !self.at_end(Container::AssocArray) {
            if self.category() == Category::Structural {
                return Err(self.reject(BintokenError::InvalidKey));
            }
            let key = self.value()?;
            self.advance()?;
            if self.at_end(Container::AssocArray) {
                return Err(self.reject(BintokenError::InvalidValue));
            }
            let value = self.value()?;
            self.advance()?;
            pairs.push((key, value));
        }
        self.leave(Container::AssocArray)?;
        Ok(pairs)
    }

    fn require(&mut self, code: Code) -> Result<(), BintokenError> {
        if let Some(e) = self.error() {
            return Err(e);
        }
        if self.code() != code {
            return Err(self.reject(BintokenError::UnexpectedToken));
        }
        Ok(())
    }

    fn reject(&mut self, error: BintokenError) -> BintokenError {
        self.fail(error);
        error
    }

    /// A count bounded by the remaining input, so a bogus count cannot
    /// force a huge allocation.
    fn capacity_hint(&self, count: Option<u64>) -> usize {
        let count = count.map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX));
        count.min(self.tail().len() + 1)
    }
}
