//! Byte sinks for encoding and a byte source for decoding.
//!
//! A sink is any [`BufMut`]. Encoders check [`BufMut::remaining_mut`] before
//! writing a token, so a sink with a fixed capacity either receives the whole
//! token or nothing, and growable sinks such as `BytesMut` and `Vec<u8>`
//! never reject.

use bytes::BufMut;
use bytes::buf::UninitSlice;

use super::token::Code;

/// Destination for encoded bytes.
pub trait Sink: BufMut {}

impl<B: BufMut + ?Sized> Sink for B {}

/// Fixed-capacity sink over caller-provided storage. Never allocates.
///
/// Unlike writing into a bare `&mut [u8]`, the buffer keeps the written
/// prefix visible through [`as_slice`](FixedBuffer::as_slice).
#[derive(Debug)]
pub struct FixedBuffer<'a> {
    storage: &'a mut [u8],
    len: usize,
}

impl<'a> FixedBuffer<'a> {
    pub fn new(storage: &'a mut [u8]) -> Self {
        Self { storage, len: 0 }
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Discards the written bytes, keeping the storage.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

// SAFETY: `chunk_mut` hands out the unwritten tail of initialized storage,
// and `advance_mut` never moves `len` past the end of that storage.
unsafe impl BufMut for FixedBuffer<'_> {
    fn remaining_mut(&self) -> usize {
        self.storage.len() - self.len
    }

    unsafe fn advance_mut(&mut self, cnt: usize) {
        self.len = self.len.saturating_add(cnt).min(self.storage.len());
    }

    fn chunk_mut(&mut self) -> &mut UninitSlice {
        UninitSlice::new(&mut self.storage[self.len..])
    }
}

/// Immutable byte source with a read cursor.
#[derive(Debug, Clone)]
pub struct Source<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Source<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    /// Classifies the next byte without consuming it.
    ///
    /// Returns `Code::End` when the source is exhausted and `Code::Error`
    /// for an unassigned marker byte.
    pub fn peek(&self) -> Code {
        match self.input.get(self.position) {
            None => Code::End,
            Some(&byte) => Code::from_byte(byte).unwrap_or(Code::Error),
        }
    }

    pub fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Skips up to `n` bytes; stops at the end of input.
    pub fn advance(&mut self, n: usize) {
        self.position = self.position.saturating_add(n).min(self.input.len());
    }

    /// The next `n` bytes, without consuming them.
    pub fn peek_slice(&self, n: usize) -> Option<&'a [u8]> {
        let end = self.position.checked_add(n)?;
        self.input.get(self.position..end)
    }

    /// The bytes in `start..end`, measured from the beginning of the input.
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    /// The unread tail of the input.
    pub fn rest(&self) -> &'a [u8] {
        &self.input[self.position..]
    }
}
