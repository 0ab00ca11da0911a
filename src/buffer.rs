//! Positioned byte buffers.
//!
//! [`ByteBuffer`] is a forward-only cursor over an immutable byte string. It
//! is the workhorse shape of the conversion graph: sequences of byte buffers
//! stream out of channels, collapse into single buffers, and bridge back into
//! channels. A buffer tracks a position; reads return zero-copy slices of the
//! remaining span and advance it.
//!
//! A buffer is either a *wrap* of existing bytes (shares the allocation) or
//! *direct* (backed by a private allocation, requested with the `direct?`
//! option).

use bytes::{Bytes, BytesMut};

/// A positioned, forward-only view over a byte string.
#[derive(Debug, Clone)]
pub struct ByteBuffer {
  data: Bytes,
  pos: usize,
  direct: bool,
}

impl ByteBuffer {
  /// Wraps existing bytes without copying. Position starts at zero.
  pub fn wrap(data: impl Into<Bytes>) -> Self {
    Self {
      data: data.into(),
      pos: 0,
      direct: false,
    }
  }

  /// Copies `data` into a private allocation. Position starts at zero.
  pub fn direct_copy(data: &[u8]) -> Self {
    let mut buf = BytesMut::with_capacity(data.len());
    buf.extend_from_slice(data);
    Self {
      data: buf.freeze(),
      pos: 0,
      direct: true,
    }
  }

  /// Current read position.
  pub fn position(&self) -> usize {
    self.pos
  }

  /// Number of bytes left between the position and the end.
  pub fn remaining(&self) -> usize {
    self.data.len() - self.pos
  }

  /// Returns true if any bytes remain.
  pub fn has_remaining(&self) -> bool {
    self.remaining() > 0
  }

  /// Returns true if this buffer is backed by a private allocation.
  pub fn is_direct(&self) -> bool {
    self.direct
  }

  /// Takes a zero-copy slice of at most `n` remaining bytes, advancing the
  /// position past it. Returns an empty slice once exhausted.
  pub fn take(&mut self, n: usize) -> Bytes {
    let len = n.min(self.remaining());
    let slice = self.data.slice(self.pos..self.pos + len);
    self.pos += len;
    slice
  }

  /// The remaining bytes as a zero-copy slice, without consuming them.
  pub fn peek_remaining(&self) -> Bytes {
    self.data.slice(self.pos..)
  }

  /// Marks this buffer as direct.
  ///
  /// For reducers that have already copied their input into a private
  /// allocation and only need the tag to reflect it.
  pub fn into_direct(mut self) -> Self {
    self.direct = true;
    self
  }

  /// The remaining bytes as an immutable byte string, without consuming them.
  ///
  /// When the position is at zero this returns the backing bytes themselves;
  /// otherwise it returns a slice of the remaining span. Either way no byte is
  /// copied and the buffer's position is untouched.
  pub fn to_bytes(&self) -> Bytes {
    if self.pos == 0 {
      self.data.clone()
    } else {
      self.data.slice(self.pos..)
    }
  }
}

impl From<Bytes> for ByteBuffer {
  fn from(data: Bytes) -> Self {
    ByteBuffer::wrap(data)
  }
}

impl From<Vec<u8>> for ByteBuffer {
  fn from(data: Vec<u8>) -> Self {
    ByteBuffer::wrap(Bytes::from(data))
  }
}
