//! The byte-source capability.
//!
//! [`ByteSource`] is one of the two minimal capabilities the generic transfer
//! pump is built on: pull a chunk of up to `n` bytes, or `None` at end of
//! stream. Input streams, readable channels, and byte buffers implement it.
//!
//! ## End-of-stream contract
//!
//! The EOF signal is two-stage. A source that hits EOF mid-fill returns the
//! short final chunk; only the *next* pull returns `None`. Consumers must
//! treat `None`, never a short chunk, as termination.

use crate::buffer::ByteBuffer;
use crate::closeable::Closeable;
use crate::error::ConvertError;
use crate::options::Options;
use crate::value::{InputStream, ReadableChannel};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncReadExt;

/// Something bytes can be pulled from.
#[async_trait]
pub trait ByteSource: Send {
  /// Pulls a chunk of up to `n` bytes. Returns `None` at end of stream.
  async fn take_bytes(&mut self, n: usize, options: &Options)
    -> Result<Option<Bytes>, ConvertError>;
}

/// A boxed byte source that can also be closed, as handed out by
/// [`to_byte_source`](crate::fabric::to_byte_source) and consumed by the
/// transfer pump.
pub trait PumpSource: ByteSource + Closeable {}

impl<T: ByteSource + Closeable> PumpSource for T {}

/// Boxed form of [`PumpSource`].
pub type BoxByteSource = Box<dyn PumpSource>;

/// Fills `buf` from `read`, looping until full or EOF. Returns bytes filled.
async fn fill(
  read: &mut (dyn tokio::io::AsyncRead + Send + Unpin),
  buf: &mut [u8],
) -> Result<usize, ConvertError> {
  let mut filled = 0;
  while filled < buf.len() {
    let n = read.read(&mut buf[filled..]).await?;
    if n == 0 {
      break;
    }
    filled += n;
  }
  Ok(filled)
}

#[async_trait]
impl ByteSource for InputStream {
  /// Fully fills an `n`-byte chunk by looping reads until filled or EOF.
  ///
  /// On EOF with partial data the prefix is returned as a tight copy; on EOF
  /// with zero bytes, `None`. A closed stream always returns `None`.
  async fn take_bytes(
    &mut self,
    n: usize,
    _options: &Options,
  ) -> Result<Option<Bytes>, ConvertError> {
    let Some(read) = self.inner_mut() else {
      return Ok(None);
    };
    let mut buf = vec![0u8; n];
    let filled = fill(read, &mut buf).await?;
    if filled == 0 {
      return Ok(None);
    }
    buf.truncate(filled);
    Ok(Some(Bytes::from(buf)))
  }
}

#[async_trait]
impl ByteSource for ReadableChannel {
  /// Reads into an `n`-byte chunk while the channel is open and progress is
  /// made. Returns the filled prefix, or `None` once nothing was read.
  async fn take_bytes(
    &mut self,
    n: usize,
    _options: &Options,
  ) -> Result<Option<Bytes>, ConvertError> {
    let Some(read) = self.inner_mut() else {
      return Ok(None);
    };
    let mut buf = vec![0u8; n];
    let filled = fill(read, &mut buf).await?;
    if filled == 0 {
      return Ok(None);
    }
    buf.truncate(filled);
    Ok(Some(Bytes::from(buf)))
  }
}

#[async_trait]
impl ByteSource for ByteBuffer {
  /// Returns a zero-copy slice of at most `n` remaining bytes, advancing the
  /// position. Returns `None` once exhausted.
  async fn take_bytes(
    &mut self,
    n: usize,
    _options: &Options,
  ) -> Result<Option<Bytes>, ConvertError> {
    if !self.has_remaining() {
      return Ok(None);
    }
    Ok(Some(self.take(n)))
  }
}
