//! The byte-sink capability.
//!
//! [`ByteSink`] is the push half of the transfer pump's two minimal
//! capabilities. Output streams and writable channels implement it by
//! delegating to the underlying writer.

use crate::closeable::Closeable;
use crate::error::ConvertError;
use crate::options::Options;
use crate::value::{OutputStream, WritableChannel};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;

/// Something bytes can be pushed into.
#[async_trait]
pub trait ByteSink: Send {
  /// Pushes one chunk, writing it fully.
  async fn send_bytes(&mut self, chunk: Bytes, options: &Options) -> Result<(), ConvertError>;
}

/// A boxed byte sink that can also be closed, as handed out by
/// [`to_byte_sink`](crate::fabric::to_byte_sink) and consumed by the transfer
/// pump.
pub trait PumpSink: ByteSink + Closeable {}

impl<T: ByteSink + Closeable> PumpSink for T {}

/// Boxed form of [`PumpSink`].
pub type BoxByteSink = Box<dyn PumpSink>;

#[async_trait]
impl ByteSink for OutputStream {
  async fn send_bytes(&mut self, chunk: Bytes, _options: &Options) -> Result<(), ConvertError> {
    let Some(write) = self.inner_mut() else {
      return Err(ConvertError::Io(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "output stream is closed",
      )));
    };
    write.write_all(&chunk).await?;
    Ok(())
  }
}

#[async_trait]
impl ByteSink for WritableChannel {
  async fn send_bytes(&mut self, chunk: Bytes, _options: &Options) -> Result<(), ConvertError> {
    let Some(write) = self.inner_mut() else {
      return Err(ConvertError::Io(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "writable channel is closed",
      )));
    };
    write.write_all(&chunk).await?;
    Ok(())
  }
}
