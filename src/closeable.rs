//! The closeable capability.
//!
//! [`Closeable`] marks resources the transfer driver releases on normal
//! completion. Closing is idempotent: the first close releases the underlying
//! resource, later closes are no-ops, and a closed source reads as end of
//! stream. Byte buffers close as a no-op so any pump endpoint can be closed
//! uniformly.

use crate::buffer::ByteBuffer;
use crate::error::ConvertError;
use crate::reader::Reader;
use crate::value::{InputStream, OutputStream, ReadableChannel, WritableChannel};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// Something that can be closed. Close is idempotent.
#[async_trait]
pub trait Closeable: Send {
  /// Releases the underlying resource. Subsequent closes are no-ops.
  async fn close(&mut self) -> Result<(), ConvertError>;
}

#[async_trait]
impl Closeable for InputStream {
  async fn close(&mut self) -> Result<(), ConvertError> {
    drop(self.take_inner());
    Ok(())
  }
}

#[async_trait]
impl Closeable for ReadableChannel {
  async fn close(&mut self) -> Result<(), ConvertError> {
    drop(self.take_inner());
    Ok(())
  }
}

#[async_trait]
impl Closeable for OutputStream {
  async fn close(&mut self) -> Result<(), ConvertError> {
    if let Some(mut write) = self.take_inner() {
      write.shutdown().await?;
    }
    Ok(())
  }
}

#[async_trait]
impl Closeable for WritableChannel {
  async fn close(&mut self) -> Result<(), ConvertError> {
    if let Some(mut write) = self.take_inner() {
      write.shutdown().await?;
    }
    Ok(())
  }
}

#[async_trait]
impl Closeable for Reader {
  async fn close(&mut self) -> Result<(), ConvertError> {
    Reader::close(self);
    Ok(())
  }
}

#[async_trait]
impl Closeable for ByteBuffer {
  /// Buffers hold no external resource; closing is a no-op.
  async fn close(&mut self) -> Result<(), ConvertError> {
    Ok(())
  }
}
