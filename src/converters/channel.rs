//! Converters between streams, channels, and buffer sequences.
//!
//! This module holds the streaming corner of the graph. Streams and channels
//! carry the same underlying reader, so the bridges between them rewrap
//! without touching the bytes. The interesting edges are the two sequence
//! bridges:
//!
//! - **channel → many(byte-buffer)** pulls one chunk per demand, so the
//!   sequence is as lazy as the channel. Forcing `k` buffers reads `k`
//!   chunks and nothing more.
//! - **many(byte-buffer) → readable-channel** opens a bounded in-memory pipe
//!   and spawns one background producer that writes each buffer into the
//!   sink side until the sequence ends or the read side is dropped. The
//!   returned channel is pulled at the caller's pace; backpressure comes
//!   from the pipe's capacity.
//!
//! Consuming or dropping the returned channel ends the producer promptly:
//! its next write fails and it stops.

use crate::buffer::ByteBuffer;
use crate::kind::{Kind, Shape};
use crate::many::{ManyValues, ValueStream};
use crate::options::Options;
use crate::registry::ConversionRegistry;
use crate::source::ByteSource;
use crate::value::{InputStream, ReadableChannel, Value};
use async_stream::try_stream;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

/// Default bytes pulled per chunk when chunking a channel into a sequence.
const CHANNEL_CHUNK: usize = 4096;

/// Capacity of the in-memory pipe behind `many(byte-buffer) → readable-channel`.
const PIPE_CAPACITY: usize = 16 * 1024;

pub(crate) fn register(registry: &mut ConversionRegistry) {
  registry.register(
    Shape::ReadableChannel,
    Shape::InputStream,
    |value, _options| async move {
      let channel = value.into_readable_channel()?;
      Ok(match channel.into_inner() {
        Some(read) => Value::Stream(InputStream::from_boxed(read)),
        None => Value::input_stream(tokio::io::empty()),
      })
    },
  );

  registry.register(
    Shape::InputStream,
    Shape::ReadableChannel,
    |value, _options| async move {
      let stream = value.into_input_stream()?;
      Ok(match stream.into_inner() {
        Some(read) => Value::Channel(ReadableChannel::from_boxed(read)),
        None => Value::readable_channel(tokio::io::empty()),
      })
    },
  );

  registry.register(
    Shape::ReadableChannel,
    Kind::Many(Shape::ByteBuffer),
    |value, options| async move {
      let channel = value.into_readable_channel()?;
      Ok(Value::Many(chunked(channel, options)))
    },
  );

  registry.register(
    Kind::Many(Shape::ByteBuffer),
    Shape::ReadableChannel,
    |value, _options| async move {
      let seq = value.into_many()?;
      Ok(Value::Channel(piped(seq)))
    },
  );
}

/// Lazily chunks a readable channel into a sequence of byte buffers.
///
/// Each pull takes one chunk of `chunk-size` bytes (default 4096) from the
/// channel; the sequence ends when the channel does. The `direct?` option
/// yields direct buffers.
fn chunked(mut channel: ReadableChannel, options: Options) -> ManyValues {
  let chunk = options.chunk_size_or(CHANNEL_CHUNK);
  let stream: ValueStream = Box::pin(try_stream! {
    loop {
      match channel.take_bytes(chunk, &options).await? {
        Some(bytes) => {
          let buffer = if options.direct() {
            ByteBuffer::direct_copy(&bytes)
          } else {
            ByteBuffer::wrap(bytes)
          };
          yield Value::Buffer(buffer);
        }
        None => break,
      }
    }
  });
  ManyValues::new(Shape::ByteBuffer, stream)
}

/// Bridges a sequence of byte buffers into a readable channel.
///
/// One background producer owns the sink side of a bounded pipe and writes
/// each buffer's remaining bytes in order, closing the sink when the
/// sequence is exhausted. A failed write means the read side is gone and the
/// producer stops.
fn piped(mut seq: ManyValues) -> ReadableChannel {
  let (read_half, mut write_half) = tokio::io::duplex(PIPE_CAPACITY);
  tokio::spawn(async move {
    while let Some(item) = seq.next().await {
      match item.and_then(Value::into_buffer) {
        Ok(buffer) => {
          if let Err(e) = write_half.write_all(&buffer.peek_remaining()).await {
            debug!(error = %e, "pipe sink closed, stopping producer");
            return;
          }
        }
        Err(e) => {
          error!(error = %e, "sequence error while feeding pipe");
          break;
        }
      }
    }
    if let Err(e) = write_half.shutdown().await {
      debug!(error = %e, "pipe shutdown after producer finished");
    }
  });
  ReadableChannel::new(read_half)
}
