//! Converters between byte strings and byte buffers.
//!
//! The in-memory corner of the graph. Wrapping is zero-copy wherever the
//! backing allocation can be shared; the direct edge and the sequence
//! reducer are the two places bytes are actually moved.

use crate::buffer::ByteBuffer;
use crate::error::ConvertError;
use crate::kind::{Kind, Shape};
use crate::options::Options;
use crate::registry::ConversionRegistry;
use crate::value::Value;
use bytes::BytesMut;

pub(crate) fn register(registry: &mut ConversionRegistry) {
  registry.register(Shape::Bytes, Shape::ByteBuffer, |value, _options| async move {
    Ok(Value::Buffer(ByteBuffer::wrap(value.into_bytes()?)))
  });

  registry.register(
    Shape::Bytes,
    Shape::DirectByteBuffer,
    |value, _options| async move {
      Ok(Value::Buffer(ByteBuffer::direct_copy(&value.into_bytes()?)))
    },
  );

  registry.register(Shape::Bytes, Shape::InputStream, |value, _options| async move {
    let bytes = value.into_bytes()?;
    Ok(Value::input_stream(std::io::Cursor::new(bytes)))
  });

  registry.register(Shape::ByteBuffer, Shape::Bytes, |value, _options| async move {
    // The buffer's position is not consumed: remaining bytes are returned as
    // a shared view.
    Ok(Value::Bytes(value.into_buffer()?.to_bytes()))
  });

  registry.register(Kind::Many(Shape::ByteBuffer), Shape::ByteBuffer, collapse);
}

/// Collapses a sequence of byte buffers into one buffer.
///
/// Drains the sequence, sums the remaining lengths, copies each buffer's
/// remaining span in order, and returns a buffer positioned at zero. The
/// `direct?` option marks the result direct; the copy into a private
/// allocation happens either way.
async fn collapse(value: Value, options: Options) -> Result<Value, ConvertError> {
  let mut seq = value.into_many()?;
  let mut parts: Vec<ByteBuffer> = Vec::new();
  while let Some(item) = seq.next().await {
    parts.push(item?.into_buffer()?);
  }
  let total: usize = parts.iter().map(|part| part.remaining()).sum();
  let mut out = BytesMut::with_capacity(total);
  for part in &parts {
    out.extend_from_slice(&part.peek_remaining());
  }
  let mut buffer = ByteBuffer::wrap(out.freeze());
  if options.direct() {
    buffer = buffer.into_direct();
  }
  Ok(Value::Buffer(buffer))
}
