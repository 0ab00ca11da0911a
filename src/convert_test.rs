use crate::buffer::ByteBuffer;
use crate::fabric::{self, Fabric};
use crate::kind::{Kind, Shape};
use crate::many::{ManyValues, ValueStream};
use crate::options::Options;
use crate::value::Value;
use bytes::Bytes;
use futures::StreamExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_bytes_decode_to_string() {
  let result = fabric::convert(vec![0x48u8, 0x69], Shape::Str, &Options::new())
    .await
    .unwrap();
  assert_eq!(result.into_string().unwrap(), "Hi");
}

#[tokio::test]
async fn test_string_encodes_to_bytes() {
  let result = fabric::convert("Hi", Shape::Bytes, &Options::new())
    .await
    .unwrap();
  assert_eq!(&result.into_bytes().unwrap()[..], &[0x48u8, 0x69]);
}

#[tokio::test]
async fn test_string_round_trips_under_an_encoding() {
  let options = Options::new().with_encoding("windows-1252");
  let encoded = fabric::convert("héllo wörld", Shape::Bytes, &options)
    .await
    .unwrap();
  let decoded = fabric::convert(encoded.into_bytes().unwrap(), Shape::Str, &options)
    .await
    .unwrap();
  assert_eq!(decoded.into_string().unwrap(), "héllo wörld");
}

#[tokio::test]
async fn test_utf16_bytes_decode() {
  let options = Options::new().with_encoding("utf-16le");
  let result = fabric::convert(vec![0x48u8, 0x00, 0x69, 0x00], Shape::Str, &options)
    .await
    .unwrap();
  assert_eq!(result.into_string().unwrap(), "Hi");
}

#[tokio::test]
async fn test_identity_conversion_returns_the_value_itself() {
  let backing = Bytes::from_static(b"unmoved");
  let value = Value::Buffer(ByteBuffer::wrap(backing.clone()));

  let result = fabric::convert(value, Shape::ByteBuffer, &Options::new())
    .await
    .unwrap();
  let buffer = result.into_buffer().unwrap();
  assert_eq!(buffer.to_bytes().as_ptr(), backing.as_ptr());
}

#[tokio::test]
async fn test_direct_buffer_is_accepted_as_byte_buffer() {
  let value = Value::Buffer(ByteBuffer::direct_copy(b"abc"));
  let result = fabric::convert(value, Shape::ByteBuffer, &Options::new())
    .await
    .unwrap();
  assert!(result.into_buffer().unwrap().is_direct());
}

#[tokio::test]
async fn test_bytes_wrap_into_buffer_without_copy() {
  let backing = Bytes::from_static(b"shared");
  let result = fabric::convert(backing.clone(), Shape::ByteBuffer, &Options::new())
    .await
    .unwrap();
  let buffer = result.into_buffer().unwrap();
  assert_eq!(buffer.position(), 0);
  assert_eq!(buffer.to_bytes().as_ptr(), backing.as_ptr());
}

#[tokio::test]
async fn test_bytes_to_direct_buffer_copies() {
  let backing = Bytes::from_static(b"copied");
  let result = fabric::convert(backing.clone(), Shape::DirectByteBuffer, &Options::new())
    .await
    .unwrap();
  let buffer = result.into_buffer().unwrap();
  assert!(buffer.is_direct());
  assert_eq!(buffer.position(), 0);
  assert_ne!(buffer.to_bytes().as_ptr(), backing.as_ptr());
  assert_eq!(&buffer.to_bytes()[..], b"copied");
}

#[tokio::test]
async fn test_buffer_to_bytes_round_trip() {
  let original = Bytes::from_static(b"round trip");
  let buffer = fabric::convert(original.clone(), Shape::ByteBuffer, &Options::new())
    .await
    .unwrap();
  let back = fabric::convert(buffer, Shape::Bytes, &Options::new())
    .await
    .unwrap();
  assert_eq!(back.into_bytes().unwrap(), original);
}

#[tokio::test]
async fn test_buffer_sequence_collapses_in_order() {
  let seq = Value::many(vec![
    ByteBuffer::wrap(&b"AB"[..]).into(),
    ByteBuffer::wrap(&b"CD"[..]).into(),
    ByteBuffer::wrap(&b"E"[..]).into(),
  ]);

  let result = fabric::convert(seq, Shape::ByteBuffer, &Options::new())
    .await
    .unwrap();
  let buffer = result.into_buffer().unwrap();
  assert_eq!(buffer.remaining(), 5);
  assert_eq!(buffer.position(), 0);
  assert_eq!(&buffer.to_bytes()[..], b"ABCDE");
}

#[tokio::test]
async fn test_collapse_honors_the_direct_option() {
  let seq = Value::many(vec![ByteBuffer::wrap(&b"xy"[..]).into()]);
  let result = fabric::convert(seq, Shape::ByteBuffer, &Options::new().with_direct(true))
    .await
    .unwrap();
  assert!(result.into_buffer().unwrap().is_direct());
}

#[tokio::test]
async fn test_channel_chunks_into_buffer_sequence() {
  let data: Vec<u8> = (0..10_000).map(|i| (i % 251) as u8).collect();
  let channel = Value::readable_channel(std::io::Cursor::new(data.clone()));

  let result = fabric::convert(
    channel,
    Kind::Many(Shape::ByteBuffer),
    &Options::new().with_chunk_size(4096),
  )
  .await
  .unwrap();

  let mut seq = result.into_many().unwrap();
  let mut sizes = Vec::new();
  let mut collected = Vec::new();
  while let Some(item) = seq.next().await {
    let buffer = item.unwrap().into_buffer().unwrap();
    sizes.push(buffer.remaining());
    collected.extend_from_slice(&buffer.peek_remaining());
  }
  assert_eq!(sizes, vec![4096, 4096, 1808]);
  assert_eq!(collected, data);
}

#[tokio::test]
async fn test_lifted_sequence_conversion_is_lazy() {
  let pulled = Arc::new(AtomicUsize::new(0));
  let counter = pulled.clone();
  let stream: ValueStream = Box::pin(futures::stream::iter(vec![b"a", b"b", b"c"]).map(
    move |chunk| {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok(Value::from(chunk.to_vec()))
    },
  ));
  let seq = Value::Many(ManyValues::new(Shape::Bytes, stream));

  let result = fabric::convert(seq, Kind::Many(Shape::ByteBuffer), &Options::new())
    .await
    .unwrap();
  let mut converted = result.into_many().unwrap();
  assert_eq!(pulled.load(Ordering::SeqCst), 0);

  let first = converted.next().await.unwrap().unwrap();
  assert_eq!(&first.into_buffer().unwrap().to_bytes()[..], b"a");
  assert_eq!(pulled.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_string_reaches_char_sequence_through_a_reader() {
  let result = fabric::convert("Hello", Shape::CharSeq, &Options::new())
    .await
    .unwrap();
  assert_eq!(result.into_chars().unwrap().as_str(), "Hello");
}

#[tokio::test]
async fn test_no_path_is_an_error_naming_both_kinds() {
  let err = fabric::convert(vec![1u8], Shape::WritableChannel, &Options::new())
    .await
    .unwrap_err();
  let message = err.to_string();
  assert!(message.contains("don't know how to convert"));
  assert!(message.contains("bytes"));
  assert!(message.contains("writable-channel"));
}

#[tokio::test]
async fn test_sequence_source_is_named_in_no_path_errors() {
  let seq = Value::many(vec![Value::from("a")]);
  let err = fabric::convert(seq, Shape::File, &Options::new())
    .await
    .unwrap_err();
  assert!(err.to_string().contains("many(string)"));
}

#[test]
fn test_possible_conversions_from_string() {
  let reachable = fabric::possible_conversions(Shape::Str);
  for expected in [
    Kind::One(Shape::Bytes),
    Kind::One(Shape::ByteBuffer),
    Kind::One(Shape::DirectByteBuffer),
    Kind::One(Shape::InputStream),
    Kind::One(Shape::ReadableChannel),
    Kind::One(Shape::Reader),
    Kind::One(Shape::CharSeq),
  ] {
    assert!(
      reachable.contains(&expected),
      "missing {} in {:?}",
      expected,
      reachable
    );
  }
}

#[test]
fn test_possible_conversions_accepts_a_value() {
  // A value in hand works as the query, not just its kind.
  let value = Value::from("Hi");
  assert_eq!(
    fabric::possible_conversions(&value),
    fabric::possible_conversions(Shape::Str)
  );
}

#[test]
fn test_conversion_path_is_exposed_for_diagnostics() {
  let path = fabric::conversion_path(Shape::Str, Shape::Bytes).unwrap();
  assert_eq!(path, vec![Kind::One(Shape::Str), Kind::One(Shape::Bytes)]);
}

#[tokio::test]
async fn test_registered_conversions_are_planned_immediately() {
  let fabric = Fabric::new();
  fabric.register_conversion(Shape::Str, Shape::CharSeq, |value, _options| async move {
    Ok(Value::Chars(value.into_string()?.into()))
  });

  let path = fabric.conversion_path(Shape::Str, Shape::CharSeq).unwrap();
  assert_eq!(path.len(), 2);

  let result = fabric
    .convert("direct now", Shape::CharSeq, &Options::new())
    .await
    .unwrap();
  assert_eq!(result.into_chars().unwrap().as_str(), "direct now");
}

#[tokio::test]
async fn test_sequence_errors_surface_on_pull() {
  let stream: ValueStream = Box::pin(futures::stream::iter(vec![
    Ok(Value::Buffer(ByteBuffer::wrap(&b"ok"[..]))),
    Err(crate::error::ConvertError::Invariant(
      "poisoned element".to_string(),
    )),
  ]));
  let seq = Value::Many(ManyValues::new(Shape::ByteBuffer, stream));

  let result = fabric::convert(seq, Kind::Many(Shape::Bytes), &Options::new())
    .await
    .unwrap();
  let mut converted = result.into_many().unwrap();

  assert!(converted.next().await.unwrap().is_ok());
  let err = converted.next().await.unwrap().unwrap_err();
  assert!(err.to_string().contains("poisoned element"));
}
