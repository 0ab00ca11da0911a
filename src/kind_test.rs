use crate::buffer::ByteBuffer;
use crate::kind::{assignable, Capability, Kind, Shape};
use crate::value::{kind_of, Value};

#[test]
fn test_shape_display_names() {
  assert_eq!(Shape::Bytes.to_string(), "bytes");
  assert_eq!(Shape::ByteBuffer.to_string(), "byte-buffer");
  assert_eq!(Shape::DirectByteBuffer.to_string(), "direct-byte-buffer");
  assert_eq!(Shape::InputStream.to_string(), "input-stream");
  assert_eq!(Shape::ReadableChannel.to_string(), "readable-channel");
  assert_eq!(Shape::CharSeq.to_string(), "char-sequence");
}

#[test]
fn test_kind_display_names() {
  assert_eq!(Kind::One(Shape::Str).to_string(), "string");
  assert_eq!(Kind::Cap(Capability::Source).to_string(), "byte-source");
  assert_eq!(Kind::Many(Shape::ByteBuffer).to_string(), "many(byte-buffer)");
}

#[test]
fn test_shape_subtype_of_itself() {
  assert!(Shape::Bytes.subtype_of(Shape::Bytes));
  assert!(!Shape::Bytes.subtype_of(Shape::Str));
}

#[test]
fn test_direct_buffer_is_a_byte_buffer() {
  assert!(Shape::DirectByteBuffer.subtype_of(Shape::ByteBuffer));
  assert!(!Shape::ByteBuffer.subtype_of(Shape::DirectByteBuffer));
}

#[test]
fn test_assignable_shape_to_capability() {
  assert!(assignable(
    Kind::One(Shape::InputStream),
    Kind::Cap(Capability::Source)
  ));
  assert!(assignable(
    Kind::One(Shape::WritableChannel),
    Kind::Cap(Capability::Sink)
  ));
  assert!(!assignable(
    Kind::One(Shape::Bytes),
    Kind::Cap(Capability::Source)
  ));
}

#[test]
fn test_assignable_direct_buffer_implements_source() {
  // direct-byte-buffer implements byte-source through its supertype.
  assert!(assignable(
    Kind::One(Shape::DirectByteBuffer),
    Kind::Cap(Capability::Source)
  ));
}

#[test]
fn test_assignable_many_lifts_pointwise() {
  assert!(assignable(
    Kind::Many(Shape::DirectByteBuffer),
    Kind::Many(Shape::ByteBuffer)
  ));
  assert!(!assignable(
    Kind::Many(Shape::Bytes),
    Kind::Many(Shape::Str)
  ));
}

#[test]
fn test_assignable_one_is_never_many() {
  assert!(!assignable(
    Kind::One(Shape::ByteBuffer),
    Kind::Many(Shape::ByteBuffer)
  ));
  assert!(!assignable(
    Kind::Many(Shape::ByteBuffer),
    Kind::One(Shape::ByteBuffer)
  ));
}

#[test]
fn test_kind_of_scalar_values() {
  assert_eq!(kind_of(&Value::from(vec![1u8, 2])), Kind::One(Shape::Bytes));
  assert_eq!(kind_of(&Value::from("hi")), Kind::One(Shape::Str));
  assert_eq!(
    kind_of(&Value::file("/tmp/in.bin")),
    Kind::One(Shape::File)
  );
}

#[test]
fn test_kind_of_buffers_tracks_directness() {
  let wrapped = Value::Buffer(ByteBuffer::wrap(vec![1u8, 2, 3]));
  assert_eq!(wrapped.kind(), Kind::One(Shape::ByteBuffer));

  let direct = Value::Buffer(ByteBuffer::direct_copy(&[1u8, 2, 3]));
  assert_eq!(direct.kind(), Kind::One(Shape::DirectByteBuffer));
}

#[test]
fn test_kind_of_sequence_peeks_first_element_only() {
  let seq = Value::many(vec![
    Value::Buffer(ByteBuffer::wrap(vec![1u8])),
    Value::from("not inspected"),
  ]);
  assert_eq!(seq.kind(), Kind::Many(Shape::ByteBuffer));
}

#[test]
fn test_kind_of_empty_sequence() {
  assert_eq!(
    Value::many(Vec::new()).kind(),
    Kind::Many(Shape::ByteBuffer)
  );
}

#[test]
fn test_capability_implementors() {
  assert_eq!(
    Capability::Sink.implementors(),
    &[Shape::OutputStream, Shape::WritableChannel]
  );
  assert!(Capability::Source.implementors().contains(&Shape::ByteBuffer));
  assert!(Capability::Closeable.implementors().contains(&Shape::Reader));
}
