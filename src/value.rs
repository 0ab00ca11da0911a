//! The closed set of values that carry bytes.
//!
//! This module defines [`Value`], the runtime representation of everything the
//! conversion fabric moves around: byte strings, positioned buffers, strings,
//! character sequences, streams, channels, readers, file paths, and lazy
//! sequences of any of these. Each variant corresponds to one [`Shape`] in the
//! kind model, and [`Value::kind`] recovers the tag the planner works with.
//!
//! ## Overview
//!
//! - **In-memory shapes**: [`Value::Bytes`], [`Value::Buffer`], [`Value::Str`],
//!   [`Value::Chars`]
//! - **Streaming shapes**: [`Value::Stream`], [`Value::Channel`],
//!   [`Value::WChannel`], [`Value::OStream`], [`Value::Reader`]
//! - **External shapes**: [`Value::File`]
//! - **Sequences**: [`Value::Many`]
//!
//! Stream and channel variants own boxed `AsyncRead`/`AsyncWrite` trait
//! objects behind small wrapper types. The wrappers exist so the kind model
//! can tell an input stream from a readable channel: both read bytes, but
//! they are distinct nodes in the conversion graph with their own edges.
//!
//! ## Conversion accessors
//!
//! The `into_*` accessors unwrap a value into its concrete payload, reporting
//! an invariant error on a shape mismatch. They are the way converter
//! functions take delivery of their input, and the way callers take delivery
//! of a conversion result.

use crate::buffer::ByteBuffer;
use crate::error::ConvertError;
use crate::kind::{Kind, Shape};
use crate::many::ManyValues;
use crate::reader::Reader;
use bytes::Bytes;
use std::fmt;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncWrite};

/// A buffered stream of bytes.
pub struct InputStream {
  inner: Option<Box<dyn AsyncRead + Send + Unpin>>,
}

impl InputStream {
  /// Wraps a byte reader.
  pub fn new(read: impl AsyncRead + Send + Unpin + 'static) -> Self {
    Self {
      inner: Some(Box::new(read)),
    }
  }

  pub(crate) fn from_boxed(inner: Box<dyn AsyncRead + Send + Unpin>) -> Self {
    Self { inner: Some(inner) }
  }

  /// Releases the underlying reader, or `None` if already closed.
  pub fn into_inner(self) -> Option<Box<dyn AsyncRead + Send + Unpin>> {
    self.inner
  }

  pub(crate) fn inner_mut(&mut self) -> Option<&mut (dyn AsyncRead + Send + Unpin + '_)> {
    self.inner.as_mut().map(|b| b.as_mut() as &mut (dyn AsyncRead + Send + Unpin))
  }

  pub(crate) fn take_inner(&mut self) -> Option<Box<dyn AsyncRead + Send + Unpin>> {
    self.inner.take()
  }
}

/// A readable byte channel.
pub struct ReadableChannel {
  inner: Option<Box<dyn AsyncRead + Send + Unpin>>,
}

impl ReadableChannel {
  /// Wraps a byte reader.
  pub fn new(read: impl AsyncRead + Send + Unpin + 'static) -> Self {
    Self {
      inner: Some(Box::new(read)),
    }
  }

  pub(crate) fn from_boxed(inner: Box<dyn AsyncRead + Send + Unpin>) -> Self {
    Self { inner: Some(inner) }
  }

  /// Releases the underlying reader, or `None` if already closed.
  pub fn into_inner(self) -> Option<Box<dyn AsyncRead + Send + Unpin>> {
    self.inner
  }

  pub(crate) fn inner_mut(&mut self) -> Option<&mut (dyn AsyncRead + Send + Unpin + '_)> {
    self.inner.as_mut().map(|b| b.as_mut() as &mut (dyn AsyncRead + Send + Unpin))
  }

  pub(crate) fn take_inner(&mut self) -> Option<Box<dyn AsyncRead + Send + Unpin>> {
    self.inner.take()
  }
}

/// A raw byte output.
pub struct OutputStream {
  inner: Option<Box<dyn AsyncWrite + Send + Unpin>>,
}

impl OutputStream {
  /// Wraps a byte writer.
  pub fn new(write: impl AsyncWrite + Send + Unpin + 'static) -> Self {
    Self {
      inner: Some(Box::new(write)),
    }
  }

  pub(crate) fn inner_mut(&mut self) -> Option<&mut (dyn AsyncWrite + Send + Unpin + '_)> {
    self.inner.as_mut().map(|b| b.as_mut() as &mut (dyn AsyncWrite + Send + Unpin))
  }

  pub(crate) fn take_inner(&mut self) -> Option<Box<dyn AsyncWrite + Send + Unpin>> {
    self.inner.take()
  }
}

/// A writable byte channel.
pub struct WritableChannel {
  inner: Option<Box<dyn AsyncWrite + Send + Unpin>>,
}

impl WritableChannel {
  /// Wraps a byte writer.
  pub fn new(write: impl AsyncWrite + Send + Unpin + 'static) -> Self {
    Self {
      inner: Some(Box::new(write)),
    }
  }

  pub(crate) fn inner_mut(&mut self) -> Option<&mut (dyn AsyncWrite + Send + Unpin + '_)> {
    self.inner.as_mut().map(|b| b.as_mut() as &mut (dyn AsyncWrite + Send + Unpin))
  }

  pub(crate) fn take_inner(&mut self) -> Option<Box<dyn AsyncWrite + Send + Unpin>> {
    self.inner.take()
  }
}

/// An accumulated character sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSeq(String);

impl CharSeq {
  /// Creates an empty character sequence.
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends decoded characters.
  pub fn push_chars(&mut self, chars: &str) {
    self.0.push_str(chars);
  }

  /// Number of characters accumulated so far.
  pub fn len(&self) -> usize {
    self.0.chars().count()
  }

  /// Returns true if nothing has been accumulated.
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// A borrowed view of the accumulated characters.
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Materializes the sequence as an owned string.
  pub fn into_string(self) -> String {
    self.0
  }
}

impl From<String> for CharSeq {
  fn from(s: String) -> Self {
    CharSeq(s)
  }
}

/// A value that carries bytes.
#[derive(Debug)]
pub enum Value {
  /// An immutable byte string.
  Bytes(Bytes),
  /// A positioned byte buffer, plain or direct.
  Buffer(ByteBuffer),
  /// An owned string.
  Str(String),
  /// An accumulated character sequence.
  Chars(CharSeq),
  /// A buffered stream of bytes.
  Stream(InputStream),
  /// A readable byte channel.
  Channel(ReadableChannel),
  /// A writable byte channel.
  WChannel(WritableChannel),
  /// A raw byte output.
  OStream(OutputStream),
  /// A decoding character reader.
  Reader(Reader),
  /// A file path.
  File(PathBuf),
  /// A lazy sequence of values of one shape.
  Many(ManyValues),
}

impl Value {
  /// The concrete shape of this value.
  ///
  /// Sequences report their element shape through [`Value::kind`]; at the
  /// shape level a sequence reports the shape of its elements.
  pub fn shape(&self) -> Shape {
    match self {
      Value::Bytes(_) => Shape::Bytes,
      Value::Buffer(b) if b.is_direct() => Shape::DirectByteBuffer,
      Value::Buffer(_) => Shape::ByteBuffer,
      Value::Str(_) => Shape::Str,
      Value::Chars(_) => Shape::CharSeq,
      Value::Stream(_) => Shape::InputStream,
      Value::Channel(_) => Shape::ReadableChannel,
      Value::WChannel(_) => Shape::WritableChannel,
      Value::OStream(_) => Shape::OutputStream,
      Value::Reader(_) => Shape::Reader,
      Value::File(_) => Shape::File,
      Value::Many(seq) => seq.shape(),
    }
  }

  /// The kind of this value in the conversion graph.
  pub fn kind(&self) -> Kind {
    match self {
      Value::Many(seq) => Kind::Many(seq.shape()),
      other => Kind::One(other.shape()),
    }
  }

  /// Builds a lazy sequence from in-memory values.
  ///
  /// The element shape is taken from the first value without forcing anything
  /// past it.
  pub fn many(values: Vec<Value>) -> Self {
    Value::Many(ManyValues::from_values(values))
  }

  /// Wraps a byte reader as an input stream value.
  pub fn input_stream(read: impl AsyncRead + Send + Unpin + 'static) -> Self {
    Value::Stream(InputStream::new(read))
  }

  /// Wraps a byte reader as a readable channel value.
  pub fn readable_channel(read: impl AsyncRead + Send + Unpin + 'static) -> Self {
    Value::Channel(ReadableChannel::new(read))
  }

  /// Wraps a byte writer as a writable channel value.
  pub fn writable_channel(write: impl AsyncWrite + Send + Unpin + 'static) -> Self {
    Value::WChannel(WritableChannel::new(write))
  }

  /// Wraps a byte writer as an output stream value.
  pub fn output_stream(write: impl AsyncWrite + Send + Unpin + 'static) -> Self {
    Value::OStream(OutputStream::new(write))
  }

  /// Refers to a file by path.
  pub fn file(path: impl Into<PathBuf>) -> Self {
    Value::File(path.into())
  }

  /// Unwraps a byte string.
  pub fn into_bytes(self) -> Result<Bytes, ConvertError> {
    match self {
      Value::Bytes(b) => Ok(b),
      other => Err(ConvertError::unexpected_shape("bytes", other.kind())),
    }
  }

  /// Unwraps a byte buffer.
  pub fn into_buffer(self) -> Result<ByteBuffer, ConvertError> {
    match self {
      Value::Buffer(b) => Ok(b),
      other => Err(ConvertError::unexpected_shape("byte-buffer", other.kind())),
    }
  }

  /// Unwraps an owned string.
  pub fn into_string(self) -> Result<String, ConvertError> {
    match self {
      Value::Str(s) => Ok(s),
      other => Err(ConvertError::unexpected_shape("string", other.kind())),
    }
  }

  /// Unwraps a character sequence.
  pub fn into_chars(self) -> Result<CharSeq, ConvertError> {
    match self {
      Value::Chars(c) => Ok(c),
      other => Err(ConvertError::unexpected_shape(
        "char-sequence",
        other.kind(),
      )),
    }
  }

  /// Unwraps an input stream.
  pub fn into_input_stream(self) -> Result<InputStream, ConvertError> {
    match self {
      Value::Stream(s) => Ok(s),
      other => Err(ConvertError::unexpected_shape("input-stream", other.kind())),
    }
  }

  /// Unwraps a readable channel.
  pub fn into_readable_channel(self) -> Result<ReadableChannel, ConvertError> {
    match self {
      Value::Channel(c) => Ok(c),
      other => Err(ConvertError::unexpected_shape(
        "readable-channel",
        other.kind(),
      )),
    }
  }

  /// Unwraps a writable channel.
  pub fn into_writable_channel(self) -> Result<WritableChannel, ConvertError> {
    match self {
      Value::WChannel(c) => Ok(c),
      other => Err(ConvertError::unexpected_shape(
        "writable-channel",
        other.kind(),
      )),
    }
  }

  /// Unwraps an output stream.
  pub fn into_output_stream(self) -> Result<OutputStream, ConvertError> {
    match self {
      Value::OStream(o) => Ok(o),
      other => Err(ConvertError::unexpected_shape(
        "output-stream",
        other.kind(),
      )),
    }
  }

  /// Unwraps a decoding reader.
  pub fn into_reader(self) -> Result<Reader, ConvertError> {
    match self {
      Value::Reader(r) => Ok(r),
      other => Err(ConvertError::unexpected_shape("reader", other.kind())),
    }
  }

  /// Unwraps a file path.
  pub fn into_file_path(self) -> Result<PathBuf, ConvertError> {
    match self {
      Value::File(p) => Ok(p),
      other => Err(ConvertError::unexpected_shape("file", other.kind())),
    }
  }

  /// Unwraps a lazy sequence.
  pub fn into_many(self) -> Result<ManyValues, ConvertError> {
    match self {
      Value::Many(seq) => Ok(seq),
      other => Err(ConvertError::unexpected_shape("sequence", other.kind())),
    }
  }
}

/// The kind of a value. Free-function form of [`Value::kind`].
pub fn kind_of(value: &Value) -> Kind {
  value.kind()
}

/// A borrowed value stands in for its kind, so graph queries such as
/// [`possible_conversions`](crate::fabric::possible_conversions) accept a
/// value or a kind interchangeably.
impl From<&Value> for Kind {
  fn from(value: &Value) -> Self {
    value.kind()
  }
}

impl From<Bytes> for Value {
  fn from(b: Bytes) -> Self {
    Value::Bytes(b)
  }
}

impl From<Vec<u8>> for Value {
  fn from(b: Vec<u8>) -> Self {
    Value::Bytes(Bytes::from(b))
  }
}

impl From<ByteBuffer> for Value {
  fn from(b: ByteBuffer) -> Self {
    Value::Buffer(b)
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::Str(s)
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::Str(s.to_string())
  }
}

impl From<PathBuf> for Value {
  fn from(p: PathBuf) -> Self {
    Value::File(p)
  }
}

impl From<ManyValues> for Value {
  fn from(seq: ManyValues) -> Self {
    Value::Many(seq)
  }
}

impl fmt::Debug for InputStream {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("InputStream")
      .field("closed", &self.inner.is_none())
      .finish_non_exhaustive()
  }
}

impl fmt::Debug for ReadableChannel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ReadableChannel")
      .field("closed", &self.inner.is_none())
      .finish_non_exhaustive()
  }
}

impl fmt::Debug for OutputStream {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OutputStream")
      .field("closed", &self.inner.is_none())
      .finish_non_exhaustive()
  }
}

impl fmt::Debug for WritableChannel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WritableChannel")
      .field("closed", &self.inner.is_none())
      .finish_non_exhaustive()
  }
}
