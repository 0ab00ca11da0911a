//! Kind model for the conversion graph.
//!
//! This module defines the tags that identify participants in conversion:
//! concrete value shapes, behavioral capabilities, and the one-deep `many`
//! lifting over shapes. Kinds are the nodes of the conversion graph; the
//! planner searches over them and every registered converter is keyed by a
//! `(source kind, destination kind)` pair.
//!
//! ## Overview
//!
//! - **[`Shape`]**: a concrete value shape (bytes, byte buffer, input stream, ...)
//! - **[`Capability`]**: a behavioral contract implemented by one or more shapes
//! - **[`Kind`]**: a shape, a capability, or a lazy sequence of a shape
//!
//! ## Assignability
//!
//! [`assignable`] is the "acceptable where expected" relation. A direct byte
//! buffer is acceptable wherever a byte buffer is expected; a shape is
//! acceptable wherever a capability it implements is expected; `many(a)` is
//! acceptable as `many(b)` exactly when `a` is acceptable as `b`.
//!
//! `many(many(k))` is unrepresentable: [`Kind::Many`] wraps a [`Shape`], never
//! another [`Kind`]. Capabilities are expanded to their implementing shapes
//! before lifting, so a `many` over a capability never appears as a graph node.

use std::fmt;

/// A concrete value shape that can participate in conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
  /// An immutable byte string.
  Bytes,
  /// A positioned view over a byte string.
  ByteBuffer,
  /// A byte buffer backed by a private allocation.
  DirectByteBuffer,
  /// A buffered stream of bytes.
  InputStream,
  /// A readable byte channel.
  ReadableChannel,
  /// A writable byte channel.
  WritableChannel,
  /// A raw byte output.
  OutputStream,
  /// An owned string.
  Str,
  /// A decoding character reader.
  Reader,
  /// An accumulated character sequence.
  CharSeq,
  /// A file path.
  File,
}

impl Shape {
  /// Returns true if a value of this shape is acceptable wherever `other` is
  /// expected.
  pub fn subtype_of(self, other: Shape) -> bool {
    self == other || (self == Shape::DirectByteBuffer && other == Shape::ByteBuffer)
  }

  /// Returns true if this shape implements the given capability.
  pub fn implements(self, capability: Capability) -> bool {
    capability
      .implementors()
      .iter()
      .any(|shape| self.subtype_of(*shape))
  }
}

impl fmt::Display for Shape {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Shape::Bytes => "bytes",
      Shape::ByteBuffer => "byte-buffer",
      Shape::DirectByteBuffer => "direct-byte-buffer",
      Shape::InputStream => "input-stream",
      Shape::ReadableChannel => "readable-channel",
      Shape::WritableChannel => "writable-channel",
      Shape::OutputStream => "output-stream",
      Shape::Str => "string",
      Shape::Reader => "reader",
      Shape::CharSeq => "char-sequence",
      Shape::File => "file",
    };
    write!(f, "{}", name)
  }
}

/// A behavioral contract identified in the conversion graph.
///
/// Capabilities are valid conversion destinations: converting to a capability
/// resolves to the nearest shape that implements it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
  /// Something bytes can be pulled from. See [`crate::source::ByteSource`].
  Source,
  /// Something bytes can be pushed into. See [`crate::sink::ByteSink`].
  Sink,
  /// Something that can be closed. See [`crate::closeable::Closeable`].
  Closeable,
}

impl Capability {
  /// The concrete shapes implementing this capability, in resolution order.
  pub fn implementors(self) -> &'static [Shape] {
    match self {
      Capability::Source => &[Shape::InputStream, Shape::ReadableChannel, Shape::ByteBuffer],
      Capability::Sink => &[Shape::OutputStream, Shape::WritableChannel],
      Capability::Closeable => &[
        Shape::InputStream,
        Shape::ReadableChannel,
        Shape::WritableChannel,
        Shape::OutputStream,
        Shape::Reader,
      ],
    }
  }
}

impl fmt::Display for Capability {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Capability::Source => "byte-source",
      Capability::Sink => "byte-sink",
      Capability::Closeable => "closeable",
    };
    write!(f, "{}", name)
  }
}

/// A tag identifying a participant in the conversion graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
  /// A single value of a concrete shape.
  One(Shape),
  /// A behavioral contract.
  Cap(Capability),
  /// A lazy, forward-only sequence of values of a concrete shape.
  Many(Shape),
}

impl From<Shape> for Kind {
  fn from(shape: Shape) -> Self {
    Kind::One(shape)
  }
}

impl From<Capability> for Kind {
  fn from(capability: Capability) -> Self {
    Kind::Cap(capability)
  }
}

impl fmt::Display for Kind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Kind::One(shape) => write!(f, "{}", shape),
      Kind::Cap(capability) => write!(f, "{}", capability),
      Kind::Many(shape) => write!(f, "many({})", shape),
    }
  }
}

/// Returns true if a value of kind `a` is acceptable wherever kind `b` is
/// expected.
///
/// Shape-to-shape uses the subtype relation, shape-to-capability uses
/// capability membership, `many`-to-`many` recurses on the element shapes, and
/// everything else requires equality.
pub fn assignable(a: Kind, b: Kind) -> bool {
  match (a, b) {
    (Kind::One(x), Kind::One(y)) => x.subtype_of(y),
    (Kind::One(x), Kind::Cap(c)) => x.implements(c),
    (Kind::Cap(c), Kind::Cap(d)) => c == d,
    (Kind::Many(x), Kind::Many(y)) => x.subtype_of(y),
    _ => false,
  }
}
