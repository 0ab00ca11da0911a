//! Lazy sequences of values.
//!
//! [`ManyValues`] is the runtime form of a `many(shape)` kind: a pinned, boxed,
//! possibly infinite stream of values, all of one element shape. Sequences are
//! pulled on demand; errors surface on pull rather than at construction.
//!
//! Converters lift over sequences lazily: mapping a conversion over a
//! `ManyValues` wraps the stream, so forcing the first `k` elements of the
//! output consumes at most `k` elements of the input.

use crate::error::ConvertError;
use crate::kind::Shape;
use crate::options::Options;
use crate::registry::ConvertFn;
use crate::value::Value;
use futures::stream::{self, Stream, StreamExt};
use std::fmt;
use std::pin::Pin;

/// A pinned, boxed stream of conversion values.
pub type ValueStream = Pin<Box<dyn Stream<Item = Result<Value, ConvertError>> + Send>>;

/// A lazy, forward-only sequence of values of one shape.
pub struct ManyValues {
  shape: Shape,
  stream: ValueStream,
}

impl ManyValues {
  /// Wraps a stream whose items all carry the given element shape.
  pub fn new(shape: Shape, stream: ValueStream) -> Self {
    Self { shape, stream }
  }

  /// Builds a sequence from in-memory values.
  ///
  /// The element shape is taken from the first value; nothing past the first
  /// element is inspected. An empty sequence carries the byte-buffer shape,
  /// which is the only shape an empty sequence can usefully collapse to.
  pub fn from_values(values: Vec<Value>) -> Self {
    let shape = values
      .first()
      .map(|value| value.shape())
      .unwrap_or(Shape::ByteBuffer);
    Self {
      shape,
      stream: Box::pin(stream::iter(values.into_iter().map(Ok))),
    }
  }

  /// The element shape of this sequence.
  pub fn shape(&self) -> Shape {
    self.shape
  }

  /// Lifts a single-value conversion over this sequence.
  ///
  /// The returned sequence is itself lazy: each pull converts exactly one
  /// element. A failed element conversion surfaces as an error item.
  pub fn map_converted(self, dst: Shape, converter: ConvertFn, options: Options) -> Self {
    let stream = self.stream.then(move |item| {
      let converter = converter.clone();
      let options = options.clone();
      async move {
        match item {
          Ok(value) => converter(value, options).await,
          Err(e) => Err(e),
        }
      }
    });
    Self {
      shape: dst,
      stream: Box::pin(stream),
    }
  }

  /// Pulls the next value.
  pub async fn next(&mut self) -> Option<Result<Value, ConvertError>> {
    self.stream.next().await
  }

  /// Unwraps the underlying stream.
  pub fn into_stream(self) -> ValueStream {
    self.stream
  }
}

impl fmt::Debug for ManyValues {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ManyValues")
      .field("shape", &self.shape)
      .finish_non_exhaustive()
  }
}
