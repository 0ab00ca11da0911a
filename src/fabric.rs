//! The conversion fabric and its public surface.
//!
//! [`Fabric`] ties the registry, the planner, and the driver into the
//! in-process API: convert a value to a kind, transfer bytes from a source
//! to a sink, inspect the graph, extend it. A process-wide default fabric
//! seeded with the built-in converters backs the free functions, which are
//! the surface most callers use.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use byteweave::fabric::{to_bytes, to_byte_buffer};
//! use byteweave::options::Options;
//! use byteweave::value::Value;
//!
//! # async fn example() -> Result<(), byteweave::error::ConvertError> {
//! let options = Options::new();
//! let bytes = to_bytes(Value::from("Hi"), &options).await?;
//! assert_eq!(&bytes[..], b"Hi");
//!
//! let buffer = to_byte_buffer(Value::from(vec![1u8, 2, 3]), &options).await?;
//! assert_eq!(buffer.remaining(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Locking
//!
//! The registry sits behind a read-write lock and is effectively write-once:
//! the seed set is installed at construction and later registrations are
//! rare. Conversion resolves its steps under a short read lock, cloning the
//! converter handles out, and never holds the lock across an await.
//! Registration takes the write lock and invalidates the planner cache.

use crate::converters::{self, text};
use crate::driver;
use crate::error::ConvertError;
use crate::kind::{Capability, Kind};
use crate::options::Options;
use crate::planner::{self, PathPlanner};
use crate::pump;
use crate::registry::{ConversionRegistry, TransferFn};
use crate::sink::BoxByteSink;
use crate::source::BoxByteSource;
use crate::value::{InputStream, ReadableChannel, Value};
use bytes::Bytes;
use once_cell::sync::Lazy;
use std::future::Future;
use std::sync::RwLock;
use tracing::debug;

/// A conversion graph, its planner, and the operations over them.
pub struct Fabric {
  registry: RwLock<ConversionRegistry>,
  planner: PathPlanner,
}

impl Fabric {
  /// Creates a fabric seeded with the built-in converter set.
  pub fn new() -> Self {
    let mut registry = ConversionRegistry::new();
    converters::register_defaults(&mut registry);
    Self {
      registry: RwLock::new(registry),
      planner: PathPlanner::new(),
    }
  }

  /// Creates a fabric with an empty registry.
  pub fn empty() -> Self {
    Self {
      registry: RwLock::new(ConversionRegistry::new()),
      planner: PathPlanner::new(),
    }
  }

  /// Converts a value to the given destination kind.
  ///
  /// When the value's kind is already acceptable as the destination, the
  /// value is returned as-is: identity, no copy. Otherwise the planner finds
  /// the shortest chain of registered converters and the driver applies it,
  /// threading `options` through every step.
  pub async fn convert(
    &self,
    value: impl Into<Value>,
    dst: impl Into<Kind>,
    options: &Options,
  ) -> Result<Value, ConvertError> {
    self.convert_value(value.into(), dst.into(), options).await
  }

  pub(crate) async fn convert_value(
    &self,
    value: Value,
    dst: Kind,
    options: &Options,
  ) -> Result<Value, ConvertError> {
    let src = value.kind();
    let steps = {
      let registry = self.registry.read().unwrap();
      let path = self
        .planner
        .plan(&registry, src, dst)
        .ok_or(ConvertError::NoPath { src, dst })?;
      driver::plan_steps(&registry, &path)?
    };
    driver::run(steps, value, options).await
  }

  /// Moves every byte from `source` to `sink`.
  ///
  /// Resolves a specialized transfer when one is registered, falling back to
  /// the generic pump over the byte-source and byte-sink capabilities. Both
  /// endpoints are closed on completion.
  pub async fn transfer(
    &self,
    source: impl Into<Value>,
    sink: impl Into<Value>,
    options: &Options,
  ) -> Result<(), ConvertError> {
    pump::run_transfer(self, source.into(), sink.into(), options).await
  }

  /// Enumerates every kind reachable from `kind` through the graph.
  ///
  /// Accepts a kind, or a borrowed value standing in for its kind.
  pub fn possible_conversions(&self, kind: impl Into<Kind>) -> Vec<Kind> {
    planner::reachable(&self.registry.read().unwrap(), kind.into())
  }

  /// Exposes the planner's node path from `src` to `dst`, for diagnostics.
  pub fn conversion_path(&self, src: impl Into<Kind>, dst: impl Into<Kind>) -> Option<Vec<Kind>> {
    let registry = self.registry.read().unwrap();
    self
      .planner
      .plan(&registry, src.into(), dst.into())
      .map(|path| path.as_ref().clone())
  }

  /// Registers a direct converter and invalidates the planner cache.
  pub fn register_conversion<F, Fut>(
    &self,
    src: impl Into<Kind>,
    dst: impl Into<Kind>,
    converter: F,
  ) where
    F: Fn(Value, Options) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ConvertError>> + Send + 'static,
  {
    let (src, dst): (Kind, Kind) = (src.into(), dst.into());
    debug!(src = %src, dst = %dst, "registering conversion");
    self.registry.write().unwrap().register(src, dst, converter);
    self.planner.invalidate();
  }

  /// Registers a specialized transfer and invalidates the planner cache.
  ///
  /// A registered transfer owns the whole move, including closing both
  /// endpoints on normal completion.
  pub fn register_transfer<F, Fut>(&self, src: impl Into<Kind>, dst: impl Into<Kind>, transfer: F)
  where
    F: Fn(Value, Value, Options) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ConvertError>> + Send + 'static,
  {
    let (src, dst): (Kind, Kind) = (src.into(), dst.into());
    debug!(src = %src, dst = %dst, "registering transfer");
    self
      .registry
      .write()
      .unwrap()
      .register_transfer(src, dst, transfer);
    self.planner.invalidate();
  }

  /// Finds the registered transfer reachable from both endpoints at the
  /// lowest combined conversion distance.
  pub(crate) fn plan_specialized(&self, src: Kind, dst: Kind) -> Option<(Kind, Kind, TransferFn)> {
    let registry = self.registry.read().unwrap();
    let mut best: Option<(usize, Kind, Kind, TransferFn)> = None;
    for (s, d, transfer) in registry.transfer_entries() {
      let Some(src_path) = self.planner.plan(&registry, src, s) else {
        continue;
      };
      let Some(dst_path) = self.planner.plan(&registry, dst, d) else {
        continue;
      };
      let cost = (src_path.len() - 1) + (dst_path.len() - 1);
      if best.as_ref().map_or(true, |(c, _, _, _)| cost < *c) {
        best = Some((cost, s, d, transfer));
      }
    }
    best.map(|(_, s, d, transfer)| (s, d, transfer))
  }

  /// Adapts a value into a boxed byte source.
  pub async fn to_byte_source(
    &self,
    value: impl Into<Value>,
    options: &Options,
  ) -> Result<BoxByteSource, ConvertError> {
    let converted = self.convert(value, Capability::Source, options).await?;
    Ok(match converted {
      Value::Stream(stream) => Box::new(stream),
      Value::Channel(channel) => Box::new(channel),
      Value::Buffer(buffer) => Box::new(buffer),
      other => {
        return Err(ConvertError::unexpected_shape("byte-source", other.kind()));
      }
    })
  }

  /// Adapts a value into a boxed byte sink.
  pub async fn to_byte_sink(
    &self,
    value: impl Into<Value>,
    options: &Options,
  ) -> Result<BoxByteSink, ConvertError> {
    let converted = self.convert(value, Capability::Sink, options).await?;
    Ok(match converted {
      Value::OStream(stream) => Box::new(stream),
      Value::WChannel(channel) => Box::new(channel),
      other => {
        return Err(ConvertError::unexpected_shape("byte-sink", other.kind()));
      }
    })
  }
}

impl Default for Fabric {
  fn default() -> Self {
    Self::new()
  }
}

/// The process-wide default fabric, seeded with the built-in converters.
static DEFAULT_FABRIC: Lazy<Fabric> = Lazy::new(Fabric::new);

/// The process-wide default fabric backing the free functions.
pub fn default_fabric() -> &'static Fabric {
  &DEFAULT_FABRIC
}

/// Converts a value to the given destination kind. See [`Fabric::convert`].
pub async fn convert(
  value: impl Into<Value>,
  dst: impl Into<Kind>,
  options: &Options,
) -> Result<Value, ConvertError> {
  DEFAULT_FABRIC.convert(value, dst, options).await
}

/// Moves every byte from `source` to `sink`. See [`Fabric::transfer`].
pub async fn transfer(
  source: impl Into<Value>,
  sink: impl Into<Value>,
  options: &Options,
) -> Result<(), ConvertError> {
  DEFAULT_FABRIC.transfer(source, sink, options).await
}

/// Enumerates every kind reachable from `kind` through the graph.
///
/// Accepts a kind, or a borrowed value standing in for its kind.
pub fn possible_conversions(kind: impl Into<Kind>) -> Vec<Kind> {
  DEFAULT_FABRIC.possible_conversions(kind)
}

/// Exposes the planner's node path, for diagnostics.
pub fn conversion_path(src: impl Into<Kind>, dst: impl Into<Kind>) -> Option<Vec<Kind>> {
  DEFAULT_FABRIC.conversion_path(src, dst)
}

/// Registers a direct converter in the default fabric.
pub fn register_conversion<F, Fut>(src: impl Into<Kind>, dst: impl Into<Kind>, converter: F)
where
  F: Fn(Value, Options) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Value, ConvertError>> + Send + 'static,
{
  DEFAULT_FABRIC.register_conversion(src, dst, converter);
}

/// Registers a specialized transfer in the default fabric.
pub fn register_transfer<F, Fut>(src: impl Into<Kind>, dst: impl Into<Kind>, transfer: F)
where
  F: Fn(Value, Value, Options) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<(), ConvertError>> + Send + 'static,
{
  DEFAULT_FABRIC.register_transfer(src, dst, transfer);
}

/// Converts to an immutable byte string.
pub async fn to_bytes(value: impl Into<Value>, options: &Options) -> Result<Bytes, ConvertError> {
  DEFAULT_FABRIC
    .convert(value, crate::kind::Shape::Bytes, options)
    .await?
    .into_bytes()
}

/// Converts to a positioned byte buffer.
pub async fn to_byte_buffer(
  value: impl Into<Value>,
  options: &Options,
) -> Result<crate::buffer::ByteBuffer, ConvertError> {
  DEFAULT_FABRIC
    .convert(value, crate::kind::Shape::ByteBuffer, options)
    .await?
    .into_buffer()
}

/// Converts to a buffered input stream.
pub async fn to_input_stream(
  value: impl Into<Value>,
  options: &Options,
) -> Result<InputStream, ConvertError> {
  DEFAULT_FABRIC
    .convert(value, crate::kind::Shape::InputStream, options)
    .await?
    .into_input_stream()
}

/// Converts to a readable byte channel.
pub async fn to_readable_channel(
  value: impl Into<Value>,
  options: &Options,
) -> Result<ReadableChannel, ConvertError> {
  DEFAULT_FABRIC
    .convert(value, crate::kind::Shape::ReadableChannel, options)
    .await?
    .into_readable_channel()
}

/// Adapts a value into a boxed byte source.
pub async fn to_byte_source(
  value: impl Into<Value>,
  options: &Options,
) -> Result<BoxByteSource, ConvertError> {
  DEFAULT_FABRIC.to_byte_source(value, options).await
}

/// Adapts a value into a boxed byte sink.
pub async fn to_byte_sink(
  value: impl Into<Value>,
  options: &Options,
) -> Result<BoxByteSink, ConvertError> {
  DEFAULT_FABRIC.to_byte_sink(value, options).await
}

/// Materializes a value as a lazy stream of newline-delimited lines.
///
/// The value is converted to a decoding reader under the `encoding` option,
/// then split on line boundaries as it is pulled.
pub async fn to_line_seq(
  value: impl Into<Value>,
  options: &Options,
) -> Result<text::LineStream, ConvertError> {
  let reader = DEFAULT_FABRIC
    .convert(value, crate::kind::Shape::Reader, options)
    .await?
    .into_reader()?;
  Ok(text::line_stream(reader))
}
