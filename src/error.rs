//! Error types for conversion and transfer.
//!
//! This module defines [`ConvertError`], the single error type surfaced by the
//! conversion fabric. Planning failures name both endpoint kinds so callers can
//! see exactly which hop is missing; I/O errors are propagated unwrapped.
//!
//! ## Error Categories
//!
//! - **[`ConvertError::NoPath`]**: no conversion path exists between two kinds
//! - **[`ConvertError::NoTransfer`]**: no direct transfer and no source/sink fallback
//! - **[`ConvertError::Invariant`]**: the planner proposed a step the registry
//!   cannot satisfy, or a converter produced a value of an unexpected shape
//! - **[`ConvertError::Io`]**: propagated from underlying streams, channels, files
//! - **[`ConvertError::Encoding`]**: the `encoding` option named an unknown charset
//!
//! Conversion errors are surfaced to the caller without retry. Lazy sequences
//! surface errors on pull. The transfer pump propagates the first error from
//! either side and still attempts to close both resources.

use crate::kind::Kind;
use thiserror::Error;

/// Error type for all conversion and transfer operations.
#[derive(Debug, Error)]
pub enum ConvertError {
  /// No conversion path exists between the given kinds.
  #[error("don't know how to convert {src} into {dst}")]
  NoPath {
    /// The kind of the value that was to be converted.
    src: Kind,
    /// The requested destination kind.
    dst: Kind,
  },

  /// No direct transfer exists and neither endpoint could be adapted to the
  /// byte-source / byte-sink fallback.
  #[error("don't know how to transfer {src} into {dst}")]
  NoTransfer {
    /// The kind of the transfer source.
    src: Kind,
    /// The kind of the transfer sink.
    dst: Kind,
  },

  /// An internal invariant was violated. The planner believed a conversion was
  /// possible but the registry could not satisfy it. This indicates a bug.
  #[error("conversion invariant violated: {0}")]
  Invariant(String),

  /// An I/O error from an underlying stream, channel, or file.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// The `encoding` option named a character set this build does not know.
  #[error("unsupported encoding: {label}")]
  Encoding {
    /// The charset label that failed to resolve.
    label: String,
  },
}

impl ConvertError {
  /// Builds the error reported when a planned step has no registered converter.
  pub(crate) fn missing_edge(src: Kind, dst: Kind) -> Self {
    ConvertError::Invariant(format!(
      "planned conversion {} -> {} is not registered",
      src, dst
    ))
  }

  /// Builds the error reported when a converter yields a value of the wrong shape.
  pub(crate) fn unexpected_shape(expected: &str, got: Kind) -> Self {
    ConvertError::Invariant(format!("expected a {} value, got {}", expected, got))
  }
}
