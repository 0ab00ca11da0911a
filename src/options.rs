//! The options record threaded through every conversion.
//!
//! [`Options`] is an open, string-keyed map of converter hints. Every
//! registered converter receives the full record; unknown keys are silently
//! ignored so options aimed at one converter can ride along through a composed
//! chain without bothering the others.
//!
//! ## Recognized keys
//!
//! | Key | Type | Default | Used by |
//! |---|---|---|---|
//! | `chunk-size` | positive integer | 1024 for transfer, 4096 for channel reads | byte pulls |
//! | `direct?` | boolean | `false` | byte buffer construction |
//! | `encoding` | string | `"utf-8"` | string and reader conversions |
//! | `append?` | boolean | `true` | opening a writable channel over a file |
//!
//! ## Example
//!
//! ```rust
//! use byteweave::options::Options;
//!
//! let options = Options::new()
//!   .with_chunk_size(8192)
//!   .with_encoding("utf-16le")
//!   .with_append(false);
//! assert_eq!(options.chunk_size_or(1024), 8192);
//! ```

use crate::error::ConvertError;
use encoding_rs::Encoding;
use std::collections::HashMap;

/// Key for the number of bytes pulled per step.
pub const CHUNK_SIZE: &str = "chunk-size";
/// Key requesting direct (privately allocated) byte buffers.
pub const DIRECT: &str = "direct?";
/// Key naming the character set for string and reader conversions.
pub const ENCODING: &str = "encoding";
/// Key controlling append-versus-truncate when opening a file for writing.
pub const APPEND: &str = "append?";

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
  /// A boolean flag.
  Bool(bool),
  /// A positive integer.
  Int(usize),
  /// A string.
  Str(String),
}

/// An unordered, schema-free record of converter hints.
///
/// Unknown keys are ignored by every built-in converter; custom converters may
/// read whatever keys they like via [`Options::get`].
#[derive(Debug, Clone, Default)]
pub struct Options {
  entries: HashMap<String, OptionValue>,
}

impl Options {
  /// Creates an empty options record. Every accessor falls back to its default.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets an arbitrary option by key.
  pub fn set(mut self, key: impl Into<String>, value: OptionValue) -> Self {
    self.entries.insert(key.into(), value);
    self
  }

  /// Returns the raw value stored under `key`, if any.
  pub fn get(&self, key: &str) -> Option<&OptionValue> {
    self.entries.get(key)
  }

  /// Sets the number of bytes pulled per step.
  pub fn with_chunk_size(self, chunk_size: usize) -> Self {
    self.set(CHUNK_SIZE, OptionValue::Int(chunk_size))
  }

  /// Requests direct (privately allocated) byte buffers.
  pub fn with_direct(self, direct: bool) -> Self {
    self.set(DIRECT, OptionValue::Bool(direct))
  }

  /// Names the character set for string and reader conversions.
  pub fn with_encoding(self, encoding: impl Into<String>) -> Self {
    self.set(ENCODING, OptionValue::Str(encoding.into()))
  }

  /// Controls append-versus-truncate when opening a file for writing.
  pub fn with_append(self, append: bool) -> Self {
    self.set(APPEND, OptionValue::Bool(append))
  }

  /// Returns the configured chunk size, or `default` when unset.
  ///
  /// The default differs by call site: bulk transfer pulls 1024 bytes per
  /// step, channel-to-sequence conversion pulls 4096.
  pub fn chunk_size_or(&self, default: usize) -> usize {
    match self.entries.get(CHUNK_SIZE) {
      Some(OptionValue::Int(n)) if *n > 0 => *n,
      _ => default,
    }
  }

  /// Returns true when direct byte buffers were requested. Defaults to false.
  pub fn direct(&self) -> bool {
    matches!(self.entries.get(DIRECT), Some(OptionValue::Bool(true)))
  }

  /// Returns true when writable channels over files should append rather than
  /// truncate. Defaults to true.
  pub fn append(&self) -> bool {
    !matches!(self.entries.get(APPEND), Some(OptionValue::Bool(false)))
  }

  /// Resolves the configured character set.
  ///
  /// Defaults to UTF-8. An unknown charset label is an
  /// [`ConvertError::Encoding`] error.
  pub fn encoding(&self) -> Result<&'static Encoding, ConvertError> {
    match self.entries.get(ENCODING) {
      None => Ok(encoding_rs::UTF_8),
      Some(OptionValue::Str(label)) => Encoding::for_label(label.as_bytes())
        .ok_or_else(|| ConvertError::Encoding {
          label: label.clone(),
        }),
      Some(_) => Ok(encoding_rs::UTF_8),
    }
  }
}
