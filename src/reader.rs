//! The decoding character reader.
//!
//! [`Reader`] turns a byte stream into characters under a configurable
//! character set, decoding incrementally so unbounded inputs stream without
//! ever materializing. Malformed input decodes with the replacement character,
//! matching platform-decoder defaults.

use crate::error::ConvertError;
use encoding_rs::{Decoder, Encoding};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Bytes pulled from the underlying stream per decode step.
const READ_CHUNK: usize = 1024;

/// An incremental decoding reader over a byte stream.
pub struct Reader {
  src: Option<Box<dyn AsyncRead + Send + Unpin>>,
  decoder: Decoder,
}

impl Reader {
  /// Wraps a byte stream with a streaming decoder for the given character set.
  pub fn new(src: Box<dyn AsyncRead + Send + Unpin>, encoding: &'static Encoding) -> Self {
    Self {
      src: Some(src),
      decoder: encoding.new_decoder(),
    }
  }

  /// Pulls one chunk of decoded characters.
  ///
  /// Returns `None` once the stream is exhausted and the decoder has flushed.
  /// A chunk is never empty: partial multi-byte sequences are carried in the
  /// decoder until more input arrives.
  pub async fn read_chars(&mut self) -> Result<Option<String>, ConvertError> {
    loop {
      let Some(src) = self.src.as_mut() else {
        return Ok(None);
      };
      let mut buf = [0u8; READ_CHUNK];
      let n = src.read(&mut buf).await?;
      if n == 0 {
        // Stream exhausted: flush any state held in the decoder.
        let mut out = String::with_capacity(
          self.decoder.max_utf8_buffer_length(0).unwrap_or(16),
        );
        let _ = self.decoder.decode_to_string(&[], &mut out, true);
        self.src = None;
        return if out.is_empty() { Ok(None) } else { Ok(Some(out)) };
      }
      let mut out = String::with_capacity(
        self.decoder.max_utf8_buffer_length(n).unwrap_or(n * 3),
      );
      let _ = self.decoder.decode_to_string(&buf[..n], &mut out, false);
      if !out.is_empty() {
        return Ok(Some(out));
      }
      // A split multi-byte sequence can consume input without producing
      // characters; pull again.
    }
  }

  /// Drops the underlying stream. Subsequent reads return `None`.
  pub fn close(&mut self) {
    self.src = None;
  }

  /// Returns true if the underlying stream has been released.
  pub fn is_closed(&self) -> bool {
    self.src.is_none()
  }
}

impl std::fmt::Debug for Reader {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Reader")
      .field("closed", &self.src.is_none())
      .finish_non_exhaustive()
  }
}
