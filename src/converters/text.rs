//! Converters between bytes and text.
//!
//! Strings encode and decode under the `encoding` option (default UTF-8);
//! malformed input decodes with the replacement character. The reader edges
//! decode incrementally, so text can stream off an unbounded input without
//! materializing.

use crate::error::ConvertError;
use crate::kind::Shape;
use crate::reader::Reader;
use crate::registry::ConversionRegistry;
use crate::value::{CharSeq, Value};
use async_stream::try_stream;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use tokio::io::BufReader;

/// A pinned, boxed stream of decoded lines.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, ConvertError>> + Send>>;

pub(crate) fn register(registry: &mut ConversionRegistry) {
  registry.register(Shape::Str, Shape::Bytes, |value, options| async move {
    let s = value.into_string()?;
    let encoding = options.encoding()?;
    let (encoded, _, _) = encoding.encode(&s);
    Ok(Value::Bytes(Bytes::from(encoded.into_owned())))
  });

  registry.register(Shape::Bytes, Shape::Str, |value, options| async move {
    let bytes = value.into_bytes()?;
    let encoding = options.encoding()?;
    let (decoded, _, _) = encoding.decode(&bytes);
    Ok(Value::Str(decoded.into_owned()))
  });

  registry.register(Shape::InputStream, Shape::Reader, |value, options| async move {
    let stream = value.into_input_stream()?;
    let encoding = options.encoding()?;
    let read: Box<dyn tokio::io::AsyncRead + Send + Unpin> = match stream.into_inner() {
      Some(read) => Box::new(BufReader::new(read)),
      None => Box::new(tokio::io::empty()),
    };
    Ok(Value::Reader(Reader::new(read, encoding)))
  });

  registry.register(Shape::Reader, Shape::CharSeq, |value, _options| async move {
    // Drains the reader; the reader was constructed en route and is consumed
    // here rather than handed back.
    let mut reader = value.into_reader()?;
    let mut chars = CharSeq::new();
    while let Some(chunk) = reader.read_chars().await? {
      chars.push_chars(&chunk);
    }
    Ok(Value::Chars(chars))
  });

  registry.register(Shape::CharSeq, Shape::Str, |value, _options| async move {
    Ok(Value::Str(value.into_chars()?.into_string()))
  });
}

/// A lazy stream of newline-delimited lines pulled from a decoding reader.
///
/// Lines are split on `\n` with a trailing `\r` stripped, so both Unix and
/// CRLF line endings work. A final unterminated line is yielded before the
/// stream ends.
pub fn line_stream(mut reader: Reader) -> LineStream {
  Box::pin(try_stream! {
    let mut carry = String::new();
    while let Some(chunk) = reader.read_chars().await? {
      carry.push_str(&chunk);
      while let Some(pos) = carry.find('\n') {
        let mut line: String = carry.drain(..=pos).collect();
        line.pop();
        if line.ends_with('\r') {
          line.pop();
        }
        yield line;
      }
    }
    if !carry.is_empty() {
      yield carry;
    }
  })
}
