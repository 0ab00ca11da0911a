use crate::buffer::ByteBuffer;
use crate::closeable::Closeable;
use crate::fabric::{self, Fabric};
use crate::kind::{Capability, Kind, Shape};
use crate::options::Options;
use crate::sink::ByteSink;
use crate::source::ByteSource;
use crate::value::{InputStream, Value, WritableChannel};
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// A test sink that records everything written and counts shutdowns.
struct CountingWriter {
  data: Arc<Mutex<Vec<u8>>>,
  shutdowns: Arc<AtomicUsize>,
}

impl AsyncWrite for CountingWriter {
  fn poll_write(
    self: Pin<&mut Self>,
    _cx: &mut Context<'_>,
    buf: &[u8],
  ) -> Poll<io::Result<usize>> {
    self.data.lock().unwrap().extend_from_slice(buf);
    Poll::Ready(Ok(buf.len()))
  }

  fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
    Poll::Ready(Ok(()))
  }

  fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
    self.shutdowns.fetch_add(1, Ordering::SeqCst);
    Poll::Ready(Ok(()))
  }
}

/// A test source that records the size of every read it is handed.
struct RecordingReader {
  data: io::Cursor<Vec<u8>>,
  sizes: Arc<Mutex<Vec<usize>>>,
}

impl AsyncRead for RecordingReader {
  fn poll_read(
    mut self: Pin<&mut Self>,
    cx: &mut Context<'_>,
    buf: &mut ReadBuf<'_>,
  ) -> Poll<io::Result<()>> {
    self.sizes.lock().unwrap().push(buf.remaining());
    Pin::new(&mut self.data).poll_read(cx, buf)
  }
}

#[tokio::test]
async fn test_pump_preserves_order_and_length() {
  let data: Vec<u8> = (0..12_345).map(|i| (i % 251) as u8).collect();
  let written = Arc::new(Mutex::new(Vec::new()));
  let shutdowns = Arc::new(AtomicUsize::new(0));
  let sink = Value::writable_channel(CountingWriter {
    data: written.clone(),
    shutdowns: shutdowns.clone(),
  });

  fabric::transfer(data.clone(), sink, &Options::new())
    .await
    .unwrap();

  assert_eq!(*written.lock().unwrap(), data);
  assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_pump_pulls_configured_chunks() {
  let sizes = Arc::new(Mutex::new(Vec::new()));
  let source = Value::input_stream(RecordingReader {
    data: io::Cursor::new(vec![7u8; 10]),
    sizes: sizes.clone(),
  });
  let written = Arc::new(Mutex::new(Vec::new()));
  let sink = Value::writable_channel(CountingWriter {
    data: written.clone(),
    shutdowns: Arc::new(AtomicUsize::new(0)),
  });

  fabric::transfer(source, sink, &Options::new().with_chunk_size(3))
    .await
    .unwrap();

  assert_eq!(written.lock().unwrap().len(), 10);
  assert!(sizes.lock().unwrap().iter().all(|size| *size <= 3));
}

#[tokio::test]
async fn test_transfer_file_to_file() {
  let dir = tempfile::tempdir().unwrap();
  let src_path = dir.path().join("in.bin");
  let dst_path = dir.path().join("out.bin");
  let data: Vec<u8> = (0..10_000).map(|i| (i % 199) as u8).collect();
  tokio::fs::write(&src_path, &data).await.unwrap();

  fabric::transfer(
    Value::file(&src_path),
    Value::file(&dst_path),
    &Options::new().with_append(false),
  )
  .await
  .unwrap();

  assert_eq!(tokio::fs::read(&dst_path).await.unwrap(), data);
}

#[test]
fn test_files_resolve_through_channels() {
  // A file is not itself a byte source or sink; the planner resolves both
  // sides through channels.
  assert_eq!(
    fabric::conversion_path(Shape::File, Capability::Source).unwrap(),
    vec![Kind::One(Shape::File), Kind::One(Shape::ReadableChannel)]
  );
  assert_eq!(
    fabric::conversion_path(Shape::File, Capability::Sink).unwrap(),
    vec![Kind::One(Shape::File), Kind::One(Shape::WritableChannel)]
  );
}

#[tokio::test]
async fn test_transfer_appends_by_default() {
  let dir = tempfile::tempdir().unwrap();
  let src_path = dir.path().join("in.bin");
  let dst_path = dir.path().join("out.bin");
  tokio::fs::write(&src_path, b"chunk").await.unwrap();

  fabric::transfer(Value::file(&src_path), Value::file(&dst_path), &Options::new())
    .await
    .unwrap();
  fabric::transfer(Value::file(&src_path), Value::file(&dst_path), &Options::new())
    .await
    .unwrap();

  assert_eq!(
    tokio::fs::read(&dst_path).await.unwrap(),
    b"chunkchunk".to_vec()
  );
}

#[tokio::test]
async fn test_transfer_truncates_when_append_is_off() {
  let dir = tempfile::tempdir().unwrap();
  let src_path = dir.path().join("in.bin");
  let dst_path = dir.path().join("out.bin");
  tokio::fs::write(&src_path, b"fresh").await.unwrap();
  tokio::fs::write(&dst_path, b"previous contents that are longer")
    .await
    .unwrap();

  fabric::transfer(
    Value::file(&src_path),
    Value::file(&dst_path),
    &Options::new().with_append(false),
  )
  .await
  .unwrap();

  assert_eq!(tokio::fs::read(&dst_path).await.unwrap(), b"fresh".to_vec());
}

#[tokio::test]
async fn test_no_transfer_is_an_error_naming_both_kinds() {
  let err = fabric::transfer(vec![1u8, 2], vec![3u8, 4], &Options::new())
    .await
    .unwrap_err();
  let message = err.to_string();
  assert!(message.contains("don't know how to transfer"));
  assert!(message.contains("bytes"));
}

#[tokio::test]
async fn test_specialized_transfer_wins_over_the_pump() {
  let dir = tempfile::tempdir().unwrap();
  let src_path = dir.path().join("in.bin");
  let dst_path = dir.path().join("out.bin");
  tokio::fs::write(&src_path, b"fast path").await.unwrap();

  let fabric = Fabric::new();
  let hit = Arc::new(AtomicBool::new(false));
  let flag = hit.clone();
  fabric.register_transfer(Shape::File, Shape::File, move |source, sink, _options| {
    let flag = flag.clone();
    async move {
      let src = source.into_file_path()?;
      let dst = sink.into_file_path()?;
      tokio::fs::copy(&src, &dst).await?;
      flag.store(true, Ordering::SeqCst);
      Ok(())
    }
  });

  fabric
    .transfer(Value::file(&src_path), Value::file(&dst_path), &Options::new())
    .await
    .unwrap();

  assert!(hit.load(Ordering::SeqCst));
  assert_eq!(
    tokio::fs::read(&dst_path).await.unwrap(),
    b"fast path".to_vec()
  );
}

#[tokio::test]
async fn test_input_stream_eof_is_two_stage() {
  let mut stream = InputStream::new(io::Cursor::new(b"abc".to_vec()));
  let options = Options::new();

  // A short chunk signals the final data, not termination.
  let first = stream.take_bytes(8, &options).await.unwrap().unwrap();
  assert_eq!(&first[..], b"abc");
  assert!(stream.take_bytes(8, &options).await.unwrap().is_none());
}

#[tokio::test]
async fn test_input_stream_fills_whole_chunks() {
  let mut stream = InputStream::new(io::Cursor::new(vec![9u8; 10]));
  let options = Options::new();

  let first = stream.take_bytes(4, &options).await.unwrap().unwrap();
  assert_eq!(first.len(), 4);
  let second = stream.take_bytes(4, &options).await.unwrap().unwrap();
  assert_eq!(second.len(), 4);
  let last = stream.take_bytes(4, &options).await.unwrap().unwrap();
  assert_eq!(last.len(), 2);
  assert!(stream.take_bytes(4, &options).await.unwrap().is_none());
}

#[tokio::test]
async fn test_byte_buffer_acts_as_a_source() {
  let mut buffer = ByteBuffer::wrap(&b"abcdef"[..]);
  let options = Options::new();

  let first = buffer.take_bytes(4, &options).await.unwrap().unwrap();
  assert_eq!(&first[..], b"abcd");
  let second = buffer.take_bytes(4, &options).await.unwrap().unwrap();
  assert_eq!(&second[..], b"ef");
  assert!(buffer.take_bytes(4, &options).await.unwrap().is_none());
}

#[tokio::test]
async fn test_close_is_idempotent() {
  let shutdowns = Arc::new(AtomicUsize::new(0));
  let mut channel = WritableChannel::new(CountingWriter {
    data: Arc::new(Mutex::new(Vec::new())),
    shutdowns: shutdowns.clone(),
  });

  channel.close().await.unwrap();
  channel.close().await.unwrap();
  assert_eq!(shutdowns.load(Ordering::SeqCst), 1);

  let err = channel
    .send_bytes(bytes::Bytes::from_static(b"late"), &Options::new())
    .await
    .unwrap_err();
  assert!(err.to_string().contains("closed"));
}

#[tokio::test]
async fn test_closing_a_source_reads_as_eof() {
  let mut stream = InputStream::new(io::Cursor::new(b"pending".to_vec()));
  stream.close().await.unwrap();
  assert!(stream
    .take_bytes(4, &Options::new())
    .await
    .unwrap()
    .is_none());
}
