//! Bulk byte transfer.
//!
//! [`run_transfer`] moves every byte from a source value to a sink value.
//! Resolution is two-tier:
//!
//! 1. **Specialized transfers.** If a registered transfer exists between
//!    kinds both endpoints can be converted to, the pair minimizing the
//!    combined conversion distance wins; both endpoints are converted and
//!    the transfer function owns the move, including closing.
//! 2. **The generic pump.** Otherwise the source is adapted to a byte
//!    source and the sink to a byte sink, and chunks are pulled and pushed
//!    until end of stream, 1024 bytes per step unless `chunk-size` says
//!    otherwise.
//!
//! On normal completion the pump closes both endpoints. On a mid-pump error
//! the first error is propagated and both endpoints still get a close
//! attempt; a close failure is logged rather than allowed to mask the
//! primary error.

use crate::error::ConvertError;
use crate::fabric::Fabric;
use crate::options::Options;
use crate::sink::BoxByteSink;
use crate::source::BoxByteSource;
use crate::value::Value;
use tracing::{debug, warn};

/// Default bytes pulled per pump step.
const TRANSFER_CHUNK: usize = 1024;

/// Plans and runs a transfer between two values.
pub(crate) async fn run_transfer(
  fabric: &Fabric,
  source: Value,
  sink: Value,
  options: &Options,
) -> Result<(), ConvertError> {
  let src = source.kind();
  let dst = sink.kind();

  if let Some((src_kind, dst_kind, transfer)) = fabric.plan_specialized(src, dst) {
    debug!(src = %src, dst = %dst, via_src = %src_kind, via_dst = %dst_kind, "specialized transfer");
    let source = fabric.convert_value(source, src_kind, options).await?;
    let sink = fabric.convert_value(sink, dst_kind, options).await?;
    return transfer(source, sink, options.clone()).await;
  }

  let source = match fabric.to_byte_source(source, options).await {
    Ok(source) => source,
    Err(ConvertError::NoPath { .. }) => return Err(ConvertError::NoTransfer { src, dst }),
    Err(e) => return Err(e),
  };
  let sink = match fabric.to_byte_sink(sink, options).await {
    Ok(sink) => sink,
    Err(ConvertError::NoPath { .. }) => return Err(ConvertError::NoTransfer { src, dst }),
    Err(e) => return Err(e),
  };
  pump(source, sink, options).await
}

/// The generic pull/push loop.
///
/// Pulls chunks from the source until it reports end of stream, pushing each
/// into the sink, then closes both. Termination is signaled by `None` from
/// the source, never by a short chunk.
pub(crate) async fn pump(
  mut source: BoxByteSource,
  mut sink: BoxByteSink,
  options: &Options,
) -> Result<(), ConvertError> {
  let chunk = options.chunk_size_or(TRANSFER_CHUNK);
  let mut total: u64 = 0;
  let result = async {
    loop {
      match source.take_bytes(chunk, options).await? {
        Some(bytes) => {
          total += bytes.len() as u64;
          sink.send_bytes(bytes, options).await?;
        }
        None => break,
      }
    }
    Ok(())
  }
  .await;

  if let Err(e) = source.close().await {
    warn!(error = %e, "failed to close transfer source");
  }
  if let Err(e) = sink.close().await {
    warn!(error = %e, "failed to close transfer sink");
  }
  if result.is_ok() {
    debug!(bytes = total, "transfer complete");
  }
  result
}
