//! The built-in converter seed set.
//!
//! These registrations establish the connectivity of the default conversion
//! graph: every edge in the table below is a direct converter the planner can
//! chain. The seed set is grouped the way the shapes group:
//!
//! - [`bytes`]: byte strings and byte buffers, including the sequence reducer
//! - [`channel`]: stream/channel bridges, channel chunking, pipe bridging
//! - [`text`]: strings, readers, and character sequences under an encoding
//! - [`file`]: opening files as channels
//!
//! | Edge | Behavior |
//! |---|---|
//! | bytes → byte-buffer | wrap without copy |
//! | bytes → direct-byte-buffer | private allocation, copy, position zero |
//! | bytes → input-stream | in-memory stream |
//! | byte-buffer → bytes | remaining bytes, position untouched |
//! | many(byte-buffer) → byte-buffer | ordered collapse into one buffer |
//! | readable-channel → input-stream | rewrap |
//! | readable-channel → many(byte-buffer) | lazy chunk pulls |
//! | input-stream → readable-channel | rewrap |
//! | string → bytes | encode under `encoding` |
//! | bytes → string | decode under `encoding` |
//! | many(byte-buffer) → readable-channel | pipe with background producer |
//! | input-stream → reader | buffered decoding reader |
//! | reader → char-sequence | drain in chunks |
//! | char-sequence → string | materialize |
//! | file → readable-channel | open for reading |
//! | file → writable-channel | open for writing, `append?` controls mode |

pub mod bytes;
pub mod channel;
pub mod file;
pub mod text;

use crate::registry::ConversionRegistry;

/// Registers the full seed set into a registry.
pub fn register_defaults(registry: &mut ConversionRegistry) {
  bytes::register(registry);
  channel::register(registry);
  text::register(registry);
  file::register(registry);
}
