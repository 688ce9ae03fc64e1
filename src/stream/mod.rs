//! Record stream decoding and encoding.
//!
//! A record stream is a plain concatenation of records. Each header's `size`
//! locates the next header, so a reader advances exactly `size` bytes whether
//! or not it recognises the type:
//!
//! ```text
//!            header parsed (4 bytes)
//! AwaitingHeader ───────────────────────▶ AwaitingBody
//!       ▲                                      │
//!       └──────── size - 4 body bytes ─────────┘
//! ```
//!
//! End of input at an `AwaitingHeader` boundary is a clean end of stream; end of
//! input inside `AwaitingBody` is `TruncatedStream`.
//!
//! - [`RecordStream`] iterates a borrowed byte slice
//! - [`RecordCodec`] drives the same machine over `tokio_util` framed I/O
//! - [`RecordWriter`] produces streams
//!
//! ## Usage Example
//!
//! ```rust
//! use flowmeta::{CodecConfig, ExporterIdentity, Record, RecordStream, RecordWriter};
//! use std::net::Ipv4Addr;
//!
//! let config = CodecConfig::default();
//! let mut writer = RecordWriter::new(config);
//! writer.write(&ExporterIdentity::new(9, Ipv4Addr::new(10, 0, 0, 1), 1, 42))?;
//! let bytes = writer.into_inner();
//!
//! for record in RecordStream::new(&bytes, config) {
//!     if let Record::ExporterInfo(identity) = record? {
//!         println!("exporter {} at {}", identity.sysid, identity.address);
//!     }
//! }
//! # Ok::<(), flowmeta::RecordError>(())
//! ```

mod codec;
mod reader;
mod registry;
mod writer;

pub use codec::RecordCodec;
pub use reader::{RecordStream, decode_all};
pub use registry::{DecodeFn, DecoderRegistry};
pub use writer::RecordWriter;

use crate::records::RecordHeader;

/// Position of a decoder within the record framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecodeState {
    AwaitingHeader,
    AwaitingBody(RecordHeader),
}
