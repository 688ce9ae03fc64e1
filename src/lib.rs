//! Metadata records for flow telemetry streams.
//!
//! Flow files and flow streams interleave the flow records themselves with
//! metadata describing where they came from: which exporter produced them,
//! how many packets and flows each exporter has sent, and how the exporter
//! samples traffic. This crate encodes and decodes that metadata layer.
//!
//! # Features
//!
//! - **Typed records**: [`ExporterIdentity`], [`ExporterStats`] and [`SamplerDescriptor`]
//! - **Self-describing framing**: every record carries its own size, so unknown kinds are skipped
//! - **Portable addresses**: IPv4 and IPv6 in one 16-byte slot, byte order chosen per stream
//! - **Async framing**: [`RecordCodec`] plugs into `tokio_util::codec::FramedRead`
//!
//! # Quick Start
//!
//! ```rust
//! use flowmeta::{CodecConfig, ExporterTable, RecordStream, RecordWriter, SamplerDescriptor, SamplerId};
//! use flowmeta::ExporterIdentity;
//! use std::net::Ipv4Addr;
//!
//! let config = CodecConfig::default();
//! let mut writer = RecordWriter::new(config);
//! writer.write(&ExporterIdentity::new(9, Ipv4Addr::new(192, 0, 2, 1), 1, 42))?;
//! writer.write(&SamplerDescriptor::new(1, 0, SamplerId::Generic, 100, 0))?;
//!
//! let mut table = ExporterTable::new();
//! for record in RecordStream::new(writer.as_bytes(), config) {
//!     table.apply(&record?);
//! }
//! assert_eq!(table.sampler_for(1, None).map(|s| s.packet_interval), Some(100));
//! # Ok::<(), flowmeta::RecordError>(())
//! ```

// Core types and error handling
mod config;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Record codecs and stream framing
pub mod records;
pub mod stream;
pub mod table;

// Core exports
pub use config::CodecConfig;
pub use error::*;
pub use records::*;
pub use stream::*;
pub use table::*;
pub use types::*;
