//! Metadata record kinds and their shared framing.
//!
//! Every record starts with a [`RecordHeader`] whose `size` covers the whole
//! record. The concrete kinds implement [`MetadataRecord`], which supplies
//! header handling, size validation and exact-consumption checks on top of a
//! per-kind body codec.
//!
//! ## Layouts (body offsets, after the 4-byte header)
//!
//! | Record | Offset | Field | Width |
//! |---|---|---|---|
//! | [`ExporterIdentity`] | 0 | version | 4 |
//! | | 4 | ip (packed) | 16 |
//! | | 20 | sa_family | 2 |
//! | | 22 | sysid | 2 |
//! | | 24 | id | 4 |
//! | [`ExporterStats`] | 0 | stat_count | 4 |
//! | | 4+ | {sysid, sequence_failure, packets, flows} | 24 each |
//! | [`SamplerDescriptor`] | 0 | exporter_sysid | 2 |
//! | | 2 | algorithm | 2 |
//! | | 4 | id (signed) | 8 |
//! | | 12 | packet_interval | 4 |
//! | | 16 | space_interval | 4 |

mod exporter;
mod header;
mod sampler;
mod stats;

pub use exporter::ExporterIdentity;
pub use header::RecordHeader;
pub use sampler::{SAMPLER_DEFAULT, SAMPLER_GENERIC, SAMPLER_OVERWRITE, SamplerDescriptor, SamplerId};
pub use stats::{ExporterStat, ExporterStats, encode_stats};

use crate::config::CodecConfig;
use crate::types::RecordType;
use crate::{RecordError, Result};
use serde::{Deserialize, Serialize};

/// A record kind with a fixed type code and a body codec.
pub trait MetadataRecord: Sized {
    /// Registered type code
    const RECORD_TYPE: u16;

    /// Smallest legal total size, header included
    const MIN_SIZE: usize;

    /// Encoded body length in bytes
    fn body_len(&self) -> usize;

    /// Append the body fields to `out`.
    fn encode_body(&self, out: &mut Vec<u8>, config: &CodecConfig) -> Result<()>;

    /// Decode the body, returning the value and the number of body bytes consumed.
    fn decode_body(body: &[u8], config: &CodecConfig) -> Result<(Self, usize)>;

    fn encoded_len(&self) -> usize {
        RecordHeader::LEN + self.body_len()
    }

    /// Encode header and body.
    fn encode(&self, config: &CodecConfig) -> Result<Vec<u8>> {
        let len = self.encoded_len();
        let size = u16::try_from(len)
            .map_err(|_| RecordError::RecordTooLarge { record_type: Self::RECORD_TYPE, len })?;

        let mut out = Vec::with_capacity(len);
        out.extend_from_slice(&RecordHeader::new(Self::RECORD_TYPE, size).encode(config.byte_order));
        self.encode_body(&mut out, config)?;
        debug_assert_eq!(out.len(), len);
        Ok(out)
    }

    /// Decode one record from the front of `bytes`.
    ///
    /// Exactly `header.size` bytes are read; anything after them belongs to
    /// the next record.
    fn decode(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        let header = RecordHeader::decode(bytes, config.byte_order)?;
        if header.record_type != Self::RECORD_TYPE {
            return Err(RecordError::UnexpectedType {
                expected: Self::RECORD_TYPE,
                found: header.record_type,
            });
        }
        Self::decode_framed(header, bytes, config)
    }

    /// Decode a record whose header has already been parsed from `bytes`.
    fn decode_framed(header: RecordHeader, bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        header.body_len()?;
        let size = header.size as usize;
        if size < Self::MIN_SIZE {
            return Err(RecordError::InvalidSize {
                record_type: header.record_type,
                size: header.size,
                minimum: Self::MIN_SIZE,
            });
        }

        let record = bytes.get(..size).ok_or(RecordError::TruncatedBody {
            record_type: header.record_type,
            needed: size,
            available: bytes.len(),
        })?;

        let body = &record[RecordHeader::LEN..];
        let (value, consumed) = Self::decode_body(body, config)?;
        if consumed != body.len() {
            return Err(RecordError::SizeMismatch {
                record_type: header.record_type,
                declared: size,
                consumed: RecordHeader::LEN + consumed,
            });
        }
        Ok(value)
    }
}

/// A record whose type code has no registered decoder.
///
/// The body is kept opaque; the header is rebuilt on every encode so the
/// record follows the byte order of the stream it is written to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "UnknownRecordFields")]
pub struct UnknownRecord {
    record_type: u16,
    body: Vec<u8>,
}

#[derive(Deserialize)]
struct UnknownRecordFields {
    record_type: u16,
    body: Vec<u8>,
}

impl TryFrom<UnknownRecordFields> for UnknownRecord {
    type Error = RecordError;

    fn try_from(fields: UnknownRecordFields) -> Result<Self> {
        Self::new(fields.record_type, fields.body)
    }
}

impl UnknownRecord {
    /// Build an opaque record, failing when the body cannot fit the 16-bit size.
    pub fn new(record_type: u16, body: impl Into<Vec<u8>>) -> Result<Self> {
        let body = body.into();
        let len = RecordHeader::LEN + body.len();
        if len > u16::MAX as usize {
            return Err(RecordError::RecordTooLarge { record_type, len });
        }
        Ok(Self { record_type, body })
    }

    pub fn record_type(&self) -> u16 {
        self.record_type
    }

    pub fn kind(&self) -> RecordType {
        RecordType::from_code(self.record_type)
    }

    /// Total size the record declares, header included
    pub fn size(&self) -> u16 {
        // Bounded by the check in `new`
        (RecordHeader::LEN + self.body.len()) as u16
    }

    /// Body bytes after the header
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Header and body, with the header in `config`'s byte order.
    pub fn to_bytes(&self, config: &CodecConfig) -> Vec<u8> {
        let header = RecordHeader::new(self.record_type, self.size());
        let mut out = Vec::with_capacity(header.size as usize);
        out.extend_from_slice(&header.encode(config.byte_order));
        out.extend_from_slice(&self.body);
        out
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// One decoded item of a record stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Record {
    ExporterInfo(ExporterIdentity),
    ExporterStats(ExporterStats),
    Sampler(SamplerDescriptor),
    Unknown(UnknownRecord),
}

impl Record {
    pub fn record_type(&self) -> u16 {
        match self {
            Record::ExporterInfo(_) => ExporterIdentity::RECORD_TYPE,
            Record::ExporterStats(_) => ExporterStats::RECORD_TYPE,
            Record::Sampler(_) => SamplerDescriptor::RECORD_TYPE,
            Record::Unknown(unknown) => unknown.record_type(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Record::Unknown(_))
    }

    /// Encode the record; unknown bodies are re-emitted verbatim under a fresh header.
    pub fn encode(&self, config: &CodecConfig) -> Result<Vec<u8>> {
        match self {
            Record::ExporterInfo(record) => record.encode(config),
            Record::ExporterStats(record) => record.encode(config),
            Record::Sampler(record) => record.encode(config),
            Record::Unknown(unknown) => Ok(unknown.to_bytes(config)),
        }
    }
}

impl From<ExporterIdentity> for Record {
    fn from(record: ExporterIdentity) -> Self {
        Record::ExporterInfo(record)
    }
}

impl From<ExporterStats> for Record {
    fn from(record: ExporterStats) -> Self {
        Record::ExporterStats(record)
    }
}

impl From<SamplerDescriptor> for Record {
    fn from(record: SamplerDescriptor) -> Self {
        Record::Sampler(record)
    }
}

impl From<UnknownRecord> for Record {
    fn from(record: UnknownRecord) -> Self {
        Record::Unknown(record)
    }
}
