//! Exporter statistics records
//!
//! A stats record batches counter snapshots for several exporters. Counters are
//! transported as written; monotonicity is judged by the consumer (see
//! [`crate::ExporterTable`]).

use super::{MetadataRecord, RecordHeader};
use crate::config::CodecConfig;
use crate::types::record_type::EXPORTER_STAT_RECORD;
use crate::types::{FieldReader, FieldWriter};
use crate::{RecordError, Result};
use serde::{Deserialize, Serialize};

/// Counter snapshot of one exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExporterStat {
    /// Exporter sysid, 32-bit on the wire
    pub sysid: u32,
    pub sequence_failures: u32,
    pub packets: u64,
    pub flows: u64,
}

/// A batch of exporter counter snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExporterStats {
    entries: Vec<ExporterStat>,
}

impl ExporterStats {
    /// Encoded size of one entry
    pub const ENTRY_LEN: usize = 24;

    /// Largest entry count that fits the 16-bit record size
    pub const MAX_ENTRIES: usize =
        (u16::MAX as usize - RecordHeader::LEN - 4) / Self::ENTRY_LEN;

    /// Build a batch, checking the declared count against the entries.
    pub fn new(stat_count: u32, entries: Vec<ExporterStat>) -> Result<Self> {
        if stat_count as usize != entries.len() {
            return Err(RecordError::CountMismatch { declared: stat_count, actual: entries.len() });
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<ExporterStat>) -> Self {
        Self { entries }
    }

    /// Split entries into batches that each fit one record.
    pub fn batches(entries: &[ExporterStat]) -> impl Iterator<Item = ExporterStats> + '_ {
        entries.chunks(Self::MAX_ENTRIES).map(|chunk| Self { entries: chunk.to_vec() })
    }

    pub fn stat_count(&self) -> u32 {
        u32::try_from(self.entries.len()).unwrap_or(u32::MAX)
    }

    pub fn entries(&self) -> &[ExporterStat] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ExporterStat> {
        self.entries
    }
}

impl MetadataRecord for ExporterStats {
    const RECORD_TYPE: u16 = EXPORTER_STAT_RECORD;
    const MIN_SIZE: usize = RecordHeader::LEN + 4;

    fn body_len(&self) -> usize {
        4 + self.entries.len() * Self::ENTRY_LEN
    }

    fn encode_body(&self, out: &mut Vec<u8>, config: &CodecConfig) -> Result<()> {
        let mut writer = FieldWriter::new(out, config.byte_order);
        writer.u32(self.stat_count());
        for entry in &self.entries {
            writer.u32(entry.sysid);
            writer.u32(entry.sequence_failures);
            writer.u64(entry.packets);
            writer.u64(entry.flows);
        }
        Ok(())
    }

    fn decode_body(body: &[u8], config: &CodecConfig) -> Result<(Self, usize)> {
        let mut reader = FieldReader::new(body, Self::RECORD_TYPE, config.byte_order);
        let stat_count = reader.u32()?;

        // Size the whole batch before allocating for it
        let entries_len = (stat_count as usize).saturating_mul(Self::ENTRY_LEN);
        reader.require(entries_len)?;

        let mut entries = Vec::with_capacity(stat_count as usize);
        for _ in 0..stat_count {
            entries.push(ExporterStat {
                sysid: reader.u32()?,
                sequence_failures: reader.u32()?,
                packets: reader.u64()?,
                flows: reader.u64()?,
            });
        }

        Ok((Self { entries }, reader.consumed()))
    }
}

/// Encode a stats record from a declared count and its entries.
pub fn encode_stats(
    stat_count: u32,
    entries: &[ExporterStat],
    config: &CodecConfig,
) -> Result<Vec<u8>> {
    ExporterStats::new(stat_count, entries.to_vec())?.encode(config)
}
