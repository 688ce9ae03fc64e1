//! Record type code registry
//!
//! Codes match the nfdump V3 record registry. Writers and readers must agree on
//! them; a reader that does not know a code skips the record by its size.

use serde::{Deserialize, Serialize};

/// Exporter identity record (`ExporterInfoRecordType`)
pub const EXPORTER_INFO_RECORD: u16 = 0x0007;

/// Exporter statistics record (`ExporterStatRecordType`)
pub const EXPORTER_STAT_RECORD: u16 = 0x0008;

/// Pre-V3 sampler record, skipped by this crate
pub const SAMPLER_LEGACY_RECORD: u16 = 0x0009;

/// Flow record; belongs to the flow layer and is skipped here
pub const FLOW_RECORD_V3: u16 = 0x000B;

/// Sampler descriptor record (`SamplerRecordType`)
pub const SAMPLER_RECORD: u16 = 0x000F;

/// Known metadata record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    ExporterInfo,
    ExporterStats,
    SamplerLegacy,
    Sampler,
    /// Any code outside the metadata registry
    Other(u16),
}

impl RecordType {
    pub const fn from_code(code: u16) -> Self {
        match code {
            EXPORTER_INFO_RECORD => RecordType::ExporterInfo,
            EXPORTER_STAT_RECORD => RecordType::ExporterStats,
            SAMPLER_LEGACY_RECORD => RecordType::SamplerLegacy,
            SAMPLER_RECORD => RecordType::Sampler,
            other => RecordType::Other(other),
        }
    }

    pub const fn code(self) -> u16 {
        match self {
            RecordType::ExporterInfo => EXPORTER_INFO_RECORD,
            RecordType::ExporterStats => EXPORTER_STAT_RECORD,
            RecordType::SamplerLegacy => SAMPLER_LEGACY_RECORD,
            RecordType::Sampler => SAMPLER_RECORD,
            RecordType::Other(code) => code,
        }
    }
}

impl From<u16> for RecordType {
    fn from(code: u16) -> Self {
        RecordType::from_code(code)
    }
}
