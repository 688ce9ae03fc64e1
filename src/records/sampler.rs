//! Sampler descriptor records
//!
//! A sampler describes the packet sampling an exporter applies (IPFIX elements
//! #302 selector id, #304 algorithm, #305 packet interval, #306 space interval).
//! Selector ids below zero are reserved:
//!
//! | Raw id | [`SamplerId`] | Meaning |
//! |---|---|---|
//! | -1 | `Generic` | no explicit id, generic sampler |
//! | -2 | `DeviceDefault` | no explicit id, device default |
//! | -3 | `Overwrite` | no explicit id, replaces previous samplers of the exporter |
//! | >= 0 | `Explicit` | device-assigned selector id |

use super::MetadataRecord;
use crate::config::CodecConfig;
use crate::types::record_type::SAMPLER_RECORD;
use crate::types::{FieldReader, FieldWriter};
use crate::{RecordError, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use tracing::debug;

pub const SAMPLER_OVERWRITE: i64 = -3;
pub const SAMPLER_DEFAULT: i64 = -2;
pub const SAMPLER_GENERIC: i64 = -1;

const BODY_LEN: usize = 20;

/// Sampler selector id with the reserved values named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplerId {
    Overwrite,
    DeviceDefault,
    Generic,
    /// Device-assigned id, never negative
    Explicit(i64),
}

impl SamplerId {
    /// Classify a raw wire id, rejecting negative values outside the reserved set.
    pub fn from_raw(id: i64) -> Result<Self> {
        match id {
            SAMPLER_OVERWRITE => Ok(SamplerId::Overwrite),
            SAMPLER_DEFAULT => Ok(SamplerId::DeviceDefault),
            SAMPLER_GENERIC => Ok(SamplerId::Generic),
            id if id >= 0 => Ok(SamplerId::Explicit(id)),
            id => Err(RecordError::InvalidSamplerId { id }),
        }
    }

    pub fn raw(self) -> i64 {
        match self {
            SamplerId::Overwrite => SAMPLER_OVERWRITE,
            SamplerId::DeviceDefault => SAMPLER_DEFAULT,
            SamplerId::Generic => SAMPLER_GENERIC,
            SamplerId::Explicit(id) => id,
        }
    }

    pub fn explicit(self) -> Option<i64> {
        match self {
            SamplerId::Explicit(id) => Some(id),
            _ => None,
        }
    }
}

/// Sampling policy applied by one exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SamplerDescriptor {
    /// Back-reference to [`crate::ExporterIdentity::sysid`]
    pub exporter_sysid: u16,
    pub algorithm: u16,
    pub id: SamplerId,
    pub packet_interval: u32,
    pub space_interval: u32,
}

impl SamplerDescriptor {
    pub fn new(
        exporter_sysid: u16,
        algorithm: u16,
        id: SamplerId,
        packet_interval: u32,
        space_interval: u32,
    ) -> Self {
        Self { exporter_sysid, algorithm, id, packet_interval, space_interval }
    }

    /// The 1-in-N packet interval, `None` when the record carries zero.
    pub fn sampling_interval(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.packet_interval)
    }

    /// Returns true when the packet interval is zero.
    ///
    /// The meaning of a zero interval belongs to the consumer; it is reported,
    /// not coerced.
    pub fn is_sampling_disabled(&self) -> bool {
        self.packet_interval == 0
    }
}

impl MetadataRecord for SamplerDescriptor {
    const RECORD_TYPE: u16 = SAMPLER_RECORD;
    const MIN_SIZE: usize = 4 + BODY_LEN;

    fn body_len(&self) -> usize {
        BODY_LEN
    }

    fn encode_body(&self, out: &mut Vec<u8>, config: &CodecConfig) -> Result<()> {
        // Explicit carries an i64, so a negative value can be constructed
        let id = SamplerId::from_raw(self.id.raw())?;

        let mut writer = FieldWriter::new(out, config.byte_order);
        writer.u16(self.exporter_sysid);
        writer.u16(self.algorithm);
        writer.i64(id.raw());
        writer.u32(self.packet_interval);
        writer.u32(self.space_interval);
        Ok(())
    }

    fn decode_body(body: &[u8], config: &CodecConfig) -> Result<(Self, usize)> {
        let mut reader = FieldReader::new(body, Self::RECORD_TYPE, config.byte_order);

        let exporter_sysid = reader.u16()?;
        let algorithm = reader.u16()?;
        let id = SamplerId::from_raw(reader.i64()?)?;
        let packet_interval = reader.u32()?;
        let space_interval = reader.u32()?;

        if packet_interval == 0 {
            debug!(exporter_sysid, ?id, "Sampler record with zero packet interval");
        }

        let sampler = Self { exporter_sysid, algorithm, id, packet_interval, space_interval };
        Ok((sampler, reader.consumed()))
    }
}
