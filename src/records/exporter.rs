//! Exporter identity records
//!
//! One record describes one flow-exporting device. The collector assigns the
//! `sysid`; the device reports its own observation domain `id`, which may
//! collide across exporters. This module encodes whatever `sysid` it is given.

use super::MetadataRecord;
use crate::config::CodecConfig;
use crate::types::record_type::EXPORTER_INFO_RECORD;
use crate::types::{Address, AddressFamily, FieldReader, FieldWriter, PackedAddress};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::trace;

const BODY_LEN: usize = 28;

/// Identity of one flow exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExporterIdentity {
    /// Flow protocol version spoken by the exporter
    pub version: u32,
    /// Exporter address; the variant carries the address family
    pub address: Address,
    /// Collector-assigned identifier, unique within one collector
    pub sysid: u16,
    /// Device-assigned exporter / observation domain id
    pub id: u32,
}

impl ExporterIdentity {
    pub fn new(version: u32, address: impl Into<Address>, sysid: u16, id: u32) -> Self {
        Self { version, address: address.into(), sysid, id }
    }

    pub fn family(&self) -> AddressFamily {
        self.address.family()
    }

    /// Returns true when both records describe the same device endpoint.
    ///
    /// `version` is excluded since it may change on renegotiation.
    pub fn same_exporter(&self, other: &ExporterIdentity) -> bool {
        self.address == other.address && self.id == other.id
    }
}

impl MetadataRecord for ExporterIdentity {
    const RECORD_TYPE: u16 = EXPORTER_INFO_RECORD;
    const MIN_SIZE: usize = 4 + BODY_LEN;

    fn body_len(&self) -> usize {
        BODY_LEN
    }

    fn encode_body(&self, out: &mut Vec<u8>, config: &CodecConfig) -> Result<()> {
        config.family_codes.validate()?;
        let order = config.byte_order;
        let packed = PackedAddress::encode(&self.address, order);
        let mut writer = FieldWriter::new(out, order);
        writer.u32(self.version);
        writer.bytes(packed.as_bytes());
        writer.u16(config.family_codes.code(self.family()));
        writer.u16(self.sysid);
        writer.u32(self.id);
        Ok(())
    }

    fn decode_body(body: &[u8], config: &CodecConfig) -> Result<(Self, usize)> {
        config.family_codes.validate()?;
        let order = config.byte_order;
        let mut reader = FieldReader::new(body, Self::RECORD_TYPE, order);

        let version = reader.u32()?;
        let packed = PackedAddress::from_bytes(reader.array::<16>()?);
        let family = reader.u16()?;
        let sysid = reader.u16()?;
        let id = reader.u32()?;

        let address = packed.decode(family, &config.family_codes, order)?;
        if address.family() == AddressFamily::Inet && !packed.has_clean_v4_padding() {
            trace!(sysid, "IPv4 exporter address carries non-zero padding");
        }

        Ok((Self { version, address, sysid, id }, reader.consumed()))
    }
}
