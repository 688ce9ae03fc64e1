//! Test utilities for building record streams
//!
//! This module provides deterministic record fixtures shared by unit tests,
//! integration tests and benches, so every consumer decodes the same streams.

#![cfg(any(test, feature = "benchmark"))]

use crate::config::CodecConfig;
use crate::records::{
    ExporterIdentity, ExporterStat, ExporterStats, Record, SamplerDescriptor, SamplerId, UnknownRecord,
};
use crate::stream::RecordWriter;
use crate::types::record_type::FLOW_RECORD_V3;
use crate::Result;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Body length of the opaque flow records interleaved by [`mixed_stream`].
pub const FLOW_BODY_LEN: usize = 60;

/// Exporter identity for `sysid`, IPv4 for even sysids and IPv6 for odd ones.
pub fn sample_identity(sysid: u16) -> ExporterIdentity {
    if sysid % 2 == 0 {
        let [hi, lo] = sysid.to_be_bytes();
        ExporterIdentity::new(9, Ipv4Addr::new(10, 0, hi, lo), sysid, 1000 + u32::from(sysid))
    } else {
        let address = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, sysid);
        ExporterIdentity::new(10, address, sysid, 1000 + u32::from(sysid))
    }
}

/// Stats entry with counters scaled by `round` so later rounds never regress.
pub fn sample_stat(sysid: u16, round: u64) -> ExporterStat {
    ExporterStat {
        sysid: u32::from(sysid),
        sequence_failures: round as u32,
        packets: 1_000 * round + u64::from(sysid),
        flows: 10 * round,
    }
}

/// 1-in-`interval` generic sampler for an exporter.
pub fn sample_sampler(sysid: u16, interval: u32) -> SamplerDescriptor {
    SamplerDescriptor::new(sysid, 1, SamplerId::Generic, interval, 0)
}

/// Opaque flow record with a patterned body.
pub fn sample_flow(seed: u8) -> Result<UnknownRecord> {
    let body: Vec<u8> = (0..FLOW_BODY_LEN).map(|i| seed.wrapping_add(i as u8)).collect();
    UnknownRecord::new(FLOW_RECORD_V3, body)
}

/// The records [`mixed_stream`] encodes, in stream order.
///
/// Each exporter contributes an identity, a sampler and `flows_per_exporter`
/// flow records; one stats record for all exporters closes the stream.
pub fn mixed_records(exporters: u16, flows_per_exporter: usize) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for sysid in 0..exporters {
        records.push(sample_identity(sysid).into());
        records.push(sample_sampler(sysid, 100 + u32::from(sysid)).into());
        for flow in 0..flows_per_exporter {
            records.push(sample_flow(flow as u8)?.into());
        }
    }
    let stats = (0..exporters).map(|sysid| sample_stat(sysid, 1)).collect();
    records.push(ExporterStats::from_entries(stats).into());
    Ok(records)
}

/// Encoded form of [`mixed_records`].
pub fn mixed_stream(config: CodecConfig, exporters: u16, flows_per_exporter: usize) -> Result<Vec<u8>> {
    let mut writer = RecordWriter::new(config);
    for record in mixed_records(exporters, flows_per_exporter)? {
        writer.write_record(&record)?;
    }
    Ok(writer.into_inner())
}
