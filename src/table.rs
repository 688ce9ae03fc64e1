//! Exporter state assembled from metadata records.
//!
//! [`ExporterTable`] folds a decoded stream into one entry per sysid: the
//! exporter's identity, its latest counter snapshot and its sampler chain,
//! where the last sampler in the chain is the one currently in effect.
//!
//! Anomalies are returned as [`TableEvent`]s instead of being corrected. A
//! counter that goes backwards is reported and then taken as the new
//! baseline, since exporters reset their counters on restart.

use crate::records::{ExporterIdentity, ExporterStat, ExporterStats, Record, SamplerDescriptor, SamplerId};
use crate::types::record_type::{EXPORTER_STAT_RECORD, SAMPLER_RECORD};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Counter carried in an exporter stats entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Counter {
    SequenceFailures,
    Packets,
    Flows,
}

/// Something a caller may want to act on after applying a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableEvent {
    ExporterAdded { sysid: u16 },
    /// Same exporter, new protocol version.
    VersionChanged { sysid: u16, previous: u32, current: u32 },
    /// A different exporter took over a known sysid; its stats and samplers were dropped.
    ExporterReplaced { sysid: u16, previous: ExporterIdentity },
    CounterRegression { sysid: u16, counter: Counter, previous: u64, current: u64 },
    /// Stats or sampler for a sysid with no identity record seen yet.
    UnknownExporter { sysid: u32, record_type: u16 },
    SamplersCleared { sysid: u16, dropped: usize },
}

/// State kept for one exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExporterEntry {
    pub identity: ExporterIdentity,
    pub stats: Option<ExporterStat>,
    pub samplers: Vec<SamplerDescriptor>,
}

impl ExporterEntry {
    fn new(identity: ExporterIdentity) -> Self {
        Self { identity, stats: None, samplers: Vec::new() }
    }

    /// The sampler currently in effect.
    pub fn current_sampler(&self) -> Option<&SamplerDescriptor> {
        self.samplers.last()
    }
}

/// Exporters keyed by collector-assigned sysid.
///
/// Counters are stored as the latest snapshot per exporter. Sources that
/// write per-file deltas, as nfdump does, must be summed by the caller.
///
/// Mutation takes `&mut self`; wrap the table in a lock to share it between
/// ingestion paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterTable {
    exporters: BTreeMap<u16, ExporterEntry>,
}

impl ExporterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the table. Unknown records are ignored.
    pub fn apply(&mut self, record: &Record) -> Vec<TableEvent> {
        match record {
            Record::ExporterInfo(identity) => self.apply_identity(identity),
            Record::ExporterStats(stats) => self.apply_stats(stats),
            Record::Sampler(sampler) => self.apply_sampler(sampler),
            Record::Unknown(_) => Vec::new(),
        }
    }

    /// Fold every record of a stream, collecting the events in order.
    pub fn apply_all<'r>(&mut self, records: impl IntoIterator<Item = &'r Record>) -> Vec<TableEvent> {
        records.into_iter().flat_map(|record| self.apply(record)).collect()
    }

    fn apply_identity(&mut self, identity: &ExporterIdentity) -> Vec<TableEvent> {
        let sysid = identity.sysid;
        let Some(entry) = self.exporters.get_mut(&sysid) else {
            debug!(sysid, address = %identity.address, "Registered exporter");
            self.exporters.insert(sysid, ExporterEntry::new(*identity));
            return vec![TableEvent::ExporterAdded { sysid }];
        };

        let previous = entry.identity;
        if !previous.same_exporter(identity) {
            warn!(
                sysid,
                previous = %previous.address,
                current = %identity.address,
                "Exporter replaced at known sysid"
            );
            *entry = ExporterEntry::new(*identity);
            return vec![TableEvent::ExporterReplaced { sysid, previous }];
        }

        entry.identity = *identity;
        if previous.version != identity.version {
            debug!(sysid, previous = previous.version, current = identity.version, "Exporter version changed");
            return vec![TableEvent::VersionChanged {
                sysid,
                previous: previous.version,
                current: identity.version,
            }];
        }
        Vec::new()
    }

    fn apply_stats(&mut self, stats: &ExporterStats) -> Vec<TableEvent> {
        let mut events = Vec::new();
        for stat in stats.entries() {
            let Some(entry) = u16::try_from(stat.sysid).ok().and_then(|sysid| self.exporters.get_mut(&sysid))
            else {
                warn!(sysid = stat.sysid, "Stats for unknown exporter");
                events.push(TableEvent::UnknownExporter { sysid: stat.sysid, record_type: EXPORTER_STAT_RECORD });
                continue;
            };

            let sysid = entry.identity.sysid;
            if let Some(previous) = entry.stats {
                let counters = [
                    (Counter::SequenceFailures, u64::from(previous.sequence_failures), u64::from(stat.sequence_failures)),
                    (Counter::Packets, previous.packets, stat.packets),
                    (Counter::Flows, previous.flows, stat.flows),
                ];
                for (counter, previous, current) in counters {
                    if current < previous {
                        warn!(sysid, ?counter, previous, current, "Exporter counter went backwards");
                        events.push(TableEvent::CounterRegression { sysid, counter, previous, current });
                    }
                }
            }
            entry.stats = Some(*stat);
        }
        events
    }

    fn apply_sampler(&mut self, sampler: &SamplerDescriptor) -> Vec<TableEvent> {
        let sysid = sampler.exporter_sysid;
        let Some(entry) = self.exporters.get_mut(&sysid) else {
            warn!(sysid, "Sampler for unknown exporter");
            return vec![TableEvent::UnknownExporter { sysid: u32::from(sysid), record_type: SAMPLER_RECORD }];
        };

        let mut events = Vec::new();
        if sampler.id == SamplerId::Overwrite && !entry.samplers.is_empty() {
            let dropped = entry.samplers.len();
            entry.samplers.clear();
            debug!(sysid, dropped, "Sampler chain overwritten");
            events.push(TableEvent::SamplersCleared { sysid, dropped });
        }
        // A re-announced sampler moves to the tail instead of piling up
        entry.samplers.retain(|known| known.id != sampler.id);
        entry.samplers.push(*sampler);
        events
    }

    pub fn get(&self, sysid: u16) -> Option<&ExporterEntry> {
        self.exporters.get(&sysid)
    }

    /// Sampler in effect for an exporter.
    ///
    /// With a selector, the last sampler whose explicit id matches it;
    /// without, the last sampler in the chain.
    pub fn sampler_for(&self, sysid: u16, selector: Option<i64>) -> Option<&SamplerDescriptor> {
        let samplers = &self.exporters.get(&sysid)?.samplers;
        match selector {
            Some(id) => samplers.iter().rev().find(|sampler| sampler.id.explicit() == Some(id)),
            None => samplers.last(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExporterEntry> {
        self.exporters.values()
    }

    pub fn len(&self) -> usize {
        self.exporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exporters.is_empty()
    }
}
