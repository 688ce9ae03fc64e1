//! Record stream writer

use crate::config::CodecConfig;
use crate::records::{ExporterStat, ExporterStats, MetadataRecord, Record};
use crate::Result;

/// Appends encoded records to an owned buffer.
///
/// The buffer is handed to the file or socket framing layer with
/// [`RecordWriter::into_inner`].
#[derive(Debug, Clone, Default)]
pub struct RecordWriter {
    buf: Vec<u8>,
    records: usize,
    config: CodecConfig,
}

impl RecordWriter {
    pub fn new(config: CodecConfig) -> Self {
        Self { buf: Vec::new(), records: 0, config }
    }

    pub fn with_capacity(config: CodecConfig, capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity), records: 0, config }
    }

    /// Append one typed record, returning its encoded length.
    pub fn write<R: MetadataRecord>(&mut self, record: &R) -> Result<usize> {
        let bytes = record.encode(&self.config)?;
        Ok(self.append(&bytes))
    }

    /// Append any stream item; unknown records are re-emitted verbatim.
    pub fn write_record(&mut self, record: &Record) -> Result<usize> {
        let bytes = record.encode(&self.config)?;
        Ok(self.append(&bytes))
    }

    /// Append stats for any number of exporters, split across as many records as needed.
    pub fn write_stats(&mut self, entries: &[ExporterStat]) -> Result<usize> {
        let mut written = 0;
        for batch in ExporterStats::batches(entries) {
            self.write(&batch)?;
            written += 1;
        }
        Ok(written)
    }

    fn append(&mut self, bytes: &[u8]) -> usize {
        self.buf.extend_from_slice(bytes);
        self.records += 1;
        bytes.len()
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ExporterIdentity, SamplerDescriptor, SamplerId, UnknownRecord};
    use crate::stream::decode_all;
    use std::net::Ipv6Addr;

    #[test]
    fn written_stream_decodes_in_order() {
        let config = CodecConfig::default();
        let identity = ExporterIdentity::new(10, Ipv6Addr::LOCALHOST, 2, 5);
        let sampler = SamplerDescriptor::new(2, 1, SamplerId::Explicit(7), 64, 0);
        let unknown = UnknownRecord::new(0x00ab, [1, 2, 3, 4]).unwrap();

        let mut writer = RecordWriter::new(config);
        assert_eq!(writer.write(&identity).unwrap(), 32);
        assert_eq!(writer.write(&sampler).unwrap(), 24);
        assert_eq!(writer.write_record(&Record::Unknown(unknown.clone())).unwrap(), 8);
        assert_eq!(writer.record_count(), 3);
        assert_eq!(writer.len(), 64);

        let records = decode_all(&writer.into_inner(), config).unwrap();
        assert_eq!(
            records,
            vec![Record::ExporterInfo(identity), Record::Sampler(sampler), Record::Unknown(unknown)]
        );
    }

    #[test]
    fn large_stats_are_split_into_records() {
        let config = CodecConfig::default();
        let entries: Vec<_> = (0..(ExporterStats::MAX_ENTRIES * 2 + 5) as u32)
            .map(|sysid| ExporterStat { sysid, ..ExporterStat::default() })
            .collect();

        let mut writer = RecordWriter::new(config);
        assert_eq!(writer.write_stats(&entries).unwrap(), 3);

        let decoded: Vec<ExporterStat> = decode_all(writer.as_bytes(), config)
            .unwrap()
            .into_iter()
            .flat_map(|record| match record {
                Record::ExporterStats(stats) => stats.into_entries(),
                other => panic!("Expected stats, got {other:?}"),
            })
            .collect();
        assert_eq!(decoded, entries);
    }

    #[test]
    fn failed_write_leaves_buffer_untouched() {
        let mut writer = RecordWriter::new(CodecConfig::default());
        let sampler = SamplerDescriptor::new(1, 0, SamplerId::Explicit(-4), 1, 0);
        assert!(writer.write(&sampler).is_err());
        assert!(writer.is_empty());
        assert_eq!(writer.record_count(), 0);
    }
}
