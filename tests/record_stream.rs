//! End-to-end behaviour of record streams written and read through the public API.

use anyhow::Result;
use flowmeta::{
    Address, ByteOrder, CodecConfig, Counter, ExporterIdentity, ExporterStat, ExporterStats, ExporterTable,
    FamilyCodes, MetadataRecord, Record, RecordError, RecordStream, RecordWriter, SamplerDescriptor, SamplerId,
    TableEvent, UnknownRecord, decode_all,
};
use std::net::{Ipv4Addr, Ipv6Addr};

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn session(config: CodecConfig) -> Result<(Vec<u8>, Vec<Record>)> {
    let records: Vec<Record> = vec![
        ExporterIdentity::new(9, Ipv4Addr::new(10, 0, 0, 1), 1, 42).into(),
        ExporterIdentity::new(10, "2001:db8::1".parse::<Ipv6Addr>()?, 2, 7).into(),
        SamplerDescriptor::new(1, 1, SamplerId::Explicit(3), 512, 0).into(),
        UnknownRecord::new(0x000b, [0xab; 44])?.into(),
        ExporterStats::from_entries(vec![
            ExporterStat { sysid: 1, sequence_failures: 0, packets: 900, flows: 30 },
            ExporterStat { sysid: 2, sequence_failures: 2, packets: 100, flows: 4 },
        ])
        .into(),
    ];

    let mut writer = RecordWriter::new(config);
    for record in &records {
        writer.write_record(record)?;
    }
    Ok((writer.into_inner(), records))
}

#[test]
fn session_decodes_in_both_byte_orders() -> Result<()> {
    init_tracing();
    for order in [ByteOrder::Little, ByteOrder::Big, ByteOrder::Native] {
        let config = CodecConfig::new(order);
        let (bytes, records) = session(config)?;
        assert_eq!(decode_all(&bytes, config)?, records);
    }
    Ok(())
}

#[test]
fn reading_with_the_wrong_order_fails_instead_of_misreading() -> Result<()> {
    init_tracing();
    let (bytes, _) = session(CodecConfig::new(ByteOrder::Big))?;
    let mut stream = RecordStream::new(&bytes, CodecConfig::new(ByteOrder::Little));
    // 0x0007 read little-endian from a big-endian header is 0x0700, size 0x2000.
    assert!(matches!(stream.next(), Some(Err(RecordError::TruncatedStream { .. }))));
    assert!(stream.next().is_none());
    Ok(())
}

#[test]
fn sizes_chain_to_the_end_of_input() -> Result<()> {
    let config = CodecConfig::default();
    let (bytes, records) = session(config)?;
    let mut stream = RecordStream::new(&bytes, config);
    let mut offsets = Vec::new();
    while let Some(record) = stream.next() {
        record?;
        offsets.push(stream.offset());
    }
    assert_eq!(offsets.len(), records.len());
    assert_eq!(offsets.last(), Some(&bytes.len()));
    assert_eq!(offsets, vec![32, 64, 88, 136, 192]);
    Ok(())
}

#[test]
fn truncation_is_reported_at_the_record_boundary() -> Result<()> {
    let config = CodecConfig::default();
    let (bytes, _) = session(config)?;
    let cut = &bytes[..bytes.len() - 10];

    let results: Vec<_> = RecordStream::new(cut, config).collect();
    assert_eq!(results.len(), 5);
    assert!(results[..4].iter().all(|r| r.is_ok()));
    match &results[4] {
        Err(RecordError::TruncatedStream { record_type, offset, needed, available }) => {
            assert_eq!(*record_type, 0x0008);
            assert_eq!(*offset, 136);
            assert_eq!(*needed, 56);
            assert_eq!(*available, 46);
        }
        other => panic!("Expected TruncatedStream, got {other:?}"),
    }
    Ok(())
}

#[test]
fn unknown_records_survive_a_rewrite_verbatim() -> Result<()> {
    let config = CodecConfig::default();
    let (bytes, _) = session(config)?;
    let mut writer = RecordWriter::new(config);
    for record in RecordStream::new(&bytes, config) {
        writer.write_record(&record?)?;
    }
    assert_eq!(writer.as_bytes(), &bytes[..]);
    Ok(())
}

#[test]
fn unknown_records_follow_the_rewriting_stream_order() -> Result<()> {
    init_tracing();
    let little = CodecConfig::new(ByteOrder::Little);
    let big = CodecConfig::new(ByteOrder::Big);
    let (bytes, records) = session(little)?;

    let mut writer = RecordWriter::new(big);
    for record in RecordStream::new(&bytes, little) {
        writer.write_record(&record?)?;
    }
    assert_eq!(writer.len(), bytes.len());

    // Flow record header at offset 88: type 0x000b, size 48, big-endian.
    assert_eq!(&writer.as_bytes()[88..92], &[0x00, 0x0b, 0x00, 0x30]);
    assert_eq!(decode_all(writer.as_bytes(), big)?, records);
    Ok(())
}

#[test]
fn bsd_family_codes_are_configurable() -> Result<()> {
    let bsd = CodecConfig::default().with_family_codes(FamilyCodes { inet: 2, inet6: 28 });
    let identity = ExporterIdentity::new(9, Ipv6Addr::LOCALHOST, 4, 1);
    let bytes = identity.encode(&bsd)?;
    assert_eq!(u16::from_le_bytes([bytes[24], bytes[25]]), 28);

    assert!(matches!(
        ExporterIdentity::decode(&bytes, &CodecConfig::default()),
        Err(RecordError::InvalidFamily { family: 28 })
    ));
    assert_eq!(ExporterIdentity::decode(&bytes, &bsd)?.address, Address::V6(Ipv6Addr::LOCALHOST));
    Ok(())
}

#[test]
fn yaml_config_drives_decoding() -> Result<()> {
    let config = CodecConfig::from_yaml_str("byte_order: big\nfamily_codes:\n  inet: 2\n  inet6: 30\n")?;
    let (bytes, records) = session(config)?;
    assert_eq!(decode_all(&bytes, config)?, records);
    Ok(())
}

#[test]
fn table_folds_a_session() -> Result<()> {
    init_tracing();
    let config = CodecConfig::default();
    let (bytes, records) = session(config)?;

    let mut table = ExporterTable::new();
    let events = table.apply_all(&records);
    assert_eq!(events, vec![TableEvent::ExporterAdded { sysid: 1 }, TableEvent::ExporterAdded { sysid: 2 }]);

    assert_eq!(table.sampler_for(1, Some(3)).map(|s| s.packet_interval), Some(512));
    assert!(table.sampler_for(2, None).is_none());
    assert_eq!(table.get(2).and_then(|e| e.stats).map(|s| s.sequence_failures), Some(2));

    // A restarted exporter reports smaller counters.
    let restart = Record::from(ExporterStats::from_entries(vec![ExporterStat {
        sysid: 1,
        sequence_failures: 0,
        packets: 12,
        flows: 1,
    }]));
    let events = table.apply(&restart);
    assert_eq!(
        events,
        vec![
            TableEvent::CounterRegression { sysid: 1, counter: Counter::Packets, previous: 900, current: 12 },
            TableEvent::CounterRegression { sysid: 1, counter: Counter::Flows, previous: 30, current: 1 },
        ]
    );

    assert_eq!(decode_all(&bytes, config)?.len(), records.len());
    Ok(())
}
