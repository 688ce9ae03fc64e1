//! Record framing over tokio I/O with `tokio_util::codec`.

use anyhow::Result;
use flowmeta::{
    ByteOrder, CodecConfig, ExporterIdentity, ExporterStat, ExporterStats, Record, RecordCodec, RecordError,
    RecordWriter, SamplerDescriptor, SamplerId, UnknownRecord,
};
use futures::{SinkExt, StreamExt};
use std::net::Ipv4Addr;
use tokio::io::AsyncWriteExt;
use tokio_util::codec::{FramedRead, FramedWrite};

fn records(config: &CodecConfig) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for sysid in 0..16u16 {
        records.push(ExporterIdentity::new(9, Ipv4Addr::new(10, 1, 0, sysid as u8), sysid, 500).into());
        records.push(SamplerDescriptor::new(sysid, 0, SamplerId::DeviceDefault, 64, 0).into());
        records.push(UnknownRecord::new(0x000b, [sysid as u8; 36])?.into());
    }
    let stats = (0..16u32).map(|sysid| ExporterStat { sysid, packets: 10, flows: 1, ..Default::default() });
    records.push(ExporterStats::from_entries(stats.collect()).into());
    Ok(records)
}

fn encode(config: CodecConfig, records: &[Record]) -> Result<Vec<u8>> {
    let mut writer = RecordWriter::new(config);
    for record in records {
        writer.write_record(record)?;
    }
    Ok(writer.into_inner())
}

#[tokio::test]
async fn framed_read_over_a_byte_slice() -> Result<()> {
    let _ = tracing_subscriber::fmt::try_init();
    let config = CodecConfig::new(ByteOrder::Big);
    let expected = records(&config)?;
    let bytes = encode(config, &expected)?;

    let mut framed = FramedRead::new(&bytes[..], RecordCodec::new(config));
    let mut decoded = Vec::new();
    while let Some(record) = framed.next().await {
        decoded.push(record?);
    }
    assert_eq!(decoded, expected);
    Ok(())
}

#[tokio::test]
async fn framed_read_across_small_writes() -> Result<()> {
    let _ = tracing_subscriber::fmt::try_init();
    let config = CodecConfig::default();
    let expected = records(&config)?;
    let bytes = encode(config, &expected)?;

    let (mut tx, rx) = tokio::io::duplex(7);
    let writer = tokio::spawn(async move {
        for chunk in bytes.chunks(5) {
            tx.write_all(chunk).await?;
        }
        tx.shutdown().await
    });

    let decoded: Vec<Record> = FramedRead::new(rx, RecordCodec::new(config))
        .map(|record| record.map_err(anyhow::Error::from))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_>>()?;
    writer.await??;

    assert_eq!(decoded, expected);
    Ok(())
}

#[tokio::test]
async fn eof_mid_record_is_truncated_stream() -> Result<()> {
    let config = CodecConfig::default();
    let expected = records(&config)?;
    let bytes = encode(config, &expected)?;
    let cut = &bytes[..bytes.len() - 3];

    let mut framed = FramedRead::new(cut, RecordCodec::new(config));
    let mut ok = 0;
    let err = loop {
        match framed.next().await {
            Some(Ok(_)) => ok += 1,
            Some(Err(e)) => break e,
            None => panic!("Stream ended without reporting truncation"),
        }
    };

    assert_eq!(ok, expected.len() - 1);
    assert!(matches!(err, RecordError::TruncatedStream { record_type: 0x0008, .. }));
    assert!(!err.is_incomplete());
    Ok(())
}

#[tokio::test]
async fn framed_write_matches_record_writer() -> Result<()> {
    let config = CodecConfig::default();
    let expected = records(&config)?;

    let mut framed = FramedWrite::new(Vec::new(), RecordCodec::new(config));
    for record in expected.iter().cloned() {
        framed.send(record).await?;
    }

    assert_eq!(framed.into_inner(), encode(config, &expected)?);
    Ok(())
}
