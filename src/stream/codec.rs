//! tokio_util::codec implementation for record streams

use super::{DecodeState, DecoderRegistry};
use crate::config::CodecConfig;
use crate::records::{Record, RecordHeader};
use crate::{RecordError, Result};
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

/// Incremental record framing over `BytesMut` buffers.
///
/// The caller owns the socket or file; wrap it with
/// `tokio_util::codec::FramedRead::new(reader, RecordCodec::new(config))`.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    config: CodecConfig,
    registry: DecoderRegistry,
    state: DecodeState,
    offset: usize,
}

impl RecordCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self::with_registry(config, DecoderRegistry::standard())
    }

    pub fn with_registry(config: CodecConfig, registry: DecoderRegistry) -> Self {
        Self { config, registry, state: DecodeState::AwaitingHeader, offset: 0 }
    }

    /// Total bytes framed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn registry_mut(&mut self) -> &mut DecoderRegistry {
        &mut self.registry
    }
}

impl Decoder for RecordCodec {
    type Item = Record;
    type Error = RecordError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        loop {
            match self.state {
                DecodeState::AwaitingHeader => {
                    if src.len() < RecordHeader::LEN {
                        return Ok(None);
                    }
                    let header = RecordHeader::decode(src, self.config.byte_order)?;
                    header.body_len()?;
                    trace!(
                        offset = self.offset,
                        record_type = header.record_type,
                        size = header.size,
                        "Parsed record header"
                    );
                    self.state = DecodeState::AwaitingBody(header);
                }
                DecodeState::AwaitingBody(header) => {
                    let size = header.size as usize;
                    if src.len() < size {
                        src.reserve(size - src.len());
                        return Ok(None);
                    }

                    let span = src.split_to(size);
                    self.offset += size;
                    self.state = DecodeState::AwaitingHeader;
                    return self.registry.decode(header, &span, &self.config).map(Some);
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>> {
        if let Some(record) = self.decode(buf)? {
            return Ok(Some(record));
        }

        match self.state {
            DecodeState::AwaitingHeader if buf.is_empty() => Ok(None),
            DecodeState::AwaitingHeader => Err(RecordError::truncated_header(buf.len())),
            DecodeState::AwaitingBody(header) => Err(RecordError::TruncatedStream {
                record_type: header.record_type,
                offset: self.offset,
                needed: header.size as usize,
                available: buf.len(),
            }),
        }
    }
}

impl Encoder<Record> for RecordCodec {
    type Error = RecordError;

    fn encode(&mut self, item: Record, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&Record>::encode(self, &item, dst)
    }
}

impl<'a> Encoder<&'a Record> for RecordCodec {
    type Error = RecordError;

    fn encode(&mut self, item: &'a Record, dst: &mut BytesMut) -> Result<()> {
        let bytes = item.encode(&self.config)?;
        dst.extend_from_slice(&bytes);
        Ok(())
    }
}
