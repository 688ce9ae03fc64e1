//! Forward-only record iterator over an in-memory buffer

use super::{DecodeState, DecoderRegistry};
use crate::config::CodecConfig;
use crate::records::{Record, RecordHeader};
use crate::{RecordError, Result};
use std::iter::FusedIterator;
use tracing::trace;

/// Lazy decoder over a byte slice holding consecutive records.
///
/// Framing errors (a short header, a size below the header length, a record
/// running past the end of input) end the stream after being yielded once. A
/// record whose body fails validation is yielded as an error but the stream
/// stays positioned on the next record, since its boundary is still known.
pub struct RecordStream<'a> {
    data: &'a [u8],
    offset: usize,
    state: DecodeState,
    finished: bool,
    config: CodecConfig,
    registry: &'a DecoderRegistry,
}

impl<'a> RecordStream<'a> {
    /// Decode with the standard registry.
    pub fn new(data: &'a [u8], config: CodecConfig) -> Self {
        Self::with_registry(data, config, DecoderRegistry::standard_ref())
    }

    pub fn with_registry(data: &'a [u8], config: CodecConfig, registry: &'a DecoderRegistry) -> Self {
        Self { data, offset: 0, state: DecodeState::AwaitingHeader, finished: false, config, registry }
    }

    /// Byte offset of the next unread header.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        let data = self.data;
        &data[self.offset..]
    }

    fn fail(&mut self, err: RecordError) -> Option<Result<Record>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl Iterator for RecordStream<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            match self.state {
                DecodeState::AwaitingHeader => {
                    let remaining = self.remaining();
                    if remaining.is_empty() {
                        self.finished = true;
                        return None;
                    }

                    let header = match RecordHeader::decode(remaining, self.config.byte_order) {
                        Ok(header) => header,
                        Err(e) => return self.fail(e),
                    };
                    if let Err(e) = header.body_len() {
                        return self.fail(e);
                    }

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
                    let remaining = self.remaining();
                    if remaining.len() < size {
                        return self.fail(RecordError::TruncatedStream {
                            record_type: header.record_type,
                            offset: self.offset,
                            needed: size,
                            available: remaining.len(),
                        });
                    }

                    let span = &remaining[..size];
                    self.offset += size;
                    self.state = DecodeState::AwaitingHeader;
                    return Some(self.registry.decode(header, span, &self.config));
                }
            }
        }
    }
}

impl FusedIterator for RecordStream<'_> {}

/// Decode a whole buffer, stopping at the first error.
pub fn decode_all(data: &[u8], config: CodecConfig) -> Result<Vec<Record>> {
    RecordStream::new(data, config).collect()
}
