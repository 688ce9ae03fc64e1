//! Type code to decoder mapping

use crate::config::CodecConfig;
use crate::records::{
    ExporterIdentity, ExporterStats, MetadataRecord, Record, RecordHeader, SamplerDescriptor,
    UnknownRecord,
};
use crate::{RecordError, Result};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

/// Decoder for one record span.
///
/// The span is exactly `header.size` bytes long, header included.
pub type DecodeFn = fn(RecordHeader, &[u8], &CodecConfig) -> Result<Record>;

static STANDARD: LazyLock<DecoderRegistry> = LazyLock::new(DecoderRegistry::standard);

/// Registered record decoders, keyed by type code.
///
/// Codes without an entry decode to [`Record::Unknown`], which is how readers
/// stay compatible with record kinds added after they were built.
#[derive(Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<u16, DecodeFn>,
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut codes: Vec<_> = self.decoders.keys().collect();
        codes.sort();
        f.debug_struct("DecoderRegistry").field("record_types", &codes).finish()
    }
}

fn decode_as<R>(header: RecordHeader, span: &[u8], config: &CodecConfig) -> Result<Record>
where
    R: MetadataRecord + Into<Record>,
{
    R::decode_framed(header, span, config).map(Into::into)
}

impl DecoderRegistry {
    /// A registry that decodes nothing; every record is surfaced as unknown.
    pub fn empty() -> Self {
        Self { decoders: HashMap::new() }
    }

    /// Exporter identity, exporter stats and sampler decoders.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register_record::<ExporterIdentity>();
        registry.register_record::<ExporterStats>();
        registry.register_record::<SamplerDescriptor>();
        registry
    }

    /// Shared instance of [`DecoderRegistry::standard`].
    pub fn standard_ref() -> &'static DecoderRegistry {
        &STANDARD
    }

    /// Register a decoder, returning the one it replaces.
    pub fn register(&mut self, record_type: u16, decoder: DecodeFn) -> Option<DecodeFn> {
        self.decoders.insert(record_type, decoder)
    }

    /// Register the decoder of a [`MetadataRecord`] kind under its own code.
    pub fn register_record<R>(&mut self) -> Option<DecodeFn>
    where
        R: MetadataRecord + Into<Record>,
    {
        self.register(R::RECORD_TYPE, decode_as::<R>)
    }

    pub fn unregister(&mut self, record_type: u16) -> Option<DecodeFn> {
        self.decoders.remove(&record_type)
    }

    pub fn is_registered(&self, record_type: u16) -> bool {
        self.decoders.contains_key(&record_type)
    }

    /// Decode one record span, falling back to an opaque record.
    pub fn decode(&self, header: RecordHeader, span: &[u8], config: &CodecConfig) -> Result<Record> {
        header.body_len()?;
        match self.decoders.get(&header.record_type) {
            Some(decoder) => {
                debug!(record_type = header.record_type, size = header.size, "Decoding record");
                decoder(header, span, config)
            }
            None => {
                debug!(
                    record_type = header.record_type,
                    size = header.size,
                    "Skipping unregistered record type"
                );
                let size = header.size as usize;
                let body = span.get(RecordHeader::LEN..size).ok_or(RecordError::TruncatedBody {
                    record_type: header.record_type,
                    needed: size,
                    available: span.len(),
                })?;
                Ok(Record::Unknown(UnknownRecord::new(header.record_type, body)?))
            }
        }
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
