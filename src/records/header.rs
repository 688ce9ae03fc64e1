//! Universal record header
//!
//! ```text
//! offset 0: type  (u16)
//! offset 2: size  (u16)  total record length, header included
//! ```

use crate::types::{ByteOrder, RecordType};
use crate::{RecordError, Result};

/// The 4-byte prefix present on every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordHeader {
    pub record_type: u16,
    /// Total length of the record including these 4 bytes
    pub size: u16,
}

impl RecordHeader {
    /// Encoded header length in bytes
    pub const LEN: usize = 4;

    pub const fn new(record_type: u16, size: u16) -> Self {
        Self { record_type, size }
    }

    pub fn encode(&self, order: ByteOrder) -> [u8; 4] {
        let mut out = [0u8; 4];
        out[..2].copy_from_slice(&order.u16_bytes(self.record_type));
        out[2..].copy_from_slice(&order.u16_bytes(self.size));
        out
    }

    /// Parse a header from the front of `bytes`.
    pub fn decode(bytes: &[u8], order: ByteOrder) -> Result<Self> {
        if bytes.len() < Self::LEN {
            return Err(RecordError::truncated_header(bytes.len()));
        }
        let record_type = order.u16_from([bytes[0], bytes[1]]);
        let size = order.u16_from([bytes[2], bytes[3]]);
        Ok(Self { record_type, size })
    }

    /// Length of the body that follows the header.
    ///
    /// A size smaller than the header itself can never be skipped and fails
    /// with `InvalidSize`.
    pub fn body_len(&self) -> Result<usize> {
        let size = self.size as usize;
        if size < Self::LEN {
            return Err(RecordError::InvalidSize {
                record_type: self.record_type,
                size: self.size,
                minimum: Self::LEN,
            });
        }
        Ok(size - Self::LEN)
    }

    pub fn kind(&self) -> RecordType {
        RecordType::from_code(self.record_type)
    }
}
