//! Byte order handling for record fields

use crate::{RecordError, Result};
use serde::{Deserialize, Serialize};

/// Byte order of multi-byte integers in a record stream.
///
/// nfdump writes records in host order, so the order is a property of the
/// file, agreed between writer and reader rather than assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Little-endian (x86, arm64 hosts)
    #[default]
    Little,
    /// Big-endian
    Big,
    /// Order of the machine running this code
    Native,
}

impl ByteOrder {
    /// Resolve `Native` to the concrete order of the current target.
    pub const fn resolved(self) -> Self {
        match self {
            ByteOrder::Native => {
                if cfg!(target_endian = "big") {
                    ByteOrder::Big
                } else {
                    ByteOrder::Little
                }
            }
            other => other,
        }
    }

    fn is_big(self) -> bool {
        matches!(self.resolved(), ByteOrder::Big)
    }

    pub fn u16_from(self, bytes: [u8; 2]) -> u16 {
        if self.is_big() { u16::from_be_bytes(bytes) } else { u16::from_le_bytes(bytes) }
    }

    pub fn u32_from(self, bytes: [u8; 4]) -> u32 {
        if self.is_big() { u32::from_be_bytes(bytes) } else { u32::from_le_bytes(bytes) }
    }

    pub fn u64_from(self, bytes: [u8; 8]) -> u64 {
        if self.is_big() { u64::from_be_bytes(bytes) } else { u64::from_le_bytes(bytes) }
    }

    pub fn u16_bytes(self, value: u16) -> [u8; 2] {
        if self.is_big() { value.to_be_bytes() } else { value.to_le_bytes() }
    }

    pub fn u32_bytes(self, value: u32) -> [u8; 4] {
        if self.is_big() { value.to_be_bytes() } else { value.to_le_bytes() }
    }

    pub fn u64_bytes(self, value: u64) -> [u8; 8] {
        if self.is_big() { value.to_be_bytes() } else { value.to_le_bytes() }
    }
}

/// Bounds-checked sequential reader over one record body.
///
/// Every read past the end yields `TruncatedBody` for the owning record type.
pub(crate) struct FieldReader<'a> {
    data: &'a [u8],
    position: usize,
    record_type: u16,
    order: ByteOrder,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(data: &'a [u8], record_type: u16, order: ByteOrder) -> Self {
        Self { data, position: 0, record_type, order }
    }

    pub(crate) fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.require(N)?;
        let end = self.position + N;
        let bytes = &self.data[self.position..end];
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.position = end;
        Ok(out)
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        let bytes = self.array::<2>()?;
        Ok(self.order.u16_from(bytes))
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        let bytes = self.array::<4>()?;
        Ok(self.order.u32_from(bytes))
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        let bytes = self.array::<8>()?;
        Ok(self.order.u64_from(bytes))
    }

    pub(crate) fn i64(&mut self) -> Result<i64> {
        Ok(self.u64()? as i64)
    }

    /// Fail with `TruncatedBody` unless `len` more bytes are available.
    pub(crate) fn require(&self, len: usize) -> Result<()> {
        match self.position.checked_add(len) {
            Some(needed) if needed <= self.data.len() => Ok(()),
            needed => Err(RecordError::TruncatedBody {
                record_type: self.record_type,
                needed: needed.unwrap_or(usize::MAX),
                available: self.data.len(),
            }),
        }
    }

    pub(crate) fn consumed(&self) -> usize {
        self.position
    }
}

/// Field writer appending to an output buffer in a fixed byte order.
pub(crate) struct FieldWriter<'a> {
    out: &'a mut Vec<u8>,
    order: ByteOrder,
}

impl<'a> FieldWriter<'a> {
    pub(crate) fn new(out: &'a mut Vec<u8>, order: ByteOrder) -> Self {
        Self { out, order }
    }

    pub(crate) fn bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    pub(crate) fn u16(&mut self, value: u16) {
        let bytes = self.order.u16_bytes(value);
        self.out.extend_from_slice(&bytes);
    }

    pub(crate) fn u32(&mut self, value: u32) {
        let bytes = self.order.u32_bytes(value);
        self.out.extend_from_slice(&bytes);
    }

    pub(crate) fn u64(&mut self, value: u64) {
        let bytes = self.order.u64_bytes(value);
        self.out.extend_from_slice(&bytes);
    }

    pub(crate) fn i64(&mut self, value: i64) {
        self.u64(value as u64);
    }
}
