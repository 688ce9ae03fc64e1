//! Dual-family exporter addresses and their packed 128-bit form
//!
//! ## Packed Layout
//!
//! The packed form is a fixed 16-byte block regardless of family:
//!
//! ```text
//! IPv6:  | word 0: octets 0..8  | word 1: octets 8..16 |
//! IPv4:  | 0 0 0 0 0 0 0 0      | addr u32 | 0 0 0 0   |
//!        0                      8          12          16
//! ```
//!
//! Each 64-bit word, and the IPv4 value, is written in the stream byte order.
//! IPv4 padding is always zero on encode so two packed IPv4 addresses compare
//! byte-for-byte. Decoding reads only the designated slot.

use super::ByteOrder;
use crate::{RecordError, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// `AF_INET` as written by every supported host
pub const AF_INET: u16 = 2;

/// `AF_INET6` as written by Linux hosts
pub const AF_INET6: u16 = 10;

/// Address family of an exporter address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    Inet,
    Inet6,
}

/// Wire codes used for the `sa_family` field.
///
/// The IPv6 code is platform specific (10 on Linux, 28 on FreeBSD, 30 on macOS),
/// so files written elsewhere need a matching table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyCodes {
    pub inet: u16,
    pub inet6: u16,
}

impl Default for FamilyCodes {
    fn default() -> Self {
        Self { inet: AF_INET, inet6: AF_INET6 }
    }
}

impl FamilyCodes {
    /// Map a wire code to a family, failing with `InvalidFamily` for anything else.
    pub fn family(&self, code: u16) -> Result<AddressFamily> {
        if code == self.inet {
            Ok(AddressFamily::Inet)
        } else if code == self.inet6 {
            Ok(AddressFamily::Inet6)
        } else {
            Err(RecordError::InvalidFamily { family: code })
        }
    }

    pub fn code(&self, family: AddressFamily) -> u16 {
        match family {
            AddressFamily::Inet => self.inet,
            AddressFamily::Inet6 => self.inet6,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.inet == self.inet6 {
            return Err(RecordError::config(format!(
                "address family codes must differ, both are {}",
                self.inet
            )));
        }
        Ok(())
    }
}

/// An exporter address tagged with its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Address {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl Address {
    pub fn family(&self) -> AddressFamily {
        match self {
            Address::V4(_) => AddressFamily::Inet,
            Address::V6(_) => AddressFamily::Inet6,
        }
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => Address::V4(v4),
            IpAddr::V6(v6) => Address::V6(v6),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address::V4(ip)
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Address::V6(ip)
    }
}

impl From<Address> for IpAddr {
    fn from(address: Address) -> Self {
        match address {
            Address::V4(v4) => IpAddr::V4(v4),
            Address::V6(v6) => IpAddr::V6(v6),
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::V4(v4) => v4.fmt(f),
            Address::V6(v6) => v6.fmt(f),
        }
    }
}

/// Fixed 16-byte container holding either address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedAddress([u8; 16]);

impl PackedAddress {
    /// Width of the packed form in bytes
    pub const LEN: usize = 16;

    /// Byte offset of the IPv4 slot within the packed form
    pub const V4_OFFSET: usize = 8;

    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Pack an address, zero-filling everything outside the IPv4 slot.
    pub fn encode(address: &Address, order: ByteOrder) -> Self {
        let mut bytes = [0u8; 16];
        match address {
            Address::V4(v4) => {
                let slot = order.u32_bytes(u32::from(*v4));
                bytes[Self::V4_OFFSET..Self::V4_OFFSET + 4].copy_from_slice(&slot);
            }
            Address::V6(v6) => {
                let octets = v6.octets();
                for (word, chunk) in octets.chunks_exact(8).enumerate() {
                    let mut half = [0u8; 8];
                    half.copy_from_slice(chunk);
                    let value = u64::from_be_bytes(half);
                    bytes[word * 8..word * 8 + 8].copy_from_slice(&order.u64_bytes(value));
                }
            }
        }
        Self(bytes)
    }

    /// Unpack using an already validated family.
    pub fn to_address(&self, family: AddressFamily, order: ByteOrder) -> Address {
        match family {
            AddressFamily::Inet => {
                let mut slot = [0u8; 4];
                slot.copy_from_slice(&self.0[Self::V4_OFFSET..Self::V4_OFFSET + 4]);
                Address::V4(Ipv4Addr::from(order.u32_from(slot)))
            }
            AddressFamily::Inet6 => {
                let mut octets = [0u8; 16];
                for word in 0..2 {
                    let mut half = [0u8; 8];
                    half.copy_from_slice(&self.0[word * 8..word * 8 + 8]);
                    let value = order.u64_from(half);
                    octets[word * 8..word * 8 + 8].copy_from_slice(&value.to_be_bytes());
                }
                Address::V6(Ipv6Addr::from(octets))
            }
        }
    }

    /// Unpack using the raw `sa_family` wire code.
    pub fn decode(&self, family: u16, codes: &FamilyCodes, order: ByteOrder) -> Result<Address> {
        let family = codes.family(family)?;
        Ok(self.to_address(family, order))
    }

    /// Returns true when every byte outside the IPv4 slot is zero.
    pub fn has_clean_v4_padding(&self) -> bool {
        self.0[..Self::V4_OFFSET].iter().chain(&self.0[Self::V4_OFFSET + 4..]).all(|b| *b == 0)
    }
}
