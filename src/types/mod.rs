//! Wire-level building blocks shared by every record kind.
//!
//! - [`ByteOrder`] fixes the integer encoding of a stream
//! - [`Address`] / [`PackedAddress`] carry exporter addresses of either family
//! - [`RecordType`] names the registered record type codes

mod address;
mod byte_order;
pub mod record_type;

pub use address::{AF_INET, AF_INET6, Address, AddressFamily, FamilyCodes, PackedAddress};
pub use byte_order::ByteOrder;
pub(crate) use byte_order::{FieldReader, FieldWriter};
pub use record_type::RecordType;
