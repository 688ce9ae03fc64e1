//! Codec configuration
//!
//! The configuration captures everything writer and reader must agree on beyond
//! the record layouts themselves. Hosts typically embed it in their own YAML
//! configuration:
//!
//! ```rust
//! use flowmeta::{ByteOrder, CodecConfig};
//!
//! let config = CodecConfig::from_yaml_str("byte_order: big\nfamily_codes:\n  inet6: 30\n").unwrap();
//! assert_eq!(config.byte_order, ByteOrder::Big);
//! assert_eq!(config.family_codes.inet, 2);
//! assert_eq!(config.family_codes.inet6, 30);
//! ```

use crate::types::{ByteOrder, FamilyCodes};
use crate::{RecordError, Result};
use serde::{Deserialize, Serialize};

/// Settings shared by every encode and decode call on one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Integer byte order of the stream
    pub byte_order: ByteOrder,
    /// Wire codes of the `sa_family` field
    pub family_codes: FamilyCodes,
}

impl CodecConfig {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self { byte_order, ..Self::default() }
    }

    pub fn with_family_codes(mut self, family_codes: FamilyCodes) -> Self {
        self.family_codes = family_codes;
        self
    }

    /// Parse and validate a configuration section from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: CodecConfig = serde_yaml_ng::from_str(yaml)
            .map_err(|e| RecordError::config(format!("invalid codec configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.family_codes.validate()
    }
}
