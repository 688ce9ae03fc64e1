//! Error types for metadata record processing.
//!
//! Every decode failure is reported to the immediate caller as a typed [`RecordError`].
//! The only condition that is deliberately not an error is an unregistered record type,
//! which the stream surfaces as [`crate::Record::Unknown`].
//!
//! ## Error Categories
//!
//! - **Truncation**: the input ended before a header, body or stream was complete
//! - **Framing**: a declared `size` disagrees with the record layout
//! - **Field validation**: address family or sampler id outside the allowed set
//! - **Encoding misuse**: arguments that can never produce a valid record
//! - **Configuration / I/O**: host-side configuration and the async codec adapter
//!
//! ## Classification
//!
//! ```rust
//! use flowmeta::RecordError;
//!
//! let error = RecordError::truncated_header(3);
//! assert!(error.is_incomplete());
//! assert!(!error.is_caller_bug());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use thiserror::Error;

/// Result type alias for record operations.
pub type Result<T, E = RecordError> = std::result::Result<T, E>;

/// Main error type for record encoding and decoding.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RecordError {
    #[error("Truncated record header: need 4 bytes, have {available}")]
    TruncatedHeader { available: usize },

    #[error("Truncated body of record type {record_type:#06x}: need {needed} bytes, have {available}")]
    TruncatedBody { record_type: u16, needed: usize, available: usize },

    #[error(
        "Stream ended inside record type {record_type:#06x} at offset {offset}: need {needed} bytes, have {available}"
    )]
    TruncatedStream { record_type: u16, offset: usize, needed: usize, available: usize },

    #[error("Invalid size {size} for record type {record_type:#06x}: minimum is {minimum}")]
    InvalidSize { record_type: u16, size: u16, minimum: usize },

    #[error(
        "Size mismatch in record type {record_type:#06x}: declared {declared} bytes, layout uses {consumed}"
    )]
    SizeMismatch { record_type: u16, declared: usize, consumed: usize },

    #[error("Stat count mismatch: declared {declared}, got {actual} entries")]
    CountMismatch { declared: u32, actual: usize },

    #[error("Invalid address family {family}")]
    InvalidFamily { family: u16 },

    #[error("Invalid sampler id {id}: negative ids other than -1, -2, -3 are reserved")]
    InvalidSamplerId { id: i64 },

    #[error("Unexpected record type {found:#06x}, expected {expected:#06x}")]
    UnexpectedType { expected: u16, found: u16 },

    #[error("Record type {record_type:#06x} would encode to {len} bytes, exceeding the 16-bit size field")]
    RecordTooLarge { record_type: u16, len: usize },

    #[error("Configuration error: {details}")]
    Config { details: String },

    #[error("I/O error while framing records")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

impl RecordError {
    /// Returns whether more input bytes could turn this failure into a success.
    ///
    /// Incremental readers use this to decide between waiting for data and
    /// abandoning the stream.
    pub fn is_incomplete(&self) -> bool {
        match self {
            RecordError::TruncatedHeader { .. } => true,
            RecordError::TruncatedBody { .. } => true,
            RecordError::TruncatedStream { .. } => false,
            RecordError::InvalidSize { .. } => false,
            RecordError::SizeMismatch { .. } => false,
            RecordError::CountMismatch { .. } => false,
            RecordError::InvalidFamily { .. } => false,
            RecordError::InvalidSamplerId { .. } => false,
            RecordError::UnexpectedType { .. } => false,
            RecordError::RecordTooLarge { .. } => false,
            RecordError::Config { .. } => false,
            RecordError::Io { .. } => false,
        }
    }

    /// Returns whether this error can only come from mismatched encode arguments.
    pub fn is_caller_bug(&self) -> bool {
        matches!(self, RecordError::CountMismatch { .. } | RecordError::RecordTooLarge { .. })
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RecordError::TruncatedHeader { .. } | RecordError::TruncatedBody { .. } => vec![
                "Supply the remaining bytes of the record",
                "Check the block framing that delimits the record buffer",
            ],
            RecordError::TruncatedStream { .. } => vec![
                "Check the file or socket was not cut short",
                "Verify the block size reported by the file framing layer",
            ],
            RecordError::InvalidSize { .. } | RecordError::SizeMismatch { .. } => vec![
                "Verify writer and reader agree on byte order",
                "Check the stream for corruption before this offset",
                "Confirm the record type code registry matches the writer",
            ],
            RecordError::CountMismatch { .. } => vec![
                "Pass a stat count equal to the number of entries",
                "Build the stats record from its entry list",
            ],
            RecordError::InvalidFamily { .. } => vec![
                "Configure the address family codes used by the writing host",
                "Verify writer and reader agree on byte order",
            ],
            RecordError::InvalidSamplerId { .. } => vec![
                "Use SamplerId::Generic, Default or Overwrite for reserved ids",
                "Check the exporter template for a corrupted selector id",
            ],
            RecordError::UnexpectedType { .. } => vec![
                "Dispatch records through RecordStream instead of a fixed decoder",
            ],
            RecordError::RecordTooLarge { .. } => vec![
                "Split stats entries across several records",
            ],
            RecordError::Config { .. } => vec![
                "Check the configuration field names and values",
                "Use CodecConfig::default() as a reference",
            ],
            RecordError::Io { .. } => vec![
                "Check the underlying reader or writer",
                "Retry at the file or network layer",
            ],
        }
    }

    /// Helper constructor for short header buffers.
    pub fn truncated_header(available: usize) -> Self {
        RecordError::TruncatedHeader { available }
    }

    /// Helper constructor for short record bodies.
    pub fn truncated_body(record_type: u16, needed: usize, available: usize) -> Self {
        RecordError::TruncatedBody { record_type, needed, available }
    }

    /// Helper constructor for configuration errors.
    pub fn config(details: impl Into<String>) -> Self {
        RecordError::Config { details: details.into() }
    }
}

impl From<std::io::Error> for RecordError {
    fn from(err: std::io::Error) -> Self {
        RecordError::Io { source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn error_messages_carry_their_context(
            record_type in any::<u16>(),
            size in any::<u16>(),
            minimum in 0usize..0x10000usize,
            family in any::<u16>(),
            id in i64::MIN..-3i64,
            details in ".*"
          ) {
            let size_error = RecordError::InvalidSize { record_type, size, minimum };
            let msg = size_error.to_string();
            let expected_type = format!("{:#06x}", record_type);
            prop_assert!(msg.contains(&expected_type));
            prop_assert!(msg.contains(&size.to_string()));
            prop_assert!(msg.contains(&minimum.to_string()));

            let family_error = RecordError::InvalidFamily { family };
            prop_assert!(family_error.to_string().contains(&family.to_string()));

            let sampler_error = RecordError::InvalidSamplerId { id };
            prop_assert!(sampler_error.to_string().contains(&id.to_string()));

            let config_error = RecordError::config(details.clone());
            prop_assert!(config_error.to_string().contains(&details));
          }

          #[test]
          fn only_header_and_body_truncation_are_incomplete(
            available in 0usize..4usize,
            needed in 0usize..0x10000usize,
            offset in 0usize..0x10000usize
          ) {
            prop_assert!(RecordError::truncated_header(available).is_incomplete());
            prop_assert!(RecordError::truncated_body(7, needed, available).is_incomplete());
            let stream_error = RecordError::TruncatedStream { record_type: 7, offset, needed, available };
            prop_assert!(!stream_error.is_incomplete());
          }
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<RecordError>();

        let error = RecordError::truncated_header(2);
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn encode_misuse_is_classified_as_caller_bug() {
        assert!(RecordError::CountMismatch { declared: 3, actual: 2 }.is_caller_bug());
        assert!(RecordError::RecordTooLarge { record_type: 8, len: 70_000 }.is_caller_bug());
        assert!(!RecordError::InvalidFamily { family: 99 }.is_caller_bug());
        assert!(!RecordError::truncated_header(0).is_caller_bug());
    }

    #[test]
    fn recovery_suggestions_are_descriptive() {
        let errors = [
            RecordError::truncated_header(1),
            RecordError::SizeMismatch { record_type: 7, declared: 40, consumed: 32 },
            RecordError::InvalidSamplerId { id: -5 },
            RecordError::config("bad byte order"),
        ];
        for error in &errors {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty());
            for suggestion in suggestions {
                assert!(suggestion.len() > 5);
            }
        }
    }

    #[test]
    fn io_errors_convert_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "socket closed");
        let err: RecordError = io_err.into();
        match &err {
            RecordError::Io { source } => assert_eq!(source.to_string(), "socket closed"),
            other => panic!("Expected Io error variant, got {other:?}"),
        }
        assert!(std::error::Error::source(&err).is_some());
    }
}
