//! Codec error types

use thiserror::Error;

use crate::descriptor::FieldKind;

/// Errors surfaced by tree serialization and parsing.
///
/// Malformed input never produces an error in this crate; it decodes to
/// zero or an absent value. The only failure a caller can observe is a
/// schema naming a field kind with no wire rule, which is a
/// schema-construction mistake rather than bad input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The schema names a kind the codec cannot encode or parse.
    #[error("no wire rule for field kind {0:?}")]
    UnsupportedKind(FieldKind),
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
