//! Schema-driven binary codec for telemetry-style wire formats
//!
//! This crate builds and parses byte buffers representing structured,
//! possibly nested records without a schema compiler: the schema is a
//! runtime slice of [`FieldDescriptor`]s attached to each tree node, and
//! fields are addressed by position, never by name. Four pieces cooperate:
//!
//! - [`endian`] — byte-order conversion primitives
//! - [`ByteBuilder`] — growable append-oriented buffer
//! - [`ByteCursor`] — sequential reader with non-consuming peeks
//! - [`SchemaTree`] — the descriptor-driven record tree
//!
//! # Example
//!
//! ```
//! use wiretree::{FieldDescriptor, FieldKind, SchemaTree};
//!
//! let schema = vec![
//!     FieldDescriptor::le(FieldKind::U8),
//!     FieldDescriptor::le(FieldKind::VarLen8),
//!     FieldDescriptor::le(FieldKind::S32),
//! ];
//!
//! let mut frame = SchemaTree::new(schema.clone());
//! frame.set_u8(0, 7).set_str(1, "AB", "UTF-8").set_s32(2, -100);
//! let bytes = frame.to_bytes().unwrap();
//! assert_eq!(bytes.as_ref(), &[0x07, 0x02, 0x41, 0x42, 0x9C, 0xFF, 0xFF, 0xFF]);
//!
//! let mut parsed = SchemaTree::new(schema);
//! parsed.parse_bytes(bytes).unwrap();
//! assert_eq!(parsed.get_u8(0), 7);
//! assert_eq!(parsed.get_str(1, "UTF-8").as_deref(), Some("AB"));
//! assert_eq!(parsed.get_s32(2), -100);
//! ```
//!
//! # Degrade policy
//!
//! Malformed or short input never raises an error: reads answer zero
//! values and absent results by design, so a record parsed from a
//! truncated frame still answers every getter. A caller cannot tell
//! "field was zero" from "field was missing" without its own bookkeeping;
//! schemas in the field depend on that leniency. The one loud failure is
//! [`TreeError::UnsupportedKind`], raised when a schema names the
//! reserved `U64` kind.

pub mod builder;
pub mod charset;
pub mod cursor;
pub mod descriptor;
pub mod endian;
mod error;
pub mod tree;

pub use builder::ByteBuilder;
pub use charset::DEFAULT_CHARSET;
pub use cursor::{hex_dump, ByteCursor};
pub use descriptor::{FieldDescriptor, FieldKind};
pub use error::{Result, TreeError};
pub use tree::SchemaTree;

/// Re-export bytes for convenience
pub use bytes::Bytes;
