//! Field descriptors: the runtime schema
//!
//! A schema is an ordered slice of descriptors. Descriptor order is the
//! on-wire field order, and a descriptor's index is the only name a field
//! has. Each descriptor commits its field to a wire encoding, a byte
//! order, and (for fixed-width and raw fields) a length.

/// Wire encodings a field may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Unsigned 8-bit.
    U8,
    /// Signed 8-bit.
    S8,
    /// Unsigned 16-bit.
    U16,
    /// Signed 16-bit.
    S16,
    /// Unsigned 32-bit.
    U32,
    /// Signed 32-bit.
    S32,
    /// Unsigned 64-bit. Reserved: no wire rule is defined.
    U64,
    /// Signed 64-bit.
    S64,
    /// IEEE 754 single precision.
    Float32,
    /// IEEE 754 double precision.
    Float64,
    /// Unsigned 8-bit length prefix, then that many content bytes.
    VarLen8,
    /// Little-endian unsigned 16-bit length prefix, then content.
    VarLen16Le,
    /// Little-endian unsigned 32-bit length prefix, then content.
    VarLen32Le,
    /// Big-endian unsigned 16-bit length prefix, then content.
    VarLen16Be,
    /// Big-endian unsigned 32-bit length prefix, then content.
    VarLen32Be,
    /// Nested record with its own schema.
    SubTree,
    /// Uninterpreted bytes. A declared length of zero means "the rest of
    /// the frame".
    Raw,
}

impl FieldKind {
    /// On-wire width of fixed-width kinds; zero for everything else.
    pub fn fixed_width(self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::S8 => 1,
            FieldKind::U16 | FieldKind::S16 => 2,
            FieldKind::U32 | FieldKind::S32 | FieldKind::Float32 => 4,
            FieldKind::S64 | FieldKind::Float64 => 8,
            _ => 0,
        }
    }

    /// Whether the field carries an in-band length prefix.
    pub fn is_var_len(self) -> bool {
        matches!(
            self,
            FieldKind::VarLen8
                | FieldKind::VarLen16Le
                | FieldKind::VarLen32Le
                | FieldKind::VarLen16Be
                | FieldKind::VarLen32Be
        )
    }
}

/// Static metadata for one field of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Wire encoding of the field.
    pub kind: FieldKind,
    /// Authoritative for fixed-width kinds (auto-derived from the kind)
    /// and for [`FieldKind::Raw`] (zero meaning "rest of the frame");
    /// unused for the in-band-length kinds.
    pub length: usize,
    /// Byte order of multi-byte values.
    pub little_endian: bool,
}

impl FieldDescriptor {
    /// Descriptor with the length derived from the kind.
    pub fn new(kind: FieldKind, little_endian: bool) -> Self {
        Self {
            kind,
            length: kind.fixed_width(),
            little_endian,
        }
    }

    /// Little-endian descriptor, the common case on vehicle buses.
    pub fn le(kind: FieldKind) -> Self {
        Self::new(kind, true)
    }

    /// Big-endian descriptor.
    pub fn be(kind: FieldKind) -> Self {
        Self::new(kind, false)
    }

    /// Descriptor with an explicit length. Only [`FieldKind::Raw`] fields
    /// need one.
    pub fn with_length(kind: FieldKind, length: usize, little_endian: bool) -> Self {
        Self {
            kind,
            length,
            little_endian,
        }
    }

    /// Raw blob descriptor; zero length captures the rest of the frame.
    pub fn raw(length: usize) -> Self {
        Self::with_length(FieldKind::Raw, length, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_derive_from_kind() {
        assert_eq!(FieldDescriptor::le(FieldKind::U8).length, 1);
        assert_eq!(FieldDescriptor::le(FieldKind::S16).length, 2);
        assert_eq!(FieldDescriptor::le(FieldKind::U32).length, 4);
        assert_eq!(FieldDescriptor::le(FieldKind::Float32).length, 4);
        assert_eq!(FieldDescriptor::le(FieldKind::S64).length, 8);
        assert_eq!(FieldDescriptor::le(FieldKind::Float64).length, 8);
        assert_eq!(FieldDescriptor::le(FieldKind::VarLen16Le).length, 0);
        assert_eq!(FieldDescriptor::le(FieldKind::SubTree).length, 0);
        assert_eq!(FieldDescriptor::le(FieldKind::U64).length, 0);
    }

    #[test]
    fn endianness_constructors() {
        assert!(FieldDescriptor::le(FieldKind::U16).little_endian);
        assert!(!FieldDescriptor::be(FieldKind::U16).little_endian);
        assert_eq!(FieldDescriptor::raw(5).length, 5);
    }

    #[test]
    fn var_len_classification() {
        assert!(FieldKind::VarLen8.is_var_len());
        assert!(FieldKind::VarLen32Be.is_var_len());
        assert!(!FieldKind::Raw.is_var_len());
        assert!(!FieldKind::U16.is_var_len());
    }
}
