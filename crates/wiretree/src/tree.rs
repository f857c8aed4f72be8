//! Descriptor-driven record tree: the codec
//!
//! A [`SchemaTree`] node pairs an ordered descriptor list with a sparse
//! set of children, one per descriptor index. Leaf children hold the exact
//! encoded bytes of one field; subtree children are nodes in their own
//! right and serialize inline. Building a frame means attaching typed
//! values at descriptor positions and calling [`to_bytes`]; parsing runs
//! the inverse walk over a shared cursor.
//!
//! Mismatched kinds, out-of-range indices, and short input all degrade
//! silently: setters drop the value, getters answer zero or `None`. Only a
//! schema naming the reserved [`FieldKind::U64`] kind fails loudly,
//! because no wire rule exists for it.
//!
//! [`to_bytes`]: SchemaTree::to_bytes

use std::collections::HashMap;

use bytes::Bytes;
use tracing::trace;

use crate::builder::ByteBuilder;
use crate::charset::{self, DEFAULT_CHARSET};
use crate::cursor::ByteCursor;
use crate::descriptor::{FieldDescriptor, FieldKind};
use crate::endian;
use crate::error::{Result, TreeError};

/// One child of a schema node: encoded bytes for a single field, or a
/// nested record.
#[derive(Debug, Clone)]
enum Node {
    /// Encoded bytes for one field; `None` when a parse ran past the end
    /// of its input.
    Leaf(Option<Bytes>),
    Tree(SchemaTree),
}

/// A record node: an ordered field schema plus the values attached so
/// far.
///
/// The schema is fixed at construction; the children evolve through the
/// typed setters and through parsing. Each node exclusively owns its
/// children, so a tree is always acyclic.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    schema: Vec<FieldDescriptor>,
    children: HashMap<usize, Node>,
}

impl SchemaTree {
    pub fn new(schema: impl Into<Vec<FieldDescriptor>>) -> Self {
        Self {
            schema: schema.into(),
            children: HashMap::new(),
        }
    }

    /// Build a node with subtrees pre-attached: each child in turn
    /// occupies the next [`FieldKind::SubTree`] slot in ascending index
    /// order, and children beyond the available slots are dropped.
    pub fn with_children(
        schema: impl Into<Vec<FieldDescriptor>>,
        children: impl IntoIterator<Item = SchemaTree>,
    ) -> Self {
        let mut tree = Self::new(schema);
        let mut slot = 0;
        for child in children {
            match tree.schema[slot..]
                .iter()
                .position(|descriptor| descriptor.kind == FieldKind::SubTree)
            {
                Some(offset) => {
                    let index = slot + offset;
                    tree.children.insert(index, Node::Tree(child));
                    slot = index + 1;
                }
                None => break,
            }
        }
        tree
    }

    /// The node's descriptor list.
    pub fn schema(&self) -> &[FieldDescriptor] {
        &self.schema
    }

    // Descriptor at `index` when it matches the expected kind.
    fn descriptor(&self, index: usize, kind: FieldKind) -> Option<FieldDescriptor> {
        match self.schema.get(index) {
            Some(descriptor) if descriptor.kind == kind => Some(*descriptor),
            _ => None,
        }
    }

    fn store_leaf(&mut self, index: usize, data: impl Into<Bytes>) {
        self.children.insert(index, Node::Leaf(Some(data.into())));
    }

    // Leaf payload at `index`, when present with data.
    fn leaf_data(&self, index: usize) -> Option<&Bytes> {
        match self.children.get(&index) {
            Some(Node::Leaf(Some(data))) => Some(data),
            _ => None,
        }
    }

    fn decode_leaf<T: Default>(
        &self,
        index: usize,
        kind: FieldKind,
        decode: impl FnOnce(&[u8], bool) -> T,
    ) -> T {
        match self.descriptor(index, kind) {
            Some(descriptor) => self
                .leaf_data(index)
                .map(|data| decode(data, descriptor.little_endian))
                .unwrap_or_default(),
            None => T::default(),
        }
    }

    /// Attach an unsigned 8-bit value. A mismatched descriptor leaves the
    /// node untouched, here and in every other setter.
    pub fn set_u8(&mut self, index: usize, value: u8) -> &mut Self {
        if self.descriptor(index, FieldKind::U8).is_some() {
            self.store_leaf(index, vec![value]);
        } else {
            trace!(index, value, "set_u8 ignored: descriptor mismatch");
        }
        self
    }

    /// Attach a signed 8-bit value.
    pub fn set_s8(&mut self, index: usize, value: i8) -> &mut Self {
        if self.descriptor(index, FieldKind::S8).is_some() {
            self.store_leaf(index, vec![value as u8]);
        } else {
            trace!(index, value, "set_s8 ignored: descriptor mismatch");
        }
        self
    }

    /// Attach an unsigned 16-bit value in the descriptor's byte order.
    pub fn set_u16(&mut self, index: usize, value: u16) -> &mut Self {
        if let Some(descriptor) = self.descriptor(index, FieldKind::U16) {
            self.store_leaf(index, endian::encode_u16(value, descriptor.little_endian).to_vec());
        } else {
            trace!(index, value, "set_u16 ignored: descriptor mismatch");
        }
        self
    }

    /// Attach a signed 16-bit value in the descriptor's byte order.
    pub fn set_s16(&mut self, index: usize, value: i16) -> &mut Self {
        if let Some(descriptor) = self.descriptor(index, FieldKind::S16) {
            self.store_leaf(index, endian::encode_i16(value, descriptor.little_endian).to_vec());
        } else {
            trace!(index, value, "set_s16 ignored: descriptor mismatch");
        }
        self
    }

    /// Attach an unsigned 32-bit value in the descriptor's byte order.
    pub fn set_u32(&mut self, index: usize, value: u32) -> &mut Self {
        if let Some(descriptor) = self.descriptor(index, FieldKind::U32) {
            self.store_leaf(index, endian::encode_u32(value, descriptor.little_endian).to_vec());
        } else {
            trace!(index, value, "set_u32 ignored: descriptor mismatch");
        }
        self
    }

    /// Attach a signed 32-bit value in the descriptor's byte order.
    pub fn set_s32(&mut self, index: usize, value: i32) -> &mut Self {
        if let Some(descriptor) = self.descriptor(index, FieldKind::S32) {
            self.store_leaf(index, endian::encode_i32(value, descriptor.little_endian).to_vec());
        } else {
            trace!(index, value, "set_s32 ignored: descriptor mismatch");
        }
        self
    }

    /// Attach a signed 64-bit value in the descriptor's byte order.
    pub fn set_s64(&mut self, index: usize, value: i64) -> &mut Self {
        if let Some(descriptor) = self.descriptor(index, FieldKind::S64) {
            self.store_leaf(index, endian::encode_i64(value, descriptor.little_endian).to_vec());
        } else {
            trace!(index, value, "set_s64 ignored: descriptor mismatch");
        }
        self
    }

    /// Attach an IEEE 754 single in the descriptor's byte order.
    pub fn set_f32(&mut self, index: usize, value: f32) -> &mut Self {
        if let Some(descriptor) = self.descriptor(index, FieldKind::Float32) {
            self.store_leaf(index, endian::encode_f32(value, descriptor.little_endian).to_vec());
        } else {
            trace!(index, "set_f32 ignored: descriptor mismatch");
        }
        self
    }

    /// Attach an IEEE 754 double in the descriptor's byte order.
    pub fn set_f64(&mut self, index: usize, value: f64) -> &mut Self {
        if let Some(descriptor) = self.descriptor(index, FieldKind::Float64) {
            self.store_leaf(index, endian::encode_f64(value, descriptor.little_endian).to_vec());
        } else {
            trace!(index, "set_f64 ignored: descriptor mismatch");
        }
        self
    }

    /// Attach raw bytes at a [`FieldKind::Raw`] position.
    pub fn set_raw(&mut self, index: usize, value: impl Into<Bytes>) -> &mut Self {
        if self.descriptor(index, FieldKind::Raw).is_some() {
            self.store_leaf(index, value.into());
        } else {
            trace!(index, "set_raw ignored: descriptor mismatch");
        }
        self
    }

    /// Attach text at a variable-length position, encoded under the
    /// labeled charset as `length prefix + content`. The content must fit
    /// the prefix: 255 bytes for [`FieldKind::VarLen8`], 65535 for the
    /// 16-bit prefixes. Oversized content and unknown labels attach
    /// nothing.
    pub fn set_str(&mut self, index: usize, text: &str, charset_label: &str) -> &mut Self {
        let Some(descriptor) = self.schema.get(index).copied() else {
            trace!(index, "set_str ignored: no such field");
            return self;
        };
        if !descriptor.kind.is_var_len() {
            trace!(index, "set_str ignored: descriptor mismatch");
            return self;
        }
        let Some(content) = charset::encode(text, charset_label) else {
            trace!(index, charset_label, "set_str ignored: unknown charset");
            return self;
        };
        let mut encoded = ByteBuilder::new();
        match descriptor.kind {
            FieldKind::VarLen8 if content.len() <= u8::MAX as usize => {
                encoded.push(content.len() as u8);
            }
            FieldKind::VarLen16Le if content.len() <= u16::MAX as usize => {
                encoded.push_u16(content.len() as u16, true);
            }
            FieldKind::VarLen16Be if content.len() <= u16::MAX as usize => {
                encoded.push_u16(content.len() as u16, false);
            }
            FieldKind::VarLen32Le => {
                encoded.push_u32(content.len() as u32, true);
            }
            FieldKind::VarLen32Be => {
                encoded.push_u32(content.len() as u32, false);
            }
            _ => {
                trace!(
                    index,
                    content_len = content.len(),
                    "set_str ignored: content exceeds prefix capacity"
                );
                return self;
            }
        }
        encoded.push_slice(&content);
        self.store_leaf(index, encoded.to_bytes());
        self
    }

    /// [`set_str`] under the default GBK charset.
    ///
    /// [`set_str`]: SchemaTree::set_str
    pub fn set_str_default(&mut self, index: usize, text: &str) -> &mut Self {
        self.set_str(index, text, DEFAULT_CHARSET)
    }

    /// Attach a nested record at a [`FieldKind::SubTree`] position.
    pub fn set_child(&mut self, index: usize, child: SchemaTree) -> &mut Self {
        if self.descriptor(index, FieldKind::SubTree).is_some() {
            self.children.insert(index, Node::Tree(child));
        } else {
            trace!(index, "set_child ignored: descriptor mismatch");
        }
        self
    }

    /// Attach an empty nested record built from `schema`.
    pub fn set_child_schema(
        &mut self,
        index: usize,
        schema: impl Into<Vec<FieldDescriptor>>,
    ) -> &mut Self {
        self.set_child(index, SchemaTree::new(schema))
    }

    /// Unsigned 8-bit value at `index`; zero when absent or mismatched,
    /// here and in every other fixed-width getter.
    pub fn get_u8(&self, index: usize) -> u8 {
        self.decode_leaf(index, FieldKind::U8, |data, _| {
            data.first().copied().unwrap_or(0)
        })
    }

    /// Signed 8-bit value at `index`.
    pub fn get_s8(&self, index: usize) -> i8 {
        self.decode_leaf(index, FieldKind::S8, |data, _| {
            data.first().map(|&byte| byte as i8).unwrap_or(0)
        })
    }

    /// Unsigned 16-bit value at `index`.
    pub fn get_u16(&self, index: usize) -> u16 {
        self.decode_leaf(index, FieldKind::U16, endian::decode_u16)
    }

    /// Signed 16-bit value at `index`.
    pub fn get_s16(&self, index: usize) -> i16 {
        self.decode_leaf(index, FieldKind::S16, endian::decode_i16)
    }

    /// Unsigned 32-bit value at `index`.
    pub fn get_u32(&self, index: usize) -> u32 {
        self.decode_leaf(index, FieldKind::U32, endian::decode_u32)
    }

    /// Signed 32-bit value at `index`.
    pub fn get_s32(&self, index: usize) -> i32 {
        self.decode_leaf(index, FieldKind::S32, endian::decode_i32)
    }

    /// Signed 64-bit value at `index`.
    pub fn get_s64(&self, index: usize) -> i64 {
        self.decode_leaf(index, FieldKind::S64, endian::decode_i64)
    }

    /// IEEE 754 single at `index`.
    pub fn get_f32(&self, index: usize) -> f32 {
        self.decode_leaf(index, FieldKind::Float32, endian::decode_f32)
    }

    /// IEEE 754 double at `index`.
    pub fn get_f64(&self, index: usize) -> f64 {
        self.decode_leaf(index, FieldKind::Float64, endian::decode_f64)
    }

    /// Raw bytes at `index`; `None` when absent or mismatched.
    pub fn get_raw(&self, index: usize) -> Option<Bytes> {
        self.descriptor(index, FieldKind::Raw)?;
        self.leaf_data(index).cloned()
    }

    /// Text at a variable-length position: the stored prefix is consumed
    /// per the field's subkind and the remaining content decoded under
    /// the labeled charset. A present field with zero-length content
    /// answers `Some("")`; an absent field or unknown label answers
    /// `None`.
    pub fn get_str(&self, index: usize, charset_label: &str) -> Option<String> {
        let descriptor = *self.schema.get(index)?;
        let data = self.leaf_data(index)?;
        let mut reader = ByteCursor::new(data.clone());
        match descriptor.kind {
            FieldKind::VarLen8 => {
                reader.get_u8();
            }
            FieldKind::VarLen16Le => {
                reader.get_u16(true);
            }
            FieldKind::VarLen16Be => {
                reader.get_u16(false);
            }
            FieldKind::VarLen32Le => {
                reader.get_u32(true);
            }
            FieldKind::VarLen32Be => {
                reader.get_u32(false);
            }
            _ => return None,
        }
        let content = reader.get_residue().unwrap_or_default();
        charset::decode(&content, charset_label)
    }

    /// [`get_str`] under the default GBK charset.
    ///
    /// [`get_str`]: SchemaTree::get_str
    pub fn get_str_default(&self, index: usize) -> Option<String> {
        self.get_str(index, DEFAULT_CHARSET)
    }

    /// Nested record at `index`, when one is attached.
    pub fn get_child(&self, index: usize) -> Option<&SchemaTree> {
        match self.children.get(&index) {
            Some(Node::Tree(child)) => Some(child),
            _ => None,
        }
    }

    /// Mutable access to the nested record at `index`.
    pub fn get_child_mut(&mut self, index: usize) -> Option<&mut SchemaTree> {
        match self.children.get_mut(&index) {
            Some(Node::Tree(child)) => Some(child),
            _ => None,
        }
    }

    /// Serialize the node and everything under it to a flat byte
    /// sequence.
    ///
    /// Fields run in descriptor order. Absent fixed-width fields emit
    /// their width in zero bytes, absent variable-length fields a
    /// zero-valued prefix, and absent subtrees nothing at all. A `Raw`
    /// field with a declared nonzero length is truncated or zero-padded
    /// to exactly that length.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut out = ByteBuilder::new();
        for (index, descriptor) in self.schema.iter().enumerate() {
            match descriptor.kind {
                FieldKind::U8
                | FieldKind::S8
                | FieldKind::U16
                | FieldKind::S16
                | FieldKind::U32
                | FieldKind::S32
                | FieldKind::S64
                | FieldKind::Float32
                | FieldKind::Float64 => match self.leaf_data(index) {
                    Some(data) => {
                        out.push_slice(data);
                    }
                    None => {
                        out.add_placeholder(descriptor.length);
                    }
                },
                FieldKind::VarLen8 => match self.leaf_data(index) {
                    Some(data) => {
                        out.push_slice(data);
                    }
                    None => {
                        out.push(0);
                    }
                },
                FieldKind::VarLen16Le => match self.leaf_data(index) {
                    Some(data) => {
                        out.push_slice(data);
                    }
                    None => {
                        out.push_u16(0, true);
                    }
                },
                FieldKind::VarLen16Be => match self.leaf_data(index) {
                    Some(data) => {
                        out.push_slice(data);
                    }
                    None => {
                        out.push_u16(0, false);
                    }
                },
                FieldKind::VarLen32Le => match self.leaf_data(index) {
                    Some(data) => {
                        out.push_slice(data);
                    }
                    None => {
                        out.push_u32(0, true);
                    }
                },
                FieldKind::VarLen32Be => match self.leaf_data(index) {
                    Some(data) => {
                        out.push_slice(data);
                    }
                    None => {
                        out.push_u32(0, false);
                    }
                },
                FieldKind::SubTree => {
                    if let Some(Node::Tree(child)) = self.children.get(&index) {
                        out.push_slice(&child.to_bytes()?);
                    }
                }
                FieldKind::Raw => match self.leaf_data(index) {
                    Some(data) => {
                        if descriptor.length != 0 && data.len() != descriptor.length {
                            let mut fixed = data.to_vec();
                            fixed.resize(descriptor.length, 0);
                            out.push_slice(&fixed);
                        } else {
                            out.push_slice(data);
                        }
                    }
                    None => {
                        out.add_placeholder(descriptor.length);
                    }
                },
                FieldKind::U64 => return Err(TreeError::UnsupportedKind(FieldKind::U64)),
            }
        }
        Ok(out.to_bytes())
    }

    /// Parse a byte sequence into this node's schema shape.
    pub fn parse_bytes(&mut self, src: impl Into<Bytes>) -> Result<&mut Self> {
        let mut cursor = ByteCursor::new(src);
        self.parse_cursor(&mut cursor)?;
        Ok(self)
    }

    /// Parse from a shared cursor, advancing it past this node's fields.
    ///
    /// Fixed-width fields store whatever the cursor yields, absent
    /// results included, so a truncated frame still parses and reads back
    /// as zeros. Variable-length fields spy their prefix to learn the
    /// total size, then consume prefix and content as one leaf. Subtrees
    /// must be attached before parsing; an index without one consumes
    /// nothing.
    pub fn parse_cursor(&mut self, cursor: &mut ByteCursor) -> Result<&mut Self> {
        for index in 0..self.schema.len() {
            let descriptor = self.schema[index];
            match descriptor.kind {
                FieldKind::U8
                | FieldKind::S8
                | FieldKind::U16
                | FieldKind::S16
                | FieldKind::U32
                | FieldKind::S32
                | FieldKind::S64
                | FieldKind::Float32
                | FieldKind::Float64 => {
                    let data = cursor.get_bytes(descriptor.length);
                    self.children.insert(index, Node::Leaf(data));
                }
                FieldKind::VarLen8 => {
                    let total = 1 + cursor.spy_u8() as usize;
                    self.children.insert(index, Node::Leaf(cursor.get_bytes(total)));
                }
                FieldKind::VarLen16Le => {
                    let total = 2 + cursor.spy_u16(true) as usize;
                    self.children.insert(index, Node::Leaf(cursor.get_bytes(total)));
                }
                FieldKind::VarLen16Be => {
                    let total = 2 + cursor.spy_u16(false) as usize;
                    self.children.insert(index, Node::Leaf(cursor.get_bytes(total)));
                }
                FieldKind::VarLen32Le => {
                    let total = 4 + cursor.spy_u32(true) as usize;
                    self.children.insert(index, Node::Leaf(cursor.get_bytes(total)));
                }
                FieldKind::VarLen32Be => {
                    let total = 4 + cursor.spy_u32(false) as usize;
                    self.children.insert(index, Node::Leaf(cursor.get_bytes(total)));
                }
                FieldKind::SubTree => {
                    if let Some(Node::Tree(child)) = self.children.get_mut(&index) {
                        child.parse_cursor(cursor)?;
                    }
                }
                FieldKind::Raw => {
                    let data = if descriptor.length > 0 {
                        cursor.get_bytes(descriptor.length)
                    } else {
                        cursor.get_residue()
                    };
                    self.children.insert(index, Node::Leaf(data));
                }
                FieldKind::U64 => return Err(TreeError::UnsupportedKind(FieldKind::U64)),
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldKind::*;

    fn le(kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor::le(kind)
    }

    #[test]
    fn frame_layout_matches_wire_contract() {
        let mut tree = SchemaTree::new(vec![le(U8), le(VarLen8), le(S32)]);
        tree.set_u8(0, 7).set_str(1, "AB", "UTF-8").set_s32(2, -100);
        let frame = tree.to_bytes().unwrap();
        assert_eq!(frame.as_ref(), &[0x07, 0x02, 0x41, 0x42, 0x9C, 0xFF, 0xFF, 0xFF]);

        let mut parsed = SchemaTree::new(vec![le(U8), le(VarLen8), le(S32)]);
        parsed.parse_bytes(frame).unwrap();
        assert_eq!(parsed.get_u8(0), 7);
        assert_eq!(parsed.get_str(1, "UTF-8").unwrap(), "AB");
        assert_eq!(parsed.get_s32(2), -100);
    }

    #[test]
    fn fixed_width_roundtrip_both_orders() {
        for little_endian in [true, false] {
            let schema = vec![
                FieldDescriptor::new(U8, little_endian),
                FieldDescriptor::new(S8, little_endian),
                FieldDescriptor::new(U16, little_endian),
                FieldDescriptor::new(S16, little_endian),
                FieldDescriptor::new(U32, little_endian),
                FieldDescriptor::new(S32, little_endian),
                FieldDescriptor::new(S64, little_endian),
                FieldDescriptor::new(Float32, little_endian),
                FieldDescriptor::new(Float64, little_endian),
            ];
            let mut tree = SchemaTree::new(schema.clone());
            tree.set_u8(0, u8::MAX)
                .set_s8(1, i8::MIN)
                .set_u16(2, u16::MAX)
                .set_s16(3, -1)
                .set_u32(4, u32::MAX)
                .set_s32(5, i32::MIN)
                .set_s64(6, i64::MIN)
                .set_f32(7, -3.25)
                .set_f64(8, 6.02e23);
            let frame = tree.to_bytes().unwrap();
            assert_eq!(frame.len(), 1 + 1 + 2 + 2 + 4 + 4 + 8 + 4 + 8);

            let mut parsed = SchemaTree::new(schema);
            parsed.parse_bytes(frame).unwrap();
            assert_eq!(parsed.get_u8(0), u8::MAX);
            assert_eq!(parsed.get_s8(1), i8::MIN);
            assert_eq!(parsed.get_u16(2), u16::MAX);
            assert_eq!(parsed.get_s16(3), -1);
            assert_eq!(parsed.get_u32(4), u32::MAX);
            assert_eq!(parsed.get_s32(5), i32::MIN);
            assert_eq!(parsed.get_s64(6), i64::MIN);
            assert_eq!(parsed.get_f32(7), -3.25);
            assert_eq!(parsed.get_f64(8), 6.02e23);
        }
    }

    #[test]
    fn mismatched_setter_is_a_no_op() {
        let mut tree = SchemaTree::new(vec![le(U16)]);
        tree.set_s8(0, 5).set_u8(0, 5).set_u16(5, 5);
        assert_eq!(tree.to_bytes().unwrap().as_ref(), &[0, 0]);
        assert_eq!(tree.get_u16(0), 0);
        assert_eq!(tree.get_s8(0), 0);
        assert_eq!(tree.get_raw(0), None);

        tree.set_u16(0, 0x1234);
        tree.set_s16(0, -1); // wrong kind: the existing value stays
        assert_eq!(tree.get_u16(0), 0x1234);
    }

    #[test]
    fn var_len_roundtrip_boundaries() {
        for text in [String::new(), "A".to_string(), "x".repeat(65535)] {
            let mut tree = SchemaTree::new(vec![le(VarLen16Le)]);
            tree.set_str(0, &text, "UTF-8");
            let frame = tree.to_bytes().unwrap();
            assert_eq!(frame.len(), 2 + text.len());

            let mut parsed = SchemaTree::new(vec![le(VarLen16Le)]);
            parsed.parse_bytes(frame).unwrap();
            assert_eq!(parsed.get_str(0, "UTF-8").unwrap(), text);
        }
    }

    #[test]
    fn oversized_text_attaches_nothing() {
        let mut tree = SchemaTree::new(vec![le(VarLen8)]);
        tree.set_str(0, &"y".repeat(256), "UTF-8");
        assert_eq!(tree.get_str(0, "UTF-8"), None);
        // the wire still carries the logically-empty occurrence
        assert_eq!(tree.to_bytes().unwrap().as_ref(), &[0x00]);

        let mut tree = SchemaTree::new(vec![le(VarLen16Be)]);
        tree.set_str(0, &"y".repeat(65536), "UTF-8");
        assert_eq!(tree.get_str(0, "UTF-8"), None);

        let mut tree = SchemaTree::new(vec![le(VarLen32Le)]);
        tree.set_str(0, &"y".repeat(65536), "UTF-8");
        assert_eq!(tree.get_str(0, "UTF-8").unwrap().len(), 65536);
    }

    #[test]
    fn unknown_charset_attaches_nothing() {
        let mut tree = SchemaTree::new(vec![le(VarLen8)]);
        tree.set_str(0, "AB", "no-such-charset");
        assert_eq!(tree.get_str(0, "UTF-8"), None);
        assert_eq!(tree.to_bytes().unwrap().as_ref(), &[0x00]);
    }

    #[test]
    fn var_len_prefix_width_and_order() {
        let schema = vec![
            le(VarLen8),
            le(VarLen16Le),
            le(VarLen16Be),
            le(VarLen32Le),
            le(VarLen32Be),
        ];
        let mut tree = SchemaTree::new(schema.clone());
        for index in 0..schema.len() {
            tree.set_str(index, "hi", "UTF-8");
        }
        let frame = tree.to_bytes().unwrap();
        assert_eq!(
            frame.as_ref(),
            &[
                2, b'h', b'i', // 1-byte prefix
                2, 0, b'h', b'i', // 16-bit LE
                0, 2, b'h', b'i', // 16-bit BE
                2, 0, 0, 0, b'h', b'i', // 32-bit LE
                0, 0, 0, 2, b'h', b'i', // 32-bit BE
            ]
        );
        let mut parsed = SchemaTree::new(schema);
        parsed.parse_bytes(frame).unwrap();
        for index in 0..5 {
            assert_eq!(parsed.get_str(index, "UTF-8").unwrap(), "hi");
        }
    }

    #[test]
    fn absent_fields_serialize_as_placeholders() {
        let schema = vec![le(U16), le(VarLen16Be), le(SubTree), FieldDescriptor::raw(3)];
        let tree = SchemaTree::new(schema);
        // two zero bytes, a zero prefix, no subtree, three raw zeros
        assert_eq!(tree.to_bytes().unwrap().as_ref(), &[0u8; 7]);
    }

    #[test]
    fn nested_subtree_roundtrip() {
        let child_schema = vec![le(U8), le(U16)];
        let outer_schema = vec![le(U8), le(SubTree), le(S16)];

        let mut child = SchemaTree::new(child_schema.clone());
        child.set_u8(0, 9).set_u16(1, 0xBEEF);
        let mut tree = SchemaTree::new(outer_schema.clone());
        tree.set_u8(0, 1).set_child(1, child).set_s16(2, -2);
        let frame = tree.to_bytes().unwrap();
        assert_eq!(frame.len(), 1 + 3 + 2);

        let mut parsed =
            SchemaTree::with_children(outer_schema, [SchemaTree::new(child_schema)]);
        parsed.parse_bytes(frame).unwrap();
        assert_eq!(parsed.get_u8(0), 1);
        let child = parsed.get_child(1).unwrap();
        assert_eq!(child.get_u8(0), 9);
        assert_eq!(child.get_u16(1), 0xBEEF);
        assert_eq!(parsed.get_s16(2), -2);
    }

    #[test]
    fn children_fill_subtree_slots_in_order() {
        let schema = vec![le(U8), le(SubTree), le(U8), le(SubTree)];
        let tree = SchemaTree::with_children(
            schema,
            [
                SchemaTree::new(vec![le(U8)]),
                SchemaTree::new(vec![le(U16)]),
                SchemaTree::new(vec![le(U32)]), // no slot left: dropped
            ],
        );
        assert_eq!(tree.get_child(1).unwrap().schema()[0].kind, U8);
        assert_eq!(tree.get_child(3).unwrap().schema()[0].kind, U16);
        assert!(tree.get_child(0).is_none());
    }

    #[test]
    fn parse_without_attached_subtree_consumes_nothing() {
        let mut tree = SchemaTree::new(vec![le(SubTree), le(U8)]);
        tree.parse_bytes(vec![0x2Au8]).unwrap();
        assert_eq!(tree.get_u8(1), 0x2A);
    }

    #[test]
    fn raw_declared_length_truncates_or_pads() {
        let mut tree = SchemaTree::new(vec![FieldDescriptor::raw(4)]);
        tree.set_raw(0, vec![1u8, 2]);
        assert_eq!(tree.to_bytes().unwrap().as_ref(), &[1, 2, 0, 0]);

        tree.set_raw(0, vec![1u8, 2, 3, 4, 5, 6]);
        assert_eq!(tree.to_bytes().unwrap().as_ref(), &[1, 2, 3, 4]);
    }

    #[test]
    fn unsized_raw_swallows_the_residue() {
        let mut tree = SchemaTree::new(vec![le(U8), FieldDescriptor::raw(0)]);
        tree.parse_bytes(vec![1u8, 2, 3, 4]).unwrap();
        assert_eq!(tree.get_u8(0), 1);
        assert_eq!(tree.get_raw(1).unwrap().as_ref(), &[2, 3, 4]);
    }

    #[test]
    fn truncated_frame_reads_back_as_zeros() {
        let mut tree = SchemaTree::new(vec![le(U32), le(S64)]);
        tree.parse_bytes(vec![0xAAu8, 0xBB]).unwrap();
        assert_eq!(tree.get_u32(0), 0);
        assert_eq!(tree.get_s64(1), 0);
    }

    #[test]
    fn reserved_kind_is_rejected() {
        let tree = SchemaTree::new(vec![le(U64)]);
        assert_eq!(tree.to_bytes(), Err(TreeError::UnsupportedKind(U64)));

        let mut tree = SchemaTree::new(vec![le(U64)]);
        assert!(tree.parse_bytes(vec![0u8; 8]).is_err());
    }

    #[test]
    fn default_charset_is_gbk() {
        let mut tree = SchemaTree::new(vec![le(VarLen16Le)]);
        tree.set_str_default(0, "车队");
        let frame = tree.to_bytes().unwrap();
        assert_eq!(frame[0], 4); // two GBK code points, two bytes each

        let mut parsed = SchemaTree::new(vec![le(VarLen16Le)]);
        parsed.parse_bytes(frame).unwrap();
        assert_eq!(parsed.get_str_default(0).unwrap(), "车队");
    }
}
