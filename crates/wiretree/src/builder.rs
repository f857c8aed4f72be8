//! Growable byte buffer used to assemble wire frames

use std::fmt;

use bytes::Bytes;

use crate::{charset, cursor, endian};

const DEFAULT_CAPACITY: usize = 10;

/// Append-oriented byte buffer with geometric growth.
///
/// The builder keeps a logical `size` inside a larger backing store; every
/// byte past `size` is zero. That invariant makes zero-padding free:
/// reserving a placeholder, writing past the end, or growing via
/// [`resize`] just moves `size`.
///
/// Mutators return `&mut Self` so a frame can be assembled in one chain.
///
/// [`resize`]: ByteBuilder::resize
pub struct ByteBuilder {
    size: usize,
    /// Backing store; `buf.len()` is the capacity and `buf[size..]` is
    /// all zero.
    buf: Vec<u8>,
}

impl ByteBuilder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            size: 0,
            buf: vec![0; capacity],
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Size of the backing store.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The written bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.size]
    }

    // Grows to max(capacity * 1.5, min_capacity), keeping appends O(1)
    // amortized.
    fn ensure_capacity(&mut self, min_capacity: usize) {
        if min_capacity > self.buf.len() {
            let grown = self.buf.len() + self.buf.len() / 2;
            self.buf.resize(grown.max(min_capacity), 0);
        }
    }

    /// Append a single byte.
    pub fn push(&mut self, byte: u8) -> &mut Self {
        self.ensure_capacity(self.size + 1);
        self.buf[self.size] = byte;
        self.size += 1;
        self
    }

    /// Append a byte slice.
    pub fn push_slice(&mut self, src: &[u8]) -> &mut Self {
        self.ensure_capacity(self.size + src.len());
        self.buf[self.size..self.size + src.len()].copy_from_slice(src);
        self.size += src.len();
        self
    }

    /// Write a byte at an arbitrary index. Inside the written region the
    /// tail shifts right; past it the gap stays zero and `size` becomes
    /// `index + 1`.
    pub fn insert(&mut self, index: usize, byte: u8) -> &mut Self {
        if index > self.size {
            self.ensure_capacity(index + 1);
            self.buf[index] = byte;
            self.size = index + 1;
        } else {
            self.ensure_capacity(self.size + 1);
            self.buf.copy_within(index..self.size, index + 1);
            self.buf[index] = byte;
            self.size += 1;
        }
        self
    }

    /// Write a slice at an arbitrary index, with the same gap rule as
    /// [`insert`].
    ///
    /// [`insert`]: ByteBuilder::insert
    pub fn insert_slice(&mut self, index: usize, src: &[u8]) -> &mut Self {
        if index > self.size {
            self.ensure_capacity(index + src.len());
            self.buf[index..index + src.len()].copy_from_slice(src);
            self.size = index + src.len();
        } else {
            self.ensure_capacity(self.size + src.len());
            self.buf.copy_within(index..self.size, index + src.len());
            self.buf[index..index + src.len()].copy_from_slice(src);
            self.size += src.len();
        }
        self
    }

    /// Append a `u16` in the given byte order.
    pub fn push_u16(&mut self, value: u16, little_endian: bool) -> &mut Self {
        self.push_slice(&endian::encode_u16(value, little_endian))
    }

    /// Append an `i16` in the given byte order.
    pub fn push_i16(&mut self, value: i16, little_endian: bool) -> &mut Self {
        self.push_slice(&endian::encode_i16(value, little_endian))
    }

    /// Append a `u32` in the given byte order.
    pub fn push_u32(&mut self, value: u32, little_endian: bool) -> &mut Self {
        self.push_slice(&endian::encode_u32(value, little_endian))
    }

    /// Append an `i32` in the given byte order.
    pub fn push_i32(&mut self, value: i32, little_endian: bool) -> &mut Self {
        self.push_slice(&endian::encode_i32(value, little_endian))
    }

    /// Append a `u64` in the given byte order.
    pub fn push_u64(&mut self, value: u64, little_endian: bool) -> &mut Self {
        self.push_slice(&endian::encode_u64(value, little_endian))
    }

    /// Append an `i64` in the given byte order.
    pub fn push_i64(&mut self, value: i64, little_endian: bool) -> &mut Self {
        self.push_slice(&endian::encode_i64(value, little_endian))
    }

    /// Append an `f32` in the given byte order.
    pub fn push_f32(&mut self, value: f32, little_endian: bool) -> &mut Self {
        self.push_slice(&endian::encode_f32(value, little_endian))
    }

    /// Append an `f64` in the given byte order.
    pub fn push_f64(&mut self, value: f64, little_endian: bool) -> &mut Self {
        self.push_slice(&endian::encode_f64(value, little_endian))
    }

    /// Append text encoded under the labeled charset. Empty text or an
    /// unknown label appends nothing.
    pub fn push_str(&mut self, text: &str, charset_label: &str) -> &mut Self {
        if !text.is_empty() {
            if let Some(encoded) = charset::encode(text, charset_label) {
                self.push_slice(&encoded);
            }
        }
        self
    }

    /// Reserve `count` zero bytes without writing data.
    pub fn add_placeholder(&mut self, count: usize) -> &mut Self {
        self.ensure_capacity(self.size + count);
        self.size += count;
        self
    }

    /// Grow (zero-filled) or truncate to exactly `new_size`. Truncated
    /// bytes are cleared so later growth reads back as zero.
    pub fn resize(&mut self, new_size: usize) -> &mut Self {
        if new_size > self.size {
            self.ensure_capacity(new_size);
        } else {
            self.buf[new_size..self.size].fill(0);
        }
        self.size = new_size;
        self
    }

    /// Read one written byte back.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_slice().get(index).copied()
    }

    /// Remove one written byte, shifting the tail left.
    pub fn remove(&mut self, index: usize) -> Option<u8> {
        if index >= self.size {
            return None;
        }
        let removed = self.buf[index];
        self.buf.copy_within(index + 1..self.size, index);
        self.size -= 1;
        self.buf[self.size] = 0;
        Some(removed)
    }

    /// Drop all written bytes, keeping the capacity.
    pub fn clear(&mut self) {
        self.buf[..self.size].fill(0);
        self.size = 0;
    }

    /// Exact-length copy of the written bytes.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_slice())
    }
}

impl Default for ByteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for ByteBuilder {
    /// Adopts the vector as initial content without copying.
    fn from(initial: Vec<u8>) -> Self {
        Self {
            size: initial.len(),
            buf: initial,
        }
    }
}

impl fmt::Display for ByteBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cursor::hex_dump(self.as_slice()))
    }
}
