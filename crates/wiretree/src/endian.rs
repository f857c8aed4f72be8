//! Byte-order conversion primitives
//!
//! Every multi-byte value on a telemetry wire commits to one byte order:
//! big-endian carries the high byte first, little-endian the low byte
//! first. These helpers convert between native values and wire bytes in
//! either orientation. Decoding validates the slice width and answers zero
//! on a mismatch instead of failing; the rest of the crate leans on that to
//! keep short or absent input silent.
//!
//! Floats convert through their raw bit pattern, with the byte order
//! applied to the pattern exactly as to the same-width integer.

// Generates an encode/decode pair for one primitive width.
macro_rules! endian_pair {
    ($ty:ty, $width:expr, $encode:ident, $decode:ident) => {
        /// Encode the value in the requested byte order.
        #[inline]
        pub fn $encode(value: $ty, little_endian: bool) -> [u8; $width] {
            if little_endian {
                value.to_le_bytes()
            } else {
                value.to_be_bytes()
            }
        }

        /// Decode a value, answering zero unless `bytes` is exactly the
        /// expected width.
        #[inline]
        pub fn $decode(bytes: &[u8], little_endian: bool) -> $ty {
            match <[u8; $width]>::try_from(bytes) {
                Ok(raw) if little_endian => <$ty>::from_le_bytes(raw),
                Ok(raw) => <$ty>::from_be_bytes(raw),
                Err(_) => Default::default(),
            }
        }
    };
}

endian_pair!(u16, 2, encode_u16, decode_u16);
endian_pair!(i16, 2, encode_i16, decode_i16);
endian_pair!(u32, 4, encode_u32, decode_u32);
endian_pair!(i32, 4, encode_i32, decode_i32);
endian_pair!(u64, 8, encode_u64, decode_u64);
endian_pair!(i64, 8, encode_i64, decode_i64);
endian_pair!(f32, 4, encode_f32, decode_f32);
endian_pair!(f64, 8, encode_f64, decode_f64);

/// Reverse a byte sequence.
pub fn reverse(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().rev().copied().collect()
}

/// Swap the byte order of a `u16`.
#[inline]
pub fn reverse_u16(value: u16) -> u16 {
    value.swap_bytes()
}

/// Swap the byte order of a `u32`.
#[inline]
pub fn reverse_u32(value: u32) -> u32 {
    value.swap_bytes()
}

/// Swap the byte order of an `f32`'s bit pattern.
#[inline]
pub fn reverse_f32(value: f32) -> f32 {
    f32::from_bits(value.to_bits().swap_bytes())
}
