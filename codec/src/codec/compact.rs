//! Integer compactor.
//!
//! Natural numbers are written with a prefix byte followed by `l` extra
//! little-endian bytes, where `l` is the smallest value with
//! `2^(7l) <= x < 2^(7(l+1))`. The number of leading one bits in the prefix
//! equals `l`; the remaining low bits of the prefix carry `floor(x / 2^(8l))`.
//! Values of `2^56` and above use the `0xFF` sentinel followed by the full
//! eight-byte value.
//!
//! ```text
//! x = 0            -> 00
//! x = 127          -> 7f
//! x = 128          -> 80 80
//! x = 16_383       -> bf ff
//! x = 2^56         -> ff 00 00 00 00 00 00 00 01
//! ```
//!
//! Decoding is strict: an encoding whose value would have been written with
//! fewer extra bytes is rejected, so every value has exactly one encoding.

use super::error::{CodecError, CodecResult};

/// Longest possible compact encoding (`0xFF` plus eight bytes).
pub const MAX_COMPACT_LEN: usize = 9;

/// Returns the number of bytes [`encode_uint`] produces for `value`.
pub fn compact_len(value: u64) -> usize {
    for l in 0..8u32 {
        if value < 1u64 << (7 * (l + 1)) {
            return 1 + l as usize;
        }
    }
    MAX_COMPACT_LEN
}

/// Appends the compact encoding of `value` to `out`.
pub fn write_uint(out: &mut Vec<u8>, value: u64) {
    let l = compact_len(value) - 1;
    if l == 8 {
        out.push(0xFF);
        out.extend_from_slice(&value.to_le_bytes());
        return;
    }

    let floor = value >> (8 * l);
    let prefix = (256 - (1u64 << (8 - l))) + floor;
    out.push(prefix as u8);
    out.extend_from_slice(&value.to_le_bytes()[..l]);
}

/// Returns the compact encoding of `value`.
pub fn encode_uint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(compact_len(value));
    write_uint(&mut out, value);
    out
}

/// Decodes a compact integer from the start of `bytes`.
///
/// Returns the value together with the number of bytes consumed.
pub fn decode_uint(bytes: &[u8]) -> CodecResult<(u64, usize)> {
    decode_uint_at(bytes, 0)
}

/// Same as [`decode_uint`], reporting error offsets relative to `base`.
pub(crate) fn decode_uint_at(bytes: &[u8], base: usize) -> CodecResult<(u64, usize)> {
    let Some(&prefix) = bytes.first() else {
        return Err(CodecError::BufferUnderflow {
            needed: 1,
            remaining: 0,
            offset: base,
        });
    };

    let l = prefix.leading_ones() as usize;
    let tail = &bytes[1..];
    if tail.len() < l {
        return Err(CodecError::BufferUnderflow {
            needed: l,
            remaining: tail.len(),
            offset: base + 1,
        });
    }

    let mut le = [0u8; 8];
    le[..l].copy_from_slice(&tail[..l]);
    let remainder = u64::from_le_bytes(le);

    let value = if l == 8 {
        remainder
    } else {
        let floor = u64::from(prefix) & ((1u64 << (7 - l)) - 1);
        (floor << (8 * l)) | remainder
    };

    // Anything below 2^(7l) has a shorter encoding.
    if l > 0 && value < 1u64 << (7 * l) {
        return Err(CodecError::InvalidCompactInteger {
            prefix,
            offset: base,
        });
    }

    Ok((value, 1 + l))
}

/// Appends exactly `width` little-endian bytes of `value`, without prefix.
///
/// Fails when `value` does not fit in `width` bytes or `width > 8`.
pub fn write_uint_fixed(out: &mut Vec<u8>, value: u64, width: usize) -> CodecResult<()> {
    if width > 8 || (width < 8 && value >> (8 * width) != 0) {
        return Err(CodecError::ValueOverflow { width, value });
    }
    out.extend_from_slice(&value.to_le_bytes()[..width]);
    Ok(())
}

/// Returns exactly `width` little-endian bytes of `value`.
pub fn encode_uint_fixed(value: u64, width: usize) -> CodecResult<Vec<u8>> {
    let mut out = Vec::with_capacity(width);
    write_uint_fixed(&mut out, value, width)?;
    Ok(out)
}

/// Reads a `width`-byte little-endian integer from the start of `bytes`.
pub fn decode_uint_fixed(bytes: &[u8], width: usize) -> CodecResult<u64> {
    if width > 8 {
        return Err(CodecError::ValueOverflow { width, value: 0 });
    }
    if bytes.len() < width {
        return Err(CodecError::BufferUnderflow {
            needed: width,
            remaining: bytes.len(),
            offset: 0,
        });
    }
    let mut le = [0u8; 8];
    le[..width].copy_from_slice(&bytes[..width]);
    Ok(u64::from_le_bytes(le))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_vectors() {
        assert_eq!(encode_uint(0), vec![0x00]);
        assert_eq!(encode_uint(1), vec![0x01]);
        assert_eq!(encode_uint(127), vec![0x7F]);
        assert_eq!(encode_uint(128), vec![0x80, 0x80]);
        assert_eq!(encode_uint(16_383), vec![0xBF, 0xFF]);
        assert_eq!(encode_uint(16_384), vec![0xC0, 0x00, 0x40]);
        assert_eq!(
            encode_uint(10_000_000_000),
            vec![0xF2, 0x00, 0xE4, 0x0B, 0x54]
        );
        assert_eq!(
            encode_uint((1 << 56) - 1),
            vec![0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(encode_uint(1 << 56), vec![0xFF, 0, 0, 0, 0, 0, 0, 0, 0x01]);
        assert_eq!(encode_uint(u64::MAX), [vec![0xFF], vec![0xFF; 8]].concat());
    }

    #[test]
    fn length_matches_encoding() {
        for value in [0, 127, 128, 1 << 14, 1 << 21, 1 << 35, 1 << 56, u64::MAX] {
            assert_eq!(compact_len(value), encode_uint(value).len());
        }
    }

    #[test]
    fn ten_billion_fixed_width_vector() {
        let encoded = encode_uint_fixed(10_000_000_000, 8).expect("fits in 8 bytes");
        assert_eq!(
            encoded,
            vec![0x00, 0xE4, 0x0B, 0x54, 0x02, 0x00, 0x00, 0x00]
        );
        assert_eq!(decode_uint_fixed(&encoded, 8), Ok(10_000_000_000));
    }

    #[test]
    fn fixed_width_rejects_oversized_values() {
        assert_eq!(encode_uint_fixed(970, 4), Ok(vec![202, 3, 0, 0]));
        assert_eq!(
            encode_uint_fixed(70_000, 2),
            Err(CodecError::ValueOverflow {
                width: 2,
                value: 70_000
            })
        );
    }

    #[test]
    fn non_canonical_encodings_are_rejected() {
        // 5 padded to one extra byte.
        assert!(matches!(
            decode_uint(&[0x80, 0x05]),
            Err(CodecError::InvalidCompactInteger { prefix: 0x80, .. })
        ));
        // 127 padded to two extra bytes.
        assert!(matches!(
            decode_uint(&[0xC0, 0x7F, 0x00]),
            Err(CodecError::InvalidCompactInteger { .. })
        ));
        // Sentinel form for a value that fits in seven extra bytes.
        assert!(matches!(
            decode_uint(&[0xFF, 1, 0, 0, 0, 0, 0, 0, 0]),
            Err(CodecError::InvalidCompactInteger { prefix: 0xFF, .. })
        ));
    }

    #[test]
    fn truncated_input_underflows() {
        assert_eq!(
            decode_uint(&[]),
            Err(CodecError::BufferUnderflow {
                needed: 1,
                remaining: 0,
                offset: 0
            })
        );
        assert_eq!(
            decode_uint(&[0xC0, 0x00]),
            Err(CodecError::BufferUnderflow {
                needed: 2,
                remaining: 1,
                offset: 1
            })
        );
        assert!(decode_uint_fixed(&[1, 2, 3], 4).is_err());
    }

    #[test]
    fn decode_reports_consumed_length() {
        let mut bytes = encode_uint(300);
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        assert_eq!(decode_uint(&bytes), Ok((300, 2)));
    }

    proptest! {
        #[test]
        fn compact_round_trips(value in any::<u64>()) {
            let encoded = encode_uint(value);
            prop_assert_eq!(decode_uint(&encoded), Ok((value, encoded.len())));
        }

        #[test]
        fn every_strict_prefix_underflows(value in any::<u64>()) {
            let encoded = encode_uint(value);
            for cut in 0..encoded.len() {
                let is_underflow = matches!(
                    decode_uint(&encoded[..cut]),
                    Err(CodecError::BufferUnderflow { .. })
                );
                prop_assert!(is_underflow);
            }
        }
    }
}
