use crate::params::ProtocolParameters;

use super::compact;
use super::error::{CodecError, CodecResult};

/// Position-tracked reader over a flat byte slice.
///
/// The offset only moves forward. Every read checks the remaining length
/// first, so short input surfaces as [`CodecError::BufferUnderflow`] rather
/// than a panic.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a, 'p> {
    bytes: &'a [u8],
    offset: usize,
    params: &'p ProtocolParameters,
}

impl<'a, 'p> ByteCursor<'a, 'p> {
    /// Creates a cursor at the start of `bytes`, bound to `params`.
    pub fn new(bytes: &'a [u8], params: &'p ProtocolParameters) -> Self {
        Self {
            bytes,
            offset: 0,
            params,
        }
    }

    /// Parameters active for this decode pass.
    pub fn params(&self) -> &'p ProtocolParameters {
        self.params
    }

    /// Returns the current offset within the input.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Returns the number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Reads exactly `len` bytes.
    pub fn read_exact(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(CodecError::BufferUnderflow {
                needed: len,
                remaining: self.remaining(),
                offset: self.offset,
            });
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..self.offset])
    }

    pub fn read_byte(&mut self) -> CodecResult<u8> {
        Ok(self.read_exact(1)?[0])
    }

    /// Reads a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let bytes = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads a compact integer.
    pub fn read_uint(&mut self) -> CodecResult<u64> {
        let (value, used) = compact::decode_uint_at(&self.bytes[self.offset..], self.offset)?;
        self.offset += used;
        Ok(value)
    }

    /// Reads a length prefix.
    ///
    /// A length larger than the remaining input cannot describe a valid
    /// collection, so it is rejected here before any allocation happens.
    /// Every element occupies at least one byte, so the error reports the
    /// announced length as the minimum number of bytes `needed`.
    pub fn read_len(&mut self) -> CodecResult<usize> {
        let offset = self.offset;
        let len = self.read_uint()?;
        let len = usize::try_from(len).map_err(|_| CodecError::ValueOverflow {
            width: std::mem::size_of::<usize>(),
            value: len,
        })?;
        if len > self.remaining() {
            return Err(CodecError::BufferUnderflow {
                needed: len,
                remaining: self.remaining(),
                offset,
            });
        }
        Ok(len)
    }

    /// Reads a `width`-byte little-endian integer.
    pub fn read_fixed(&mut self, width: usize) -> CodecResult<u64> {
        let offset = self.offset;
        let bytes = self.read_exact(width)?;
        compact::decode_uint_fixed(bytes, width).map_err(|err| match err {
            CodecError::BufferUnderflow {
                needed, remaining, ..
            } => CodecError::BufferUnderflow {
                needed,
                remaining,
                offset,
            },
            other => other,
        })
    }

    /// Fails unless every input byte has been consumed.
    pub fn finish(&self) -> CodecResult<()> {
        if self.remaining() != 0 {
            return Err(CodecError::TrailingBytes {
                consumed: self.offset,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_monotonically() {
        let params = ProtocolParameters::tiny();
        let bytes = [0x07, 0x80, 0x80, 202, 3, 0, 0, 0xAA];
        let mut cursor = ByteCursor::new(&bytes, &params);

        assert_eq!(cursor.read_byte(), Ok(0x07));
        assert_eq!(cursor.read_uint(), Ok(128));
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.read_fixed(4), Ok(970));
        assert_eq!(cursor.remaining(), 1);
        assert!(cursor.finish().is_err());
        assert_eq!(cursor.read_array::<1>(), Ok([0xAA]));
        cursor.finish().expect("all bytes consumed");
    }

    #[test]
    fn short_reads_report_offset() {
        let params = ProtocolParameters::tiny();
        let bytes = [1, 2, 3];
        let mut cursor = ByteCursor::new(&bytes, &params);
        cursor.read_byte().expect("one byte available");

        assert_eq!(
            cursor.read_array::<32>(),
            Err(CodecError::BufferUnderflow {
                needed: 32,
                remaining: 2,
                offset: 1
            })
        );
        // A failed read does not move the cursor.
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn compact_errors_carry_absolute_offset() {
        let params = ProtocolParameters::tiny();
        let bytes = [0x00, 0x80, 0x05];
        let mut cursor = ByteCursor::new(&bytes, &params);
        cursor.read_byte().expect("first byte");
        assert_eq!(
            cursor.read_uint(),
            Err(CodecError::InvalidCompactInteger {
                prefix: 0x80,
                offset: 1
            })
        );
    }

    #[test]
    fn oversized_length_prefix_is_rejected_early() {
        let params = ProtocolParameters::tiny();
        let bytes = [0x7F, 0x00];
        let mut cursor = ByteCursor::new(&bytes, &params);
        // 127 elements need at least 127 bytes; one is left after the prefix.
        assert_eq!(
            cursor.read_len(),
            Err(CodecError::BufferUnderflow {
                needed: 127,
                remaining: 1,
                offset: 0
            })
        );
    }
}
