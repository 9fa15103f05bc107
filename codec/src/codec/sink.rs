use crate::params::ProtocolParameters;

use super::compact;
use super::error::CodecResult;

/// Append-only output buffer for a single encode pass.
///
/// The sink borrows the protocol parameters for its whole lifetime, which is
/// how parameter-sized arrays learn their expected length while encoding.
#[derive(Debug)]
pub struct ByteSink<'p> {
    buf: Vec<u8>,
    params: &'p ProtocolParameters,
}

impl<'p> ByteSink<'p> {
    /// Creates an empty sink bound to `params`.
    pub fn new(params: &'p ProtocolParameters) -> Self {
        Self {
            buf: Vec::new(),
            params,
        }
    }

    /// Parameters active for this encode pass.
    pub fn params(&self) -> &'p ProtocolParameters {
        self.params
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends a compact integer.
    pub fn write_uint(&mut self, value: u64) {
        compact::write_uint(&mut self.buf, value);
    }

    /// Appends a length prefix.
    pub fn write_len(&mut self, len: usize) {
        self.write_uint(len as u64);
    }

    /// Appends a `width`-byte little-endian integer.
    pub fn write_fixed(&mut self, value: u64, width: usize) -> CodecResult<()> {
        compact::write_uint_fixed(&mut self.buf, value, width)
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrows the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the sink and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
