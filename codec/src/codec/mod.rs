//! Canonical binary codec.
//!
//! The submodules build on each other from the bottom up: [`compact`] turns
//! integers into bytes, [`ByteSink`] and [`ByteCursor`] frame a single pass,
//! [`collections`] and [`option`] give sequences, maps and optionals their
//! shape, and [`Encode`]/[`Decode`] tie every protocol type to its layout.

pub mod collections;
pub mod compact;
pub mod cursor;
pub mod error;
pub mod option;
pub mod sink;
pub mod traits;

pub use cursor::ByteCursor;
pub use error::{CodecError, CodecResult};
pub use sink::ByteSink;
pub use traits::{Decode, Encode};

use crate::params::ProtocolParameters;

/// Encodes `value` under `params`.
///
/// On error nothing is returned; a partially filled buffer is dropped.
pub fn encode<T: Encode + ?Sized>(value: &T, params: &ProtocolParameters) -> CodecResult<Vec<u8>> {
    let mut sink = ByteSink::new(params);
    value.encode_to(&mut sink)?;
    tracing::trace!(
        ty = std::any::type_name::<T>(),
        len = sink.len(),
        "encoded value"
    );
    Ok(sink.into_bytes())
}

/// Decodes a `T` that must span the whole of `bytes`.
pub fn decode<T: Decode>(bytes: &[u8], params: &ProtocolParameters) -> CodecResult<T> {
    let mut cursor = ByteCursor::new(bytes, params);
    let value = T::decode_from(&mut cursor).inspect_err(|err| {
        tracing::debug!(ty = std::any::type_name::<T>(), %err, "decode failed");
    })?;
    cursor.finish()?;
    Ok(value)
}

/// Decodes a `T` from the front of `bytes`, returning it with the number of
/// bytes consumed. Trailing input is left alone.
pub fn decode_prefix<T: Decode>(
    bytes: &[u8],
    params: &ProtocolParameters,
) -> CodecResult<(T, usize)> {
    let mut cursor = ByteCursor::new(bytes, params);
    let value = T::decode_from(&mut cursor)?;
    Ok((value, cursor.position()))
}
