//! Optional values, booleans and tagged unions.

use super::cursor::ByteCursor;
use super::error::{CodecError, CodecResult};
use super::sink::ByteSink;
use super::traits::{Decode, Encode};

/// Writes a presence byte (`0` or `1`) followed by the value when present.
pub fn write_option<T: Encode>(sink: &mut ByteSink<'_>, value: Option<&T>) -> CodecResult<()> {
    match value {
        None => {
            sink.write_byte(0);
            Ok(())
        }
        Some(inner) => {
            sink.write_byte(1);
            inner.encode_to(sink)
        }
    }
}

/// Reads an optional value. Presence bytes other than `0` and `1` are errors.
pub fn read_option<T: Decode>(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Option<T>> {
    match cursor.read_byte()? {
        0 => Ok(None),
        1 => T::decode_from(cursor).map(Some),
        value => Err(CodecError::InvalidPresence { value }),
    }
}

pub fn write_bool(sink: &mut ByteSink<'_>, value: bool) {
    sink.write_byte(u8::from(value));
}

pub fn read_bool(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<bool> {
    match cursor.read_byte()? {
        0 => Ok(false),
        1 => Ok(true),
        value => Err(CodecError::InvalidBool { value }),
    }
}

/// Builds the error for an unknown union tag.
pub fn invalid_discriminant(type_name: &'static str, value: u8) -> CodecError {
    CodecError::InvalidDiscriminant { type_name, value }
}

/// Picks the single populated alternative of a union.
///
/// Used when a union arrives as a set of optional parts (for example from
/// JSON), where zero or several populated parts have no encoding.
pub fn exactly_one<T>(
    type_name: &'static str,
    parts: impl IntoIterator<Item = Option<T>>,
) -> CodecResult<T> {
    let mut populated = 0;
    let mut chosen = None;
    for part in parts.into_iter().flatten() {
        populated += 1;
        chosen.get_or_insert(part);
    }
    match (populated, chosen) {
        (1, Some(value)) => Ok(value),
        _ => Err(CodecError::InvalidUnion {
            type_name,
            populated,
        }),
    }
}
