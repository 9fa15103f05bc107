//! Sequence, map and blob framing.
//!
//! Three shapes of collection appear on the wire:
//!
//! * variable-length sequences: compact length prefix, then the elements;
//! * parameter-sized arrays: no prefix, element count taken from
//!   [`ProtocolParameters`](crate::params::ProtocolParameters);
//! * maps and sets: a variable-length sequence whose keys are strictly
//!   ascending, which is what makes the encoding unique.

use std::collections::BTreeMap;

use super::cursor::ByteCursor;
use super::error::{CodecError, CodecResult};
use super::sink::ByteSink;
use super::traits::{Decode, Encode};

/// Writes a compact length prefix followed by every element.
pub fn write_seq<T: Encode>(sink: &mut ByteSink<'_>, items: &[T]) -> CodecResult<()> {
    sink.write_len(items.len());
    write_items(sink, items)
}

/// Reads a length-prefixed sequence.
pub fn read_seq<T: Decode>(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Vec<T>> {
    let len = cursor.read_len()?;
    read_items(cursor, len)
}

/// Writes exactly `expected` elements with no prefix.
pub fn write_fixed_seq<T: Encode>(
    sink: &mut ByteSink<'_>,
    items: &[T],
    expected: usize,
    what: &'static str,
) -> CodecResult<()> {
    if items.len() != expected {
        return Err(CodecError::LengthMismatch {
            what,
            expected,
            actual: items.len(),
        });
    }
    write_items(sink, items)
}

/// Reads exactly `count` elements with no prefix.
pub fn read_fixed_seq<T: Decode>(
    cursor: &mut ByteCursor<'_, '_>,
    count: usize,
) -> CodecResult<Vec<T>> {
    read_items(cursor, count)
}

/// Writes a length-prefixed sequence of at most `limit` elements.
pub fn write_bounded_seq<T: Encode>(
    sink: &mut ByteSink<'_>,
    items: &[T],
    limit: usize,
    what: &'static str,
) -> CodecResult<()> {
    check_limit(items.len(), limit, what)?;
    write_seq(sink, items)
}

/// Reads a length-prefixed sequence of at most `limit` elements.
pub fn read_bounded_seq<T: Decode>(
    cursor: &mut ByteCursor<'_, '_>,
    limit: usize,
    what: &'static str,
) -> CodecResult<Vec<T>> {
    let len = cursor.read_len()?;
    check_limit(len, limit, what)?;
    read_items(cursor, len)
}

/// Writes a map as a sequence of `(key, value)` pairs in key order.
pub fn write_map<K: Encode + Ord, V: Encode>(
    sink: &mut ByteSink<'_>,
    map: &BTreeMap<K, V>,
) -> CodecResult<()> {
    sink.write_len(map.len());
    for (key, value) in map {
        key.encode_to(sink)?;
        value.encode_to(sink)?;
    }
    Ok(())
}

/// Reads a map, rejecting keys that are out of order or repeated.
pub fn read_map<K: Decode + Ord, V: Decode>(
    cursor: &mut ByteCursor<'_, '_>,
    what: &'static str,
) -> CodecResult<BTreeMap<K, V>> {
    let len = cursor.read_len()?;
    let mut map = BTreeMap::new();
    for _ in 0..len {
        let key = K::decode_from(cursor)?;
        let value = V::decode_from(cursor)?;
        if map.last_key_value().is_some_and(|(last, _)| *last >= key) {
            return Err(CodecError::NonCanonical { what });
        }
        map.insert(key, value);
    }
    Ok(map)
}

/// Writes a sorted set. The items must already be strictly ascending.
pub fn write_sorted_set<T: Encode + Ord>(
    sink: &mut ByteSink<'_>,
    items: &[T],
    what: &'static str,
) -> CodecResult<()> {
    ensure_ascending(items, what)?;
    write_seq(sink, items)
}

/// Reads a sorted set, rejecting out-of-order or repeated items.
pub fn read_sorted_set<T: Decode + Ord>(
    cursor: &mut ByteCursor<'_, '_>,
    what: &'static str,
) -> CodecResult<Vec<T>> {
    let items = read_seq(cursor)?;
    ensure_ascending(&items, what)?;
    Ok(items)
}

/// Writes an octet string: compact length, then the raw bytes.
pub fn write_blob(sink: &mut ByteSink<'_>, bytes: &[u8]) {
    sink.write_len(bytes.len());
    sink.write_bytes(bytes);
}

/// Reads an octet string.
pub fn read_blob(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Vec<u8>> {
    let len = cursor.read_len()?;
    Ok(cursor.read_exact(len)?.to_vec())
}

/// Fails unless `items` is strictly ascending.
pub fn ensure_ascending<T: Ord>(items: &[T], what: &'static str) -> CodecResult<()> {
    if items.windows(2).all(|pair| pair[0] < pair[1]) {
        Ok(())
    } else {
        Err(CodecError::NonCanonical { what })
    }
}

fn check_limit(len: usize, limit: usize, what: &'static str) -> CodecResult<()> {
    if len > limit {
        return Err(CodecError::LengthLimitExceeded {
            what,
            limit,
            actual: len,
        });
    }
    Ok(())
}

fn write_items<T: Encode>(sink: &mut ByteSink<'_>, items: &[T]) -> CodecResult<()> {
    for item in items {
        item.encode_to(sink)?;
    }
    Ok(())
}

fn read_items<T: Decode>(cursor: &mut ByteCursor<'_, '_>, count: usize) -> CodecResult<Vec<T>> {
    // `count` may come from parameters rather than the input, so cap the
    // up-front reservation by what the input could possibly hold.
    let mut items = Vec::with_capacity(count.min(cursor.remaining()));
    for _ in 0..count {
        items.push(T::decode_from(cursor)?);
    }
    Ok(items)
}
