//! Type dispatcher.
//!
//! Every codable value implements [`Encode`] and [`Decode`]: a composite
//! type writes its fields in schema order by calling `encode_to` on each of
//! them, and reads them back in the same order. The impls below cover the
//! scalar leaves and the generic wrappers whose wire shape never varies
//! (`Option<T>`, length-prefixed `Vec<T>`, sorted `BTreeMap<K, V>`).

use std::collections::BTreeMap;

use super::collections;
use super::cursor::ByteCursor;
use super::error::CodecResult;
use super::option;
use super::sink::ByteSink;

/// A value that knows how to write itself to a [`ByteSink`].
pub trait Encode {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()>;
}

/// A value that knows how to read itself from a [`ByteCursor`].
pub trait Decode: Sized {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self>;
}

impl Encode for u8 {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        sink.write_byte(*self);
        Ok(())
    }
}

impl Decode for u8 {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        cursor.read_byte()
    }
}

macro_rules! fixed_width_uint {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
                    sink.write_bytes(&self.to_le_bytes());
                    Ok(())
                }
            }

            impl Decode for $ty {
                fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
                    Ok(<$ty>::from_le_bytes(cursor.read_array()?))
                }
            }
        )*
    };
}

fixed_width_uint!(u16, u32, u64);

impl Encode for bool {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        option::write_bool(sink, *self);
        Ok(())
    }
}

impl Decode for bool {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        option::read_bool(cursor)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        option::write_option(sink, self.as_ref())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        option::read_option(cursor)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        collections::write_seq(sink, self)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        collections::read_seq(cursor)
    }
}

impl<K: Encode + Ord, V: Encode> Encode for BTreeMap<K, V> {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        collections::write_map(sink, self)
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        collections::read_map(cursor, "map")
    }
}
