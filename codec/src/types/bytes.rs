//! Opaque byte types.
//!
//! Hashes, keys and signatures are never interpreted by the codec: they are
//! written verbatim with no prefix, and their width is part of the type.
//! In JSON they appear as `0x`-prefixed lowercase hex strings, which is the
//! format used by the protocol test vectors.

use std::fmt;

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};

use crate::codec::collections::{read_blob, write_blob};
use crate::codec::{ByteCursor, ByteSink, CodecResult, Decode, Encode};

/// Length in bytes of all 256-bit hash types.
pub const HASH_LEN: usize = 32;

/// Formats bytes as `0x`-prefixed lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parses hex text, with or without the `0x` prefix.
pub fn from_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(text.trim().trim_start_matches("0x"))
}

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Width of this type on the wire.
            pub const LEN: usize = $len;

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0u8; $len])
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), to_hex(&self.0))
            }
        }

        impl Encode for $name {
            fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
                sink.write_bytes(&self.0);
                Ok(())
            }
        }

        impl Decode for $name {
            fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
                cursor.read_array().map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&to_hex(&self.0))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                let bytes = from_hex(&text).map_err(D::Error::custom)?;
                let array = <[u8; $len]>::try_from(bytes).map_err(|bytes| {
                    D::Error::invalid_length(bytes.len(), &concat!(stringify!($len), " bytes"))
                })?;
                Ok(Self(array))
            }
        }
    };
}

fixed_bytes!(
    /// 256-bit opaque hash. Every hash-like field of the protocol uses this
    /// representation; the aliases in [`crate::types`] only name its role.
    Hash256,
    32
);

fixed_bytes!(
    /// Bandersnatch public key.
    BandersnatchPublic,
    32
);

fixed_bytes!(
    /// Ed25519 public key.
    Ed25519Public,
    32
);

fixed_bytes!(
    /// BLS public key.
    BlsPublic,
    144
);

fixed_bytes!(
    /// Bandersnatch VRF signature (header seal and entropy source).
    BandersnatchVrfSignature,
    96
);

fixed_bytes!(
    /// Bandersnatch ring VRF proof carried by ticket envelopes.
    BandersnatchRingVrfSignature,
    784
);

fixed_bytes!(Ed25519Signature, 64);

fixed_bytes!(
    /// Commitment to the Bandersnatch ring of the next epoch.
    BandersnatchRingCommitment,
    144
);

fixed_bytes!(
    /// Free-form validator metadata.
    ValidatorMetadata,
    128
);

fixed_bytes!(
    /// Memo attached to a deferred transfer.
    TransferMemo,
    128
);

/// Variable-length octet string, encoded with a compact length prefix.
#[derive(Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ByteSequence(pub Vec<u8>);

impl ByteSequence {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ByteSequence {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ByteSequence {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for ByteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteSequence({})", to_hex(&self.0))
    }
}

impl Encode for ByteSequence {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        write_blob(sink, &self.0);
        Ok(())
    }
}

impl Decode for ByteSequence {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        read_blob(cursor).map(Self)
    }
}

impl Serialize for ByteSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(&self.0))
    }
}

impl<'de> Deserialize<'de> for ByteSequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        from_hex(&text).map(Self).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, decode, encode};
    use crate::params::ProtocolParameters;

    #[test]
    fn fixed_bytes_are_written_verbatim() {
        let params = ProtocolParameters::tiny();
        let hash = Hash256([0xAB; 32]);
        let bytes = encode(&hash, &params).expect("hash encodes");
        assert_eq!(bytes, vec![0xAB; 32]);
        assert_eq!(decode::<Hash256>(&bytes, &params), Ok(hash));
    }

    #[test]
    fn short_signature_underflows() {
        let params = ProtocolParameters::tiny();
        assert!(matches!(
            decode::<Ed25519Signature>(&[0u8; 63], &params),
            Err(CodecError::BufferUnderflow {
                needed: 64,
                remaining: 63,
                ..
            })
        ));
    }

    #[test]
    fn hex_json_round_trip() {
        let key = Ed25519Public([0x01; 32]);
        let json = serde_json::to_string(&key).expect("key serializes");
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(32)));
        let back: Ed25519Public = serde_json::from_str(&json).expect("key deserializes");
        assert_eq!(back, key);
    }

    #[test]
    fn wrong_hex_width_is_rejected() {
        let err = serde_json::from_str::<Hash256>("\"0x0102\"").expect_err("two bytes is short");
        assert!(err.to_string().contains("32 bytes"));
    }

    #[test]
    fn byte_sequence_is_length_prefixed() {
        let params = ProtocolParameters::tiny();
        let blob = ByteSequence::from(vec![0x12, 0x34]);
        assert_eq!(encode(&blob, &params), Ok(vec![0x02, 0x12, 0x34]));
        let parsed: ByteSequence = serde_json::from_str("\"0x1234\"").expect("hex parses");
        assert_eq!(parsed, blob);
    }
}
