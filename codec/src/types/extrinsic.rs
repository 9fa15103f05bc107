//! Extrinsic data: everything a block carries besides its header.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::bytes::{from_hex, to_hex};
use super::disputes::DisputesExtrinsic;
use super::tickets::TicketsExtrinsic;
use super::work::WorkReport;
use super::{ByteSequence, Ed25519Signature, OpaqueHash, ServiceId, TimeSlot, ValidatorIndex};
use crate::codec::{ByteCursor, ByteSink, CodecError, CodecResult, Decode, Encode};
use crate::params::ProtocolParameters;

/// Data a service asked to have made available on chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preimage {
    pub requester: ServiceId,
    pub blob: ByteSequence,
}

codec_struct!(Preimage { requester, blob });

pub type PreimagesExtrinsic = Vec<Preimage>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSignature {
    pub validator_index: ValidatorIndex,
    pub signature: Ed25519Signature,
}

codec_struct!(ValidatorSignature {
    validator_index,
    signature,
});

/// A work report together with the guarantors' signatures over it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportGuarantee {
    pub report: WorkReport,
    pub slot: TimeSlot,
    pub signatures: Vec<ValidatorSignature>,
}

codec_struct!(ReportGuarantee {
    report,
    slot,
    signatures,
});

bounded_seq!(
    /// At most one guarantee per core.
    GuaranteesExtrinsic(ReportGuarantee), "guarantees extrinsic",
    |params| params.cores_count
);

/// Availability bitfield, one bit per core.
///
/// Always `avail_bitfield_bytes` wide on the wire. Core `i` is bit `i % 8`
/// of byte `i / 8`, least significant bit first.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Bitfield(pub Vec<u8>);

impl Bitfield {
    /// An all-clear bitfield of the width `params` requires.
    pub fn zeroed(params: &ProtocolParameters) -> Self {
        Self(vec![0; params.avail_bitfield_bytes])
    }

    pub fn is_set(&self, core: usize) -> bool {
        self.0
            .get(core / 8)
            .is_some_and(|byte| byte & (1 << (core % 8)) != 0)
    }

    /// Marks `core` as available. Cores beyond the current width are ignored.
    pub fn set(&mut self, core: usize) {
        if let Some(byte) = self.0.get_mut(core / 8) {
            *byte |= 1 << (core % 8);
        }
    }

    /// Number of cores marked available.
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|byte| byte.count_ones()).sum()
    }
}

impl fmt::Debug for Bitfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitfield({})", to_hex(&self.0))
    }
}

impl Encode for Bitfield {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        let expected = sink.params().avail_bitfield_bytes;
        if self.0.len() != expected {
            return Err(CodecError::LengthMismatch {
                what: "availability bitfield",
                expected,
                actual: self.0.len(),
            });
        }
        sink.write_bytes(&self.0);
        Ok(())
    }
}

impl Decode for Bitfield {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        let width = cursor.params().avail_bitfield_bytes;
        Ok(Self(cursor.read_exact(width)?.to_vec()))
    }
}

impl Serialize for Bitfield {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(&self.0))
    }
}

impl<'de> Deserialize<'de> for Bitfield {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        from_hex(&text).map(Self).map_err(de::Error::custom)
    }
}

/// A validator's statement of which cores' data it holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailAssurance {
    pub anchor: OpaqueHash,
    pub bitfield: Bitfield,
    pub validator_index: ValidatorIndex,
    pub signature: Ed25519Signature,
}

codec_struct!(AvailAssurance {
    anchor,
    bitfield,
    validator_index,
    signature,
});

bounded_seq!(
    /// At most one assurance per validator.
    AssurancesExtrinsic(AvailAssurance), "assurances extrinsic",
    |params| params.validators_count
);

/// The extrinsic part of a block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extrinsic {
    pub tickets: TicketsExtrinsic,
    pub preimages: PreimagesExtrinsic,
    pub guarantees: GuaranteesExtrinsic,
    pub assurances: AssurancesExtrinsic,
    pub disputes: DisputesExtrinsic,
}

codec_struct!(Extrinsic {
    tickets,
    preimages,
    guarantees,
    assurances,
    disputes,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};
    use crate::types::Hash256;

    #[test]
    fn bitfield_bits_are_lsb_first() {
        let params = ProtocolParameters::full();
        let mut bitfield = Bitfield::zeroed(&params);
        bitfield.set(0);
        bitfield.set(9);
        bitfield.set(340);
        bitfield.set(400);

        assert_eq!(bitfield.0[0], 0b0000_0001);
        assert_eq!(bitfield.0[1], 0b0000_0010);
        assert!(bitfield.is_set(340));
        assert!(!bitfield.is_set(1));
        assert!(!bitfield.is_set(400));
        assert_eq!(bitfield.count_ones(), 3);
    }

    #[test]
    fn bitfield_width_follows_params() {
        let params = ProtocolParameters::tiny();
        assert!(matches!(
            encode(&Bitfield(vec![0, 0]), &params),
            Err(CodecError::LengthMismatch {
                expected: 1,
                actual: 2,
                ..
            })
        ));
        assert_eq!(encode(&Bitfield(vec![0b11]), &params), Ok(vec![0b11]));
    }

    #[test]
    fn assurance_round_trip() {
        let params = ProtocolParameters::tiny();
        let assurance = AvailAssurance {
            anchor: Hash256([9; 32]),
            bitfield: Bitfield(vec![0b10]),
            validator_index: 4,
            signature: Ed25519Signature([3; 64]),
        };
        let bytes = encode(&assurance, &params).expect("assurance encodes");
        assert_eq!(bytes.len(), 32 + 1 + 2 + 64);
        assert_eq!(decode::<AvailAssurance>(&bytes, &params), Ok(assurance));
    }

    #[test]
    fn empty_extrinsic_is_five_empty_sequences() {
        let params = ProtocolParameters::tiny();
        let bytes = encode(&Extrinsic::default(), &params).expect("extrinsic encodes");
        // Disputes is itself three sequences.
        assert_eq!(bytes, vec![0; 7]);
    }

    #[test]
    fn preimage_json_uses_hex_blob() {
        let preimage: Preimage = serde_json::from_str(r#"{"requester": 16, "blob": "0x8100"}"#)
            .expect("preimage parses");
        assert_eq!(preimage.blob.as_bytes(), &[0x81, 0x00]);
    }
}
