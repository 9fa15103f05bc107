//! Safrole ticket types.

use serde::{Deserialize, Serialize};

use super::{BandersnatchPublic, BandersnatchRingVrfSignature, TicketId};
use crate::codec::collections::{read_fixed_seq, write_fixed_seq};
use crate::codec::option::{exactly_one, invalid_discriminant};
use crate::codec::{ByteCursor, ByteSink, CodecResult, Decode, Encode};

/// A ticket that won a slot in the sealing-key contest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketBody {
    pub id: TicketId,
    pub attempt: u8,
}

codec_struct!(TicketBody { id, attempt });

/// A ticket submission as carried in a block's tickets extrinsic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketEnvelope {
    pub attempt: u8,
    pub signature: BandersnatchRingVrfSignature,
}

codec_struct!(TicketEnvelope { attempt, signature });

bounded_seq!(
    /// Ticket submissions of one block, at most `K` of them.
    TicketsExtrinsic(TicketEnvelope), "tickets extrinsic",
    |params| params.max_tickets_per_block
);

bounded_seq!(
    /// Best tickets collected so far in the current epoch (at most `E`).
    TicketsAccumulator(TicketBody), "tickets accumulator",
    |params| params.epoch_length
);

/// Sealing-key sequence for an epoch: either winning tickets or, as a
/// fallback, Bandersnatch keys. Each arm holds exactly `E` entries.
///
/// Wire form: discriminant `0` or `1`, then `E` elements with no prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketsOrKeys {
    Tickets(Vec<TicketBody>),
    Keys(Vec<BandersnatchPublic>),
}

impl TicketsOrKeys {
    const NAME: &'static str = "TicketsOrKeys";

    /// Builds the union from its two optional parts. Exactly one of them
    /// must be present.
    pub fn from_parts(
        tickets: Option<Vec<TicketBody>>,
        keys: Option<Vec<BandersnatchPublic>>,
    ) -> CodecResult<Self> {
        exactly_one(
            Self::NAME,
            [tickets.map(Self::Tickets), keys.map(Self::Keys)],
        )
    }

    pub fn discriminant(&self) -> u8 {
        match self {
            Self::Tickets(_) => 0,
            Self::Keys(_) => 1,
        }
    }
}

impl Default for TicketsOrKeys {
    fn default() -> Self {
        Self::Keys(Vec::new())
    }
}

impl Encode for TicketsOrKeys {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        let epoch_length = sink.params().epoch_length;
        sink.write_byte(self.discriminant());
        match self {
            Self::Tickets(tickets) => {
                write_fixed_seq(sink, tickets, epoch_length, "sealing tickets")
            }
            Self::Keys(keys) => write_fixed_seq(sink, keys, epoch_length, "fallback keys"),
        }
    }
}

impl Decode for TicketsOrKeys {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        let epoch_length = cursor.params().epoch_length;
        match cursor.read_byte()? {
            0 => read_fixed_seq(cursor, epoch_length).map(Self::Tickets),
            1 => read_fixed_seq(cursor, epoch_length).map(Self::Keys),
            value => Err(invalid_discriminant(Self::NAME, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, decode, encode};
    use crate::params::ProtocolParameters;
    use crate::types::Hash256;

    fn keys(n: usize) -> Vec<BandersnatchPublic> {
        (0..n).map(|i| BandersnatchPublic([i as u8; 32])).collect()
    }

    #[test]
    fn fallback_keys_round_trip() {
        let params = ProtocolParameters::tiny();
        let value = TicketsOrKeys::Keys(keys(params.epoch_length));
        let bytes = encode(&value, &params).expect("keys encode");
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes.len(), 1 + 12 * 32);
        assert_eq!(decode::<TicketsOrKeys>(&bytes, &params), Ok(value));
    }

    #[test]
    fn unknown_discriminant_is_rejected() {
        let params = ProtocolParameters::tiny();
        assert_eq!(
            decode::<TicketsOrKeys>(&[2], &params),
            Err(CodecError::InvalidDiscriminant {
                type_name: "TicketsOrKeys",
                value: 2
            })
        );
    }

    #[test]
    fn from_parts_requires_exactly_one_arm() {
        assert!(matches!(
            TicketsOrKeys::from_parts(None, None),
            Err(CodecError::InvalidUnion { populated: 0, .. })
        ));
        assert!(matches!(
            TicketsOrKeys::from_parts(Some(Vec::new()), Some(Vec::new())),
            Err(CodecError::InvalidUnion { populated: 2, .. })
        ));
        assert_eq!(
            TicketsOrKeys::from_parts(None, Some(keys(1))),
            Ok(TicketsOrKeys::Keys(keys(1)))
        );
    }

    #[test]
    fn wrong_arm_length_is_a_mismatch() {
        let params = ProtocolParameters::tiny();
        let value = TicketsOrKeys::Tickets(vec![TicketBody::default(); 3]);
        assert!(matches!(
            encode(&value, &params),
            Err(CodecError::LengthMismatch {
                expected: 12,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn tickets_extrinsic_is_capped_at_k() {
        let params = ProtocolParameters::tiny();
        let envelope = TicketEnvelope {
            attempt: 0,
            signature: BandersnatchRingVrfSignature([0; 784]),
        };
        let extrinsic = TicketsExtrinsic(vec![envelope; 4]);
        assert!(matches!(
            encode(&extrinsic, &params),
            Err(CodecError::LengthLimitExceeded { limit: 3, .. })
        ));
    }

    #[test]
    fn ticket_body_layout() {
        let params = ProtocolParameters::tiny();
        let ticket = TicketBody {
            id: Hash256([7; 32]),
            attempt: 2,
        };
        let bytes = encode(&ticket, &params).expect("ticket encodes");
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[32], 2);
    }
}
