//! Block and header types.
//!
//! A block is a [`Header`] followed by its [`Extrinsic`]. The header is the
//! part other nodes hash and sign, so its field order below is what
//! determines the header hash.

use serde::{Deserialize, Serialize};

use super::extrinsic::Extrinsic;
use super::tickets::TicketBody;
use super::{
    BandersnatchPublic, BandersnatchVrfSignature, Ed25519Public, Entropy, HeaderHash, OpaqueHash,
    StateRoot, TimeSlot, ValidatorIndex,
};
use crate::codec::collections::{read_fixed_seq, write_fixed_seq};
use crate::codec::{ByteCursor, ByteSink, CodecResult, Decode, Encode};

/// Keys of one validator announced for the next epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochMarkValidatorKeys {
    pub bandersnatch: BandersnatchPublic,
    pub ed25519: Ed25519Public,
}

codec_struct!(EpochMarkValidatorKeys {
    bandersnatch,
    ed25519,
});

/// Present in the first block of an epoch.
///
/// `validators` holds exactly `V` entries and carries no length prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochMark {
    pub entropy: Entropy,
    pub tickets_entropy: Entropy,
    pub validators: Vec<EpochMarkValidatorKeys>,
}

impl Encode for EpochMark {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        self.entropy.encode_to(sink)?;
        self.tickets_entropy.encode_to(sink)?;
        let validators_count = sink.params().validators_count;
        write_fixed_seq(
            sink,
            &self.validators,
            validators_count,
            "epoch mark validators",
        )
    }
}

impl Decode for EpochMark {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        let validators_count = cursor.params().validators_count;
        Ok(Self {
            entropy: Entropy::decode_from(cursor)?,
            tickets_entropy: Entropy::decode_from(cursor)?,
            validators: read_fixed_seq(cursor, validators_count)?,
        })
    }
}

param_sized!(
    /// Sealing tickets for the next epoch, one per slot.
    TicketsMark(TicketBody), "tickets mark",
    |params| params.epoch_length
);

/// Block header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Hash of the parent header.
    pub parent: HeaderHash,
    /// Posterior state root of the parent block.
    pub parent_state_root: StateRoot,
    /// Commitment to this block's extrinsic.
    pub extrinsic_hash: OpaqueHash,
    pub slot: TimeSlot,
    pub epoch_mark: Option<EpochMark>,
    pub tickets_mark: Option<TicketsMark>,
    /// Ed25519 keys of validators newly found guilty.
    pub offenders_mark: Vec<Ed25519Public>,
    /// Index of the block author in the current validator set.
    pub author_index: ValidatorIndex,
    pub entropy_source: BandersnatchVrfSignature,
    pub seal: BandersnatchVrfSignature,
}

codec_struct!(Header {
    parent,
    parent_state_root,
    extrinsic_hash,
    slot,
    epoch_mark,
    tickets_mark,
    offenders_mark,
    author_index,
    entropy_source,
    seal,
});

impl Header {
    /// Encoded form without the trailing seal, which is what the block
    /// author signs.
    pub fn unsigned_bytes(
        &self,
        params: &crate::params::ProtocolParameters,
    ) -> CodecResult<Vec<u8>> {
        let mut bytes = crate::codec::encode(self, params)?;
        bytes.truncate(bytes.len() - BandersnatchVrfSignature::LEN);
        Ok(bytes)
    }
}

/// A complete block: header followed by extrinsic data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub extrinsic: Extrinsic,
}

codec_struct!(Block { header, extrinsic });
