//! Dispute types: verdicts on work reports and the offences they prove.

use serde::{Deserialize, Serialize};

use super::{Ed25519Public, Ed25519Signature, ValidatorIndex, WorkReportHash};
use crate::codec::collections::{
    read_fixed_seq, read_sorted_set, write_fixed_seq, write_sorted_set,
};
use crate::codec::{ByteCursor, ByteSink, CodecResult, Decode, Encode};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    pub vote: bool,
    pub index: ValidatorIndex,
    pub signature: Ed25519Signature,
}

codec_struct!(Judgement {
    vote,
    index,
    signature,
});

/// Judgements on one report from a supermajority of validators.
///
/// `votes` carries exactly `floor(2V/3) + 1` judgements with no prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub target: WorkReportHash,
    /// Epoch index of the validator set that judged.
    pub age: u32,
    pub votes: Vec<Judgement>,
}

impl Encode for Verdict {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        self.target.encode_to(sink)?;
        self.age.encode_to(sink)?;
        let super_majority = sink.params().validators_super_majority;
        write_fixed_seq(sink, &self.votes, super_majority, "verdict votes")
    }
}

impl Decode for Verdict {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        let super_majority = cursor.params().validators_super_majority;
        Ok(Self {
            target: WorkReportHash::decode_from(cursor)?,
            age: u32::decode_from(cursor)?,
            votes: read_fixed_seq(cursor, super_majority)?,
        })
    }
}

/// A guarantor who signed a report later judged bad.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Culprit {
    pub target: WorkReportHash,
    pub key: Ed25519Public,
    pub signature: Ed25519Signature,
}

codec_struct!(Culprit {
    target,
    key,
    signature,
});

/// A validator whose judgement contradicts the verdict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub target: WorkReportHash,
    pub vote: bool,
    pub key: Ed25519Public,
    pub signature: Ed25519Signature,
}

codec_struct!(Fault {
    target,
    vote,
    key,
    signature,
});

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputesExtrinsic {
    pub verdicts: Vec<Verdict>,
    pub culprits: Vec<Culprit>,
    pub faults: Vec<Fault>,
}

codec_struct!(DisputesExtrinsic {
    verdicts,
    culprits,
    faults,
});

/// Judgement outcomes accumulated in state (`psi`).
///
/// Each set is kept strictly ascending; decoding rejects anything else.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputesRecords {
    pub good: Vec<WorkReportHash>,
    pub bad: Vec<WorkReportHash>,
    pub wonky: Vec<WorkReportHash>,
    pub offenders: Vec<Ed25519Public>,
}

impl Encode for DisputesRecords {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        write_sorted_set(sink, &self.good, "good reports")?;
        write_sorted_set(sink, &self.bad, "bad reports")?;
        write_sorted_set(sink, &self.wonky, "wonky reports")?;
        write_sorted_set(sink, &self.offenders, "offenders")
    }
}

impl Decode for DisputesRecords {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        Ok(Self {
            good: read_sorted_set(cursor, "good reports")?,
            bad: read_sorted_set(cursor, "bad reports")?,
            wonky: read_sorted_set(cursor, "wonky reports")?,
            offenders: read_sorted_set(cursor, "offenders")?,
        })
    }
}
