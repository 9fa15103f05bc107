//! Protocol types and their wire layouts.
//!
//! Every type here implements [`Encode`](crate::codec::Encode) and
//! [`Decode`](crate::codec::Decode) with one fixed field order, plus serde
//! `Serialize`/`Deserialize` so test vectors can be loaded from JSON.
//!
//! Hash-like fields all share the [`Hash256`] representation; the aliases
//! below exist to say what a given hash commits to, not to change its layout.

/// Implements `Encode`/`Decode` for a struct by visiting its fields in the
/// listed order, each with its own impl.
macro_rules! codec_struct {
    ($name:ident { $($field:ident),* $(,)? }) => {
        impl $crate::codec::Encode for $name {
            fn encode_to(
                &self,
                sink: &mut $crate::codec::ByteSink<'_>,
            ) -> $crate::codec::CodecResult<()> {
                $( $crate::codec::Encode::encode_to(&self.$field, sink)?; )*
                Ok(())
            }
        }

        impl $crate::codec::Decode for $name {
            fn decode_from(
                cursor: &mut $crate::codec::ByteCursor<'_, '_>,
            ) -> $crate::codec::CodecResult<Self> {
                Ok(Self {
                    $( $field: $crate::codec::Decode::decode_from(cursor)?, )*
                })
            }
        }
    };
}

/// Declares a record whose fields are all `u64` counters written as compact
/// integers, in declaration order.
macro_rules! compact_record {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $field:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: u64, )*
        }

        impl $crate::codec::Encode for $name {
            fn encode_to(
                &self,
                sink: &mut $crate::codec::ByteSink<'_>,
            ) -> $crate::codec::CodecResult<()> {
                $( sink.write_uint(self.$field); )*
                Ok(())
            }
        }

        impl $crate::codec::Decode for $name {
            fn decode_from(
                cursor: &mut $crate::codec::ByteCursor<'_, '_>,
            ) -> $crate::codec::CodecResult<Self> {
                Ok(Self {
                    $( $field: cursor.read_uint()?, )*
                })
            }
        }
    };
}

/// Declares an array whose length is fixed by the protocol parameters and
/// therefore written without a prefix.
macro_rules! param_sized {
    (
        $(#[$meta:meta])* $name:ident($elem:ty), $what:literal,
        |$params:ident| $count:expr
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Vec<$elem>);

        impl $name {
            /// Element count required under `params`.
            pub fn expected_len($params: &$crate::params::ProtocolParameters) -> usize {
                $count
            }
        }

        impl $crate::codec::Encode for $name {
            fn encode_to(
                &self,
                sink: &mut $crate::codec::ByteSink<'_>,
            ) -> $crate::codec::CodecResult<()> {
                let expected = Self::expected_len(sink.params());
                $crate::codec::collections::write_fixed_seq(sink, &self.0, expected, $what)
            }
        }

        impl $crate::codec::Decode for $name {
            fn decode_from(
                cursor: &mut $crate::codec::ByteCursor<'_, '_>,
            ) -> $crate::codec::CodecResult<Self> {
                let count = Self::expected_len(cursor.params());
                $crate::codec::collections::read_fixed_seq(cursor, count).map(Self)
            }
        }
    };
}

/// Declares a length-prefixed sequence with a protocol upper bound.
macro_rules! bounded_seq {
    (
        $(#[$meta:meta])* $name:ident($elem:ty), $what:literal,
        |$params:ident| $limit:expr
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Vec<$elem>);

        impl $name {
            /// Largest element count allowed under `params`.
            pub fn limit($params: &$crate::params::ProtocolParameters) -> usize {
                $limit
            }
        }

        impl $crate::codec::Encode for $name {
            fn encode_to(
                &self,
                sink: &mut $crate::codec::ByteSink<'_>,
            ) -> $crate::codec::CodecResult<()> {
                let limit = Self::limit(sink.params());
                $crate::codec::collections::write_bounded_seq(sink, &self.0, limit, $what)
            }
        }

        impl $crate::codec::Decode for $name {
            fn decode_from(
                cursor: &mut $crate::codec::ByteCursor<'_, '_>,
            ) -> $crate::codec::CodecResult<Self> {
                let limit = Self::limit(cursor.params());
                $crate::codec::collections::read_bounded_seq(cursor, limit, $what).map(Self)
            }
        }
    };
}

pub mod block;
pub mod bytes;
pub mod disputes;
pub mod extrinsic;
pub mod service;
pub mod state;
pub mod statistics;
pub mod tickets;
pub mod validators;
pub mod work;

pub use block::{Block, EpochMark, EpochMarkValidatorKeys, Header, TicketsMark};
pub use bytes::{
    BandersnatchPublic, BandersnatchRingCommitment, BandersnatchRingVrfSignature,
    BandersnatchVrfSignature, BlsPublic, ByteSequence, Ed25519Public, Ed25519Signature, HASH_LEN,
    Hash256, TransferMemo, ValidatorMetadata,
};
pub use disputes::{Culprit, DisputesExtrinsic, DisputesRecords, Fault, Judgement, Verdict};
pub use extrinsic::{
    AssurancesExtrinsic, AvailAssurance, Bitfield, Extrinsic, GuaranteesExtrinsic, Preimage,
    PreimagesExtrinsic, ReportGuarantee, ValidatorSignature,
};
pub use service::{
    LookupMetaKey, LookupMetaMap, PreimagesMap, ServiceAccount, ServiceAccounts, ServiceInfo,
    StorageMap,
};
pub use state::{
    AccumulatedQueue, AuthPool, AuthPools, AuthQueue, AuthQueues, AvailabilityAssignment,
    AvailabilityAssignments, BlockInfo, BlocksHistory, Mmr, Privileges, ReadyQueue, ReadyRecord,
    ReportedWorkPackage, SafroleState, State,
};
pub use statistics::{
    ActivityRecord, ActivityRecords, CoreActivityRecord, CoresStatistics, ServiceActivityRecord,
    ServicesStatistics, Statistics,
};
pub use tickets::{TicketBody, TicketEnvelope, TicketsAccumulator, TicketsExtrinsic, TicketsOrKeys};
pub use validators::{EntropyBuffer, ValidatorData, ValidatorsData};
pub use work::{
    Authorizer, DeferredTransfer, DeferredTransfers, ExtrinsicSpec, ImportSpec, Operand,
    RefineContext, RefineLoad, SegmentRootLookupItem, WorkExecResult, WorkItem, WorkPackage,
    WorkPackageSpec, WorkReport, WorkResult,
};

pub type OpaqueHash = Hash256;
pub type HeaderHash = Hash256;
pub type StateRoot = Hash256;
pub type BeefyRoot = Hash256;
pub type Entropy = Hash256;
pub type TicketId = Hash256;
pub type WorkPackageHash = Hash256;
pub type WorkReportHash = Hash256;
pub type ErasureRoot = Hash256;
pub type ExportsRoot = Hash256;
pub type AuthorizerHash = Hash256;
pub type CodeHash = Hash256;

/// Timeslot index since genesis.
pub type TimeSlot = u32;
pub type ValidatorIndex = u16;
pub type CoreIndex = u16;
pub type ServiceId = u32;
pub type Gas = u64;
pub type Balance = u64;
