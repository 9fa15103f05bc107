//! Chain state components and the full state record.
//!
//! Field names of [`State`] follow the protocol's Greek-letter component
//! names, so test vectors map onto it one to one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::disputes::DisputesRecords;
use super::service::ServiceAccounts;
use super::statistics::Statistics;
use super::tickets::{TicketsAccumulator, TicketsOrKeys};
use super::validators::{EntropyBuffer, ValidatorsData};
use super::work::WorkReport;
use super::{
    AuthorizerHash, BandersnatchRingCommitment, Entropy, ExportsRoot, Gas, HeaderHash, OpaqueHash,
    ServiceId, StateRoot, TimeSlot, WorkPackageHash,
};
use crate::params::ProtocolParameters;

/// A report waiting on a core for its data to become available.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityAssignment {
    pub report: WorkReport,
    pub timeout: TimeSlot,
}

codec_struct!(AvailabilityAssignment { report, timeout });

param_sized!(
    /// Pending report per core (`rho`); an idle core holds `None`.
    AvailabilityAssignments(Option<AvailabilityAssignment>), "availability assignments",
    |params| params.cores_count
);

/// Merkle mountain range, stored as its list of peaks. Empty peak
/// positions are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mmr {
    pub peaks: Vec<Option<OpaqueHash>>,
}

codec_struct!(Mmr { peaks });

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedWorkPackage {
    pub hash: WorkPackageHash,
    pub exports_root: ExportsRoot,
}

codec_struct!(ReportedWorkPackage { hash, exports_root });

/// Summary of a recent block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub header_hash: HeaderHash,
    pub mmr: Mmr,
    pub state_root: StateRoot,
    pub reported: Vec<ReportedWorkPackage>,
}

codec_struct!(BlockInfo {
    header_hash,
    mmr,
    state_root,
    reported,
});

bounded_seq!(
    /// Recent blocks (`beta`), at most `H` of them.
    BlocksHistory(BlockInfo), "blocks history",
    |params| params.max_blocks_history
);

bounded_seq!(
    /// Authorizers currently usable on one core.
    AuthPool(AuthorizerHash), "authorizer pool",
    |params| params.auth_pool_max_size
);

param_sized!(
    /// One pool per core (`alpha`).
    AuthPools(AuthPool), "authorizer pools",
    |params| params.cores_count
);

param_sized!(
    /// Authorizers queued to enter a core's pool, exactly `Q` of them.
    AuthQueue(AuthorizerHash), "authorizer queue",
    |params| params.auth_queue_size
);

param_sized!(
    /// One queue per core (`varphi`).
    AuthQueues(AuthQueue), "authorizer queues",
    |params| params.cores_count
);

/// Safrole consensus state (`gamma`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafroleState {
    /// Validator keys for the next epoch.
    pub gamma_k: ValidatorsData,
    /// Bandersnatch ring root of `gamma_k`.
    pub gamma_z: BandersnatchRingCommitment,
    /// Sealing keys of the current epoch.
    pub gamma_s: TicketsOrKeys,
    /// Ticket accumulator for the next epoch.
    pub gamma_a: TicketsAccumulator,
}

codec_struct!(SafroleState {
    gamma_k,
    gamma_z,
    gamma_s,
    gamma_a,
});

/// A report whose accumulation waits on other work packages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyRecord {
    pub report: WorkReport,
    pub dependencies: Vec<WorkPackageHash>,
}

codec_struct!(ReadyRecord {
    report,
    dependencies,
});

param_sized!(
    /// Ready reports per slot of the epoch (`theta`).
    ReadyQueue(Vec<ReadyRecord>), "ready queue",
    |params| params.epoch_length
);

param_sized!(
    /// Work packages accumulated per slot of the epoch (`xi`).
    AccumulatedQueue(Vec<WorkPackageHash>), "accumulated queue",
    |params| params.epoch_length
);

/// Privileged services (`chi`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privileges {
    pub bless: ServiceId,
    pub assign: ServiceId,
    pub designate: ServiceId,
    /// Services accumulated every block, with their gas allowance.
    pub always_acc: BTreeMap<ServiceId, Gas>,
}

codec_struct!(Privileges {
    bless,
    assign,
    designate,
    always_acc,
});

/// Full chain state, one field per component.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub alpha: AuthPools,
    pub varphi: AuthQueues,
    pub beta: BlocksHistory,
    pub gamma: SafroleState,
    pub psi: DisputesRecords,
    pub eta: EntropyBuffer,
    /// Validators queued for the next epoch.
    pub iota: ValidatorsData,
    /// Active validators.
    pub kappa: ValidatorsData,
    /// Validators of the previous epoch.
    pub lambda: ValidatorsData,
    pub rho: AvailabilityAssignments,
    pub tau: TimeSlot,
    pub chi: Privileges,
    pub pi: Statistics,
    pub theta: ReadyQueue,
    pub xi: AccumulatedQueue,
    pub delta: ServiceAccounts,
}

codec_struct!(State {
    alpha,
    varphi,
    beta,
    gamma,
    psi,
    eta,
    iota,
    kappa,
    lambda,
    rho,
    tau,
    chi,
    pi,
    theta,
    xi,
    delta,
});

impl State {
    /// A state whose parameter-sized components all have the lengths
    /// `params` requires, with every entry zeroed or empty.
    pub fn empty(params: &ProtocolParameters) -> Self {
        let queue = AuthQueue(vec![AuthorizerHash::default(); params.auth_queue_size]);
        Self {
            alpha: AuthPools(vec![AuthPool::default(); params.cores_count]),
            varphi: AuthQueues(vec![queue; params.cores_count]),
            gamma: SafroleState {
                gamma_k: ValidatorsData::null(params),
                gamma_s: TicketsOrKeys::Keys(vec![Default::default(); params.epoch_length]),
                ..SafroleState::default()
            },
            eta: EntropyBuffer(vec![Entropy::default(); 4]),
            iota: ValidatorsData::null(params),
            kappa: ValidatorsData::null(params),
            lambda: ValidatorsData::null(params),
            rho: AvailabilityAssignments(vec![None; params.cores_count]),
            pi: Statistics::empty(params),
            theta: ReadyQueue(vec![Vec::new(); params.epoch_length]),
            xi: AccumulatedQueue(vec![Vec::new(); params.epoch_length]),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, decode, encode};
    use crate::types::{Ed25519Public, Hash256, ServiceAccount, ServiceActivityRecord};

    #[test]
    fn mmr_peaks_have_presence_bytes() {
        let params = ProtocolParameters::tiny();
        let mmr = Mmr {
            peaks: vec![None, Some(Hash256([5; 32]))],
        };
        let bytes = encode(&mmr, &params).expect("mmr encodes");
        assert_eq!(&bytes[..3], &[2, 0, 1]);
        assert_eq!(bytes.len(), 3 + 32);
        assert_eq!(decode::<Mmr>(&bytes, &params), Ok(mmr));
    }

    #[test]
    fn idle_cores_encode_as_absent() {
        let params = ProtocolParameters::tiny();
        let rho = AvailabilityAssignments(vec![None; 2]);
        assert_eq!(encode(&rho, &params), Ok(vec![0, 0]));
    }

    #[test]
    fn auth_pool_is_bounded() {
        let params = ProtocolParameters::tiny();
        let pool = AuthPool(vec![Hash256::default(); 9]);
        assert!(matches!(
            encode(&pool, &params),
            Err(CodecError::LengthLimitExceeded {
                limit: 8,
                actual: 9,
                ..
            })
        ));
    }

    #[test]
    fn always_accumulate_map_uses_fixed_width_keys() {
        let params = ProtocolParameters::tiny();
        let privileges = Privileges {
            bless: 1,
            always_acc: BTreeMap::from([(5, 100)]),
            ..Privileges::default()
        };
        let bytes = encode(&privileges, &params).expect("privileges encode");
        assert_eq!(bytes.len(), 12 + 1 + 4 + 8);
        assert_eq!(&bytes[12..17], &[1, 5, 0, 0, 0]);
    }

    #[test]
    fn empty_state_round_trips() {
        let params = ProtocolParameters::tiny();
        let state = State {
            tau: 99,
            ..State::empty(&params)
        };
        let bytes = encode(&state, &params).expect("state encodes");
        assert_eq!(decode::<State>(&bytes, &params), Ok(state));
    }

    #[test]
    fn populated_state_round_trips() {
        let params = ProtocolParameters::tiny();
        let mut state = State::empty(&params);
        state.alpha.0[0] = AuthPool(vec![Hash256([10; 32])]);
        state.beta = BlocksHistory(vec![BlockInfo {
            header_hash: Hash256([1; 32]),
            mmr: Mmr {
                peaks: vec![None, Some(Hash256([2; 32]))],
            },
            state_root: Hash256([3; 32]),
            reported: vec![ReportedWorkPackage {
                hash: Hash256([4; 32]),
                exports_root: Hash256([5; 32]),
            }],
        }]);
        state.psi.good = vec![Hash256([1; 32]), Hash256([9; 32])];
        state.psi.offenders = vec![Ed25519Public([8; 32])];
        state.rho.0[1] = Some(AvailabilityAssignment {
            report: WorkReport {
                core_index: 1,
                ..WorkReport::default()
            },
            timeout: 50,
        });
        state.theta.0[3] = vec![ReadyRecord {
            report: WorkReport::default(),
            dependencies: vec![Hash256([6; 32])],
        }];
        state.xi.0[0] = vec![Hash256([7; 32])];
        state.pi.services.0.insert(
            1 << 20,
            ServiceActivityRecord {
                provided_count: 2,
                ..ServiceActivityRecord::default()
            },
        );
        state.delta.0.insert(9, ServiceAccount::default());

        let bytes = encode(&state, &params).expect("state encodes");
        assert_eq!(decode::<State>(&bytes, &params), Ok(state.clone()));

        let mut empty = State::empty(&params);
        empty.tau = state.tau;
        let empty_len = encode(&empty, &params).expect("empty state encodes").len();
        assert!(bytes.len() > empty_len);
    }

    #[test]
    fn default_state_is_not_encodable() {
        // Parameter-sized components are empty, which no configuration allows.
        assert!(matches!(
            encode(&State::default(), &ProtocolParameters::tiny()),
            Err(CodecError::LengthMismatch { .. })
        ));
    }
}
