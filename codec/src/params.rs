//! Protocol parameter context.
//!
//! Several protocol collections have no length prefix on the wire: their
//! element count is fixed by the network configuration (validator count,
//! core count, epoch length, ...). [`ProtocolParameters`] carries those
//! counts as an explicit value that every encode/decode call borrows for its
//! whole duration, so two calls running side by side may use different
//! configurations without interfering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Network configuration values that determine the size of parameter-sized
/// arrays and the bounds of bounded sequences.
///
/// Field names follow the `const` section of the JSON node configuration,
/// so a parameter set can be loaded directly from such a file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParameters {
    /// Number of validators (`V`).
    pub validators_count: usize,
    /// Number of cores (`C`).
    pub cores_count: usize,
    /// Number of slots per epoch (`E`).
    pub epoch_length: usize,
    /// Maximum ticket submissions per validator per epoch (`N`).
    pub tickets_per_validator: usize,
    /// Maximum ticket envelopes in one block (`K`).
    pub max_tickets_per_block: usize,
    /// Votes required for a verdict: `floor(2V/3) + 1`.
    pub validators_super_majority: usize,
    /// Width in bytes of an availability bitfield: `ceil(C/8)`.
    pub avail_bitfield_bytes: usize,
    /// Maximum authorizers in a core's pool (`O`).
    pub auth_pool_max_size: usize,
    /// Fixed length of a core's authorizer queue (`Q`).
    pub auth_queue_size: usize,
    /// Maximum number of recent blocks kept in history (`H`).
    #[serde(default = "default_max_blocks_history")]
    pub max_blocks_history: usize,
    /// Slots between guarantor core rotations (`R`).
    #[serde(default = "default_rotation_period")]
    pub rotation_period: usize,
}

fn default_max_blocks_history() -> usize {
    8
}

fn default_rotation_period() -> usize {
    10
}

/// Reason a [`ProtocolParameters`] value was rejected by
/// [`ProtocolParameters::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamsError {
    pub field: &'static str,
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid protocol parameter {}: expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

impl std::error::Error for ParamsError {}

impl ProtocolParameters {
    /// The small configuration used by the "tiny" test vectors.
    pub fn tiny() -> Self {
        Self {
            validators_count: 6,
            cores_count: 2,
            epoch_length: 12,
            tickets_per_validator: 3,
            max_tickets_per_block: 3,
            validators_super_majority: 5,
            avail_bitfield_bytes: 1,
            auth_pool_max_size: 8,
            auth_queue_size: 80,
            max_blocks_history: 8,
            rotation_period: 4,
        }
    }

    /// The full-size production configuration.
    pub fn full() -> Self {
        Self {
            validators_count: 1023,
            cores_count: 341,
            epoch_length: 600,
            tickets_per_validator: 2,
            max_tickets_per_block: 16,
            validators_super_majority: 683,
            avail_bitfield_bytes: 43,
            auth_pool_max_size: 8,
            auth_queue_size: 80,
            max_blocks_history: 8,
            rotation_period: 10,
        }
    }

    /// Looks up a named preset (`"tiny"` or `"full"`).
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "tiny" => Some(Self::tiny()),
            "full" => Some(Self::full()),
            _ => None,
        }
    }

    /// Checks the derived values against the counts they derive from.
    ///
    /// A parameter set that fails here would make encoders and decoders
    /// disagree with other implementations on the size of fixed arrays.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let non_zero = [
            ("validators_count", self.validators_count),
            ("cores_count", self.cores_count),
            ("epoch_length", self.epoch_length),
            ("auth_queue_size", self.auth_queue_size),
        ];
        for (field, value) in non_zero {
            if value == 0 {
                return Err(ParamsError {
                    field,
                    expected: 1,
                    actual: 0,
                });
            }
        }

        let super_majority = self.validators_count * 2 / 3 + 1;
        if self.validators_super_majority != super_majority {
            return Err(ParamsError {
                field: "validators_super_majority",
                expected: super_majority,
                actual: self.validators_super_majority,
            });
        }

        let bitfield_bytes = self.cores_count.div_ceil(8);
        if self.avail_bitfield_bytes != bitfield_bytes {
            return Err(ParamsError {
                field: "avail_bitfield_bytes",
                expected: bitfield_bytes,
                actual: self.avail_bitfield_bytes,
            });
        }

        Ok(())
    }
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self::full()
    }
}
