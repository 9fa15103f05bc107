//! Validator keys and the entropy pool.

use serde::{Deserialize, Serialize};

use super::{BandersnatchPublic, BlsPublic, Ed25519Public, Entropy, ValidatorMetadata};

/// Full key set of one validator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorData {
    pub bandersnatch: BandersnatchPublic,
    pub ed25519: Ed25519Public,
    pub bls: BlsPublic,
    pub metadata: ValidatorMetadata,
}

codec_struct!(ValidatorData {
    bandersnatch,
    ed25519,
    bls,
    metadata,
});

param_sized!(
    /// One entry per validator slot, `V` in total.
    ValidatorsData(ValidatorData), "validators data",
    |params| params.validators_count
);

impl ValidatorsData {
    /// A set of `V` all-zero entries, the placeholder for empty slots.
    pub fn null(params: &crate::params::ProtocolParameters) -> Self {
        Self(vec![ValidatorData::default(); params.validators_count])
    }
}

param_sized!(
    /// The current accumulator followed by the three most recent epochs'
    /// values.
    EntropyBuffer(Entropy), "entropy buffer",
    |_params| 4
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, decode, encode};
    use crate::params::ProtocolParameters;

    #[test]
    fn validator_data_is_336_bytes() {
        let params = ProtocolParameters::tiny();
        let bytes = encode(&ValidatorData::default(), &params).expect("validator encodes");
        assert_eq!(bytes.len(), 32 + 32 + 144 + 128);
    }

    #[test]
    fn validators_data_has_no_prefix() {
        let params = ProtocolParameters::tiny();
        let bytes = encode(&ValidatorsData::null(&params), &params).expect("set encodes");
        assert_eq!(bytes.len(), 6 * 336);
        assert_eq!(
            decode::<ValidatorsData>(&bytes, &params),
            Ok(ValidatorsData::null(&params))
        );
    }

    #[test]
    fn validator_count_must_match_params() {
        let tiny = ProtocolParameters::tiny();
        let five = ValidatorsData(vec![ValidatorData::default(); 5]);
        assert_eq!(
            encode(&five, &tiny),
            Err(CodecError::LengthMismatch {
                what: "validators data",
                expected: 6,
                actual: 5
            })
        );

        // Bytes for six validators do not decode under the full configuration.
        let bytes = encode(&ValidatorsData::null(&tiny), &tiny).expect("set encodes");
        assert!(matches!(
            decode::<ValidatorsData>(&bytes, &ProtocolParameters::full()),
            Err(CodecError::BufferUnderflow { .. })
        ));
    }

    #[test]
    fn entropy_buffer_holds_four_hashes() {
        let params = ProtocolParameters::tiny();
        let buffer = EntropyBuffer(vec![Entropy::default(); 4]);
        assert_eq!(encode(&buffer, &params).map(|b| b.len()), Ok(128));
        assert!(encode(&EntropyBuffer(vec![Entropy::default(); 3]), &params).is_err());
    }
}
