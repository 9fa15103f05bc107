//! Activity statistics (`pi`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ServiceId;
use crate::codec::{ByteCursor, ByteSink, CodecError, CodecResult, Decode, Encode};

/// Per-validator counters for one epoch. All fields are fixed 32-bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub blocks: u32,
    pub tickets: u32,
    pub pre_images: u32,
    pub pre_images_size: u32,
    pub guarantees: u32,
    pub assurances: u32,
}

codec_struct!(ActivityRecord {
    blocks,
    tickets,
    pre_images,
    pre_images_size,
    guarantees,
    assurances,
});

param_sized!(
    ActivityRecords(ActivityRecord),
    "validator activity records",
    |params| params.validators_count
);

compact_record!(
    /// Per-core counters for the current block.
    CoreActivityRecord {
        da_load,
        popularity,
        imports,
        exports,
        extrinsic_size,
        extrinsic_count,
        bundle_size,
        gas_used,
    }
);

param_sized!(
    CoresStatistics(CoreActivityRecord),
    "core statistics",
    |params| params.cores_count
);

compact_record!(
    /// Per-service counters for the current block.
    ServiceActivityRecord {
        provided_count,
        provided_size,
        refinement_count,
        refinement_gas_used,
        imports,
        exports,
        extrinsic_size,
        extrinsic_count,
        accumulate_count,
        accumulate_gas_used,
        on_transfers_count,
        on_transfers_gas_used,
    }
);

/// Service counters keyed by service id.
///
/// Unlike other service-keyed maps, the key is written as a compact
/// integer rather than a fixed 32-bit value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServicesStatistics(pub BTreeMap<ServiceId, ServiceActivityRecord>);

impl Encode for ServicesStatistics {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        sink.write_len(self.0.len());
        for (service, record) in &self.0 {
            sink.write_uint(u64::from(*service));
            record.encode_to(sink)?;
        }
        Ok(())
    }
}

impl Decode for ServicesStatistics {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        let len = cursor.read_len()?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let raw = cursor.read_uint()?;
            let service = ServiceId::try_from(raw).map_err(|_| CodecError::ValueOverflow {
                width: 4,
                value: raw,
            })?;
            let record = ServiceActivityRecord::decode_from(cursor)?;
            if map.last_key_value().is_some_and(|(last, _)| *last >= service) {
                return Err(CodecError::NonCanonical {
                    what: "service statistics",
                });
            }
            map.insert(service, record);
        }
        Ok(Self(map))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub vals_current: ActivityRecords,
    pub vals_last: ActivityRecords,
    pub cores: CoresStatistics,
    pub services: ServicesStatistics,
}

codec_struct!(Statistics {
    vals_current,
    vals_last,
    cores,
    services,
});

impl Statistics {
    /// All-zero statistics sized for `params`.
    pub fn empty(params: &crate::params::ProtocolParameters) -> Self {
        Self {
            vals_current: ActivityRecords(vec![ActivityRecord::default(); params.validators_count]),
            vals_last: ActivityRecords(vec![ActivityRecord::default(); params.validators_count]),
            cores: CoresStatistics(vec![CoreActivityRecord::default(); params.cores_count]),
            services: ServicesStatistics::default(),
        }
    }
}
