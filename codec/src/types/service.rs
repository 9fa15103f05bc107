//! Service accounts (`delta`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Balance, ByteSequence, CodeHash, Gas, HASH_LEN, OpaqueHash, ServiceId, TimeSlot};
use crate::codec::collections::{read_map, write_map};
use crate::codec::{ByteCursor, ByteSink, CodecError, CodecResult, Decode, Encode};

/// Account summary of a service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub code_hash: CodeHash,
    pub balance: Balance,
    pub min_item_gas: Gas,
    pub min_memo_gas: Gas,
    /// Total octets used by storage and preimages.
    pub bytes: u64,
    /// Number of storage and preimage items.
    pub items: u32,
}

codec_struct!(ServiceInfo {
    code_hash,
    balance,
    min_item_gas,
    min_memo_gas,
    bytes,
    items,
});

/// Preimages held by a service, keyed by their hash.
pub type PreimagesMap = BTreeMap<OpaqueHash, ByteSequence>;

/// Key of the preimage lookup table: a hash together with the preimage
/// length. Ordered by hash first, then length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LookupMetaKey {
    pub hash: OpaqueHash,
    pub length: u32,
}

codec_struct!(LookupMetaKey { hash, length });

/// Preimage request history: the timeslots at which a preimage was
/// requested, provided or forgotten.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupMetaMap(pub BTreeMap<LookupMetaKey, Vec<TimeSlot>>);

impl Encode for LookupMetaMap {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        write_map(sink, &self.0)
    }
}

impl Decode for LookupMetaMap {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        read_map(cursor, "lookup meta").map(Self)
    }
}

/// JSON form of one lookup entry. Struct keys cannot be JSON object keys,
/// so the map is exchanged as a list of these.
#[derive(Serialize, Deserialize)]
struct LookupMetaEntry {
    key: LookupMetaKey,
    value: Vec<TimeSlot>,
}

impl Serialize for LookupMetaMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|(key, value)| LookupMetaEntry {
            key: *key,
            value: value.clone(),
        }))
    }
}

impl<'de> Deserialize<'de> for LookupMetaMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<LookupMetaEntry>::deserialize(deserializer)?;
        Ok(Self(
            entries
                .into_iter()
                .map(|entry| (entry.key, entry.value))
                .collect(),
        ))
    }
}

/// Key/value storage of a service.
///
/// On the wire each key is preceded by its own length as a compact
/// integer, which is always 32.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageMap(pub BTreeMap<OpaqueHash, ByteSequence>);

impl Encode for StorageMap {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        sink.write_len(self.0.len());
        for (key, value) in &self.0 {
            sink.write_len(HASH_LEN);
            key.encode_to(sink)?;
            value.encode_to(sink)?;
        }
        Ok(())
    }
}

impl Decode for StorageMap {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        let len = cursor.read_len()?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key_len = cursor.read_len()?;
            if key_len != HASH_LEN {
                return Err(CodecError::LengthMismatch {
                    what: "storage key",
                    expected: HASH_LEN,
                    actual: key_len,
                });
            }
            let key = OpaqueHash::decode_from(cursor)?;
            let value = ByteSequence::decode_from(cursor)?;
            if map.last_key_value().is_some_and(|(last, _)| *last >= key) {
                return Err(CodecError::NonCanonical { what: "storage" });
            }
            map.insert(key, value);
        }
        Ok(Self(map))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccount {
    pub service: ServiceInfo,
    pub preimages: PreimagesMap,
    pub lookup_meta: LookupMetaMap,
    pub storage: StorageMap,
}

impl Encode for ServiceAccount {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        self.service.encode_to(sink)?;
        write_map(sink, &self.preimages)?;
        self.lookup_meta.encode_to(sink)?;
        self.storage.encode_to(sink)
    }
}

impl Decode for ServiceAccount {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        Ok(Self {
            service: ServiceInfo::decode_from(cursor)?,
            preimages: read_map(cursor, "preimages")?,
            lookup_meta: LookupMetaMap::decode_from(cursor)?,
            storage: StorageMap::decode_from(cursor)?,
        })
    }
}

/// All service accounts keyed by fixed-width service id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceAccounts(pub BTreeMap<ServiceId, ServiceAccount>);

impl Encode for ServiceAccounts {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        write_map(sink, &self.0)
    }
}

impl Decode for ServiceAccounts {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        read_map(cursor, "service accounts").map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};
    use crate::params::ProtocolParameters;
    use crate::types::Hash256;

    fn account() -> ServiceAccount {
        let mut account = ServiceAccount {
            service: ServiceInfo {
                code_hash: Hash256([0xC0; 32]),
                balance: 10_000,
                items: 2,
                ..ServiceInfo::default()
            },
            ..ServiceAccount::default()
        };
        account
            .preimages
            .insert(Hash256([1; 32]), ByteSequence::from(vec![0xAB]));
        account.lookup_meta.0.insert(
            LookupMetaKey {
                hash: Hash256([1; 32]),
                length: 1,
            },
            vec![3, 9],
        );
        account
            .storage
            .0
            .insert(Hash256([2; 32]), ByteSequence::from(vec![0xCD, 0xEF]));
        account
    }

    #[test]
    fn service_info_is_fixed_width() {
        let params = ProtocolParameters::tiny();
        let bytes = encode(&ServiceInfo::default(), &params).expect("info encodes");
        assert_eq!(bytes.len(), 32 + 8 * 4 + 4);
    }

    #[test]
    fn storage_keys_carry_their_length() {
        let params = ProtocolParameters::tiny();
        let storage = account().storage;
        let bytes = encode(&storage, &params).expect("storage encodes");
        assert_eq!(&bytes[..2], &[1, 32]);
        assert_eq!(bytes.len(), 2 + 32 + 3);
        assert_eq!(decode::<StorageMap>(&bytes, &params), Ok(storage));

        let mut bad = bytes.clone();
        bad[1] = 31;
        assert_eq!(
            decode::<StorageMap>(&bad, &params),
            Err(CodecError::LengthMismatch {
                what: "storage key",
                expected: 32,
                actual: 31
            })
        );
    }

    #[test]
    fn lookup_keys_order_by_hash_then_length() {
        let low = LookupMetaKey {
            hash: Hash256([1; 32]),
            length: 900,
        };
        let high = LookupMetaKey {
            hash: Hash256([2; 32]),
            length: 1,
        };
        assert!(low < high);
        assert!(
            low < LookupMetaKey {
                length: 901,
                ..low
            }
        );
    }

    #[test]
    fn accounts_round_trip() {
        let params = ProtocolParameters::tiny();
        let accounts = ServiceAccounts(BTreeMap::from([
            (7, account()),
            (3, ServiceAccount::default()),
        ]));
        let bytes = encode(&accounts, &params).expect("accounts encode");
        // Lowest id first, as a fixed 32-bit key.
        assert_eq!(&bytes[..5], &[2, 3, 0, 0, 0]);
        assert_eq!(decode::<ServiceAccounts>(&bytes, &params), Ok(accounts));
    }

    #[test]
    fn lookup_meta_json_is_an_entry_list() {
        let json = serde_json::to_value(&account().lookup_meta).expect("serializes");
        assert_eq!(json[0]["key"]["length"], 1);
        assert_eq!(json[0]["value"], serde_json::json!([3, 9]));
    }
}
