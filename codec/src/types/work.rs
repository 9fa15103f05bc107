//! Work packages, work reports and the results they carry.

use serde::{Deserialize, Serialize};

use super::{
    AuthorizerHash, BeefyRoot, ByteSequence, CodeHash, CoreIndex, ErasureRoot, ExportsRoot, Gas,
    HeaderHash, OpaqueHash, ServiceId, StateRoot, TimeSlot, TransferMemo, WorkPackageHash,
};
use crate::codec::option::invalid_discriminant;
use crate::codec::{ByteCursor, ByteSink, CodecResult, Decode, Encode};

/// Chain state a work package was refined against.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineContext {
    pub anchor: HeaderHash,
    pub state_root: StateRoot,
    pub beefy_root: BeefyRoot,
    pub lookup_anchor: HeaderHash,
    pub lookup_anchor_slot: TimeSlot,
    pub prerequisites: Vec<WorkPackageHash>,
}

codec_struct!(RefineContext {
    anchor,
    state_root,
    beefy_root,
    lookup_anchor,
    lookup_anchor_slot,
    prerequisites,
});

/// Availability specification of a work package.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPackageSpec {
    pub hash: WorkPackageHash,
    pub length: u32,
    pub erasure_root: ErasureRoot,
    pub exports_root: ExportsRoot,
    pub exports_count: u16,
}

codec_struct!(WorkPackageSpec {
    hash,
    length,
    erasure_root,
    exports_root,
    exports_count,
});

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRootLookupItem {
    pub work_package_hash: WorkPackageHash,
    pub segment_tree_root: OpaqueHash,
}

codec_struct!(SegmentRootLookupItem {
    work_package_hash,
    segment_tree_root,
});

/// Outcome of refining one work item.
///
/// Only `Ok` carries data; the error variants are a bare discriminant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkExecResult {
    Ok(ByteSequence),
    OutOfGas,
    Panic,
    BadExports,
    ReportOversize,
    BadCode,
    CodeOversize,
}

impl WorkExecResult {
    pub fn discriminant(&self) -> u8 {
        match self {
            Self::Ok(_) => 0,
            Self::OutOfGas => 1,
            Self::Panic => 2,
            Self::BadExports => 3,
            Self::ReportOversize => 4,
            Self::BadCode => 5,
            Self::CodeOversize => 6,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

impl Default for WorkExecResult {
    fn default() -> Self {
        Self::Ok(ByteSequence::default())
    }
}

impl Encode for WorkExecResult {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        sink.write_byte(self.discriminant());
        match self {
            Self::Ok(output) => output.encode_to(sink),
            _ => Ok(()),
        }
    }
}

impl Decode for WorkExecResult {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        Ok(match cursor.read_byte()? {
            0 => Self::Ok(ByteSequence::decode_from(cursor)?),
            1 => Self::OutOfGas,
            2 => Self::Panic,
            3 => Self::BadExports,
            4 => Self::ReportOversize,
            5 => Self::BadCode,
            6 => Self::CodeOversize,
            value => return Err(invalid_discriminant("WorkExecResult", value)),
        })
    }
}

compact_record!(
    /// Resources consumed while refining a work item.
    RefineLoad {
        gas_used,
        imports,
        extrinsic_count,
        extrinsic_size,
        exports,
    }
);

/// Result of one work item as reported on chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkResult {
    pub service_id: ServiceId,
    pub code_hash: CodeHash,
    pub payload_hash: OpaqueHash,
    pub accumulate_gas: Gas,
    pub result: WorkExecResult,
    pub refine_load: RefineLoad,
}

codec_struct!(WorkResult {
    service_id,
    code_hash,
    payload_hash,
    accumulate_gas,
    result,
    refine_load,
});

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkReport {
    pub package_spec: WorkPackageSpec,
    pub context: RefineContext,
    pub core_index: CoreIndex,
    pub authorizer_hash: AuthorizerHash,
    pub auth_output: ByteSequence,
    pub segment_root_lookup: Vec<SegmentRootLookupItem>,
    pub results: Vec<WorkResult>,
    /// Gas spent by the authorizer, written as a compact integer.
    pub auth_gas_used: Gas,
}

impl Encode for WorkReport {
    fn encode_to(&self, sink: &mut ByteSink<'_>) -> CodecResult<()> {
        self.package_spec.encode_to(sink)?;
        self.context.encode_to(sink)?;
        self.core_index.encode_to(sink)?;
        self.authorizer_hash.encode_to(sink)?;
        self.auth_output.encode_to(sink)?;
        self.segment_root_lookup.encode_to(sink)?;
        self.results.encode_to(sink)?;
        sink.write_uint(self.auth_gas_used);
        Ok(())
    }
}

impl Decode for WorkReport {
    fn decode_from(cursor: &mut ByteCursor<'_, '_>) -> CodecResult<Self> {
        Ok(Self {
            package_spec: Decode::decode_from(cursor)?,
            context: Decode::decode_from(cursor)?,
            core_index: Decode::decode_from(cursor)?,
            authorizer_hash: Decode::decode_from(cursor)?,
            auth_output: Decode::decode_from(cursor)?,
            segment_root_lookup: Decode::decode_from(cursor)?,
            results: Decode::decode_from(cursor)?,
            auth_gas_used: cursor.read_uint()?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorizer {
    pub code_hash: CodeHash,
    pub params: ByteSequence,
}

codec_struct!(Authorizer { code_hash, params });

/// Reference to an exported segment imported by a work item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    pub tree_root: OpaqueHash,
    pub index: u16,
}

codec_struct!(ImportSpec { tree_root, index });

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrinsicSpec {
    pub hash: OpaqueHash,
    pub len: u32,
}

codec_struct!(ExtrinsicSpec { hash, len });

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub service: ServiceId,
    pub code_hash: CodeHash,
    pub payload: ByteSequence,
    pub refine_gas_limit: Gas,
    pub accumulate_gas_limit: Gas,
    pub import_segments: Vec<ImportSpec>,
    pub extrinsic: Vec<ExtrinsicSpec>,
    pub export_count: u16,
}

codec_struct!(WorkItem {
    service,
    code_hash,
    payload,
    refine_gas_limit,
    accumulate_gas_limit,
    import_segments,
    extrinsic,
    export_count,
});

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPackage {
    pub authorization: ByteSequence,
    pub auth_code_host: ServiceId,
    pub authorizer: Authorizer,
    pub context: RefineContext,
    pub items: Vec<WorkItem>,
}

codec_struct!(WorkPackage {
    authorization,
    auth_code_host,
    authorizer,
    context,
    items,
});

/// Accumulation input derived from one work result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    pub hash: WorkPackageHash,
    pub exports_root: ExportsRoot,
    pub authorizer_hash: AuthorizerHash,
    pub auth_output: ByteSequence,
    pub payload_hash: OpaqueHash,
    pub gas_limit: Gas,
    pub result: WorkExecResult,
}

codec_struct!(Operand {
    hash,
    exports_root,
    authorizer_hash,
    auth_output,
    payload_hash,
    gas_limit,
    result,
});

/// Balance transfer scheduled during accumulation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredTransfer {
    pub sender: ServiceId,
    pub receiver: ServiceId,
    pub amount: u64,
    pub memo: TransferMemo,
    pub gas_limit: Gas,
}

codec_struct!(DeferredTransfer {
    sender,
    receiver,
    amount,
    memo,
    gas_limit,
});

pub type DeferredTransfers = Vec<DeferredTransfer>;
