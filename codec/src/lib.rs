//! Canonical binary codec for the JAM protocol.
//!
//! Every node must turn headers, extrinsics, work reports and state into the
//! exact same bytes, because those bytes are hashed, signed and compared.
//! This crate provides:
//!
//! - the compact integer scheme and fixed-width integers (`codec::compact`),
//! - single-pass byte framing (`codec::ByteSink`, `codec::ByteCursor`),
//! - sequences, maps, optionals and tagged unions (`codec::collections`,
//!   `codec::option`),
//! - the protocol parameter context (`params`),
//! - every protocol type with its field order (`types`),
//! - and configuration for tooling built on top (`config`).
//!
//! ```
//! use jam_codec::{Header, ProtocolParameters, decode, encode};
//!
//! let params = ProtocolParameters::tiny();
//! let header = Header { slot: 99, ..Header::default() };
//! let bytes = encode(&header, &params)?;
//! assert_eq!(decode::<Header>(&bytes, &params)?, header);
//! # Ok::<(), jam_codec::CodecError>(())
//! ```

pub mod codec;
pub mod config;
pub mod params;
pub mod types;

// Re-export the codec entry points.
pub use codec::{
    ByteCursor, ByteSink, CodecError, CodecResult, Decode, Encode, decode, decode_prefix, encode,
};

// Re-export configuration.
pub use config::{CodecConfig, ConfigError, LogConfig};
pub use params::{ParamsError, ProtocolParameters};

// Re-export protocol types at the crate root for convenience.
pub use types::*;
