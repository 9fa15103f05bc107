// src/main.rs
//
// Fixture conversion tool built on the codec library:
//
// - `encode`: JSON test vector -> canonical bytes (printed as 0x-hex)
// - `decode`: canonical bytes (raw or 0x-hex) -> pretty JSON
//
// Parameter-sized arrays follow `--params` (tiny, full, or a JSON config).

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt, reload};

use jam_codec::types::bytes::{from_hex, to_hex};
use jam_codec::{
    AssurancesExtrinsic, Block, CodecConfig, Decode, DisputesExtrinsic, Encode, Extrinsic,
    GuaranteesExtrinsic, Header, PreimagesExtrinsic, ProtocolParameters, State, Statistics,
    TicketsExtrinsic, WorkPackage, WorkReport, decode, encode,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert JAM protocol objects between JSON and canonical binary"
)]
struct Cli {
    /// Parameter preset (`tiny`, `full`) or path to a JSON node config.
    #[arg(long, global = true, default_value = "full")]
    params: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a JSON value and print its binary form as 0x-hex
    Encode { kind: Kind, input: PathBuf },
    /// Decode a binary or 0x-hex file and print the value as JSON
    Decode { kind: Kind, input: PathBuf },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Header,
    Block,
    Extrinsic,
    WorkReport,
    WorkPackage,
    Statistics,
    State,
    TicketsExtrinsic,
    GuaranteesExtrinsic,
    AssurancesExtrinsic,
    DisputesExtrinsic,
    PreimagesExtrinsic,
}

/// Calls `$f::<T>($args)` with `T` chosen by `$kind`.
macro_rules! with_kind {
    ($kind:expr, $f:ident($($arg:expr),*)) => {
        match $kind {
            Kind::Header => $f::<Header>($($arg),*),
            Kind::Block => $f::<Block>($($arg),*),
            Kind::Extrinsic => $f::<Extrinsic>($($arg),*),
            Kind::WorkReport => $f::<WorkReport>($($arg),*),
            Kind::WorkPackage => $f::<WorkPackage>($($arg),*),
            Kind::Statistics => $f::<Statistics>($($arg),*),
            Kind::State => $f::<State>($($arg),*),
            Kind::TicketsExtrinsic => $f::<TicketsExtrinsic>($($arg),*),
            Kind::GuaranteesExtrinsic => $f::<GuaranteesExtrinsic>($($arg),*),
            Kind::AssurancesExtrinsic => $f::<AssurancesExtrinsic>($($arg),*),
            Kind::DisputesExtrinsic => $f::<DisputesExtrinsic>($($arg),*),
            Kind::PreimagesExtrinsic => $f::<PreimagesExtrinsic>($($arg),*),
        }
    };
}

fn main() {
    let cli = Cli::parse();
    let env_filter = std::env::var("RUST_LOG").ok();

    // Installed before the config is read so its warnings are not lost; the
    // configured level is applied once the config is known.
    let (filter, filter_handle) = reload::Layer::new(log_filter(env_filter.as_deref(), "info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = match CodecConfig::from_preset_or_file(&cli.params) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("fatal error: {e}");
            std::process::exit(1);
        }
    };

    let configured = log_filter(env_filter.as_deref(), &cfg.log.level);
    if let Err(e) = filter_handle.reload(configured) {
        eprintln!("failed to apply log level: {e}");
    }

    if let Err(e) = run(cli.cmd, &cfg.params) {
        eprintln!("fatal error: {e}");
        std::process::exit(1);
    }
}

fn run(cmd: Command, params: &ProtocolParameters) -> Result<(), String> {
    tracing::debug!(
        validators = params.validators_count,
        cores = params.cores_count,
        epoch_length = params.epoch_length,
        "using protocol parameters"
    );

    match cmd {
        // ---------------------------
        // JSON -> binary
        // ---------------------------
        Command::Encode { kind, input } => {
            let text = std::fs::read_to_string(&input)
                .map_err(|e| format!("failed to read {}: {e}", input.display()))?;
            let bytes = with_kind!(kind, encode_json(&text, params))?;
            tracing::info!(?kind, len = bytes.len(), "encoded");
            println!("{}", to_hex(&bytes));
        }

        // ---------------------------
        // binary -> JSON
        // ---------------------------
        Command::Decode { kind, input } => {
            let bytes = read_binary(&input)?;
            let json = with_kind!(kind, decode_json(&bytes, params))?;
            tracing::info!(?kind, len = bytes.len(), "decoded");
            println!("{json}");
        }
    }

    Ok(())
}

fn encode_json<T>(text: &str, params: &ProtocolParameters) -> Result<Vec<u8>, String>
where
    T: DeserializeOwned + Encode,
{
    let value: T = serde_json::from_str(text).map_err(|e| format!("invalid JSON input: {e}"))?;
    encode(&value, params).map_err(|e| format!("encode failed: {e}"))
}

fn decode_json<T>(bytes: &[u8], params: &ProtocolParameters) -> Result<String, String>
where
    T: Decode + Serialize,
{
    let value: T = decode(bytes, params).map_err(|e| format!("decode failed: {e}"))?;
    serde_json::to_string_pretty(&value).map_err(|e| format!("failed to render JSON: {e}"))
}

/// `RUST_LOG` wins when set; otherwise only this crate logs, at `level`.
fn log_filter(env: Option<&str>, level: &str) -> EnvFilter {
    match env {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(format!("jam_codec={level}")),
    }
}

/// Reads a fixture file, accepting either raw bytes or `0x`-prefixed hex text.
fn read_binary(path: &Path) -> Result<Vec<u8>, String> {
    let raw = std::fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    match std::str::from_utf8(&raw) {
        Ok(text) if text.trim_start().starts_with("0x") => {
            from_hex(text).map_err(|e| format!("invalid hex in {}: {e}", path.display()))
        }
        _ => Ok(raw),
    }
}
