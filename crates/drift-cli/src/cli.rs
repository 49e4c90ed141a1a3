use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use drift_chunk::{DEFAULT_AVG_LEN, DEFAULT_MAX_LEN, DEFAULT_MIN_LEN, DEFAULT_TARGET_LEN};

#[derive(Parser)]
#[command(
    name = "drift",
    about = "Content-addressed chunking and dedup analysis",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Block store directory
    #[arg(long, global = true, default_value = "blocks")]
    pub store: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest a package's versions with both chunking strategies
    Ingest(IngestArgs),
    /// Compare the dedup accounting of two stored manifests
    Compare(CompareArgs),
    /// Reconstruct a stream from its root identifier
    Restore(RestoreArgs),
}

#[derive(Args)]
pub struct IngestArgs {
    /// Package name to ingest
    pub package: String,

    /// Registry directory (contains <package>/manifest.json)
    #[arg(long)]
    pub registry: PathBuf,

    /// Fixed-strategy chunk length in bytes
    #[arg(long, default_value_t = DEFAULT_TARGET_LEN)]
    pub fixed_len: usize,

    /// Content-defined minimum chunk length in bytes
    #[arg(long, default_value_t = DEFAULT_MIN_LEN)]
    pub min_len: usize,

    /// Content-defined average chunk length in bytes
    #[arg(long, default_value_t = DEFAULT_AVG_LEN)]
    pub avg_len: usize,

    /// Content-defined maximum chunk length in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LEN)]
    pub max_len: usize,
}

#[derive(Args)]
pub struct CompareArgs {
    /// Root identifier of the fixed-strategy manifest
    pub fixed: String,
    /// Root identifier of the content-defined manifest
    pub gear: String,
}

#[derive(Args)]
pub struct RestoreArgs {
    /// Root identifier to reconstruct
    pub root: String,

    /// Output file path
    #[arg(short, long)]
    pub output: PathBuf,
}
