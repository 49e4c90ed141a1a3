//! Ingestion pipeline for drift.
//!
//! For each version of a package, fetches the payload stream once and runs
//! it through both chunking strategies in parallel lanes, writing leaf
//! blocks as boundaries appear. Produces two derived manifests (one per
//! strategy) from the same immutable base, with failed versions contained
//! per version rather than aborting the run.

pub mod error;
pub mod pipeline;

pub use error::{IngestError, IngestResult};
pub use pipeline::{IngestConfig, IngestOutcome, Ingestor};
