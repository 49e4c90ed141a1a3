//! Dedup analysis for drift.
//!
//! Recovers each version's DAG link set from the block store, diffs
//! adjacent versions in manifest order, and aggregates the deltas into a
//! per-strategy report so fixed-size and content-defined ingestion of the
//! same corpus can be compared side by side.

pub mod delta;
pub mod error;
pub mod report;

pub use delta::new_links;
pub use error::{AnalyzeError, AnalyzeResult};
pub use report::{analyze_manifest, compare, Comparison, StrategyReport, VersionDelta};
