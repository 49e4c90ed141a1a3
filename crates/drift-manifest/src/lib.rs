//! Package manifests for drift.
//!
//! Models the registry's versioned package manifest, the derived manifest
//! in which each version's download reference is replaced by a DAG root and
//! byte size, and the opaque registry provider the pipeline consumes.
//!
//! Version order is the registry's insertion order and is preserved
//! end-to-end: the dedup analyzer diffs adjacent versions sequentially.

pub mod builder;
pub mod error;
pub mod manifest;
pub mod registry;

pub use builder::{build_dedup_manifest, load_manifest, store_manifest};
pub use error::{ManifestError, ManifestResult, RegistryError, RegistryResult};
pub use manifest::{
    DedupDist, DedupManifest, DedupVersion, Dist, PackageManifest, Strategy, VersionEntry,
};
pub use registry::{DirRegistry, RegistryProvider, StaticRegistry, VersionStream};
