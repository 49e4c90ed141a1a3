/// Errors from the ingestion pipeline.
///
/// `Registry` and `Stream` failures are fatal only to the version being
/// ingested: already-written blocks stay valid, the version's manifest
/// entries are left unset, and the run continues. Everything else aborts
/// the run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Provider failure: manifest resolution or stream open.
    #[error("registry error: {0}")]
    Registry(#[from] drift_manifest::RegistryError),

    /// The payload stream failed mid-read.
    #[error("stream error for {url}: {source}")]
    Stream {
        url: String,
        source: std::io::Error,
    },

    /// DAG assembly or block persistence failed.
    #[error("dag error: {0}")]
    Dag(#[from] drift_dag::DagError),

    /// A derived manifest could not be stored.
    #[error("manifest error: {0}")]
    Manifest(#[from] drift_manifest::ManifestError),
}

impl IngestError {
    /// Returns `true` for failures contained to a single version.
    pub fn is_per_version(&self) -> bool {
        matches!(self, Self::Registry(_) | Self::Stream { .. })
    }
}

/// Result alias for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;
