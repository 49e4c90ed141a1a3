/// Errors from manifest persistence.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Block store operation failed.
    #[error("store error: {0}")]
    Store(#[from] drift_store::StoreError),

    /// A stored manifest document failed to encode or decode. On decode
    /// this signals store or codec corruption.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Errors from the registry provider.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The provider could not deliver the requested stream.
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The named package is unknown to the provider.
    #[error("package not found: {0}")]
    NotFound(String),

    /// The provider returned a manifest that does not parse.
    #[error("malformed registry manifest: {0}")]
    Malformed(String),
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
