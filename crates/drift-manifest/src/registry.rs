//! The registry provider interface.
//!
//! The registry is an external collaborator: something that resolves a
//! package name to a versioned manifest and a download reference to a byte
//! stream. The pipeline only depends on this trait; transport, archive
//! format, and decompression are the provider's business.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::error::{RegistryError, RegistryResult};
use crate::manifest::PackageManifest;

/// An open byte stream for one version's payload.
pub struct VersionStream {
    /// The payload bytes.
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
    /// Content length declared by the provider, when known.
    pub declared_len: Option<u64>,
}

impl std::fmt::Debug for VersionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionStream")
            .field("reader", &"<dyn AsyncRead>")
            .field("declared_len", &self.declared_len)
            .finish()
    }
}

/// Opaque source of package manifests and version payload streams.
#[async_trait]
pub trait RegistryProvider: Send + Sync {
    /// Resolve a package name to its versioned manifest.
    async fn manifest(&self, name: &str) -> RegistryResult<PackageManifest>;

    /// Open the payload stream behind a download reference.
    async fn fetch(&self, url: &str) -> RegistryResult<VersionStream>;
}

/// Directory-backed provider: `{root}/{name}/manifest.json` describes the
/// package and download references are file names relative to the package
/// directory. This is the CLI's provider.
pub struct DirRegistry {
    root: PathBuf,
}

impl DirRegistry {
    /// Create a provider rooted at the given directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl RegistryProvider for DirRegistry {
    async fn manifest(&self, name: &str) -> RegistryResult<PackageManifest> {
        let path = self.root.join(name).join("manifest.json");
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RegistryError::NotFound(name.to_string()));
            }
            Err(e) => {
                return Err(RegistryError::Fetch {
                    url: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };
        serde_json::from_slice(&data).map_err(|e| RegistryError::Malformed(e.to_string()))
    }

    async fn fetch(&self, url: &str) -> RegistryResult<VersionStream> {
        let path = self.root.join(url);
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| RegistryError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        let declared_len = file.metadata().await.ok().map(|m| m.len());
        Ok(VersionStream {
            reader: Box::new(file),
            declared_len,
        })
    }
}

/// In-memory provider for tests and embedding.
///
/// Holds manifests and payload bodies directly; unknown urls can be
/// registered as failing to exercise per-version error containment.
#[derive(Default)]
pub struct StaticRegistry {
    manifests: HashMap<String, PackageManifest>,
    bodies: HashMap<String, Bytes>,
}

impl StaticRegistry {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package manifest.
    pub fn insert_manifest(&mut self, manifest: PackageManifest) {
        self.manifests.insert(manifest.name.clone(), manifest);
    }

    /// Register a payload body under a download reference.
    pub fn insert_body(&mut self, url: impl Into<String>, body: impl Into<Bytes>) {
        self.bodies.insert(url.into(), body.into());
    }
}

#[async_trait]
impl RegistryProvider for StaticRegistry {
    async fn manifest(&self, name: &str) -> RegistryResult<PackageManifest> {
        self.manifests
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    async fn fetch(&self, url: &str) -> RegistryResult<VersionStream> {
        let body = self.bodies.get(url).ok_or_else(|| RegistryError::Fetch {
            url: url.to_string(),
            reason: "no such body".to_string(),
        })?;
        Ok(VersionStream {
            declared_len: Some(body.len() as u64),
            reader: Box::new(std::io::Cursor::new(body.to_vec())),
        })
    }
}
