use drift_types::BlockId;
use serde::{Deserialize, Serialize};

/// Chunking strategy a derived manifest was produced with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Positional fixed-size chunking.
    Fixed,
    /// Content-defined (gear) chunking.
    Gear,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Gear => write!(f, "gear"),
        }
    }
}

/// Distribution descriptor as the registry reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dist {
    /// Download reference for the version's payload.
    pub url: String,
    /// Declared payload length, when the registry reports one.
    #[serde(default)]
    pub declared_size: Option<u64>,
}

/// One version of a package as the registry reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: String,
    pub dist: Dist,
}

/// A package's versioned manifest from the registry.
///
/// Versions are kept in a `Vec` so the registry's insertion order survives
/// serialization; sequential dedup analysis depends on that order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub versions: Vec<VersionEntry>,
}

impl PackageManifest {
    /// Look up a version entry by label.
    pub fn get(&self, version: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Number of versions.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns `true` if the manifest lists no versions.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Distribution descriptor after ingestion: the download reference is
/// replaced by the stream's DAG root and byte size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupDist {
    pub root: BlockId,
    pub size: u64,
}

/// One version in a derived manifest.
///
/// `dist` is `None` when the version's ingestion failed; the entry is left
/// unset and later analysis skips it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupVersion {
    pub version: String,
    pub dist: Option<DedupDist>,
}

/// Derived manifest: mirrors the registry manifest's shape with content
/// addresses in place of download references. Stored as a `Node` block;
/// its identifier is the externally reported result of an ingestion run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupManifest {
    pub name: String,
    pub strategy: Strategy,
    pub versions: Vec<DedupVersion>,
}

impl DedupManifest {
    /// Versions that were successfully ingested, in manifest order.
    pub fn ingested(&self) -> impl Iterator<Item = (&str, &DedupDist)> {
        self.versions
            .iter()
            .filter_map(|v| v.dist.as_ref().map(|d| (v.version.as_str(), d)))
    }
}

#[cfg(test)]
mod tests {
    use drift_types::Codec;

    use super::*;

    fn manifest() -> PackageManifest {
        PackageManifest {
            name: "demo".into(),
            versions: vec![
                VersionEntry {
                    version: "1.0.0".into(),
                    dist: Dist {
                        url: "demo-1.0.0.bin".into(),
                        declared_size: Some(10),
                    },
                },
                VersionEntry {
                    version: "0.9.0".into(),
                    dist: Dist {
                        url: "demo-0.9.0.bin".into(),
                        declared_size: None,
                    },
                },
            ],
        }
    }

    #[test]
    fn version_order_survives_serde() {
        // Deliberately non-sorted labels: order must be positional.
        let m = manifest();
        let json = serde_json::to_string(&m).unwrap();
        let back: PackageManifest = serde_json::from_str(&json).unwrap();
        let labels: Vec<&str> = back.versions.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(labels, vec!["1.0.0", "0.9.0"]);
    }

    #[test]
    fn get_finds_by_label() {
        let m = manifest();
        assert_eq!(m.get("0.9.0").unwrap().dist.url, "demo-0.9.0.bin");
        assert!(m.get("2.0.0").is_none());
    }

    #[test]
    fn missing_declared_size_defaults_to_none() {
        let json = r#"{"name":"p","versions":[{"version":"1","dist":{"url":"u"}}]}"#;
        let m: PackageManifest = serde_json::from_str(json).unwrap();
        assert_eq!(m.versions[0].dist.declared_size, None);
    }

    #[test]
    fn ingested_skips_unset_entries() {
        let root = BlockId::new(Codec::Raw, b"leaf");
        let m = DedupManifest {
            name: "demo".into(),
            strategy: Strategy::Gear,
            versions: vec![
                DedupVersion {
                    version: "1".into(),
                    dist: Some(DedupDist { root, size: 4 }),
                },
                DedupVersion {
                    version: "2".into(),
                    dist: None,
                },
            ],
        };
        let ingested: Vec<&str> = m.ingested().map(|(v, _)| v).collect();
        assert_eq!(ingested, vec!["1"]);
    }

    #[test]
    fn strategy_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Strategy::Fixed).unwrap(), "\"fixed\"");
        assert_eq!(serde_json::to_string(&Strategy::Gear).unwrap(), "\"gear\"");
    }
}
