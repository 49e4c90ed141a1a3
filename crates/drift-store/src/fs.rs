//! Filesystem-backed block store.
//!
//! Stores one file per block in a flat directory: the filename is the
//! identifier's canonical string encoding and the file contents are the raw
//! block bytes.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use drift_types::BlockId;
use tracing::debug;

use crate::block::Block;
use crate::error::{StoreError, StoreResult};
use crate::traits::BlockStore;

/// File-based block store with one file per block.
///
/// Writes are atomic: data is written to a temporary file first, then
/// renamed into place, so a half-written block is never observable under
/// its final name. Reads re-hash the bytes and fail on mismatch, so a
/// corrupted file is surfaced instead of silently returned.
pub struct FsBlockStore {
    base_dir: PathBuf,
}

impl FsBlockStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new(base_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// The directory blocks are stored under.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn block_path(&self, id: &BlockId) -> PathBuf {
        self.base_dir.join(id.to_hex())
    }

    /// Return all block ids present on disk, sorted.
    ///
    /// Files whose names do not parse as identifiers are reported as
    /// [`StoreError::InvalidKey`] rather than skipped.
    pub fn all_ids(&self) -> StoreResult<Vec<BlockId>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let id = name.parse().map_err(|source| StoreError::InvalidKey {
                name: name.clone(),
                source,
            })?;
            ids.push(id);
        }
        ids.sort();
        Ok(ids)
    }
}

impl BlockStore for FsBlockStore {
    fn put(&self, block: &Block) -> StoreResult<BlockId> {
        let id = *block.id();
        let path = self.block_path(&id);

        // Idempotent: an existing file already holds identical bytes by
        // construction, so skip the write entirely.
        if path.exists() {
            return Ok(id);
        }

        // Atomic write: temp file in the same directory, then rename.
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, block.data())?;
        std::fs::rename(&tmp_path, &path)?;

        debug!(%id, size = block.len(), "stored block");
        Ok(id)
    }

    fn get(&self, id: &BlockId) -> StoreResult<Bytes> {
        let path = self.block_path(id);
        match std::fs::read(&path) {
            Ok(data) => {
                // Verify-on-read: re-hash and compare to the identifier.
                let computed = BlockId::new(id.codec(), &data);
                if computed != *id {
                    return Err(StoreError::HashMismatch {
                        expected: *id,
                        computed,
                    });
                }
                Ok(Bytes::from(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(*id)),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn exists(&self, id: &BlockId) -> StoreResult<bool> {
        Ok(self.block_path(id).exists())
    }
}

impl std::fmt::Debug for FsBlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlockStore")
            .field("base_dir", &self.base_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_types::Codec;

    fn raw(content: &[u8]) -> Block {
        Block::new(Codec::Raw, content.to_vec())
    }

    #[test]
    fn put_and_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlockStore::new(dir.path()).unwrap();

        let block = raw(b"on disk");
        let id = store.put(&block).unwrap();
        assert_eq!(&store.get(&id).unwrap()[..], b"on disk");
    }

    #[test]
    fn filename_is_canonical_id_string() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlockStore::new(dir.path()).unwrap();

        let id = store.put(&raw(b"named")).unwrap();
        assert!(dir.path().join(id.to_hex()).is_file());
    }

    #[test]
    fn get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlockStore::new(dir.path()).unwrap();

        let id = BlockId::new(Codec::Raw, b"absent");
        assert!(matches!(
            store.get(&id).unwrap_err(),
            StoreError::NotFound(missing) if missing == id
        ));
    }

    #[test]
    fn put_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlockStore::new(dir.path()).unwrap();

        let block = raw(b"twice");
        let id1 = store.put(&block).unwrap();
        let id2 = store.put(&block).unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.all_ids().unwrap(), vec![id1]);
    }

    #[test]
    fn corrupt_file_fails_hash_check() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlockStore::new(dir.path()).unwrap();

        let id = store.put(&raw(b"pristine")).unwrap();
        std::fs::write(dir.path().join(id.to_hex()), b"tampered").unwrap();

        assert!(matches!(
            store.get(&id).unwrap_err(),
            StoreError::HashMismatch { expected, .. } if expected == id
        ));
    }

    #[test]
    fn no_tmp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlockStore::new(dir.path()).unwrap();
        store.put(&raw(b"clean")).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.unwrap().path().extension().map(|x| x.to_owned()))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn all_ids_lists_written_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlockStore::new(dir.path()).unwrap();

        let id1 = store.put(&raw(b"one")).unwrap();
        let id2 = store.put(&raw(b"two")).unwrap();

        let ids = store.all_ids().unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&id1));
        assert!(ids.contains(&id2));
    }

    #[test]
    fn all_ids_rejects_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlockStore::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("not-a-block"), b"junk").unwrap();

        assert!(matches!(
            store.all_ids().unwrap_err(),
            StoreError::InvalidKey { name, .. } if name == "not-a-block"
        ));
    }

    #[test]
    fn store_reopens_over_existing_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = FsBlockStore::new(dir.path()).unwrap();
            store.put(&raw(b"persistent")).unwrap()
        };

        let reopened = FsBlockStore::new(dir.path()).unwrap();
        assert_eq!(&reopened.get(&id).unwrap()[..], b"persistent");
    }
}
