//! Content-defined chunking with a Rabin-style rolling fingerprint.
//!
//! A gear table maps each byte value to a pseudo-random 64-bit constant; the
//! fingerprint is rolled as `fp = (fp << 1) + gear[byte]`, so a byte's
//! influence is fully shifted out after 64 positions. A boundary is declared
//! where the fingerprint matches the target bit pattern, bounded by minimum
//! and maximum chunk lengths to cap pathological inputs.
//!
//! Because the fingerprint depends only on a short trailing window, chunk
//! boundaries re-synchronize shortly after an edit: an insertion or deletion
//! invalidates the chunk(s) containing it and at most one neighbor, while
//! every other chunk in the stream keeps its identifier.

use std::sync::OnceLock;

use crate::cut::Chunker;
use crate::error::ChunkError;

/// Default minimum chunk length (512 KiB).
pub const DEFAULT_MIN_LEN: usize = 512 * 1024;

/// Default average chunk length (1 MiB).
pub const DEFAULT_AVG_LEN: usize = 1024 * 1024;

/// Default maximum chunk length (4 MiB).
pub const DEFAULT_MAX_LEN: usize = 4 * 1024 * 1024;

/// Seed for deriving the gear table.
///
/// The table is part of the persisted format: changing the seed changes
/// every boundary, and previously stored corpora stop deduplicating against
/// newly ingested data.
const GEAR_SEED: &[u8] = b"drift-gear-v1";

fn gear_table() -> &'static [u64; 256] {
    static TABLE: OnceLock<[u64; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0u64; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            let mut hasher = blake3::Hasher::new();
            hasher.update(GEAR_SEED);
            hasher.update(&[i as u8]);
            let digest = hasher.finalize();
            let mut word = [0u8; 8];
            word.copy_from_slice(&digest.as_bytes()[..8]);
            *slot = u64::from_le_bytes(word);
        }
        table
    })
}

/// Content-defined chunker with min/avg/max length bounds.
///
/// Scanning skips the first `min_len` bytes of each chunk, then rolls the
/// fingerprint until `fp & mask == 0` or `max_len` is reached, where `mask`
/// selects `log2(avg_len)` bits so qualifying positions arrive roughly every
/// `avg_len` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GearChunker {
    min_len: usize,
    avg_len: usize,
    max_len: usize,
    mask: u64,
}

impl GearChunker {
    /// Create a chunker with explicit bounds. Requires `0 < min <= avg <= max`.
    pub fn new(min_len: usize, avg_len: usize, max_len: usize) -> Result<Self, ChunkError> {
        if min_len == 0 {
            return Err(ChunkError::InvalidConfig {
                message: "minimum length must be non-zero",
            });
        }
        if min_len > avg_len {
            return Err(ChunkError::InvalidConfig {
                message: "minimum length cannot exceed average length",
            });
        }
        if avg_len > max_len {
            return Err(ChunkError::InvalidConfig {
                message: "average length cannot exceed maximum length",
            });
        }
        let bits = (avg_len as u64).ilog2();
        Ok(Self {
            min_len,
            avg_len,
            max_len,
            mask: (1u64 << bits) - 1,
        })
    }

    /// The configured minimum chunk length.
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// The configured average chunk length.
    pub fn avg_len(&self) -> usize {
        self.avg_len
    }
}

impl Default for GearChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LEN, DEFAULT_AVG_LEN, DEFAULT_MAX_LEN)
            .expect("default bounds are valid")
    }
}

impl Chunker for GearChunker {
    fn next_cut(&self, data: &[u8], eof: bool) -> Option<usize> {
        if data.is_empty() {
            return None;
        }
        if data.len() <= self.min_len {
            // Too short to scan: either the stream tail, or wait for more.
            return if data.len() >= self.max_len {
                Some(self.max_len)
            } else if eof {
                Some(data.len())
            } else {
                None
            };
        }

        let table = gear_table();
        let limit = data.len().min(self.max_len);
        let mut fp: u64 = 0;
        for (i, &byte) in data[self.min_len..limit].iter().enumerate() {
            fp = (fp << 1).wrapping_add(table[byte as usize]);
            if fp & self.mask == 0 {
                return Some(self.min_len + i + 1);
            }
        }
        if limit == self.max_len {
            Some(self.max_len)
        } else if eof {
            Some(data.len())
        } else {
            None
        }
    }

    fn max_len(&self) -> usize {
        self.max_len
    }
}
