use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Identifier format version tag.
const VERSION: u8 = 0x01;
/// Multicodec-style tag for the BLAKE3 hash function.
const HASH_ALGO: u8 = 0x1e;
/// Digest length in bytes.
const HASH_LEN: u8 = 0x20;

/// Content-type tag carried inside a [`BlockId`].
///
/// The tag distinguishes raw leaf bytes from serialized structural nodes, so
/// the same payload stored under both codecs yields two distinct identifiers
/// and a reader always knows how to interpret a block without side channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Codec {
    /// Raw leaf bytes (chunk payloads).
    Raw = 0x55,
    /// Serialized structured node (link lists, manifests).
    Node = 0x71,
}

impl Codec {
    /// Parse a codec from its wire tag.
    pub fn from_tag(tag: u8) -> Result<Self, TypeError> {
        match tag {
            0x55 => Ok(Self::Raw),
            0x71 => Ok(Self::Node),
            other => Err(TypeError::UnknownTag {
                field: "codec",
                tag: other,
            }),
        }
    }

    /// The wire tag for this codec.
    pub fn tag(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Node => write!(f, "node"),
        }
    }
}

/// Content-addressed identifier for a stored block.
///
/// A `BlockId` is the BLAKE3 hash of a block's bytes together with the codec
/// the bytes were written under. Identical `(codec, bytes)` inputs always
/// produce the same `BlockId`, making blocks deduplicatable and verifiable.
///
/// The canonical encoding is self-describing: a version tag, the codec tag,
/// the hash algorithm tag, the digest length, then the 32-byte digest.
/// Identifiers produced by a different hash function can never be confused
/// with these.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId {
    codec: Codec,
    hash: [u8; 32],
}

/// Length of the canonical byte encoding.
pub const ENCODED_LEN: usize = 4 + 32;

impl BlockId {
    /// Compute a `BlockId` by hashing raw bytes under a codec.
    pub fn new(codec: Codec, data: &[u8]) -> Self {
        Self {
            codec,
            hash: *blake3::hash(data).as_bytes(),
        }
    }

    /// Create a `BlockId` from a pre-computed digest.
    pub fn from_parts(codec: Codec, hash: [u8; 32]) -> Self {
        Self { codec, hash }
    }

    /// The codec this block was written under.
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// The raw 32-byte digest.
    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Canonical byte encoding: `[version, codec, hash-algo, hash-len, digest...]`.
    pub fn to_bytes(&self) -> [u8; ENCODED_LEN] {
        let mut out = [0u8; ENCODED_LEN];
        out[0] = VERSION;
        out[1] = self.codec.tag();
        out[2] = HASH_ALGO;
        out[3] = HASH_LEN;
        out[4..].copy_from_slice(&self.hash);
        out
    }

    /// Decode from the canonical byte encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        if bytes.len() != ENCODED_LEN {
            return Err(TypeError::InvalidLength {
                expected: ENCODED_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[0] != VERSION {
            return Err(TypeError::UnknownTag {
                field: "version",
                tag: bytes[0],
            });
        }
        let codec = Codec::from_tag(bytes[1])?;
        if bytes[2] != HASH_ALGO {
            return Err(TypeError::UnknownTag {
                field: "hash algorithm",
                tag: bytes[2],
            });
        }
        if bytes[3] != HASH_LEN {
            return Err(TypeError::UnknownTag {
                field: "hash length",
                tag: bytes[3],
            });
        }
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[4..]);
        Ok(Self { codec, hash })
    }

    /// Canonical string encoding: lowercase hex of [`Self::to_bytes`].
    ///
    /// This string is the block's filename in the filesystem store.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Short form for logs (first 8 hex characters of the digest).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.hash[..4])
    }
}

impl FromStr for BlockId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({}:{})", self.codec, self.short_hex())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// Serialized as the canonical string so identifiers embedded in stored
// documents are self-describing and greppable.
impl Serialize for BlockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
