use bytes::Bytes;
use drift_types::{BlockId, Codec};

/// A content-addressed block: identifier + raw bytes.
///
/// `Block` is the unit of storage. It is created only by hashing bytes under
/// a codec and is never mutated after creation; holders share the payload
/// through [`Bytes`] without copying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    data: Bytes,
}

impl Block {
    /// Create a block by hashing `data` under `codec`.
    pub fn new(codec: Codec, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            id: BlockId::new(codec, &data),
            data,
        }
    }

    /// The block's content-addressed identifier.
    pub fn id(&self) -> &BlockId {
        &self.id
    }

    /// The raw bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Payload length in bytes.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns `true` for a zero-length payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_matches_content() {
        let block = Block::new(Codec::Raw, &b"hello"[..]);
        assert_eq!(*block.id(), BlockId::new(Codec::Raw, b"hello"));
        assert_eq!(block.len(), 5);
    }

    #[test]
    fn identical_bytes_identical_blocks() {
        let a = Block::new(Codec::Raw, &b"same"[..]);
        let b = Block::new(Codec::Raw, &b"same"[..]);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_block_has_an_id() {
        let block = Block::new(Codec::Raw, Bytes::new());
        assert!(block.is_empty());
        assert_eq!(*block.id(), BlockId::new(Codec::Raw, b""));
    }
}
