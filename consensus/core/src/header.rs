use crate::Hash;
use pow_math::Target;
use serde::{Deserialize, Serialize};

/// Block header. The consensus encoding is the fixed 80-byte layout produced
/// by [`Header::to_bytes`]; the block hash is SHA256d over it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub version: u32,
    pub hash_prev_block: Hash,
    pub hash_merkle_root: Hash,
    /// Seconds since the unix epoch
    pub time: u32,
    /// Compact difficulty target
    pub bits: u32,
    pub nonce: u32,
}

impl Header {
    pub const SERIALIZED_SIZE: usize = 80;

    pub fn new(
        version: u32,
        hash_prev_block: Hash,
        hash_merkle_root: Hash,
        time: u32,
        bits: u32,
        nonce: u32,
    ) -> Self {
        Self { version, hash_prev_block, hash_merkle_root, time, bits, nonce }
    }

    /// version || prev || merkle || time || bits || nonce, integers little-endian
    pub fn to_bytes(&self) -> [u8; Self::SERIALIZED_SIZE] {
        let mut out = [0u8; Self::SERIALIZED_SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(self.hash_prev_block.as_bytes());
        out[36..68].copy_from_slice(self.hash_merkle_root.as_bytes());
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    pub fn hash(&self) -> Hash {
        Hash::double_sha256(&self.to_bytes())
    }

    /// The target encoded in `bits`, ignoring sign and overflow flags.
    pub fn target(&self) -> Target {
        Target::from_compact(self.bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ZERO_HASH;

    fn header(nonce: u32) -> Header {
        Header::new(1, ZERO_HASH, Hash::from_le_u64([9, 0, 0, 0]), 1_296_688_602, 0x207f_ffff, nonce)
    }

    #[test]
    fn serialization_layout() {
        let bytes = header(0x0102_0304).to_bytes();
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(bytes[36], 9);
        assert_eq!(&bytes[72..76], &0x207f_ffffu32.to_le_bytes());
        assert_eq!(&bytes[76..80], &[4, 3, 2, 1]);
    }

    #[test]
    fn nonce_changes_hash() {
        assert_ne!(header(0).hash(), header(1).hash());
        assert_eq!(header(5).hash(), header(5).hash());
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&header(0)).unwrap();
        assert!(json.contains("hashPrevBlock"));
    }
}
