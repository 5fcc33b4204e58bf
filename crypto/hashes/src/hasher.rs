use sha2::{Digest, Sha256};

/// Compute SHA256(SHA256(data))
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    second.into()
}

/// Incremental SHA-256 over data fed in pieces
#[derive(Clone)]
pub struct HashWriter(Sha256);

impl HashWriter {
    pub fn new() -> Self {
        Self(Sha256::new())
    }

    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    /// Single SHA-256 of everything written so far.
    pub fn finalize(self) -> [u8; 32] {
        self.0.finalize().into()
    }

    /// SHA-256 applied a second time over the single-round digest.
    pub fn finalize_double(self) -> [u8; 32] {
        Sha256::digest(self.0.finalize()).into()
    }
}

impl Default for HashWriter {
    fn default() -> Self {
        Self::new()
    }
}
