//! Proof-of-work rules
//!
//! [`difficulty`] computes the target a block at a given chain position must
//! meet; [`check_proof_of_work`] verifies a block hash against claimed bits.

pub mod difficulty;

pub use difficulty::{get_work_required, DifficultyError};

use crypto_hashes::Hash;
use pow_math::{CompactTarget, MathError, Target};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PowError {
    #[error("invalid compact target: {0}")]
    InvalidBits(#[from] MathError),

    #[error("compact target {0:#010x} decodes to zero")]
    ZeroTarget(u32),

    #[error("target {bits:#010x} is easier than the network limit")]
    AboveLimit { bits: u32 },

    #[error("hash {hash} does not meet target {bits:#010x}")]
    HashAboveTarget { hash: Hash, bits: u32 },
}

/// Decodes `bits` and checks it is a usable target no easier than `pow_limit`.
pub fn target_from_bits(bits: u32, pow_limit: Target) -> Result<Target, PowError> {
    let target = CompactTarget::decode(bits).into_target(bits)?;
    if target.is_zero() {
        return Err(PowError::ZeroTarget(bits));
    }
    if target > pow_limit {
        return Err(PowError::AboveLimit { bits });
    }
    Ok(target)
}

/// The hash, read as a little-endian integer, must not exceed the target.
pub fn check_proof_of_work(hash: &Hash, bits: u32, pow_limit: Target) -> Result<(), PowError> {
    let target = target_from_bits(bits, pow_limit)?;
    if Target::from_hash_bytes(hash.as_bytes()) > target {
        return Err(PowError::HashAboveTarget { hash: *hash, bits });
    }
    Ok(())
}

/// Boolean form of [`check_proof_of_work`] for search loops.
#[inline]
pub fn meets_target(hash: &Hash, bits: u32, pow_limit: Target) -> bool {
    check_proof_of_work(hash, bits, pow_limit).is_ok()
}
