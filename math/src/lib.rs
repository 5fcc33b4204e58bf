//! Target arithmetic for proof-of-work difficulty.
//!
//! A [`Target`] is a 256-bit unsigned threshold. On the wire it travels in the
//! compact "bits" form: one exponent byte followed by a 23-bit mantissa and a
//! sign bit. Retargeting scales a target by a timespan ratio, which can exceed
//! 256 bits before it is clamped, so scaling goes through [`WideTarget`].

use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sign bit of the compact mantissa.
const COMPACT_SIGN_BIT: u32 = 0x0080_0000;
/// Mantissa mask of the compact form.
const COMPACT_MANTISSA: u32 = 0x007f_ffff;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("compact target {0:#010x} has the sign bit set")]
    NegativeTarget(u32),

    #[error("compact target {0:#010x} does not fit in 256 bits")]
    OverflowTarget(u32),

    #[error("division by zero while scaling target")]
    ZeroDenominator,
}

pub type MathResult<T> = Result<T, MathError>;

/// Target represents the difficulty threshold for valid blocks
#[derive(Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Target(U256);

impl Target {
    /// Creates a new Target from a U256 value
    pub const fn new(value: U256) -> Self {
        Target(value)
    }

    /// Decodes compact bits, ignoring the sign and overflow flags.
    ///
    /// Use [`CompactTarget::decode`] when the flags matter.
    pub fn from_compact(bits: u32) -> Self {
        CompactTarget::decode(bits).target
    }

    /// Encodes the target in compact form, truncating the mantissa to its three
    /// most significant bytes.
    pub fn to_compact(&self) -> u32 {
        let mut size = (self.0.bits() + 7) / 8;
        let mut compact = if size <= 3 {
            (self.0.low_u64() << (8 * (3 - size))) as u32
        } else {
            (self.0 >> (8 * (size - 3))).low_u64() as u32
        };

        // The mantissa is signed; keep the top bit clear by moving one byte up.
        if compact & COMPACT_SIGN_BIT != 0 {
            compact >>= 8;
            size += 1;
        }

        compact | ((size as u32) << 24)
    }

    /// Reads a 32-byte hash as a little-endian integer.
    pub fn from_hash_bytes(bytes: &[u8; 32]) -> Self {
        Target(U256::from_little_endian(bytes))
    }

    /// Returns the inner U256 value
    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Computes `self * numerator / denominator` without losing high bits.
    ///
    /// Multiplication happens before division, so the result is the floor of
    /// the exact rational value.
    pub fn scaled(&self, numerator: u64, denominator: u64) -> MathResult<WideTarget> {
        if denominator == 0 {
            return Err(MathError::ZeroDenominator);
        }
        let product: U512 = self.0.full_mul(U256::from(numerator));
        Ok(WideTarget(product / U512::from(denominator)))
    }
}

impl From<U256> for Target {
    fn from(value: U256) -> Self {
        Target(value)
    }
}

impl From<Target> for U256 {
    fn from(target: Target) -> Self {
        target.0
    }
}

impl From<u64> for Target {
    fn from(value: u64) -> Self {
        Target(U256::from(value))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:064x}", self.0)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({:#010x})", self.to_compact())
    }
}

/// Result of decoding compact bits, with the flags a validator needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompactTarget {
    pub target: Target,
    pub negative: bool,
    pub overflow: bool,
}

impl CompactTarget {
    pub fn decode(bits: u32) -> Self {
        let size = bits >> 24;
        let mut word = bits & COMPACT_MANTISSA;

        let value = if size <= 3 {
            word >>= 8 * (3 - size);
            U256::from(word)
        } else if size - 3 < 32 {
            U256::from(word) << (8 * (size - 3) as usize)
        } else {
            U256::zero()
        };

        let negative = word != 0 && bits & COMPACT_SIGN_BIT != 0;
        let overflow = word != 0
            && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));

        Self { target: Target(value), negative, overflow }
    }

    /// The decoded target, rejecting negative and overflowing encodings.
    pub fn into_target(self, bits: u32) -> MathResult<Target> {
        if self.negative {
            return Err(MathError::NegativeTarget(bits));
        }
        if self.overflow {
            return Err(MathError::OverflowTarget(bits));
        }
        Ok(self.target)
    }
}

/// A 512-bit intermediate produced by [`Target::scaled`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct WideTarget(U512);

impl WideTarget {
    pub fn as_u512(&self) -> U512 {
        self.0
    }

    /// Narrows to a [`Target`], or `None` if the value needs more than 256 bits.
    pub fn narrow(&self) -> Option<Target> {
        if self.0.bits() > 256 {
            return None;
        }
        let mut bytes = [0u8; 64];
        self.0.to_little_endian(&mut bytes);
        Some(Target(U256::from_little_endian(&bytes[..32])))
    }

    /// Returns `limit` if this value is above it, otherwise the value itself.
    pub fn clamp_to(&self, limit: Target) -> Target {
        if *self > WideTarget::from(limit) {
            return limit;
        }
        // Bounded by a 256-bit limit, so narrowing cannot fail.
        self.narrow().unwrap_or(limit)
    }
}

impl From<Target> for WideTarget {
    fn from(target: Target) -> Self {
        let mut bytes = [0u8; 32];
        target.0.to_little_endian(&mut bytes);
        WideTarget(U512::from_little_endian(&bytes))
    }
}
