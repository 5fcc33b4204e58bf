//! Difficulty retargeting
//!
//! The target changes only at heights that are a multiple of the adjustment
//! interval. There the previous target is scaled by how long the last interval
//! actually took, with the ratio limited to a factor of four either way.
//! Between retargets the previous target carries over, except under the
//! testnet minimum-difficulty rule.

use consensus_core::{ChainAncestry, ChainedBlock, ConsensusParams};
use pow_math::{MathError, Target};
use std::sync::Arc;
use thiserror::Error;

/// Largest factor a single retarget may move the timespan by.
const MAX_RETARGET_FACTOR: i64 = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DifficultyError {
    /// The chain index has no block where the completed interval started.
    /// Signals a corrupt or truncated index; there is no safe fallback.
    #[error("no ancestor at height {anchor_height} to retarget block at height {height}")]
    MissingRetargetAnchor { height: u64, anchor_height: u64 },

    #[error("target arithmetic failed: {0}")]
    Math(#[from] MathError),
}

/// Computes the target `block` must meet.
///
/// `block` is usually a candidate linked to the current tip but not yet part of
/// any chain view. Lookups of older blocks go through `ancestry`.
pub fn get_work_required<A>(params: &ConsensusParams, block: &ChainedBlock, ancestry: &A) -> Result<Target, DifficultyError>
where
    A: ChainAncestry + ?Sized,
{
    let pow_limit = params.pow_limit;

    // Genesis block
    if block.height() == 0 {
        return Ok(pow_limit);
    }

    let Some(previous) = block.previous() else {
        return Ok(pow_limit);
    };

    let interval = params.difficulty_adjustment_interval();
    let height = block.height();

    // Only change once per interval
    if height % interval != 0 {
        if params.pow_allow_min_difficulty_blocks {
            // A block more than two spacings after its parent may be mined at
            // minimum difficulty.
            let gap_limit = u64::from(previous.time()) + 2 * params.pow_target_spacing;
            if u64::from(block.time()) > gap_limit {
                return Ok(pow_limit);
            }
            return Ok(last_regular_target(params, previous, ancestry));
        }
        return Ok(Target::from_compact(previous.bits()));
    }

    // First block of the interval that just completed.
    let anchor_height = previous.height().saturating_sub(interval - 1);
    let Some(first) = ancestry.ancestor(previous, anchor_height) else {
        log::error!(
            "Retarget at height {} cannot find interval start at height {}; chain index is inconsistent",
            height,
            anchor_height
        );
        return Err(DifficultyError::MissingRetargetAnchor { height, anchor_height });
    };

    if params.pow_no_retargeting {
        return Ok(Target::from_compact(previous.bits()));
    }

    let timespan = params.pow_target_timespan as i64;
    let actual_timespan = (i64::from(previous.time()) - i64::from(first.time()))
        .clamp(timespan / MAX_RETARGET_FACTOR, timespan * MAX_RETARGET_FACTOR);

    let scaled = Target::from_compact(previous.bits()).scaled(actual_timespan as u64, params.pow_target_timespan)?;
    let new_target = scaled.clamp_to(pow_limit);

    log::debug!(
        "Retarget at height {}: actual timespan {}s of {}s, bits {:#010x} -> {:#010x}",
        height,
        actual_timespan,
        timespan,
        previous.bits(),
        new_target.to_compact()
    );

    Ok(new_target)
}

/// Target of the closest ancestor that is either an interval boundary or was
/// not mined under the minimum-difficulty exception.
fn last_regular_target<A>(params: &ConsensusParams, previous: &Arc<ChainedBlock>, ancestry: &A) -> Target
where
    A: ChainAncestry + ?Sized,
{
    let interval = params.difficulty_adjustment_interval();
    let limit_bits = params.pow_limit.to_compact();

    let mut current = Arc::clone(previous);
    while current.height() % interval != 0 && current.bits() == limit_bits {
        match ancestry.ancestor(&current, current.height() - 1) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    Target::from_compact(current.bits())
}
