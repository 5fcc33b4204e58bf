//! Nonce search
//!
//! Single-threaded search over the header nonce, bounded both by the nonce
//! space of one template and by the invocation's shared [`TryBudget`].

use crate::budget::TryBudget;
use consensus_core::{Header, Target};
use consensus_pow::meets_target;

/// Nonces tried per template before asking for a fresh one.
pub const NONCE_SEARCH_LIMIT: u32 = 0x10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// `header.nonce` now satisfies the header's bits.
    Found,
    /// Every nonce below [`NONCE_SEARCH_LIMIT`] failed; the budget is not empty.
    NonceSpaceExhausted,
    /// The shared budget ran out before a valid nonce was found.
    BudgetExhausted,
}

/// Advances `header.nonce` from its current value until the hash meets the
/// header's bits, each failed attempt taking one unit of `budget`.
pub fn search_nonce(header: &mut Header, pow_limit: Target, budget: &mut TryBudget) -> SearchOutcome {
    while !budget.is_exhausted() && header.nonce < NONCE_SEARCH_LIMIT && !meets_target(&header.hash(), header.bits, pow_limit) {
        header.nonce += 1;
        budget.try_consume();
    }

    if budget.is_exhausted() {
        SearchOutcome::BudgetExhausted
    } else if header.nonce >= NONCE_SEARCH_LIMIT {
        SearchOutcome::NonceSpaceExhausted
    } else {
        SearchOutcome::Found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::{ConsensusParams, ZERO_HASH};

    fn header(bits: u32) -> Header {
        Header::new(4, ZERO_HASH, ZERO_HASH, 1_296_688_603, bits, 0)
    }

    #[test]
    fn finds_nonce_on_easy_target() {
        let params = ConsensusParams::regtest();
        let mut h = header(0x207f_ffff);
        let mut budget = TryBudget::new(1_000);

        assert_eq!(search_nonce(&mut h, params.pow_limit, &mut budget), SearchOutcome::Found);
        assert!(meets_target(&h.hash(), h.bits, params.pow_limit));
        // only failed attempts are paid for
        assert_eq!(budget.remaining(), 1_000 - u64::from(h.nonce));
    }

    #[test]
    fn single_try_is_spent_by_one_failure() {
        let params = ConsensusParams::mainnet();
        let mut h = header(0x1d00_ffff);
        let mut budget = TryBudget::new(1);

        assert_eq!(search_nonce(&mut h, params.pow_limit, &mut budget), SearchOutcome::BudgetExhausted);
        assert_eq!(h.nonce, 1);
        assert!(budget.is_exhausted());
    }

    #[test]
    fn nonce_space_is_bounded() {
        let params = ConsensusParams::mainnet();
        let mut h = header(0x1d00_ffff);
        let mut budget = TryBudget::new(u64::from(NONCE_SEARCH_LIMIT) + 10);

        assert_eq!(search_nonce(&mut h, params.pow_limit, &mut budget), SearchOutcome::NonceSpaceExhausted);
        assert_eq!(h.nonce, NONCE_SEARCH_LIMIT);
        assert_eq!(budget.remaining(), 10);
    }

    #[test]
    fn budget_and_nonce_space_ending_together_is_budget_exhaustion() {
        let params = ConsensusParams::mainnet();
        let mut h = header(0x1d00_ffff);
        let mut budget = TryBudget::new(u64::from(NONCE_SEARCH_LIMIT));

        assert_eq!(search_nonce(&mut h, params.pow_limit, &mut budget), SearchOutcome::BudgetExhausted);
    }

    #[test]
    fn empty_budget_searches_nothing() {
        let params = ConsensusParams::regtest();
        let mut h = header(0x207f_ffff);
        let mut budget = TryBudget::new(0);

        assert_eq!(search_nonce(&mut h, params.pow_limit, &mut budget), SearchOutcome::BudgetExhausted);
        assert_eq!(h.nonce, 0);
    }
}
