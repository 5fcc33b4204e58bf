//! Try budget shared by every stage of one mining invocation.

/// Remaining proof-of-work attempts for one `generate_blocks` call.
///
/// Failed nonce attempts consume it across all blocks and templates of the
/// call. The persistence poll reads it as its retry bound without consuming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryBudget {
    remaining: u64,
}

impl TryBudget {
    pub fn new(max_tries: u64) -> Self {
        Self { remaining: max_tries }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Takes one attempt; `false` once nothing is left.
    pub fn try_consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumes_down_to_zero() {
        let mut budget = TryBudget::new(2);
        assert!(budget.try_consume());
        assert!(budget.try_consume());
        assert!(budget.is_exhausted());
        assert!(!budget.try_consume());
        assert_eq!(budget.remaining(), 0);
    }
}
