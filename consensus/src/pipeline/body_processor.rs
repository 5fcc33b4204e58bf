//! Body processor for consensus
//!
//! Transaction-list checks that only need the block and its height.

use consensus_core::errors::ConsensusError;
use consensus_core::{Block, ConsensusParams};

pub struct BodyProcessor {
    params: ConsensusParams,
}

impl BodyProcessor {
    pub fn new(params: ConsensusParams) -> Self {
        Self { params }
    }

    /// Structural checks plus a coinbase that pays no more than the subsidy.
    pub fn validate_body(&self, block: &Block, height: u64) -> Result<(), ConsensusError> {
        block.check_structure()?;

        let subsidy = self.params.block_subsidy(height);
        let paid = block.coinbase().map_or(0, |tx| tx.output_value());
        if paid > subsidy {
            log::debug!("Coinbase at height {} pays {} over subsidy {}", height, paid, subsidy);
            return Err(ConsensusError::InvalidCoinbaseTransaction);
        }
        Ok(())
    }
}
