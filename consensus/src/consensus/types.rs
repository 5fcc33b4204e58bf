use consensus_core::{ChainedBlock, ConsensusError};
use std::sync::Arc;

/// What consensus made of a submitted block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptanceOutcome {
    /// The block is valid, persisted and is now the consensus tip.
    Accepted(Arc<ChainedBlock>),
    /// The block does not extend the current tip, e.g. the tip moved while it
    /// was being mined.
    NoNewTip,
    /// The block extends the tip but failed validation or could not be stored.
    Rejected(ConsensusError),
}

impl AcceptanceOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AcceptanceOutcome::Accepted(_))
    }
}
