use consensus_core::ChainedBlock;
use parking_lot::RwLock;
use std::sync::Arc;

/// Node-wide markers describing how far validation has progressed.
#[derive(Debug, Default)]
pub struct ChainBehaviorState {
    highest_validated_pow: RwLock<Option<Arc<ChainedBlock>>>,
}

impl ChainBehaviorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest block whose proof of work this node has validated.
    pub fn highest_validated_pow(&self) -> Option<Arc<ChainedBlock>> {
        self.highest_validated_pow.read().clone()
    }

    pub fn set_highest_validated_pow(&self, block: Arc<ChainedBlock>) {
        *self.highest_validated_pow.write() = Some(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::{Header, ZERO_HASH};

    #[test]
    fn marker_starts_empty_and_tracks_latest() {
        let state = ChainBehaviorState::new();
        assert!(state.highest_validated_pow().is_none());

        let genesis = Arc::new(ChainedBlock::genesis(Header::new(1, ZERO_HASH, ZERO_HASH, 0, 0x207f_ffff, 0)));
        state.set_highest_validated_pow(Arc::clone(&genesis));
        assert_eq!(state.highest_validated_pow().map(|b| b.hash()), Some(genesis.hash()));
    }
}
