//! Block processor for consensus
//!
//! Orchestrates header and body checks for blocks extending the consensus
//! tip, persists accepted blocks and advances the tip.

use crate::consensus::chain::ChainView;
use crate::consensus::types::AcceptanceOutcome;
use crate::pipeline::body_processor::BodyProcessor;
use crate::pipeline::header_processor::HeaderProcessor;
use consensus_core::errors::{ConsensusError, ConsensusResult};
use consensus_core::{Block, ChainedBlock, ConsensusParams};
use database::BlockRepository;
use std::sync::Arc;

/// The consensus side of block submission, as seen by the miner.
pub trait ConsensusGateway: Send + Sync {
    /// The block consensus currently builds on.
    fn tip(&self) -> Arc<ChainedBlock>;

    /// Validates `block` and, when it extends the tip, makes it the new tip.
    fn accept_block(&self, block: &Block) -> AcceptanceOutcome;
}

/// Single-chain consensus: accepts only blocks building on its own tip.
pub struct ConsensusLoop {
    chain: ChainView,
    header_processor: HeaderProcessor,
    body_processor: BodyProcessor,
    repository: Arc<dyn BlockRepository>,
}

impl ConsensusLoop {
    /// Starts from `genesis`, which is written to `repository` if missing.
    pub fn new(params: ConsensusParams, genesis: &Block, repository: Arc<dyn BlockRepository>) -> ConsensusResult<Self> {
        let hash = genesis.hash();
        let stored = repository.exists(&hash).map_err(|e| ConsensusError::DatabaseError(e.to_string()))?;
        if !stored {
            repository.put_block(genesis).map_err(|e| ConsensusError::DatabaseError(e.to_string()))?;
        }
        log::info!("Consensus started on {} at genesis {}", params.network, hash);

        let tip = Arc::new(ChainedBlock::genesis(genesis.header.clone()));
        Ok(Self {
            chain: ChainView::new(tip),
            header_processor: HeaderProcessor::new(params.clone()),
            body_processor: BodyProcessor::new(params),
            repository,
        })
    }

    /// The chain consensus has accepted.
    pub fn chain(&self) -> &ChainView {
        &self.chain
    }

    fn process_block(&self, block: &Block, tip: Arc<ChainedBlock>) -> ConsensusResult<Arc<ChainedBlock>> {
        let candidate = Arc::new(ChainedBlock::new(block.header.clone(), tip));

        self.header_processor.validate_header(&candidate, &self.chain)?;
        self.body_processor.validate_body(block, candidate.height())?;

        self.repository.put_block(block).map_err(|e| ConsensusError::DatabaseError(e.to_string()))?;
        self.chain.set_tip(Arc::clone(&candidate));
        Ok(candidate)
    }
}

impl ConsensusGateway for ConsensusLoop {
    fn tip(&self) -> Arc<ChainedBlock> {
        self.chain.tip()
    }

    fn accept_block(&self, block: &Block) -> AcceptanceOutcome {
        let tip = self.chain.tip();
        if block.header.hash_prev_block != tip.hash() {
            log::debug!(
                "Block {} builds on {}, not on tip {}",
                block.hash(),
                block.header.hash_prev_block,
                tip.hash()
            );
            return AcceptanceOutcome::NoNewTip;
        }

        match self.process_block(block, tip) {
            Ok(chained) => {
                log::info!("Accepted block {} at height {}", chained.hash(), chained.height());
                AcceptanceOutcome::Accepted(chained)
            }
            Err(err) => {
                log::warn!("Rejected block {}: {}", block.hash(), err);
                AcceptanceOutcome::Rejected(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::config::genesis::genesis_block;
    use consensus_core::constants::BLOCK_VERSION;
    use consensus_core::{Header, Network, ScriptPubKey, Transaction, WalkAncestry, ZERO_HASH};
    use consensus_pow::{check_proof_of_work, get_work_required};
    use database::MemoryBlockStore;

    fn regtest_consensus() -> (ConsensusLoop, Arc<MemoryBlockStore>) {
        let store = Arc::new(MemoryBlockStore::new());
        let consensus =
            ConsensusLoop::new(ConsensusParams::regtest(), &genesis_block(Network::Regtest), store.clone()).unwrap();
        (consensus, store)
    }

    fn next_block(tip: &Arc<ChainedBlock>) -> Block {
        let params = ConsensusParams::regtest();
        let height = tip.height() + 1;
        let coinbase = Transaction::new_coinbase(height, 0, params.block_subsidy(height), ScriptPubKey::default());
        let mut header = Header::new(BLOCK_VERSION, tip.hash(), ZERO_HASH, tip.time() + 1, 0, 0);
        let probe = ChainedBlock::new(header.clone(), Arc::clone(tip));
        header.bits = get_work_required(&params, &probe, &WalkAncestry).unwrap().to_compact();

        let mut block = Block::new(header, vec![coinbase]);
        block.update_merkle_root();
        while check_proof_of_work(&block.hash(), block.header.bits, params.pow_limit).is_err() {
            block.header.nonce += 1;
        }
        block
    }

    #[test]
    fn genesis_is_persisted() {
        let (consensus, store) = regtest_consensus();
        assert_eq!(consensus.tip().height(), 0);
        assert!(store.exists(&consensus.tip().hash()).unwrap());
    }

    #[test]
    fn accepts_block_on_tip() {
        let (consensus, store) = regtest_consensus();
        let block = next_block(&consensus.tip());

        let outcome = consensus.accept_block(&block);
        let AcceptanceOutcome::Accepted(tip) = outcome else { panic!("expected acceptance, got {:?}", outcome) };
        assert_eq!(tip.hash(), block.hash());
        assert_eq!(consensus.tip().hash(), block.hash());
        assert_eq!(consensus.chain().height(), 1);
        assert!(store.exists(&block.hash()).unwrap());
    }

    #[test]
    fn stale_parent_is_no_new_tip() {
        let (consensus, _) = regtest_consensus();
        let genesis = consensus.tip();
        let first = next_block(&genesis);
        assert!(consensus.accept_block(&first).is_accepted());

        // sibling of `first`
        let mut sibling = next_block(&genesis);
        sibling.header.time += 1;
        assert_eq!(consensus.accept_block(&sibling), AcceptanceOutcome::NoNewTip);
        // resubmitting the tip itself
        assert_eq!(consensus.accept_block(&first), AcceptanceOutcome::NoNewTip);
    }

    #[test]
    fn invalid_block_is_rejected_without_moving_tip() {
        let (consensus, store) = regtest_consensus();
        let genesis = consensus.tip();
        let mut block = next_block(&genesis);
        block.transactions.clear();

        assert_eq!(consensus.accept_block(&block), AcceptanceOutcome::Rejected(ConsensusError::EmptyTransactionList));
        assert_eq!(consensus.tip().hash(), genesis.hash());
        assert!(!store.exists(&block.hash()).unwrap());
    }
}
