//! The generate-blocks loop
//!
//! [`MiningCoordinator::generate_blocks`] mines up to a requested number of
//! blocks on the node's chain, submitting each to consensus and waiting for it
//! to reach the block store. One [`TryBudget`] bounds the whole call.

use crate::budget::TryBudget;
use crate::errors::MiningResult;
use crate::pow::{search_nonce, SearchOutcome};
use crate::retry::{ConfirmOutcome, RetryPolicy};
use crate::template::{increment_extra_nonce, TemplateProvider};
use consensus::{AcceptanceOutcome, BlockSignals, ChainBehaviorState, ChainView, ConsensusGateway};
use consensus_core::{ConsensusParams, Hash, ScriptPubKey};
use database::BlockRepository;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Payout script reserved by the caller for one or more mining calls.
#[derive(Debug)]
pub struct ReserveScript {
    script: ScriptPubKey,
    kept: AtomicBool,
}

impl ReserveScript {
    pub fn new(script: ScriptPubKey) -> Self {
        Self { script, kept: AtomicBool::new(false) }
    }

    pub fn script(&self) -> &ScriptPubKey {
        &self.script
    }

    /// Marks the script as used so its owner does not hand it out again.
    pub fn keep(&self) {
        self.kept.store(true, Ordering::Relaxed);
    }

    pub fn is_kept(&self) -> bool {
        self.kept.load(Ordering::Relaxed)
    }
}

/// Why the last `generate_blocks` call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// All requested blocks were mined and accepted.
    Completed,
    /// Called with a zero try budget.
    NoBudget,
    /// The node's chain tip differs from the consensus tip.
    StaleTip,
    /// Nonce attempts used up the try budget.
    BudgetExhausted,
    /// Consensus did not take the block as its new tip.
    NoNewTip,
    /// Consensus rejected the block.
    Rejected,
    /// The template provider failed.
    TemplateFailed,
}

pub struct MiningCoordinator {
    params: ConsensusParams,
    chain: Arc<ChainView>,
    consensus: Arc<dyn ConsensusGateway>,
    templates: Arc<dyn TemplateProvider>,
    repository: Arc<dyn BlockRepository>,
    signals: Arc<BlockSignals>,
    state: Arc<ChainBehaviorState>,
    retry: RetryPolicy,
    last_stop_reason: Mutex<Option<StopReason>>,
}

impl MiningCoordinator {
    pub fn new(
        params: ConsensusParams,
        chain: Arc<ChainView>,
        consensus: Arc<dyn ConsensusGateway>,
        templates: Arc<dyn TemplateProvider>,
        repository: Arc<dyn BlockRepository>,
    ) -> Self {
        Self {
            params,
            chain,
            consensus,
            templates,
            repository,
            signals: Arc::new(BlockSignals::new()),
            state: Arc::new(ChainBehaviorState::new()),
            retry: RetryPolicy::default(),
            last_stop_reason: Mutex::new(None),
        }
    }

    pub fn with_signals(mut self, signals: Arc<BlockSignals>) -> Self {
        self.signals = signals;
        self
    }

    pub fn with_state(mut self, state: Arc<ChainBehaviorState>) -> Self {
        self.state = state;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn chain(&self) -> &Arc<ChainView> {
        &self.chain
    }

    pub fn signals(&self) -> &Arc<BlockSignals> {
        &self.signals
    }

    pub fn state(&self) -> &Arc<ChainBehaviorState> {
        &self.state
    }

    pub fn last_stop_reason(&self) -> Option<StopReason> {
        *self.last_stop_reason.lock()
    }

    /// Mines up to `block_count` blocks paying to `reserve`.
    ///
    /// Returns the hashes of the blocks consensus accepted, in mining order.
    /// Running out of tries, a stale tip or a refused block end the call early
    /// with the hashes gathered so far. Only a template failure is an error.
    ///
    /// With `keep_script` set, the reserve script is marked kept once a block
    /// pays to it; mining itself does not depend on the flag.
    pub fn generate_blocks(
        &self,
        reserve: &ReserveScript,
        block_count: u64,
        max_tries: u64,
        keep_script: bool,
    ) -> MiningResult<Vec<Hash>> {
        let mut blocks = Vec::new();
        let mut budget = TryBudget::new(max_tries);

        if budget.is_exhausted() {
            self.finish(StopReason::NoBudget, &blocks);
            return Ok(blocks);
        }

        let consensus_tip = self.consensus.tip();
        if self.chain.tip().hash() != consensus_tip.hash() {
            log::warn!(
                "Chain tip {} differs from consensus tip {}; not mining",
                self.chain.tip().hash(),
                consensus_tip.hash()
            );
            self.finish(StopReason::StaleTip, &blocks);
            return Ok(blocks);
        }

        let start_height = self.chain.height();
        let end_height = start_height.saturating_add(block_count);
        let mut height = start_height;
        let mut extra_nonce = 0u64;

        let reason = loop {
            if height >= end_height {
                break StopReason::Completed;
            }

            let mut template = match self.templates.create_template(reserve.script()) {
                Ok(template) => template,
                Err(err) => {
                    log::error!("Cannot build template on height {}: {}", height, err);
                    self.finish(StopReason::TemplateFailed, &blocks);
                    return Err(err.into());
                }
            };
            increment_extra_nonce(&mut template.block, &self.chain.tip(), &mut extra_nonce);

            match search_nonce(&mut template.block.header, self.params.pow_limit, &mut budget) {
                SearchOutcome::Found => {}
                SearchOutcome::NonceSpaceExhausted => {
                    log::debug!("Nonce space exhausted at extra nonce {}, refreshing template", extra_nonce);
                    continue;
                }
                SearchOutcome::BudgetExhausted => break StopReason::BudgetExhausted,
            }

            let block = template.block;
            let hash = block.hash();
            match self.consensus.accept_block(&block) {
                AcceptanceOutcome::Accepted(tip) => {
                    self.chain.set_tip(tip);
                    self.state.set_highest_validated_pow(self.consensus.tip());
                    self.signals.broadcast(&block);
                }
                AcceptanceOutcome::NoNewTip => break StopReason::NoNewTip,
                AcceptanceOutcome::Rejected(err) => {
                    log::warn!("Mined block {} was rejected: {}", hash, err);
                    break StopReason::Rejected;
                }
            }

            blocks.push(hash);
            height += 1;
            log::info!("Mined block {} at height {} (nonce {})", hash, height, block.header.nonce);

            if keep_script {
                reserve.keep();
            }

            let repository = &self.repository;
            let outcome = self.retry.confirm(budget.remaining(), || match repository.exists(&hash) {
                Ok(found) => found,
                Err(err) => {
                    log::debug!("Block store lookup for {} failed: {}", hash, err);
                    false
                }
            });
            if let ConfirmOutcome::TimedOut { checks } = outcome {
                log::warn!("Block {} not confirmed in the block store after {} checks", hash, checks);
            }
        };

        self.finish(reason, &blocks);
        Ok(blocks)
    }

    fn finish(&self, reason: StopReason, blocks: &[Hash]) {
        match reason {
            StopReason::Completed => log::info!("Generated {} blocks", blocks.len()),
            _ => log::info!("Mining stopped ({:?}) after {} blocks", reason, blocks.len()),
        }
        *self.last_stop_reason.lock() = Some(reason);
    }
}
