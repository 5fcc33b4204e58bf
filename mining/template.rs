//! Block templates
//!
//! A template is a fully formed candidate block on top of the current tip,
//! with the difficulty bits already computed. The miner only touches the
//! header nonce and the coinbase extra-nonce.

use consensus::ChainView;
use consensus_core::constants::BLOCK_VERSION;
use consensus_core::tx::coinbase_script_sig;
use consensus_core::{Block, ChainedBlock, ConsensusParams, Header, ScriptPubKey, Transaction, ZERO_HASH};
use consensus_pow::{get_work_required, DifficultyError};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("cannot compute required work: {0}")]
    Difficulty(#[from] DifficultyError),

    #[error("template provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTemplate {
    pub block: Block,
    /// Height the block is built for
    pub height: u64,
    /// Total paid by the coinbase, in base units
    pub coinbase_value: u64,
}

/// Source of candidate blocks paying to a given script.
pub trait TemplateProvider: Send + Sync {
    fn create_template(&self, script: &ScriptPubKey) -> Result<BlockTemplate, TemplateError>;
}

pub trait TimeSource: Send + Sync {
    /// Unix time in seconds
    fn now(&self) -> u32;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u32 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(unix_seconds).unwrap_or(0)
    }
}

/// Header time for a duration since the epoch; saturates past the `u32` range.
fn unix_seconds(since_epoch: Duration) -> u32 {
    u32::try_from(since_epoch.as_secs()).unwrap_or(u32::MAX)
}

/// Builds coinbase-only templates on the tip of a chain view.
pub struct BlockAssembler<T: TimeSource = SystemTimeSource> {
    params: ConsensusParams,
    chain: Arc<ChainView>,
    clock: T,
}

impl BlockAssembler<SystemTimeSource> {
    pub fn new(params: ConsensusParams, chain: Arc<ChainView>) -> Self {
        Self::with_time_source(params, chain, SystemTimeSource)
    }
}

impl<T: TimeSource> BlockAssembler<T> {
    pub fn with_time_source(params: ConsensusParams, chain: Arc<ChainView>, clock: T) -> Self {
        Self { params, chain, clock }
    }
}

impl<T: TimeSource> TemplateProvider for BlockAssembler<T> {
    fn create_template(&self, script: &ScriptPubKey) -> Result<BlockTemplate, TemplateError> {
        let tip = self.chain.tip();
        let height = tip.height() + 1;
        let coinbase_value = self.params.block_subsidy(height);
        let time = self.clock.now().max(tip.time().saturating_add(1));

        let mut header = Header::new(BLOCK_VERSION, tip.hash(), ZERO_HASH, time, 0, 0);
        let probe = ChainedBlock::new(header.clone(), Arc::clone(&tip));
        header.bits = get_work_required(&self.params, &probe, self.chain.as_ref())?.to_compact();

        let coinbase = Transaction::new_coinbase(height, 0, coinbase_value, script.clone());
        let mut block = Block::new(header, vec![coinbase]);
        block.update_merkle_root();

        log::debug!("New template at height {} with bits {:#010x}", height, block.header.bits);
        Ok(BlockTemplate { block, height, coinbase_value })
    }
}

/// Bumps `extra_nonce` and writes it, with the height following `tip`, into
/// the coinbase script. The merkle root is recomputed. Returns the new value.
pub fn increment_extra_nonce(block: &mut Block, tip: &ChainedBlock, extra_nonce: &mut u64) -> u64 {
    *extra_nonce += 1;
    let height = tip.height() + 1;
    if let Some(input) = block.transactions.first_mut().and_then(|tx| tx.inputs.first_mut()) {
        input.script_sig = coinbase_script_sig(height, *extra_nonce);
    }
    block.update_merkle_root();
    *extra_nonce
}
