use clap::Parser;
use consensus::{ChainView, ConsensusGateway, ConsensusLoop};
use consensus_core::config::genesis::genesis_block;
use consensus_core::{ConsensusParams, Network};
use database::{BlockRepository, BlockStore, Database, MemoryBlockStore};
use log::{info, warn};
use mining::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Local proof-of-work block generator
#[derive(Parser, Debug)]
#[command(name = "miner")]
#[command(about = "Generates blocks on a local chain", long_about = None)]
struct Args {
    /// Configuration file (TOML); defaults are used when it does not exist
    #[arg(short, long, default_value = "miner.toml")]
    config: PathBuf,

    /// Network parameters: mainnet, testnet or regtest
    #[arg(short, long)]
    network: Option<Network>,

    /// Number of blocks to generate
    #[arg(short, long)]
    blocks: Option<u64>,

    /// Try budget shared by the whole run
    #[arg(long)]
    max_tries: Option<u64>,

    /// Coinbase payout script, hex encoded
    #[arg(long)]
    payout_script: Option<String>,

    /// Mark the payout script as kept after mining
    #[arg(long)]
    keep_script: bool,

    /// Store blocks in RocksDB under this directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_default_env().filter_level(args.log_level.parse()?).init();

    let mut config = MinerConfig::load(&args.config)?;
    config.apply_cli_overrides(ConfigOverrides {
        network: args.network,
        blocks: args.blocks,
        max_tries: args.max_tries,
        payout_script: args.payout_script,
        keep_script: args.keep_script,
        data_dir: args.data_dir,
    });

    info!("Miner starting on {}", config.network);

    let params = ConsensusParams::for_network(config.network);
    let repository: Arc<dyn BlockRepository> = match &config.data_dir {
        Some(dir) => {
            info!("Block store: {}", dir.display());
            Arc::new(BlockStore::new(Database::open(dir).map_err(MiningError::from)?, config.db_cache_size))
        }
        None => {
            info!("Block store: in memory");
            Arc::new(MemoryBlockStore::new())
        }
    };

    let consensus =
        Arc::new(ConsensusLoop::new(params.clone(), &genesis_block(config.network), repository.clone()).map_err(MiningError::from)?);
    let chain = Arc::new(ChainView::new(consensus.tip()));
    let assembler = Arc::new(BlockAssembler::new(params.clone(), chain.clone()));

    let coordinator = MiningCoordinator::new(params, chain.clone(), consensus, assembler, repository)
        .with_retry_policy(RetryPolicy::fixed(config.confirm_interval()));
    let accepted = coordinator.signals().subscribe();

    let reserve = ReserveScript::new(config.payout_script()?);
    let hashes = coordinator.generate_blocks(&reserve, config.blocks, config.max_tries, config.keep_script)?;

    if (hashes.len() as u64) < config.blocks {
        warn!(
            "Generated {} of {} blocks ({:?})",
            hashes.len(),
            config.blocks,
            coordinator.last_stop_reason()
        );
    }
    info!(
        "Chain height {}, {} blocks announced, payout script kept: {}",
        chain.height(),
        accepted.try_iter().count(),
        reserve.is_kept()
    );

    for hash in hashes {
        println!("{}", hash);
    }
    Ok(())
}
