//! Miner configuration
//!
//! Read from a TOML file when one exists, otherwise defaults; command-line
//! flags then override individual fields.

use crate::errors::{MiningError, MiningResult};
use consensus_core::{Network, ScriptPubKey};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    pub network: Network,
    /// Blocks to generate per run
    pub blocks: u64,
    /// Shared try budget of one run
    pub max_tries: u64,
    /// Coinbase payout script, hex encoded
    pub payout_script: String,
    pub keep_script: bool,
    /// Pause between block store checks after a block is accepted
    pub confirm_interval_ms: u64,
    /// RocksDB directory; blocks are kept in memory when unset
    pub data_dir: Option<PathBuf>,
    pub db_cache_size: usize,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            network: Network::Regtest,
            blocks: 1,
            max_tries: 1_000_000,
            // OP_TRUE
            payout_script: "51".to_string(),
            keep_script: false,
            confirm_interval_ms: 100,
            data_dir: None,
            db_cache_size: 1024,
        }
    }
}

/// Command-line values that replace file settings when present.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub network: Option<Network>,
    pub blocks: Option<u64>,
    pub max_tries: Option<u64>,
    pub payout_script: Option<String>,
    pub keep_script: bool,
    pub data_dir: Option<PathBuf>,
}

impl MinerConfig {
    /// Load configuration from file if it exists, otherwise use defaults
    pub fn load(path: &Path) -> MiningResult<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| MiningError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> MiningResult<Self> {
        toml::from_str(content).map_err(|e| MiningError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn to_toml(&self) -> MiningResult<String> {
        toml::to_string_pretty(self).map_err(|e| MiningError::Config(format!("Failed to serialize config: {}", e)))
    }

    pub fn apply_cli_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(network) = overrides.network {
            self.network = network;
        }
        if let Some(blocks) = overrides.blocks {
            self.blocks = blocks;
        }
        if let Some(max_tries) = overrides.max_tries {
            self.max_tries = max_tries;
        }
        if let Some(script) = overrides.payout_script {
            self.payout_script = script;
        }
        if overrides.keep_script {
            self.keep_script = true;
        }
        if let Some(dir) = overrides.data_dir {
            self.data_dir = Some(dir);
        }
    }

    pub fn payout_script(&self) -> MiningResult<ScriptPubKey> {
        self.payout_script
            .parse()
            .map_err(|e| MiningError::Config(format!("Invalid payout script {:?}: {}", self.payout_script, e)))
    }

    pub fn confirm_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_interval_ms)
    }
}
