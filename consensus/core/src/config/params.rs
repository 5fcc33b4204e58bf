use crate::constants::{COIN, INITIAL_BLOCK_REWARD, SUBSIDY_HALVING_INTERVAL, TARGET_SPACING_SECS, TARGET_TIMESPAN_SECS};
use pow_math::Target;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Networks with built-in consensus parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            _ => Err(format!("Unknown network: {}", s)),
        }
    }
}

/// Consensus parameters consumed by difficulty adjustment and block assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    pub network: Network,
    /// Easiest permitted target
    pub pow_limit: Target,
    /// Expected duration of one retarget interval, in seconds
    pub pow_target_timespan: u64,
    /// Expected time between blocks, in seconds
    pub pow_target_spacing: u64,
    /// Testnet rule: a block may use `pow_limit` after a long gap
    pub pow_allow_min_difficulty_blocks: bool,
    /// Keep the previous difficulty at retarget heights
    pub pow_no_retargeting: bool,
    pub subsidy_halving_interval: u64,
    /// Subsidy of the first halving era, in base units
    pub initial_subsidy: u64,
}

impl ConsensusParams {
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::mainnet(),
            Network::Testnet => Self::testnet(),
            Network::Regtest => Self::regtest(),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            network: Network::Mainnet,
            pow_limit: Target::new(U256::MAX >> 32),
            pow_target_timespan: TARGET_TIMESPAN_SECS,
            pow_target_spacing: TARGET_SPACING_SECS,
            pow_allow_min_difficulty_blocks: false,
            pow_no_retargeting: false,
            subsidy_halving_interval: SUBSIDY_HALVING_INTERVAL,
            initial_subsidy: INITIAL_BLOCK_REWARD * COIN,
        }
    }

    pub fn testnet() -> Self {
        Self {
            network: Network::Testnet,
            pow_allow_min_difficulty_blocks: true,
            ..Self::mainnet()
        }
    }

    pub fn regtest() -> Self {
        Self {
            network: Network::Regtest,
            pow_limit: Target::new(U256::MAX >> 1),
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: true,
            subsidy_halving_interval: 150,
            ..Self::mainnet()
        }
    }

    /// Number of blocks between retargets. Never zero.
    pub fn difficulty_adjustment_interval(&self) -> u64 {
        if self.pow_target_spacing == 0 {
            return 1;
        }
        (self.pow_target_timespan / self.pow_target_spacing).max(1)
    }

    /// Coinbase subsidy at `height`, halving every `subsidy_halving_interval` blocks.
    pub fn block_subsidy(&self, height: u64) -> u64 {
        let halvings = height / self.subsidy_halving_interval.max(1);
        if halvings >= 64 {
            return 0;
        }
        self.initial_subsidy >> halvings
    }
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_interval_is_2016() {
        let params = ConsensusParams::mainnet();
        assert_eq!(params.difficulty_adjustment_interval(), 2016);
        assert_eq!(params.pow_limit.to_compact(), 0x1d00_ffff);
    }

    #[test]
    fn regtest_limit_and_flags() {
        let params = ConsensusParams::regtest();
        assert_eq!(params.pow_limit.to_compact(), 0x207f_ffff);
        assert!(params.pow_no_retargeting);
        assert!(params.pow_allow_min_difficulty_blocks);
    }

    #[test]
    fn zero_spacing_does_not_divide_by_zero() {
        let params = ConsensusParams { pow_target_spacing: 0, ..ConsensusParams::mainnet() };
        assert_eq!(params.difficulty_adjustment_interval(), 1);
    }

    #[test]
    fn subsidy_halves() {
        let params = ConsensusParams::mainnet();
        assert_eq!(params.block_subsidy(0), 50 * COIN);
        assert_eq!(params.block_subsidy(210_000), 25 * COIN);
        assert_eq!(params.block_subsidy(64 * 210_000), 0);
    }

    #[test]
    fn network_names_parse() {
        assert_eq!("regtest".parse::<Network>(), Ok(Network::Regtest));
        assert_eq!("main".parse::<Network>(), Ok(Network::Mainnet));
        assert!("signet".parse::<Network>().is_err());
        assert_eq!(Network::Testnet.to_string(), "testnet");
    }
}
