/// Current block version
pub const BLOCK_VERSION: u32 = 4;

/// Number of base units in one coin
pub const COIN: u64 = 100_000_000;

/// Initial block reward in coins
pub const INITIAL_BLOCK_REWARD: u64 = 50;

/// Block subsidy halving interval (in blocks)
pub const SUBSIDY_HALVING_INTERVAL: u64 = 210_000;

/// Target time between blocks in seconds (10 minutes)
pub const TARGET_SPACING_SECS: u64 = 10 * 60;

/// Expected duration of one difficulty interval in seconds (two weeks)
pub const TARGET_TIMESPAN_SECS: u64 = 14 * 24 * 60 * 60;

/// Sequence number used by the coinbase input
pub const SEQUENCE_FINAL: u32 = u32::MAX;
