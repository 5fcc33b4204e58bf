use crate::Hash;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("Invalid merkle root")]
    InvalidMerkleRoot,

    #[error("Invalid proof of work: {0}")]
    InvalidProofOfWork(String),

    #[error("Incorrect difficulty bits: expected {expected:#010x}, found {found:#010x}")]
    BadDifficultyBits { expected: u32, found: u32 },

    #[error("Invalid coinbase transaction")]
    InvalidCoinbaseTransaction,

    #[error("Empty transaction list")]
    EmptyTransactionList,

    #[error("Block parent {0} is not the current tip")]
    InvalidBlockParent(Hash),

    #[error("Block time {time} is not after previous block time {previous_time}")]
    InvalidTimestamp { time: u32, previous_time: u32 },

    #[error("Difficulty error: {0}")]
    Difficulty(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Other error: {0}")]
    Other(String),
}

pub type ConsensusResult<T> = Result<T, ConsensusError>;
