use crate::template::TemplateError;
use consensus_core::errors::ConsensusError;
use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MiningError {
    #[error("Block template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    #[error("Consensus error: {0}")]
    Consensus(#[from] ConsensusError),
}

pub type MiningResult<T> = Result<T, MiningError>;
