//! Core consensus data types
//!
//! Headers, transactions, blocks, the chained-block ancestry link and the
//! per-network consensus parameters shared by the validation and mining crates.

pub mod block;
pub mod chained;
pub mod config;
pub mod constants;
pub mod errors;
pub mod header;
pub mod tx;

pub use crypto_hashes::{Hash, ZERO_HASH};
pub use pow_math::Target;

pub use block::Block;
pub use chained::{ChainAncestry, ChainedBlock, WalkAncestry};
pub use config::params::{ConsensusParams, Network};
pub use errors::{ConsensusError, ConsensusResult};
pub use header::Header;
pub use tx::{OutPoint, ScriptPubKey, Transaction, TxIn, TxOut};
