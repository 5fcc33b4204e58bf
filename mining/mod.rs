//! Mining module for proof-of-work consensus
//!
//! Generates blocks on top of the node's chain: builds templates, searches
//! nonces within a shared try budget, submits blocks to consensus and waits
//! for them to reach the block store.
//!
//! ## Module Organization
//!
//! - [`coordinator`]: the generate-blocks loop and its stop reasons
//! - [`template`]: block templates and the coinbase extra-nonce
//! - [`pow`]: bounded nonce search
//! - [`budget`]: the try budget shared by one invocation
//! - [`retry`]: bounded fixed-backoff polling for block persistence
//! - [`config`]: miner settings from TOML and the command line

pub mod budget;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod pow;
pub mod retry;
pub mod template;


// Re-export main types for easier access
pub use budget::TryBudget;
pub use config::{ConfigOverrides, MinerConfig};
pub use coordinator::{MiningCoordinator, ReserveScript, StopReason};
pub use errors::{MiningError, MiningResult};
pub use pow::{search_nonce, SearchOutcome, NONCE_SEARCH_LIMIT};
pub use retry::{ConfirmOutcome, RetryPolicy, Sleeper, ThreadSleeper};
pub use template::{BlockAssembler, BlockTemplate, TemplateError, TemplateProvider, TimeSource};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigOverrides, MinerConfig};
    pub use crate::coordinator::{MiningCoordinator, ReserveScript, StopReason};
    pub use crate::errors::{MiningError, MiningResult};
    pub use crate::pow::{search_nonce, SearchOutcome};
    pub use crate::retry::RetryPolicy;
    pub use crate::template::{BlockAssembler, TemplateProvider};
    pub use crate::TryBudget;
}
