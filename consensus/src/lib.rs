//! Consensus layer of the proof-of-work node
//!
//! Keeps the active chain, validates blocks extending its tip and persists the
//! ones it accepts. The mining coordinator talks to it through
//! [`ConsensusGateway`].

pub mod consensus;
pub mod pipeline;

pub use consensus::{chain, signals, state};

// Re-export key types for easier access
pub use consensus::chain::ChainView;
pub use consensus::signals::BlockSignals;
pub use consensus::state::ChainBehaviorState;
pub use consensus::types::AcceptanceOutcome;
pub use consensus_core::Hash;

pub use pipeline::{BodyProcessor, ConsensusGateway, ConsensusLoop, HeaderProcessor};
