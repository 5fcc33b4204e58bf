//! Chain state shared between consensus and the mining coordinator.

pub mod chain;
pub mod signals;
pub mod state;
pub mod types;

pub use chain::ChainView;
pub use signals::BlockSignals;
pub use state::ChainBehaviorState;
pub use types::AcceptanceOutcome;
