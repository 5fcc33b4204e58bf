//! Block acceptance pipeline
//!
//! Header checks, then body checks, then persistence and tip advance.

pub mod block_processor;
pub mod body_processor;
pub mod header_processor;

pub use block_processor::{ConsensusGateway, ConsensusLoop};
pub use body_processor::BodyProcessor;
pub use header_processor::HeaderProcessor;
