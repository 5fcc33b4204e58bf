use consensus_core::Block;
use parking_lot::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

/// Fan-out of newly connected blocks to in-process listeners.
///
/// Sending never blocks: every subscriber gets an unbounded channel, and
/// subscribers whose receiver was dropped are forgotten on the next broadcast.
#[derive(Default)]
pub struct BlockSignals {
    subscribers: Mutex<Vec<Sender<Block>>>,
}

impl BlockSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<Block> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.lock().push(sender);
        receiver
    }

    /// Returns the number of subscribers the block was delivered to.
    pub fn broadcast(&self, block: &Block) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| sender.send(block.clone()).is_ok());
        log::trace!("Broadcast block {} to {} subscribers", block.hash(), subscribers.len());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
