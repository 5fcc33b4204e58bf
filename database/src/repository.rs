//! Storage seam between consensus and the mining loop.

use crate::DbResult;
use consensus_core::{Block, Hash};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Durable home of accepted blocks, keyed by block hash.
pub trait BlockRepository: Send + Sync {
    fn put_block(&self, block: &Block) -> DbResult<()>;

    fn get_block(&self, hash: &Hash) -> DbResult<Option<Block>>;

    fn exists(&self, hash: &Hash) -> DbResult<bool>;
}

impl<T: BlockRepository + ?Sized> BlockRepository for Arc<T> {
    fn put_block(&self, block: &Block) -> DbResult<()> {
        (**self).put_block(block)
    }

    fn get_block(&self, hash: &Hash) -> DbResult<Option<Block>> {
        (**self).get_block(hash)
    }

    fn exists(&self, hash: &Hash) -> DbResult<bool> {
        (**self).exists(hash)
    }
}

/// Process-local repository for regtest runs and tests.
#[derive(Default)]
pub struct MemoryBlockStore {
    blocks: RwLock<HashMap<Hash, Block>>,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }
}

impl BlockRepository for MemoryBlockStore {
    fn put_block(&self, block: &Block) -> DbResult<()> {
        self.blocks.write().insert(block.hash(), block.clone());
        Ok(())
    }

    fn get_block(&self, hash: &Hash) -> DbResult<Option<Block>> {
        Ok(self.blocks.read().get(hash).cloned())
    }

    fn exists(&self, hash: &Hash) -> DbResult<bool> {
        Ok(self.blocks.read().contains_key(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::config::genesis::genesis_block;
    use consensus_core::Network;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryBlockStore::new();
        let block = genesis_block(Network::Regtest);
        let hash = block.hash();
        assert!(!store.exists(&hash).unwrap());
        store.put_block(&block).unwrap();
        assert!(store.exists(&hash).unwrap());
        assert_eq!(store.get_block(&hash).unwrap(), Some(block));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn shared_store_through_arc() {
        let store = Arc::new(MemoryBlockStore::new());
        let repo: Arc<dyn BlockRepository> = store.clone();
        let block = genesis_block(Network::Mainnet);
        repo.put_block(&block).unwrap();
        assert!(store.exists(&block.hash()).unwrap());
    }
}
