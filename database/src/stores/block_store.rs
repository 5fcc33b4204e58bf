use crate::cache::LruCache;
use crate::db::{CF_BLOCKS, CF_METADATA};
use crate::repository::BlockRepository;
use crate::{Database, DbError, DbResult};
use consensus_core::{Block, Hash};

const LAST_BLOCK_KEY: &[u8] = b"last_block";

/// RocksDB block store with a write-through cache in front.
pub struct BlockStore {
    db: Database,
    cache: LruCache<Hash, Block>,
}

impl BlockStore {
    pub fn new(db: Database, cache_size: usize) -> Self {
        Self { db, cache: LruCache::new(cache_size) }
    }

    /// Hash of the most recently written block, if any.
    pub fn last_block(&self) -> DbResult<Option<Hash>> {
        match self.db.get(CF_METADATA, LAST_BLOCK_KEY)? {
            Some(bytes) => Hash::try_from_slice(&bytes)
                .map(Some)
                .map_err(|_| DbError::Serialization(format!("last block key holds {} bytes", bytes.len()))),
            None => Ok(None),
        }
    }
}

impl BlockRepository for BlockStore {
    fn put_block(&self, block: &Block) -> DbResult<()> {
        let hash = block.hash();
        let serialized = bincode::serialize(block)?;
        let key = &hash.as_bytes()[..];
        self.db.put_all(&[(CF_BLOCKS, key, serialized.as_slice()), (CF_METADATA, LAST_BLOCK_KEY, key)])?;
        self.cache.insert(hash, block.clone());
        tracing::debug!("Stored block {} ({} bytes)", hash, serialized.len());
        Ok(())
    }

    fn get_block(&self, hash: &Hash) -> DbResult<Option<Block>> {
        if let Some(block) = self.cache.get(hash) {
            return Ok(Some(block));
        }
        match self.db.get(CF_BLOCKS, hash.as_bytes())? {
            Some(data) => {
                let block: Block = bincode::deserialize(&data)?;
                self.cache.insert(*hash, block.clone());
                Ok(Some(block))
            }
            None => Ok(None),
        }
    }

    fn exists(&self, hash: &Hash) -> DbResult<bool> {
        if self.cache.contains(hash) {
            return Ok(true);
        }
        self.db.exists(CF_BLOCKS, hash.as_bytes())
    }
}
