//! Blocks linked into a chain with a known height.
//!
//! A [`ChainedBlock`] owns its header and shares its ancestry through `Arc`, so
//! several chain views can point into the same history. Nothing about a
//! chained block changes after it is created.

use crate::{Hash, Header};
use std::fmt;
use std::sync::Arc;

pub struct ChainedBlock {
    header: Header,
    hash: Hash,
    height: u64,
    previous: Option<Arc<ChainedBlock>>,
}

impl ChainedBlock {
    /// Root of a chain: height zero, no previous block.
    pub fn genesis(header: Header) -> Self {
        let hash = header.hash();
        Self { header, hash, height: 0, previous: None }
    }

    /// Links `header` as the child of `previous`, one block higher.
    pub fn new(header: Header, previous: Arc<ChainedBlock>) -> Self {
        let hash = header.hash();
        Self::with_hash(header, hash, previous)
    }

    /// Like [`ChainedBlock::new`] when the caller already computed the hash.
    pub fn with_hash(header: Header, hash: Hash, previous: Arc<ChainedBlock>) -> Self {
        let height = previous.height + 1;
        Self { header, hash, height, previous: Some(previous) }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn previous(&self) -> Option<&Arc<ChainedBlock>> {
        self.previous.as_ref()
    }

    pub fn bits(&self) -> u32 {
        self.header.bits
    }

    pub fn time(&self) -> u32 {
        self.header.time
    }

    /// Walks the previous links back to the block at `height`.
    ///
    /// Linear in the distance; chain views with a height index should be
    /// preferred through [`ChainAncestry`].
    pub fn get_ancestor(&self, height: u64) -> Option<&ChainedBlock> {
        if height > self.height {
            return None;
        }
        let mut current = self;
        while current.height > height {
            current = current.previous.as_deref()?;
        }
        Some(current)
    }

    /// Iterates from this block back to genesis, this block first.
    pub fn enumerate_to_genesis(&self) -> impl Iterator<Item = &ChainedBlock> {
        std::iter::successors(Some(self), |block| block.previous.as_deref())
    }
}

// Long chains would otherwise drop recursively through the previous links.
impl Drop for ChainedBlock {
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(block) = previous {
            match Arc::try_unwrap(block) {
                Ok(mut owned) => previous = owned.previous.take(),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Debug for ChainedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedBlock")
            .field("hash", &self.hash)
            .field("height", &self.height)
            .field("previous", &self.previous.as_ref().map(|p| p.hash))
            .finish()
    }
}

impl PartialEq for ChainedBlock {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.height == other.height
    }
}

impl Eq for ChainedBlock {}

/// Read-only ancestor lookup used by difficulty and validation code.
pub trait ChainAncestry {
    /// The ancestor of `block` at `height`, or `block` itself when the heights
    /// match. `None` when `height` is above `block` or the history is missing.
    fn ancestor(&self, block: &Arc<ChainedBlock>, height: u64) -> Option<Arc<ChainedBlock>>;
}

/// Ancestry by following previous links, for blocks outside any chain index.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkAncestry;

impl ChainAncestry for WalkAncestry {
    fn ancestor(&self, block: &Arc<ChainedBlock>, height: u64) -> Option<Arc<ChainedBlock>> {
        if height > block.height {
            return None;
        }
        let mut current = Arc::clone(block);
        while current.height > height {
            current = Arc::clone(current.previous.as_ref()?);
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ZERO_HASH;

    fn build_chain(len: u64) -> Arc<ChainedBlock> {
        let mut tip = Arc::new(ChainedBlock::genesis(Header::new(1, ZERO_HASH, ZERO_HASH, 1000, 0x207f_ffff, 0)));
        for i in 1..len {
            let header = Header::new(1, tip.hash(), ZERO_HASH, 1000 + i as u32, 0x207f_ffff, 0);
            tip = Arc::new(ChainedBlock::new(header, tip));
        }
        tip
    }

    #[test]
    fn heights_follow_previous() {
        let tip = build_chain(5);
        assert_eq!(tip.height(), 4);
        assert_eq!(tip.previous().map(|p| p.height()), Some(3));
        assert_eq!(tip.header().hash_prev_block, tip.previous().unwrap().hash());
    }

    #[test]
    fn get_ancestor_walks_back() {
        let tip = build_chain(10);
        assert_eq!(tip.get_ancestor(9).map(ChainedBlock::height), Some(9));
        assert_eq!(tip.get_ancestor(0).map(ChainedBlock::time), Some(1000));
        assert!(tip.get_ancestor(10).is_none());
    }

    #[test]
    fn enumerate_to_genesis_visits_every_block() {
        let tip = build_chain(4);
        let heights: Vec<u64> = tip.enumerate_to_genesis().map(ChainedBlock::height).collect();
        assert_eq!(heights, vec![3, 2, 1, 0]);
    }

    #[test]
    fn walk_ancestry_matches_get_ancestor() {
        let tip = build_chain(8);
        for h in 0..8 {
            let walked = WalkAncestry.ancestor(&tip, h).unwrap();
            assert_eq!(walked.hash(), tip.get_ancestor(h).unwrap().hash());
        }
        assert!(WalkAncestry.ancestor(&tip, 8).is_none());
    }
}
