//! Height-indexed view of the active chain.

use consensus_core::{ChainAncestry, ChainedBlock, Hash};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

struct ChainIndex {
    /// `by_height[h]` is the active block at height `h`; the last entry is the tip.
    by_height: Vec<Arc<ChainedBlock>>,
    by_hash: HashMap<Hash, u64>,
}

impl ChainIndex {
    fn tip(&self) -> &Arc<ChainedBlock> {
        // The index is never empty: it is created with a tip and `set_tip`
        // always leaves the new tip in place.
        &self.by_height[self.by_height.len() - 1]
    }

    fn is_active(&self, block: &ChainedBlock) -> bool {
        self.by_height.get(block.height() as usize).is_some_and(|active| active.hash() == block.hash())
    }
}

/// The active chain from genesis to the tip, with O(1) lookup by height.
///
/// A view has a single writer; readers may run concurrently with it.
pub struct ChainView {
    index: RwLock<ChainIndex>,
}

impl ChainView {
    /// Builds a view whose tip is `tip`, indexing its whole ancestry.
    pub fn new(tip: Arc<ChainedBlock>) -> Self {
        let mut by_height = Vec::with_capacity(tip.height() as usize + 1);
        let mut current = Some(tip);
        while let Some(block) = current {
            current = block.previous().cloned();
            by_height.push(block);
        }
        by_height.reverse();
        let by_hash = by_height.iter().map(|b| (b.hash(), b.height())).collect();
        Self { index: RwLock::new(ChainIndex { by_height, by_hash }) }
    }

    pub fn tip(&self) -> Arc<ChainedBlock> {
        Arc::clone(self.index.read().tip())
    }

    pub fn height(&self) -> u64 {
        self.index.read().tip().height()
    }

    pub fn block_at(&self, height: u64) -> Option<Arc<ChainedBlock>> {
        self.index.read().by_height.get(height as usize).cloned()
    }

    /// Whether `hash` is on the active chain.
    pub fn contains(&self, hash: &Hash) -> bool {
        self.index.read().by_hash.contains_key(hash)
    }

    pub fn get(&self, hash: &Hash) -> Option<Arc<ChainedBlock>> {
        let index = self.index.read();
        let height = *index.by_hash.get(hash)?;
        index.by_height.get(height as usize).cloned()
    }

    /// Makes `tip` the active tip.
    ///
    /// Blocks above the fork point with the new branch are dropped from the
    /// index and the new branch is indexed in their place.
    pub fn set_tip(&self, tip: Arc<ChainedBlock>) {
        let mut index = self.index.write();

        let mut branch = Vec::new();
        let mut fork_point = None;
        let mut current = Some(tip);
        while let Some(block) = current.take() {
            if index.is_active(&block) {
                fork_point = Some(block);
                break;
            }
            current = block.previous().cloned();
            branch.push(block);
        }

        let keep = match (branch.last(), fork_point) {
            (Some(lowest), _) => lowest.height() as usize,
            // Already the active tip or one of its ancestors.
            (None, Some(active)) => active.height() as usize + 1,
            (None, None) => return,
        };

        let keep = keep.min(index.by_height.len());
        let disconnected: Vec<_> = index.by_height.drain(keep..).collect();
        for block in &disconnected {
            index.by_hash.remove(&block.hash());
        }
        for block in branch.into_iter().rev() {
            index.by_hash.insert(block.hash(), block.height());
            index.by_height.push(block);
        }

        if !disconnected.is_empty() {
            log::info!("Chain reorganized: {} blocks disconnected, new tip {}", disconnected.len(), index.tip().hash());
        }
    }
}

impl ChainAncestry for ChainView {
    /// Walks back from `block` until it meets the active chain, then answers
    /// from the height index.
    fn ancestor(&self, block: &Arc<ChainedBlock>, height: u64) -> Option<Arc<ChainedBlock>> {
        if height > block.height() {
            return None;
        }
        let index = self.index.read();
        let mut current = Arc::clone(block);
        loop {
            if current.height() == height {
                return Some(current);
            }
            if index.is_active(&current) {
                return index.by_height.get(height as usize).cloned();
            }
            current = Arc::clone(current.previous()?);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::{Header, ZERO_HASH};

    fn genesis() -> Arc<ChainedBlock> {
        Arc::new(ChainedBlock::genesis(Header::new(1, ZERO_HASH, ZERO_HASH, 1_000, 0x207f_ffff, 0)))
    }

    /// Extends `from` by `count` blocks; `salt` goes into the nonce so forks differ.
    fn extend(from: &Arc<ChainedBlock>, count: u64, salt: u32) -> Vec<Arc<ChainedBlock>> {
        let mut blocks = Vec::new();
        let mut prev = Arc::clone(from);
        for _ in 0..count {
            let header = Header::new(1, prev.hash(), ZERO_HASH, prev.time() + 600, 0x207f_ffff, salt);
            let block = Arc::new(ChainedBlock::new(header, Arc::clone(&prev)));
            blocks.push(Arc::clone(&block));
            prev = block;
        }
        blocks
    }

    #[test]
    fn new_indexes_full_ancestry() {
        let g = genesis();
        let blocks = extend(&g, 5, 0);
        let view = ChainView::new(Arc::clone(&blocks[4]));

        assert_eq!(view.height(), 5);
        assert_eq!(view.tip().hash(), blocks[4].hash());
        assert_eq!(view.block_at(0).unwrap().hash(), g.hash());
        assert_eq!(view.block_at(3).unwrap().hash(), blocks[2].hash());
        assert!(view.block_at(6).is_none());
        assert!(view.contains(&blocks[0].hash()));
    }

    #[test]
    fn set_tip_extends() {
        let g = genesis();
        let view = ChainView::new(Arc::clone(&g));
        for block in extend(&g, 3, 0) {
            view.set_tip(Arc::clone(&block));
            assert_eq!(view.tip().hash(), block.hash());
        }
        assert_eq!(view.height(), 3);
    }

    #[test]
    fn set_tip_rewinds_to_fork_point() {
        let g = genesis();
        let main = extend(&g, 4, 0);
        let view = ChainView::new(Arc::clone(&main[3]));

        // fork off height 2
        let fork = extend(&main[1], 3, 7);
        view.set_tip(Arc::clone(&fork[2]));

        assert_eq!(view.height(), 5);
        assert_eq!(view.block_at(2).unwrap().hash(), main[1].hash());
        assert_eq!(view.block_at(3).unwrap().hash(), fork[0].hash());
        assert!(!view.contains(&main[2].hash()));
        assert!(!view.contains(&main[3].hash()));
        assert!(view.contains(&fork[2].hash()));
        assert_eq!(view.get(&fork[1].hash()).unwrap().height(), 4);
    }

    #[test]
    fn set_tip_to_ancestor_truncates() {
        let g = genesis();
        let main = extend(&g, 4, 0);
        let view = ChainView::new(Arc::clone(&main[3]));

        view.set_tip(Arc::clone(&main[1]));
        assert_eq!(view.height(), 2);
        assert!(!view.contains(&main[2].hash()));

        view.set_tip(Arc::clone(&main[1]));
        assert_eq!(view.height(), 2);
    }

    #[test]
    fn ancestor_of_active_block_uses_index() {
        let g = genesis();
        let main = extend(&g, 10, 0);
        let view = ChainView::new(Arc::clone(&main[9]));

        let found = view.ancestor(&main[9], 4).unwrap();
        assert_eq!(found.hash(), main[3].hash());
        assert_eq!(view.ancestor(&main[9], 10).unwrap().hash(), main[9].hash());
        assert!(view.ancestor(&main[5], 7).is_none());
    }

    #[test]
    fn ancestor_of_candidate_and_fork() {
        let g = genesis();
        let main = extend(&g, 6, 0);
        let view = ChainView::new(Arc::clone(&main[5]));

        // candidate on top of the tip, not in the view
        let candidate = Arc::new(ChainedBlock::new(
            Header::new(1, main[5].hash(), ZERO_HASH, main[5].time() + 1, 0x207f_ffff, 0),
            Arc::clone(&main[5]),
        ));
        assert_eq!(view.ancestor(&candidate, 2).unwrap().hash(), main[1].hash());

        // fork branching at height 3 must resolve its own blocks
        let fork = extend(&main[2], 3, 9);
        assert_eq!(view.ancestor(&fork[2], 4).unwrap().hash(), fork[0].hash());
        assert_eq!(view.ancestor(&fork[2], 1).unwrap().hash(), main[0].hash());
    }
}
