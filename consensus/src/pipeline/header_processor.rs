//! Header processor for consensus
//!
//! Contextual header checks for a block that extends a known parent.

use consensus_core::errors::ConsensusError;
use consensus_core::{ChainAncestry, ChainedBlock, ConsensusParams};
use consensus_pow::{check_proof_of_work, get_work_required};

pub struct HeaderProcessor {
    params: ConsensusParams,
}

impl HeaderProcessor {
    pub fn new(params: ConsensusParams) -> Self {
        Self { params }
    }

    /// Checks the header of `candidate` against its parent: timestamp after
    /// the parent, difficulty bits as retargeting requires and a hash meeting
    /// those bits.
    pub fn validate_header<A>(&self, candidate: &ChainedBlock, ancestry: &A) -> Result<(), ConsensusError>
    where
        A: ChainAncestry + ?Sized,
    {
        let header = candidate.header();
        let Some(previous) = candidate.previous() else {
            return Err(ConsensusError::InvalidBlockParent(header.hash_prev_block));
        };

        if header.time <= previous.time() {
            return Err(ConsensusError::InvalidTimestamp { time: header.time, previous_time: previous.time() });
        }

        let expected = get_work_required(&self.params, candidate, ancestry)
            .map_err(|e| ConsensusError::Difficulty(e.to_string()))?
            .to_compact();
        if header.bits != expected {
            return Err(ConsensusError::BadDifficultyBits { expected, found: header.bits });
        }

        check_proof_of_work(&candidate.hash(), header.bits, self.params.pow_limit)
            .map_err(|e| ConsensusError::InvalidProofOfWork(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::{Header, WalkAncestry, ZERO_HASH};
    use std::sync::Arc;

    fn regtest_tip() -> Arc<ChainedBlock> {
        Arc::new(ChainedBlock::genesis(Header::new(1, ZERO_HASH, ZERO_HASH, 1_000, 0x207f_ffff, 0)))
    }

    /// Smallest nonce making `header` meet its bits.
    fn solved(mut header: Header, previous: &Arc<ChainedBlock>) -> ChainedBlock {
        let limit = ConsensusParams::regtest().pow_limit;
        while check_proof_of_work(&header.hash(), header.bits, limit).is_err() {
            header.nonce += 1;
        }
        ChainedBlock::new(header, Arc::clone(previous))
    }

    #[test]
    fn accepts_valid_header() {
        let processor = HeaderProcessor::new(ConsensusParams::regtest());
        let tip = regtest_tip();
        let candidate = solved(Header::new(1, tip.hash(), ZERO_HASH, 1_001, 0x207f_ffff, 0), &tip);
        assert_eq!(processor.validate_header(&candidate, &WalkAncestry), Ok(()));
    }

    #[test]
    fn rejects_timestamp_not_after_parent() {
        let processor = HeaderProcessor::new(ConsensusParams::regtest());
        let tip = regtest_tip();
        let candidate = solved(Header::new(1, tip.hash(), ZERO_HASH, 1_000, 0x207f_ffff, 0), &tip);
        assert_eq!(
            processor.validate_header(&candidate, &WalkAncestry),
            Err(ConsensusError::InvalidTimestamp { time: 1_000, previous_time: 1_000 })
        );
    }

    #[test]
    fn rejects_wrong_bits() {
        let processor = HeaderProcessor::new(ConsensusParams::regtest());
        let tip = regtest_tip();
        let candidate = solved(Header::new(1, tip.hash(), ZERO_HASH, 1_001, 0x207f_fffe, 0), &tip);
        assert_eq!(
            processor.validate_header(&candidate, &WalkAncestry),
            Err(ConsensusError::BadDifficultyBits { expected: 0x207f_ffff, found: 0x207f_fffe })
        );
    }

    #[test]
    fn rejects_insufficient_work() {
        let processor = HeaderProcessor::new(ConsensusParams::regtest());
        let tip = regtest_tip();
        let limit = ConsensusParams::regtest().pow_limit;
        let mut header = Header::new(1, tip.hash(), ZERO_HASH, 1_001, 0x207f_ffff, 0);
        while check_proof_of_work(&header.hash(), header.bits, limit).is_ok() {
            header.nonce += 1;
        }
        let candidate = ChainedBlock::new(header, Arc::clone(&tip));
        assert!(matches!(
            processor.validate_header(&candidate, &WalkAncestry),
            Err(ConsensusError::InvalidProofOfWork(_))
        ));
    }

    #[test]
    fn rejects_header_without_parent() {
        let processor = HeaderProcessor::new(ConsensusParams::regtest());
        assert!(matches!(
            processor.validate_header(&regtest_tip(), &WalkAncestry),
            Err(ConsensusError::InvalidBlockParent(_))
        ));
    }
}
