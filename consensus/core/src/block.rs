use serde::{Deserialize, Serialize};

use crate::{errors::ConsensusError, header::Header, tx::Transaction, Hash};

/// Complete block structure including header and transactions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Block header containing metadata and parent information
    pub header: Header,
    /// List of transactions in the block, coinbase first
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Creates a new block with the given header and transactions
    pub fn new(header: Header, transactions: Vec<Transaction>) -> Self {
        Self { header, transactions }
    }

    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Merkle root over the transaction ids
    pub fn merkle_root(&self) -> Hash {
        let ids: Vec<Hash> = self.transactions.iter().map(Transaction::id).collect();
        crypto_hashes::merkle_root(&ids)
    }

    /// Recomputes the header's merkle root after the transaction list changed.
    pub fn update_merkle_root(&mut self) {
        self.header.hash_merkle_root = self.merkle_root();
    }

    pub fn coinbase(&self) -> Option<&Transaction> {
        self.transactions.first().filter(|tx| tx.is_coinbase())
    }

    /// Context-free checks: exactly one coinbase, in first position, and a
    /// header merkle root that commits to the transactions.
    pub fn check_structure(&self) -> Result<(), ConsensusError> {
        if self.transactions.is_empty() {
            return Err(ConsensusError::EmptyTransactionList);
        }

        if !self.transactions[0].is_coinbase() || self.transactions[1..].iter().any(Transaction::is_coinbase) {
            return Err(ConsensusError::InvalidCoinbaseTransaction);
        }

        if self.merkle_root() != self.header.hash_merkle_root {
            return Err(ConsensusError::InvalidMerkleRoot);
        }

        Ok(())
    }
}
