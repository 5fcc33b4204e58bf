//! Transactions
//!
//! Only what block assembly and structural validation need: outpoints, inputs,
//! outputs and the coinbase script layout carrying the height and extra-nonce.

use crate::constants::SEQUENCE_FINAL;
use crate::Hash;
use crypto_hashes::HashWriter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// COINBASE_TRANSACTION_INDEX is the index of the coinbase transaction in every block
pub const COINBASE_TRANSACTION_INDEX: usize = 0;

/// A 32-byte transaction identifier.
pub type TransactionId = Hash;

/// Reference to an output of a previous transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: TransactionId,
    pub index: u32,
}

impl OutPoint {
    pub fn new(txid: TransactionId, index: u32) -> Self {
        Self { txid, index }
    }

    /// The outpoint spent by a coinbase input.
    pub fn null() -> Self {
        Self { txid: Hash::zeroed(), index: u32::MAX }
    }

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX && self.txid.is_zero()
    }
}

/// Locking script of an output, the payout destination of a coinbase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptPubKey(Vec<u8>);

impl ScriptPubKey {
    pub fn new(script: Vec<u8>) -> Self {
        Self(script)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ScriptPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl FromStr for ScriptPubKey {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxIn {
    pub previous_output: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOut {
    pub value: u64,
    pub script_pubkey: ScriptPubKey,
}

impl TxOut {
    pub fn new(value: u64, script_pubkey: ScriptPubKey) -> Self {
        Self { value, script_pubkey }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    pub fn new(version: u32, inputs: Vec<TxIn>, outputs: Vec<TxOut>, lock_time: u32) -> Self {
        Self { version, inputs, outputs, lock_time }
    }

    /// Builds a coinbase paying `value` to `script_pubkey` at `height`.
    pub fn new_coinbase(height: u64, extra_nonce: u64, value: u64, script_pubkey: ScriptPubKey) -> Self {
        let input = TxIn {
            previous_output: OutPoint::null(),
            script_sig: coinbase_script_sig(height, extra_nonce),
            sequence: SEQUENCE_FINAL,
        };
        Self::new(1, vec![input], vec![TxOut::new(value, script_pubkey)], 0)
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
    }

    /// Total value of all outputs, saturating on overflow.
    pub fn output_value(&self) -> u64 {
        self.outputs.iter().fold(0u64, |acc, out| acc.saturating_add(out.value))
    }

    /// SHA256d over the transaction's canonical encoding.
    pub fn id(&self) -> TransactionId {
        let mut writer = HashWriter::new();
        writer.update(&self.version.to_le_bytes());
        writer.update(&(self.inputs.len() as u32).to_le_bytes());
        for input in &self.inputs {
            writer.update(input.previous_output.txid.as_bytes());
            writer.update(&input.previous_output.index.to_le_bytes());
            writer.update(&(input.script_sig.len() as u32).to_le_bytes());
            writer.update(&input.script_sig);
            writer.update(&input.sequence.to_le_bytes());
        }
        writer.update(&(self.outputs.len() as u32).to_le_bytes());
        for output in &self.outputs {
            writer.update(&output.value.to_le_bytes());
            writer.update(&(output.script_pubkey.as_bytes().len() as u32).to_le_bytes());
            writer.update(output.script_pubkey.as_bytes());
        }
        writer.update(&self.lock_time.to_le_bytes());
        Hash::from(writer.finalize_double())
    }
}

/// Coinbase input script: a push of the block height followed by a push of the
/// extra-nonce, both as minimal little-endian script numbers.
pub fn coinbase_script_sig(height: u64, extra_nonce: u64) -> Vec<u8> {
    let mut script = Vec::with_capacity(18);
    push_script_num(&mut script, height);
    push_script_num(&mut script, extra_nonce);
    script
}

fn push_script_num(script: &mut Vec<u8>, value: u64) {
    if value == 0 {
        // OP_0
        script.push(0x00);
        return;
    }
    let mut bytes = Vec::with_capacity(9);
    let mut v = value;
    while v > 0 {
        bytes.push((v & 0xff) as u8);
        v >>= 8;
    }
    // Script numbers are signed; a set top bit needs an extra zero byte.
    if bytes.last().is_some_and(|b| b & 0x80 != 0) {
        bytes.push(0x00);
    }
    script.push(bytes.len() as u8);
    script.extend_from_slice(&bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coinbase_is_recognised() {
        let cb = Transaction::new_coinbase(1, 0, 50, ScriptPubKey::default());
        assert!(cb.is_coinbase());
        let spend = Transaction::new(
            1,
            vec![TxIn { previous_output: OutPoint::new(cb.id(), 0), script_sig: vec![], sequence: 0 }],
            vec![],
            0,
        );
        assert!(!spend.is_coinbase());
    }

    #[test]
    fn script_sig_encodes_height_and_extra_nonce() {
        assert_eq!(coinbase_script_sig(0, 0), vec![0x00, 0x00]);
        assert_eq!(coinbase_script_sig(1, 2), vec![0x01, 0x01, 0x01, 0x02]);
        // 0x80 needs a sign byte; 500 = 0x01f4 little-endian
        assert_eq!(coinbase_script_sig(0x80, 500), vec![0x02, 0x80, 0x00, 0x02, 0xf4, 0x01]);
    }

    #[test]
    fn extra_nonce_changes_txid() {
        let script = ScriptPubKey::new(vec![0x51]);
        let a = Transaction::new_coinbase(10, 1, 50, script.clone());
        let b = Transaction::new_coinbase(10, 2, 50, script);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn script_pubkey_hex_roundtrip() {
        let script: ScriptPubKey = "76a914".parse().unwrap();
        assert_eq!(script.as_bytes(), &[0x76, 0xa9, 0x14]);
        assert_eq!(script.to_string(), "76a914");
    }
}
