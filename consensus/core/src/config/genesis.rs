use crate::config::params::{ConsensusParams, Network};
use crate::constants::SEQUENCE_FINAL;
use crate::tx::{OutPoint, ScriptPubKey, Transaction, TxIn, TxOut};
use crate::{Block, Header, ZERO_HASH};

static COINBASE_MESSAGE: &[u8] = b"The Times 03/Jan/2009 Chancellor on brink of second bailout for banks";

/// The constants uniquely representing the genesis block of a network
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisBlock {
    pub version: u32,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    pub reward: u64,
}

impl GenesisBlock {
    pub fn for_network(network: Network) -> Self {
        let reward = ConsensusParams::for_network(network).initial_subsidy;
        match network {
            Network::Mainnet => Self { version: 1, time: 1_231_006_505, bits: 0x1d00_ffff, nonce: 2_083_236_893, reward },
            Network::Testnet => Self { version: 1, time: 1_296_688_602, bits: 0x1d00_ffff, nonce: 414_098_458, reward },
            Network::Regtest => Self { version: 1, time: 1_296_688_602, bits: 0x207f_ffff, nonce: 2, reward },
        }
    }

    pub fn build_genesis_transactions(&self) -> Vec<Transaction> {
        let mut script_sig = vec![0x04, 0xff, 0xff, 0x00, 0x1d, 0x01, 0x04, COINBASE_MESSAGE.len() as u8];
        script_sig.extend_from_slice(COINBASE_MESSAGE);
        let input = TxIn { previous_output: OutPoint::null(), script_sig, sequence: SEQUENCE_FINAL };
        let output = TxOut::new(self.reward, ScriptPubKey::default());
        vec![Transaction::new(1, vec![input], vec![output], 0)]
    }
}

impl From<&GenesisBlock> for Block {
    fn from(genesis: &GenesisBlock) -> Self {
        let header = Header::new(genesis.version, ZERO_HASH, ZERO_HASH, genesis.time, genesis.bits, genesis.nonce);
        let mut block = Block::new(header, genesis.build_genesis_transactions());
        block.update_merkle_root();
        block
    }
}

/// Genesis block of `network`.
pub fn genesis_block(network: Network) -> Block {
    Block::from(&GenesisBlock::for_network(network))
}
