use std::collections::HashMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// One miner's accumulated claim balance, keyed by the miner's public key in
/// the containing ledger.
#[derive(
    BorshSerialize, BorshDeserialize, Serialize, Deserialize, Debug, Clone, PartialEq, Eq,
)]
pub struct MinerRecord {
    /// Raw 32-byte public key of the miner.
    pub owner: [u8; 32],
    pub token_balance: u64,
}

/// The on-chain miner dictionary container.
///
/// Borsh encodes the map as a u32 length followed by key/value pairs in key
/// order, so encoding is deterministic for a given set of miners.
#[derive(
    BorshSerialize, BorshDeserialize, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq,
)]
pub struct MinerLedger {
    pub count: u32,
    pub miners: HashMap<[u8; 32], MinerRecord>,
}

impl MinerLedger {
    /// Serialized size of an empty miner ledger; sizes the holder account.
    pub const BASE_SIZE: usize = 8;

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        borsh::to_vec(self).map_err(|e| CodecError::Unrepresentable(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::try_from_slice(bytes).map_err(|e| CodecError::MalformedLedger(e.to_string()))
    }
}
