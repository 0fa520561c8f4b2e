use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// One physical device's ledger entry.
///
/// Field order and width are the wire contract with the on-chain program:
/// strings are 4-byte little-endian length + UTF-8 bytes, integers are
/// fixed-width little-endian. Reordering or widening a field silently
/// corrupts every decode on the other side.
#[derive(
    BorshSerialize, BorshDeserialize, Serialize, Deserialize, Debug, Clone, PartialEq, Eq,
)]
pub struct DeviceRecord {
    /// Device beacon MAC address; unique key within the list. Uniqueness is
    /// enforced by the program, not by the client.
    pub mac_address: String,
    /// Base58 string form of the controlling account's public key.
    pub owner: String,
    pub token_balance: u64,
    /// Registration time, Unix seconds.
    pub registration_time: u64,
    pub merchant: String,
    pub longitude: String,
    pub latitude: String,
}

impl DeviceRecord {
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        borsh::to_vec(self).map_err(|e| CodecError::Unrepresentable(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::try_from_slice(bytes).map_err(|e| CodecError::MalformedLedger(e.to_string()))
    }
}

/// The full on-chain device list container.
#[derive(
    BorshSerialize, BorshDeserialize, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq,
)]
pub struct DeviceLedger {
    /// Number of registrations; doubles as a monotonic registration counter.
    pub count: u32,
    /// Insertion order is registration order.
    pub entries: Vec<DeviceRecord>,
}

impl DeviceLedger {
    /// Serialized size of an empty ledger (`u32` count + `u32` vec length).
    /// The backing account is allocated at exactly this size, and a fresh
    /// zero-filled account decodes as an empty ledger.
    pub const BASE_SIZE: usize = 8;

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        borsh::to_vec(self).map_err(|e| CodecError::Unrepresentable(e.to_string()))
    }

    /// Decode a ledger account's full data. Trailing bytes inconsistent with
    /// the declared count are an error, never silently dropped.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::try_from_slice(bytes).map_err(|e| CodecError::MalformedLedger(e.to_string()))
    }
}
