use devhub_state::DeviceRecord;

use crate::error::{LedgerSdkError, Result};

/// Opcode dispatched by the program for a device registration.
pub const REGISTER_OPCODE: u8 = 0;
/// Opcode dispatched by the program for a token charge.
pub const CHARGE_OPCODE: u8 = 1;
/// Opcode dispatched by the program for a mining claim.
pub const MINE_OPCODE: u8 = 2;

/// A mutating ledger operation, one variant per program opcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    /// Append a device record to the device list.
    Register(DeviceRecord),
    /// Credit tokens to a registered device. The wire amount is a single
    /// byte; larger amounts fail encoding instead of truncating.
    ChargeToken { mac_address: String, amount: u64 },
    /// Claim one token unit from a device into the caller's miner entry.
    MineToken { mac_address: String },
}

impl LedgerCommand {
    pub fn opcode(&self) -> u8 {
        match self {
            LedgerCommand::Register(_) => REGISTER_OPCODE,
            LedgerCommand::ChargeToken { .. } => CHARGE_OPCODE,
            LedgerCommand::MineToken { .. } => MINE_OPCODE,
        }
    }

    /// Encode the opcode-prefixed instruction payload.
    ///
    /// The payload is self-delimiting: the program derives field widths from
    /// the schema, there is no separate length header.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            LedgerCommand::Register(record) => {
                let body = record
                    .encode()
                    .map_err(|e| LedgerSdkError::EncodingError(e.to_string()))?;
                let mut data = Vec::with_capacity(1 + body.len());
                data.push(REGISTER_OPCODE);
                data.extend_from_slice(&body);
                Ok(data)
            }
            LedgerCommand::ChargeToken {
                mac_address,
                amount,
            } => {
                let amount = u8::try_from(*amount).map_err(|_| {
                    LedgerSdkError::EncodingError(format!(
                        "charge amount {amount} exceeds the single-byte wire range"
                    ))
                })?;
                let mut data = Vec::with_capacity(2 + mac_address.len());
                data.push(CHARGE_OPCODE);
                data.extend_from_slice(mac_address.as_bytes());
                data.push(amount);
                Ok(data)
            }
            LedgerCommand::MineToken { mac_address } => {
                let mut data = Vec::with_capacity(1 + mac_address.len());
                data.push(MINE_OPCODE);
                data.extend_from_slice(mac_address.as_bytes());
                Ok(data)
            }
        }
    }
}
