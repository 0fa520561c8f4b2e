use std::str::FromStr;

use devhub_state::DeviceRecord;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use crate::command::LedgerCommand;
use crate::error::{LedgerSdkError, Result};

// The program walks its account list positionally; the order and mutability
// flags below are the contract, and reordering is a silent protocol break.

pub fn register_device(
    program_id: &Pubkey,
    authority: &Pubkey,
    device_list: &Pubkey,
    owner: &Pubkey,
    record: &DeviceRecord,
) -> Result<Instruction> {
    let data = LedgerCommand::Register(record.clone()).encode()?;
    let accounts = vec![
        AccountMeta::new(*authority, false),
        AccountMeta::new(*device_list, false),
        AccountMeta::new(*owner, false),
    ];
    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

pub fn charge_token(
    program_id: &Pubkey,
    authority: &Pubkey,
    device_list: &Pubkey,
    mac_address: &str,
    amount: u64,
) -> Result<Instruction> {
    let data = LedgerCommand::ChargeToken {
        mac_address: mac_address.to_string(),
        amount,
    }
    .encode()?;
    let accounts = vec![
        AccountMeta::new(*authority, false),
        AccountMeta::new(*device_list, false),
    ];
    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

pub fn mine_token(
    program_id: &Pubkey,
    authority: &Pubkey,
    miner_list: &Pubkey,
    device_list: &Pubkey,
    mac_address: &str,
) -> Result<Instruction> {
    let data = LedgerCommand::MineToken {
        mac_address: mac_address.to_string(),
    }
    .encode()?;
    let accounts = vec![
        AccountMeta::new(*authority, false),
        AccountMeta::new(*miner_list, false),
        AccountMeta::new(*device_list, false),
    ];
    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Resolve a command against the session's account refs.
///
/// For `Register`, the third account is the record's `owner` field parsed as
/// a base58 key; a record whose owner does not parse cannot be represented
/// as a valid instruction.
pub fn build_command(
    command: &LedgerCommand,
    program_id: &Pubkey,
    authority: &Pubkey,
    device_list: &Pubkey,
    miner_list: &Pubkey,
) -> Result<Instruction> {
    match command {
        LedgerCommand::Register(record) => {
            let owner = Pubkey::from_str(&record.owner).map_err(|e| {
                LedgerSdkError::EncodingError(format!(
                    "owner '{}' is not a valid base58 key: {e}",
                    record.owner
                ))
            })?;
            register_device(program_id, authority, device_list, &owner, record)
        }
        LedgerCommand::ChargeToken {
            mac_address,
            amount,
        } => charge_token(program_id, authority, device_list, mac_address, *amount),
        LedgerCommand::MineToken { mac_address } => {
            mine_token(program_id, authority, miner_list, device_list, mac_address)
        }
    }
}
