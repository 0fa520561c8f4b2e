use devhub_state::{DeviceLedger, MinerLedger};
use solana_sdk::pubkey::Pubkey;

use crate::core::connection::SolConnection;
use crate::core::constants::{DEVICE_LIST_SEED, MINER_LIST_SEED};
use crate::error::{LedgerSdkError, Result};

//=============================================================================
// Holder Address Derivation
//=============================================================================

/// Derive a shared holder account address from the authority key, a seed
/// string, and the owning program.
///
/// Deterministic and side-effect free; safe to call before a connection
/// exists. Seed-length validation is the runtime's (`MAX_SEED_LEN`); a
/// rejected seed surfaces as `InvalidSeed`.
pub fn derive_holder_address(
    authority: &Pubkey,
    seed: &str,
    program_id: &Pubkey,
) -> Result<Pubkey> {
    Pubkey::create_with_seed(authority, seed, program_id).map_err(|e| {
        LedgerSdkError::InvalidSeed {
            seed: seed.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Derive the device list holder address for an authority.
pub fn derive_device_list_address(authority: &Pubkey, program_id: &Pubkey) -> Result<Pubkey> {
    derive_holder_address(authority, DEVICE_LIST_SEED, program_id)
}

/// Derive the miner list holder address for an authority.
pub fn derive_miner_list_address(authority: &Pubkey, program_id: &Pubkey) -> Result<Pubkey> {
    derive_holder_address(authority, MINER_LIST_SEED, program_id)
}

//=============================================================================
// Account Fetching & Decoding
//=============================================================================

/// Fetch a ledger account's raw bytes.
pub async fn fetch_ledger_account(
    connection: &impl SolConnection,
    address: &Pubkey,
) -> Result<Vec<u8>> {
    let account = connection
        .get_account(address)
        .await
        .map_err(|e| LedgerSdkError::Connection(e.to_string()))?
        .ok_or(LedgerSdkError::LedgerAccountMissing(*address))?;
    Ok(account.data)
}

/// Fetch and decode the device list account.
pub async fn fetch_device_ledger(
    connection: &impl SolConnection,
    address: &Pubkey,
) -> Result<DeviceLedger> {
    let data = fetch_ledger_account(connection, address).await?;
    DeviceLedger::decode(&data).map_err(LedgerSdkError::MalformedLedger)
}

/// Fetch and decode the miner list account.
pub async fn fetch_miner_ledger(
    connection: &impl SolConnection,
    address: &Pubkey,
) -> Result<MinerLedger> {
    let data = fetch_ledger_account(connection, address).await?;
    MinerLedger::decode(&data).map_err(LedgerSdkError::MalformedLedger)
}
