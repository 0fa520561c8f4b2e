use devhub_state::{DeviceLedger, MinerLedger};

/// Seed for the shared device list holder account.
pub const DEVICE_LIST_SEED: &str = "deviceholderpda";

/// Seed for the shared miner list holder account.
pub const MINER_LIST_SEED: &str = "minerholderpda";

/// Allocation size of a freshly created device list holder account. Capacity
/// growth past this is the program's concern.
pub const DEVICE_LIST_SPACE: u64 = DeviceLedger::BASE_SIZE as u64;

/// Allocation size of a freshly created miner list holder account.
pub const MINER_LIST_SPACE: u64 = MinerLedger::BASE_SIZE as u64;

/// Lamports reserved on top of rent exemption when funding the payer,
/// covering roughly a hundred transaction signatures.
pub const SIGNATURE_FEE_ALLOWANCE: u64 = 100 * 5_000;
