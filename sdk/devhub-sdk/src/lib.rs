pub mod client;
pub mod command;
pub mod core;
pub mod error;
pub mod instructions;
pub mod utils;

pub use crate::client::{LedgerAccounts, LedgerClient, SetupStage};
pub use crate::command::LedgerCommand;
pub use crate::core::connection::{ClientConfig, RpcConnection, SolConnection};
pub use crate::core::constants::{DEVICE_LIST_SEED, MINER_LIST_SEED};
pub use crate::error::{LedgerSdkError, Result};
pub use crate::utils::{
    derive_device_list_address, derive_holder_address, derive_miner_list_address,
    fetch_device_ledger, fetch_miner_ledger,
};

pub mod state {
    pub use devhub_state::{CodecError, DeviceLedger, DeviceRecord, MinerLedger, MinerRecord};
}
