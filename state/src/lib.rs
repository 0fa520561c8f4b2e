//! Shared account-state definitions for the DevHub device ledger.
//!
//! Everything here is pure data transformation: the wire layout of the two
//! ledger accounts and the records they contain. No account addresses, no
//! transport.

pub mod device;
pub mod error;
pub mod miner;

pub use crate::device::{DeviceLedger, DeviceRecord};
pub use crate::error::CodecError;
pub use crate::miner::{MinerLedger, MinerRecord};
