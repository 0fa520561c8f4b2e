use devhub_state::CodecError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::client::SetupStage;

/// SDK-specific error types for ledger operations.
///
/// Codec and builder errors (`MalformedLedger`, `InvalidSeed`,
/// `EncodingError`) are deterministic protocol-contract violations and must
/// abort the calling operation; only the caller decides whether network
/// failures are worth retrying.
#[derive(Debug, Error)]
pub enum LedgerSdkError {
    /// Connection or RPC error outside of command submission
    #[error("Connection error: {0}")]
    Connection(String),

    /// Ledger account data violates the wire schema
    #[error("Malformed ledger: {0}")]
    MalformedLedger(CodecError),

    /// Seed rejected by the address-derivation scheme
    #[error("Invalid seed '{seed}': {reason}")]
    InvalidSeed { seed: String, reason: String },

    /// A command field cannot be represented in its wire layout
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Operation invoked before the required setup stage
    #[error("Client not ready: requires {required:?}, currently {current:?}")]
    NotReady {
        required: SetupStage,
        current: SetupStage,
    },

    /// Expected shared ledger account has not been created yet
    #[error("Ledger account missing: {0}")]
    LedgerAccountMissing(Pubkey),

    /// Ledger program account does not exist on this cluster
    #[error("Program not deployed: {0}")]
    ProgramNotDeployed(Pubkey),

    /// Ledger program account exists but is not executable
    #[error("Program not executable: {0}")]
    ProgramNotExecutable(Pubkey),

    /// Network or consensus failure while submitting a transaction
    #[error("Submission failed during {step}: {reason}")]
    SubmissionFailed { step: &'static str, reason: String },
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, LedgerSdkError>;
