use thiserror::Error;

/// Error types for the ledger wire codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Buffer does not decode as the declared schema: truncated string,
    /// bad count, or trailing bytes.
    #[error("malformed ledger data: {0}")]
    MalformedLedger(String),

    /// Value cannot be represented in the fixed wire layout.
    #[error("unrepresentable value: {0}")]
    Unrepresentable(String),
}
