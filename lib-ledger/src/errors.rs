//! Record Ledger Errors
//!
//! Every failure in the core is a local validation failure: the operation is
//! rejected as a whole with no partial state change, and nothing is retried.

use lib_types::{Amount, Fingerprint, RecordId};
use thiserror::Error;

/// Error during ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // =========================================================================
    // Admission errors (caller input)
    // =========================================================================
    #[error("Insufficient payment: paid {paid}, required {required}")]
    InsufficientPayment { paid: Amount, required: Amount },

    #[error("Content cannot be empty")]
    ContentEmpty,

    #[error("Content too long: {len} bytes, max {max}")]
    ContentTooLong { len: usize, max: usize },

    #[error("Title cannot be empty")]
    TitleEmpty,

    #[error("Metadata reference cannot be empty")]
    MetadataEmpty,

    #[error("Duplicate content: fingerprint {0} already registered")]
    DuplicateContent(Fingerprint),

    #[error("Supply cap exceeded: max {max}, would have {would_have}")]
    SupplyExceeded { max: u64, would_have: u64 },

    #[error("Holding cap exceeded: max {max}, would hold {would_have}")]
    HoldingExceeded { max: u64, would_have: u64 },

    #[error("Empty batch")]
    EmptyBatch,

    #[error("Batch too large: {len} items, max {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("Batch input arrays have mismatched lengths")]
    ArrayLengthMismatch,

    // =========================================================================
    // Authorization errors
    // =========================================================================
    #[error("Caller is not the holder of record {0}")]
    NotOwner(RecordId),

    #[error("Not authorized")]
    NotAuthorized,

    #[error("Contract is paused")]
    ContractPaused,

    #[error("Contract is already paused")]
    AlreadyPaused,

    #[error("Contract is not paused")]
    NotPaused,

    // =========================================================================
    // Lookup errors
    // =========================================================================
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("Invalid address: zero identity")]
    InvalidAddress,

    // =========================================================================
    // Resource errors
    // =========================================================================
    #[error("Nothing to withdraw")]
    NothingToWithdraw,

    #[error("Insufficient vault balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Amount must be positive")]
    AmountMustBePositive,

    #[error("Withdrawal already in progress")]
    WithdrawalInProgress,

    #[error("Withdrawal failed: {0}")]
    WithdrawalFailed(String),

    #[error("New max supply {requested} is below current live supply {live}")]
    SupplyTooLow { live: u64, requested: u64 },

    #[error("{0} must be positive")]
    MustBePositive(&'static str),

    #[error("Arithmetic overflow")]
    Overflow,
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
