//! Ledger Event Types
//!
//! Every mutating operation emits a structured event carrying the relevant
//! identifiers and before/after values. Events are consumable by the
//! excluded client layer for indexing and UI; the core never depends on a
//! listener's behavior.

use serde::{Deserialize, Serialize};

use lib_types::{Address, Amount, Fingerprint, RecordId, Timestamp};

/// Which policy parameter an administrative change touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyParameter {
    Fee,
    MaxSupply,
    MaxBatchSize,
    MaxContentLength,
    MaxHoldingPerHolder,
}

impl PolicyParameter {
    /// Stable string name for logs and client-side indexing
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyParameter::Fee => "fee",
            PolicyParameter::MaxSupply => "max_supply",
            PolicyParameter::MaxBatchSize => "max_batch_size",
            PolicyParameter::MaxContentLength => "max_content_length",
            PolicyParameter::MaxHoldingPerHolder => "max_holding_per_holder",
        }
    }
}

/// Ledger-level events that clients can subscribe to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// New record admitted and created
    RecordMinted {
        id: RecordId,
        creator: Address,
        fingerprint: Fingerprint,
        fee_paid: Amount,
        timestamp: Timestamp,
    },

    /// Content fetched; view counter advanced
    ContentViewed { id: RecordId, views: u64 },

    /// Ownership reassigned
    RecordTransferred {
        id: RecordId,
        from: Address,
        to: Address,
    },

    /// Active flag toggled
    StatusChanged { id: RecordId, active: bool },

    /// Record destroyed; its fingerprint is freed for re-minting
    RecordDestroyed {
        id: RecordId,
        holder: Address,
        fingerprint: Fingerprint,
    },

    /// Administrative policy change (before/after values)
    ParameterChanged {
        parameter: PolicyParameter,
        old: u128,
        new: u128,
    },

    /// Pause gate flipped
    PauseStateChanged { paused: bool },

    /// Vault funds moved out
    FundsWithdrawn {
        to: Address,
        amount: Amount,
        emergency: bool,
    },
}

impl LedgerEvent {
    /// The record this event concerns, if any
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            LedgerEvent::RecordMinted { id, .. }
            | LedgerEvent::ContentViewed { id, .. }
            | LedgerEvent::RecordTransferred { id, .. }
            | LedgerEvent::StatusChanged { id, .. }
            | LedgerEvent::RecordDestroyed { id, .. } => Some(*id),
            _ => None,
        }
    }
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerEvent::RecordMinted { id, creator, .. } => {
                write!(f, "RecordMinted(id={}, creator={:?})", id, creator)
            }
            LedgerEvent::ContentViewed { id, views } => {
                write!(f, "ContentViewed(id={}, views={})", id, views)
            }
            LedgerEvent::RecordTransferred { id, from, to } => {
                write!(f, "RecordTransferred(id={}, {:?}->{:?})", id, from, to)
            }
            LedgerEvent::StatusChanged { id, active } => {
                write!(f, "StatusChanged(id={}, active={})", id, active)
            }
            LedgerEvent::RecordDestroyed { id, .. } => write!(f, "RecordDestroyed(id={})", id),
            LedgerEvent::ParameterChanged { parameter, old, new } => {
                write!(f, "ParameterChanged({}: {}->{})", parameter.as_str(), old, new)
            }
            LedgerEvent::PauseStateChanged { paused } => {
                write!(f, "PauseStateChanged(paused={})", paused)
            }
            LedgerEvent::FundsWithdrawn { amount, emergency, .. } => {
                write!(f, "FundsWithdrawn(amount={}, emergency={})", amount, emergency)
            }
        }
    }
}
