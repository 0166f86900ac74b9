//! Content-Record Issuance & Ownership Ledger
//!
//! This crate implements the record ledger core: admission-controlled
//! issuance of uniquely-identified records wrapping user-supplied content,
//! ownership-transfer bookkeeping, and owner-administered policy.
//!
//! # Invariants
//!
//! - No two live records wrap identical content (fingerprint uniqueness)
//! - Live supply is bounded by the configured max supply
//! - No holder exceeds the per-holder holding cap
//! - Every operation is all-or-nothing: a failed check leaves no partial state
//!
//! # Key Types
//!
//! - [`RecordLedger`]: the coordinating ledger, composing every component by
//!   explicit delegation
//! - [`LedgerService`]: single-writer async wrapper with event publishing
//! - [`IssuancePolicy`] / [`LedgerConfig`]: the admission gate and its knobs
//! - [`LedgerEvent`]: structured notifications for the client layer
//!
//! # Execution model
//!
//! The core is synchronous and single-writer. Shared access is serialized
//! through one mutation lock in [`LedgerService`]; invariants span multiple
//! indices, so there is deliberately no per-field locking.

pub mod access;
pub mod content_index;
pub mod errors;
pub mod events;
pub mod fingerprint;
pub mod ledger;
pub mod notify;
pub mod ownership;
pub mod policy;
pub mod records;
pub mod service;
pub mod vault;

pub use access::AccessController;
pub use content_index::ContentIndex;
pub use errors::{LedgerError, LedgerResult};
pub use events::{LedgerEvent, PolicyParameter};
pub use fingerprint::fingerprint_content;
pub use ledger::{LedgerStats, RecordLedger};
pub use notify::{CapturingListener, LedgerEventListener, LedgerEventPublisher};
pub use ownership::OwnershipLedger;
pub use policy::{IssuancePolicy, LedgerConfig};
pub use records::{Record, RecordStore};
pub use service::LedgerService;
pub use vault::{FundsTransfer, FundsVault, PendingWithdrawal, VaultEntry, VaultEntryKind};
