//! Issuance Policy - Admission Gate Parameters
//!
//! Stateful admission gate consulted before any new record is admitted:
//! current fee, max total supply, max batch size, max content length, max
//! per-holder holding. Checks are pure reads; setters are owner-only
//! (enforced at the ledger) and validated here.

use serde::{Deserialize, Serialize};

use lib_types::Amount;

use crate::errors::{LedgerError, LedgerResult};

// =============================================================================
// DEFAULTS
// =============================================================================

/// Default mint fee per record
pub const DEFAULT_FEE: Amount = 10;

/// Default maximum live supply
pub const DEFAULT_MAX_SUPPLY: u64 = 10_000;

/// Default maximum records per batch mint
pub const DEFAULT_MAX_BATCH_SIZE: usize = 20;

/// Default maximum content length in bytes
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 4_096;

/// Default maximum records held by one identity
pub const DEFAULT_MAX_HOLDING_PER_HOLDER: u64 = 100;

/// Initial policy parameters for a new ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Mint fee per record
    pub fee: Amount,
    /// Maximum live supply
    pub max_supply: u64,
    /// Maximum records per batch mint
    pub max_batch_size: usize,
    /// Maximum content length in bytes
    pub max_content_length: usize,
    /// Maximum records held by one identity
    pub max_holding_per_holder: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            fee: DEFAULT_FEE,
            max_supply: DEFAULT_MAX_SUPPLY,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_holding_per_holder: DEFAULT_MAX_HOLDING_PER_HOLDER,
        }
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// Current admission parameters
///
/// Every admission reads these values atomically with the admission it
/// gates; the ledger's single mutation lock guarantees no setter interleaves
/// with a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuancePolicy {
    fee: Amount,
    max_supply: u64,
    max_batch_size: usize,
    max_content_length: usize,
    max_holding_per_holder: u64,
}

impl IssuancePolicy {
    /// Build the policy from its initial configuration
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            fee: config.fee,
            max_supply: config.max_supply,
            max_batch_size: config.max_batch_size,
            max_content_length: config.max_content_length,
            max_holding_per_holder: config.max_holding_per_holder,
        }
    }

    // =========================================================================
    // Checks
    // =========================================================================

    /// Fee gate: `paid` must cover `fee × count`
    pub fn check_fee(&self, paid: Amount, count: u64) -> LedgerResult<()> {
        let required = self
            .fee
            .checked_mul(count as Amount)
            .ok_or(LedgerError::Overflow)?;
        if paid < required {
            return Err(LedgerError::InsufficientPayment { paid, required });
        }
        Ok(())
    }

    /// Supply gate: live count plus `count` must stay within max supply
    pub fn check_supply(&self, live: u64, count: u64) -> LedgerResult<()> {
        let would_have = live.checked_add(count).ok_or(LedgerError::Overflow)?;
        if would_have > self.max_supply {
            return Err(LedgerError::SupplyExceeded {
                max: self.max_supply,
                would_have,
            });
        }
        Ok(())
    }

    /// Batch-size gate: non-empty and within the configured maximum
    pub fn check_batch(&self, count: usize) -> LedgerResult<()> {
        if count == 0 {
            return Err(LedgerError::EmptyBatch);
        }
        if count > self.max_batch_size {
            return Err(LedgerError::BatchTooLarge {
                len: count,
                max: self.max_batch_size,
            });
        }
        Ok(())
    }

    /// Holding gate: holder's count plus `count` must stay within the cap
    pub fn check_holding(&self, held: u64, count: u64) -> LedgerResult<()> {
        let would_have = held.checked_add(count).ok_or(LedgerError::Overflow)?;
        if would_have > self.max_holding_per_holder {
            return Err(LedgerError::HoldingExceeded {
                max: self.max_holding_per_holder,
                would_have,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current mint fee per record
    pub fn fee(&self) -> Amount {
        self.fee
    }

    /// Current maximum live supply
    pub fn max_supply(&self) -> u64 {
        self.max_supply
    }

    /// Current maximum batch size
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Current maximum content length
    pub fn max_content_length(&self) -> usize {
        self.max_content_length
    }

    /// Current per-holder holding cap
    pub fn max_holding_per_holder(&self) -> u64 {
        self.max_holding_per_holder
    }

    // =========================================================================
    // Setters (owner-only; authorization enforced at the ledger)
    // =========================================================================

    /// Set the mint fee. Returns (old, new) for the change notification.
    pub fn set_fee(&mut self, fee: Amount) -> (Amount, Amount) {
        let old = self.fee;
        self.fee = fee;
        (old, fee)
    }

    /// Set the maximum supply
    ///
    /// # Errors
    /// `MustBePositive` on zero; `SupplyTooLow` if below the current live count.
    pub fn set_max_supply(&mut self, max_supply: u64, live: u64) -> LedgerResult<(u64, u64)> {
        if max_supply == 0 {
            return Err(LedgerError::MustBePositive("max supply"));
        }
        if max_supply < live {
            return Err(LedgerError::SupplyTooLow {
                live,
                requested: max_supply,
            });
        }
        let old = self.max_supply;
        self.max_supply = max_supply;
        Ok((old, max_supply))
    }

    /// Set the maximum batch size
    pub fn set_max_batch_size(&mut self, max_batch_size: usize) -> LedgerResult<(usize, usize)> {
        if max_batch_size == 0 {
            return Err(LedgerError::MustBePositive("max batch size"));
        }
        let old = self.max_batch_size;
        self.max_batch_size = max_batch_size;
        Ok((old, max_batch_size))
    }

    /// Set the maximum content length
    pub fn set_max_content_length(
        &mut self,
        max_content_length: usize,
    ) -> LedgerResult<(usize, usize)> {
        if max_content_length == 0 {
            return Err(LedgerError::MustBePositive("max content length"));
        }
        let old = self.max_content_length;
        self.max_content_length = max_content_length;
        Ok((old, max_content_length))
    }

    /// Set the per-holder holding cap
    pub fn set_max_holding_per_holder(&mut self, max_holding: u64) -> LedgerResult<(u64, u64)> {
        if max_holding == 0 {
            return Err(LedgerError::MustBePositive("max holding per holder"));
        }
        let old = self.max_holding_per_holder;
        self.max_holding_per_holder = max_holding;
        Ok((old, max_holding))
    }
}
