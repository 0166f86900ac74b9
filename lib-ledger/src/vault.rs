//! Funds Vault - Payment Accumulation and Guarded Withdrawal
//!
//! Accumulates mint payments and exposes owner-only withdrawal with
//! reentrancy-safe transfer semantics. The external transfer is the only
//! boundary call in the core, so the withdrawal is split in two phases:
//!
//! 1. `begin_withdraw` validates, acquires the guard, and reports the amount
//!    to move. The tracked balance is NOT yet decremented.
//! 2. The caller performs the external transfer through [`FundsTransfer`].
//! 3. `finish_withdraw` releases the guard and, only on transfer success,
//!    decrements the balance and appends the audit entry.
//!
//! A reentrant `begin_withdraw` while the guard is held fails immediately
//! with `WithdrawalInProgress` rather than blocking; a failed transfer
//! leaves the tracked balance untouched.

use serde::{Deserialize, Serialize};

use lib_types::{Address, Amount, Timestamp};

use crate::errors::{LedgerError, LedgerResult};

/// Boundary trait for moving funds out of the core
///
/// Implementations are provided by the excluded client/deployment layer.
/// A returned error aborts the withdrawal with `WithdrawalFailed`.
pub trait FundsTransfer {
    /// Transfer `amount` to `to`; an `Err` description aborts the withdrawal
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), String>;
}

/// Direction of a vault audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEntryKind {
    /// Mint payment received
    Deposit,
    /// Full-balance withdrawal by the owner
    Withdrawal,
    /// Partial withdrawal by the owner
    EmergencyWithdrawal,
}

/// One line of the vault audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEntry {
    pub kind: VaultEntryKind,
    pub amount: Amount,
    pub counterparty: Address,
    pub at: Timestamp,
}

/// A withdrawal admitted by `begin_withdraw`, holding the reentrancy guard
///
/// Not `Clone`: exactly one pending withdrawal exists per guard acquisition,
/// and it must be surrendered to `finish_withdraw`.
#[derive(Debug)]
pub struct PendingWithdrawal {
    amount: Amount,
    kind: VaultEntryKind,
}

impl PendingWithdrawal {
    /// Amount to move in the external transfer
    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Accumulated payments and withdrawal bookkeeping
#[derive(Debug, Clone, Default)]
pub struct FundsVault {
    balance: Amount,
    /// Reentrancy guard: held between begin and finish
    withdrawing: bool,
    history: Vec<VaultEntry>,
}

impl FundsVault {
    /// Create an empty vault
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tracked balance
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Whether the reentrancy guard is currently held
    pub fn is_withdrawing(&self) -> bool {
        self.withdrawing
    }

    /// Audit trail, oldest first
    pub fn history(&self) -> &[VaultEntry] {
        &self.history
    }

    /// Record an incoming mint payment
    pub fn deposit(&mut self, from: Address, amount: Amount, now: Timestamp) -> LedgerResult<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.history.push(VaultEntry {
            kind: VaultEntryKind::Deposit,
            amount,
            counterparty: from,
            at: now,
        });
        Ok(())
    }

    /// Phase 1 of a full-balance withdrawal: validate and acquire the guard
    pub fn begin_withdraw(&mut self) -> LedgerResult<PendingWithdrawal> {
        if self.withdrawing {
            return Err(LedgerError::WithdrawalInProgress);
        }
        if self.balance == 0 {
            return Err(LedgerError::NothingToWithdraw);
        }
        self.withdrawing = true;
        Ok(PendingWithdrawal {
            amount: self.balance,
            kind: VaultEntryKind::Withdrawal,
        })
    }

    /// Phase 1 of a partial withdrawal: validate amount and acquire the guard
    pub fn begin_emergency_withdraw(&mut self, amount: Amount) -> LedgerResult<PendingWithdrawal> {
        if self.withdrawing {
            return Err(LedgerError::WithdrawalInProgress);
        }
        if amount == 0 {
            return Err(LedgerError::AmountMustBePositive);
        }
        if amount > self.balance {
            return Err(LedgerError::InsufficientBalance {
                have: self.balance,
                need: amount,
            });
        }
        self.withdrawing = true;
        Ok(PendingWithdrawal {
            amount,
            kind: VaultEntryKind::EmergencyWithdrawal,
        })
    }

    /// Phase 2: release the guard and settle the outcome
    ///
    /// On transfer failure the balance stays untouched and the error is
    /// surfaced as `WithdrawalFailed`.
    pub fn finish_withdraw(
        &mut self,
        pending: PendingWithdrawal,
        transfer_result: Result<(), String>,
        to: Address,
        now: Timestamp,
    ) -> LedgerResult<Amount> {
        self.withdrawing = false;
        match transfer_result {
            Ok(()) => {
                self.balance -= pending.amount;
                self.history.push(VaultEntry {
                    kind: pending.kind,
                    amount: pending.amount,
                    counterparty: to,
                    at: now,
                });
                Ok(pending.amount)
            }
            Err(reason) => Err(LedgerError::WithdrawalFailed(reason)),
        }
    }

    /// Full withdrawal: begin, transfer, finish
    pub fn withdraw(
        &mut self,
        to: Address,
        funds: &mut dyn FundsTransfer,
        now: Timestamp,
    ) -> LedgerResult<Amount> {
        let pending = self.begin_withdraw()?;
        let result = funds.transfer(&to, pending.amount());
        self.finish_withdraw(pending, result, to, now)
    }

    /// Partial withdrawal: begin, transfer, finish
    pub fn emergency_withdraw(
        &mut self,
        to: Address,
        amount: Amount,
        funds: &mut dyn FundsTransfer,
        now: Timestamp,
    ) -> LedgerResult<Amount> {
        let pending = self.begin_emergency_withdraw(amount)?;
        let result = funds.transfer(&to, pending.amount());
        self.finish_withdraw(pending, result, to, now)
    }
}
