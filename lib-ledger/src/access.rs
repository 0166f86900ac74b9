//! Access Controller - Owner Identity and Pause Gate
//!
//! Holds the contract owner and the pause flag, and answers the two
//! authorization questions the ledger asks: "may this caller administer?"
//! and "may this caller toggle this record's status?".
//!
//! Pause transitions are strict rather than no-ops: pausing while paused
//! fails `AlreadyPaused`, unpausing while active fails `NotPaused`. While
//! paused, mint, batch mint and transfer are rejected with `ContractPaused`;
//! read-only queries stay available.

use serde::{Deserialize, Serialize};

use lib_types::Address;

use crate::errors::{LedgerError, LedgerResult};

/// Owner identity, pause flag, and authorization rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessController {
    owner: Address,
    paused: bool,
}

impl AccessController {
    /// Create a controller with the given owner, unpaused
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            paused: false,
        }
    }

    /// The contract owner
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether the contract is currently paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Gate for administrative mutation: caller must be the owner
    pub fn ensure_owner(&self, caller: &Address) -> LedgerResult<()> {
        if *caller != self.owner {
            return Err(LedgerError::NotAuthorized);
        }
        Ok(())
    }

    /// Gate for mint/transfer reachable operations
    pub fn ensure_not_paused(&self) -> LedgerResult<()> {
        if self.paused {
            return Err(LedgerError::ContractPaused);
        }
        Ok(())
    }

    /// Status toggling is authorized for the record's holder or the owner
    pub fn ensure_holder_or_owner(
        &self,
        caller: &Address,
        holder: &Address,
    ) -> LedgerResult<()> {
        if caller != holder && *caller != self.owner {
            return Err(LedgerError::NotAuthorized);
        }
        Ok(())
    }

    /// Transition Active → Paused (owner-only)
    pub fn pause(&mut self, caller: &Address) -> LedgerResult<()> {
        self.ensure_owner(caller)?;
        if self.paused {
            return Err(LedgerError::AlreadyPaused);
        }
        self.paused = true;
        Ok(())
    }

    /// Transition Paused → Active (owner-only)
    pub fn unpause(&mut self, caller: &Address) -> LedgerResult<()> {
        self.ensure_owner(caller)?;
        if !self.paused {
            return Err(LedgerError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }
}
