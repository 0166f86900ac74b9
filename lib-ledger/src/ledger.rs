//! Record Ledger - Coordinating Entity
//!
//! Composes the content index, record store, ownership ledger, issuance
//! policy, access controller and funds vault by explicit delegation, and
//! implements the external operation set against them.
//!
//! # Invariants (CRITICAL)
//!
//! **I1: Content uniqueness**
//! - At most one live record per content fingerprint
//! - Checked against the content index before any mutation
//!
//! **I2: Bounded issuance**
//! - Live supply never exceeds the configured max supply
//! - A holder's count never exceeds the per-holder cap
//!
//! **I3: All-or-nothing admission**
//! - Every check runs before any mutation; a failed check leaves zero
//!   partial state (no record, no fingerprint entry, no count update)
//! - Batch mints validate the whole batch, then mutate
//!
//! **I4: Index consistency**
//! - held-count equals held-set cardinality for every holder
//! - holder map, held-sets and counts change together
//!
//! All operations take explicit `caller` / `paid` / `now` parameters; there
//! is no ambient transaction context, so the core is testable without a
//! simulated execution environment.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use lib_types::{Address, Amount, RecordId, Timestamp};

use crate::access::AccessController;
use crate::content_index::ContentIndex;
use crate::errors::{LedgerError, LedgerResult};
use crate::events::{LedgerEvent, PolicyParameter};
use crate::fingerprint::fingerprint_content;
use crate::ownership::OwnershipLedger;
use crate::policy::{IssuancePolicy, LedgerConfig};
use crate::records::{validate_content, validate_metadata, Record, RecordStore};
use crate::vault::{FundsTransfer, FundsVault};

/// Aggregate counters reported by [`RecordLedger::stats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub live_supply: u64,
    pub total_issued: u64,
    pub max_supply: u64,
    pub fee: Amount,
    pub vault_balance: Amount,
}

/// The issuance-and-ownership ledger
///
/// All mutating methods take `&mut self`: callers wanting shared access wrap
/// the ledger in the single-writer [`crate::service::LedgerService`].
#[derive(Debug, Clone)]
pub struct RecordLedger {
    access: AccessController,
    policy: IssuancePolicy,
    records: RecordStore,
    content: ContentIndex,
    ownership: OwnershipLedger,
    vault: FundsVault,
    /// Events emitted by completed operations, drained by `take_events`
    events: Vec<LedgerEvent>,
}

impl RecordLedger {
    /// Create an empty ledger owned by `owner`
    pub fn new(owner: Address, config: LedgerConfig) -> Self {
        Self {
            access: AccessController::new(owner),
            policy: IssuancePolicy::new(config),
            records: RecordStore::new(),
            content: ContentIndex::new(),
            ownership: OwnershipLedger::new(),
            vault: FundsVault::new(),
            events: Vec::new(),
        }
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    /// Admit and create a single record
    ///
    /// Gate order: pause → fee → content bounds → supply → holding →
    /// title/metadata → content uniqueness. Only after every gate passes
    /// does any state change.
    #[allow(clippy::too_many_arguments)]
    pub fn mint(
        &mut self,
        caller: Address,
        paid: Amount,
        now: Timestamp,
        content: Vec<u8>,
        title: String,
        description: String,
        metadata_ref: String,
    ) -> LedgerResult<RecordId> {
        // === VALIDATION PHASE (before any mutation) ===
        self.access.ensure_not_paused()?;
        self.policy.check_fee(paid, 1)?;
        validate_content(&content, self.policy.max_content_length())?;
        self.policy.check_supply(self.records.live_count(), 1)?;
        self.policy
            .check_holding(self.ownership.held_count(&caller), 1)?;
        validate_metadata(&title, &metadata_ref)?;

        let fingerprint = fingerprint_content(&content);
        if self.content.lookup(&fingerprint).is_some() {
            return Err(LedgerError::DuplicateContent(fingerprint));
        }

        // === MUTATION PHASE (all validations passed) ===
        self.vault.deposit(caller, paid, now)?;
        let id = self
            .records
            .create(content, title, description, metadata_ref, caller, fingerprint, now);
        self.content.register(fingerprint, id)?;
        self.ownership.assign(id, caller);

        debug!("minted record {} for {:?} (fee {})", id, caller, paid);
        self.events.push(LedgerEvent::RecordMinted {
            id,
            creator: caller,
            fingerprint,
            fee_paid: paid,
            timestamp: now,
        });
        Ok(id)
    }

    /// Admit and create a batch of records, all-or-nothing
    ///
    /// Payment is checked once against `fee × n` before the per-item loop.
    /// A duplicate within the batch or against existing content aborts the
    /// whole batch; no record from an earlier item survives.
    #[allow(clippy::too_many_arguments)]
    pub fn batch_mint(
        &mut self,
        caller: Address,
        paid: Amount,
        now: Timestamp,
        contents: Vec<Vec<u8>>,
        titles: Vec<String>,
        descriptions: Vec<String>,
        metadata_refs: Vec<String>,
    ) -> LedgerResult<Vec<RecordId>> {
        // === VALIDATION PHASE (before any mutation) ===
        self.access.ensure_not_paused()?;

        let n = contents.len();
        if titles.len() != n || descriptions.len() != n || metadata_refs.len() != n {
            return Err(LedgerError::ArrayLengthMismatch);
        }
        self.policy.check_batch(n)?;
        self.policy.check_fee(paid, n as u64)?;
        self.policy.check_supply(self.records.live_count(), n as u64)?;
        self.policy
            .check_holding(self.ownership.held_count(&caller), n as u64)?;

        // Staging pass: per-item field validation and duplicate detection,
        // both within the batch and against existing content
        let mut staged = Vec::with_capacity(n);
        let mut seen = HashSet::with_capacity(n);
        for (content, (title, metadata_ref)) in
            contents.iter().zip(titles.iter().zip(metadata_refs.iter()))
        {
            validate_content(content, self.policy.max_content_length())?;
            validate_metadata(title, metadata_ref)?;

            let fingerprint = fingerprint_content(content);
            if self.content.lookup(&fingerprint).is_some() || !seen.insert(fingerprint) {
                return Err(LedgerError::DuplicateContent(fingerprint));
            }
            staged.push(fingerprint);
        }

        // === MUTATION PHASE (all validations passed) ===
        self.vault.deposit(caller, paid, now)?;

        // Per-event fee shares sum to the vaulted payment: the first record
        // carries any remainder of the integer split.
        let fee_share = paid / n as Amount;
        let mut fee_paid = paid - fee_share * (n as Amount - 1);

        let mut ids = Vec::with_capacity(n);
        let items = contents
            .into_iter()
            .zip(titles)
            .zip(descriptions)
            .zip(metadata_refs)
            .zip(staged);
        for ((((content, title), description), metadata_ref), fingerprint) in items {
            let id = self
                .records
                .create(content, title, description, metadata_ref, caller, fingerprint, now);
            self.content.register(fingerprint, id)?;
            ids.push(id);
            self.events.push(LedgerEvent::RecordMinted {
                id,
                creator: caller,
                fingerprint,
                fee_paid,
                timestamp: now,
            });
            fee_paid = fee_share;
        }
        // Holder/creator indices and the held count update once, by n
        self.ownership.assign_batch(&ids, caller);

        info!("batch minted {} records for {:?}", n, caller);
        Ok(ids)
    }

    // =========================================================================
    // Transfer and lifecycle
    // =========================================================================

    /// Reassign a record from the caller to `to`
    pub fn transfer(&mut self, caller: Address, id: RecordId, to: Address) -> LedgerResult<()> {
        self.access.ensure_not_paused()?;
        if !self.records.exists(id) {
            return Err(LedgerError::NotFound(id));
        }
        if to.is_zero() {
            return Err(LedgerError::InvalidAddress);
        }
        // Authorization wins over capacity: a non-holder is told NotOwner,
        // never HoldingExceeded.
        match self.ownership.holder_of(id) {
            Some(holder) if holder == caller => {}
            _ => return Err(LedgerError::NotOwner(id)),
        }
        // The holding bound holds at all times, not just at admission: a
        // transfer into a full holder is rejected. Self-transfer is net-zero
        // and skips the check.
        if to != caller {
            self.policy.check_holding(self.ownership.held_count(&to), 1)?;
        }

        self.ownership.transfer(id, caller, to)?;
        debug!("transferred record {} {:?} -> {:?}", id, caller, to);
        self.events.push(LedgerEvent::RecordTransferred {
            id,
            from: caller,
            to,
        });
        Ok(())
    }

    /// Flip a record's active flag (holder or owner)
    pub fn toggle_active(&mut self, caller: Address, id: RecordId) -> LedgerResult<bool> {
        let holder = self.ownership.holder_of(id).ok_or(LedgerError::NotFound(id))?;
        self.access.ensure_holder_or_owner(&caller, &holder)?;

        let active = !self.records.get(id)?.active;
        self.records.set_active(id, active)?;
        self.events.push(LedgerEvent::StatusChanged { id, active });
        Ok(active)
    }

    /// Destroy a record (holder or owner)
    ///
    /// Frees the record's *original* fingerprint (stored at creation) so the
    /// same content can be minted again, and decrements the prior holder's
    /// held count. The id is never reused.
    pub fn destroy(&mut self, caller: Address, id: RecordId) -> LedgerResult<()> {
        let holder = self.ownership.holder_of(id).ok_or(LedgerError::NotFound(id))?;
        self.access.ensure_holder_or_owner(&caller, &holder)?;

        let record = self.records.remove(id)?;
        self.content.unregister(&record.fingerprint);
        self.ownership.release(id)?;

        info!("destroyed record {} (held by {:?})", id, holder);
        self.events.push(LedgerEvent::RecordDestroyed {
            id,
            holder,
            fingerprint: record.fingerprint,
        });
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Fetch content verbatim; advances the view counter
    pub fn get_content(&mut self, id: RecordId) -> LedgerResult<Vec<u8>> {
        let views = self.records.record_view(id)?;
        let content = self.records.get(id)?.content.clone();
        self.events.push(LedgerEvent::ContentViewed { id, views });
        Ok(content)
    }

    /// Snapshot of a record, no side effect
    pub fn get_record(&self, id: RecordId) -> LedgerResult<Record> {
        self.records.get(id).cloned()
    }

    /// Live record ids created by `creator`, ascending by id
    ///
    /// Destroyed records are excluded: the creator's historical count is not
    /// a proxy for "still live".
    pub fn get_by_creator(&self, creator: Address) -> LedgerResult<Vec<RecordId>> {
        let created = self.ownership.created_by(&creator)?;
        Ok(created
            .iter()
            .copied()
            .filter(|&id| self.records.exists(id))
            .collect())
    }

    /// Record ids currently held by `holder`, ascending by id
    pub fn get_by_holder(&self, holder: Address) -> LedgerResult<Vec<RecordId>> {
        self.ownership.held_by(&holder)
    }

    /// Whether this content is currently wrapped by a live record
    pub fn content_exists(&self, content: &[u8]) -> bool {
        self.content.lookup(&fingerprint_content(content)).is_some()
    }

    /// Aggregate supply and vault counters
    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            live_supply: self.records.live_count(),
            total_issued: self.records.total_issued(),
            max_supply: self.policy.max_supply(),
            fee: self.policy.fee(),
            vault_balance: self.vault.balance(),
        }
    }

    /// The contract owner
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Whether the pause gate is closed
    pub fn is_paused(&self) -> bool {
        self.access.is_paused()
    }

    /// Current admission parameters
    pub fn policy(&self) -> &IssuancePolicy {
        &self.policy
    }

    /// Vault audit trail, oldest first
    pub fn vault_history(&self) -> &[crate::vault::VaultEntry] {
        self.vault.history()
    }

    // =========================================================================
    // Administration (owner-only)
    // =========================================================================

    /// Set the mint fee
    pub fn set_fee(&mut self, caller: Address, fee: Amount) -> LedgerResult<()> {
        self.access.ensure_owner(&caller)?;
        let (old, new) = self.policy.set_fee(fee);
        self.push_parameter_change(PolicyParameter::Fee, old, new);
        Ok(())
    }

    /// Set the maximum live supply
    pub fn set_max_supply(&mut self, caller: Address, max_supply: u64) -> LedgerResult<()> {
        self.access.ensure_owner(&caller)?;
        let (old, new) = self
            .policy
            .set_max_supply(max_supply, self.records.live_count())?;
        self.push_parameter_change(PolicyParameter::MaxSupply, old as u128, new as u128);
        Ok(())
    }

    /// Set the maximum batch size
    pub fn set_max_batch_size(&mut self, caller: Address, max_batch_size: usize) -> LedgerResult<()> {
        self.access.ensure_owner(&caller)?;
        let (old, new) = self.policy.set_max_batch_size(max_batch_size)?;
        self.push_parameter_change(PolicyParameter::MaxBatchSize, old as u128, new as u128);
        Ok(())
    }

    /// Set the maximum content length
    pub fn set_max_content_length(
        &mut self,
        caller: Address,
        max_content_length: usize,
    ) -> LedgerResult<()> {
        self.access.ensure_owner(&caller)?;
        let (old, new) = self.policy.set_max_content_length(max_content_length)?;
        self.push_parameter_change(PolicyParameter::MaxContentLength, old as u128, new as u128);
        Ok(())
    }

    /// Set the per-holder holding cap
    pub fn set_max_holding_per_holder(
        &mut self,
        caller: Address,
        max_holding: u64,
    ) -> LedgerResult<()> {
        self.access.ensure_owner(&caller)?;
        let (old, new) = self.policy.set_max_holding_per_holder(max_holding)?;
        self.push_parameter_change(PolicyParameter::MaxHoldingPerHolder, old as u128, new as u128);
        Ok(())
    }

    /// Close the pause gate (owner-only)
    pub fn pause(&mut self, caller: Address) -> LedgerResult<()> {
        self.access.pause(&caller)?;
        info!("ledger paused by owner");
        self.events.push(LedgerEvent::PauseStateChanged { paused: true });
        Ok(())
    }

    /// Reopen the pause gate (owner-only)
    pub fn unpause(&mut self, caller: Address) -> LedgerResult<()> {
        self.access.unpause(&caller)?;
        info!("ledger unpaused by owner");
        self.events.push(LedgerEvent::PauseStateChanged { paused: false });
        Ok(())
    }

    /// Withdraw the full vault balance to `to` (owner-only)
    ///
    /// The external transfer is the last mutating step; a reentrant call
    /// while it runs fails with `WithdrawalInProgress`, and a failed
    /// transfer leaves the tracked balance untouched.
    pub fn withdraw(
        &mut self,
        caller: Address,
        to: Address,
        funds: &mut dyn FundsTransfer,
        now: Timestamp,
    ) -> LedgerResult<Amount> {
        self.access.ensure_owner(&caller)?;
        if to.is_zero() {
            return Err(LedgerError::InvalidAddress);
        }
        let amount = self.vault.withdraw(to, funds, now)?;
        info!("withdrew {} from vault to {:?}", amount, to);
        self.events.push(LedgerEvent::FundsWithdrawn {
            to,
            amount,
            emergency: false,
        });
        Ok(amount)
    }

    /// Withdraw part of the vault balance to `to` (owner-only)
    pub fn emergency_withdraw(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
        funds: &mut dyn FundsTransfer,
        now: Timestamp,
    ) -> LedgerResult<Amount> {
        self.access.ensure_owner(&caller)?;
        if to.is_zero() {
            return Err(LedgerError::InvalidAddress);
        }
        let moved = self.vault.emergency_withdraw(to, amount, funds, now)?;
        info!("emergency withdrew {} from vault to {:?}", moved, to);
        self.events.push(LedgerEvent::FundsWithdrawn {
            to,
            amount: moved,
            emergency: true,
        });
        Ok(moved)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Drain the events emitted since the last call
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    fn push_parameter_change(&mut self, parameter: PolicyParameter, old: u128, new: u128) {
        debug!("parameter {} changed {} -> {}", parameter.as_str(), old, new);
        self.events.push(LedgerEvent::ParameterChanged { parameter, old, new });
    }
}
