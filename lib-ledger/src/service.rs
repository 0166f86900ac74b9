//! Ledger Service - Single-Writer Shared Access
//!
//! Wraps a [`RecordLedger`] in one `tokio::sync::Mutex` and publishes the
//! events each operation emits. The single mutation lock owns ALL ledger
//! state; invariants span the record store, content index and ownership
//! indices, so per-field locking would allow two concurrent mints for the
//! same content to both pass the uniqueness check before either registers
//! it. Each admission or transfer completes wholly under the lock or has no
//! effect.

use std::sync::Arc;

use tokio::sync::Mutex;

use lib_types::{Address, Amount, RecordId, Timestamp};

use crate::errors::LedgerResult;
use crate::ledger::{LedgerStats, RecordLedger};
use crate::notify::{LedgerEventListener, LedgerEventPublisher};
use crate::records::Record;
use crate::vault::FundsTransfer;

/// Shared, serialized access to a [`RecordLedger`] with event publishing
#[derive(Debug, Clone)]
pub struct LedgerService {
    inner: Arc<Mutex<RecordLedger>>,
    publisher: LedgerEventPublisher,
}

impl LedgerService {
    /// Wrap a ledger for shared access
    pub fn new(ledger: RecordLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
            publisher: LedgerEventPublisher::new(),
        }
    }

    /// Subscribe a listener to all future ledger events
    pub async fn subscribe(&self, listener: Box<dyn LedgerEventListener>) {
        self.publisher.subscribe(listener).await;
    }

    /// Run a closure against the locked ledger, then publish emitted events
    ///
    /// The lock is released before publishing so a slow listener never
    /// extends the mutation critical section.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut RecordLedger) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let (result, events) = {
            let mut ledger = self.inner.lock().await;
            let result = op(&mut ledger);
            (result, ledger.take_events())
        };
        for event in events {
            self.publisher.publish(event).await;
        }
        result
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    /// Admit and create a single record
    pub async fn mint(
        &self,
        caller: Address,
        paid: Amount,
        now: Timestamp,
        content: Vec<u8>,
        title: String,
        description: String,
        metadata_ref: String,
    ) -> LedgerResult<RecordId> {
        self.mutate(|ledger| {
            ledger.mint(caller, paid, now, content, title, description, metadata_ref)
        })
        .await
    }

    /// Admit and create a batch of records, all-or-nothing
    #[allow(clippy::too_many_arguments)]
    pub async fn batch_mint(
        &self,
        caller: Address,
        paid: Amount,
        now: Timestamp,
        contents: Vec<Vec<u8>>,
        titles: Vec<String>,
        descriptions: Vec<String>,
        metadata_refs: Vec<String>,
    ) -> LedgerResult<Vec<RecordId>> {
        self.mutate(|ledger| {
            ledger.batch_mint(caller, paid, now, contents, titles, descriptions, metadata_refs)
        })
        .await
    }

    // =========================================================================
    // Transfer and lifecycle
    // =========================================================================

    /// Reassign a record from the caller to `to`
    pub async fn transfer(&self, caller: Address, id: RecordId, to: Address) -> LedgerResult<()> {
        self.mutate(|ledger| ledger.transfer(caller, id, to)).await
    }

    /// Flip a record's active flag (holder or owner)
    pub async fn toggle_active(&self, caller: Address, id: RecordId) -> LedgerResult<bool> {
        self.mutate(|ledger| ledger.toggle_active(caller, id)).await
    }

    /// Destroy a record (holder or owner)
    pub async fn destroy(&self, caller: Address, id: RecordId) -> LedgerResult<()> {
        self.mutate(|ledger| ledger.destroy(caller, id)).await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Fetch content verbatim; advances the view counter
    pub async fn get_content(&self, id: RecordId) -> LedgerResult<Vec<u8>> {
        self.mutate(|ledger| ledger.get_content(id)).await
    }

    /// Snapshot of a record, no side effect
    pub async fn get_record(&self, id: RecordId) -> LedgerResult<Record> {
        self.inner.lock().await.get_record(id)
    }

    /// Live record ids created by `creator`, ascending by id
    pub async fn get_by_creator(&self, creator: Address) -> LedgerResult<Vec<RecordId>> {
        self.inner.lock().await.get_by_creator(creator)
    }

    /// Record ids currently held by `holder`, ascending by id
    pub async fn get_by_holder(&self, holder: Address) -> LedgerResult<Vec<RecordId>> {
        self.inner.lock().await.get_by_holder(holder)
    }

    /// Whether this content is currently wrapped by a live record
    pub async fn content_exists(&self, content: &[u8]) -> bool {
        self.inner.lock().await.content_exists(content)
    }

    /// Aggregate supply and vault counters
    pub async fn stats(&self) -> LedgerStats {
        self.inner.lock().await.stats()
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Set the mint fee (owner-only)
    pub async fn set_fee(&self, caller: Address, fee: Amount) -> LedgerResult<()> {
        self.mutate(|ledger| ledger.set_fee(caller, fee)).await
    }

    /// Set the maximum live supply (owner-only)
    pub async fn set_max_supply(&self, caller: Address, max_supply: u64) -> LedgerResult<()> {
        self.mutate(|ledger| ledger.set_max_supply(caller, max_supply)).await
    }

    /// Set the maximum batch size (owner-only)
    pub async fn set_max_batch_size(&self, caller: Address, max: usize) -> LedgerResult<()> {
        self.mutate(|ledger| ledger.set_max_batch_size(caller, max)).await
    }

    /// Set the maximum content length (owner-only)
    pub async fn set_max_content_length(&self, caller: Address, max: usize) -> LedgerResult<()> {
        self.mutate(|ledger| ledger.set_max_content_length(caller, max)).await
    }

    /// Set the per-holder holding cap (owner-only)
    pub async fn set_max_holding_per_holder(&self, caller: Address, max: u64) -> LedgerResult<()> {
        self.mutate(|ledger| ledger.set_max_holding_per_holder(caller, max)).await
    }

    /// Close the pause gate (owner-only)
    pub async fn pause(&self, caller: Address) -> LedgerResult<()> {
        self.mutate(|ledger| ledger.pause(caller)).await
    }

    /// Reopen the pause gate (owner-only)
    pub async fn unpause(&self, caller: Address) -> LedgerResult<()> {
        self.mutate(|ledger| ledger.unpause(caller)).await
    }

    /// Withdraw the full vault balance (owner-only)
    pub async fn withdraw(
        &self,
        caller: Address,
        to: Address,
        funds: &mut dyn FundsTransfer,
        now: Timestamp,
    ) -> LedgerResult<Amount> {
        self.mutate(|ledger| ledger.withdraw(caller, to, funds, now)).await
    }

    /// Withdraw part of the vault balance (owner-only)
    pub async fn emergency_withdraw(
        &self,
        caller: Address,
        to: Address,
        amount: Amount,
        funds: &mut dyn FundsTransfer,
        now: Timestamp,
    ) -> LedgerResult<Amount> {
        self.mutate(|ledger| ledger.emergency_withdraw(caller, to, amount, funds, now))
            .await
    }
}
