//! Ownership Ledger - Holder and Creator Indices
//!
//! Maps each record to its current holder and maintains the reverse indices
//! used for enumeration:
//! - holder → held-set (BTreeSet: ascending-id iteration is the contract)
//! - holder → held count (always equals the held-set cardinality)
//! - creator → created ids (append-only, ascending; length is the
//!   "ever created" count and is never decremented by transfers)

use std::collections::{BTreeSet, HashMap};

use lib_types::{Address, RecordId};

use crate::errors::{LedgerError, LedgerResult};

/// Record → holder mapping plus reverse indices
#[derive(Debug, Clone, Default)]
pub struct OwnershipLedger {
    /// Current holder of each live record
    holder_of: HashMap<RecordId, Address>,
    /// Records currently held, per holder
    held: HashMap<Address, BTreeSet<RecordId>>,
    /// Held count per holder (invariant: equals held-set cardinality)
    held_count: HashMap<Address, u64>,
    /// Ids ever created, per creator (append-only, ascending)
    created: HashMap<Address, Vec<RecordId>>,
}

impl OwnershipLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign initial ownership at creation (called exactly once per record)
    ///
    /// Records the id in the creator's created-index and the holder indices.
    pub fn assign(&mut self, id: RecordId, creator: Address) {
        self.holder_of.insert(id, creator);
        self.held.entry(creator).or_default().insert(id);
        *self.held_count.entry(creator).or_default() += 1;
        self.created.entry(creator).or_default().push(id);
    }

    /// Assign initial ownership for a validated batch
    ///
    /// Per-record index entries are inserted in order; the held count is
    /// bumped once by the batch size after the loop.
    pub fn assign_batch(&mut self, ids: &[RecordId], creator: Address) {
        let held = self.held.entry(creator).or_default();
        let created = self.created.entry(creator).or_default();
        for &id in ids {
            self.holder_of.insert(id, creator);
            held.insert(id);
            created.push(id);
        }
        *self.held_count.entry(creator).or_default() += ids.len() as u64;
    }

    /// Current holder of a record, if live
    pub fn holder_of(&self, id: RecordId) -> Option<Address> {
        self.holder_of.get(&id).copied()
    }

    /// Reassign a record from `from` to `to`
    ///
    /// # Errors
    /// `NotOwner` if `from` is not the current holder.
    ///
    /// All four index updates happen together under the ledger's mutation
    /// lock: holder map, both held-sets, both held counts.
    pub fn transfer(&mut self, id: RecordId, from: Address, to: Address) -> LedgerResult<()> {
        match self.holder_of.get(&id) {
            Some(holder) if *holder == from => {}
            _ => return Err(LedgerError::NotOwner(id)),
        }

        if let Some(set) = self.held.get_mut(&from) {
            set.remove(&id);
        }
        if let Some(count) = self.held_count.get_mut(&from) {
            *count -= 1;
        }

        self.held.entry(to).or_default().insert(id);
        *self.held_count.entry(to).or_default() += 1;
        self.holder_of.insert(id, to);
        Ok(())
    }

    /// Release ownership of a record (destroy path)
    ///
    /// Removes the holder mapping and decrements the prior holder's held
    /// count. The creator's created-index is intentionally left intact:
    /// liveness filtering happens at enumeration time.
    pub fn release(&mut self, id: RecordId) -> LedgerResult<Address> {
        let holder = self.holder_of.remove(&id).ok_or(LedgerError::NotFound(id))?;
        if let Some(set) = self.held.get_mut(&holder) {
            set.remove(&id);
        }
        if let Some(count) = self.held_count.get_mut(&holder) {
            *count -= 1;
        }
        Ok(holder)
    }

    /// Ids currently held by `holder`, ascending by id
    ///
    /// # Errors
    /// `InvalidAddress` if queried with the zero identity.
    pub fn held_by(&self, holder: &Address) -> LedgerResult<Vec<RecordId>> {
        if holder.is_zero() {
            return Err(LedgerError::InvalidAddress);
        }
        Ok(self
            .held
            .get(holder)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    /// Ids ever created by `creator`, ascending by id (including destroyed)
    ///
    /// Callers wanting only live records filter against the record store.
    ///
    /// # Errors
    /// `InvalidAddress` if queried with the zero identity.
    pub fn created_by(&self, creator: &Address) -> LedgerResult<&[RecordId]> {
        if creator.is_zero() {
            return Err(LedgerError::InvalidAddress);
        }
        Ok(self
            .created
            .get(creator)
            .map(|ids| ids.as_slice())
            .unwrap_or_default())
    }

    /// Current held count for a holder
    pub fn held_count(&self, holder: &Address) -> u64 {
        self.held_count.get(holder).copied().unwrap_or(0)
    }
}
