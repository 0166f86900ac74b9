//! Content Index - Global Content Uniqueness
//!
//! Maps a content fingerprint to the owning record identifier. Enforces the
//! ledger's central invariant: at most one live record per fingerprint.
//! Absence is represented by the reserved identifier 0, which is never a
//! valid record id.

use std::collections::HashMap;

use lib_types::{Fingerprint, RecordId, ABSENT_RECORD};

use crate::errors::{LedgerError, LedgerResult};

/// Fingerprint → record id index
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    entries: HashMap<Fingerprint, RecordId>,
}

impl ContentIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fingerprint for a freshly created record
    ///
    /// # Errors
    /// `DuplicateContent` if the fingerprint already maps to a live record.
    pub fn register(&mut self, fingerprint: Fingerprint, id: RecordId) -> LedgerResult<()> {
        debug_assert_ne!(id, ABSENT_RECORD, "record id 0 is reserved as absent");
        if self.lookup(&fingerprint).is_some() {
            return Err(LedgerError::DuplicateContent(fingerprint));
        }
        self.entries.insert(fingerprint, id);
        Ok(())
    }

    /// Look up the record currently wrapping this fingerprint's content
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<RecordId> {
        match self.entries.get(fingerprint) {
            Some(&id) if id != ABSENT_RECORD => Some(id),
            _ => None,
        }
    }

    /// Free a fingerprint mapping (destroy path only)
    pub fn unregister(&mut self, fingerprint: &Fingerprint) {
        self.entries.remove(fingerprint);
    }

    /// Number of live fingerprint mappings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no mappings
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
