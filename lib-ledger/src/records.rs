//! Record Store - Authoritative Record Table
//!
//! Owns the record lifecycle: sequential id assignment, field storage, view
//! counting, status flag, and removal. Identifiers start at 1 (0 is the
//! reserved "absent" sentinel) and the counter never rewinds, so a destroyed
//! record's id is never reused.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lib_types::{Address, Fingerprint, RecordId, Timestamp};

use crate::errors::{LedgerError, LedgerResult};

/// A single issued record
///
/// `creator` and `fingerprint` are immutable after creation. The fingerprint
/// is stored so that destroying the record can free the *original* content
/// mapping without re-deriving anything from mutated state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Sequential identifier (1-indexed, never reused)
    pub id: RecordId,
    /// Wrapped content, stored verbatim
    pub content: Vec<u8>,
    /// Human-readable title (non-empty)
    pub title: String,
    /// Free-form description (may be empty)
    pub description: String,
    /// Opaque metadata reference, stored verbatim (non-empty)
    pub metadata_ref: String,
    /// Identity captured at creation, immutable thereafter
    pub creator: Address,
    /// Canonical fingerprint of `content`, derived at creation
    pub fingerprint: Fingerprint,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// View counter (monotonically non-decreasing)
    pub views: u64,
    /// Active flag (toggle-only)
    pub active: bool,
}

/// Validate content bytes against the configured length bound
///
/// Split out from [`RecordStore::create`] so the admission pipeline can run
/// this gate before the supply and holding checks.
pub fn validate_content(content: &[u8], max_content_length: usize) -> LedgerResult<()> {
    if content.is_empty() {
        return Err(LedgerError::ContentEmpty);
    }
    if content.len() > max_content_length {
        return Err(LedgerError::ContentTooLong {
            len: content.len(),
            max: max_content_length,
        });
    }
    Ok(())
}

/// Validate title and metadata reference (description may be empty)
pub fn validate_metadata(title: &str, metadata_ref: &str) -> LedgerResult<()> {
    if title.is_empty() {
        return Err(LedgerError::TitleEmpty);
    }
    if metadata_ref.is_empty() {
        return Err(LedgerError::MetadataEmpty);
    }
    Ok(())
}

/// Authoritative table of records
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Primary storage, keyed by id (BTreeMap keeps enumeration ordered)
    records: BTreeMap<RecordId, Record>,
    /// Next id to assign (starts at 1; monotonic, never rewinds)
    next_id: RecordId,
    /// Count of records ever issued (monotonic, survives destruction)
    total_issued: u64,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 1,
            total_issued: 0,
        }
    }

    /// Insert a new record with pre-validated fields, assigning the next id
    ///
    /// Field validation ([`validate_content`], [`validate_metadata`]) happens
    /// in the admission pipeline before any mutation; by the time this runs
    /// all checks have passed.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        content: Vec<u8>,
        title: String,
        description: String,
        metadata_ref: String,
        creator: Address,
        fingerprint: Fingerprint,
        now: Timestamp,
    ) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        self.total_issued += 1;

        self.records.insert(
            id,
            Record {
                id,
                content,
                title,
                description,
                metadata_ref,
                creator,
                fingerprint,
                created_at: now,
                views: 0,
                active: true,
            },
        );
        id
    }

    /// Get a record by id
    pub fn get(&self, id: RecordId) -> LedgerResult<&Record> {
        self.records.get(&id).ok_or(LedgerError::NotFound(id))
    }

    /// Whether a record with this id is live
    pub fn exists(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Increment the view counter and return the new count
    ///
    /// Counter increments are serialized by the single mutation lock owning
    /// the whole ledger, so no increment is ever lost.
    pub fn record_view(&mut self, id: RecordId) -> LedgerResult<u64> {
        let record = self.records.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        record.views += 1;
        Ok(record.views)
    }

    /// Set the active flag; idempotent when set to the current value
    ///
    /// Returns the new flag value.
    pub fn set_active(&mut self, id: RecordId, active: bool) -> LedgerResult<bool> {
        let record = self.records.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        record.active = active;
        Ok(record.active)
    }

    /// Remove a record (destroy path). The id is never reissued.
    pub fn remove(&mut self, id: RecordId) -> LedgerResult<Record> {
        self.records.remove(&id).ok_or(LedgerError::NotFound(id))
    }

    /// Count of currently live records
    pub fn live_count(&self) -> u64 {
        self.records.len() as u64
    }

    /// Count of records ever issued (includes destroyed)
    pub fn total_issued(&self) -> u64 {
        self.total_issued
    }

    /// Iterate live records in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
