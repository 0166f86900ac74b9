//! Canonical Primitive Types for the Record Ledger
//!
//! Rule: No String identifiers in ledger state. Ever.
//!
//! These types are the foundational building blocks for all ledger-critical
//! data structures. They are designed to be:
//! - Fixed-size (no dynamic allocation)
//! - Deterministically serializable
//! - Efficient to copy and compare

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TYPE ALIASES
// ============================================================================

/// Sequential record identifier (1-indexed)
///
/// Identifier 0 is reserved as the "absent" sentinel and is never assigned
/// to a live record. This is a deliberate design choice: the content index
/// represents "no mapping" as 0, which keeps not-found checks trivial.
pub type RecordId = u64;

/// The reserved "absent" record identifier
pub const ABSENT_RECORD: RecordId = 0;

/// Payment amounts (supports up to ~340 undecillion units)
pub type Amount = u128;

/// Unix timestamp in seconds
pub type Timestamp = u64;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// 32-byte address (derived from public key)
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create a new Address from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed Address
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// CONTENT FINGERPRINT
// ============================================================================

/// 32-byte content fingerprint (cryptographic hash of record content)
///
/// Content equality is defined as fingerprint equality; the ledger never
/// compares content byte-for-byte at query time.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Default)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Create a new Fingerprint from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed Fingerprint
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero fingerprint
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Fingerprint {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_basics() {
        let addr = Address::new([3u8; 32]);
        assert!(!addr.is_zero());
        assert_eq!(addr.as_bytes(), &[3u8; 32]);

        let zero = Address::zero();
        assert!(zero.is_zero());
    }

    #[test]
    fn test_fingerprint_basics() {
        let fp = Fingerprint::new([7u8; 32]);
        assert!(!fp.is_zero());
        assert_eq!(fp.as_bytes(), &[7u8; 32]);

        let zero = Fingerprint::zero();
        assert!(zero.is_zero());
    }

    #[test]
    fn test_absent_record_is_zero() {
        assert_eq!(ABSENT_RECORD, 0);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let addr = Address::new([42u8; 32]);
        let serialized = bincode::serialize(&addr).unwrap();
        let deserialized: Address = bincode::deserialize(&serialized).unwrap();
        assert_eq!(addr, deserialized);

        let fp = Fingerprint::new([9u8; 32]);
        let serialized = bincode::serialize(&fp).unwrap();
        let deserialized: Fingerprint = bincode::deserialize(&serialized).unwrap();
        assert_eq!(fp, deserialized);
    }

    #[test]
    fn test_from_array() {
        let bytes = [5u8; 32];
        let addr: Address = bytes.into();
        assert_eq!(addr.0, bytes);

        let fp: Fingerprint = bytes.into();
        assert_eq!(fp.0, bytes);
    }

    #[test]
    fn test_display_is_full_hex() {
        let addr = Address::new([1u8; 32]);
        assert_eq!(format!("{}", addr), "01".repeat(32));
    }
}
