//! Content Fingerprinting
//!
//! Record content is identified by a deterministic BLAKE3 fingerprint with
//! length-prefixed encoding:
//! ```text
//! fingerprint = BLAKE3("RECORD_CONTENT_V1" || len(content):u64 || content)
//! ```
//!
//! This ensures:
//! - **Determinism**: Same bytes on all nodes → same fingerprint
//! - **Domain separation**: Versioned prefix keeps fingerprints distinct
//!   from every other hash in the system (and allows V2 migrations)
//! - **Collision resistance**: BLAKE3's cryptographic strength
//!
//! Content equality throughout the ledger is fingerprint equality.

use lib_types::Fingerprint;

/// Domain-separation prefix (versioned for future migrations V2, V3, etc.)
const FINGERPRINT_DOMAIN: &[u8] = b"RECORD_CONTENT_V1";

/// Derive the canonical fingerprint for a piece of record content
pub fn fingerprint_content(content: &[u8]) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(FINGERPRINT_DOMAIN);
    // Length prefix (u64 big-endian) so prefix-related preimages stay distinct
    hasher.update(&(content.len() as u64).to_be_bytes());
    hasher.update(content);
    Fingerprint::new(*hasher.finalize().as_bytes())
}
