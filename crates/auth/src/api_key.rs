//! API key material: generation, digest and display prefix.
//!
//! A key is the constant [`KEY_PREFIX`] followed by 256 bits of
//! cryptographically random data, hex-encoded. Only the digest and the short
//! display prefix are ever stored; the plaintext exists transiently at
//! creation and is returned exactly once.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Constant prefix carried by every issued key.
pub const KEY_PREFIX: &str = "evk_";

/// Random payload length in bytes (hex-encodes to 64 chars).
pub const KEY_RANDOM_BYTES: usize = 32;

/// Hex chars of the payload retained unencrypted for UI identification.
const DISPLAY_HEX_CHARS: usize = 8;

/// Generate a fresh plaintext key.
pub fn generate() -> String {
    let mut bytes = [0u8; KEY_RANDOM_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    format!("{KEY_PREFIX}{}", hex::encode(bytes))
}

/// Deterministic, unsalted SHA-256 digest of the full plaintext, hex-encoded.
///
/// This is the only form of the key that is stored; validation is a single
/// exact-match lookup on it.
pub fn hash(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short non-secret prefix (`evk_` + first eight hex chars) shown in key
/// listings so users can tell keys apart.
pub fn display_prefix(plaintext: &str) -> String {
    plaintext.chars().take(KEY_PREFIX.len() + DISPLAY_HEX_CHARS).collect()
}

/// Cheap shape check; lets validation short-circuit without hashing or a
/// store round-trip.
pub fn has_key_prefix(candidate: &str) -> bool {
    candidate.starts_with(KEY_PREFIX)
}
