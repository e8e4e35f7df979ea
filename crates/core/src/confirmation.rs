//! Signup confirmation codes.
//!
//! The plaintext code is emailed to the user exactly once; only its SHA-256
//! hex digest is persisted so a database leak does not expose live codes.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a generated confirmation code.
pub const CODE_LENGTH: usize = 16;

/// Alphabet without look-alike characters (no `0/O`, `1/l/I`).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";

/// A freshly issued confirmation code.
pub struct GeneratedCode {
    /// Sent to the user, never stored.
    pub plaintext: String,
    /// Stored in `users.confirmation_code_hash`.
    pub hash: String,
}

/// Generate a new random confirmation code and its hash.
pub fn generate_confirmation_code() -> GeneratedCode {
    let mut rng = rand::rng();
    let plaintext: String = (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    let hash = hash_confirmation_code(&plaintext);
    GeneratedCode { plaintext, hash }
}

/// Hash a confirmation code for storage or comparison.
pub fn hash_confirmation_code(code: &str) -> String {
    format!("{:x}", Sha256::digest(code.trim().as_bytes()))
}

/// Check a submitted code against the stored hash.
///
/// Returns `false` when no code has been issued (or it was already used).
pub fn confirmation_code_matches(submitted: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hash) if !submitted.trim().is_empty() => hash_confirmation_code(submitted) == hash,
        _ => false,
    }
}
