//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! [`derive_key_from_password`] uses the engine-wide salt in
//! [`PBKDF2_SALT`], so it is deterministic across callers and installations.
//! Use [`derive_key_with_salt`] when keys must differ per user.

use sha2::Sha256;
use tracing::{debug, warn};

use crate::defaults::{MIN_CUSTOM_SALT_LEN, PBKDF2_ITERATIONS, PBKDF2_SALT, SYMMETRIC_KEY_LEN};
use crate::error::{CryptoError, CryptoResult};
use crate::symmetric::SymmetricKey;

/// Derive a 256-bit key from a password and the engine-wide salt.
///
/// The same password always yields the same key.
pub fn derive_key_from_password(password: &str) -> CryptoResult<SymmetricKey> {
    derive(password, PBKDF2_SALT)
}

/// Derive a 256-bit key from a password and a caller-supplied salt.
///
/// Salts of at least [`MIN_CUSTOM_SALT_LEN`] bytes are recommended; shorter
/// ones are accepted with a warning. Only an empty salt is rejected.
pub fn derive_key_with_salt(password: &str, salt: &[u8]) -> CryptoResult<SymmetricKey> {
    if salt.is_empty() {
        return Err(CryptoError::InvalidInput("salt must not be empty".into()));
    }
    if salt.len() < MIN_CUSTOM_SALT_LEN {
        warn!(
            subsystem = "crypto",
            component = "kdf",
            salt_len = salt.len(),
            "Salt shorter than {} bytes",
            MIN_CUSTOM_SALT_LEN
        );
    }
    derive(password, salt)
}

// Empty passwords are valid PBKDF2 input and derive a usable key.
fn derive(password: &str, salt: &[u8]) -> CryptoResult<SymmetricKey> {
    debug!(
        subsystem = "crypto",
        component = "kdf",
        op = "pbkdf2",
        iterations = PBKDF2_ITERATIONS,
        salt_len = salt.len(),
        "Deriving key from password"
    );

    let mut key = [0u8; SYMMETRIC_KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    Ok(SymmetricKey::from_bytes(key))
}
