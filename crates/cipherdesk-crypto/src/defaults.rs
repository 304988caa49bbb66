//! Centralized engine constants.
//!
//! **This module is the single source of truth** for key sizes, IV lengths
//! and derivation parameters. Other modules reference these instead of
//! defining their own magic numbers.

// =============================================================================
// SYMMETRIC
// =============================================================================

/// AES-256 key length in bytes.
pub const SYMMETRIC_KEY_LEN: usize = 32;

/// IV length for CBC and CTR (one AES block).
pub const BLOCK_IV_LEN: usize = 16;

/// Nonce length for AES-GCM.
pub const GCM_NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length (128 bits).
pub const GCM_TAG_LEN: usize = 16;

// =============================================================================
// PASSWORD DERIVATION
// =============================================================================

/// PBKDF2-HMAC-SHA256 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 65_536;

/// Engine-wide PBKDF2 salt.
///
/// Shared by every caller so the same password always yields the same key.
/// This is a reproducibility property, not a secrecy one: two users with the
/// same password get the same key. Changing the value invalidates every key
/// derived so far.
pub const PBKDF2_SALT: &[u8; 16] = b"SpringCrypto2026";

/// Recommended minimum length for caller-supplied salts.
pub const MIN_CUSTOM_SALT_LEN: usize = 8;

// =============================================================================
// ASYMMETRIC
// =============================================================================

/// RSA modulus size for generated key pairs.
pub const RSA_KEY_BITS: usize = 2048;

/// PKCS#1 v1.5 encryption padding overhead in bytes.
pub const PKCS1_OVERHEAD: usize = 11;

/// OAEP-SHA256 padding overhead in bytes (2 * label digest length + 2).
/// The MGF1 hash is SHA-1 and does not affect it.
pub const OAEP_SHA256_OVERHEAD: usize = 2 * 32 + 2;

/// Curve used for EC key pairs.
pub const EC_CURVE: &str = "P-256";

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Environment variable holding the passphrase for the configured key.
pub const AES_SECRET_KEY_ENV: &str = "CIPHERDESK_AES_SECRET_KEY";
