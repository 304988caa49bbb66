//! Error types for cryptographic operations.
//!
//! Every variant is recoverable by correcting the input. Messages are safe to
//! show to end users: they never include key material or raw library errors.

use thiserror::Error;

use crate::keys::KeyFamily;

/// Cryptographic operation errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key bytes are not a valid RSA or EC interchange encoding.
    #[error("Key decode failed: {0}")]
    KeyDecode(String),

    /// Key could not be serialised to its interchange encoding.
    #[error("Key encode failed: {0}")]
    KeyEncode(String),

    /// Key pair generation failed.
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Unknown key family, cipher mode or padding tag.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// RSA plaintext exceeds the ceiling for the key size and padding.
    #[error("Plaintext too large: {len} bytes exceeds the {max}-byte limit")]
    PlaintextTooLarge { len: usize, max: usize },

    /// AEAD tag did not verify - data may be tampered.
    #[error("Authentication failed - data may be tampered")]
    Authentication,

    /// Decryption failed. Deliberately carries no detail.
    #[error("Decryption failed")]
    Decryption,

    /// Operation given a key of the wrong family.
    #[error("Invalid key family: expected {expected}, got {actual}")]
    InvalidKeyFamily {
        expected: KeyFamily,
        actual: KeyFamily,
    },

    /// Text is not valid standard Base64.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Envelope shorter than the IV its mode requires.
    #[error("Envelope too short: expected at least {expected} bytes, got {actual}")]
    TruncatedEnvelope { expected: usize, actual: usize },

    /// Symmetric key of the wrong length.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
