//! AES-256 symmetric encryption under four block modes.
//!
//! # Modes
//!
//! | Mode | IV | Padding | Integrity |
//! |------|----|---------|-----------|
//! | ECB  | none | PKCS#7 | none - identical blocks leak |
//! | CBC  | 16 bytes | PKCS#7 | none |
//! | CTR  | 16 bytes | none | none |
//! | GCM  | 12 bytes | none | 128-bit tag |
//!
//! # Envelope
//!
//! Every mode produces `Base64(IV ‖ ciphertext)`. GCM's tag is already part of
//! the ciphertext; ECB has no IV.
//!
//! ```rust
//! use cipherdesk_crypto::symmetric::{decrypt, encrypt, generate_key, CipherEnvelope, CipherMode};
//!
//! let mut rng = rand::thread_rng();
//! let key = generate_key(&mut rng);
//!
//! let text = encrypt(CipherMode::Gcm, b"attack at dawn", &key, &mut rng)
//!     .unwrap()
//!     .encode();
//!
//! let envelope = CipherEnvelope::decode(CipherMode::Gcm, &text).unwrap();
//! assert_eq!(decrypt(&envelope, &key).unwrap(), b"attack at dawn");
//! ```

pub mod kdf;
pub mod modes;

use std::fmt;
use std::str::FromStr;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::defaults::{BLOCK_IV_LEN, GCM_NONCE_LEN, SYMMETRIC_KEY_LEN};
use crate::error::{CryptoError, CryptoResult};
use crate::format::{base64_decode, base64_encode};

pub use kdf::{derive_key_from_password, derive_key_with_salt};

/// AES-256 key with automatic zeroization on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; SYMMETRIC_KEY_LEN]);

impl SymmetricKey {
    /// Create a key from raw bytes.
    pub fn from_bytes(bytes: [u8; SYMMETRIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create a key from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let arr: [u8; SYMMETRIC_KEY_LEN] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "expected {} bytes, got {}",
                SYMMETRIC_KEY_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Get the key bytes.
    pub fn as_bytes(&self) -> &[u8; SYMMETRIC_KEY_LEN] {
        &self.0
    }

    /// Encode the key as base64 for transport.
    pub fn to_base64(&self) -> String {
        base64_encode(&self.0)
    }

    /// Decode a base64 key.
    pub fn from_base64(text: &str) -> CryptoResult<Self> {
        let mut bytes = base64_decode(text)?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }
}

impl Clone for SymmetricKey {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 256-bit key.
pub fn generate_key<R: RngCore + CryptoRng>(rng: &mut R) -> SymmetricKey {
    SymmetricKey(modes::generate_random(rng))
}

/// Block cipher mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CipherMode {
    Ecb,
    Cbc,
    Ctr,
    #[default]
    Gcm,
}

impl CipherMode {
    /// All modes, weakest first.
    pub const ALL: [CipherMode; 4] = [
        CipherMode::Ecb,
        CipherMode::Cbc,
        CipherMode::Ctr,
        CipherMode::Gcm,
    ];

    /// IV length carried at the front of the envelope.
    pub fn iv_len(&self) -> usize {
        match self {
            CipherMode::Ecb => 0,
            CipherMode::Cbc | CipherMode::Ctr => BLOCK_IV_LEN,
            CipherMode::Gcm => GCM_NONCE_LEN,
        }
    }

    /// Whether decryption verifies integrity.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, CipherMode::Gcm)
    }

    /// Canonical tag for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            CipherMode::Ecb => "ECB",
            CipherMode::Cbc => "CBC",
            CipherMode::Ctr => "CTR",
            CipherMode::Gcm => "GCM",
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherMode {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ECB" => Ok(CipherMode::Ecb),
            "CBC" => Ok(CipherMode::Cbc),
            "CTR" => Ok(CipherMode::Ctr),
            "GCM" => Ok(CipherMode::Gcm),
            other => Err(CryptoError::UnsupportedAlgorithm(format!(
                "cipher mode '{}' (use ECB, CBC, CTR or GCM)",
                other
            ))),
        }
    }
}

/// Output of a symmetric encryption: `IV ‖ ciphertext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherEnvelope {
    mode: CipherMode,
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
}

impl CipherEnvelope {
    /// Mode the envelope was produced under.
    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    /// IV bytes; empty for ECB.
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Ciphertext bytes (GCM includes the tag).
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Raw `IV ‖ ciphertext` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.iv.len() + self.ciphertext.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Split raw bytes into IV and ciphertext for `mode`.
    pub fn from_bytes(mode: CipherMode, bytes: &[u8]) -> CryptoResult<Self> {
        let iv_len = mode.iv_len();
        if bytes.len() < iv_len {
            return Err(CryptoError::TruncatedEnvelope {
                expected: iv_len,
                actual: bytes.len(),
            });
        }
        let (iv, ciphertext) = bytes.split_at(iv_len);
        Ok(Self {
            mode,
            iv: iv.to_vec(),
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Text form: `Base64(IV ‖ ciphertext)`.
    pub fn encode(&self) -> String {
        base64_encode(&self.to_bytes())
    }

    /// Parse the text form. The mode is not recorded in the envelope and
    /// must be supplied by the caller.
    pub fn decode(mode: CipherMode, text: &str) -> CryptoResult<Self> {
        Self::from_bytes(mode, &base64_decode(text)?)
    }
}

impl fmt::Display for CipherEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Encrypt under `mode` with a fresh random IV drawn from `rng`.
pub fn encrypt<R: RngCore + CryptoRng>(
    mode: CipherMode,
    plaintext: &[u8],
    key: &SymmetricKey,
    rng: &mut R,
) -> CryptoResult<CipherEnvelope> {
    let iv: Vec<u8> = match mode {
        CipherMode::Ecb => Vec::new(),
        CipherMode::Cbc | CipherMode::Ctr => modes::generate_block_iv(rng).to_vec(),
        CipherMode::Gcm => modes::generate_nonce(rng).to_vec(),
    };
    encrypt_with_iv(mode, plaintext, key, &iv)
}

/// Encrypt under `mode` with a caller-supplied IV.
///
/// The IV must match [`CipherMode::iv_len`]; ECB takes an empty IV. Reusing
/// an IV with the same key breaks CTR and GCM completely.
pub fn encrypt_with_iv(
    mode: CipherMode,
    plaintext: &[u8],
    key: &SymmetricKey,
    iv: &[u8],
) -> CryptoResult<CipherEnvelope> {
    if iv.len() != mode.iv_len() {
        return Err(CryptoError::InvalidInput(format!(
            "{} requires a {}-byte IV, got {}",
            mode,
            mode.iv_len(),
            iv.len()
        )));
    }

    let ciphertext = match mode {
        CipherMode::Ecb => modes::aes_ecb_encrypt(key.as_bytes(), plaintext),
        CipherMode::Cbc => modes::aes_cbc_encrypt(key.as_bytes(), &block_iv(iv)?, plaintext),
        CipherMode::Ctr => modes::aes_ctr_apply(key.as_bytes(), &block_iv(iv)?, plaintext),
        CipherMode::Gcm => modes::aes_gcm_encrypt(key.as_bytes(), &gcm_nonce(iv)?, plaintext)?,
    };

    debug!(
        subsystem = "crypto",
        component = "symmetric",
        op = "encrypt",
        mode = %mode,
        input_len = plaintext.len(),
        output_len = ciphertext.len(),
        "Symmetric encryption complete"
    );

    Ok(CipherEnvelope {
        mode,
        iv: iv.to_vec(),
        ciphertext,
    })
}

/// Decrypt an envelope.
///
/// GCM fails with [`CryptoError::Authentication`] if the tag does not verify;
/// no plaintext is returned in that case.
pub fn decrypt(envelope: &CipherEnvelope, key: &SymmetricKey) -> CryptoResult<Vec<u8>> {
    let iv = envelope.iv();
    let ciphertext = envelope.ciphertext();

    let plaintext = match envelope.mode {
        CipherMode::Ecb => modes::aes_ecb_decrypt(key.as_bytes(), ciphertext)?,
        CipherMode::Cbc => modes::aes_cbc_decrypt(key.as_bytes(), &block_iv(iv)?, ciphertext)?,
        CipherMode::Ctr => modes::aes_ctr_apply(key.as_bytes(), &block_iv(iv)?, ciphertext),
        CipherMode::Gcm => modes::aes_gcm_decrypt(key.as_bytes(), &gcm_nonce(iv)?, ciphertext)?,
    };

    debug!(
        subsystem = "crypto",
        component = "symmetric",
        op = "decrypt",
        mode = %envelope.mode,
        input_len = ciphertext.len(),
        output_len = plaintext.len(),
        "Symmetric decryption complete"
    );

    Ok(plaintext)
}

/// Decrypt the text form of an envelope in one step.
pub fn decrypt_text(mode: CipherMode, text: &str, key: &SymmetricKey) -> CryptoResult<Vec<u8>> {
    decrypt(&CipherEnvelope::decode(mode, text)?, key)
}

/// Encode an IV for transport.
pub fn encode_iv(iv: &[u8]) -> String {
    base64_encode(iv)
}

/// Decode a transported IV.
pub fn decode_iv(text: &str) -> CryptoResult<Vec<u8>> {
    base64_decode(text)
}

fn block_iv(iv: &[u8]) -> CryptoResult<[u8; BLOCK_IV_LEN]> {
    iv.try_into().map_err(|_| CryptoError::TruncatedEnvelope {
        expected: BLOCK_IV_LEN,
        actual: iv.len(),
    })
}

fn gcm_nonce(iv: &[u8]) -> CryptoResult<[u8; GCM_NONCE_LEN]> {
    iv.try_into().map_err(|_| CryptoError::TruncatedEnvelope {
        expected: GCM_NONCE_LEN,
        actual: iv.len(),
    })
}
