//! Hybrid (envelope) encryption for RSA recipients.
//!
//! # Encryption Flow
//!
//! 1. Generate a random 256-bit DEK (Data Encryption Key)
//! 2. Generate a random 12-byte nonce
//! 3. Encrypt plaintext with the DEK using AES-256-GCM
//! 4. Wrap the DEK under the recipient's RSA key with OAEP-SHA256
//!
//! # Decryption Flow
//!
//! 1. Unwrap the DEK with the recipient's RSA private key
//! 2. Decrypt and authenticate the payload with the DEK
//!
//! Payload size is unbounded; only the 32-byte DEK passes through RSA.
//! Decryption reports a single opaque error whichever stage fails.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroize;

use crate::asymmetric::rsa_cipher::{self, RsaPadding};
use crate::defaults::GCM_NONCE_LEN;
use crate::error::{CryptoError, CryptoResult};
use crate::format::{base64_decode, base64_encode};
use crate::keys::{KeyFamily, PrivateKey, PublicKey};
use crate::symmetric::modes::{aes_gcm_decrypt, aes_gcm_encrypt, generate_nonce};
use crate::symmetric::{generate_key, SymmetricKey};

/// Result of hybrid encryption.
///
/// All three fields are required to decrypt; store and relay them together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridEnvelope {
    /// AES-256-GCM ciphertext with appended tag.
    #[serde(with = "crate::format::base64_bytes")]
    pub ciphertext: Vec<u8>,
    /// DEK encrypted under the recipient's RSA key (OAEP-SHA256, MGF1-SHA-1).
    #[serde(with = "crate::format::base64_bytes")]
    pub wrapped_key: Vec<u8>,
    /// GCM nonce.
    #[serde(with = "crate::format::base64_bytes")]
    pub iv: Vec<u8>,
}

impl HybridEnvelope {
    /// Rebuild an envelope from its three Base64 text fields.
    pub fn from_base64(ciphertext: &str, wrapped_key: &str, iv: &str) -> CryptoResult<Self> {
        Ok(Self {
            ciphertext: base64_decode(ciphertext)?,
            wrapped_key: base64_decode(wrapped_key)?,
            iv: base64_decode(iv)?,
        })
    }

    /// The three fields as Base64 text: `(ciphertext, wrapped_key, iv)`.
    pub fn to_base64(&self) -> (String, String, String) {
        (
            base64_encode(&self.ciphertext),
            base64_encode(&self.wrapped_key),
            base64_encode(&self.iv),
        )
    }
}

/// Encrypt a payload of any size for an RSA recipient.
pub fn encrypt_hybrid<R: RngCore + CryptoRng>(
    plaintext: &[u8],
    recipient: &PublicKey,
    rng: &mut R,
) -> CryptoResult<HybridEnvelope> {
    if recipient.family() != KeyFamily::Rsa {
        return Err(CryptoError::InvalidKeyFamily {
            expected: KeyFamily::Rsa,
            actual: recipient.family(),
        });
    }

    let dek = generate_key(rng);
    let nonce = generate_nonce(rng);

    let ciphertext = aes_gcm_encrypt(dek.as_bytes(), &nonce, plaintext)?;
    let wrapped_key = rsa_cipher::encrypt(RsaPadding::Oaep, dek.as_bytes(), recipient, rng)?;

    debug!(
        subsystem = "crypto",
        component = "hybrid",
        op = "encrypt",
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "Hybrid encryption complete"
    );

    Ok(HybridEnvelope {
        ciphertext,
        wrapped_key,
        iv: nonce.to_vec(),
    })
}

/// Decrypt a hybrid envelope with the recipient's RSA private key.
///
/// A bad wrapped key, wrong private key, wrong nonce or tampered payload
/// all return [`CryptoError::Decryption`].
pub fn decrypt_hybrid(envelope: &HybridEnvelope, private_key: &PrivateKey) -> CryptoResult<Vec<u8>> {
    if private_key.family() != KeyFamily::Rsa {
        return Err(CryptoError::InvalidKeyFamily {
            expected: KeyFamily::Rsa,
            actual: private_key.family(),
        });
    }

    open(envelope, private_key).map_err(|_| {
        debug!(
            subsystem = "crypto",
            component = "hybrid",
            op = "decrypt",
            "Hybrid decryption failed"
        );
        CryptoError::Decryption
    })
}

fn open(envelope: &HybridEnvelope, private_key: &PrivateKey) -> CryptoResult<Vec<u8>> {
    let nonce: [u8; GCM_NONCE_LEN] = envelope
        .iv
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::Decryption)?;

    let mut raw = rsa_cipher::decrypt(RsaPadding::Oaep, &envelope.wrapped_key, private_key)?;
    let dek = SymmetricKey::from_slice(&raw);
    raw.zeroize();
    let dek = dek?;

    aes_gcm_decrypt(dek.as_bytes(), &nonce, &envelope.ciphertext)
}
