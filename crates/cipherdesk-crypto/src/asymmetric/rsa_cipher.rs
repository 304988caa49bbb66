//! RSA encryption under PKCS#1 v1.5 and OAEP padding.
//!
//! Plaintext ceilings for a `k`-byte modulus:
//!
//! - PKCS#1 v1.5: `k - 11` (245 bytes for RSA-2048)
//! - OAEP with a SHA-256 label hash and MGF1-SHA-1: `k - 66` (190 bytes for
//!   RSA-2048). This is the JCE `OAEPWithSHA-256AndMGF1Padding` default, so
//!   ciphertexts interoperate with keys wrapped by Java services.
//!
//! Oversized input is rejected before any RSA operation runs.

use std::fmt;
use std::str::FromStr;

use rand::{CryptoRng, RngCore};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::Sha256;
use tracing::debug;

use crate::defaults::{OAEP_SHA256_OVERHEAD, PKCS1_OVERHEAD};
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{KeyFamily, PrivateKey, PublicKey};

/// RSA encryption padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RsaPadding {
    /// PKCS#1 v1.5 (legacy).
    Pkcs1,
    /// OAEP with SHA-256 and MGF1-SHA-1.
    #[default]
    Oaep,
}

impl RsaPadding {
    /// Padding overhead in bytes.
    pub fn overhead(&self) -> usize {
        match self {
            RsaPadding::Pkcs1 => PKCS1_OVERHEAD,
            RsaPadding::Oaep => OAEP_SHA256_OVERHEAD,
        }
    }

    /// Canonical tag for this padding.
    pub fn as_str(&self) -> &'static str {
        match self {
            RsaPadding::Pkcs1 => "PKCS1",
            RsaPadding::Oaep => "OAEP",
        }
    }
}

impl fmt::Display for RsaPadding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RsaPadding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PKCS1" => Ok(RsaPadding::Pkcs1),
            "OAEP" => Ok(RsaPadding::Oaep),
            other => Err(CryptoError::UnsupportedAlgorithm(format!(
                "RSA padding '{}' (use PKCS1 or OAEP)",
                other
            ))),
        }
    }
}

/// Largest plaintext `key` can encrypt under `padding`.
pub fn max_plaintext_len(padding: RsaPadding, key: &PublicKey) -> CryptoResult<usize> {
    let size = rsa_public(key)?.size();
    Ok(size.saturating_sub(padding.overhead()))
}

/// Encrypt with PKCS#1 v1.5 padding.
pub fn encrypt_pkcs1<R: RngCore + CryptoRng>(
    plaintext: &[u8],
    public_key: &PublicKey,
    rng: &mut R,
) -> CryptoResult<Vec<u8>> {
    encrypt(RsaPadding::Pkcs1, plaintext, public_key, rng)
}

/// Decrypt PKCS#1 v1.5 ciphertext.
pub fn decrypt_pkcs1(ciphertext: &[u8], private_key: &PrivateKey) -> CryptoResult<Vec<u8>> {
    decrypt(RsaPadding::Pkcs1, ciphertext, private_key)
}

/// Encrypt with OAEP-SHA256 padding.
pub fn encrypt_oaep<R: RngCore + CryptoRng>(
    plaintext: &[u8],
    public_key: &PublicKey,
    rng: &mut R,
) -> CryptoResult<Vec<u8>> {
    encrypt(RsaPadding::Oaep, plaintext, public_key, rng)
}

/// Decrypt OAEP-SHA256 ciphertext.
pub fn decrypt_oaep(ciphertext: &[u8], private_key: &PrivateKey) -> CryptoResult<Vec<u8>> {
    decrypt(RsaPadding::Oaep, ciphertext, private_key)
}

/// Encrypt under the selected padding.
pub fn encrypt<R: RngCore + CryptoRng>(
    padding: RsaPadding,
    plaintext: &[u8],
    public_key: &PublicKey,
    rng: &mut R,
) -> CryptoResult<Vec<u8>> {
    let key = rsa_public(public_key)?;
    let max = key.size().saturating_sub(padding.overhead());
    if plaintext.len() > max {
        return Err(CryptoError::PlaintextTooLarge {
            len: plaintext.len(),
            max,
        });
    }

    let ciphertext = match padding {
        RsaPadding::Pkcs1 => key.encrypt(rng, Pkcs1v15Encrypt, plaintext),
        RsaPadding::Oaep => key.encrypt(rng, oaep(), plaintext),
    }
    .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    debug!(
        subsystem = "crypto",
        component = "rsa",
        op = "encrypt",
        padding = %padding,
        input_len = plaintext.len(),
        "RSA encryption complete"
    );

    Ok(ciphertext)
}

/// Decrypt under the selected padding.
///
/// Any padding or key mismatch yields [`CryptoError::Decryption`].
pub fn decrypt(
    padding: RsaPadding,
    ciphertext: &[u8],
    private_key: &PrivateKey,
) -> CryptoResult<Vec<u8>> {
    let key = rsa_private(private_key)?;

    match padding {
        RsaPadding::Pkcs1 => key.decrypt(Pkcs1v15Encrypt, ciphertext),
        RsaPadding::Oaep => key.decrypt(oaep(), ciphertext),
    }
    .map_err(|_| CryptoError::Decryption)
}

// Overhead depends only on the label hash, so the SHA-1 mask keeps the
// 2 * 32 + 2 ceiling.
fn oaep() -> Oaep {
    Oaep::new_with_mgf_hash::<Sha256, Sha1>()
}

pub(crate) fn rsa_public(key: &PublicKey) -> CryptoResult<&RsaPublicKey> {
    match key {
        PublicKey::Rsa(k) => Ok(k),
        PublicKey::Ec(_) => Err(CryptoError::InvalidKeyFamily {
            expected: KeyFamily::Rsa,
            actual: KeyFamily::Ec,
        }),
    }
}

pub(crate) fn rsa_private(key: &PrivateKey) -> CryptoResult<&RsaPrivateKey> {
    match key {
        PrivateKey::Rsa(k) => Ok(k),
        PrivateKey::Ec(_) => Err(CryptoError::InvalidKeyFamily {
            expected: KeyFamily::Rsa,
            actual: KeyFamily::Ec,
        }),
    }
}
