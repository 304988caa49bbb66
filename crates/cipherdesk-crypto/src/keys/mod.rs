//! Asymmetric key types for the two supported families.
//!
//! This module provides:
//! - `KeyFamily`, the RSA / EC discriminator every asymmetric operation binds to
//! - `PublicKey` / `PrivateKey`, tagged over the family
//! - `KeyPair`, the immutable result of key generation
//! - Text interchange via [`codec`] (SPKI / PKCS#8 DER in Base64)
//!
//! # Security
//!
//! - Private keys are zeroized on drop by the underlying implementations
//! - `Debug` output never includes private key material

pub mod codec;

use std::fmt;
use std::str::FromStr;

use p256::elliptic_curve::sec1::ToEncodedPoint;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

pub use codec::{
    decode_private, decode_public, encode_private, encode_public, load_key_text, save_key_text,
};

/// Asymmetric key family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyFamily {
    /// RSA-2048.
    #[default]
    #[serde(rename = "RSA")]
    Rsa,
    /// NIST P-256.
    #[serde(rename = "EC")]
    Ec,
}

impl KeyFamily {
    /// Canonical tag for this family.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyFamily::Rsa => "RSA",
            KeyFamily::Ec => "EC",
        }
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyFamily {
    type Err = CryptoError;

    /// Parse a case-insensitive family tag. `ECDSA` and `ECC` are accepted
    /// aliases for `EC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RSA" => Ok(KeyFamily::Rsa),
            "EC" | "ECDSA" | "ECC" => Ok(KeyFamily::Ec),
            other => Err(CryptoError::UnsupportedAlgorithm(format!(
                "key family '{}' (use RSA or EC)",
                other
            ))),
        }
    }
}

/// Public key of either family.
#[derive(Clone, PartialEq, Eq)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Ec(p256::PublicKey),
}

impl PublicKey {
    /// Family of this key.
    pub fn family(&self) -> KeyFamily {
        match self {
            PublicKey::Rsa(_) => KeyFamily::Rsa,
            PublicKey::Ec(_) => KeyFamily::Ec,
        }
    }

    /// RSA modulus length in bytes, `None` for EC keys.
    pub fn rsa_size(&self) -> Option<usize> {
        match self {
            PublicKey::Rsa(key) => Some(key.size()),
            PublicKey::Ec(_) => None,
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicKey::Rsa(key) => write!(f, "PublicKey::Rsa({} bits)", key.size() * 8),
            PublicKey::Ec(key) => {
                let point = key.to_encoded_point(true);
                write!(f, "PublicKey::Ec({})", hex::encode(&point.as_bytes()[..8]))
            }
        }
    }
}

/// Private key of either family.
///
/// The wrapped key types zeroize their secret material when dropped.
#[derive(Clone)]
pub enum PrivateKey {
    Rsa(RsaPrivateKey),
    Ec(p256::SecretKey),
}

impl PrivateKey {
    /// Family of this key.
    pub fn family(&self) -> KeyFamily {
        match self {
            PrivateKey::Rsa(_) => KeyFamily::Rsa,
            PrivateKey::Ec(_) => KeyFamily::Ec,
        }
    }

    /// Derive the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            PrivateKey::Rsa(key) => PublicKey::Rsa(key.to_public_key()),
            PrivateKey::Ec(key) => PublicKey::Ec(key.public_key()),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("family", &self.family())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Asymmetric key pair.
///
/// Created by [`crate::asymmetric::generate_key_pair`]; owned by the caller.
#[derive(Clone)]
pub struct KeyPair {
    /// The public key (can be shared).
    pub public: PublicKey,
    /// The private key (must be kept secret).
    pub private: PrivateKey,
}

impl KeyPair {
    /// Rebuild a key pair from its private half.
    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { public, private }
    }

    /// Family shared by both halves.
    pub fn family(&self) -> KeyFamily {
        self.private.family()
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &"[REDACTED]")
            .finish()
    }
}
