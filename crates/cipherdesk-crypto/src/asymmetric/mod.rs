//! RSA and EC key generation, RSA encryption and family-bound signatures.
//!
//! The family of the key decides every algorithm choice:
//!
//! - **RSA-2048**: PKCS#1 v1.5 or OAEP-SHA256 encryption, SHA256withRSA signatures
//! - **EC P-256**: SHA256withECDSA signatures, ECIES (see [`crate::ecies`])
//!
//! Passing a key of the wrong family is a typed error, never a panic.

pub mod rsa_cipher;
pub mod signature;

use ::rsa::RsaPrivateKey;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::defaults::RSA_KEY_BITS;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{KeyFamily, KeyPair, PrivateKey};

pub use rsa_cipher::{
    decrypt, decrypt_oaep, decrypt_pkcs1, encrypt, encrypt_oaep, encrypt_pkcs1,
    max_plaintext_len, RsaPadding,
};
pub use signature::{sign, sign_ecdsa, verify, verify_ecdsa, SignatureAlgorithm};

/// Generate a key pair for `family`.
///
/// RSA keys are 2048-bit; EC keys are on P-256.
pub fn generate_key_pair<R: RngCore + CryptoRng>(
    family: KeyFamily,
    rng: &mut R,
) -> CryptoResult<KeyPair> {
    let private = match family {
        KeyFamily::Rsa => PrivateKey::Rsa(
            RsaPrivateKey::new(rng, RSA_KEY_BITS)
                .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?,
        ),
        KeyFamily::Ec => PrivateKey::Ec(p256::SecretKey::random(rng)),
    };

    debug!(
        subsystem = "crypto",
        component = "asymmetric",
        op = "generate_key_pair",
        family = %family,
        "Key pair generated"
    );

    Ok(KeyPair::from_private(private))
}

/// Generate a key pair from a family tag such as `"RSA"` or `"ec"`.
pub fn generate_key_pair_for<R: RngCore + CryptoRng>(
    family: &str,
    rng: &mut R,
) -> CryptoResult<KeyPair> {
    generate_key_pair(family.parse()?, rng)
}
