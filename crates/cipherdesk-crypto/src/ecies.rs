//! ECIES over P-256: ephemeral ECDH, SHA-256 key derivation, AES-256-GCM.
//!
//! # Protocol
//!
//! For encryption:
//! 1. Sender generates an ephemeral P-256 keypair
//! 2. Sender computes: shared_secret = ECDH(ephemeral_private, recipient_public)
//! 3. Sender derives the AES key as SHA-256(shared_secret)
//! 4. Ephemeral public key is sent with ciphertext and nonce
//!
//! For decryption:
//! 1. Recipient computes: shared_secret = ECDH(recipient_private, ephemeral_public)
//! 2. Recipient derives the same AES key
//! 3. Same key allows decryption
//!
//! # Security
//!
//! - One ephemeral key per message; there is no ratchet beyond that
//! - The KDF is a single SHA-256 over the raw x-coordinate, not HKDF
//! - Shared secrets and derived keys are zeroized after use

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::defaults::GCM_NONCE_LEN;
use crate::error::{CryptoError, CryptoResult};
use crate::format::base64_decode;
use crate::keys::{decode_public, encode_public, KeyFamily, PrivateKey, PublicKey};
use crate::symmetric::modes::{aes_gcm_decrypt, aes_gcm_encrypt, generate_nonce};
use crate::symmetric::SymmetricKey;

/// Shared secret from ECDH (32 bytes).
///
/// This is the raw x-coordinate of the agreed point. It should be
/// passed through [`derive_encryption_key`] before use as an encryption key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Get the raw bytes of the shared secret.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Result of ECIES encryption.
///
/// All three fields are required to decrypt; store and relay them together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EciesEnvelope {
    /// Ephemeral public key, SPKI DER in Base64.
    pub ephemeral_public_key: String,
    /// AES-256-GCM ciphertext with appended tag.
    #[serde(with = "crate::format::base64_bytes")]
    pub ciphertext: Vec<u8>,
    /// GCM nonce.
    #[serde(with = "crate::format::base64_bytes")]
    pub iv: Vec<u8>,
}

impl EciesEnvelope {
    /// Rebuild an envelope from its three Base64 text fields.
    pub fn from_base64(
        ephemeral_public_key: &str,
        ciphertext: &str,
        iv: &str,
    ) -> CryptoResult<Self> {
        Ok(Self {
            ephemeral_public_key: ephemeral_public_key.trim().to_string(),
            ciphertext: base64_decode(ciphertext)?,
            iv: base64_decode(iv)?,
        })
    }
}

/// Perform P-256 Diffie-Hellman key exchange.
///
/// The result is the same whether computed as:
/// - ECDH(our_private, their_public)
/// - ECDH(their_private, our_public)
pub fn ecdh(our_private: &p256::SecretKey, their_public: &p256::PublicKey) -> SharedSecret {
    let shared =
        p256::ecdh::diffie_hellman(our_private.to_nonzero_scalar(), their_public.as_affine());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(shared.raw_secret_bytes());
    SharedSecret(bytes)
}

/// Derive the AES-256 key as SHA-256 over the raw shared secret.
pub fn derive_encryption_key(shared_secret: &SharedSecret) -> SymmetricKey {
    let mut digest: [u8; 32] = Sha256::digest(shared_secret.as_bytes()).into();
    let key = SymmetricKey::from_bytes(digest);
    digest.zeroize();
    key
}

/// Encrypt a payload of any size for an EC recipient.
pub fn encrypt_ecies<R: RngCore + CryptoRng>(
    plaintext: &[u8],
    recipient: &PublicKey,
    rng: &mut R,
) -> CryptoResult<EciesEnvelope> {
    let recipient_key = ec_public(recipient)?;

    let ephemeral = p256::SecretKey::random(rng);
    let ephemeral_public = PublicKey::Ec(ephemeral.public_key());

    let key = derive_encryption_key(&ecdh(&ephemeral, recipient_key));
    let nonce = generate_nonce(rng);
    let ciphertext = aes_gcm_encrypt(key.as_bytes(), &nonce, plaintext)?;

    debug!(
        subsystem = "crypto",
        component = "ecies",
        op = "encrypt",
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "ECIES encryption complete"
    );

    Ok(EciesEnvelope {
        ephemeral_public_key: encode_public(&ephemeral_public)?,
        ciphertext,
        iv: nonce.to_vec(),
    })
}

/// Decrypt an ECIES envelope with the recipient's EC private key.
///
/// A malformed ephemeral key, wrong private key, wrong nonce or tampered
/// payload all return [`CryptoError::Decryption`].
pub fn decrypt_ecies(envelope: &EciesEnvelope, private_key: &PrivateKey) -> CryptoResult<Vec<u8>> {
    let secret = match private_key {
        PrivateKey::Ec(secret) => secret,
        PrivateKey::Rsa(_) => {
            return Err(CryptoError::InvalidKeyFamily {
                expected: KeyFamily::Ec,
                actual: KeyFamily::Rsa,
            })
        }
    };

    open(envelope, secret).map_err(|_| {
        debug!(
            subsystem = "crypto",
            component = "ecies",
            op = "decrypt",
            "ECIES decryption failed"
        );
        CryptoError::Decryption
    })
}

fn open(envelope: &EciesEnvelope, secret: &p256::SecretKey) -> CryptoResult<Vec<u8>> {
    let ephemeral = decode_public(&envelope.ephemeral_public_key)?;
    let ephemeral = ec_public(&ephemeral)?;
    let nonce: [u8; GCM_NONCE_LEN] = envelope
        .iv
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::Decryption)?;

    let key = derive_encryption_key(&ecdh(secret, ephemeral));
    aes_gcm_decrypt(key.as_bytes(), &nonce, &envelope.ciphertext)
}

fn ec_public(key: &PublicKey) -> CryptoResult<&p256::PublicKey> {
    match key {
        PublicKey::Ec(k) => Ok(k),
        PublicKey::Rsa(_) => Err(CryptoError::InvalidKeyFamily {
            expected: KeyFamily::Ec,
            actual: KeyFamily::Rsa,
        }),
    }
}
