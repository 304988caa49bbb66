//! # cipherdesk-crypto
//!
//! Cryptographic operations engine for cipherdesk.
//!
//! The engine is stateless: every operation is a pure function of its inputs
//! plus an injected random source. Callers own every key, envelope and
//! signature it produces; nothing is persisted here.
//!
//! ## Cryptographic Primitives
//!
//! - **Symmetric cipher**: AES-256 in ECB, CBC, CTR and GCM modes
//! - **Key derivation**: PBKDF2-HMAC-SHA256, 65 536 iterations, fixed engine salt
//! - **Asymmetric keys**: RSA-2048 and NIST P-256
//! - **RSA encryption**: PKCS#1 v1.5 and OAEP-SHA256
//! - **Signatures**: SHA256withRSA and SHA256withECDSA, chosen by key family
//! - **Hybrid encryption**: AES-256-GCM payload, OAEP-wrapped key
//! - **ECIES**: ephemeral P-256 ECDH, SHA-256 KDF, AES-256-GCM
//!
//! ## Wire Format
//!
//! ```text
//! Symmetric envelope:   Base64( IV ‖ ciphertext[‖ tag] )
//!                       IV = 16 bytes (CBC, CTR), 12 bytes (GCM), none (ECB)
//! Public key:           Base64( X.509 SubjectPublicKeyInfo DER )
//! Private key:          Base64( PKCS#8 DER )
//! Hybrid envelope:      { ciphertext, wrapped_key, iv }
//! ECIES envelope:       { ephemeral_public_key, ciphertext, iv }
//! ```
//!
//! ## Examples
//!
//! ### Sign and Verify
//!
//! ```rust
//! use cipherdesk_crypto::{generate_key_pair, sign, verify, KeyFamily};
//!
//! let mut rng = rand::thread_rng();
//! let keypair = generate_key_pair(KeyFamily::Ec, &mut rng).unwrap();
//!
//! let signature = sign(b"approve #42", &keypair.private, &mut rng).unwrap();
//! assert!(verify(b"approve #42", &signature, &keypair.public));
//! assert!(!verify(b"approve #43", &signature, &keypair.public));
//! ```
//!
//! ### Encrypt for an EC Recipient
//!
//! ```rust
//! use cipherdesk_crypto::{decrypt_ecies, encrypt_ecies, generate_key_pair, KeyFamily};
//!
//! let mut rng = rand::thread_rng();
//! let bob = generate_key_pair(KeyFamily::Ec, &mut rng).unwrap();
//!
//! let envelope = encrypt_ecies(b"Confidential", &bob.public, &mut rng).unwrap();
//! assert_eq!(decrypt_ecies(&envelope, &bob.private).unwrap(), b"Confidential");
//! ```

pub mod asymmetric;
pub mod config;
pub mod defaults;
pub mod ecies;
pub mod error;
pub mod format;
pub mod hybrid;
pub mod keys;
pub mod symmetric;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use asymmetric::{generate_key_pair, generate_key_pair_for, sign, verify, RsaPadding};
pub use config::{EngineConfig, KeySource};
pub use ecies::{decrypt_ecies, encrypt_ecies, EciesEnvelope};
pub use error::{CryptoError, CryptoResult};
pub use format::{base64_decode, base64_encode};
pub use hybrid::{decrypt_hybrid, encrypt_hybrid, HybridEnvelope};
pub use keys::{
    decode_private, decode_public, encode_private, encode_public, KeyFamily, KeyPair, PrivateKey,
    PublicKey,
};
pub use symmetric::{CipherEnvelope, CipherMode, SymmetricKey};
