//! AES-256 block mode primitives.
//!
//! Raw codecs over byte slices. Framing (IV prefix, Base64) is handled by
//! [`super::CipherEnvelope`].

use aes::Aes256;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use cbc::cipher::{
    block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher,
};
use rand::{CryptoRng, RngCore};

use crate::defaults::{BLOCK_IV_LEN, GCM_NONCE_LEN, SYMMETRIC_KEY_LEN};
use crate::error::{CryptoError, CryptoResult};

type Aes256EcbEnc = ecb::Encryptor<Aes256>;
type Aes256EcbDec = ecb::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Generate cryptographically secure random bytes.
pub fn generate_random<const N: usize, R: RngCore + CryptoRng>(rng: &mut R) -> [u8; N] {
    let mut bytes = [0u8; N];
    rng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a random CBC/CTR IV (16 bytes).
pub fn generate_block_iv<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; BLOCK_IV_LEN] {
    generate_random(rng)
}

/// Generate a random GCM nonce (12 bytes).
pub fn generate_nonce<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; GCM_NONCE_LEN] {
    generate_random(rng)
}

/// Encrypt with AES-256-ECB and PKCS#7 padding.
///
/// Identical plaintext blocks produce identical ciphertext blocks. Kept for
/// comparison with the chained modes; do not use it to protect data.
pub fn aes_ecb_encrypt(key: &[u8; SYMMETRIC_KEY_LEN], plaintext: &[u8]) -> Vec<u8> {
    Aes256EcbEnc::new(key.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypt AES-256-ECB with PKCS#7 padding.
pub fn aes_ecb_decrypt(
    key: &[u8; SYMMETRIC_KEY_LEN],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    Aes256EcbDec::new(key.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Decryption)
}

/// Encrypt with AES-256-CBC and PKCS#7 padding.
pub fn aes_cbc_encrypt(
    key: &[u8; SYMMETRIC_KEY_LEN],
    iv: &[u8; BLOCK_IV_LEN],
    plaintext: &[u8],
) -> Vec<u8> {
    Aes256CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypt AES-256-CBC with PKCS#7 padding.
///
/// A wrong key, a ciphertext that is not a whole number of blocks and bad
/// padding all fail the same way.
pub fn aes_cbc_decrypt(
    key: &[u8; SYMMETRIC_KEY_LEN],
    iv: &[u8; BLOCK_IV_LEN],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    Aes256CbcDec::new(key.into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Decryption)
}

/// Apply the AES-256-CTR keystream (128-bit big-endian counter).
///
/// Encryption and decryption are the same operation; output length equals
/// input length.
pub fn aes_ctr_apply(
    key: &[u8; SYMMETRIC_KEY_LEN],
    iv: &[u8; BLOCK_IV_LEN],
    data: &[u8],
) -> Vec<u8> {
    let mut buf = data.to_vec();
    let mut cipher = Aes256Ctr::new(key.into(), iv.into());
    cipher.apply_keystream(&mut buf);
    buf
}

/// Encrypt plaintext with AES-256-GCM.
///
/// Returns ciphertext with appended authentication tag (16 bytes).
pub fn aes_gcm_encrypt(
    key: &[u8; SYMMETRIC_KEY_LEN],
    nonce: &[u8; GCM_NONCE_LEN],
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.into());

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::Encryption("AES-GCM encryption failed".into()))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// The ciphertext must include the authentication tag (16 bytes) at the end.
/// Nothing is returned unless the tag verifies.
pub fn aes_gcm_decrypt(
    key: &[u8; SYMMETRIC_KEY_LEN],
    nonce: &[u8; GCM_NONCE_LEN],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.into());

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}
