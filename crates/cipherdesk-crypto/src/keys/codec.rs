//! Key interchange encoding.
//!
//! Public keys travel as X.509 SubjectPublicKeyInfo DER, private keys as
//! PKCS#8 DER, both wrapped in standard Base64. The encoded bytes carry no
//! family tag of our own, so decoding tries RSA first and falls back to EC.
//! A malformed RSA key that happens to fail both parses is reported as a
//! generic decode error rather than the RSA-specific cause.

use std::path::Path;

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::trace;

use crate::defaults::EC_CURVE;
use crate::error::{CryptoError, CryptoResult};
use crate::format::{base64_decode, base64_encode};
use crate::keys::{PrivateKey, PublicKey};

/// Encode a public key as Base64 SPKI DER.
pub fn encode_public(key: &PublicKey) -> CryptoResult<String> {
    let der = match key {
        PublicKey::Rsa(k) => k.to_public_key_der(),
        PublicKey::Ec(k) => k.to_public_key_der(),
    }
    .map_err(|e| CryptoError::KeyEncode(e.to_string()))?;
    Ok(base64_encode(der.as_bytes()))
}

/// Encode a private key as Base64 PKCS#8 DER.
pub fn encode_private(key: &PrivateKey) -> CryptoResult<String> {
    let der = match key {
        PrivateKey::Rsa(k) => k.to_pkcs8_der(),
        PrivateKey::Ec(k) => k.to_pkcs8_der(),
    }
    .map_err(|e| CryptoError::KeyEncode(e.to_string()))?;
    Ok(base64_encode(der.as_bytes()))
}

/// Decode a Base64 SPKI public key, detecting its family.
pub fn decode_public(text: &str) -> CryptoResult<PublicKey> {
    let der = base64_decode(text).map_err(|e| CryptoError::KeyDecode(e.to_string()))?;

    match RsaPublicKey::from_public_key_der(&der) {
        Ok(key) => return Ok(PublicKey::Rsa(key)),
        Err(e) => trace!(
            subsystem = "crypto",
            component = "key_codec",
            op = "decode_public",
            error = %e,
            "Not an RSA public key, trying EC"
        ),
    }

    p256::PublicKey::from_public_key_der(&der)
        .map(PublicKey::Ec)
        .map_err(|_| CryptoError::KeyDecode(format!("not an RSA or {} public key", EC_CURVE)))
}

/// Decode a Base64 PKCS#8 private key, detecting its family.
pub fn decode_private(text: &str) -> CryptoResult<PrivateKey> {
    let der = base64_decode(text).map_err(|e| CryptoError::KeyDecode(e.to_string()))?;

    match RsaPrivateKey::from_pkcs8_der(&der) {
        Ok(key) => return Ok(PrivateKey::Rsa(key)),
        Err(e) => trace!(
            subsystem = "crypto",
            component = "key_codec",
            op = "decode_private",
            error = %e,
            "Not an RSA private key, trying EC"
        ),
    }

    p256::SecretKey::from_pkcs8_der(&der)
        .map(PrivateKey::Ec)
        .map_err(|_| CryptoError::KeyDecode(format!("not an RSA or {} private key", EC_CURVE)))
}

/// Write an encoded key to a file.
pub fn save_key_text(text: &str, path: &Path) -> CryptoResult<()> {
    std::fs::write(path, text)
        .map_err(|e| CryptoError::InvalidInput(format!("cannot write {}: {}", path.display(), e)))
}

/// Read an encoded key from a file, dropping any whitespace or line breaks.
pub fn load_key_text(path: &Path) -> CryptoResult<String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CryptoError::InvalidInput(format!("cannot read {}: {}", path.display(), e)))?;
    Ok(contents.chars().filter(|c| !c.is_whitespace()).collect())
}
