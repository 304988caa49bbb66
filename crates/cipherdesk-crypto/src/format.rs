//! Text encoding shared by every boundary value.
//!
//! Keys, envelopes, IVs and signatures all cross the boundary as standard
//! Base64 with padding and no line wrapping.

use base64::Engine;

use crate::error::{CryptoError, CryptoResult};

/// Encode bytes as base64.
pub fn base64_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Decode base64 string to bytes.
pub fn base64_decode(data: &str) -> CryptoResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| CryptoError::InvalidEncoding(format!("Invalid base64: {}", e)))
}

/// Serde adapter serialising `Vec<u8>` fields as base64 strings.
///
/// Use with `#[serde(with = "crate::format::base64_bytes")]`.
pub mod base64_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::base64_encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::base64_decode(&s).map_err(serde::de::Error::custom)
    }
}
