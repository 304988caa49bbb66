//! Engine configuration from the environment.
//!
//! | Variable | Default | Effect |
//! |----------|---------|--------|
//! | `CIPHERDESK_AES_SECRET_KEY` | unset | Passphrase for the configured AES key |
//!
//! When the passphrase is unset or blank, [`EngineConfig::configured_key`]
//! falls back to a fresh random key on every call.

use std::fmt;

use rand::{CryptoRng, RngCore};
use serde::Serialize;
use tracing::{debug, info};

use crate::defaults::AES_SECRET_KEY_ENV;
use crate::error::CryptoResult;
use crate::symmetric::{derive_key_from_password, generate_key, SymmetricKey};

/// Where a configured key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    /// Derived from `CIPHERDESK_AES_SECRET_KEY`.
    Configured,
    /// Generated fresh because no passphrase is configured.
    Random,
}

/// Engine settings.
#[derive(Clone, Default)]
pub struct EngineConfig {
    /// Passphrase the default AES key is derived from.
    pub aes_secret_key: Option<String>,
}

impl EngineConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let aes_secret_key = lookup(AES_SECRET_KEY_ENV).filter(|v| !v.trim().is_empty());

        debug!(
            subsystem = "crypto",
            component = "config",
            aes_secret_key_set = aes_secret_key.is_some(),
            "Engine configuration loaded"
        );

        Self { aes_secret_key }
    }

    /// The configured AES key, or a random one when no passphrase is set.
    pub fn configured_key<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> CryptoResult<(SymmetricKey, KeySource)> {
        match &self.aes_secret_key {
            Some(passphrase) => Ok((derive_key_from_password(passphrase)?, KeySource::Configured)),
            None => {
                info!(
                    subsystem = "crypto",
                    component = "config",
                    "{} not set, using a random key",
                    AES_SECRET_KEY_ENV
                );
                Ok((generate_key(rng), KeySource::Random))
            }
        }
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field(
                "aes_secret_key",
                &self.aes_secret_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
