//! cipherdesk: command-line front end for the cryptographic engine.
//!
//! Every subcommand prints a JSON object on stdout. Logs go to stderr.
//! Keys are accepted either as Base64 text or as a path to a file holding it.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::OsRng;
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cipherdesk_crypto::asymmetric::{self, SignatureAlgorithm};
use cipherdesk_crypto::keys::{load_key_text, save_key_text};
use cipherdesk_crypto::symmetric::{self, decode_iv, encode_iv};
use cipherdesk_crypto::{
    base64_decode, base64_encode, decode_private, decode_public, decrypt_ecies, decrypt_hybrid,
    encode_private, encode_public, encrypt_ecies, encrypt_hybrid, CipherMode, EciesEnvelope,
    EngineConfig, HybridEnvelope, KeyFamily, RsaPadding, SymmetricKey,
};

#[derive(Parser)]
#[command(name = "cipherdesk")]
#[command(author, version, about = "Symmetric, RSA, EC, hybrid and ECIES encryption")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an RSA-2048 or EC P-256 keypair
    Keygen {
        /// Key family: RSA, EC (aliases ECDSA, ECC)
        #[arg(short, long, default_value = "RSA")]
        family: KeyFamily,

        /// Write public.key and private.key to this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a random AES-256 key
    SymKeygen,

    /// Derive an AES-256 key from a password (PBKDF2-HMAC-SHA256)
    DeriveKey {
        #[arg(short, long)]
        password: String,

        /// Custom salt (8+ bytes recommended); the engine salt is used when omitted
        #[arg(short, long)]
        salt: Option<String>,
    },

    /// Show the key derived from CIPHERDESK_AES_SECRET_KEY (random if unset)
    ConfiguredKey,

    /// Encrypt with AES-256
    Encrypt {
        /// Cipher mode: ECB, CBC, CTR, GCM
        #[arg(short, long, default_value = "GCM")]
        mode: CipherMode,

        /// Base64 AES key; the configured key is used when omitted
        #[arg(short, long)]
        key: Option<String>,

        /// Base64 IV to use instead of a random one
        #[arg(long)]
        iv: Option<String>,

        #[command(flatten)]
        payload: Payload,
    },

    /// Decrypt an AES-256 envelope
    Decrypt {
        /// Cipher mode: ECB, CBC, CTR, GCM
        #[arg(short, long, default_value = "GCM")]
        mode: CipherMode,

        /// Base64 AES key; the configured key is used when omitted
        #[arg(short, long)]
        key: Option<String>,

        /// Base64 envelope (IV followed by ciphertext)
        #[arg(short, long)]
        envelope: String,
    },

    /// Encrypt a short message with an RSA public key
    RsaEncrypt {
        /// Padding: PKCS1 or OAEP
        #[arg(long, default_value = "OAEP")]
        padding: RsaPadding,

        /// Public key (Base64 SPKI or path to a file holding it)
        #[arg(long)]
        public_key: String,

        #[command(flatten)]
        payload: Payload,
    },

    /// Decrypt an RSA ciphertext
    RsaDecrypt {
        /// Padding: PKCS1 or OAEP
        #[arg(long, default_value = "OAEP")]
        padding: RsaPadding,

        /// Private key (Base64 PKCS#8 or path to a file holding it)
        #[arg(long)]
        private_key: String,

        /// Base64 ciphertext
        #[arg(short, long)]
        ciphertext: String,
    },

    /// Sign a message; the algorithm follows the key family
    Sign {
        /// Private key (Base64 PKCS#8 or path to a file holding it)
        #[arg(long)]
        private_key: String,

        #[command(flatten)]
        payload: Payload,
    },

    /// Verify a signature
    Verify {
        /// Public key (Base64 SPKI or path to a file holding it)
        #[arg(long)]
        public_key: String,

        /// Base64 signature
        #[arg(short, long)]
        signature: String,

        #[command(flatten)]
        payload: Payload,
    },

    /// Encrypt a payload of any size for an RSA recipient
    HybridEncrypt {
        /// Recipient RSA public key (Base64 SPKI or path)
        #[arg(long)]
        public_key: String,

        #[command(flatten)]
        payload: Payload,
    },

    /// Decrypt a hybrid envelope
    HybridDecrypt {
        /// RSA private key (Base64 PKCS#8 or path)
        #[arg(long)]
        private_key: String,

        #[arg(long)]
        ciphertext: String,

        #[arg(long)]
        wrapped_key: String,

        #[arg(long)]
        iv: String,
    },

    /// Encrypt a payload of any size for an EC recipient
    EciesEncrypt {
        /// Recipient EC public key (Base64 SPKI or path)
        #[arg(long)]
        public_key: String,

        #[command(flatten)]
        payload: Payload,
    },

    /// Decrypt an ECIES envelope
    EciesDecrypt {
        /// EC private key (Base64 PKCS#8 or path)
        #[arg(long)]
        private_key: String,

        #[arg(long)]
        ephemeral_public_key: String,

        #[arg(long)]
        ciphertext: String,

        #[arg(long)]
        iv: String,
    },

    /// Run every symmetric mode over a sample message
    Demo {
        #[arg(short, long, default_value = "Hola, cipherdesk!")]
        text: String,
    },
}

/// Message to process: inline text or a file.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Payload {
    /// Inline UTF-8 text
    #[arg(short, long)]
    text: Option<String>,

    /// Read the message from a file
    #[arg(short, long)]
    input: Option<PathBuf>,
}

impl Payload {
    fn read(&self) -> Result<Vec<u8>> {
        match (&self.text, &self.input) {
            (Some(text), _) => Ok(text.as_bytes().to_vec()),
            (None, Some(path)) => {
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))
            }
            (None, None) => bail!("either --text or --input is required"),
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

// Configurable log output:
//   LOG_FORMAT - "json" or "text" (default: "text")
//   LOG_ANSI   - "true"/"false" override ANSI colors
//   RUST_LOG   - standard env filter (default: "cipherdesk_crypto=info")
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cipherdesk_crypto=info,cipherdesk=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        if let Some(ansi) = log_ansi {
            layer = layer.with_ansi(ansi);
        }
        registry.with(layer).init();
    }
}

fn run(cli: Cli) -> Result<Value> {
    let mut rng = OsRng;

    match cli.command {
        Commands::Keygen { family, output } => cmd_keygen(family, output.as_deref(), &mut rng),
        Commands::SymKeygen => Ok(json!({
            "key": symmetric::generate_key(&mut rng).to_base64(),
        })),
        Commands::DeriveKey { password, salt } => {
            let key = match &salt {
                Some(salt) => symmetric::derive_key_with_salt(&password, salt.as_bytes())?,
                None => symmetric::derive_key_from_password(&password)?,
            };
            Ok(json!({
                "key": key.to_base64(),
                "custom_salt": salt.is_some(),
            }))
        }
        Commands::ConfiguredKey => {
            let (key, source) = EngineConfig::from_env().configured_key(&mut rng)?;
            Ok(json!({
                "key": key.to_base64(),
                "source": source,
            }))
        }
        Commands::Encrypt {
            mode,
            key,
            iv,
            payload,
        } => {
            let plaintext = payload.read()?;
            let (key, source) = resolve_symmetric_key(key.as_deref(), &mut rng)?;
            let envelope = match iv {
                Some(iv) => symmetric::encrypt_with_iv(mode, &plaintext, &key, &decode_iv(&iv)?)?,
                None => symmetric::encrypt(mode, &plaintext, &key, &mut rng)?,
            };
            Ok(json!({
                "mode": mode,
                "key_source": source,
                "iv": encode_iv(envelope.iv()),
                "envelope": envelope.encode(),
            }))
        }
        Commands::Decrypt {
            mode,
            key,
            envelope,
        } => {
            let (key, _) = resolve_symmetric_key(key.as_deref(), &mut rng)?;
            let plaintext = symmetric::decrypt_text(mode, &envelope, &key)?;
            Ok(json!({
                "mode": mode,
                "plaintext": plaintext_value(&plaintext),
            }))
        }
        Commands::RsaEncrypt {
            padding,
            public_key,
            payload,
        } => {
            let public_key = decode_public(&resolve_key_text(&public_key)?)?;
            let ciphertext =
                asymmetric::encrypt(padding, &payload.read()?, &public_key, &mut rng)?;
            Ok(json!({
                "padding": padding,
                "max_plaintext_len": asymmetric::max_plaintext_len(padding, &public_key)?,
                "ciphertext": base64_encode(&ciphertext),
            }))
        }
        Commands::RsaDecrypt {
            padding,
            private_key,
            ciphertext,
        } => {
            let private_key = decode_private(&resolve_key_text(&private_key)?)?;
            let ciphertext = base64_decode(&ciphertext)?;
            let plaintext = asymmetric::decrypt(padding, &ciphertext, &private_key)?;
            Ok(json!({
                "padding": padding,
                "plaintext": plaintext_value(&plaintext),
            }))
        }
        Commands::Sign {
            private_key,
            payload,
        } => {
            let private_key = decode_private(&resolve_key_text(&private_key)?)?;
            let signature = asymmetric::sign(&payload.read()?, &private_key, &mut rng)?;
            Ok(json!({
                "algorithm": SignatureAlgorithm::for_family(private_key.family()),
                "signature": base64_encode(&signature),
            }))
        }
        Commands::Verify {
            public_key,
            signature,
            payload,
        } => {
            let public_key = decode_public(&resolve_key_text(&public_key)?)?;
            let signature = base64_decode(&signature)?;
            let valid = asymmetric::verify(&payload.read()?, &signature, &public_key);
            Ok(json!({
                "algorithm": SignatureAlgorithm::for_family(public_key.family()),
                "valid": valid,
            }))
        }
        Commands::HybridEncrypt {
            public_key,
            payload,
        } => {
            let public_key = decode_public(&resolve_key_text(&public_key)?)?;
            let envelope = encrypt_hybrid(&payload.read()?, &public_key, &mut rng)?;
            Ok(serde_json::to_value(envelope)?)
        }
        Commands::HybridDecrypt {
            private_key,
            ciphertext,
            wrapped_key,
            iv,
        } => {
            let private_key = decode_private(&resolve_key_text(&private_key)?)?;
            let envelope = HybridEnvelope::from_base64(&ciphertext, &wrapped_key, &iv)?;
            let plaintext = decrypt_hybrid(&envelope, &private_key)?;
            Ok(json!({ "plaintext": plaintext_value(&plaintext) }))
        }
        Commands::EciesEncrypt {
            public_key,
            payload,
        } => {
            let public_key = decode_public(&resolve_key_text(&public_key)?)?;
            let envelope = encrypt_ecies(&payload.read()?, &public_key, &mut rng)?;
            Ok(serde_json::to_value(envelope)?)
        }
        Commands::EciesDecrypt {
            private_key,
            ephemeral_public_key,
            ciphertext,
            iv,
        } => {
            let private_key = decode_private(&resolve_key_text(&private_key)?)?;
            let envelope = EciesEnvelope::from_base64(&ephemeral_public_key, &ciphertext, &iv)?;
            let plaintext = decrypt_ecies(&envelope, &private_key)?;
            Ok(json!({ "plaintext": plaintext_value(&plaintext) }))
        }
        Commands::Demo { text } => cmd_demo(&text, &mut rng),
    }
}

fn cmd_keygen(family: KeyFamily, output_dir: Option<&Path>, rng: &mut OsRng) -> Result<Value> {
    let keypair = asymmetric::generate_key_pair(family, rng)?;
    let public_key = encode_public(&keypair.public)?;
    let private_key = encode_private(&keypair.private)?;
    let created_at = chrono::Utc::now().to_rfc3339();

    match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
            let public_path = dir.join("public.key");
            let private_path = dir.join("private.key");

            save_key_text(&public_key, &public_path)?;
            save_key_text(&private_key, &private_path)?;

            info!(family = %family, dir = %dir.display(), "Key pair written");

            Ok(json!({
                "family": family,
                "public_key": public_key,
                "public_key_path": public_path.to_string_lossy(),
                "private_key_path": private_path.to_string_lossy(),
                "created_at": created_at,
            }))
        }
        None => Ok(json!({
            "family": family,
            "public_key": public_key,
            "private_key": private_key,
            "created_at": created_at,
        })),
    }
}

fn cmd_demo(text: &str, rng: &mut OsRng) -> Result<Value> {
    let (key, source) = EngineConfig::from_env().configured_key(rng)?;

    let mut results = Vec::with_capacity(CipherMode::ALL.len());
    for mode in CipherMode::ALL {
        let envelope = symmetric::encrypt(mode, text.as_bytes(), &key, rng)?.encode();
        let decrypted = symmetric::decrypt_text(mode, &envelope, &key)?;

        results.push(json!({
            "mode": mode,
            "authenticated": mode.is_authenticated(),
            "envelope": envelope,
            "matches": decrypted == text.as_bytes(),
        }));
    }

    Ok(json!({
        "text": text,
        "key_source": source,
        "results": results,
    }))
}

/// Use `--key` when given, otherwise the configured key.
///
/// The returned label is `"argument"`, `"configured"` or `"random"`.
fn resolve_symmetric_key(key: Option<&str>, rng: &mut OsRng) -> Result<(SymmetricKey, Value)> {
    match key {
        Some(text) => Ok((SymmetricKey::from_base64(text)?, json!("argument"))),
        None => {
            let (key, source) = EngineConfig::from_env().configured_key(rng)?;
            Ok((key, serde_json::to_value(source)?))
        }
    }
}

/// Key text given inline, or read from the file it names.
fn resolve_key_text(arg: &str) -> Result<String> {
    let path = Path::new(arg);
    if path.is_file() {
        return Ok(load_key_text(path)?);
    }
    Ok(arg.trim().to_string())
}

/// Plaintext as UTF-8 when possible, Base64 otherwise.
fn plaintext_value(plaintext: &[u8]) -> Value {
    match std::str::from_utf8(plaintext) {
        Ok(text) => json!({ "encoding": "utf8", "data": text }),
        Err(_) => json!({ "encoding": "base64", "data": base64_encode(plaintext) }),
    }
}
