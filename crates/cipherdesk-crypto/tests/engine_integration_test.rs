//! Integration tests for the cryptographic engine's public API.
//!
//! This test suite validates:
//! - Symmetric round trips, IV freshness and tamper detection
//! - RSA padding ceilings and cross-family rejection
//! - Signature binding to key family
//! - Hybrid and ECIES composition
//! - Key interchange through the text boundary and key files

use std::sync::OnceLock;

use cipherdesk_crypto::asymmetric::{
    self, decrypt_oaep, decrypt_pkcs1, encrypt_oaep, encrypt_pkcs1, sign_ecdsa, verify_ecdsa,
};
use cipherdesk_crypto::keys::{load_key_text, save_key_text};
use cipherdesk_crypto::symmetric::{self, CipherEnvelope};
use cipherdesk_crypto::{
    decode_private, decode_public, decrypt_ecies, decrypt_hybrid, encode_private, encode_public,
    encrypt_ecies, encrypt_hybrid, generate_key_pair, sign, verify, CipherMode, CryptoError,
    EciesEnvelope, HybridEnvelope, KeyFamily, KeyPair,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

fn rsa_keypair() -> &'static KeyPair {
    static CELL: OnceLock<KeyPair> = OnceLock::new();
    CELL.get_or_init(|| generate_key_pair(KeyFamily::Rsa, &mut StdRng::seed_from_u64(11)).unwrap())
}

fn ec_keypair() -> &'static KeyPair {
    static CELL: OnceLock<KeyPair> = OnceLock::new();
    CELL.get_or_init(|| generate_key_pair(KeyFamily::Ec, &mut StdRng::seed_from_u64(12)).unwrap())
}

// ============================================================================
// Test Category 1: Symmetric Engine
// ============================================================================

#[test]
fn test_every_mode_round_trips_through_text() {
    let mut rng = rand::thread_rng();
    let key = symmetric::generate_key(&mut rng);
    let plaintext = "Texto de prueba con acentos: canción, año".as_bytes();

    for mode in CipherMode::ALL {
        let text = symmetric::encrypt(mode, plaintext, &key, &mut rng)
            .unwrap()
            .encode();
        let decrypted = symmetric::decrypt_text(mode, &text, &key).unwrap();
        assert_eq!(decrypted, plaintext, "mode {}", mode);
    }
}

#[test]
fn test_iv_lengths_per_mode() {
    let mut rng = rand::thread_rng();
    let key = symmetric::generate_key(&mut rng);

    let expected = [
        (CipherMode::Ecb, 0),
        (CipherMode::Cbc, 16),
        (CipherMode::Ctr, 16),
        (CipherMode::Gcm, 12),
    ];
    for (mode, iv_len) in expected {
        let envelope = symmetric::encrypt(mode, b"iv check", &key, &mut rng).unwrap();
        assert_eq!(envelope.iv().len(), iv_len, "mode {}", mode);
    }
}

#[test]
fn test_randomized_modes_never_repeat() {
    let mut rng = rand::thread_rng();
    let key = symmetric::generate_key(&mut rng);

    for mode in [CipherMode::Cbc, CipherMode::Ctr, CipherMode::Gcm] {
        let a = symmetric::encrypt(mode, b"same input", &key, &mut rng).unwrap();
        let b = symmetric::encrypt(mode, b"same input", &key, &mut rng).unwrap();
        assert_ne!(a.encode(), b.encode(), "mode {}", mode);
    }

    let a = symmetric::encrypt(CipherMode::Ecb, b"same input", &key, &mut rng).unwrap();
    let b = symmetric::encrypt(CipherMode::Ecb, b"same input", &key, &mut rng).unwrap();
    assert_eq!(a.encode(), b.encode());
}

#[test]
fn test_gcm_bit_flips_fail_closed() {
    let mut rng = rand::thread_rng();
    let key = symmetric::generate_key(&mut rng);
    let envelope = symmetric::encrypt(CipherMode::Gcm, b"ledger entry", &key, &mut rng).unwrap();
    let bytes = envelope.to_bytes();

    for bit in [0usize, 7, 12 * 8, bytes.len() * 8 - 1] {
        let mut tampered = bytes.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);
        let tampered = CipherEnvelope::from_bytes(CipherMode::Gcm, &tampered).unwrap();

        assert!(matches!(
            symmetric::decrypt(&tampered, &key),
            Err(CryptoError::Authentication)
        ));
    }
}

#[test]
fn test_truncated_and_malformed_envelopes() {
    let key = symmetric::generate_key(&mut rand::thread_rng());

    assert!(matches!(
        symmetric::decrypt_text(CipherMode::Gcm, "AAAA", &key),
        Err(CryptoError::TruncatedEnvelope {
            expected: 12,
            actual: 3
        })
    ));
    assert!(matches!(
        symmetric::decrypt_text(CipherMode::Cbc, "***", &key),
        Err(CryptoError::InvalidEncoding(_))
    ));
}

#[test]
fn test_password_derivation_is_reproducible() {
    let a = symmetric::derive_key_from_password("correct horse").unwrap();
    let b = symmetric::derive_key_from_password("correct horse").unwrap();
    let c = symmetric::derive_key_from_password("correct horse!").unwrap();

    assert_eq!(a.to_base64(), b.to_base64());
    assert_ne!(a.to_base64(), c.to_base64());
}

// ============================================================================
// Test Category 2: RSA Encryption
// ============================================================================

#[test]
fn test_rsa_round_trips_both_paddings() {
    let kp = rsa_keypair();
    let mut rng = rand::thread_rng();

    let ct = encrypt_pkcs1(b"pkcs1 message", &kp.public, &mut rng).unwrap();
    assert_eq!(decrypt_pkcs1(&ct, &kp.private).unwrap(), b"pkcs1 message");

    let ct = encrypt_oaep(b"oaep message", &kp.public, &mut rng).unwrap();
    assert_eq!(decrypt_oaep(&ct, &kp.private).unwrap(), b"oaep message");
}

#[test]
fn test_rsa_size_ceilings() {
    let kp = rsa_keypair();
    let mut rng = rand::thread_rng();

    assert!(encrypt_pkcs1(&[0u8; 245], &kp.public, &mut rng).is_ok());
    assert!(matches!(
        encrypt_pkcs1(&[0u8; 246], &kp.public, &mut rng),
        Err(CryptoError::PlaintextTooLarge { .. })
    ));

    assert!(encrypt_oaep(&[0u8; 190], &kp.public, &mut rng).is_ok());
    assert!(matches!(
        encrypt_oaep(&[0u8; 191], &kp.public, &mut rng),
        Err(CryptoError::PlaintextTooLarge { .. })
    ));
}

#[test]
fn test_rsa_rejects_ec_keys() {
    let ec = ec_keypair();
    let mut rng = rand::thread_rng();

    assert!(matches!(
        encrypt_pkcs1(b"x", &ec.public, &mut rng),
        Err(CryptoError::InvalidKeyFamily { .. })
    ));
    assert!(matches!(
        encrypt_oaep(b"x", &ec.public, &mut rng),
        Err(CryptoError::InvalidKeyFamily { .. })
    ));
}

// ============================================================================
// Test Category 3: Signatures
// ============================================================================

#[test]
fn test_signatures_for_both_families() {
    let mut rng = rand::thread_rng();

    for kp in [rsa_keypair(), ec_keypair()] {
        let signature = sign(b"invoice 2026-114", &kp.private, &mut rng).unwrap();
        assert!(verify(b"invoice 2026-114", &signature, &kp.public));
        assert!(!verify(b"invoice 2026-115", &signature, &kp.public));
    }
}

#[test]
fn test_verify_never_errors_on_foreign_signatures() {
    let mut rng = rand::thread_rng();
    let other = generate_key_pair(KeyFamily::Ec, &mut rng).unwrap();
    let signature = sign(b"msg", &other.private, &mut rng).unwrap();

    assert!(!verify(b"msg", &signature, &ec_keypair().public));
    assert!(!verify(b"msg", &signature, &rsa_keypair().public));
    assert!(!verify(b"msg", b"not a signature", &ec_keypair().public));
}

#[test]
fn test_explicit_ecdsa_entry_points() {
    let kp = ec_keypair();
    let mut rng = rand::thread_rng();

    let signature = sign_ecdsa(b"direct", &kp.private, &mut rng).unwrap();
    assert!(verify_ecdsa(b"direct", &signature, &kp.public).unwrap());
    assert!(sign_ecdsa(b"direct", &rsa_keypair().private, &mut rng).is_err());
}

// ============================================================================
// Test Category 4: Hybrid and ECIES Composition
// ============================================================================

#[test]
fn test_hybrid_removes_rsa_ceiling() {
    let kp = rsa_keypair();
    let plaintext = vec![0x42u8; 64 * 1024];

    let envelope = encrypt_hybrid(&plaintext, &kp.public, &mut rand::thread_rng()).unwrap();
    assert_eq!(decrypt_hybrid(&envelope, &kp.private).unwrap(), plaintext);
}

#[test]
fn test_hybrid_envelope_survives_json_relay() {
    let kp = rsa_keypair();
    let envelope = encrypt_hybrid(b"relay me", &kp.public, &mut rand::thread_rng()).unwrap();

    let json = serde_json::to_string(&envelope).unwrap();
    let relayed: HybridEnvelope = serde_json::from_str(&json).unwrap();
    assert_eq!(decrypt_hybrid(&relayed, &kp.private).unwrap(), b"relay me");
}

#[test]
fn test_ecies_round_trip_and_relay() {
    let kp = ec_keypair();
    let plaintext = vec![0x24u8; 64 * 1024];

    let envelope = encrypt_ecies(&plaintext, &kp.public, &mut rand::thread_rng()).unwrap();
    let json = serde_json::to_string(&envelope).unwrap();
    let relayed: EciesEnvelope = serde_json::from_str(&json).unwrap();

    assert_eq!(decrypt_ecies(&relayed, &kp.private).unwrap(), plaintext);
}

#[test]
fn test_ecies_rejects_rsa_recipient() {
    let result = encrypt_ecies(b"x", &rsa_keypair().public, &mut rand::thread_rng());
    assert!(matches!(
        result,
        Err(CryptoError::InvalidKeyFamily {
            expected: KeyFamily::Ec,
            actual: KeyFamily::Rsa
        })
    ));
}

#[test]
fn test_composer_failures_are_opaque() {
    let mut rng = rand::thread_rng();
    let stranger_ec = generate_key_pair(KeyFamily::Ec, &mut rng).unwrap();

    let ecies = encrypt_ecies(b"secret", &ec_keypair().public, &mut rng).unwrap();
    let err = decrypt_ecies(&ecies, &stranger_ec.private).unwrap_err();
    assert_eq!(err.to_string(), "Decryption failed");

    let mut hybrid = encrypt_hybrid(b"secret", &rsa_keypair().public, &mut rng).unwrap();
    hybrid.ciphertext[0] ^= 0x80;
    let err = decrypt_hybrid(&hybrid, &rsa_keypair().private).unwrap_err();
    assert_eq!(err.to_string(), "Decryption failed");
}

// ============================================================================
// Test Category 5: Key Interchange
// ============================================================================

#[test]
fn test_key_family_detected_on_decode() {
    for kp in [rsa_keypair(), ec_keypair()] {
        let public = decode_public(&encode_public(&kp.public).unwrap()).unwrap();
        let private = decode_private(&encode_private(&kp.private).unwrap()).unwrap();

        assert_eq!(public, kp.public);
        assert_eq!(private.family(), kp.family());
        assert_eq!(private.public_key(), kp.public);
    }
}

#[test]
fn test_garbage_keys_rejected() {
    assert!(matches!(
        decode_public("bm90IGEga2V5"),
        Err(CryptoError::KeyDecode(_))
    ));
    assert!(matches!(
        decode_private("%%%"),
        Err(CryptoError::KeyDecode(_))
    ));
}

#[test]
fn test_keys_through_files() {
    let temp = tempdir().unwrap();
    let public_path = temp.path().join("public.key");
    let private_path = temp.path().join("private.key");
    let kp = ec_keypair();

    save_key_text(&encode_public(&kp.public).unwrap(), &public_path).unwrap();
    save_key_text(&encode_private(&kp.private).unwrap(), &private_path).unwrap();

    let public = decode_public(&load_key_text(&public_path).unwrap()).unwrap();
    let private = decode_private(&load_key_text(&private_path).unwrap()).unwrap();

    let envelope = encrypt_ecies(b"from disk", &public, &mut rand::thread_rng()).unwrap();
    assert_eq!(decrypt_ecies(&envelope, &private).unwrap(), b"from disk");
}

#[test]
fn test_seeded_generator_reproduces_keys() {
    let a = generate_key_pair(KeyFamily::Ec, &mut StdRng::seed_from_u64(99)).unwrap();
    let b = generate_key_pair(KeyFamily::Ec, &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(
        encode_public(&a.public).unwrap(),
        encode_public(&b.public).unwrap()
    );

    let generic = asymmetric::generate_key_pair_for("ECC", &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(generic.public, a.public);
}
