//! Signatures bound to key family.
//!
//! RSA keys sign with SHA256withRSA (PKCS#1 v1.5); EC keys sign with
//! SHA256withECDSA, DER-encoded. The caller never picks the algorithm:
//! [`SignatureAlgorithm::for_family`] is the only mapping.

use std::fmt;

use rand::{CryptoRng, RngCore};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, trace};

use crate::error::{CryptoError, CryptoResult};
use crate::keys::{KeyFamily, PrivateKey, PublicKey};

/// Signature algorithm, fixed by the signing key's family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    #[serde(rename = "SHA256withRSA")]
    Sha256WithRsa,
    #[serde(rename = "SHA256withECDSA")]
    Sha256WithEcdsa,
}

impl SignatureAlgorithm {
    /// Algorithm a key of this family signs with.
    pub fn for_family(family: KeyFamily) -> Self {
        match family {
            KeyFamily::Rsa => SignatureAlgorithm::Sha256WithRsa,
            KeyFamily::Ec => SignatureAlgorithm::Sha256WithEcdsa,
        }
    }

    /// JCA algorithm name, e.g. `SHA256withRSA`.
    pub fn name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha256WithRsa => "SHA256withRSA",
            SignatureAlgorithm::Sha256WithEcdsa => "SHA256withECDSA",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign `message` with the algorithm implied by the key's family.
pub fn sign<R: RngCore + CryptoRng>(
    message: &[u8],
    private_key: &PrivateKey,
    rng: &mut R,
) -> CryptoResult<Vec<u8>> {
    let algorithm = SignatureAlgorithm::for_family(private_key.family());

    let signature = match private_key {
        PrivateKey::Rsa(key) => {
            let signing_key = rsa::pkcs1v15::SigningKey::<Sha256>::new(key.clone());
            let signature: rsa::pkcs1v15::Signature = signing_key.sign_with_rng(rng, message);
            signature.to_vec()
        }
        PrivateKey::Ec(secret) => ecdsa_sign(secret, message, rng),
    };

    debug!(
        subsystem = "crypto",
        component = "signature",
        op = "sign",
        algorithm = %algorithm,
        message_len = message.len(),
        signature_len = signature.len(),
        "Message signed"
    );

    Ok(signature)
}

/// Verify `signature` over `message`.
///
/// Malformed signatures, wrong keys and altered messages all return `false`.
pub fn verify(message: &[u8], signature: &[u8], public_key: &PublicKey) -> bool {
    let valid = match public_key {
        PublicKey::Rsa(key) => {
            let verifying_key = rsa::pkcs1v15::VerifyingKey::<Sha256>::new(key.clone());
            rsa::pkcs1v15::Signature::try_from(signature)
                .map(|sig| verifying_key.verify(message, &sig).is_ok())
                .unwrap_or(false)
        }
        PublicKey::Ec(key) => ecdsa_verify(key, message, signature),
    };

    trace!(
        subsystem = "crypto",
        component = "signature",
        op = "verify",
        family = %public_key.family(),
        valid,
        "Signature checked"
    );

    valid
}

/// SHA256withECDSA signing that refuses RSA keys.
pub fn sign_ecdsa<R: RngCore + CryptoRng>(
    message: &[u8],
    private_key: &PrivateKey,
    rng: &mut R,
) -> CryptoResult<Vec<u8>> {
    match private_key {
        PrivateKey::Ec(secret) => Ok(ecdsa_sign(secret, message, rng)),
        PrivateKey::Rsa(_) => Err(CryptoError::InvalidKeyFamily {
            expected: KeyFamily::Ec,
            actual: KeyFamily::Rsa,
        }),
    }
}

/// SHA256withECDSA verification that refuses RSA keys.
pub fn verify_ecdsa(message: &[u8], signature: &[u8], public_key: &PublicKey) -> CryptoResult<bool> {
    match public_key {
        PublicKey::Ec(key) => Ok(ecdsa_verify(key, message, signature)),
        PublicKey::Rsa(_) => Err(CryptoError::InvalidKeyFamily {
            expected: KeyFamily::Ec,
            actual: KeyFamily::Rsa,
        }),
    }
}

fn ecdsa_sign<R: RngCore + CryptoRng>(
    secret: &p256::SecretKey,
    message: &[u8],
    rng: &mut R,
) -> Vec<u8> {
    let signing_key = p256::ecdsa::SigningKey::from(secret);
    let signature: p256::ecdsa::Signature = signing_key.sign_with_rng(rng, message);
    signature.to_der().as_bytes().to_vec()
}

fn ecdsa_verify(key: &p256::PublicKey, message: &[u8], signature: &[u8]) -> bool {
    let verifying_key = p256::ecdsa::VerifyingKey::from(key);
    p256::ecdsa::Signature::from_der(signature)
        .map(|sig| verifying_key.verify(message, &sig).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ec_keypair, other_ec_keypair, other_rsa_keypair, rsa_keypair};

    #[test]
    fn test_rsa_sign_verify() {
        let kp = rsa_keypair();
        let signature = sign(b"pay 10 EUR", &kp.private, &mut rand::thread_rng()).unwrap();

        assert_eq!(signature.len(), 256);
        assert!(verify(b"pay 10 EUR", &signature, &kp.public));
    }

    #[test]
    fn test_ec_sign_verify() {
        let kp = ec_keypair();
        let signature = sign(b"pay 10 EUR", &kp.private, &mut rand::thread_rng()).unwrap();

        // DER SEQUENCE tag
        assert_eq!(signature[0], 0x30);
        assert!(verify(b"pay 10 EUR", &signature, &kp.public));
    }

    #[test]
    fn test_verify_altered_message() {
        let mut rng = rand::thread_rng();
        for kp in [rsa_keypair(), ec_keypair()] {
            let signature = sign(b"pay 10 EUR", &kp.private, &mut rng).unwrap();
            assert!(!verify(b"pay 99 EUR", &signature, &kp.public));
        }
    }

    #[test]
    fn test_verify_wrong_key() {
        let mut rng = rand::thread_rng();

        let rsa_sig = sign(b"msg", &rsa_keypair().private, &mut rng).unwrap();
        assert!(!verify(b"msg", &rsa_sig, &other_rsa_keypair().public));

        let ec_sig = sign(b"msg", &ec_keypair().private, &mut rng).unwrap();
        assert!(!verify(b"msg", &ec_sig, &other_ec_keypair().public));
    }

    #[test]
    fn test_verify_cross_family_is_false() {
        let mut rng = rand::thread_rng();
        let rsa_sig = sign(b"msg", &rsa_keypair().private, &mut rng).unwrap();
        let ec_sig = sign(b"msg", &ec_keypair().private, &mut rng).unwrap();

        assert!(!verify(b"msg", &rsa_sig, &ec_keypair().public));
        assert!(!verify(b"msg", &ec_sig, &rsa_keypair().public));
    }

    #[test]
    fn test_verify_garbage_signature() {
        assert!(!verify(b"msg", &[], &ec_keypair().public));
        assert!(!verify(b"msg", &[0xFF; 7], &ec_keypair().public));
        assert!(!verify(b"msg", &[0x01; 256], &rsa_keypair().public));
    }

    #[test]
    fn test_sign_ecdsa_rejects_rsa() {
        let result = sign_ecdsa(b"msg", &rsa_keypair().private, &mut rand::thread_rng());
        assert!(matches!(
            result,
            Err(CryptoError::InvalidKeyFamily {
                expected: KeyFamily::Ec,
                actual: KeyFamily::Rsa
            })
        ));
        assert!(verify_ecdsa(b"msg", &[], &rsa_keypair().public).is_err());
    }

    #[test]
    fn test_sign_ecdsa_interoperates_with_sign() {
        let kp = ec_keypair();
        let signature = sign_ecdsa(b"msg", &kp.private, &mut rand::thread_rng()).unwrap();

        assert!(verify(b"msg", &signature, &kp.public));
        assert!(verify_ecdsa(b"msg", &signature, &kp.public).unwrap());
    }

    #[test]
    fn test_algorithm_for_family() {
        assert_eq!(
            SignatureAlgorithm::for_family(KeyFamily::Rsa).name(),
            "SHA256withRSA"
        );
        assert_eq!(
            SignatureAlgorithm::for_family(KeyFamily::Ec).to_string(),
            "SHA256withECDSA"
        );
    }
}
