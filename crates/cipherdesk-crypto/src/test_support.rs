//! Shared key fixtures for unit tests.
//!
//! RSA-2048 generation dominates test time, so each fixture is generated
//! once per test binary and shared.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::asymmetric::generate_key_pair;
use crate::keys::{KeyFamily, KeyPair};

fn fixture(cell: &'static OnceLock<KeyPair>, family: KeyFamily, seed: u64) -> &'static KeyPair {
    cell.get_or_init(|| {
        generate_key_pair(family, &mut StdRng::seed_from_u64(seed))
            .expect("fixture key generation")
    })
}

pub(crate) fn rsa_keypair() -> &'static KeyPair {
    static CELL: OnceLock<KeyPair> = OnceLock::new();
    fixture(&CELL, KeyFamily::Rsa, 1)
}

pub(crate) fn other_rsa_keypair() -> &'static KeyPair {
    static CELL: OnceLock<KeyPair> = OnceLock::new();
    fixture(&CELL, KeyFamily::Rsa, 2)
}

pub(crate) fn ec_keypair() -> &'static KeyPair {
    static CELL: OnceLock<KeyPair> = OnceLock::new();
    fixture(&CELL, KeyFamily::Ec, 3)
}

pub(crate) fn other_ec_keypair() -> &'static KeyPair {
    static CELL: OnceLock<KeyPair> = OnceLock::new();
    fixture(&CELL, KeyFamily::Ec, 4)
}
