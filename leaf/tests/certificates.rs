// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

use csca_leaf::{
    public_key::{EC_PUBLIC_KEY, RSASSA_PSS},
    Certificate, LeafError, LeafHasher, PublicKey,
};
use csca_treap::Hash32;
use x509_cert::der::DecodePem;

fn load(name: &str) -> Certificate {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let pem = std::fs::read(&path).unwrap();
    Certificate::from_pem(pem).unwrap()
}

fn h(s: &str) -> Hash32 {
    s.parse().unwrap()
}

#[test]
fn rsa_certificates() {
    let cases = [
        (
            "csca_bw_4096.pem",
            512,
            "22883784feae4c0b33d22d92bf94bb9c4fdd33c24eb7e770a64d41e137ef2c60",
            "af8ff0349a2ab0cb39d285fdbef2e26fca0138deeb8aa6aeb0ed276e961b316b",
        ),
        (
            "rsa_3072.pem",
            384,
            "24ad1edebc5995e8b6ba0fcc45f3820a76ab2d4adde7410e6a79a0ffe13c7a64",
            "6b39e771fc7e7c14c954b6d255f4f9c9f13fdc9a3a3a25f1cc94cd6f7a698958",
        ),
        (
            "rsa_2048.pem",
            256,
            "16d2ebf1b4feefb417cb15e9c437749e0ddb1812b4d6b388059910e65c537806",
            "e983c2cb4dc8e66cf30001da8f08d9f0d310308d994f9fd887db2b0c18ba0660",
        ),
    ];
    for (name, len, circuit, plain) in cases {
        let certificate = load(name);
        let key = PublicKey::from_certificate(&certificate).unwrap();
        assert_eq!(key.algorithm(), "rsa");
        assert_eq!(key.as_bytes().len(), len, "{}", name);

        assert_eq!(
            LeafHasher::circuit().hash_certificate(&certificate).unwrap(),
            Some(h(circuit)),
            "{}",
            name
        );
        assert_eq!(
            LeafHasher::plain().hash_certificate(&certificate).unwrap(),
            Some(h(plain)),
            "{}",
            name
        );
    }
}

#[test]
fn bw_modulus_prefix() {
    let key = PublicKey::from_certificate(&load("csca_bw_4096.pem")).unwrap();
    assert_eq!(
        hex::encode(&key.as_bytes()[..16]),
        "b26e6aed204b1c19369b1ad80152109b"
    );
}

#[test]
fn rsa_pss_certificate() {
    let certificate = load("rsa_pss_2048.pem");
    assert_eq!(
        certificate
            .tbs_certificate
            .subject_public_key_info
            .algorithm
            .oid,
        RSASSA_PSS
    );
    assert_eq!(
        LeafHasher::circuit().hash_certificate(&certificate).unwrap(),
        Some(h(
            "0fc1aad1003b43b9f608b98b9d524bdea37f5764c2710dd5e911266de3ef1213"
        ))
    );
}

#[test]
fn ignored_and_invalid_lengths() {
    let hasher = LeafHasher::circuit();
    assert_eq!(hasher.hash_certificate(&load("rsa_6144.pem")), Ok(None));
    assert_eq!(
        hasher.hash_certificate(&load("rsa_1024.pem")),
        Err(LeafError::InvalidLength(128))
    );

    // both are fine outside the circuit
    let plain = LeafHasher::plain();
    assert_eq!(
        plain.hash_certificate(&load("rsa_6144.pem")).unwrap(),
        Some(h(
            "abef19dbfa094422e95c3db1e81e11371ecbbf6137596a99053fd8efc60cd777"
        ))
    );
    assert_eq!(
        plain.hash_certificate(&load("rsa_1024.pem")).unwrap(),
        Some(h(
            "afe1a41b270f6b9f5813beb284471cba104f7f85c0a15b2fbf59298ecdc8b91b"
        ))
    );
}

#[test]
fn ecdsa_certificate() {
    let certificate = load("ecdsa_p256.pem");
    assert_eq!(
        certificate
            .tbs_certificate
            .subject_public_key_info
            .algorithm
            .oid,
        EC_PUBLIC_KEY
    );
    let key = PublicKey::from_certificate(&certificate).unwrap();
    assert_eq!(
        key,
        PublicKey::Ec {
            point: hex::decode(
                "f803655f1673abda7b55af26a213f1355af475adc8191dfd7f2fd78b48d169dc\
                 f30e4ef6650d6eba5af874e89e8708d9167cb26d355b7b93098ca145c7e3a47e"
            )
            .unwrap()
        }
    );

    assert!(matches!(
        LeafHasher::circuit().hash_certificate(&certificate),
        Err(LeafError::UnsupportedPublicKey(_))
    ));
    assert_eq!(
        LeafHasher::plain().hash_certificate(&certificate).unwrap(),
        Some(h(
            "72455282496900fb01ba3879767900c510515dd3418b5ecb5c055b52550bbb2a"
        ))
    );
}

#[test]
fn unsupported_algorithm() {
    let certificate = load("ed25519.pem");
    for hasher in [LeafHasher::circuit(), LeafHasher::plain()] {
        assert!(matches!(
            hasher.hash_certificate(&certificate),
            Err(LeafError::UnsupportedPublicKey(_))
        ));
    }
}

#[test]
fn hashing_is_deterministic() {
    let certificate = load("csca_bw_4096.pem");
    let hasher = LeafHasher::circuit();
    assert_eq!(
        hasher.hash_certificate(&certificate),
        hasher.hash_certificate(&certificate)
    );
    assert_ne!(
        hasher.hash_certificate(&certificate),
        hasher.hash_certificate(&load("rsa_2048.pem"))
    );
}
