// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Key material extracted from a certificate's SubjectPublicKeyInfo.

use crate::errors::LeafError;
use der::Decode;
use x509_cert::{
    spki::{ObjectIdentifier, SubjectPublicKeyInfoOwned},
    Certificate,
};

/// `rsaEncryption`
pub const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
/// `id-RSASSA-PSS`
pub const RSASSA_PSS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");
/// `id-ecPublicKey`
pub const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Public key material a leaf is derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    /// RSA key, big-endian modulus without leading zeros.
    Rsa {
        /// modulus `n`
        modulus: Vec<u8>,
    },
    /// Elliptic curve key, `X || Y` of the uncompressed point.
    Ec {
        /// affine coordinates, without the `0x04` tag
        point: Vec<u8>,
    },
}

impl PublicKey {
    /// Key of `certificate`.
    pub fn from_certificate(certificate: &Certificate) -> Result<Self, LeafError> {
        Self::from_spki(&certificate.tbs_certificate.subject_public_key_info)
    }

    /// Decode the key carried by a SubjectPublicKeyInfo.
    ///
    /// RSA keys (PKCS#1 v1.5 and PSS) yield their modulus, EC keys the
    /// coordinates of an uncompressed point. Anything else is unsupported.
    pub fn from_spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self, LeafError> {
        let oid = spki.algorithm.oid;
        let key = spki.subject_public_key.as_bytes().ok_or_else(|| {
            LeafError::UnsupportedPublicKey("key bit string is not byte aligned".to_string())
        })?;

        if oid == RSA_ENCRYPTION || oid == RSASSA_PSS {
            let rsa = pkcs1::RsaPublicKey::from_der(key)?;
            Ok(PublicKey::Rsa {
                modulus: rsa.modulus.as_bytes().to_vec(),
            })
        } else if oid == EC_PUBLIC_KEY {
            match key.split_first() {
                Some((0x04, point)) if !point.is_empty() && point.len() % 2 == 0 => {
                    Ok(PublicKey::Ec {
                        point: point.to_vec(),
                    })
                },
                _ => Err(LeafError::UnsupportedPublicKey(
                    "EC point is not in uncompressed form".to_string(),
                )),
            }
        } else {
            Err(LeafError::UnsupportedPublicKey(format!("algorithm {}", oid)))
        }
    }

    /// Raw bytes that get hashed into the leaf.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PublicKey::Rsa { modulus } => modulus,
            PublicKey::Ec { point } => point,
        }
    }

    /// Short name of the key family.
    pub fn algorithm(&self) -> &'static str {
        match self {
            PublicKey::Rsa { .. } => "rsa",
            PublicKey::Ec { .. } => "ecdsa",
        }
    }
}
