// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Transport encodings of [`MerkleProof`].
//!
//! JSON: `{"existence": bool, "siblings": ["0x..", "", ..], "order": [0, 1, ..]}`
//! where an empty string marks a padding level.
//!
//! Binary (`ark-serialize`): `existence: u8 | n: u64 LE | n x (flag: u8 [| 32
//! bytes]) | n x order: u8`.

use crate::{
    errors::TreapError,
    hash::Hash32,
    proof::{HashOrder, MerkleProof},
};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid, Validate,
    Write,
};
use ark_std::{
    format,
    string::{String, ToString},
    vec::Vec,
};
use serde::{Deserialize, Serialize};

/// JSON shape of a proof as exchanged with clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofWire {
    /// membership flag
    pub existence: bool,
    /// `0x`-prefixed hex, or `""` for an empty level
    pub siblings: Vec<String>,
    /// 0 or 1 per sibling
    pub order: Vec<u8>,
}

impl From<MerkleProof> for ProofWire {
    fn from(proof: MerkleProof) -> Self {
        Self {
            existence: proof.existence,
            siblings: proof
                .siblings
                .iter()
                .map(|s| s.map(|s| s.to_string()).unwrap_or_default())
                .collect(),
            order: proof.order.into_iter().map(u8::from).collect(),
        }
    }
}

impl TryFrom<ProofWire> for MerkleProof {
    type Error = TreapError;

    fn try_from(wire: ProofWire) -> Result<Self, Self::Error> {
        if wire.siblings.len() != wire.order.len() {
            return Err(TreapError::MalformedProof(format!(
                "{} siblings but {} order bits",
                wire.siblings.len(),
                wire.order.len()
            )));
        }
        let siblings = wire
            .siblings
            .iter()
            .enumerate()
            .map(|(i, s)| match s.as_str() {
                "" => Ok(None),
                s => s.parse::<Hash32>().map(Some).map_err(|e| {
                    TreapError::MalformedProof(format!("sibling {}: {}", i, e))
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let order = wire
            .order
            .iter()
            .enumerate()
            .map(|(i, bit)| {
                HashOrder::try_from(*bit).map_err(|bit| {
                    TreapError::MalformedProof(format!("order {} is {}, expected 0 or 1", i, bit))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            existence: wire.existence,
            siblings,
            order,
        })
    }
}

/// Serialize a proof to its JSON wire form.
pub fn encode_json(proof: &MerkleProof) -> Result<String, TreapError> {
    serde_json::to_string(&ProofWire::from(proof.clone()))
        .map_err(|e| TreapError::MalformedProof(e.to_string()))
}

/// Parse and validate a proof from its JSON wire form.
pub fn decode_json(json: &str) -> Result<MerkleProof, TreapError> {
    let wire: ProofWire =
        serde_json::from_str(json).map_err(|e| TreapError::MalformedProof(e.to_string()))?;
    MerkleProof::try_from(wire)
}

/// Serialize a proof to the compact binary form.
pub fn encode_binary(proof: &MerkleProof) -> Result<Vec<u8>, TreapError> {
    let mut bytes = Vec::with_capacity(proof.compressed_size());
    proof
        .serialize_compressed(&mut bytes)
        .map_err(|e| TreapError::MalformedProof(e.to_string()))?;
    Ok(bytes)
}

/// Parse a proof from the compact binary form, rejecting trailing bytes.
pub fn decode_binary(mut bytes: &[u8]) -> Result<MerkleProof, TreapError> {
    let proof = MerkleProof::deserialize_compressed(&mut bytes)
        .map_err(|e| TreapError::MalformedProof(e.to_string()))?;
    if !bytes.is_empty() {
        return Err(TreapError::MalformedProof(format!(
            "{} trailing bytes",
            bytes.len()
        )));
    }
    Ok(proof)
}

impl Serialize for MerkleProof {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProofWire::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MerkleProof {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ProofWire::deserialize(deserializer)?;
        MerkleProof::try_from(wire).map_err(serde::de::Error::custom)
    }
}

impl CanonicalSerialize for MerkleProof {
    fn serialize_with_mode<W: Write>(
        &self,
        mut writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        if self.siblings.len() != self.order.len() {
            return Err(SerializationError::InvalidData);
        }
        self.existence.serialize_with_mode(&mut writer, compress)?;
        self.siblings.len().serialize_with_mode(&mut writer, compress)?;
        for sibling in &self.siblings {
            match sibling {
                Some(hash) => {
                    writer.write_all(&[1])?;
                    hash.serialize_with_mode(&mut writer, compress)?;
                },
                None => writer.write_all(&[0])?,
            }
        }
        let order: Vec<u8> = self.order.iter().map(|o| u8::from(*o)).collect();
        writer.write_all(&order)?;
        Ok(())
    }

    fn serialized_size(&self, _compress: Compress) -> usize {
        1 + 8 + self.siblings.len() * 2 + self.depth() * Hash32::LEN
    }
}

impl CanonicalDeserialize for MerkleProof {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let existence = bool::deserialize_with_mode(&mut reader, compress, validate)?;
        let len = usize::deserialize_with_mode(&mut reader, compress, validate)?;

        // grow as the data arrives, the length is untrusted
        let mut siblings = Vec::new();
        for _ in 0..len {
            let mut flag = [0u8; 1];
            reader.read_exact(&mut flag)?;
            siblings.push(match flag[0] {
                0 => None,
                1 => Some(Hash32::deserialize_with_mode(
                    &mut reader,
                    compress,
                    validate,
                )?),
                _ => return Err(SerializationError::InvalidData),
            });
        }
        let mut order = Vec::new();
        for _ in 0..len {
            let mut bit = [0u8; 1];
            reader.read_exact(&mut bit)?;
            order.push(HashOrder::try_from(bit[0]).map_err(|_| SerializationError::InvalidData)?);
        }
        Ok(Self {
            existence,
            siblings,
            order,
        })
    }
}

impl Valid for MerkleProof {
    fn check(&self) -> Result<(), SerializationError> {
        if self.siblings.len() == self.order.len() {
            Ok(())
        } else {
            Err(SerializationError::InvalidData)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hasher::PoseidonHasher, Treap};
    use ark_std::vec;

    fn sample() -> MerkleProof {
        let leaves: Vec<Hash32> = (1u8..=12)
            .map(|i| Hash32::from_be_slice(&[i, i]).unwrap())
            .collect();
        let treap: Treap<PoseidonHasher> = leaves.iter().copied().collect();
        treap.merkle_path(&leaves[7]).unwrap()
    }

    #[test]
    fn test_json_shape() {
        let proof = MerkleProof {
            existence: true,
            siblings: vec![Some(Hash32::from_be_slice(&[0xab]).unwrap()), None],
            order: vec![HashOrder::Reverse, HashOrder::Forward],
        };
        let json = encode_json(&proof).unwrap();
        assert_eq!(
            json,
            format!(
                r#"{{"existence":true,"siblings":["0x{}ab",""],"order":[1,0]}}"#,
                "00".repeat(31)
            )
        );
        assert_eq!(decode_json(&json).unwrap(), proof);
        assert_eq!(serde_json::to_string(&proof).unwrap(), json);
        assert_eq!(serde_json::from_str::<MerkleProof>(&json).unwrap(), proof);
    }

    #[test]
    fn test_json_keeps_padding() {
        let proof = sample();
        let decoded = decode_json(&encode_json(&proof).unwrap()).unwrap();
        assert_eq!(decoded.len(), proof.len());
        assert_eq!(decoded, proof);
    }

    #[test]
    fn test_json_rejects_malformed() {
        let cases = [
            r#"{"existence":true,"siblings":["0x01"],"order":[]}"#,
            r#"{"existence":true,"siblings":["0x01"],"order":[2]}"#,
            r#"{"existence":true,"siblings":["0xzz"],"order":[0]}"#,
            r#"{"existence":true,"siblings":["0x01"]}"#,
            "not json",
        ];
        for json in cases {
            assert!(matches!(
                decode_json(json),
                Err(TreapError::MalformedProof(_))
            ));
        }
        let too_long = format!(
            r#"{{"existence":true,"siblings":["0x{}"],"order":[0]}}"#,
            "11".repeat(33)
        );
        assert!(decode_json(&too_long).is_err());
    }

    #[test]
    fn test_binary() {
        let proof = sample();
        let bytes = encode_binary(&proof).unwrap();
        assert_eq!(bytes.len(), proof.compressed_size());
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..9], &(proof.len() as u64).to_le_bytes());
        assert_eq!(decode_binary(&bytes).unwrap(), proof);

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(decode_binary(&trailing).is_err());

        let mut bad_order = bytes.clone();
        let last = bad_order.len() - 1;
        bad_order[last] = 7;
        assert!(decode_binary(&bad_order).is_err());

        assert!(decode_binary(&bytes[..bytes.len() - 1]).is_err());
    }
}
