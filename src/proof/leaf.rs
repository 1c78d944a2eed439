//! Leaf Hashing
//!
//! One leaf per whitelist entry. The preimage layout is part of the
//! commitment format and must match whatever verifies claims on the other
//! side:
//!
//! ```text
//! PackedBitmask:  address (20) || entitlement (32, big-endian)
//! ExpandedIds:    address (20) || id_0 (32) || id_1 (32) || ...   (ascending)
//! ```
//!
//! Both layouts are bit-sensitive: a superset or subset of the whitelisted
//! entitlements yields a different leaf.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TreeConfig;
use crate::core::address::Address;
use crate::core::bits::{PackedEntitlement, PACKED_LEN};
use crate::core::hash::{Digest, HashAlgorithm};
use crate::entitlement::codec::unpack_ids;

/// Leaf preimage layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafEncoding {
    /// Address followed by the 32-byte big-endian bitmask.
    #[default]
    PackedBitmask,
    /// Address followed by every set ID as a 32-byte big-endian word.
    ExpandedIds,
}

impl fmt::Display for LeafEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PackedBitmask => "packed",
            Self::ExpandedIds => "expanded",
        })
    }
}

impl FromStr for LeafEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "packed" | "packed_bitmask" => Ok(Self::PackedBitmask),
            "expanded" | "expanded_ids" => Ok(Self::ExpandedIds),
            other => Err(format!("unknown leaf encoding '{}'", other)),
        }
    }
}

/// Leaf digest for an entry under `config`.
pub fn leaf_digest(config: &TreeConfig, address: &Address, entitlement: PackedEntitlement) -> Digest {
    encode_leaf(config.hash, config.leaf_encoding, address, entitlement)
}

/// Leaf digest with explicit hash and layout.
pub fn encode_leaf(
    hash: HashAlgorithm,
    encoding: LeafEncoding,
    address: &Address,
    entitlement: PackedEntitlement,
) -> Digest {
    match encoding {
        LeafEncoding::PackedBitmask => {
            let mask = entitlement.to_be_bytes();
            hash.hash_parts(&[address.as_bytes().as_slice(), mask.as_slice()])
        }
        LeafEncoding::ExpandedIds => {
            let words: Vec<[u8; PACKED_LEN]> = unpack_ids(entitlement)
                .into_iter()
                .map(id_word)
                .collect();
            let mut parts: Vec<&[u8]> = Vec::with_capacity(words.len() + 1);
            parts.push(address.as_bytes());
            parts.extend(words.iter().map(|w| w.as_slice()));
            hash.hash_parts(&parts)
        }
    }
}

/// A single ID as a 32-byte big-endian word.
fn id_word(id: u16) -> [u8; PACKED_LEN] {
    let mut word = [0u8; PACKED_LEN];
    word[PACKED_LEN - 2..].copy_from_slice(&id.to_be_bytes());
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Address {
        Address::parse("0x2c9758BDe2DBc7F6a259a5826a85761FcE322708").unwrap()
    }

    #[test]
    fn test_packed_leaf_fixture() {
        let leaf = leaf_digest(&TreeConfig::default(), &addr(), PackedEntitlement::from(0xfu64));
        assert_eq!(
            hex::encode(leaf),
            "935dd1b2cb5e839aecfaf6fb8e8ba97abcab654f9e73b79ef0af8e53833d406b"
        );
    }

    #[test]
    fn test_packed_leaf_is_address_then_mask() {
        let entitlement = PackedEntitlement::from(0xfu64);
        let mut preimage = addr().as_bytes().to_vec();
        preimage.extend_from_slice(&entitlement.to_be_bytes());
        assert_eq!(preimage.len(), 52);

        let expected = HashAlgorithm::Keccak256.hash_bytes(&preimage);
        assert_eq!(leaf_digest(&TreeConfig::default(), &addr(), entitlement), expected);
    }

    #[test]
    fn test_expanded_leaf_fixture() {
        let config = TreeConfig::default().with_leaf_encoding(LeafEncoding::ExpandedIds);
        let leaf = leaf_digest(&config, &addr(), PackedEntitlement::from(0xfu64));
        assert_eq!(
            hex::encode(leaf),
            "68285c6a3459802eacdbb1ec34c0ce3d98ce07409f008b08834e2664d024eb40"
        );
    }

    #[test]
    fn test_expanded_leaf_layout() {
        let config = TreeConfig::default().with_leaf_encoding(LeafEncoding::ExpandedIds);
        let mut preimage = addr().as_bytes().to_vec();
        for id in [0u16, 6] {
            preimage.extend_from_slice(&id_word(id));
        }
        let expected = HashAlgorithm::Keccak256.hash_bytes(&preimage);
        assert_eq!(leaf_digest(&config, &addr(), PackedEntitlement::from(0x41u64)), expected);
    }

    #[test]
    fn test_every_bit_changes_the_leaf() {
        let config = TreeConfig::default();
        let base = PackedEntitlement::from(0x41u64);
        let leaf = leaf_digest(&config, &addr(), base);
        for bit in [0u32, 1, 6, 7, 128, 255] {
            let flipped = base.with_bit_flipped(bit).unwrap();
            assert_ne!(leaf_digest(&config, &addr(), flipped), leaf, "bit {}", bit);
        }
    }

    #[test]
    fn test_encodings_differ() {
        let entitlement = PackedEntitlement::from(0x3u64);
        let packed = encode_leaf(HashAlgorithm::Keccak256, LeafEncoding::PackedBitmask, &addr(), entitlement);
        let expanded = encode_leaf(HashAlgorithm::Keccak256, LeafEncoding::ExpandedIds, &addr(), entitlement);
        assert_ne!(packed, expanded);
    }

    #[test]
    fn test_leaf_encoding_from_str() {
        assert_eq!("packed".parse::<LeafEncoding>().unwrap(), LeafEncoding::PackedBitmask);
        assert_eq!("Expanded_IDs".parse::<LeafEncoding>().unwrap(), LeafEncoding::ExpandedIds);
        assert!("sorted".parse::<LeafEncoding>().is_err());
    }
}
