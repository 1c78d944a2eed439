//! Digest Primitives
//!
//! Fixed-width digests and the node hash shared by the tree builder and the
//! verifier. Every byte that ends up in a root passes through here, so the
//! layout in this module is a compatibility contract:
//! - digests are 32 bytes
//! - internal nodes hash `min(a, b) || max(a, b)` (byte-lexicographic)
//! - the hash function is chosen once per tree and never mixed

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::{Digest as _, Keccak256};

use crate::error::{Result, WhitelistError};

/// Digest output type (256 bits / 32 bytes).
pub type Digest = [u8; 32];

/// Length of a digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Hash function used for leaves and internal nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// Ethereum Keccak-256 (pre-NIST padding). Matches EVM `keccak256`.
    #[default]
    Keccak256,
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Hash the concatenation of `parts`.
    pub fn hash_parts(self, parts: &[&[u8]]) -> Digest {
        match self {
            Self::Keccak256 => {
                let mut hasher = Keccak256::new();
                for part in parts {
                    hasher.update(part);
                }
                hasher.finalize().into()
            }
            Self::Sha256 => {
                let mut hasher = Sha256::new();
                for part in parts {
                    hasher.update(part);
                }
                hasher.finalize().into()
            }
        }
    }

    /// Hash a single byte string.
    #[inline]
    pub fn hash_bytes(self, data: &[u8]) -> Digest {
        self.hash_parts(&[data])
    }

    /// Sorted-pair node hash: `hash(min(a, b) || max(a, b))`.
    ///
    /// Commutative in its arguments, so a verifier never needs to know
    /// which side a sibling sat on.
    #[inline]
    pub fn hash_sorted_pair(self, a: &Digest, b: &Digest) -> Digest {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.hash_parts(&[lo.as_slice(), hi.as_slice()])
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Keccak256 => "keccak256",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keccak256" | "keccak" => Ok(Self::Keccak256),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(format!("unknown hash algorithm '{}'", other)),
        }
    }
}

/// Render a digest as `0x`-prefixed lowercase hex.
pub fn format_digest(digest: &Digest) -> String {
    format!("0x{}", hex::encode(digest))
}

/// Parse a digest from 64 hex digits, with or without `0x`.
pub fn parse_digest(s: &str) -> Result<Digest> {
    let trimmed = s.trim();
    let cleaned = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if cleaned.len() != DIGEST_LEN * 2 {
        return Err(WhitelistError::InvalidDigest(format!(
            "expected {} hex chars, got {}",
            DIGEST_LEN * 2,
            cleaned.len()
        )));
    }
    let mut digest = [0u8; DIGEST_LEN];
    hex::decode_to_slice(cleaned, &mut digest)
        .map_err(|e| WhitelistError::InvalidDigest(e.to_string()))?;
    Ok(digest)
}

/// Serde adapter: a single digest as a `0x`-hex string.
pub mod serde_digest {
    use super::{format_digest, parse_digest, Digest};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize as hex.
    pub fn serialize<S: Serializer>(digest: &Digest, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_digest(digest))
    }

    /// Deserialize from hex.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Digest, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_digest(&s).map_err(D::Error::custom)
    }
}

/// Serde adapter: an ordered list of digests as `0x`-hex strings.
pub mod serde_digest_vec {
    use super::{format_digest, parse_digest, Digest};
    use serde::{de::Error, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    /// Serialize as a hex array, preserving order.
    pub fn serialize<S: Serializer>(digests: &[Digest], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(digests.len()))?;
        for digest in digests {
            seq.serialize_element(&format_digest(digest))?;
        }
        seq.end()
    }

    /// Deserialize from a hex array, preserving order.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Digest>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| parse_digest(s).map_err(D::Error::custom))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
