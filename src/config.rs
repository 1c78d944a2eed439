//! Tree configuration.
//!
//! The hash function and leaf layout are a compatibility contract between
//! whoever builds a root and whoever verifies claims against it. Both sides
//! must run with the same `TreeConfig`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::hash::HashAlgorithm;
use crate::proof::leaf::LeafEncoding;

/// Settings shared by builder and verifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Hash for leaves and internal nodes.
    pub hash: HashAlgorithm,
    /// Byte layout of a leaf preimage.
    pub leaf_encoding: LeafEncoding,
    /// Reject proofs longer than the tree can be deep instead of just failing them.
    pub strict_proofs: bool,
}

impl TreeConfig {
    /// Create config from environment variables.
    ///
    /// - `WHITELIST_HASH`: `keccak256` | `sha256`
    /// - `WHITELIST_LEAF_ENCODING`: `packed` | `expanded`
    /// - `WHITELIST_STRICT_PROOFS`: `true` | `1`
    ///
    /// Unset or unrecognised values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            hash: env_parsed("WHITELIST_HASH").unwrap_or(defaults.hash),
            leaf_encoding: env_parsed("WHITELIST_LEAF_ENCODING").unwrap_or(defaults.leaf_encoding),
            strict_proofs: std::env::var("WHITELIST_STRICT_PROOFS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.strict_proofs),
        }
    }

    /// Builder-style hash override.
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    /// Builder-style leaf encoding override.
    pub fn with_leaf_encoding(mut self, leaf_encoding: LeafEncoding) -> Self {
        self.leaf_encoding = leaf_encoding;
        self
    }

    /// Builder-style strictness override.
    pub fn with_strict_proofs(mut self, strict: bool) -> Self {
        self.strict_proofs = strict;
        self
    }
}

fn env_parsed<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}: {}", key, e);
            None
        }
    }
}
