//! Claim bundles.
//!
//! Everything a claimant hands to a verifier in one serializable value:
//! the claimed entry, its proof and the root it was generated against.
//!
//! ```json
//! {
//!   "root": "0x6d7b...7941",
//!   "address": "0x2c97...2708",
//!   "entitlement": "0xf",
//!   "proof": { "leaf_index": 0, "siblings": ["0xe0f4...66b0", "0x15e3...62d0"] }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::TreeConfig;
use crate::core::address::Address;
use crate::core::bits::PackedEntitlement;
use crate::core::hash::{serde_digest, Digest};
use crate::error::Result;
use crate::proof::merkle::{MerkleProof, WhitelistTree};
use crate::proof::verify::verify_proof;

/// Serializable claim: entry, proof and the root it targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBundle {
    /// Root the proof was generated against. Not trusted by verifiers.
    #[serde(with = "serde_digest")]
    pub root: Digest,
    /// Claimed address.
    pub address: Address,
    /// Claimed entitlement bitmask.
    pub entitlement: PackedEntitlement,
    /// Inclusion proof.
    pub proof: MerkleProof,
}

impl ClaimBundle {
    /// Check the bundle against a trusted root (never the bundle's own).
    pub fn verify(&self, config: &TreeConfig, trusted_root: &Digest) -> bool {
        verify_proof(config, &self.address, self.entitlement, &self.proof.siblings, trusted_root)
    }
}

impl WhitelistTree {
    /// Bundle the proof for an address.
    pub fn claim_bundle(&self, address: &Address) -> Result<ClaimBundle> {
        let (entry, proof) = self.proof_for_address(address)?;
        Ok(ClaimBundle {
            root: self.root(),
            address: entry.address,
            entitlement: entry.entitlement,
            proof,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whitelist::entry::{Whitelist, WhitelistEntry};

    fn tree() -> WhitelistTree {
        let entries = (1..=5u8)
            .map(|i| WhitelistEntry::new(Address::new([i; 20]), PackedEntitlement::from(u64::from(i))))
            .collect();
        WhitelistTree::build(TreeConfig::default(), Whitelist::new(entries).unwrap()).unwrap()
    }

    #[test]
    fn test_bundle_verifies_against_root() {
        let tree = tree();
        let bundle = tree.claim_bundle(&Address::new([3; 20])).unwrap();

        assert_eq!(bundle.root, tree.root());
        assert_eq!(bundle.entitlement, PackedEntitlement::from(3u64));
        assert!(bundle.verify(&TreeConfig::default(), &tree.root()));
        assert!(!bundle.verify(&TreeConfig::default(), &[0u8; 32]));
    }

    #[test]
    fn test_bundle_json_shape() {
        let bundle = tree().claim_bundle(&Address::new([1; 20])).unwrap();
        let json = serde_json::to_value(&bundle).unwrap();

        assert_eq!(json["entitlement"], "0x1");
        assert_eq!(json["address"], format!("0x{}", "01".repeat(20)));
        assert_eq!(json["proof"]["leaf_index"], 0);
        assert_eq!(json["proof"]["siblings"].as_array().unwrap().len(), 3);

        let back: ClaimBundle = serde_json::from_value(json).unwrap();
        assert_eq!(back, bundle);
    }

    #[test]
    fn test_tampered_bundle_fails() {
        let tree = tree();
        let mut bundle = tree.claim_bundle(&Address::new([2; 20])).unwrap();
        bundle.entitlement = PackedEntitlement::from(0xffu64);
        assert!(!bundle.verify(&TreeConfig::default(), &tree.root()));
    }
}
