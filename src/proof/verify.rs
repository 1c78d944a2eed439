//! Verification API
//!
//! Replays a claim against a trusted root. Only the leaf hasher and the
//! sorted-pair node hash are used here, never the tree, so the same check can
//! be re-implemented inside another trust boundary (e.g. a contract) and must
//! agree bit for bit.
//!
//! An invalid proof is an expected outcome and yields `false`. Errors are
//! reserved for malformed input in strict mode.

use tracing::debug;

use crate::config::TreeConfig;
use crate::core::address::Address;
use crate::core::bits::PackedEntitlement;
use crate::core::hash::{format_digest, Digest, HashAlgorithm};
use crate::error::{Result, WhitelistError};
use crate::proof::leaf::leaf_digest;
use crate::proof::merkle::{tree_depth, MerkleProof};

/// Verify a claim: recompute the leaf, fold the siblings in order, compare.
pub fn verify_proof(
    config: &TreeConfig,
    address: &Address,
    entitlement: PackedEntitlement,
    siblings: &[Digest],
    root: &Digest,
) -> bool {
    let leaf = leaf_digest(config, address, entitlement);
    fold_proof(config.hash, leaf, siblings) == *root
}

/// Verify a claim, rejecting proofs longer than any tree of `leaf_count`
/// leaves could produce.
pub fn verify_proof_strict(
    config: &TreeConfig,
    address: &Address,
    entitlement: PackedEntitlement,
    siblings: &[Digest],
    root: &Digest,
    leaf_count: usize,
) -> Result<bool> {
    check_proof_length(siblings.len(), leaf_count)?;
    Ok(verify_proof(config, address, entitlement, siblings, root))
}

/// Fold a proof starting from an already hashed leaf.
pub fn fold_proof(hash: HashAlgorithm, leaf: Digest, siblings: &[Digest]) -> Digest {
    siblings
        .iter()
        .fold(leaf, |current, sibling| hash.hash_sorted_pair(&current, sibling))
}

fn check_proof_length(sibling_count: usize, leaf_count: usize) -> Result<()> {
    if leaf_count == 0 {
        return Err(WhitelistError::EmptyWhitelist);
    }
    let max_depth = tree_depth(leaf_count);
    if sibling_count > max_depth {
        return Err(WhitelistError::MalformedProof(format!(
            "{} siblings for a tree of {} leaves (depth {})",
            sibling_count, leaf_count, max_depth
        )));
    }
    Ok(())
}

/// Verification result with the roots involved, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Did verification pass?
    pub valid: bool,
    /// Root recomputed from the claim and proof.
    pub computed_root: Digest,
    /// Trusted root.
    pub expected_root: Digest,
}

/// Something that can authorize a claim against a commitment.
pub trait ClaimVerifier {
    /// Check a claim. `Ok(false)` for a well-formed but invalid proof.
    fn verify_claim(
        &self,
        address: &Address,
        entitlement: PackedEntitlement,
        proof: &MerkleProof,
    ) -> Result<bool>;
}

/// Verifier pinned to a trusted root.
#[derive(Clone, Debug)]
pub struct RootVerifier {
    config: TreeConfig,
    root: Digest,
    leaf_count: Option<usize>,
}

impl RootVerifier {
    /// Create a verifier for `root` under `config`.
    pub fn new(config: TreeConfig, root: Digest) -> Self {
        Self {
            config,
            root,
            leaf_count: None,
        }
    }

    /// Record the committed leaf count, enabling the length check in strict mode.
    pub fn with_leaf_count(mut self, leaf_count: usize) -> Self {
        self.leaf_count = Some(leaf_count);
        self
    }

    /// Trusted root.
    pub fn root(&self) -> &Digest {
        &self.root
    }

    /// Verify and report both roots.
    pub fn verify_detailed(
        &self,
        address: &Address,
        entitlement: PackedEntitlement,
        siblings: &[Digest],
    ) -> VerificationResult {
        let leaf = leaf_digest(&self.config, address, entitlement);
        let computed_root = fold_proof(self.config.hash, leaf, siblings);
        VerificationResult {
            valid: computed_root == self.root,
            computed_root,
            expected_root: self.root,
        }
    }
}

impl ClaimVerifier for RootVerifier {
    fn verify_claim(
        &self,
        address: &Address,
        entitlement: PackedEntitlement,
        proof: &MerkleProof,
    ) -> Result<bool> {
        if self.config.strict_proofs {
            if let Some(leaf_count) = self.leaf_count {
                check_proof_length(proof.siblings.len(), leaf_count)?;
                if proof.leaf_index >= leaf_count {
                    return Err(WhitelistError::MalformedProof(format!(
                        "leaf index {} outside {} leaves",
                        proof.leaf_index, leaf_count
                    )));
                }
            }
        }

        let result = self.verify_detailed(address, entitlement, &proof.siblings);
        if !result.valid {
            debug!(
                "Claim for {} rejected: computed root {} != {}",
                address,
                format_digest(&result.computed_root),
                format_digest(&result.expected_root)
            );
        }
        Ok(result.valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::leaf::LeafEncoding;
    use crate::proof::merkle::MerkleTree;
    use crate::whitelist::entry::WhitelistEntry;
    use proptest::prelude::*;

    fn entry(seed: u8, mask: u64) -> WhitelistEntry {
        let mut bytes = [seed; 20];
        bytes[0] = 0x01;
        WhitelistEntry::new(Address::new(bytes), PackedEntitlement::from(mask))
    }

    fn sample_entries(n: usize) -> Vec<WhitelistEntry> {
        (0..n).map(|i| entry(i as u8 + 1, (i as u64 % 7) + 1)).collect()
    }

    #[test]
    fn test_single_entry_empty_proof() {
        let config = TreeConfig::default();
        let entries = sample_entries(1);
        let tree = MerkleTree::from_entries(config, &entries).unwrap();

        assert!(verify_proof(&config, &entries[0].address, entries[0].entitlement, &[], &tree.root()));
    }

    #[test]
    fn test_wrong_entitlement_fails() {
        let config = TreeConfig::default();
        let entries = sample_entries(5);
        let tree = MerkleTree::from_entries(config, &entries).unwrap();
        let proof = tree.proof_for_index(2).unwrap();
        let target = entries[2];

        assert!(verify_proof(&config, &target.address, target.entitlement, &proof.siblings, &tree.root()));
        for bit in 0..8 {
            let other = target.entitlement.with_bit_flipped(bit).unwrap();
            assert!(!verify_proof(&config, &target.address, other, &proof.siblings, &tree.root()));
        }
    }

    #[test]
    fn test_proof_order_matters() {
        let config = TreeConfig::default();
        let entries = sample_entries(8);
        let tree = MerkleTree::from_entries(config, &entries).unwrap();
        let mut siblings = tree.proof_for_index(3).unwrap().siblings;
        siblings.reverse();

        assert!(!verify_proof(&config, &entries[3].address, entries[3].entitlement, &siblings, &tree.root()));
    }

    #[test]
    fn test_config_mismatch_fails() {
        let build_config = TreeConfig::default();
        let entries = sample_entries(4);
        let tree = MerkleTree::from_entries(build_config, &entries).unwrap();
        let proof = tree.proof_for_index(1).unwrap();

        let sha = TreeConfig::default().with_hash(HashAlgorithm::Sha256);
        let expanded = TreeConfig::default().with_leaf_encoding(LeafEncoding::ExpandedIds);
        for config in [sha, expanded] {
            assert!(!verify_proof(&config, &entries[1].address, entries[1].entitlement, &proof.siblings, &tree.root()));
        }
    }

    #[test]
    fn test_strict_rejects_overlong_proof() {
        let config = TreeConfig::default();
        let entries = sample_entries(3);
        let tree = MerkleTree::from_entries(config, &entries).unwrap();
        let mut siblings = tree.proof_for_index(0).unwrap().siblings;

        let ok = verify_proof_strict(&config, &entries[0].address, entries[0].entitlement, &siblings, &tree.root(), 3);
        assert!(ok.unwrap());

        siblings.push([0u8; 32]);
        let err = verify_proof_strict(&config, &entries[0].address, entries[0].entitlement, &siblings, &tree.root(), 3);
        assert!(matches!(err, Err(WhitelistError::MalformedProof(_))));

        let empty = verify_proof_strict(&config, &entries[0].address, entries[0].entitlement, &[], &tree.root(), 0);
        assert!(matches!(empty, Err(WhitelistError::EmptyWhitelist)));
    }

    #[test]
    fn test_root_verifier_detailed() {
        let config = TreeConfig::default();
        let entries = sample_entries(6);
        let tree = MerkleTree::from_entries(config, &entries).unwrap();
        let verifier = RootVerifier::new(config, tree.root());
        let proof = tree.proof_for_index(4).unwrap();

        let good = verifier.verify_detailed(&entries[4].address, entries[4].entitlement, &proof.siblings);
        assert!(good.valid);
        assert_eq!(good.computed_root, good.expected_root);

        let bad = verifier.verify_detailed(&entries[5].address, entries[5].entitlement, &proof.siblings);
        assert!(!bad.valid);
        assert_eq!(bad.expected_root, tree.root());
        assert_ne!(bad.computed_root, tree.root());
    }

    #[test]
    fn test_claim_verifier_strict_mode() {
        let config = TreeConfig::default().with_strict_proofs(true);
        let entries = sample_entries(5);
        let tree = MerkleTree::from_entries(config, &entries).unwrap();
        let verifier = RootVerifier::new(config, tree.root()).with_leaf_count(tree.leaf_count());

        let proof = tree.proof_for_index(0).unwrap();
        assert!(verifier.verify_claim(&entries[0].address, entries[0].entitlement, &proof).unwrap());
        assert!(!verifier.verify_claim(&entries[1].address, entries[1].entitlement, &proof).unwrap());

        let mut padded = proof.clone();
        padded.siblings.extend([[7u8; 32]; 3]);
        assert!(verifier.verify_claim(&entries[0].address, entries[0].entitlement, &padded).is_err());

        let mut far = proof;
        far.leaf_index = 99;
        assert!(verifier.verify_claim(&entries[0].address, entries[0].entitlement, &far).is_err());
    }

    #[test]
    fn test_claim_verifier_lenient_mode_never_errors() {
        let config = TreeConfig::default();
        let entries = sample_entries(5);
        let tree = MerkleTree::from_entries(config, &entries).unwrap();
        let verifier = RootVerifier::new(config, tree.root()).with_leaf_count(5);

        let mut proof = tree.proof_for_index(0).unwrap();
        proof.siblings.extend([[7u8; 32]; 3]);
        assert!(!verifier.verify_claim(&entries[0].address, entries[0].entitlement, &proof).unwrap());
    }

    fn whitelist_strategy() -> impl Strategy<Value = Vec<WhitelistEntry>> {
        proptest::collection::btree_map(
            proptest::array::uniform20(any::<u8>()),
            any::<u64>(),
            1..40,
        )
        .prop_map(|map| {
            map.into_iter()
                .map(|(bytes, mask)| WhitelistEntry::new(Address::new(bytes), PackedEntitlement::from(mask)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_every_entry_verifies(entries in whitelist_strategy()) {
            let config = TreeConfig::default();
            let tree = MerkleTree::from_entries(config, &entries).unwrap();
            let root = tree.root();

            for entry in &entries {
                let proof = tree.proof_for_entry(&entry.address, entry.entitlement).unwrap();
                prop_assert!(proof.len() <= tree.depth());
                prop_assert!(verify_proof(&config, &entry.address, entry.entitlement, &proof.siblings, &root));
            }
        }

        #[test]
        fn prop_other_entitlement_fails(entries in whitelist_strategy(), pick in any::<prop::sample::Index>(), bit in 0u32..256) {
            let config = TreeConfig::default();
            let tree = MerkleTree::from_entries(config, &entries).unwrap();
            let target = entries[pick.index(entries.len())];
            let proof = tree.proof_for_entry(&target.address, target.entitlement).unwrap();
            let other = target.entitlement.with_bit_flipped(bit).unwrap();

            prop_assert!(!verify_proof(&config, &target.address, other, &proof.siblings, &tree.root()));
        }

        #[test]
        fn prop_no_cross_entry_reuse(entries in whitelist_strategy(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
            let config = TreeConfig::default();
            let tree = MerkleTree::from_entries(config, &entries).unwrap();
            let e1 = entries[a.index(entries.len())];
            let e2 = entries[b.index(entries.len())];
            prop_assume!(e1 != e2);

            let proof = tree.proof_for_entry(&e2.address, e2.entitlement).unwrap();
            prop_assert!(!verify_proof(&config, &e1.address, e1.entitlement, &proof.siblings, &tree.root()));
        }
    }
}
