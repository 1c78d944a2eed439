//! Merkle Tree Commitments
//!
//! Binary Merkle tree over whitelist leaves with sorted-pair node hashing.
//!
//! ```text
//! level 2:            root
//!                    /    \
//! level 1:       h(a,b)    c        <- odd node promoted unchanged
//!                /    \    |
//! level 0:      a      b   c
//! ```
//!
//! - Parents are `hash(min(l, r) || max(l, r))`, so proofs carry no side bits.
//! - An unpaired last node moves up as-is: no duplication, no padding.
//! - A single leaf is its own root (depth 0).
//!
//! Trees are built once per whitelist snapshot and are read-only afterwards,
//! so a built tree can be shared across threads for proof generation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TreeConfig;
use crate::core::address::Address;
use crate::core::bits::PackedEntitlement;
use crate::core::hash::{format_digest, serde_digest_vec, Digest, HashAlgorithm};
use crate::error::{Result, WhitelistError};
use crate::proof::leaf::leaf_digest;
use crate::whitelist::entry::{Whitelist, WhitelistEntry};

/// Binary Merkle tree for whitelist commitments.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// Hash and leaf layout the tree was built with.
    config: TreeConfig,
    /// All tree levels (leaves at index 0, root at last index)
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree over pre-hashed leaves, in the given order.
    ///
    /// Leaves are treated independently: equal digests get separate positions.
    pub fn from_leaves(config: TreeConfig, leaves: Vec<Digest>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(WhitelistError::EmptyWhitelist);
        }

        let mut levels = vec![leaves];

        // Build up to root
        while levels[levels.len() - 1].len() > 1 {
            let next_level = fold_level(&config, &levels[levels.len() - 1]);
            levels.push(next_level);
        }

        let tree = Self { config, levels };
        debug!(
            "Built merkle tree: {} leaves, depth {}, root {}",
            tree.leaf_count(),
            tree.depth(),
            format_digest(&tree.root())
        );
        Ok(tree)
    }

    /// Build a tree over raw entries, hashing each with `config`.
    pub fn from_entries(config: TreeConfig, entries: &[WhitelistEntry]) -> Result<Self> {
        let leaves = entries
            .iter()
            .map(|entry| leaf_digest(&config, &entry.address, entry.entitlement))
            .collect();
        Self::from_leaves(config, leaves)
    }

    /// Build a tree over a validated whitelist.
    pub fn from_whitelist(config: TreeConfig, whitelist: &Whitelist) -> Result<Self> {
        Self::from_entries(config, whitelist.entries())
    }

    /// Root digest.
    pub fn root(&self) -> Digest {
        // levels is never empty and the last level always holds exactly one node
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of hashing levels above the leaves. 0 for a single leaf.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Leaf digests in input order.
    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    /// Leaf digest at `index`.
    pub fn leaf(&self, index: usize) -> Option<&Digest> {
        self.levels[0].get(index)
    }

    /// All levels, leaves first, root last.
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// Configuration the tree was built with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Hash function used for every node.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.config.hash
    }

    /// Index of the first leaf equal to `leaf`.
    pub fn position_of(&self, leaf: &Digest) -> Option<usize> {
        self.levels[0].iter().position(|candidate| candidate == leaf)
    }

    /// Generate an inclusion proof for the leaf at `index`.
    pub fn proof_for_index(&self, index: usize) -> Result<MerkleProof> {
        if index >= self.leaf_count() {
            return Err(WhitelistError::LeafIndexOutOfRange {
                index,
                leaf_count: self.leaf_count(),
            });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut current_index = index;

        // Walk up the tree, collecting pair partners. A promoted node has none.
        for level in &self.levels[..self.depth()] {
            if let Some(sibling) = level.get(current_index ^ 1) {
                siblings.push(*sibling);
            }
            current_index /= 2;
        }

        Ok(MerkleProof {
            leaf_index: index,
            siblings,
        })
    }

    /// Generate a proof for an exact `(address, entitlement)` pair.
    ///
    /// A bitmask other than the whitelisted one has no leaf and fails with
    /// `LeafNotFound`.
    pub fn proof_for_entry(&self, address: &Address, entitlement: PackedEntitlement) -> Result<MerkleProof> {
        let leaf = leaf_digest(&self.config, address, entitlement);
        let index = self
            .position_of(&leaf)
            .ok_or(WhitelistError::LeafNotFound {
                address: *address,
                entitlement,
            })?;
        self.proof_for_index(index)
    }
}

/// Fold one level into the next, promoting an unpaired last node.
fn fold_level(config: &TreeConfig, level: &[Digest]) -> Vec<Digest> {
    level
        .chunks(2)
        .map(|chunk| match chunk {
            [left, right] => config.hash.hash_sorted_pair(left, right),
            _ => chunk[0],
        })
        .collect()
}

/// Depth of a tree over `leaf_count` leaves: `ceil(log2(leaf_count))`.
///
/// Also the maximum number of siblings any proof in that tree can carry.
pub fn tree_depth(leaf_count: usize) -> usize {
    if leaf_count <= 1 {
        0
    } else {
        (usize::BITS - (leaf_count - 1).leading_zeros()) as usize
    }
}

/// Merkle inclusion proof.
///
/// Siblings are ordered leaf-to-root; order determines the fold and must be
/// preserved by any transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Index of the leaf this proof is for.
    pub leaf_index: usize,
    /// Sibling digests along the path, leaf level first.
    #[serde(with = "serde_digest_vec")]
    pub siblings: Vec<Digest>,
}

impl MerkleProof {
    /// Number of siblings.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// True for a single-leaf tree's proof.
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Estimated size in bytes.
    pub fn size(&self) -> usize {
        8 + self.siblings.len() * 32
    }
}

/// A whitelist together with its tree, for address-based proof lookup.
#[derive(Clone, Debug)]
pub struct WhitelistTree {
    whitelist: Whitelist,
    tree: MerkleTree,
}

impl WhitelistTree {
    /// Hash and commit a whitelist.
    pub fn build(config: TreeConfig, whitelist: Whitelist) -> Result<Self> {
        let tree = MerkleTree::from_whitelist(config, &whitelist)?;
        Ok(Self { whitelist, tree })
    }

    /// Root digest.
    pub fn root(&self) -> Digest {
        self.tree.root()
    }

    /// Underlying tree.
    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    /// Underlying whitelist.
    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Entitlements whitelisted for an address.
    pub fn claimable(&self, address: &Address) -> Option<PackedEntitlement> {
        self.whitelist.find(address).map(|entry| entry.entitlement)
    }

    /// Look up an address and prove its entry.
    pub fn proof_for_address(&self, address: &Address) -> Result<(WhitelistEntry, MerkleProof)> {
        let index = self
            .whitelist
            .position(address)
            .ok_or(WhitelistError::AddressNotWhitelisted(*address))?;
        let entry = self.whitelist.entries()[index];
        let proof = self.tree.proof_for_index(index)?;
        Ok((entry, proof))
    }
}
