//! Whitelist Commitment System
//!
//! Provides verifiable whitelist claims through:
//! - Deterministic leaf hashing of (address, entitlement)
//! - Sorted-pair Merkle tree commitments
//! - Inclusion proofs
//! - Verification by replay against a trusted root
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    COMMITMENT SYSTEM                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  leaf.rs         - Leaf preimage layout and hashing         │
//! │  merkle.rs       - Tree build, odd-node promotion, proofs   │
//! │  verify.rs       - Proof replay against a root              │
//! │  bundle.rs       - Serializable claim (entry + proof)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod bundle;
pub mod leaf;
pub mod merkle;
pub mod verify;

// Re-export key types
pub use bundle::ClaimBundle;
pub use leaf::{encode_leaf, leaf_digest, LeafEncoding};
pub use merkle::{tree_depth, MerkleProof, MerkleTree, WhitelistTree};
pub use verify::{
    fold_proof, verify_proof, verify_proof_strict, ClaimVerifier, RootVerifier,
    VerificationResult,
};
