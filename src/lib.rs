//! # Entitlement Merkle
//!
//! Merkle commitments over whitelists where every participant is bound to an
//! address and a bitmask of entitlement kinds they may claim.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ENTITLEMENT MERKLE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Fixed-width primitives                    │
//! │  ├── address.rs  - 20-byte account addresses                 │
//! │  ├── bits.rs     - 256-bit packed entitlement                │
//! │  └── hash.rs     - Digests and sorted-pair hashing           │
//! │                                                              │
//! │  entitlement/    - Entitlement encoding                      │
//! │  ├── codec.rs    - pack / unpack                             │
//! │  └── kinds.rs    - Kind name registry                        │
//! │                                                              │
//! │  whitelist/      - Input (non-deterministic edge)            │
//! │  ├── entry.rs    - Entries and validated whitelist           │
//! │  └── loader.rs   - JSON whitelist files                      │
//! │                                                              │
//! │  proof/          - Commitments                               │
//! │  ├── leaf.rs     - Leaf hashing                              │
//! │  ├── merkle.rs   - Tree build and proof generation           │
//! │  ├── verify.rs   - Proof verification                        │
//! │  └── bundle.rs   - Claim bundles                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Everything outside `whitelist::loader` is a pure function of its inputs:
//! - Fixed 256-bit entitlements, never a native integer width
//! - Fixed byte layout: `address || entitlement (32-byte big-endian)`
//! - No HashMap (BTreeMap for sorted iteration)
//! - No I/O, no clocks, no randomness
//!
//! Given the same whitelist in the same order and the same [`TreeConfig`],
//! the root is identical on any platform.
//!
//! ```
//! use entitlement_merkle::{
//!     pack, verify_proof, Address, EntitlementSet, MerkleTree, TreeConfig, WhitelistEntry,
//! };
//!
//! let config = TreeConfig::default();
//! let ids: EntitlementSet = [0, 1, 2, 3].into_iter().collect();
//! let entry = WhitelistEntry::new(
//!     Address::parse("0x2c9758BDe2DBc7F6a259a5826a85761FcE322708").unwrap(),
//!     pack(&ids).unwrap(),
//! );
//!
//! let tree = MerkleTree::from_entries(config, &[entry]).unwrap();
//! let proof = tree.proof_for_entry(&entry.address, entry.entitlement).unwrap();
//! assert!(verify_proof(&config, &entry.address, entry.entitlement, &proof.siblings, &tree.root()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod entitlement;
pub mod error;
pub mod proof;
pub mod whitelist;

// Re-export commonly used types
pub use config::TreeConfig;
pub use crate::core::{format_digest, parse_digest, Address, Digest, HashAlgorithm, PackedEntitlement, ENTITLEMENT_BITS};
pub use entitlement::{pack, unpack, EntitlementId, EntitlementKinds, EntitlementSet};
pub use error::{Result, WhitelistError};
pub use proof::{
    leaf_digest, verify_proof, verify_proof_strict, ClaimBundle, ClaimVerifier, LeafEncoding,
    MerkleProof, MerkleTree, RootVerifier, WhitelistTree,
};
pub use whitelist::{load_whitelist, parse_whitelist, Whitelist, WhitelistEntry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
