//! Error types shared by the codec, whitelist, tree and verifier.

use thiserror::Error;

use crate::core::address::Address;
use crate::core::bits::PackedEntitlement;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WhitelistError>;

/// Whitelist and Merkle commitment errors.
///
/// An invalid proof is never an error: verification returns `false`.
#[derive(Debug, Error)]
pub enum WhitelistError {
    /// Entitlement ID does not fit in the packed bit width.
    #[error("entitlement id {id} exceeds bit width {width}")]
    InvalidEntitlementId {
        /// Offending ID.
        id: u32,
        /// Fixed width of the packed representation.
        width: u32,
    },

    /// Tree build attempted on zero entries.
    #[error("whitelist is empty")]
    EmptyWhitelist,

    /// No leaf matches the requested (address, entitlement) pair.
    #[error("no leaf for address {address} with entitlement {entitlement}")]
    LeafNotFound {
        /// Requested address.
        address: Address,
        /// Requested entitlement.
        entitlement: PackedEntitlement,
    },

    /// Address has no whitelist entry.
    #[error("address {0} is not whitelisted")]
    AddressNotWhitelisted(Address),

    /// Requested leaf index is outside the tree.
    #[error("leaf index {index} out of range for {leaf_count} leaves")]
    LeafIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of leaves in the tree.
        leaf_count: usize,
    },

    /// Proof shape is inconsistent with the tree it claims to belong to.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// Same address appears more than once in a whitelist.
    #[error("duplicate address {0}")]
    DuplicateAddress(Address),

    /// Address string could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Packed entitlement string could not be parsed.
    #[error("invalid entitlement: {0}")]
    InvalidEntitlement(String),

    /// Digest string could not be parsed.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// Entitlement kind name not present in the registry.
    #[error("unknown entitlement kind: {0}")]
    UnknownEntitlementKind(String),

    /// Entitlement kind registry is inconsistent.
    #[error("invalid entitlement kinds: {0}")]
    InvalidKinds(String),

    /// Whitelist record rejected by the loader.
    #[error("invalid whitelist record {index}: {reason}")]
    InvalidRecord {
        /// Position of the record in the input array.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input JSON could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
