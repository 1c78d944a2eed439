//! Core deterministic primitives.
//!
//! Fixed-width types whose byte layout is part of the commitment format.
//! Nothing in here allocates per-platform widths or reads the environment.

pub mod address;
pub mod bits;
pub mod hash;

// Re-export core types
pub use address::{Address, ADDRESS_LEN};
pub use bits::{PackedEntitlement, ENTITLEMENT_BITS, PACKED_LEN};
pub use hash::{format_digest, parse_digest, Digest, HashAlgorithm, DIGEST_LEN};
