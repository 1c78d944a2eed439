//! Entitlement encoding.
//!
//! - `codec.rs` - pack/unpack between ID sets and 256-bit masks
//! - `kinds.rs` - configurable kind name registry

pub mod codec;
pub mod kinds;

pub use codec::{pack, pack_ids, unpack, unpack_ids, EntitlementId, EntitlementSet};
pub use kinds::{EntitlementKinds, DEFAULT_KINDS};
