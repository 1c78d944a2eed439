//! Entitlement Codec
//!
//! Packs a set of entitlement-kind IDs into a [`PackedEntitlement`] and back.
//! Packing sets bit `i` for every ID `i`; IDs are distinct so this is the same
//! as summing `2^i`. Unpacking walks positions upward only while `2^position`
//! is still `<= value`, so small masks never scan the full 256 bits.

use std::collections::BTreeSet;

use crate::core::bits::PackedEntitlement;
use crate::error::Result;

/// Entitlement-kind identifier. Valid iff `< ENTITLEMENT_BITS`.
pub type EntitlementId = u16;

/// Ordered set of entitlement-kind IDs.
pub type EntitlementSet = BTreeSet<EntitlementId>;

/// Pack a set of IDs.
///
/// Fails with `InvalidEntitlementId` if any ID is outside the bit width.
pub fn pack(ids: &EntitlementSet) -> Result<PackedEntitlement> {
    pack_ids(ids.iter().copied())
}

/// Pack an arbitrary ID list (as a loader hands it over). Repeated IDs collapse.
pub fn pack_ids<I>(ids: I) -> Result<PackedEntitlement>
where
    I: IntoIterator<Item = EntitlementId>,
{
    let mut packed = PackedEntitlement::ZERO;
    for id in ids {
        packed.set_bit(u32::from(id))?;
    }
    Ok(packed)
}

/// Unpack a bitmask into its IDs, ascending. `unpack(0)` is empty.
pub fn unpack(value: PackedEntitlement) -> EntitlementSet {
    unpack_ids(value).into_iter().collect()
}

/// Unpack into an ascending `Vec`, the order leaf encodings iterate in.
pub fn unpack_ids(value: PackedEntitlement) -> Vec<EntitlementId> {
    // bit_len is the first position where 2^position exceeds value
    (0..value.bit_len())
        .filter(|position| value.bit(*position))
        .map(|position| position as EntitlementId)
        .collect()
}
