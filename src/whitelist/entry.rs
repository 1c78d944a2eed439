//! Whitelist entries and the validated whitelist.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::address::Address;
use crate::core::bits::PackedEntitlement;
use crate::entitlement::codec::{pack, EntitlementSet};
use crate::error::{Result, WhitelistError};

/// One participant and the entitlement kinds they may claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WhitelistEntry {
    /// Participant address.
    pub address: Address,
    /// Packed entitlement kinds.
    pub entitlement: PackedEntitlement,
}

impl WhitelistEntry {
    /// Create an entry from an already packed bitmask.
    pub const fn new(address: Address, entitlement: PackedEntitlement) -> Self {
        Self { address, entitlement }
    }

    /// Create an entry from a set of kind IDs.
    pub fn from_ids(address: Address, ids: &EntitlementSet) -> Result<Self> {
        Ok(Self::new(address, pack(ids)?))
    }
}

/// Ordered, non-empty list of entries with unique addresses.
///
/// Entry order fixes leaf indices; duplicates are rejected rather than
/// merged so one address can never hold two competing leaves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Whitelist {
    entries: Vec<WhitelistEntry>,
    #[serde(skip)]
    index: BTreeMap<Address, usize>,
}

impl Whitelist {
    /// Validate and wrap a list of entries.
    pub fn new(entries: Vec<WhitelistEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(WhitelistError::EmptyWhitelist);
        }

        let mut index = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.address, position).is_some() {
                return Err(WhitelistError::DuplicateAddress(entry.address));
            }
        }

        Ok(Self { entries, index })
    }

    /// Entries in input order.
    pub fn entries(&self) -> &[WhitelistEntry] {
        &self.entries
    }

    /// Iterate entries in input order.
    pub fn iter(&self) -> impl Iterator<Item = &WhitelistEntry> {
        self.entries.iter()
    }

    /// Number of entries (always at least 1).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed whitelist.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for an address.
    pub fn find(&self, address: &Address) -> Option<&WhitelistEntry> {
        self.position(address).map(|i| &self.entries[i])
    }

    /// Input position (leaf index) of an address.
    pub fn position(&self, address: &Address) -> Option<usize> {
        self.index.get(address).copied()
    }
}

impl<'de> Deserialize<'de> for Whitelist {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entries = Vec::<WhitelistEntry>::deserialize(deserializer)?;
        Self::new(entries).map_err(serde::de::Error::custom)
    }
}
