//! Entitlement Kind Registry
//!
//! Maps human-readable kind names to bit positions. Passed explicitly to the
//! loader and the CLI so a deployment can swap its kind set (and reuse bit
//! positions) without touching the codec.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::bits::{PackedEntitlement, ENTITLEMENT_BITS};
use crate::entitlement::codec::{pack_ids, unpack_ids, EntitlementId};
use crate::error::{Result, WhitelistError};

/// Kind set of the Merge NFT drop, in bit order.
pub const DEFAULT_KINDS: [&str; 8] = [
    "do_one_transaction",
    "do_100_tansactions",
    "deploy_contract",
    "deploy_10_contract",
    "deploy_100_contract",
    "do_10_transactions_to_10_contracts",
    "become_validator",
    "slashed_validator",
];

/// Bidirectional `name <-> bit position` mapping.
///
/// Serializes as a JSON object `{ "name": bit, ... }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, EntitlementId>",
    into = "BTreeMap<String, EntitlementId>"
)]
pub struct EntitlementKinds {
    by_name: BTreeMap<String, EntitlementId>,
    by_id: BTreeMap<EntitlementId, String>,
}

impl Default for EntitlementKinds {
    fn default() -> Self {
        let by_name: BTreeMap<String, EntitlementId> = DEFAULT_KINDS
            .iter()
            .enumerate()
            .map(|(bit, name)| (name.to_string(), bit as EntitlementId))
            .collect();
        let by_id = by_name.iter().map(|(name, id)| (*id, name.clone())).collect();
        Self { by_name, by_id }
    }
}

impl EntitlementKinds {
    /// Build a registry, validating bit range and uniqueness of names and bits.
    pub fn new<I, S>(kinds: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, EntitlementId)>,
        S: Into<String>,
    {
        let mut by_name = BTreeMap::new();
        let mut by_id = BTreeMap::new();

        for (name, id) in kinds {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(WhitelistError::InvalidKinds("empty kind name".into()));
            }
            if u32::from(id) >= ENTITLEMENT_BITS {
                return Err(WhitelistError::InvalidEntitlementId {
                    id: u32::from(id),
                    width: ENTITLEMENT_BITS,
                });
            }
            if let Some(existing) = by_id.get(&id) {
                return Err(WhitelistError::InvalidKinds(format!(
                    "bit {} assigned to both '{}' and '{}'",
                    id, existing, name
                )));
            }
            if by_name.contains_key(&name) {
                return Err(WhitelistError::InvalidKinds(format!("duplicate kind '{}'", name)));
            }
            by_id.insert(id, name.clone());
            by_name.insert(name, id);
        }

        Ok(Self { by_name, by_id })
    }

    /// Parse a registry from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: BTreeMap<String, EntitlementId> = serde_json::from_str(json)?;
        Self::new(map)
    }

    /// Load a registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Bit position of a kind.
    pub fn id_of(&self, name: &str) -> Result<EntitlementId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| WhitelistError::UnknownEntitlementKind(name.to_string()))
    }

    /// Name of a bit position, if registered.
    pub fn name_of(&self, id: EntitlementId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Pack a list of kind names.
    pub fn pack_names<I, S>(&self, names: I) -> Result<PackedEntitlement>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = names
            .into_iter()
            .map(|name| self.id_of(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        pack_ids(ids)
    }

    /// Names of the kinds set in `packed`, in bit order.
    ///
    /// Bits with no registered name render as `kind_<bit>`.
    pub fn names_of(&self, packed: PackedEntitlement) -> Vec<String> {
        unpack_ids(packed)
            .into_iter()
            .map(|id| match self.name_of(id) {
                Some(name) => name.to_string(),
                None => format!("kind_{}", id),
            })
            .collect()
    }

    /// Registered kinds in bit order.
    pub fn iter(&self) -> impl Iterator<Item = (EntitlementId, &str)> {
        self.by_id.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True if no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl TryFrom<BTreeMap<String, EntitlementId>> for EntitlementKinds {
    type Error = WhitelistError;

    fn try_from(map: BTreeMap<String, EntitlementId>) -> Result<Self> {
        Self::new(map)
    }
}

impl From<EntitlementKinds> for BTreeMap<String, EntitlementId> {
    fn from(kinds: EntitlementKinds) -> Self {
        kinds.by_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kinds_bit_order() {
        let kinds = EntitlementKinds::default();
        assert_eq!(kinds.len(), 8);
        assert_eq!(kinds.id_of("do_one_transaction").unwrap(), 0);
        assert_eq!(kinds.id_of("become_validator").unwrap(), 6);
        assert_eq!(kinds.name_of(7), Some("slashed_validator"));
        assert_eq!(kinds.name_of(8), None);
    }

    #[test]
    fn test_names_of_0xf() {
        let kinds = EntitlementKinds::default();
        let names = kinds.names_of(PackedEntitlement::from(0xfu64));
        assert_eq!(
            names,
            vec![
                "do_one_transaction",
                "do_100_tansactions",
                "deploy_contract",
                "deploy_10_contract",
            ]
        );
    }

    #[test]
    fn test_unregistered_bits_render_generic() {
        let kinds = EntitlementKinds::default();
        let names = kinds.names_of(PackedEntitlement::from(0x201u64));
        assert_eq!(names, vec!["do_one_transaction", "kind_9"]);
    }

    #[test]
    fn test_pack_names() {
        let kinds = EntitlementKinds::default();
        let packed = kinds.pack_names(["deploy_contract", "become_validator"]).unwrap();
        assert_eq!(packed, PackedEntitlement::from(0x44u64));
    }

    #[test]
    fn test_unknown_kind() {
        let kinds = EntitlementKinds::default();
        let err = kinds.pack_names(["mint_everything"]).unwrap_err();
        assert!(matches!(err, WhitelistError::UnknownEntitlementKind(name) if name == "mint_everything"));
    }

    #[test]
    fn test_custom_registry_from_json() {
        let kinds = EntitlementKinds::from_json_str(r#"{"early_adopter": 0, "auditor": 200}"#).unwrap();
        assert_eq!(kinds.id_of("auditor").unwrap(), 200);
        assert_eq!(kinds.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![0, 200]);
    }

    #[test]
    fn test_registry_rejects_shared_bit() {
        let result = EntitlementKinds::from_json_str(r#"{"a": 1, "b": 1}"#);
        assert!(matches!(result, Err(WhitelistError::InvalidKinds(_))));
    }

    #[test]
    fn test_registry_rejects_bit_out_of_range() {
        let result = EntitlementKinds::new([("too_high", 300u16)]);
        assert!(matches!(result, Err(WhitelistError::InvalidEntitlementId { id: 300, .. })));
    }

    #[test]
    fn test_serde_roundtrip_through_object() {
        let kinds = EntitlementKinds::default();
        let json = serde_json::to_string(&kinds).unwrap();
        assert!(json.contains("\"slashed_validator\":7"));
        let back: EntitlementKinds = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kinds);
    }
}
