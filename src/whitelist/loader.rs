//! Whitelist file loader.
//!
//! Reads a JSON array of records. Each record names an `address` and exactly
//! one entitlement source:
//!
//! ```json
//! [
//!   { "address": "0x2c97...2708", "nft": "0xf" },
//!   { "address": "0x7099...79c8", "ids": [0, 6] },
//!   { "address": "0x3c44...93bc", "kinds": ["slashed_validator"] }
//! ]
//! ```
//!
//! `nft` is the packed hex form used by the Merge NFT drop files, `ids` is a
//! raw kind-ID list and `kinds` resolves names through an [`EntitlementKinds`]
//! registry. Unknown extra fields are ignored.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::core::address::Address;
use crate::core::bits::{PackedEntitlement, ENTITLEMENT_BITS};
use crate::entitlement::codec::{pack_ids, EntitlementId};
use crate::entitlement::kinds::EntitlementKinds;
use crate::error::{Result, WhitelistError};
use crate::whitelist::entry::{Whitelist, WhitelistEntry};

#[derive(Debug, Deserialize)]
struct RawRecord {
    address: String,
    #[serde(default)]
    nft: Option<String>,
    #[serde(default)]
    ids: Option<Vec<u32>>,
    #[serde(default)]
    kinds: Option<Vec<String>>,
}

/// Parse a whitelist from JSON text.
pub fn parse_whitelist(json: &str, kinds: &EntitlementKinds) -> Result<Whitelist> {
    let records: Vec<RawRecord> = serde_json::from_str(json)?;
    let entries = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| resolve_record(index, record, kinds))
        .collect::<Result<Vec<_>>>()?;

    debug!("Parsed {} whitelist records", entries.len());
    Whitelist::new(entries)
}

/// Load a whitelist from a JSON file.
pub fn load_whitelist(path: impl AsRef<Path>, kinds: &EntitlementKinds) -> Result<Whitelist> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let whitelist = parse_whitelist(&json, kinds)?;
    info!("Loaded {} whitelist entries from {}", whitelist.len(), path.display());
    Ok(whitelist)
}

fn resolve_record(index: usize, record: RawRecord, kinds: &EntitlementKinds) -> Result<WhitelistEntry> {
    let invalid = |reason: String| WhitelistError::InvalidRecord { index, reason };

    let address = Address::parse(&record.address).map_err(|e| invalid(e.to_string()))?;

    let entitlement = match (record.nft, record.ids, record.kinds) {
        (Some(nft), None, None) => {
            PackedEntitlement::parse_hex(&nft).map_err(|e| invalid(e.to_string()))?
        }
        (None, Some(ids), None) => pack_ids(checked_ids(&ids)?)?,
        (None, None, Some(names)) => kinds.pack_names(&names)?,
        (None, None, None) => {
            return Err(invalid("missing one of 'nft', 'ids' or 'kinds'".into()));
        }
        _ => {
            return Err(invalid("only one of 'nft', 'ids' or 'kinds' may be given".into()));
        }
    };

    Ok(WhitelistEntry::new(address, entitlement))
}

/// Narrow raw IDs, rejecting anything outside the bit width.
fn checked_ids(ids: &[u32]) -> Result<Vec<EntitlementId>> {
    ids.iter()
        .map(|id| {
            if *id >= ENTITLEMENT_BITS {
                Err(WhitelistError::InvalidEntitlementId {
                    id: *id,
                    width: ENTITLEMENT_BITS,
                })
            } else {
                Ok(*id as EntitlementId)
            }
        })
        .collect()
}
