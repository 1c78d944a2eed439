//! Account addresses.
//!
//! Whitelisted participants are 20-byte EVM-style addresses. The canonical
//! byte form (the raw 20 bytes, no padding) is what gets hashed into a leaf.

use std::fmt;
use std::str::FromStr;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, WhitelistError};

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Wrap raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from 40 hex chars, with or without `0x`, any case.
    ///
    /// The zero address is rejected: it can never sign a claim.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let cleaned = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if cleaned.len() != ADDRESS_LEN * 2 {
            return Err(WhitelistError::InvalidAddress(format!(
                "expected {} hex chars, got {}",
                ADDRESS_LEN * 2,
                cleaned.len()
            )));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(cleaned, &mut bytes)
            .map_err(|e| WhitelistError::InvalidAddress(format!("{}: {}", trimmed, e)))?;
        if bytes == [0u8; ADDRESS_LEN] {
            return Err(WhitelistError::InvalidAddress("zero address not allowed".into()));
        }
        Ok(Self(bytes))
    }

    /// Canonical byte form.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = WhitelistError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_prefix() {
        let addr = Address::parse("0x2c9758BDe2DBc7F6a259a5826a85761FcE322708").unwrap();
        assert_eq!(addr.0[0], 0x2c);
        assert_eq!(addr.0[19], 0x08);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let mixed = Address::parse("0x2c9758BDe2DBc7F6a259a5826a85761FcE322708").unwrap();
        let lower = Address::parse("2c9758bde2dbc7f6a259a5826a85761fce322708").unwrap();
        assert_eq!(mixed, lower);
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        let addr: Address = "0x2c9758BDe2DBc7F6a259a5826a85761FcE322708".parse().unwrap();
        assert_eq!(addr.to_string(), "0x2c9758bde2dbc7f6a259a5826a85761fce322708");
    }

    #[test]
    fn test_parse_invalid_length() {
        assert!(matches!(Address::parse("0x1234"), Err(WhitelistError::InvalidAddress(_))));
    }

    #[test]
    fn test_parse_invalid_hex() {
        let result = Address::parse("0xghijklmnopqrstuvwxyz1234567890abcdefabcd");
        assert!(matches!(result, Err(WhitelistError::InvalidAddress(_))));
    }

    #[test]
    fn test_zero_address_rejected() {
        let zero = format!("0x{}", "0".repeat(40));
        assert!(Address::parse(&zero).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let addr = Address::new([0xab; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(20)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
