//! Fixed-Width Entitlement Bitmask
//!
//! A 256-bit unsigned integer stored as 32 big-endian bytes. The width is
//! fixed so the encoding never depends on a platform's native integer size,
//! and it lines up with the 32-byte word an on-chain verifier hashes.
//!
//! Bit `i` is the `2^i` place value: bit 0 is the lowest bit of byte 31.

use std::fmt;
use std::str::FromStr;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, WhitelistError};

/// Number of bits in a packed entitlement. Largest valid ID is `ENTITLEMENT_BITS - 1`.
pub const ENTITLEMENT_BITS: u32 = 256;

/// Encoded width in bytes.
pub const PACKED_LEN: usize = 32;

/// Bitmask of entitlement kinds, big-endian, zero-padded to 32 bytes.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackedEntitlement([u8; PACKED_LEN]);

impl PackedEntitlement {
    /// Empty bitmask.
    pub const ZERO: Self = Self([0u8; PACKED_LEN]);

    /// Wrap big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; PACKED_LEN]) -> Self {
        Self(bytes)
    }

    /// Big-endian, zero-padded 32-byte form (the hashed form).
    #[inline]
    pub fn to_be_bytes(&self) -> [u8; PACKED_LEN] {
        self.0
    }

    /// Borrow the big-endian bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; PACKED_LEN] {
        &self.0
    }

    /// True if no bit is set.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Test bit `index`. Bits beyond the width read as unset.
    #[inline]
    pub fn bit(&self, index: u32) -> bool {
        if index >= ENTITLEMENT_BITS {
            return false;
        }
        let (byte, mask) = locate(index);
        self.0[byte] & mask != 0
    }

    /// Set bit `index`.
    pub fn set_bit(&mut self, index: u32) -> Result<()> {
        if index >= ENTITLEMENT_BITS {
            return Err(WhitelistError::InvalidEntitlementId {
                id: index,
                width: ENTITLEMENT_BITS,
            });
        }
        let (byte, mask) = locate(index);
        self.0[byte] |= mask;
        Ok(())
    }

    /// Copy with bit `index` flipped. Used to probe bit sensitivity.
    pub fn with_bit_flipped(mut self, index: u32) -> Result<Self> {
        if index >= ENTITLEMENT_BITS {
            return Err(WhitelistError::InvalidEntitlementId {
                id: index,
                width: ENTITLEMENT_BITS,
            });
        }
        let (byte, mask) = locate(index);
        self.0[byte] ^= mask;
        Ok(self)
    }

    /// Number of significant bits: one past the highest set bit, 0 for zero.
    pub fn bit_len(&self) -> u32 {
        match self.0.iter().position(|b| *b != 0) {
            Some(first) => {
                let bytes_below = (PACKED_LEN - first - 1) as u32;
                bytes_below * 8 + (8 - self.0[first].leading_zeros())
            }
            None => 0,
        }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }

    /// Parse from hex with optional `0x`, up to 64 digits.
    ///
    /// Accepts the short form whitelist files use (`"0xf"`).
    pub fn parse_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let cleaned = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if cleaned.is_empty() {
            return Err(WhitelistError::InvalidEntitlement("empty value".into()));
        }
        if cleaned.len() > PACKED_LEN * 2 {
            return Err(WhitelistError::InvalidEntitlement(format!(
                "{} exceeds {} bits",
                trimmed, ENTITLEMENT_BITS
            )));
        }
        let padded = format!("{:0>width$}", cleaned, width = PACKED_LEN * 2);
        let mut bytes = [0u8; PACKED_LEN];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| WhitelistError::InvalidEntitlement(format!("{}: {}", trimmed, e)))?;
        Ok(Self(bytes))
    }
}

/// Byte index and mask for a bit position.
#[inline]
fn locate(index: u32) -> (usize, u8) {
    let byte = PACKED_LEN - 1 - (index / 8) as usize;
    (byte, 1u8 << (index % 8))
}

impl From<u64> for PackedEntitlement {
    fn from(value: u64) -> Self {
        Self::from(value as u128)
    }
}

impl From<u128> for PackedEntitlement {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; PACKED_LEN];
        bytes[PACKED_LEN - 16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl FromStr for PackedEntitlement {
    type Err = WhitelistError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for PackedEntitlement {
    /// Minimal `0x`-hex, `0x0` for the empty mask.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = hex::encode(self.0);
        let digits = full.trim_start_matches('0');
        if digits.is_empty() {
            f.write_str("0x0")
        } else {
            write!(f, "0x{}", digits)
        }
    }
}

impl fmt::Debug for PackedEntitlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedEntitlement({})", self)
    }
}

impl Serialize for PackedEntitlement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackedEntitlement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(D::Error::custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================
