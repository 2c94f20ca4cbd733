//! Contract address parsing and normalization.
//!
//! An address is accepted when it is exactly 40 hex digits after an optional
//! `0x` prefix, and is either all-lowercase or carries a valid EIP-55
//! checksum. Validation happens at ingress, before any network call; the
//! parsed form is immutable and serializes to canonical lowercase.

use std::fmt;

use alloy_primitives::Address;
use serde::{Serialize, Serializer};

use crate::error::AnalysisError;

/// A validated 20-byte EVM contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractAddress(Address);

impl ContractAddress {
    /// Parse and validate an address string.
    ///
    /// Mixed-case input must pass EIP-55 checksum validation; all-lowercase
    /// input is accepted as-is. Anything else is [`AnalysisError::InvalidAddress`].
    pub fn parse(input: &str) -> Result<Self, AnalysisError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        if digits.len() != 40 {
            return Err(AnalysisError::InvalidAddress(format!(
                "expected 40 hex digits, got {} in '{trimmed}'",
                digits.len()
            )));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AnalysisError::InvalidAddress(format!(
                "non-hex character in '{trimmed}'"
            )));
        }

        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        let address = if has_upper {
            Address::parse_checksummed(format!("0x{digits}"), None).map_err(|_| {
                AnalysisError::InvalidAddress(format!("bad EIP-55 checksum in '{trimmed}'"))
            })?
        } else {
            let mut bytes = [0u8; 20];
            hex::decode_to_slice(digits, &mut bytes)
                .map_err(|e| AnalysisError::InvalidAddress(e.to_string()))?;
            Address::from(bytes)
        };

        Ok(Self(address))
    }

    /// The underlying address value.
    pub fn address(&self) -> Address {
        self.0
    }

    /// EIP-55 checksummed rendering, for display contexts.
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl From<Address> for ContractAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Canonical lowercase form.
        write!(f, "{:#x}", self.0)
    }
}

impl Serialize for ContractAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
