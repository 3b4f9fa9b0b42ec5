use serde::{Deserialize, Serialize};

use super::errors::AddressError;

/// Canonical spelling of the null identity.
///
/// Any `0x`-prefixed string made only of zeros is treated as null, this is
/// just the form returned by [`Address::zero`].
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

const MAX_ADDRESS_LEN: usize = 128;

/// An opaque account identity (depositor, recipient or destination).
///
/// Addresses are compared byte-for-byte; no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parses and validates an address.
    pub fn new(raw: impl Into<String>) -> Result<Self, AddressError> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }
        if trimmed.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::TooLong(trimmed.len()));
        }
        if !Self::is_valid(trimmed) {
            return Err(AddressError::InvalidCharacters(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The null identity. Deposits naming it as recipient are rejected.
    pub fn zero() -> Self {
        Self(ZERO_ADDRESS.to_string())
    }

    /// Returns `true` when the address spells the null identity.
    pub fn is_zero(&self) -> bool {
        match self.0.strip_prefix("0x") {
            Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b == b'0'),
            None => false,
        }
    }

    pub fn is_valid(address: &str) -> bool {
        address
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-' | '.'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Address::new(s)
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Address::new(s)
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::new(s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl std::ops::Deref for Address {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address_is_trimmed() {
        let address = Address::new("  alice ").unwrap();
        assert_eq!(address.as_str(), "alice");
        assert!(!address.is_zero());
    }

    #[test]
    fn test_invalid_address_is_rejected() {
        assert_eq!(Address::new(""), Err(AddressError::Empty));
        assert_eq!(Address::new("   "), Err(AddressError::Empty));
        assert!(matches!(
            Address::new("bob smith"),
            Err(AddressError::InvalidCharacters(_))
        ));
        assert!(matches!(
            Address::new("x".repeat(MAX_ADDRESS_LEN + 1)),
            Err(AddressError::TooLong(_))
        ));
    }

    #[test]
    fn test_zero_address_detection() {
        assert!(Address::zero().is_zero());
        assert!(Address::new("0x0").unwrap().is_zero());
        assert!(!Address::new("0x").unwrap().is_zero());
        assert!(!Address::new("0x01").unwrap().is_zero());
        assert!(!Address::new("000").unwrap().is_zero());
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let json = serde_json::to_string(&Address::new("carol").unwrap()).unwrap();
        assert_eq!(json, "\"carol\"");

        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_str(), "carol");

        assert!(serde_json::from_str::<Address>("\"not valid!\"").is_err());
    }
}
