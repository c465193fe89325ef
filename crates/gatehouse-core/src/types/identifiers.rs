//! Identifier types for repositories and the identities acting on them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repository callsign
///
/// A short, stable, unique identifier made of one or more uppercase ASCII
/// letters. Construction always validates, so any `Callsign` value is
/// well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Callsign(String);

impl Callsign {
    /// Whether `s` is a well-formed callsign
    pub fn is_valid(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_uppercase())
    }

    /// Get the callsign as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rejected callsign text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid callsign \"{0}\": expected one or more uppercase letters A-Z")]
pub struct InvalidCallsign(pub String);

impl FromStr for Callsign {
    type Err = InvalidCallsign;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidCallsign(s.to_owned()))
        }
    }
}

impl TryFrom<String> for Callsign {
    type Error = InvalidCallsign;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidCallsign(value))
        }
    }
}

impl From<Callsign> for String {
    fn from(callsign: Callsign) -> Self {
        callsign.0
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Viewer identifier
///
/// The authenticated identity a session acts on behalf of. The value is
/// supplied by the login layer and treated as opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerId(String);

impl ViewerId {
    /// Create a viewer identifier from its username
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the username
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callsign_accepts_uppercase_letters() {
        let callsign: Callsign = "ABC".parse().unwrap();
        assert_eq!(callsign.as_str(), "ABC");
        assert_eq!(callsign.to_string(), "ABC");
    }

    #[test]
    fn test_callsign_rejects_other_shapes() {
        for bad in ["", "abc", "AB1", "A-B", "ÄB", " A"] {
            assert!(bad.parse::<Callsign>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_callsign_deserialization_validates() {
        #[derive(Deserialize)]
        struct Wrapper {
            callsign: Callsign,
        }

        let ok: Wrapper = toml::from_str("callsign = \"XYZ\"").unwrap();
        assert_eq!(ok.callsign.as_str(), "XYZ");

        let bad = toml::from_str::<Wrapper>("callsign = \"xyz\"");
        assert!(bad.is_err());
    }
}
