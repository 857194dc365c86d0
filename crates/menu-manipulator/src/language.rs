//! Language codes.
//!
//! Every menu link resolves to a language code during filtering. Two
//! reserved sentinels exist: "zxx" for content that is not linguistic
//! and "und" for content whose language was never specified. Links
//! resolving to a sentinel always pass the language filter.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved code for non-linguistic content.
pub const LANGCODE_NOT_APPLICABLE: &str = "zxx";

/// Reserved code for content whose language was never specified.
pub const LANGCODE_NOT_SPECIFIED: &str = "und";

/// A language identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Langcode {
    /// Not linguistic ("zxx").
    NotApplicable,
    /// Never specified ("und").
    NotSpecified,
    /// A concrete language id (e.g. "en", "fr").
    Tag(String),
}

impl Langcode {
    /// Parse a language code, mapping the reserved codes to their sentinels.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        match code.as_str() {
            LANGCODE_NOT_APPLICABLE => Self::NotApplicable,
            LANGCODE_NOT_SPECIFIED => Self::NotSpecified,
            _ => Self::Tag(code),
        }
    }

    /// The wire form of this language code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotApplicable => LANGCODE_NOT_APPLICABLE,
            Self::NotSpecified => LANGCODE_NOT_SPECIFIED,
            Self::Tag(tag) => tag,
        }
    }

    /// Whether this is one of the two reserved sentinel codes.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::NotApplicable | Self::NotSpecified)
    }
}

impl fmt::Display for Langcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Langcode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl Serialize for Langcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Langcode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::new(code))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn reserved_codes_parse_to_sentinels() {
        assert_eq!(Langcode::new("zxx"), Langcode::NotApplicable);
        assert_eq!(Langcode::new("und"), Langcode::NotSpecified);
        assert_eq!(Langcode::new("fr"), Langcode::Tag("fr".to_string()));
    }

    #[test]
    fn sentinels_report_as_sentinel() {
        assert!(Langcode::NotApplicable.is_sentinel());
        assert!(Langcode::NotSpecified.is_sentinel());
        assert!(!Langcode::new("en").is_sentinel());
    }

    #[test]
    fn display_round_trips() {
        for code in ["zxx", "und", "de"] {
            assert_eq!(Langcode::new(code).to_string(), code);
        }
    }

    #[test]
    fn serde_as_plain_string() {
        let lang = Langcode::new("fr");
        let json = serde_json::to_string(&lang).unwrap();
        assert_eq!(json, "\"fr\"");

        let parsed: Langcode = serde_json::from_str("\"zxx\"").unwrap();
        assert_eq!(parsed, Langcode::NotApplicable);
    }
}
