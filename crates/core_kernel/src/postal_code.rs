//! Postal code key
//!
//! Addresses are keyed by postal code. Callers send codes in several shapes
//! (`01001-000`, ` 01001000 `, `01.001-000`), so every code is normalized once at
//! the boundary and compared in normalized form afterwards.
//!
//! Normalization only strips separators. Whether the remaining text is a valid
//! code for a given lookup provider is that provider's decision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Number of digits in a Brazilian CEP
pub const CEP_LENGTH: usize = 8;

/// A normalized, non-empty postal code
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Normalizes and wraps a raw postal code
    ///
    /// Surrounding whitespace, inner whitespace, `-` and `.` are removed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if nothing is left after normalization.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
            .collect();

        if normalized.is_empty() {
            return Err(CoreError::validation("postal code must not be blank"));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized code
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the code has the shape of a CEP (eight ASCII digits)
    pub fn is_cep(&self) -> bool {
        self.0.len() == CEP_LENGTH && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PostalCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> String {
        code.0
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_separators() {
        let code = PostalCode::parse(" 01.001-000 ").unwrap();
        assert_eq!(code.as_str(), "01001000");
        assert!(code.is_cep());
    }

    #[test]
    fn test_blank_is_rejected() {
        assert!(matches!(PostalCode::parse("   "), Err(CoreError::Validation(_))));
        assert!(PostalCode::parse("--").is_err());
    }

    #[test]
    fn test_short_codes_are_kept_but_not_cep() {
        let code = PostalCode::parse("00000").unwrap();
        assert_eq!(code.as_str(), "00000");
        assert!(!code.is_cep());
    }

    #[test]
    fn test_deserialize_normalizes() {
        let code: PostalCode = serde_json::from_str("\"01001-000\"").unwrap();
        assert_eq!(code.as_str(), "01001000");
        assert!(serde_json::from_str::<PostalCode>("\"\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_normalization_is_idempotent(raw in "[0-9 .-]{1,16}") {
            if let Ok(code) = PostalCode::parse(&raw) {
                let again = PostalCode::parse(code.as_str()).unwrap();
                prop_assert_eq!(code, again);
            }
        }

        #[test]
        fn prop_formatted_cep_equals_bare_cep(digits in "[0-9]{8}") {
            let formatted = format!("{}-{}", &digits[..5], &digits[5..]);
            prop_assert_eq!(
                PostalCode::parse(&formatted).unwrap(),
                PostalCode::parse(&digits).unwrap()
            );
        }
    }
}
