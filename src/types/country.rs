use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// ISO 3166-1 alpha-2 country code, normalized to uppercase.
///
/// Rules are filed per country, so this is the primary filtering key of the
/// engine. Stored inline as two ASCII bytes; copying is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parse a two-letter country code, accepting any case.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] unless the input is exactly two
    /// ASCII letters.
    pub fn new(code: &str) -> Result<Self, EngineError> {
        let trimmed = code.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() == 2 && bytes.iter().all(u8::is_ascii_alphabetic) {
            Ok(CountryCode([
                bytes[0].to_ascii_uppercase(),
                bytes[1].to_ascii_uppercase(),
            ]))
        } else {
            Err(EngineError::validation(format!(
                "country code must be two ASCII letters, got '{code}'"
            )))
        }
    }

    /// The uppercase two-letter code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Construction guarantees two ASCII uppercase bytes.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl FromStr for CountryCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CountryCode::new(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        CountryCode::new(&s)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.as_str().to_owned()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
