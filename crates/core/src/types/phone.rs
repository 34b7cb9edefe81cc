//! Korean phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Korean numbering plan, matched against the number with hyphens removed.
///
/// - `01x` mobile, `02` Seoul, or `0[3-9]x` regional area code
/// - 3-4 digit exchange
/// - 4 digit subscriber number
static KOREAN_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(01[0-9]|02|0[3-9][0-9])[0-9]{3,4}[0-9]{4}$").expect("Invalid regex")
});

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not follow the Korean numbering plan.
    #[error("phone number does not match the Korean numbering plan")]
    InvalidFormat,
}

/// A validated Korean phone number.
///
/// The number is kept exactly as submitted (hyphens optional), so the admin
/// inbox shows what the visitor typed.
///
/// ## Examples
///
/// ```
/// use donghang_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("010-1234-5678").is_ok());
/// assert!(PhoneNumber::parse("01012345678").is_ok());
/// assert!(PhoneNumber::parse("02-123-4567").is_ok());
/// assert!(PhoneNumber::parse("031-123-4567").is_ok());
///
/// assert!(PhoneNumber::parse("123").is_err());
/// assert!(PhoneNumber::parse("010-12-3456").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or, with hyphens stripped, does
    /// not match the Korean numbering plan.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !KOREAN_PHONE_RE.is_match(&strip_hyphens(s)) {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as submitted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn strip_hyphens(s: &str) -> String {
    s.chars().filter(|c| *c != '-').collect()
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
