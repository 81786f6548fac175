//! Phone number model
//!
//! Validates the `+` followed by 12 to 13 digits format and extracts the
//! two-digit country code (e.g. `+549XXXXXXXXXX` -> `54`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{InvoiceError, InvoiceResult};

static PHONE_NUMBER_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[0-9]{12,13}$").expect("Valid phone number regex pattern"));

/// Validate a raw phone number string
pub fn validate(number: &str) -> InvoiceResult<()> {
    if PHONE_NUMBER_FORMAT.is_match(number) {
        Ok(())
    } else {
        Err(InvoiceError::InvalidPhoneNumber(number.to_string()))
    }
}

/// Country code of a raw phone number
///
/// Fails instead of slicing when the number was never validated.
pub fn country_code(number: &str) -> InvoiceResult<&str> {
    validate(number)?;
    Ok(&number[1..3])
}

/// A validated phone number
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse and validate a phone number
    pub fn parse(number: &str) -> InvoiceResult<Self> {
        validate(number)?;
        Ok(Self(number.to_string()))
    }

    /// Two-digit country code following the `+`
    #[inline]
    pub fn country_code(&self) -> &str {
        &self.0[1..3]
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = InvoiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
