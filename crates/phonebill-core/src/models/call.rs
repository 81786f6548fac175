//! Call record model
//!
//! An immutable usage record. Both phone numbers are validated when the
//! record is built, so a `Call` value is always well formed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::phone::PhoneNumber;
use crate::{InvoiceError, InvoiceResult};

/// ISO-8601 layout used for call timestamps, e.g. `2021-01-17T18:57:34Z`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A single phone call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Call {
    destination: PhoneNumber,
    source: PhoneNumber,
    duration_secs: u32,
    timestamp: DateTime<Utc>,
}

impl Call {
    /// Build a call, validating both phone numbers
    pub fn new(
        destination: &str,
        source: &str,
        duration_secs: u32,
        timestamp: DateTime<Utc>,
    ) -> InvoiceResult<Self> {
        let destination = PhoneNumber::parse(destination)
            .map_err(|e| InvoiceError::InvalidInput(format!("destination phone: {}", e)))?;
        let source = PhoneNumber::parse(source)
            .map_err(|e| InvoiceError::InvalidInput(format!("source phone: {}", e)))?;

        Ok(Self {
            destination,
            source,
            duration_secs,
            timestamp,
        })
    }

    #[inline]
    pub fn destination(&self) -> &PhoneNumber {
        &self.destination
    }

    #[inline]
    pub fn source(&self) -> &PhoneNumber {
        &self.source
    }

    /// Duration in whole seconds
    #[inline]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Timestamp rendered with [`TIMESTAMP_FORMAT`]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Parse a timestamp in [`TIMESTAMP_FORMAT`] as UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    chrono::NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}
