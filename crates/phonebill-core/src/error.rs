//! Unified error handling for PhoneBill
//!
//! Every failure that can abort an invoice generation is a variant of
//! [`InvoiceError`]. Skipped calls are not errors and never show up here.

use thiserror::Error;

/// Main invoice generation error type
///
/// All errors in the workspace should be converted to this type.
#[derive(Error, Debug)]
pub enum InvoiceError {
    // ==================== Input Format Errors ====================
    #[error("invalid phone number {0:?}, expected + followed by 12 to 13 digits")]
    InvalidPhoneNumber(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("invalid billing period: {0}")]
    InvalidBillingPeriod(String),

    // ==================== Lookup Errors ====================
    #[error("subscriber not found: {0}")]
    SubscriberNotFound(String),

    #[error("subscriber directory error: {0}")]
    Directory(String),

    // ==================== Internal Errors ====================
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl InvoiceError {
    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            InvoiceError::InvalidPhoneNumber(_) => "invalid_phone_number",
            InvoiceError::InvalidInput(_) => "invalid_input",
            InvoiceError::InvalidRecord { .. } => "invalid_record",
            InvoiceError::InvalidBillingPeriod(_) => "invalid_billing_period",
            InvoiceError::SubscriberNotFound(_) => "subscriber_not_found",
            InvoiceError::Directory(_) => "directory_error",
            InvoiceError::Config(_) => "config_error",
            InvoiceError::Io(_) => "io_error",
            InvoiceError::Serialization(_) => "serialization_error",
        }
    }

    /// Whether the error comes from malformed input rather than a collaborator
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            InvoiceError::InvalidPhoneNumber(_)
                | InvoiceError::InvalidInput(_)
                | InvoiceError::InvalidRecord { .. }
                | InvoiceError::InvalidBillingPeriod(_)
        )
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for InvoiceError {
    fn from(err: serde_json::Error) -> Self {
        InvoiceError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for InvoiceError {
    fn from(err: std::io::Error) -> Self {
        InvoiceError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for InvoiceError {
    fn from(err: config::ConfigError) -> Self {
        InvoiceError::Config(err.to_string())
    }
}
