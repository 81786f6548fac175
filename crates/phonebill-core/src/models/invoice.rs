//! Invoice model
//!
//! The serialized result of an invoice generation. Field names are part of
//! the output contract.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Subscriber identity printed on the invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceUser {
    pub address: String,
    pub name: String,
    #[serde(rename = "phone_number")]
    pub phone: String,
}

/// A billed call line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceCall {
    /// Destination phone number
    #[serde(rename = "phone_number")]
    pub destination: String,

    /// Duration in seconds
    pub duration: u32,

    /// Call start, ISO-8601 UTC
    pub timestamp: String,

    /// Final cost after promotions
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Telephone invoice for one subscriber and billing period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub user: InvoiceUser,
    pub calls: Vec<InvoiceCall>,
    pub total_international_seconds: u64,
    pub total_national_seconds: u64,
    pub total_friends_seconds: u64,
    pub total_interplanetary_seconds: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl Invoice {
    /// Sum of the individual call amounts
    pub fn billed_amount(&self) -> Decimal {
        self.calls.iter().map(|c| c.amount).sum()
    }
}
