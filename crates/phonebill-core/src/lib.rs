//! PhoneBill Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the PhoneBill invoice generator. It includes:
//!
//! - Domain models (PhoneNumber, Call, Subscriber, BillingPeriod, Invoice)
//! - Collaborator traits (subscriber lookup)
//! - Unified error handling with stable error codes
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::InvoiceError;

/// Result type alias using InvoiceError
pub type InvoiceResult<T> = Result<T, InvoiceError>;
