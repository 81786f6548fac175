//! Domain models for PhoneBill
//!
//! This module contains all the core domain models used throughout the workspace.

pub mod call;
pub mod invoice;
pub mod period;
pub mod phone;
pub mod subscriber;

pub use call::{parse_timestamp, Call, TIMESTAMP_FORMAT};
pub use invoice::{Invoice, InvoiceCall, InvoiceUser};
pub use period::{BillingPeriod, PeriodBounds};
pub use phone::PhoneNumber;
pub use subscriber::Subscriber;
