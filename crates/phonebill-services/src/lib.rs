//! Invoice engine for PhoneBill
//!
//! This crate holds the rules that turn a subscriber's raw call list into an
//! invoice: what kind of call each record is, which promotion applies, what
//! it costs and how durations accumulate.
//!
//! # Architecture
//!
//! Data flows one way:
//! - `ingest` - CSV call records to validated `Call` values
//! - `classifier` - national, international or interplanetary, and friend calls
//! - `promotions` - ordered pricing overrides, first match wins
//! - `processor` - per-invoice state: skip policy, costs and running totals
//! - `invoice` - subscriber lookup and shaping of the final `Invoice`
//!
//! Calls must be processed in input order: promotion counters depend on
//! the calls already seen.

pub mod classifier;
pub mod ingest;
pub mod invoice;
pub mod processor;
pub mod promotions;

pub use classifier::{classify, CallType, Category, Characteristic, DurationRegistrar};
pub use ingest::parse_calls;
pub use invoice::{assemble, InvoiceService};
pub use processor::{CallProcessor, CallSummary, CallTotals, ProcessOutcome, SkipReason};
pub use promotions::{standard_chain, FreeFriendCalls, MercosurDiscount, Promotion};
