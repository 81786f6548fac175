//! Subscriber directory for PhoneBill
//!
//! Implementations of the `SubscriberFinder` trait from phonebill-core:
//!
//! - `HttpSubscriberDirectory` - remote lookup over HTTP
//! - `InMemoryDirectory` - a fixed set of subscribers, optionally loaded
//!   from a JSON file
//!
//! # Example
//!
//! ```no_run
//! use phonebill_core::models::PhoneNumber;
//! use phonebill_core::traits::SubscriberFinder;
//! use phonebill_directory::HttpSubscriberDirectory;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let directory = HttpSubscriberDirectory::new("https://interview-brubank-api.herokuapp.com", 10)?;
//!     let phone = PhoneNumber::parse("+5491167980952")?;
//!     let subscriber = directory.find_by_phone(&phone).await?;
//!     println!("{} lives at {}", subscriber.name, subscriber.address);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod memory;

pub use client::HttpSubscriberDirectory;
pub use memory::InMemoryDirectory;
