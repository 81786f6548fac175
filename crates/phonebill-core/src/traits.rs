//! Collaborator traits
//!
//! Abstractions the invoice core is handed from the outside world.

use async_trait::async_trait;

use crate::models::{PhoneNumber, Subscriber};
use crate::InvoiceResult;

/// Subscriber lookup
///
/// Implementations return `InvoiceError::SubscriberNotFound` when no
/// subscriber owns the number, and `InvoiceError::Directory` for any other
/// lookup failure.
#[async_trait]
pub trait SubscriberFinder: Send + Sync {
    /// Find the subscriber that owns a phone number
    async fn find_by_phone(&self, phone: &PhoneNumber) -> InvoiceResult<Subscriber>;
}
