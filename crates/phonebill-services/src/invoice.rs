//! Invoice generation
//!
//! Runs a call processor over the whole call list and shapes the result into
//! an [`Invoice`]. No pricing rules live here.

use phonebill_core::config::BillingConfig;
use phonebill_core::models::{
    BillingPeriod, Call, Invoice, InvoiceCall, InvoiceUser, PhoneNumber, Subscriber,
};
use phonebill_core::traits::SubscriberFinder;
use phonebill_core::InvoiceResult;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::processor::{CallProcessor, ProcessOutcome};
use crate::promotions::{standard_chain, Promotion};

/// Build the invoice of a known subscriber
pub fn assemble(
    subscriber: &Subscriber,
    billing_period: BillingPeriod,
    calls: &[Call],
    promotions: Vec<Box<dyn Promotion>>,
) -> Invoice {
    let mut processor = CallProcessor::new(subscriber, billing_period, promotions);

    let invoice_calls: Vec<InvoiceCall> = calls
        .iter()
        .filter_map(|call| match processor.process(call) {
            ProcessOutcome::Billed { cost, .. } => Some(InvoiceCall {
                destination: call.destination().to_string(),
                duration: call.duration_secs(),
                timestamp: call.formatted_timestamp(),
                amount: cost,
            }),
            ProcessOutcome::Skipped(_) => None,
        })
        .collect();

    let summary = processor.summarize();

    Invoice {
        user: InvoiceUser {
            address: subscriber.address.clone(),
            name: subscriber.name.clone(),
            phone: subscriber.phone.to_string(),
        },
        calls: invoice_calls,
        total_international_seconds: summary.totals.international_secs,
        total_national_seconds: summary.totals.national_secs,
        total_friends_seconds: summary.totals.friends_secs,
        total_interplanetary_seconds: summary.totals.interplanetary_secs,
        total: summary.total_amount,
    }
}

/// Invoice generation service
///
/// Looks up the subscriber through the configured finder and bills their
/// calls with the standard promotion chain.
pub struct InvoiceService<F: SubscriberFinder> {
    finder: Arc<F>,
    billing: BillingConfig,
}

impl<F: SubscriberFinder> InvoiceService<F> {
    /// Create a new invoice service
    pub fn new(finder: Arc<F>, billing: BillingConfig) -> Self {
        Self { finder, billing }
    }

    /// Generate the invoice for the subscriber owning `phone`
    ///
    /// Fails without a partial invoice when the number is malformed or the
    /// subscriber cannot be found.
    #[instrument(skip(self, billing_period, calls), fields(calls = calls.len()))]
    pub async fn generate(
        &self,
        phone: &str,
        billing_period: BillingPeriod,
        calls: &[Call],
    ) -> InvoiceResult<Invoice> {
        let phone = PhoneNumber::parse(phone)?;

        let subscriber = self.finder.find_by_phone(&phone).await?;
        debug!(
            "Found subscriber {} with {} friends",
            subscriber.name,
            subscriber.friends.len()
        );

        let billing_period = billing_period.with_bounds(self.billing.period_bounds);
        let invoice = assemble(
            &subscriber,
            billing_period,
            calls,
            standard_chain(&self.billing),
        );

        info!(
            "Invoice for {}: {} of {} calls billed, total {}",
            phone,
            invoice.calls.len(),
            calls.len(),
            invoice.total
        );

        Ok(invoice)
    }
}
