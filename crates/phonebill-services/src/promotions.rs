//! Promotions
//!
//! Promotions are evaluated in order and the first one that applies sets the
//! final cost of a call. `applies_to` only reads state; counters move in
//! `apply`.

use phonebill_core::config::BillingConfig;
use phonebill_core::models::Call;
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::classifier::{CallType, Characteristic};

/// A pricing override for some calls
pub trait Promotion {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Whether the promotion applies to a call
    fn applies_to(&self, call: &Call, call_type: &CallType) -> bool;

    /// Apply the promotion, returning the final cost
    fn apply(&mut self, call: &Call, call_type: &CallType) -> Decimal;
}

/// First N friend calls of the invoice are free
#[derive(Debug, Clone)]
pub struct FreeFriendCalls {
    limit: u32,
    granted: u32,
}

impl FreeFriendCalls {
    pub fn new(limit: u32) -> Self {
        Self { limit, granted: 0 }
    }

    /// Free calls handed out so far
    pub fn granted(&self) -> u32 {
        self.granted
    }
}

impl Promotion for FreeFriendCalls {
    fn name(&self) -> &'static str {
        "free_friend_calls"
    }

    fn applies_to(&self, _call: &Call, call_type: &CallType) -> bool {
        call_type.has_characteristic(Characteristic::ToFriend) && self.granted < self.limit
    }

    fn apply(&mut self, _call: &Call, _call_type: &CallType) -> Decimal {
        self.granted += 1;
        Decimal::ZERO
    }
}

/// Discount on international calls to Mercosur countries
#[derive(Debug, Clone)]
pub struct MercosurDiscount {
    country_codes: HashSet<String>,
    discount_percent: u32,
}

impl MercosurDiscount {
    pub fn new<I, S>(country_codes: I, discount_percent: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            country_codes: country_codes.into_iter().map(Into::into).collect(),
            discount_percent: discount_percent.min(100),
        }
    }
}

impl Promotion for MercosurDiscount {
    fn name(&self) -> &'static str {
        "mercosur_discount"
    }

    fn applies_to(&self, call: &Call, call_type: &CallType) -> bool {
        call_type.has_characteristic(Characteristic::International)
            && self
                .country_codes
                .contains(call.destination().country_code())
    }

    fn apply(&mut self, _call: &Call, call_type: &CallType) -> Decimal {
        let remaining = Decimal::from(100 - self.discount_percent) / Decimal::from(100);
        call_type.base_cost() * remaining
    }
}

/// Promotion chain in its canonical order: friends first, then Mercosur
pub fn standard_chain(config: &BillingConfig) -> Vec<Box<dyn Promotion>> {
    let mut chain: Vec<Box<dyn Promotion>> =
        vec![Box::new(FreeFriendCalls::new(config.free_friend_calls))];

    if !config.mercosur_country_codes.is_empty() {
        chain.push(Box::new(MercosurDiscount::new(
            config.mercosur_country_codes.iter().cloned(),
            config.mercosur_discount_percent,
        )));
    }

    chain
}
