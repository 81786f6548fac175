//! Call processor
//!
//! Processes the calls of one subscriber and billing period one by one, in
//! input order, returning each cost with promotions applied and keeping
//! running totals. Promotion counters depend on the calls seen so far, so a
//! processor must not be reused for another invoice.
//!
//! Calls are not re-validated here: a `Call` cannot be built with a
//! malformed phone number.

use phonebill_core::models::{BillingPeriod, Call, Subscriber};
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::classifier::{classify, CallType, DurationRegistrar};
use crate::promotions::Promotion;

/// Why a call was left out of the invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Made from a number other than the subscriber's
    NotOwner,
    /// Outside the billing period
    OutsidePeriod,
}

/// Result of processing a single call
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Billed { cost: Decimal, call_type: CallType },
    Skipped(SkipReason),
}

impl ProcessOutcome {
    /// Cost of the call, `None` if it was skipped
    pub fn cost(&self) -> Option<Decimal> {
        match self {
            ProcessOutcome::Billed { cost, .. } => Some(*cost),
            ProcessOutcome::Skipped(_) => None,
        }
    }

    #[inline]
    pub fn is_skipped(&self) -> bool {
        matches!(self, ProcessOutcome::Skipped(_))
    }
}

/// Accumulated seconds per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallTotals {
    pub national_secs: u64,
    pub international_secs: u64,
    pub friends_secs: u64,
    pub interplanetary_secs: u64,
}

impl DurationRegistrar for CallTotals {
    fn register_friend_call(&mut self, duration_secs: u32) {
        self.friends_secs += u64::from(duration_secs);
    }

    fn register_national_call(&mut self, duration_secs: u32) {
        self.national_secs += u64::from(duration_secs);
    }

    fn register_international_call(&mut self, duration_secs: u32) {
        self.international_secs += u64::from(duration_secs);
    }

    fn register_interplanetary_call(&mut self, duration_secs: u32) {
        self.interplanetary_secs += u64::from(duration_secs);
    }
}

/// Snapshot of a processor's running totals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSummary {
    pub total_amount: Decimal,
    pub totals: CallTotals,
}

/// Stateful per-invoice call processor
pub struct CallProcessor<'a> {
    subscriber: &'a Subscriber,
    billing_period: BillingPeriod,
    promotions: Vec<Box<dyn Promotion>>,

    totals: CallTotals,
    total_amount: Decimal,
}

impl<'a> CallProcessor<'a> {
    pub fn new(
        subscriber: &'a Subscriber,
        billing_period: BillingPeriod,
        promotions: Vec<Box<dyn Promotion>>,
    ) -> Self {
        Self {
            subscriber,
            billing_period,
            promotions,
            totals: CallTotals::default(),
            total_amount: Decimal::ZERO,
        }
    }

    /// Process a call, returning its cost or the reason it was skipped
    pub fn process(&mut self, call: &Call) -> ProcessOutcome {
        if let Some(reason) = self.skip_reason(call) {
            debug!(
                destination = %call.destination(),
                source = %call.source(),
                ?reason,
                "Skipping call"
            );
            return ProcessOutcome::Skipped(reason);
        }

        let call_type = classify(call, &self.subscriber.friends);
        call_type.register_duration(call.duration_secs(), &mut self.totals);

        let cost = self.call_cost(call, &call_type);
        self.total_amount += cost;

        ProcessOutcome::Billed { cost, call_type }
    }

    /// Total amount and durations so far. Does not reset anything.
    pub fn summarize(&self) -> CallSummary {
        CallSummary {
            total_amount: self.total_amount,
            totals: self.totals,
        }
    }

    fn skip_reason(&self, call: &Call) -> Option<SkipReason> {
        if call.source() != &self.subscriber.phone {
            return Some(SkipReason::NotOwner);
        }

        if !self.billing_period.contains(call.timestamp()) {
            return Some(SkipReason::OutsidePeriod);
        }

        None
    }

    fn call_cost(&mut self, call: &Call, call_type: &CallType) -> Decimal {
        for promo in self.promotions.iter_mut() {
            if promo.applies_to(call, call_type) {
                let cost = promo.apply(call, call_type);
                trace!(
                    promotion = promo.name(),
                    category = %call_type.category(),
                    %cost,
                    "Promotion applied"
                );
                return cost;
            }
        }

        call_type.base_cost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promotions::{FreeFriendCalls, MercosurDiscount};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use phonebill_core::models::PhoneNumber;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    const OWNER: &str = "+5491111111111";
    const NATIONAL_FRIEND: &str = "+5491111111113";
    const INTERNATIONAL_FRIEND: &str = "+1991111111113";

    fn subscriber() -> Subscriber {
        Subscriber::new("Antonio Banderas", "Calle Falsa 123", PhoneNumber::parse(OWNER).unwrap())
            .with_friends([NATIONAL_FRIEND, INTERNATIONAL_FRIEND])
    }

    fn period() -> BillingPeriod {
        BillingPeriod::from_dates("2022-01-01", "2022-12-31").unwrap()
    }

    fn in_period() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 9, 5, 20, 52, 44).unwrap()
    }

    fn call(destination: &str, duration_secs: u32) -> Call {
        Call::new(destination, OWNER, duration_secs, in_period()).unwrap()
    }

    fn friends_only() -> Vec<Box<dyn Promotion>> {
        vec![Box::new(FreeFriendCalls::new(10))]
    }

    #[test]
    fn test_bills_international_by_the_second() {
        let s = subscriber();
        let mut processor = CallProcessor::new(&s, period(), friends_only());

        assert_eq!(processor.process(&call("+1991111111112", 60)).cost(), Some(dec!(60)));
        assert_eq!(processor.process(&call("+1991111111112", 40)).cost(), Some(dec!(40)));

        let summary = processor.summarize();
        assert_eq!(summary.total_amount, dec!(100));
        assert_eq!(summary.totals.international_secs, 100);
        assert_eq!(summary.totals.national_secs, 0);
        assert_eq!(summary.totals.friends_secs, 0);
    }

    #[test]
    fn test_eleventh_friend_call_is_charged() {
        let s = subscriber();
        let mut processor = CallProcessor::new(&s, period(), friends_only());

        let costs: Vec<_> = (1..=11)
            .map(|i| processor.process(&call(NATIONAL_FRIEND, i * 10)).cost().unwrap())
            .collect();

        assert!(costs[..10].iter().all(|c| c.is_zero()));
        assert_eq!(costs[10], dec!(2.5));

        let summary = processor.summarize();
        let all_durations: u64 = (1..=11).map(|i| i * 10).sum();
        assert_eq!(summary.total_amount, dec!(2.5));
        assert_eq!(summary.totals.friends_secs, all_durations);
        assert_eq!(summary.totals.national_secs, all_durations);
    }

    #[test]
    fn test_friend_and_stranger_mix() {
        let s = subscriber();
        let mut processor = CallProcessor::new(&s, period(), friends_only());

        let costs: Vec<_> = [
            call("+5491111111112", 60),
            call(INTERNATIONAL_FRIEND, 40),
            call(NATIONAL_FRIEND, 40),
            call("+1991111111112", 60),
        ]
        .iter()
        .map(|c| processor.process(c).cost().unwrap())
        .collect();

        assert_eq!(costs, vec![dec!(2.5), dec!(0), dec!(0), dec!(60)]);

        let totals = processor.summarize().totals;
        assert_eq!(totals.national_secs, 100);
        assert_eq!(totals.international_secs, 100);
        assert_eq!(totals.friends_secs, 80);
    }

    #[test]
    fn test_skips_other_owner() {
        let s = subscriber();
        let mut processor = CallProcessor::new(&s, period(), friends_only());

        let foreign = Call::new("+1991111111112", "+5491111111119", 60, in_period()).unwrap();
        assert_eq!(
            processor.process(&foreign),
            ProcessOutcome::Skipped(SkipReason::NotOwner)
        );
        assert_eq!(processor.summarize().total_amount, Decimal::ZERO);
        assert_eq!(processor.summarize().totals, CallTotals::default());
    }

    #[test]
    fn test_skips_outside_period_and_edges() {
        let s = subscriber();
        let p = period();
        let mut processor = CallProcessor::new(&s, p, friends_only());

        for at in [
            p.start(),
            p.end(),
            Utc.with_ymd_and_hms(2023, 9, 5, 20, 52, 44).unwrap(),
        ] {
            let c = Call::new("+1991111111112", OWNER, 60, at).unwrap();
            assert_eq!(
                processor.process(&c),
                ProcessOutcome::Skipped(SkipReason::OutsidePeriod)
            );
        }

        let just_inside = Call::new("+1991111111112", OWNER, 60, p.end() - Duration::seconds(1)).unwrap();
        assert!(!processor.process(&just_inside).is_skipped());
    }

    #[test]
    fn test_skipped_friend_calls_do_not_use_free_calls() {
        let s = subscriber();
        let mut processor = CallProcessor::new(&s, period(), vec![Box::new(FreeFriendCalls::new(1))]);

        let outside = Call::new(NATIONAL_FRIEND, OWNER, 60, period().end()).unwrap();
        assert!(processor.process(&outside).is_skipped());
        assert_eq!(processor.process(&call(NATIONAL_FRIEND, 60)).cost(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_first_matching_promotion_wins() {
        let s = subscriber().with_friends(["+6091111111112"]);
        let mut processor = CallProcessor::new(
            &s,
            period(),
            vec![
                Box::new(FreeFriendCalls::new(1)),
                Box::new(MercosurDiscount::new(["60"], 50)),
            ],
        );

        // Free while the friend counter lasts, then half price
        assert_eq!(processor.process(&call("+6091111111112", 80)).cost(), Some(dec!(0)));
        assert_eq!(processor.process(&call("+6091111111112", 80)).cost(), Some(dec!(40)));
    }

    #[test]
    fn test_interplanetary_totals() {
        let s = subscriber();
        let mut processor = CallProcessor::new(&s, period(), friends_only());

        assert_eq!(processor.process(&call("+0491111111112", 3)).cost(), Some(dec!(30)));
        assert_eq!(processor.summarize().totals.interplanetary_secs, 3);
    }

    #[test]
    fn test_summarize_mid_stream_keeps_state() {
        let s = subscriber();
        let mut processor = CallProcessor::new(&s, period(), friends_only());

        processor.process(&call("+1991111111112", 10));
        let first = processor.summarize();
        let again = processor.summarize();
        assert_eq!(first, again);

        processor.process(&call("+1991111111112", 5));
        assert_eq!(processor.summarize().total_amount, dec!(15));
    }

    #[test]
    fn test_call_order_moves_the_charged_friend_call() {
        let s = subscriber();
        let calls: Vec<Call> = (1..=11).map(|i| call(NATIONAL_FRIEND, i * 10)).collect();
        let mut reversed = calls.clone();
        reversed.reverse();

        // Cost of each call keyed by its duration, which is unique here
        let run = |calls: &[Call]| {
            let mut processor = CallProcessor::new(&s, period(), friends_only());
            let mut costs: Vec<(u32, Decimal)> = calls
                .iter()
                .map(|c| (c.duration_secs(), processor.process(c).cost().unwrap()))
                .collect();
            costs.sort_by_key(|(duration, _)| *duration);
            (costs, processor.summarize())
        };

        let (costs, summary) = run(&calls);
        let (reversed_costs, reversed_summary) = run(&reversed);

        assert_ne!(costs, reversed_costs);
        assert_eq!(costs[10], (110, dec!(2.5)));
        assert_eq!(reversed_costs[0], (10, dec!(2.5)));
        assert_eq!(summary.total_amount, reversed_summary.total_amount);
        assert_eq!(summary.totals, reversed_summary.totals);
    }

    proptest! {
        #[test]
        fn prop_flat_friend_total_is_order_independent(
            durations in proptest::collection::vec(1u32..600, 11..30),
            seed in any::<u64>(),
        ) {
            let s = subscriber();
            let calls: Vec<Call> = durations.iter().map(|d| call(NATIONAL_FRIEND, *d)).collect();

            let mut rotated = calls.clone();
            let shift = (seed as usize) % rotated.len();
            rotated.rotate_left(shift);
            rotated.reverse();

            let run = |calls: &[Call]| {
                let mut processor = CallProcessor::new(&s, period(), friends_only());
                let costs: Vec<Decimal> = calls.iter().map(|c| processor.process(c).cost().unwrap()).collect();
                (costs, processor.summarize())
            };

            let (costs, summary) = run(&calls);
            let (_, rotated_summary) = run(&rotated);

            // Which calls are free depends on order, the total does not
            prop_assert_eq!(costs.iter().filter(|c| c.is_zero()).count(), 10);
            prop_assert_eq!(summary.total_amount, rotated_summary.total_amount);
            prop_assert_eq!(summary.totals, rotated_summary.totals);
        }
    }
}
