//! Call classification
//!
//! Decides what kind of call a record is from the country codes of both ends
//! and the subscriber's friend list:
//!
//! - same country code -> national
//! - destination code starting with `0` -> interplanetary
//! - anything else -> international
//!
//! A call to a friend wraps its base type instead of replacing it, so its
//! duration is counted both as friends and as its base category.

use phonebill_core::models::Call;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::fmt;

/// Flat cost of a national call
pub const NATIONAL_CALL_COST: Decimal = dec!(2.5);

/// Cost per second of an international call
pub const INTERNATIONAL_COST_PER_SECOND: Decimal = dec!(1);

/// Cost per second of an interplanetary call
pub const INTERPLANETARY_COST_PER_SECOND: Decimal = dec!(10);

/// Base category of a call, used for aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    National,
    International,
    Interplanetary,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::National => write!(f, "national"),
            Category::International => write!(f, "international"),
            Category::Interplanetary => write!(f, "interplanetary"),
        }
    }
}

/// A trait of a call that is orthogonal to its category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Characteristic {
    ToFriend,
    International,
}

/// Knows where each kind of call duration is accumulated
pub trait DurationRegistrar {
    fn register_friend_call(&mut self, duration_secs: u32);
    fn register_national_call(&mut self, duration_secs: u32);
    fn register_international_call(&mut self, duration_secs: u32);
    fn register_interplanetary_call(&mut self, duration_secs: u32);
}

/// Classified call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallType {
    National,
    International { duration_secs: u32 },
    Interplanetary { duration_secs: u32 },
    ToFriend(Box<CallType>),
}

impl CallType {
    /// Cost before any promotion
    pub fn base_cost(&self) -> Decimal {
        match self {
            CallType::National => NATIONAL_CALL_COST,
            CallType::International { duration_secs } => {
                Decimal::from(*duration_secs) * INTERNATIONAL_COST_PER_SECOND
            }
            CallType::Interplanetary { duration_secs } => {
                Decimal::from(*duration_secs) * INTERPLANETARY_COST_PER_SECOND
            }
            CallType::ToFriend(subtype) => subtype.base_cost(),
        }
    }

    /// Hand the duration to every bucket this call counts toward
    pub fn register_duration(&self, duration_secs: u32, registrar: &mut dyn DurationRegistrar) {
        match self {
            CallType::National => registrar.register_national_call(duration_secs),
            CallType::International { .. } => registrar.register_international_call(duration_secs),
            CallType::Interplanetary { .. } => {
                registrar.register_interplanetary_call(duration_secs)
            }
            CallType::ToFriend(subtype) => {
                registrar.register_friend_call(duration_secs);
                subtype.register_duration(duration_secs, registrar);
            }
        }
    }

    pub fn has_characteristic(&self, characteristic: Characteristic) -> bool {
        match (self, characteristic) {
            (CallType::ToFriend(_), Characteristic::ToFriend) => true,
            (CallType::ToFriend(subtype), other) => subtype.has_characteristic(other),
            (CallType::International { .. }, Characteristic::International) => true,
            _ => false,
        }
    }

    /// Base category with any friend wrapper removed
    pub fn category(&self) -> Category {
        match self {
            CallType::National => Category::National,
            CallType::International { .. } => Category::International,
            CallType::Interplanetary { .. } => Category::Interplanetary,
            CallType::ToFriend(subtype) => subtype.category(),
        }
    }

    #[inline]
    pub fn is_to_friend(&self) -> bool {
        self.has_characteristic(Characteristic::ToFriend)
    }
}

/// Classify a call given the subscriber's friend numbers
pub fn classify(call: &Call, friends: &HashSet<String>) -> CallType {
    let base = base_type(call);

    if friends.contains(call.destination().as_str()) {
        CallType::ToFriend(Box::new(base))
    } else {
        base
    }
}

fn base_type(call: &Call) -> CallType {
    let source_country = call.source().country_code();
    let destination_country = call.destination().country_code();

    if source_country == destination_country {
        return CallType::National;
    }

    if destination_country.starts_with('0') {
        return CallType::Interplanetary {
            duration_secs: call.duration_secs(),
        };
    }

    CallType::International {
        duration_secs: call.duration_secs(),
    }
}
