//! Subscriber model
//!
//! A telephone line owner as returned by the subscriber directory.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::phone::PhoneNumber;

/// Telephone line subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub name: String,
    pub address: String,

    /// Primary phone number
    #[serde(rename = "phone_number")]
    pub phone: PhoneNumber,

    /// Friend phone numbers, matched exactly against call destinations
    #[serde(default)]
    pub friends: HashSet<String>,
}

impl Subscriber {
    pub fn new(name: &str, address: &str, phone: PhoneNumber) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            phone,
            friends: HashSet::new(),
        }
    }

    /// Add friends to the subscriber
    pub fn with_friends<I, S>(mut self, friends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.friends.extend(friends.into_iter().map(Into::into));
        self
    }
}
