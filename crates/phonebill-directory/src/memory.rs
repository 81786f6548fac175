//! In-memory subscriber directory

use async_trait::async_trait;
use phonebill_core::models::{PhoneNumber, Subscriber};
use phonebill_core::traits::SubscriberFinder;
use phonebill_core::{InvoiceError, InvoiceResult};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Fixed set of subscribers keyed by phone number
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    subscribers: HashMap<PhoneNumber, Subscriber>,
}

impl InMemoryDirectory {
    pub fn new<I>(subscribers: I) -> Self
    where
        I: IntoIterator<Item = Subscriber>,
    {
        Self {
            subscribers: subscribers
                .into_iter()
                .map(|s| (s.phone.clone(), s))
                .collect(),
        }
    }

    /// Parse a JSON array of subscribers
    pub fn from_json(content: &str) -> InvoiceResult<Self> {
        let subscribers: Vec<Subscriber> = serde_json::from_str(content)?;
        Ok(Self::new(subscribers))
    }

    /// Load subscribers from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> InvoiceResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let directory = Self::from_json(&content)?;
        info!(
            "Loaded {} subscribers from {}",
            directory.len(),
            path.as_ref().display()
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[async_trait]
impl SubscriberFinder for InMemoryDirectory {
    async fn find_by_phone(&self, phone: &PhoneNumber) -> InvoiceResult<Subscriber> {
        self.subscribers
            .get(phone)
            .cloned()
            .ok_or_else(|| InvoiceError::SubscriberNotFound(phone.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_phone() {
        let directory = InMemoryDirectory::from_json(
            r#"[
                {"name": "Hideo Kojima", "address": "Calle Falsa 123",
                 "phone_number": "+5491167950940", "friends": ["+541167980953"]},
                {"name": "Antonio Banderas", "address": "Calle Falsa 123",
                 "phone_number": "+5491111111111"}
            ]"#,
        )
        .unwrap();
        assert_eq!(directory.len(), 2);

        let found = directory
            .find_by_phone(&PhoneNumber::parse("+5491167950940").unwrap())
            .await
            .unwrap();
        assert_eq!(found.name, "Hideo Kojima");
        assert!(found.friends.contains("+541167980953"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let directory = InMemoryDirectory::default();
        let err = directory
            .find_by_phone(&PhoneNumber::parse("+5491167950941").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "subscriber not found: +5491167950941");
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(matches!(
            InMemoryDirectory::from_json(r#"[{"name": "A"}]"#),
            Err(InvoiceError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            InMemoryDirectory::from_file("/nonexistent/subscribers.json"),
            Err(InvoiceError::Io(_))
        ));
    }
}
