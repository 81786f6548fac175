//! HTTP subscriber directory client
//!
//! Looks subscribers up with `GET {base_url}/users/{phone}`. A successful
//! response body looks like:
//!
//! ```json
//! {
//!     "name": "Hosea Nitzsche",
//!     "address": "77826 Jaime Mews",
//!     "phone_number": "+5491167980952",
//!     "friends": ["+5491167980953", "+191167980953"]
//! }
//! ```

use async_trait::async_trait;
use phonebill_core::config::DirectoryConfig;
use phonebill_core::models::{PhoneNumber, Subscriber};
use phonebill_core::traits::SubscriberFinder;
use phonebill_core::{InvoiceError, InvoiceResult};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Client for the remote subscriber service
pub struct HttpSubscriberDirectory {
    http_client: Client,
    base_url: String,
}

impl HttpSubscriberDirectory {
    /// Create a new directory client
    ///
    /// # Arguments
    ///
    /// * `base_url` - Service root (e.g. "https://interview-brubank-api.herokuapp.com")
    /// * `timeout_secs` - Timeout for each lookup
    pub fn new(base_url: &str, timeout_secs: u64) -> InvoiceResult<Self> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InvoiceError::Directory(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the directory configuration
    pub fn from_config(config: &DirectoryConfig) -> InvoiceResult<Self> {
        Self::new(&config.base_url, config.timeout_secs)
    }

    fn user_url(&self, phone: &PhoneNumber) -> String {
        format!("{}/users/{}", self.base_url, phone)
    }
}

/// Turn a directory response into a subscriber
fn parse_response(status: StatusCode, body: &str, phone: &PhoneNumber) -> InvoiceResult<Subscriber> {
    if status == StatusCode::NOT_FOUND {
        return Err(InvoiceError::SubscriberNotFound(phone.to_string()));
    }

    if status != StatusCode::OK {
        return Err(InvoiceError::Directory(format!(
            "unexpected status code ({}) expected 200 OK",
            status.as_u16()
        )));
    }

    let subscriber: Subscriber = serde_json::from_str(body)
        .map_err(|e| InvoiceError::Directory(format!("parsing body: {}", e)))?;

    if &subscriber.phone != phone {
        return Err(InvoiceError::Directory(format!(
            "asked for {} but got subscriber {}",
            phone, subscriber.phone
        )));
    }

    Ok(subscriber)
}

#[async_trait]
impl SubscriberFinder for HttpSubscriberDirectory {
    #[instrument(skip(self))]
    async fn find_by_phone(&self, phone: &PhoneNumber) -> InvoiceResult<Subscriber> {
        let url = self.user_url(phone);
        debug!("Looking up subscriber at {}", url);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            error!("Subscriber lookup failed: {}", e);
            InvoiceError::Directory(format!("http get: {}", e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InvoiceError::Directory(format!("reading body: {}", e)))?;

        parse_response(status, &body, phone)
    }
}
