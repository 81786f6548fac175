//! Billing period model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{InvoiceError, InvoiceResult};

/// Layout for billing period dates on the command line
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether timestamps equal to the period edges belong to the period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodBounds {
    /// start < t < end
    #[default]
    Exclusive,
    /// start <= t <= end
    Inclusive,
}

/// Time window a call must fall in to be billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bounds: PeriodBounds,
}

impl BillingPeriod {
    /// Create an exclusive period. `start` must not be after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> InvoiceResult<Self> {
        if start > end {
            return Err(InvoiceError::InvalidBillingPeriod(format!(
                "start {} is after end {}",
                start, end
            )));
        }

        Ok(Self {
            start,
            end,
            bounds: PeriodBounds::Exclusive,
        })
    }

    /// Build a period from two `YYYY-MM-DD` dates, at midnight UTC
    pub fn from_dates(start: &str, end: &str) -> InvoiceResult<Self> {
        let start = parse_date(start).map_err(|_| {
            InvoiceError::InvalidBillingPeriod("invalid start date format, expected AAAA-MM-DD".to_string())
        })?;
        let end = parse_date(end).map_err(|_| {
            InvoiceError::InvalidBillingPeriod("invalid end date format, expected AAAA-MM-DD".to_string())
        })?;

        Self::new(start, end)
    }

    /// Change the edge policy
    pub fn with_bounds(mut self, bounds: PeriodBounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[inline]
    pub fn bounds(&self) -> PeriodBounds {
        self.bounds
    }

    /// Check whether an instant falls inside the period
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        match self.bounds {
            PeriodBounds::Exclusive => t > self.start && t < self.end,
            PeriodBounds::Inclusive => t >= self.start && t <= self.end,
        }
    }
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::default()).and_utc())
}
