//! Canonical day keys in the fixed service timezone.
//!
//! Save validity and reward-date comparison both go through [`DayKey`], so
//! the two can never drift apart.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::SERVICE_UTC_OFFSET_HOURS;

/// Calendar date string (`YYYY-MM-DD`) in the service timezone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid day key: {0:?}")]
pub struct ParseDayKeyError(String);

impl DayKey {
    /// Today's day key in the service timezone.
    #[must_use]
    pub fn today() -> Self {
        let shifted = Utc::now() + Duration::hours(SERVICE_UTC_OFFSET_HOURS);
        Self(shifted.format("%Y-%m-%d").to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DayKey {
    type Err = ParseDayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|_| Self(s.to_string()))
            .map_err(|_| ParseDayKeyError(s.to_string()))
    }
}
