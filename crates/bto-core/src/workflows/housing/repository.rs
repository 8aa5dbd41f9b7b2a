use chrono::{Local, NaiveDate};

use super::domain::{Account, UserId};

/// Lookup of accounts by credential id. Account storage lives outside the core.
pub trait AccountDirectory: Send + Sync {
    fn find(&self, id: &UserId) -> Result<Option<Account>, DirectoryError>;
}

/// Error enumeration for directory failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("account directory unavailable: {0}")]
    Unavailable(String),
}

/// Source of the current date so eligibility and windows stay deterministic in tests.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
