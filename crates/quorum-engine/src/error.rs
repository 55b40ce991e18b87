//! Error types for availability resolution.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Calendar source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Unknown attendee: {0}")]
    UnknownAttendee(String),

    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
