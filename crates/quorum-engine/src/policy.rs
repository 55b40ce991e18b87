//! Business-calendar configuration: which days are working days and which
//! hours of those days count as schedulable.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};
use crate::interval::TimeInterval;

/// Immutable business-calendar policy, supplied once per resolution call.
///
/// The timezone interprets the business window for every attendee alike;
/// attendees in different zones are not converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessCalendarPolicy {
    pub business_days: Vec<Weekday>,
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub timezone: Tz,
}

impl Default for BusinessCalendarPolicy {
    fn default() -> Self {
        Self {
            business_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            open: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            timezone: Tz::UTC,
        }
    }
}

impl BusinessCalendarPolicy {
    /// Check that the policy can produce at least one non-empty window.
    ///
    /// # Errors
    /// Returns `ResolveError::InvalidPolicy` if `open >= close` or no business
    /// day is configured.
    pub fn validate(&self) -> Result<()> {
        if self.open >= self.close {
            return Err(ResolveError::InvalidPolicy(format!(
                "business hours open {} must be before close {}",
                self.open, self.close
            )));
        }
        if self.business_days.is_empty() {
            return Err(ResolveError::InvalidPolicy(
                "at least one business day is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        self.business_days.contains(&date.weekday())
    }

    /// The business window `[open, close)` of `date` in the policy timezone,
    /// or `None` if `date` is not a business day.
    pub fn business_window(&self, date: NaiveDate) -> Option<TimeInterval> {
        if !self.is_business_day(date) {
            return None;
        }
        let open = self.local_instant(date.and_time(self.open))?;
        let close = self.local_instant(date.and_time(self.close))?;
        TimeInterval::new(open, close).ok()
    }

    /// The calendar date of `instant` in the policy timezone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// The instants spanning every whole local day from the date of
    /// `range_start` through the date of `range_end`, as `[first midnight,
    /// midnight after the last day)`. `None` for an inverted range.
    pub fn day_bounds(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if range_start > range_end {
            return None;
        }
        let first = self.local_date(range_start);
        let after_last = self.local_date(range_end).succ_opt()?;
        let start = self.local_instant(first.and_time(NaiveTime::default()))?;
        let end = self.local_instant(after_last.and_time(NaiveTime::default()))?;
        Some((start, end))
    }

    /// Map a wall-clock time to an instant. Ambiguous times (DST fall-back)
    /// take the earlier instant; times in a DST gap move forward an hour.
    fn local_instant(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.timezone
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                self.timezone
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
            })
            .map(|dt| dt.with_timezone(&Utc))
    }
}
