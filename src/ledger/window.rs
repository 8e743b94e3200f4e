//! Aggregation windows and their boundaries

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::Serialize;
use strum::{EnumIter, EnumString};

/// A reporting window, from the start of the current local period through now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Today,
    Week,
    Month,
    Year,
}

impl Window {
    /// Heading used in replies
    pub fn title(&self) -> &'static str {
        match self {
            Window::Today => "Today",
            Window::Week => "This Week",
            Window::Month => "This Month",
            Window::Year => "This Year",
        }
    }

    /// First local day of the window containing `date`
    pub fn start_date(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Window::Today => date,
            Window::Week => date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday())),
            Window::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date),
            Window::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// UTC bounds `[start, now]` where `start` is local midnight of the
    /// window's first day in `offset`.
    pub fn bounds(&self, now: DateTime<Utc>, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
        let local_date = now.with_timezone(&offset).date_naive();
        let start_local = NaiveDateTime::new(self.start_date(local_date), NaiveTime::MIN);
        let start = (start_local - TimeDelta::seconds(i64::from(offset.local_minus_utc()))).and_utc();
        (start, now)
    }
}
