//! Calendar-month deadline arithmetic and due-state classification.
//!
//! Shared by every periodically recurring obligation (medical examinations,
//! equipment maintenance, issued-equipment replacement). The warning window
//! is caller-configurable because different record kinds warn at different
//! horizons.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Add `months` calendar months, clamping the day-of-month to the last valid
/// day of the target month (Jan 31 + 1 month = Feb 28/29).
pub fn add_calendar_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Due-state of a deadline relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Overdue,
    DueSoon,
    Normal,
    Unscheduled,
}

/// Classify a due date against `today` with a warning window in days.
///
/// `DueSoon` covers the inclusive range `[today, today + warning_window_days]`;
/// anything earlier is `Overdue`, anything later is `Normal`, and a missing
/// date is `Unscheduled`.
pub fn classify(
    next_due: Option<NaiveDate>,
    today: NaiveDate,
    warning_window_days: u32,
) -> DeadlineStatus {
    let Some(due) = next_due else {
        return DeadlineStatus::Unscheduled;
    };

    if due < today {
        return DeadlineStatus::Overdue;
    }

    let horizon = today
        .checked_add_days(Days::new(u64::from(warning_window_days)))
        .unwrap_or(NaiveDate::MAX);
    if due <= horizon {
        DeadlineStatus::DueSoon
    } else {
        DeadlineStatus::Normal
    }
}

/// A recurring obligation: the last completed event and its period.
///
/// `next_due` only ever moves by recording an event; nothing recomputes it
/// behind the caller's back. A period of 0 months means the obligation is
/// untracked ("until worn out") and never produces a due date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineRecord {
    pub last_event: Option<NaiveDate>,
    pub period_months: u32,
    pub next_due: Option<NaiveDate>,
}

impl DeadlineRecord {
    pub fn new(period_months: u32) -> Self {
        Self {
            period_months,
            ..Default::default()
        }
    }

    /// Record a completed event and recompute the next due date.
    pub fn record_event(&mut self, date: NaiveDate) {
        self.last_event = Some(date);
        self.next_due =
            (self.period_months > 0).then(|| add_calendar_months(date, self.period_months));
    }

    pub fn status(&self, today: NaiveDate, warning_window_days: u32) -> DeadlineStatus {
        classify(self.next_due, today, warning_window_days)
    }

    /// Signed days until the due date; negative when overdue, `None` when
    /// unscheduled.
    pub fn days_until(&self, today: NaiveDate) -> Option<i64> {
        self.next_due.map(|due| (due - today).num_days())
    }

    /// Days past the due date, 0 when not overdue or unscheduled.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        self.days_until(today).map_or(0, |d| (-d).max(0))
    }
}
