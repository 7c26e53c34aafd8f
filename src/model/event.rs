use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

/// Start or end of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventTime {
    /// All-day event on this date.
    Date(NaiveDate),
    Instant(DateTime<FixedOffset>),
}

/// A game ready to be written to a team calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    /// "<league> - <team> - game <n>"
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    pub is_all_day: bool,
    /// When the calendar was generated.
    pub stamp: DateTime<FixedOffset>,
}
