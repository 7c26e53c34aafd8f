use chrono::{FixedOffset, Utc};
use icalendar::{Calendar, Component, DatePerhapsTime, EventLike};

use crate::model::{CalendarEvent, EventTime};

/// Calendar-wide metadata written next to the events.
#[derive(Debug, Clone)]
pub struct CalendarMeta<'a> {
    pub title: &'a str,
    /// Replaces the library's default PRODID.
    pub prod_id: &'a str,
    pub timezone_name: &'a str,
    pub offset: FixedOffset,
}

impl From<EventTime> for DatePerhapsTime {
    fn from(time: EventTime) -> Self {
        match time {
            EventTime::Date(date) => date.into(),
            EventTime::Instant(instant) => instant.with_timezone(&Utc).into(),
        }
    }
}

/// Serialize a team's events as an iCalendar document.
pub fn encode(events: &[CalendarEvent], meta: &CalendarMeta) -> String {
    let mut calendar = Calendar::new();
    calendar.name(meta.title).timezone(meta.timezone_name);

    for event in events {
        calendar.push(
            icalendar::Event::new()
                .uid(&event.uid)
                .summary(&event.summary)
                .description(&event.description)
                .starts(event.start)
                .ends(event.end)
                .timestamp(event.stamp.with_timezone(&Utc))
                .done(),
        );
    }

    let mut ics = with_prod_id(&calendar.done().to_string(), meta.prod_id);

    // The library has no VTIMEZONE builder; insert ours before the closing line.
    let vtimezone = vtimezone(meta.timezone_name, meta.offset);
    match ics.rfind("END:VCALENDAR") {
        Some(idx) => ics.insert_str(idx, &vtimezone),
        None => ics.push_str(&vtimezone),
    }
    ics
}

/// Swap whatever PRODID the library wrote for ours, right after BEGIN:VCALENDAR.
fn with_prod_id(ics: &str, prod_id: &str) -> String {
    let mut out = String::with_capacity(ics.len() + prod_id.len());
    for line in ics.split_inclusive("\r\n") {
        if line.starts_with("PRODID:") {
            continue;
        }
        out.push_str(line);
        if line.trim_end() == "BEGIN:VCALENDAR" {
            out.push_str(&format!("PRODID:{prod_id}\r\n"));
        }
    }
    out
}

fn vtimezone(tzid: &str, offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    let utc_offset = format!("{sign}{:02}{:02}", minutes / 60, minutes % 60);
    [
        "BEGIN:VTIMEZONE".to_string(),
        format!("TZID:{tzid}"),
        "BEGIN:STANDARD".to_string(),
        "DTSTART:19700101T000000".to_string(),
        format!("TZOFFSETFROM:{utc_offset}"),
        format!("TZOFFSETTO:{utc_offset}"),
        "END:STANDARD".to_string(),
        "END:VTIMEZONE".to_string(),
    ]
    .iter()
    .map(|line| format!("{line}\r\n"))
    .collect()
}
