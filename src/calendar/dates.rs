use chrono::{
    DateTime, Datelike, FixedOffset, MappedLocalTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone,
};

use crate::error::{Error, Result};
use crate::model::EventTime;

const MONTH_DAY_YEAR_FORMAT: &str = "%b %d %Y";
const GAME_TIME_FORMAT: &str = "%I:%M %p";

/// Start and end of a game once date and time are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTime {
    pub start: EventTime,
    pub end: EventTime,
    pub is_all_day: bool,
}

/// Turns the site's year-less dates and 12-hour times into calendar times.
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    offset: FixedOffset,
    past_window: TimeDelta,
    duration: TimeDelta,
}

impl DateResolver {
    pub fn new(offset: FixedOffset, past_window: TimeDelta, duration: TimeDelta) -> Self {
        Self {
            offset,
            past_window,
            duration,
        }
    }

    /// Attach the resolver's offset to a site local time.
    pub fn localize(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
        // A fixed offset never has gaps or folds.
        match self.offset.from_local_datetime(&local) {
            MappedLocalTime::Single(dt) | MappedLocalTime::Ambiguous(dt, _) => dt,
            MappedLocalTime::None => self.offset.from_utc_datetime(&(local - self.offset)),
        }
    }

    /// Year for a "Mon DD" date, seen from `now`.
    ///
    /// Schedules never show a year. A date that would lie more than the past
    /// window before `now` belongs to next year (seasons spanning New Year).
    ///
    /// The check compares whole dates: a game exactly the window's length
    /// back stays in this year, whatever the time of day of `now`. Comparing
    /// its midnight against a `now` with a time of day would roll it over.
    pub fn resolve_year(&self, month_day: &str, now: NaiveDate) -> Result<i32> {
        let this_year = parse_month_day(month_day, now.year())?;
        if this_year < now - self.past_window {
            Ok(now.year() + 1)
        } else {
            Ok(now.year())
        }
    }

    /// Start and end for a game on `month_day` of `year`.
    ///
    /// `time_text` without a colon (e.g. "Final") means no time of day, so the
    /// game becomes an all-day event. Otherwise it is a 12-hour clock time in
    /// the resolver's offset and the game lasts the configured duration.
    pub fn resolve_instant(
        &self,
        month_day: &str,
        year: i32,
        time_text: &str,
    ) -> Result<ResolvedTime> {
        let date = parse_month_day(month_day, year)?;

        if !time_text.contains(':') {
            return Ok(ResolvedTime {
                start: EventTime::Date(date),
                end: EventTime::Date(date),
                is_all_day: true,
            });
        }

        let time = parse_time(time_text)?;
        let start = self.localize(date.and_time(time));
        Ok(ResolvedTime {
            start: EventTime::Instant(start),
            end: EventTime::Instant(start + self.duration),
            is_all_day: false,
        })
    }
}

fn parse_month_day(month_day: &str, year: i32) -> Result<NaiveDate> {
    let text = format!("{} {year}", month_day.trim());
    NaiveDate::parse_from_str(&text, MONTH_DAY_YEAR_FORMAT).map_err(|source| Error::DateParse {
        text: month_day.to_string(),
        source,
    })
}

fn parse_time(time_text: &str) -> Result<NaiveTime> {
    let text = time_text.trim().to_uppercase();
    NaiveTime::parse_from_str(&text, GAME_TIME_FORMAT).map_err(|source| Error::TimeParse {
        text: time_text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Timelike};

    fn resolver() -> DateResolver {
        DateResolver::new(
            FixedOffset::west_opt(5 * 3600).unwrap(),
            TimeDelta::days(120),
            TimeDelta::minutes(30),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_year_rolls_over() {
        let year = resolver().resolve_year("Jan 05", date(2024, 6, 15)).unwrap();
        assert_eq!(year, 2025);
    }

    #[test]
    fn test_resolve_year_same_year() {
        let year = resolver().resolve_year("Jun 20", date(2024, 6, 15)).unwrap();
        assert_eq!(year, 2024);
    }

    #[test]
    fn test_resolve_year_window_edge() {
        let now = date(2024, 6, 15);
        // exactly 120 days back stays in this year
        let edge = now - Duration::days(120);
        let edge_text = edge.format("%b %d").to_string();
        assert_eq!(resolver().resolve_year(&edge_text, now).unwrap(), 2024);

        let past = edge - Duration::days(1);
        let past_text = past.format("%b %d").to_string();
        assert_eq!(resolver().resolve_year(&past_text, now).unwrap(), 2025);
    }

    #[test]
    fn test_resolve_year_ignores_time_of_day() {
        // Exactly 120 days before 2024-06-15; a mid-morning "now" keeps it in 2024.
        let now = date(2024, 6, 15).and_hms_opt(10, 0, 0).unwrap();
        assert_eq!(resolver().resolve_year("Feb 16", now.date()).unwrap(), 2024);
        assert_eq!(resolver().resolve_year("Feb 15", now.date()).unwrap(), 2025);
    }

    #[test]
    fn test_resolve_year_never_too_far_back() {
        let resolver = resolver();
        let mut now = date(2023, 1, 1);
        while now < date(2024, 12, 31) {
            for month in ["Jan", "Mar", "May", "Jul", "Sep", "Nov", "Dec"] {
                for day in ["01", "15", "28"] {
                    let md = format!("{month} {day}");
                    let year = resolver.resolve_year(&md, now).unwrap();
                    let resolved = parse_month_day(&md, year).unwrap();
                    assert!(resolved >= now - Duration::days(120), "{md} from {now}");
                }
            }
            now += Duration::days(17);
        }
    }

    #[test]
    fn test_resolve_year_bad_input() {
        let err = resolver().resolve_year("Smarch 13", date(2024, 6, 15)).unwrap_err();
        assert!(matches!(err, Error::DateParse { .. }));
        assert!(resolver().resolve_year("", date(2024, 6, 15)).is_err());
    }

    #[test]
    fn test_resolve_instant_timed() {
        let resolved = resolver().resolve_instant("Jun 20", 2024, "7:30 PM").unwrap();
        assert!(!resolved.is_all_day);
        let (EventTime::Instant(start), EventTime::Instant(end)) = (resolved.start, resolved.end)
        else {
            panic!("expected instants, got {resolved:?}");
        };
        assert_eq!(end - start, Duration::minutes(30));
        assert_eq!(start.hour(), 19);
        assert_eq!(start.minute(), 30);
        assert_eq!(start.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(start.to_rfc3339(), "2024-06-20T19:30:00-05:00");
    }

    #[test]
    fn test_resolve_instant_all_day() {
        let resolved = resolver().resolve_instant("Jun 20", 2024, "Final").unwrap();
        assert!(resolved.is_all_day);
        assert_eq!(resolved.start, resolved.end);
        assert_eq!(resolved.start, EventTime::Date(date(2024, 6, 20)));
    }

    #[test]
    fn test_resolve_instant_bad_time() {
        let err = resolver()
            .resolve_instant("Jun 20", 2024, "7:3x later")
            .unwrap_err();
        assert!(matches!(err, Error::TimeParse { .. }));
    }

    #[test]
    fn test_resolve_instant_morning() {
        let resolved = resolver().resolve_instant("Jun 20", 2024, "09:05 am").unwrap();
        let EventTime::Instant(start) = resolved.start else {
            panic!("expected instant");
        };
        assert_eq!(start.hour(), 9);
        assert_eq!(start.minute(), 5);
    }
}
