use chrono::NaiveDateTime;
use tracing::debug;

use super::dates::DateResolver;
use crate::error::Result;
use crate::model::{CalendarEvent, GameRecord, TeamRef};

const SCORE_SEPARATOR: &str = " - ";

/// Folds a team's games into calendar events, in schedule order.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleBuilder {
    resolver: DateResolver,
}

impl ScheduleBuilder {
    pub fn new(resolver: DateResolver) -> Self {
        Self { resolver }
    }

    /// Build one event per record. `now` is read once by the caller so every
    /// game of the team resolves its year against the same date.
    ///
    /// Any record that fails to resolve fails the whole schedule.
    pub fn build(
        &self,
        team: &TeamRef,
        league: &str,
        records: &[GameRecord],
        now: NaiveDateTime,
    ) -> Result<Vec<CalendarEvent>> {
        let stamp = self.resolver.localize(now);
        let events = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let year = self.resolver.resolve_year(record.month_day(), now.date())?;
                let time = self
                    .resolver
                    .resolve_instant(record.month_day(), year, &record.time_text)?;
                Ok(CalendarEvent {
                    uid: format!("{league} - {} - game {}", team.name, i + 1),
                    summary: format!("{} v. {}", record.away_slim(), record.home_slim()),
                    description: describe(record),
                    start: time.start,
                    end: time.end,
                    is_all_day: time.is_all_day,
                    stamp,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(team = %team.name, league, count = events.len(), "built schedule");
        Ok(events)
    }
}

/// Event description: both sides, plus the score or status once there is one.
pub fn describe(record: &GameRecord) -> String {
    let (away, home, score) = (&record.away_raw, &record.home_raw, &record.score_raw);
    if score.is_empty() {
        return format!("Away: {away}\nHome: {home}");
    }
    match score.split_once(SCORE_SEPARATOR) {
        Some((home_score, away_score)) => format!(
            "Away: {away} - {}\nHome: {home} - {}\n\nFinal",
            away_score.split(SCORE_SEPARATOR).next().unwrap_or_default(),
            home_score
        ),
        None => format!("Away: {away}\nHome: {home}\n\n{score}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventTime;
    use chrono::{FixedOffset, NaiveDate, TimeDelta};

    fn builder() -> ScheduleBuilder {
        ScheduleBuilder::new(DateResolver::new(
            FixedOffset::west_opt(5 * 3600).unwrap(),
            TimeDelta::days(120),
            TimeDelta::minutes(30),
        ))
    }

    fn team() -> TeamRef {
        TeamRef {
            sport: "Kickball".to_string(),
            league: "Monday Night".to_string(),
            name: "Ball Hogs".to_string(),
            url: "http://example.com/team.aspx".to_string(),
            standing_place: 1,
            wins: "3".to_string(),
        }
    }

    fn game(date: &str, score: &str, time: &str) -> GameRecord {
        GameRecord {
            date_text: date.to_string(),
            home_raw: "Ball Hogs (3-1)".to_string(),
            away_raw: "Kickers (2-2)".to_string(),
            score_raw: score.to_string(),
            time_text: time.to_string(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_describe_unplayed() {
        let text = describe(&game("Mon-Jun 17", "", "7:30 PM"));
        assert_eq!(text, "Away: Kickers (2-2)\nHome: Ball Hogs (3-1)");
        assert!(!text.contains("Final"));
    }

    #[test]
    fn test_describe_final_score() {
        let text = describe(&game("Mon-Jun 10", "3 - 1", "Final"));
        assert_eq!(
            text,
            "Away: Kickers (2-2) - 1\nHome: Ball Hogs (3-1) - 3\n\nFinal"
        );
        assert!(text.ends_with("Final"));
    }

    #[test]
    fn test_describe_status_text() {
        let text = describe(&game("Mon-Jun 10", "Forfeit", "Final"));
        assert_eq!(text, "Away: Kickers (2-2)\nHome: Ball Hogs (3-1)\n\nForfeit");
    }

    #[test]
    fn test_build_uids_follow_input_order() {
        let records = vec![
            game("Mon-Jun 24", "", "7:30 PM"),
            game("Mon-Jun 17", "", "8:00 PM"),
        ];
        let events = builder()
            .build(&team(), "Monday Night", &records, now())
            .unwrap();
        let uids: Vec<_> = events.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(
            uids,
            [
                "Monday Night - Ball Hogs - game 1",
                "Monday Night - Ball Hogs - game 2"
            ]
        );
        assert_eq!(events[0].summary, "Kickers v. Ball Hogs");
    }

    #[test]
    fn test_build_timed_and_all_day() {
        let records = vec![
            game("Mon-Jun 10", "3 - 1", "Final"),
            game("Mon-Jun 17", "", "7:30 PM"),
        ];
        let events = builder()
            .build(&team(), "Monday Night", &records, now())
            .unwrap();

        assert!(events[0].is_all_day);
        assert_eq!(
            events[0].start,
            EventTime::Date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
        );
        assert_eq!(events[0].start, events[0].end);

        assert!(!events[1].is_all_day);
        let (EventTime::Instant(start), EventTime::Instant(end)) = (events[1].start, events[1].end)
        else {
            panic!("expected a timed game");
        };
        assert_eq!(end - start, TimeDelta::minutes(30));
        assert_eq!(events[0].stamp, events[1].stamp);
        assert_eq!(events[0].stamp.naive_local(), now());
    }

    #[test]
    fn test_build_new_year_rollover() {
        let now = NaiveDate::from_ymd_opt(2024, 11, 20)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let records = vec![
            game("Mon-Dec 30", "", "7:00 PM"),
            game("Mon-Jan 06", "", "7:00 PM"),
        ];
        let events = builder()
            .build(&team(), "Monday Night", &records, now)
            .unwrap();
        let EventTime::Instant(second) = events[1].start else {
            panic!("expected a timed game");
        };
        assert_eq!(second.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_build_fails_on_bad_row() {
        let records = vec![
            game("Mon-Jun 17", "", "7:30 PM"),
            game("Mon-Jun 24", "", "7:30 PM"),
            game("Mon-Jnu 99", "", "7:30 PM"),
        ];
        let result = builder().build(&team(), "Monday Night", &records, now());
        assert!(result.unwrap_err().is_extraction());
    }
}
