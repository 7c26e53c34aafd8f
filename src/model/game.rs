use serde::Serialize;

/// One row of a team's schedule grid, as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    /// e.g. "Sat-Jan 05"
    pub date_text: String,
    pub home_raw: String,
    pub away_raw: String,
    /// Empty for games not played yet, "3 - 1" for results, free text otherwise.
    pub score_raw: String,
    /// "7:30 PM" or a status marker such as "Final".
    pub time_text: String,
}

impl GameRecord {
    /// The "Mon DD" part of `date_text`, without the weekday prefix.
    pub fn month_day(&self) -> &str {
        self.date_text
            .split_once('-')
            .map_or(self.date_text.as_str(), |(_, md)| md)
            .trim()
    }

    pub fn home_slim(&self) -> &str {
        slim_name(&self.home_raw)
    }

    pub fn away_slim(&self) -> &str {
        slim_name(&self.away_raw)
    }
}

/// Team name with any "(...)" suffix cut off.
pub fn slim_name(raw: &str) -> &str {
    raw.split('(').next().unwrap_or_default().trim()
}
