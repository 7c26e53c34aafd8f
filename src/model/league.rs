use serde::Serialize;

/// Which grid of the league list page a league was listed under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum LeagueStatus {
    Current,
    Upcoming,
}

/// A league found on the league list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueRef {
    pub sport: String,
    pub name: String,
    pub url: String,
}
