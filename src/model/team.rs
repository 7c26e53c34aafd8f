use serde::Serialize;

/// A team row from a league's standings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRef {
    pub sport: String,
    pub league: String,
    pub name: String,
    pub url: String,
    /// 1-based position of the row in the standings grid.
    pub standing_place: u32,
    /// Wins as printed; "0" when the column is empty.
    pub wins: String,
}
