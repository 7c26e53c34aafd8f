use std::path::PathBuf;

use serde::Serialize;

use super::{LeagueRef, TeamRef};

/// What a fetched page is, along with the context collected on the way to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Stage {
    LeagueList,
    TeamStandings(LeagueRef),
    TeamSchedule(TeamRef),
}

/// One page to fetch and the stage that handles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlRequest {
    pub url: String,
    pub stage: Stage,
}

impl CrawlRequest {
    pub fn league_list(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            stage: Stage::LeagueList,
        }
    }

    pub fn standings(league: LeagueRef) -> Self {
        Self {
            url: league.url.clone(),
            stage: Stage::TeamStandings(league),
        }
    }

    pub fn schedule(team: TeamRef) -> Self {
        Self {
            url: team.url.clone(),
            stage: Stage::TeamSchedule(team),
        }
    }
}

/// A request that was skipped, and why.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlFailure {
    pub request: CrawlRequest,
    pub error: String,
}

/// Outcome of a full crawl.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    /// Calendar files written, in completion order.
    pub calendars: Vec<PathBuf>,
    pub failures: Vec<CrawlFailure>,
}
