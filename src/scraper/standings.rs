use ::scraper::ElementRef;
use tracing::{debug, instrument, warn};

use crate::config::CrawlConfig;
use crate::error::{Error, Result};
use crate::model::{CrawlRequest, LeagueRef, TeamRef};
use crate::scraper::{self, cells, descendant_texts, link_href, Html};

const STANDINGS_GRID: &str = "ctl00_C_Standings_GridView1";

/// Fetch a league's standings and queue one schedule request per team.
#[instrument(
    skip(client, config, league),
    fields(sport = %league.sport, league = %league.name)
)]
pub(crate) async fn get_standings(
    client: &reqwest::Client,
    config: &CrawlConfig,
    league: &LeagueRef,
) -> Result<Vec<CrawlRequest>> {
    let document = scraper::get_document(client, &league.url, config).await?;
    let teams = parse_standings(&document, league, config)?;
    debug!(count = teams.len(), "parsed standings");
    Ok(teams.into_iter().map(CrawlRequest::schedule).collect())
}

/// Teams in standings order. A team's place is its row position in the grid,
/// whatever rank the page itself prints.
pub fn parse_standings(
    document: &Html,
    league: &LeagueRef,
    config: &CrawlConfig,
) -> Result<Vec<TeamRef>> {
    let mut teams = vec![];
    let rows = scraper::grid_rows(document, STANDINGS_GRID)?;
    for (index, row) in rows.iter().enumerate() {
        let place = index as u32 + 1;
        match parse_team_row(row, league, place, config) {
            Ok(team) => teams.push(team),
            Err(e) => warn!(place, error = %e, "skipping unparsable standings row"),
        }
    }
    Ok(teams)
}

fn parse_team_row(
    row: &ElementRef,
    league: &LeagueRef,
    standing_place: u32,
    config: &CrawlConfig,
) -> Result<TeamRef> {
    let cols = cells(row);

    let team_col = cols.first().ok_or(Error::MissingField {
        field: "team",
        column: 1,
    })?;
    let name = descendant_texts(team_col)
        .into_iter()
        .next()
        .ok_or(Error::MissingField {
            field: "team name",
            column: 1,
        })?;
    let href = link_href(team_col)?.ok_or(Error::MissingField {
        field: "team link",
        column: 1,
    })?;

    let wins = cols
        .get(2)
        .and_then(|td| descendant_texts(td).into_iter().next())
        .unwrap_or_else(|| "0".to_string());

    Ok(TeamRef {
        sport: league.sport.clone(),
        league: league.name.clone(),
        name,
        url: config.resolve(&href)?,
        standing_place,
        wins,
    })
}
