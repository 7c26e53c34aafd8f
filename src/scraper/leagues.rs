use ::scraper::ElementRef;
use strum::IntoEnumIterator;
use tracing::{debug, instrument, warn};

use crate::config::CrawlConfig;
use crate::error::{Error, Result};
use crate::model::{CrawlRequest, LeagueRef, LeagueStatus};
use crate::scraper::{self, cells, child_texts, link_href, own_texts, Html};

/// Fetch the league list and queue one standings request per league.
#[instrument(skip(client, config))]
pub(crate) async fn get_leagues(
    client: &reqwest::Client,
    config: &CrawlConfig,
    url: &str,
) -> Result<Vec<CrawlRequest>> {
    let document = scraper::get_document(client, url, config).await?;
    let leagues = parse_leagues(&document, config)?;
    debug!(count = leagues.len(), "parsed league list");
    Ok(leagues.into_iter().map(CrawlRequest::standings).collect())
}

/// Leagues from the "Current" grid followed by the "Upcoming" grid.
pub fn parse_leagues(document: &Html, config: &CrawlConfig) -> Result<Vec<LeagueRef>> {
    let mut leagues = vec![];
    for status in LeagueStatus::iter() {
        let grid_id = format!("ctl00_C_grid{status}");
        for row in scraper::grid_rows(document, &grid_id)? {
            match parse_league_row(&row, config) {
                Ok(league) => leagues.push(league),
                Err(e) => warn!(%status, error = %e, "skipping unparsable league row"),
            }
        }
    }
    Ok(leagues)
}

fn parse_league_row(row: &ElementRef, config: &CrawlConfig) -> Result<LeagueRef> {
    let cols = cells(row);

    let sport = cols
        .first()
        .and_then(|td| own_texts(td).into_iter().next())
        .ok_or(Error::MissingField {
            field: "sport",
            column: 1,
        })?;

    let league_col = cols.get(1).ok_or(Error::MissingField {
        field: "league",
        column: 2,
    })?;
    let link = ::scraper::Selector::parse("a")?;
    let name = child_texts(league_col, &link)
        .into_iter()
        .next()
        .ok_or(Error::MissingField {
            field: "league name",
            column: 2,
        })?;
    let href = link_href(league_col)?.ok_or(Error::MissingField {
        field: "league link",
        column: 2,
    })?;

    Ok(LeagueRef {
        sport,
        name,
        url: config.resolve(&href)?,
    })
}
