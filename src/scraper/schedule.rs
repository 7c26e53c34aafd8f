use std::collections::BTreeMap;
use std::path::PathBuf;

use ::scraper::{ElementRef, Selector};
use tracing::{debug, info, instrument};

use crate::calendar::{self, CalendarMeta, DateResolver, ScheduleBuilder};
use crate::config::CrawlConfig;
use crate::error::{Error, Result};
use crate::model::{GameRecord, TeamRef};
use crate::scraper::{self, cells, child_descendant_texts, child_texts, descendant_texts, Html};

const SCHEDULE_GRID: &str = "ctl00_C_Schedule1_GridView1";

const DATE_COLUMN: usize = 1;
const HOME_COLUMN: usize = 2;
const SCORE_COLUMN: usize = 3;
const AWAY_COLUMN: usize = 4;
const TIME_COLUMN: usize = 5;

/// Text nodes of one schedule row, keyed by 1-based column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFields {
    columns: BTreeMap<usize, Vec<String>>,
}

impl RowFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: usize, texts: Vec<String>) -> &mut Self {
        self.columns.insert(column, texts);
        self
    }

    /// First text node of `column`, if it has any.
    pub fn first(&self, column: usize) -> Option<&str> {
        self.columns
            .get(&column)
            .and_then(|texts| texts.first())
            .map(String::as_str)
    }

    fn require(&self, column: usize, field: &'static str) -> Result<&str> {
        self.first(column).ok_or(Error::MissingField { field, column })
    }

    /// Pick the text nodes each column of the schedule grid holds its value in.
    pub fn from_row(row: &ElementRef) -> Result<Self> {
        let link = Selector::parse("a")?;
        let span = Selector::parse("span")?;
        let cols = cells(row);
        let col = |n: usize| cols.get(n - 1);

        let mut fields = Self::new();
        if let Some(td) = col(DATE_COLUMN) {
            fields.insert(DATE_COLUMN, child_texts(td, &link));
        }
        if let Some(td) = col(HOME_COLUMN) {
            fields.insert(HOME_COLUMN, descendant_texts(td));
        }
        if let Some(td) = col(SCORE_COLUMN) {
            fields.insert(SCORE_COLUMN, child_descendant_texts(td, &span));
        }
        if let Some(td) = col(AWAY_COLUMN) {
            fields.insert(AWAY_COLUMN, descendant_texts(td));
        }
        if let Some(td) = col(TIME_COLUMN) {
            fields.insert(TIME_COLUMN, child_texts(td, &link));
        }
        Ok(fields)
    }
}

/// Turn one row into a game. Every column is required.
///
/// A score containing "v" is the site's "vs" placeholder for a game that has
/// not been played, and is cleared.
pub fn extract_game(fields: &RowFields) -> Result<GameRecord> {
    let date_text = fields.require(DATE_COLUMN, "date")?;
    let home_raw = fields.require(HOME_COLUMN, "home team")?;
    let score_raw = fields.require(SCORE_COLUMN, "score")?;
    let away_raw = fields.require(AWAY_COLUMN, "away team")?;
    let time_text = fields.require(TIME_COLUMN, "time")?;

    let score_raw = if score_raw.contains('v') {
        String::new()
    } else {
        score_raw.to_string()
    };

    Ok(GameRecord {
        date_text: date_text.to_string(),
        home_raw: home_raw.to_string(),
        away_raw: away_raw.to_string(),
        score_raw,
        time_text: time_text.to_string(),
    })
}

/// All games of a schedule page, in page order. One bad row fails the page.
pub fn parse_schedule(document: &Html) -> Result<Vec<GameRecord>> {
    scraper::grid_rows(document, SCHEDULE_GRID)?
        .iter()
        .map(|row| extract_game(&RowFields::from_row(row)?))
        .collect()
}

/// Fetch a team's schedule and write its calendar file.
///
/// Nothing is written unless every game was understood.
#[instrument(
    skip(client, config, team),
    fields(sport = %team.sport, league = %team.league, team = %team.name)
)]
pub(crate) async fn get_schedule(
    client: &reqwest::Client,
    config: &CrawlConfig,
    team: &TeamRef,
) -> Result<PathBuf> {
    let document = scraper::get_document(client, &team.url, config).await?;
    let records = parse_schedule(&document)?;
    debug!(count = records.len(), "parsed schedule");
    write_team_calendar(config, team, &records)
}

/// Build, encode and atomically write one team's calendar.
pub fn write_team_calendar(
    config: &CrawlConfig,
    team: &TeamRef,
    records: &[GameRecord],
) -> Result<PathBuf> {
    let now = config.now();
    let builder = ScheduleBuilder::new(DateResolver::from(config));
    let events = builder.build(team, &team.league, records, now)?;

    let title = format!("{} ({})", team.name, team.league);
    let prod_id = format!(
        "-//Calendar for {}//{}//league-calendars//",
        team.name, team.league
    );
    let ics = calendar::encode(
        &events,
        &CalendarMeta {
            title: &title,
            prod_id: &prod_id,
            timezone_name: &config.timezone_name,
            offset: config.offset(),
        },
    );

    let path = calendar::calendar_path(&config.output_root, team, &config.calendar_extension);
    calendar::write_atomic(&path, ics)?;
    info!(path = %path.display(), games = events.len(), "wrote calendar");
    Ok(path)
}
