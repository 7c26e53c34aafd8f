use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{error, info, instrument, warn};

use crate::config::CrawlConfig;
use crate::error::{Error, Result};
use crate::model::{CrawlFailure, CrawlReport, CrawlRequest, Stage};
use crate::scraper;

/// What handling one request produced.
#[derive(Debug)]
enum StageOutput {
    /// Pages for the next stage.
    Enqueue(Vec<CrawlRequest>),
    /// A team calendar was written.
    Written(PathBuf),
}

/// Crawls a league site and writes one calendar per team.
///
/// `LeagueCrawler` owns the request queue. It starts from the league list,
/// follows every league to its standings and every team to its schedule.
/// A failed league or team is logged and skipped; only an unreachable
/// league list fails the run.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> league_calendars::Result<()> {
/// use league_calendars::{CrawlConfig, LeagueCrawler};
///
/// let crawler = LeagueCrawler::new(CrawlConfig::default())?;
/// let report = crawler.run().await?;
/// println!("Wrote {} calendars", report.calendars.len());
/// # Ok(())
/// # }
/// ```
pub struct LeagueCrawler {
    http: reqwest::Client,
    config: CrawlConfig,
}

impl LeagueCrawler {
    /// Create a crawler with an HTTP client built from `config`.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Http {
                url: config.base_url.clone(),
                source: e,
            })?;
        Ok(Self { http, config })
    }

    /// Create a crawler using the provided [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: CrawlConfig) -> Self {
        Self {
            http: client,
            config,
        }
    }

    /// Crawl everything reachable from the league list.
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    pub async fn run(&self) -> Result<CrawlReport> {
        let mut queue = VecDeque::from([CrawlRequest::league_list(self.config.start_url()?)]);
        let mut in_flight = FuturesUnordered::new();
        let mut report = CrawlReport::default();
        let limit = self.config.concurrency.max(1);

        loop {
            while in_flight.len() < limit {
                let Some(request) = queue.pop_front() else {
                    break;
                };
                in_flight.push(async move {
                    let output = self.dispatch(&request).await;
                    (request, output)
                });
            }

            let Some((request, output)) = in_flight.next().await else {
                break;
            };
            match output {
                Ok(StageOutput::Enqueue(requests)) => queue.extend(requests),
                Ok(StageOutput::Written(path)) => report.calendars.push(path),
                Err(e) if request.stage == Stage::LeagueList => {
                    error!(url = %request.url, error = %e, "league list unavailable");
                    return Err(e);
                }
                Err(e) => {
                    log_failure(&request, &e);
                    report.failures.push(CrawlFailure {
                        request,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            calendars = report.calendars.len(),
            failures = report.failures.len(),
            "crawl finished"
        );
        Ok(report)
    }

    /// Run the stage a request is tagged with.
    async fn dispatch(&self, request: &CrawlRequest) -> Result<StageOutput> {
        self.config.check_allowed(&request.url)?;
        match &request.stage {
            Stage::LeagueList => {
                scraper::leagues::get_leagues(&self.http, &self.config, &request.url)
                    .await
                    .map(StageOutput::Enqueue)
            }
            Stage::TeamStandings(league) => {
                scraper::standings::get_standings(&self.http, &self.config, league)
                    .await
                    .map(StageOutput::Enqueue)
            }
            Stage::TeamSchedule(team) => {
                scraper::schedule::get_schedule(&self.http, &self.config, team)
                    .await
                    .map(StageOutput::Written)
            }
        }
    }
}

fn log_failure(request: &CrawlRequest, e: &Error) {
    match &request.stage {
        Stage::LeagueList => warn!(url = %request.url, error = %e, "skipping league list"),
        Stage::TeamStandings(league) => warn!(
            sport = %league.sport,
            league = %league.name,
            url = %request.url,
            error = %e,
            "skipping league"
        ),
        Stage::TeamSchedule(team) => warn!(
            sport = %team.sport,
            league = %team.league,
            team = %team.name,
            url = %request.url,
            error = %e,
            "no calendar written for team"
        ),
    }
}
