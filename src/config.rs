use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDateTime, Offset, TimeDelta, Utc};
use reqwest::Url;

use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "http://nyc-social.ezleagues.ezfacility.com/";

/// Everything a crawl needs to know, handed to [`crate::LeagueCrawler`] once.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Site root; relative links on every page are resolved against it.
    pub base_url: String,
    /// Path of the league list page, relative to `base_url`.
    pub start_path: String,
    /// Hosts the crawler may fetch from. Empty means "the host of `base_url`".
    pub allowed_domains: Vec<String>,
    /// Root directory for `<sport>/<league>/<team>.<ext>` files.
    pub output_root: PathBuf,
    pub calendar_extension: String,
    /// TZID written to the calendar.
    pub timezone_name: String,
    /// Fixed offset applied to every game time, no daylight saving.
    pub utc_offset_minutes: i32,
    pub game_duration_minutes: i64,
    /// Games further in the past than this are moved into next year.
    pub past_window_days: i64,
    /// Maximum number of fetches in flight.
    pub concurrency: usize,
    pub timeout_secs: u64,
    /// Extra attempts after a failed fetch.
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub user_agent: String,
    /// Pins "now" (site local time) for reproducible output.
    pub reference_time: Option<NaiveDateTime>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start_path: "leagues.aspx".to_string(),
            allowed_domains: Vec::new(),
            output_root: PathBuf::from("schedules"),
            calendar_extension: "ics".to_string(),
            timezone_name: "America/New_York".to_string(),
            utc_offset_minutes: -5 * 60,
            game_duration_minutes: 30,
            past_window_days: 120,
            concurrency: 4,
            timeout_secs: 30,
            max_retries: 2,
            retry_delay_ms: 500,
            user_agent: concat!("league-calendars/", env!("CARGO_PKG_VERSION")).to_string(),
            reference_time: None,
        }
    }
}

impl CrawlConfig {
    /// Parsed `base_url`.
    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(|e| Error::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Absolute URL of the league list page.
    pub fn start_url(&self) -> Result<String> {
        self.resolve(&self.start_path)
    }

    /// Resolve a link scraped from a page against `base_url`.
    pub fn resolve(&self, href: &str) -> Result<String> {
        self.base()?
            .join(href.trim())
            .map(String::from)
            .map_err(|e| Error::InvalidUrl {
                url: href.to_string(),
                reason: e.to_string(),
            })
    }

    /// Reject URLs whose host is not one of the allowed domains.
    pub fn check_allowed(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let host = parsed.host_str().unwrap_or_default();
        let allowed = if self.allowed_domains.is_empty() {
            self.base()?.host_str() == Some(host)
        } else {
            self.allowed_domains
                .iter()
                .any(|d| host == d || host.ends_with(&format!(".{d}")))
        };
        if allowed {
            Ok(())
        } else {
            Err(Error::OffsiteUrl {
                url: url.to_string(),
            })
        }
    }

    /// The site's fixed UTC offset. Out of range values fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn game_duration(&self) -> TimeDelta {
        TimeDelta::minutes(self.game_duration_minutes)
    }

    /// "Now" as seen by the site, unless pinned by `reference_time`.
    pub fn now(&self) -> NaiveDateTime {
        self.reference_time
            .unwrap_or_else(|| Utc::now().with_timezone(&self.offset()).naive_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_config_default() {
        let config = CrawlConfig::default();
        assert_eq!(config.start_path, "leagues.aspx");
        assert_eq!(config.past_window_days, 120);
        assert_eq!(config.game_duration_minutes, 30);
        assert_eq!(config.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_start_url() {
        let config = CrawlConfig::default();
        assert_eq!(
            config.start_url().unwrap(),
            "http://nyc-social.ezleagues.ezfacility.com/leagues.aspx"
        );
    }

    #[test]
    fn test_resolve_parent_segments() {
        let config = CrawlConfig::default();
        assert_eq!(
            config.resolve("../../teams/42/Kickers.aspx").unwrap(),
            "http://nyc-social.ezleagues.ezfacility.com/teams/42/Kickers.aspx"
        );
    }

    #[test]
    fn test_check_allowed() {
        let config = CrawlConfig::default();
        assert!(config
            .check_allowed("http://nyc-social.ezleagues.ezfacility.com/x.aspx")
            .is_ok());
        let err = config.check_allowed("http://evil.example.com/").unwrap_err();
        assert!(matches!(err, Error::OffsiteUrl { .. }));

        let config = CrawlConfig {
            allowed_domains: vec!["ezfacility.com".to_string()],
            ..CrawlConfig::default()
        };
        assert!(config
            .check_allowed("http://other.ezleagues.ezfacility.com/")
            .is_ok());
    }

    #[test]
    fn test_pinned_now() {
        let pinned = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let config = CrawlConfig {
            reference_time: Some(pinned),
            ..CrawlConfig::default()
        };
        assert_eq!(config.now(), pinned);
    }
}
