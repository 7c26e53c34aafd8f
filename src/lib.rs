//! Crawl a league website and write one iCalendar file per team.
//!
//! The crawl runs in three stages: the league list, each league's standings
//! page, and each team's schedule page. Schedule rows carry dates without a
//! year and 12-hour times, which [`calendar::DateResolver`] turns into dated
//! events in the site's timezone.

pub use client::LeagueCrawler;
pub use config::CrawlConfig;
pub use error::{Error, Result};
pub use model::*;

pub mod calendar;
mod client;
mod config;
mod error;
pub mod model;
pub mod scraper;
