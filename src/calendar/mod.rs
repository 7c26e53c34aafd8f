//! Turning scraped games into calendar files.

mod builder;
mod dates;
mod encode;
mod output;

pub use builder::{describe, ScheduleBuilder};
pub use dates::{DateResolver, ResolvedTime};
pub use encode::{encode, CalendarMeta};
pub use output::{calendar_path, sanitize_component, write_atomic};

use chrono::TimeDelta;

use crate::config::CrawlConfig;

impl From<&CrawlConfig> for DateResolver {
    fn from(config: &CrawlConfig) -> Self {
        DateResolver::new(
            config.offset(),
            TimeDelta::days(config.past_window_days),
            config.game_duration(),
        )
    }
}
