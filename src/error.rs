use ::scraper::error::SelectorErrorKind;
use std::path::PathBuf;

/// All errors that can occur while crawling schedules and writing calendars.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A scraped link could not be resolved to an absolute URL.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A link points outside the configured domains.
    #[error("refusing to fetch offsite url {url}")]
    OffsiteUrl { url: String },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// A required table column had no text to extract.
    #[error("missing {field} (column {column})")]
    MissingField { field: &'static str, column: usize },

    /// A month/day string did not look like "Jan 05".
    #[error("failed to parse game date {text:?}: {source}")]
    DateParse {
        text: String,
        source: chrono::ParseError,
    },

    /// A time string did not look like "7:30 PM".
    #[error("failed to parse game time {text:?}: {source}")]
    TimeParse {
        text: String,
        source: chrono::ParseError,
    },

    /// Creating a directory or writing a calendar file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    /// Row content that could not be turned into a game.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            Error::MissingField { .. } | Error::DateParse { .. } | Error::TimeParse { .. }
        )
    }

    /// Network side failures, including links we refuse to follow.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            Error::Http { .. }
                | Error::UnexpectedStatus { .. }
                | Error::ResponseBody { .. }
                | Error::InvalidUrl { .. }
                | Error::OffsiteUrl { .. }
        )
    }
}

impl<'a> From<SelectorErrorKind<'a>> for Error {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        Error::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
