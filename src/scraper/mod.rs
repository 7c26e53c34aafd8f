//! Fetching pages and pulling table rows out of them.

pub mod leagues;
pub mod schedule;
pub mod standings;

use std::time::Duration;

pub(crate) use ::scraper::Html;
use ::scraper::{ElementRef, Selector};
use itertools::Itertools;
use tracing::{debug, warn};

use crate::config::CrawlConfig;
use crate::error::{Error, Result};

/// Fetch a URL and parse the response body as an HTML document.
///
/// Network errors, 5xx, 408 and 429 responses are retried up to
/// `config.max_retries` times with a linearly growing delay.
pub(crate) async fn get_document(
    client: &reqwest::Client,
    url: &str,
    config: &CrawlConfig,
) -> Result<Html> {
    let mut attempt = 0;
    loop {
        match fetch_body(client, url).await {
            Ok(body) => return Ok(Html::parse_document(&body)),
            Err(e) if attempt < config.max_retries && is_retryable(&e) => {
                attempt += 1;
                warn!(url, attempt, max = config.max_retries, error = %e, "retrying fetch");
                let delay = config.retry_delay_ms * u64::from(attempt);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn fetch_body(client: &reqwest::Client, url: &str) -> Result<String> {
    debug!(url, "fetching page");

    let response = client.get(url).send().await.map_err(|e| Error::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    response.text().await.map_err(|e| Error::ResponseBody {
        url: url.to_owned(),
        source: e,
    })
}

fn is_retryable(error: &Error) -> bool {
    match error {
        Error::Http { .. } | Error::ResponseBody { .. } => true,
        Error::UnexpectedStatus { status, .. } => {
            status.is_server_error()
                || *status == reqwest::StatusCode::REQUEST_TIMEOUT
                || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
        }
        _ => false,
    }
}

/// Data rows of the grid table with the given element id; the header row is skipped.
pub(crate) fn grid_rows<'a>(document: &'a Html, grid_id: &str) -> Result<Vec<ElementRef<'a>>> {
    let selector = Selector::parse(&format!("#{grid_id} > tbody > tr, #{grid_id} > tr"))?;
    Ok(document.select(&selector).skip(1).collect_vec())
}

/// The `td` children of a row, in column order.
pub(crate) fn cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "td")
        .collect_vec()
}

/// Text nodes directly under `element`, trimmed, blank ones dropped.
pub(crate) fn own_texts(element: &ElementRef) -> Vec<String> {
    element
        .children()
        .filter_map(|n| n.value().as_text().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .collect_vec()
}

/// Text nodes whose parent is an element below `element`, in document order.
pub(crate) fn descendant_texts(element: &ElementRef) -> Vec<String> {
    element
        .descendants()
        .filter(|n| n.parent().is_some_and(|p| p.id() != element.id()))
        .filter_map(|n| n.value().as_text().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .collect_vec()
}

/// `own_texts` of every `child` element below `element`.
pub(crate) fn child_texts(element: &ElementRef, child: &Selector) -> Vec<String> {
    element.select(child).flat_map(|c| own_texts(&c)).collect_vec()
}

/// `descendant_texts` of every `child` element below `element`.
pub(crate) fn child_descendant_texts(element: &ElementRef, child: &Selector) -> Vec<String> {
    element
        .select(child)
        .flat_map(|c| descendant_texts(&c))
        .collect_vec()
}

/// First `href` of an `a` below `element`.
pub(crate) fn link_href(element: &ElementRef) -> Result<Option<String>> {
    let selector = Selector::parse("a[href]")?;
    Ok(element
        .select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string()))
}
