use crate::config::SiteConfig;
use crate::error::{EsgError, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::sleep;

/// The two ordered text lists a fund page yields: the sustainability
/// data-point values and the screen-reader descriptions. Order is document
/// order; the category count is located positionally within `dp_values`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawText {
    pub dp_values: Vec<String>,
    pub screen_reader: Vec<String>,
}

pub struct PageSelectors {
    pub error_marker: Selector,
    pub dp_value: Selector,
    pub screen_reader: Selector,
}

impl PageSelectors {
    pub fn new(site: &SiteConfig) -> Result<Self> {
        Ok(Self {
            error_marker: parse_selector(&site.error_selector)?,
            dp_value: parse_selector(&site.dp_value_selector)?,
            screen_reader: parse_selector(&site.screen_reader_selector)?,
        })
    }
}

fn parse_selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| EsgError::Selector(e.to_string()))
}

/// Fetches fund pages over one persistent HTTP session.
pub struct PageFetcher {
    client: Client,
    selectors: PageSelectors,
    render_delay: Duration,
}

impl PageFetcher {
    pub fn new(client: Client, site: &SiteConfig) -> Result<Self> {
        Ok(Self {
            client,
            selectors: PageSelectors::new(site)?,
            render_delay: Duration::from_secs(site.render_delay_secs),
        })
    }

    /// Loads a fund page and returns its two text lists, or `None` for a
    /// not-found placeholder page.
    pub async fn fetch(&self, url: &str) -> Result<Option<RawText>> {
        let body = self.client.get(url).send().await?.text().await?;

        // Fixed wait, standing in for the page's client-side render time.
        sleep(self.render_delay).await;

        let document = Html::parse_document(&body);
        Ok(page_text(&document, &self.selectors))
    }
}

/// Pure document step of the fetch: broken-page check plus text collection.
///
/// The site answers HTTP 200 for nonexistent fund pages, so the error
/// marker element is the only not-found signal.
pub fn page_text(document: &Html, selectors: &PageSelectors) -> Option<RawText> {
    if document.select(&selectors.error_marker).next().is_some() {
        return None;
    }

    Some(RawText {
        dp_values: collect_text(document, &selectors.dp_value),
        screen_reader: collect_text(document, &selectors.screen_reader),
    })
}

fn collect_text(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
