//! Trending headlines from the Google News RSS feed.

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use puch_core::constants::{DEFAULT_HTTP_TIMEOUT_SECS, MAX_HEADLINES};
use puch_core::error::{PuchError, Result};

use crate::http::{build_client, ensure_success, transport_error};

const SERVICE: &str = "Google News";

/// News feed configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewsConfig {
    /// RSS feed URL
    pub feed_url: String,
    /// Source label attached to each headline
    pub source: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            feed_url: "https://news.google.com/rss?hl=en-IN&gl=IN&ceid=IN:en".into(),
            source: "Google News IN".into(),
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// One headline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Headline {
    /// Headline text
    pub title: String,
    /// Article link
    pub link: String,
    /// Feed label
    pub source: String,
}

/// Trending topics result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrendingResponse {
    /// Region code, upper-cased
    pub region: String,
    /// Headlines, newest first as the feed orders them
    pub topics: Vec<Headline>,
}

/// Extracts up to `limit` headlines from an RSS 2.0 document.
///
/// Items without a title or link, and section headers ("Top stories"), are
/// skipped. A document with no `<channel>` yields nothing.
pub fn parse_rss(xml: &str, limit: usize, source: &str) -> Result<Vec<Headline>> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| PuchError::Parse(format!("RSS: {e}")))?;

    let Some(channel) = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name("channel"))
    else {
        return Ok(Vec::new());
    };

    Ok(channel
        .children()
        .filter(|n| n.has_tag_name("item"))
        .map(|item| (child_text(item, "title"), child_text(item, "link")))
        .filter(|(title, link)| !title.is_empty() && !link.is_empty() && !title.contains("Top stories"))
        .take(limit)
        .map(|(title, link)| Headline {
            title,
            link,
            source: source.to_string(),
        })
        .collect())
}

fn child_text(item: roxmltree::Node<'_, '_>, tag: &str) -> String {
    item.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Headline feed client.
pub struct NewsClient {
    config: NewsConfig,
    http_client: reqwest::Client,
}

impl NewsClient {
    /// Creates a client against the public feed.
    pub fn new() -> Result<Self> {
        Self::with_config(NewsConfig::default())
    }

    /// Creates a client with the given config.
    pub fn with_config(config: NewsConfig) -> Result<Self> {
        let http_client = build_client(config.timeout_seconds)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    async fn fetch_feed(&self) -> Result<String> {
        let response = self
            .http_client
            .get(&self.config.feed_url)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        ensure_success(SERVICE, response)?
            .text()
            .await
            .map_err(|e| transport_error(SERVICE, e))
    }

    /// Returns up to `limit` (1 to 20) headlines.
    ///
    /// The feed is always the Indian edition; `region` is echoed back.
    #[instrument(skip(self))]
    pub async fn trending(&self, region: &str, limit: u32) -> Result<TrendingResponse> {
        let region = match region.trim() {
            "" => "IN".to_string(),
            r => r.to_uppercase(),
        };
        let limit = limit.clamp(1, MAX_HEADLINES) as usize;

        let xml = self.fetch_feed().await.map_err(|e| {
            warn!(error = %e, "Headline feed unavailable");
            PuchError::upstream(SERVICE, "Unable to fetch headlines right now.")
        })?;

        let topics = parse_rss(&xml, limit, &self.config.source).unwrap_or_else(|e| {
            warn!(error = %e, "Headline feed unparseable");
            Vec::new()
        });

        if topics.is_empty() {
            return Err(PuchError::upstream(SERVICE, "No headlines parsed. Try again later."));
        }

        Ok(TrendingResponse { region, topics })
    }
}
