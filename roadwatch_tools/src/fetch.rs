//! Advisory page fetcher.
//!
//! Downloads the incident page and slices it into candidate sentences. The
//! page lists each advisory in its own table cell starting with "On".

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Source page configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Page listing current incidents
    #[serde(default = "SourceConfig::default_url")]
    pub url: String,

    /// Request timeout (seconds)
    #[serde(default = "SourceConfig::default_timeout")]
    pub timeout: u64,

    /// User-Agent header
    #[serde(default = "SourceConfig::default_user_agent")]
    pub user_agent: String,

    /// Maximum response size (bytes)
    #[serde(default = "SourceConfig::default_max_size")]
    pub max_size: usize,
}

impl SourceConfig {
    fn default_url() -> String {
        "https://www.511virginia.org/mobile/?menu_id=incidents".to_string()
    }

    const fn default_timeout() -> u64 {
        10
    }

    fn default_user_agent() -> String {
        "Mozilla/5.0 (compatible; roadwatch/1.0)".to_string()
    }

    const fn default_max_size() -> usize {
        1_000_000 // 1MB
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            timeout: Self::default_timeout(),
            user_agent: Self::default_user_agent(),
            max_size: Self::default_max_size(),
        }
    }
}

pub struct SourceFetcher {
    client: Client,
    config: SourceConfig,
}

impl SourceFetcher {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Fetch the configured page and return its advisory sentences.
    pub async fn fetch_sentences(&self) -> Result<Vec<String>> {
        let html = self.fetch_page(&self.config.url).await?;
        let sentences = split_sentences(&html);
        info!(
            url = %self.config.url,
            sentences = sentences.len(),
            "Fetched advisory page"
        );
        Ok(sentences)
    }

    /// Fetch a page as text.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let mut response = self
            .client
            .get(parsed)
            .header("User-Agent", &self.config.user_agent)
            .header("Accept", "text/html, text/plain")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let max = self.config.max_size;
        check_declared_size(response.content_length(), max)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            append_capped(&mut bytes, &chunk, max)?;
        }
        debug!(bytes = bytes.len(), "Read response body");

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Reject a response up front when its `Content-Length` is over the cap.
fn check_declared_size(declared: Option<u64>, max: usize) -> Result<()> {
    match declared.map(|len| usize::try_from(len).unwrap_or(usize::MAX)) {
        Some(size) if size > max => Err(Error::ResponseTooLarge { size, max }),
        _ => Ok(()),
    }
}

/// Append one body chunk, failing as soon as the total passes `max`.
fn append_capped(body: &mut Vec<u8>, chunk: &[u8], max: usize) -> Result<()> {
    let size = body.len().saturating_add(chunk.len());
    if size > max {
        return Err(Error::ResponseTooLarge { size, max });
    }
    body.extend_from_slice(chunk);
    Ok(())
}

/// Split raw HTML into advisory sentences.
///
/// Keeps every `<td>` cell whose text starts with "On", cut at the closing
/// tag and stripped of tabs, newlines and surrounding spaces.
#[must_use]
pub fn split_sentences(html: &str) -> Vec<String> {
    html.split("<td>")
        .skip(1)
        .map(|cell| cell.split_once("</td>").map_or(cell, |(text, _)| text))
        .map(|cell| cell.trim_matches(|c: char| c.is_whitespace()))
        .filter(|cell| cell.starts_with("On"))
        .map(|cell| {
            cell.replace("&amp;", "&")
                .replace("&nbsp;", " ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
