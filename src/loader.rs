use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{ContentType, Settings};
use crate::error::{Result, ScrapeError};
use crate::parser;

/// A channel as the user typed it: a handle/name, or a 24-char channel id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTarget {
    pub input: String,
}

impl ChannelTarget {
    pub fn new(input: &str) -> Self {
        ChannelTarget {
            input: input.trim().to_string(),
        }
    }

    pub fn is_channel_id(&self) -> bool {
        self.input.len() == 24
            && self
                .input
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    /// Listing URL of the given tab.
    pub fn url(&self, origin: &str, content: ContentType) -> String {
        let origin = origin.trim_end_matches('/');
        if self.is_channel_id() {
            format!("{}/channel/{}/{}", origin, self.input, content.tab())
        } else {
            format!("{}/{}/{}", origin, self.input, content.tab())
        }
    }
}

/// Produces the fully-loaded HTML of a channel listing page.
#[allow(async_fn_in_trait)]
pub trait PageLoader {
    async fn load(&self, target: &ChannelTarget, content: ContentType) -> Result<String>;
}

/// Reads previously rendered pages saved as `<dir>/<input>_<tab>.html`.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    dir: PathBuf,
}

impl SnapshotLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotLoader { dir: dir.into() }
    }

    pub fn path_for(&self, target: &ChannelTarget, content: ContentType) -> PathBuf {
        self.dir
            .join(format!("{}_{}.html", target.input, content.tab()))
    }
}

impl PageLoader for SnapshotLoader {
    async fn load(&self, target: &ChannelTarget, content: ContentType) -> Result<String> {
        let path = self.path_for(target, content);
        debug!(path = %path.display(), "reading page snapshot");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ScrapeError::Load {
                url: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

/// One GET per listing. The origin must serve the rendered listing markup
/// (a pre-rendering proxy in front of the site); a bare client-rendered page
/// has no item clusters.
pub struct HttpLoader {
    client: reqwest::Client,
    origin: String,
}

impl HttpLoader {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ScrapeError::Load {
                url: settings.site_origin.clone(),
                reason: e.to_string(),
            })?;
        Ok(HttpLoader {
            client,
            origin: settings.site_origin.clone(),
        })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let load_err = |e: reqwest::Error| ScrapeError::Load {
            url: url.to_string(),
            reason: e.to_string(),
        };
        self.client
            .get(url)
            .header("Accept-Language", "en")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(load_err)?
            .text()
            .await
            .map_err(load_err)
    }
}

impl PageLoader for HttpLoader {
    async fn load(&self, target: &ChannelTarget, content: ContentType) -> Result<String> {
        let url = target.url(&self.origin, content);
        info!(%url, "loading channel listing");

        let body = self.fetch(&url).await?;
        let items = parser::count_items(&body, content);
        if items == 0 {
            warn!(%url, "listing has no rendered items; is the origin a pre-rendering endpoint?");
        } else {
            debug!(%url, items, "listing loaded");
        }
        Ok(body)
    }
}
