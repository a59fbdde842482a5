use crate::error::{Result, ScanError};
use reqwest::Client;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (compatible; Lookout/0.2)";

/// Addresses already requested during one discovery run.
///
/// Only the fact of the visit is kept, never the page content.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url`, returning `false` when it was already present.
    pub fn insert(&mut self, url: &str) -> bool {
        self.urls.insert(normalize_url(url))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Canonical form used as a visited-set key: parsed, fragment stripped.
pub fn normalize_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.trim().to_string(),
    }
}

/// Sequential page fetcher with a bounded timeout.
///
/// With visit tracking enabled (the default) a second request for the same
/// address short-circuits to [`ScanError::AlreadyVisited`] without touching
/// the network.
pub struct Fetcher {
    client: Client,
    visited: Option<VisitedSet>,
    timeout_secs: u64,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Self::build(timeout_secs, DEFAULT_USER_AGENT)
    }

    fn build(timeout_secs: u64, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(ScanError::Client)?;

        Ok(Self {
            client,
            visited: Some(VisitedSet::new()),
            timeout_secs,
        })
    }

    pub fn with_user_agent(self, user_agent: &str) -> Result<Self> {
        let tracking = self.visited.is_some();
        Ok(Self::build(self.timeout_secs, user_agent)?.with_visit_tracking(tracking))
    }

    /// Disable the visited set, e.g. for replaying a blueprint where detail
    /// pages and repeated endpoints must still be fetched.
    pub fn with_visit_tracking(mut self, enabled: bool) -> Self {
        self.visited = enabled.then(VisitedSet::new);
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn visited_count(&self) -> usize {
        self.visited.as_ref().map(VisitedSet::len).unwrap_or(0)
    }

    /// Fetch `url` and return the response body.
    pub async fn fetch(&mut self, url: &str) -> Result<String> {
        Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

        if let Some(visited) = self.visited.as_mut()
            && !visited.insert(url)
        {
            return Err(ScanError::AlreadyVisited(url.to_string()));
        }

        debug!("Fetching {}", url);
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScanError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ScanError::Http {
            url: url.to_string(),
            source,
        })?;

        debug!(
            "Fetched {} ({} bytes in {:?})",
            url,
            body.len(),
            start.elapsed()
        );
        Ok(body)
    }

    /// Fetch `url`, converting any failure into "no content".
    pub async fn fetch_page(&mut self, url: &str) -> Option<String> {
        match self.fetch(url).await {
            Ok(body) => Some(body),
            Err(ScanError::AlreadyVisited(url)) => {
                debug!("Skipping already visited {}", url);
                None
            }
            Err(e) => {
                warn!("Fetch failed: {}", e);
                None
            }
        }
    }
}
