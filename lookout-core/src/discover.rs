use crate::blueprint::{Blueprint, Endpoint};
use lookout_scanner::patterns::{
    extract_menu_categories, extract_nav_categories, extract_sub_categories, is_endpoint_page,
    parse_document,
};
use lookout_scanner::{CategoryLink, Fetcher, SiteProfile, Throttle};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Hard ceiling on discovery depth: top-level, sub and sub-sub pages.
pub const MAX_DISCOVERY_DEPTH: usize = 3;

/// Callback for reporting progress messages
pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Options for configuring a discovery run
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Levels below the root to visit, clamped to `1..=3`.
    pub max_depth: usize,
    /// Sub-sub-categories checked per sub-category overview. The rest are
    /// discovered but not fetched.
    pub branch_limit: usize,
    /// Pause before each top-level and sub-level fetch.
    pub delay: Duration,
    /// Joins ancestor labels into an endpoint name.
    pub name_separator: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DISCOVERY_DEPTH,
            branch_limit: 3,
            delay: Duration::from_millis(500),
            name_separator: " - ".to_string(),
        }
    }
}

/// A page waiting to be classified.
#[derive(Debug, Clone)]
struct PendingPage {
    url: String,
    /// 0 for top-level categories.
    depth: usize,
    /// Labels from the top-level category down to this page.
    path: Vec<String>,
}

enum PageKind {
    Endpoint,
    Overview(Vec<CategoryLink>),
}

/// Top-level overviews fall back to call-to-action buttons when they have
/// no menu; deeper overviews only use menus.
fn classify_page(body: &str, depth: usize, profile: &SiteProfile) -> PageKind {
    let document = parse_document(body);
    if is_endpoint_page(&document) {
        return PageKind::Endpoint;
    }
    let children = if depth == 0 {
        extract_sub_categories(&document, profile)
    } else {
        extract_menu_categories(&document, profile)
    };
    PageKind::Overview(children)
}

/// Top-level and sub-level fetches are throttled; sub-sub checks are not.
fn throttled(depth: usize) -> bool {
    depth <= 1
}

/// Walks the site navigation from the root and records every page that lists
/// cameras. Owns the fetcher, and with it the run's visited set.
pub struct CategoryDiscoverer {
    fetcher: Fetcher,
    profile: SiteProfile,
    options: DiscoveryOptions,
    progress: Option<ProgressCallback>,
}

impl CategoryDiscoverer {
    pub fn new(fetcher: Fetcher, profile: SiteProfile, options: DiscoveryOptions) -> Self {
        Self {
            fetcher,
            profile,
            options,
            progress: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn visited_count(&self) -> usize {
        self.fetcher.visited_count()
    }

    fn report(&self, message: String) {
        if let Some(ref callback) = self.progress {
            callback(message);
        }
    }

    pub async fn discover(&mut self) -> Blueprint {
        let root = self.profile.base_url.to_string();
        let source = self.profile.origin();
        let max_depth = self.options.max_depth.clamp(1, MAX_DISCOVERY_DEPTH);
        let throttle = Throttle::new(self.options.delay);

        info!("Starting discovery of {}", root);
        self.report(format!("Fetching {}", root));

        let Some(body) = self.fetcher.fetch_page(&root).await else {
            info!("Root page unavailable, producing an empty blueprint");
            return Blueprint::new(BTreeMap::new(), Vec::new(), source);
        };

        let top_level = {
            let document = parse_document(&body);
            extract_nav_categories(&document, &self.profile)
        };
        info!("Found {} top-level categories", top_level.len());

        // Stack of pending pages, children pushed in reverse so pages are
        // classified in presentation order.
        let mut worklist: Vec<PendingPage> = top_level
            .into_iter()
            .rev()
            .map(|link| PendingPage {
                url: link.url,
                depth: 0,
                path: vec![link.label],
            })
            .collect();

        let mut categories: BTreeMap<String, Vec<CategoryLink>> = BTreeMap::new();
        let mut endpoints: Vec<Endpoint> = Vec::new();

        while let Some(page) = worklist.pop() {
            if throttled(page.depth) {
                throttle.pause().await;
            }

            self.report(format!("Checking {}", page.path.join(&self.options.name_separator)));

            let Some(body) = self.fetcher.fetch_page(&page.url).await else {
                continue;
            };

            let children = match classify_page(&body, page.depth, &self.profile) {
                PageKind::Endpoint => {
                    if let Some(endpoint) =
                        Endpoint::from_path(&page.path, &page.url, &self.options.name_separator)
                    {
                        debug!("Endpoint ({}): {}", endpoint.kind.as_str(), endpoint.url);
                        endpoints.push(endpoint);
                    }
                    continue;
                }
                PageKind::Overview(children) => children,
            };

            debug!(
                "Overview {} has {} sub-categories",
                page.url,
                children.len()
            );

            if page.depth == 0 {
                categories.insert(page.path[0].clone(), children.clone());
            }

            let child_depth = page.depth + 1;
            if child_depth >= max_depth {
                continue;
            }

            let limit = if child_depth >= 2 {
                self.options.branch_limit
            } else {
                children.len()
            };

            for link in children.into_iter().take(limit).rev() {
                let mut path = page.path.clone();
                path.push(link.label);
                worklist.push(PendingPage {
                    url: link.url,
                    depth: child_depth,
                    path,
                });
            }
        }

        info!(
            "Discovery complete: {} categories, {} endpoints, {} pages visited",
            categories.len(),
            endpoints.len(),
            self.visited_count()
        );

        Blueprint::new(categories, endpoints, source)
    }
}
