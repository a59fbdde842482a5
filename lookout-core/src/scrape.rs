use crate::blueprint::{Blueprint, Endpoint};
use crate::camera::Camera;
use crate::dataset::CameraDataset;
use crate::discover::ProgressCallback;
use crate::error::Result;
use crate::extract::CameraExtractor;
use lookout_scanner::{Fetcher, SiteProfile, Throttle};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const SCRAPE_METHOD: &str = "blueprint-based";

/// Options for configuring a scrape run
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Only process the first N endpoints of the blueprint.
    pub endpoint_limit: Option<usize>,
    /// Pause between endpoints.
    pub endpoint_delay: Duration,
    /// Pause after each camera emitted within an endpoint.
    pub block_delay: Duration,
    /// Classify non-embedded cameras from their detail pages as well.
    pub inspect_details: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            endpoint_limit: None,
            endpoint_delay: Duration::from_millis(500),
            block_delay: Duration::from_millis(100),
            inspect_details: false,
        }
    }
}

/// Run-scoped state: identities already emitted and the cameras so far.
#[derive(Debug, Default)]
pub struct ScrapeRun {
    seen: HashSet<String>,
    cameras: Vec<Camera>,
}

impl ScrapeRun {
    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Keep `camera` unless its id was emitted before. First seen wins.
    pub fn admit(&mut self, camera: Camera) -> bool {
        if !self.seen.insert(camera.id.clone()) {
            return false;
        }
        self.cameras.push(camera);
        true
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn into_cameras(self) -> Vec<Camera> {
        self.cameras
    }
}

/// Replays a blueprint endpoint by endpoint and collects unique cameras.
pub struct ScrapeOrchestrator {
    fetcher: Fetcher,
    profile: SiteProfile,
    options: ScrapeOptions,
    progress: Option<ProgressCallback>,
}

impl ScrapeOrchestrator {
    /// The fetcher should have visit tracking disabled so repeated endpoints
    /// and detail pages are fetched normally.
    pub fn new(fetcher: Fetcher, profile: SiteProfile, options: ScrapeOptions) -> Self {
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

    fn report(&self, message: String) {
        if let Some(ref callback) = self.progress {
            callback(message);
        }
    }

    /// Endpoints this run will process, honoring the configured limit.
    pub fn selected_endpoints<'b>(&self, blueprint: &'b Blueprint) -> &'b [Endpoint] {
        let count = self
            .options
            .endpoint_limit
            .map_or(blueprint.endpoints.len(), |limit| {
                limit.min(blueprint.endpoints.len())
            });
        &blueprint.endpoints[..count]
    }

    pub async fn run(&mut self, blueprint: &Blueprint) -> CameraDataset {
        let endpoints = self.selected_endpoints(blueprint);
        let endpoint_throttle = Throttle::new(self.options.endpoint_delay);
        let block_throttle = Throttle::new(self.options.block_delay);
        let extractor =
            CameraExtractor::new(&self.profile).with_detail_inspection(self.options.inspect_details);

        info!(
            "Scraping {} of {} endpoints",
            endpoints.len(),
            blueprint.endpoints.len()
        );

        let mut run = ScrapeRun::default();

        for (idx, endpoint) in endpoints.iter().enumerate() {
            if idx > 0 {
                endpoint_throttle.pause().await;
            }
            if let Some(ref callback) = self.progress {
                callback(format!(
                    "Endpoint {}/{}: {}",
                    idx + 1,
                    endpoints.len(),
                    endpoint.name
                ));
            }

            let listings = extractor.listings(&mut self.fetcher, &endpoint.url).await;
            let before = run.len();

            for listing in listings {
                if run.has_seen(&listing.id) {
                    debug!("Skipping duplicate camera {}", listing.id);
                    continue;
                }
                let Some(camera) = extractor
                    .build_camera(&mut self.fetcher, listing, &endpoint.name)
                    .await
                else {
                    continue;
                };
                if run.admit(camera) {
                    block_throttle.pause().await;
                }
            }

            info!("{}: {} new cameras", endpoint.name, run.len() - before);
        }

        let cameras = run.into_cameras();
        self.report(format!("Collected {} cameras", cameras.len()));
        info!("Scrape complete: {} cameras", cameras.len());

        CameraDataset::new(cameras, blueprint.metadata.source.clone(), Some(SCRAPE_METHOD))
    }

    /// Load the blueprint at `path` and run. A missing or malformed
    /// blueprint fails before any page is fetched.
    pub async fn run_from_file(&mut self, path: &Path) -> Result<CameraDataset> {
        let blueprint = Blueprint::load(path)?;
        Ok(self.run(&blueprint).await)
    }
}
