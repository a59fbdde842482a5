use crate::blueprint::Endpoint;
use crate::camera::Camera;
use lookout_scanner::patterns::{
    extract_camera_stacks, extract_detail, extract_listing, extract_playlist_source,
    parse_document,
};
use lookout_scanner::stream::video_id_from_thumbnail;
use lookout_scanner::{
    CameraDetail, Fetcher, Listing, SiteProfile, StreamKind, StreamSource, classify_stream,
};
use tracing::{debug, warn};

/// What a camera's own detail page revealed.
#[derive(Debug, Clone)]
struct DetailPage {
    playlist: Option<String>,
    classified: Option<StreamSource>,
    detail: CameraDetail,
}

/// Turns the listing blocks of one endpoint page into camera records.
pub struct CameraExtractor<'a> {
    profile: &'a SiteProfile,
    inspect_details: bool,
}

impl<'a> CameraExtractor<'a> {
    pub fn new(profile: &'a SiteProfile) -> Self {
        Self {
            profile,
            inspect_details: false,
        }
    }

    /// Also classify every non-embedded camera from its detail page.
    pub fn with_detail_inspection(mut self, enabled: bool) -> Self {
        self.inspect_details = enabled;
        self
    }

    /// Listings with a usable identity, in document order. A failed fetch
    /// yields no listings.
    pub async fn listings(&self, fetcher: &mut Fetcher, url: &str) -> Vec<Listing> {
        let Some(body) = fetcher.fetch_page(url).await else {
            return Vec::new();
        };

        let document = parse_document(&body);
        let blocks = extract_camera_stacks(&document);
        let listings: Vec<Listing> = blocks
            .iter()
            .filter_map(|block| extract_listing(block, self.profile))
            .collect();

        if listings.len() < blocks.len() {
            debug!(
                "{}: skipped {} blocks without a camera id",
                url,
                blocks.len() - listings.len()
            );
        }
        listings
    }

    /// All cameras of one endpoint, without cross-endpoint deduplication.
    pub async fn extract_endpoint(&self, fetcher: &mut Fetcher, endpoint: &Endpoint) -> Vec<Camera> {
        let mut cameras = Vec::new();
        for listing in self.listings(fetcher, &endpoint.url).await {
            if let Some(camera) = self.build_camera(fetcher, listing, &endpoint.name).await {
                cameras.push(camera);
            }
        }
        cameras
    }

    /// Build the record for one listing, refining the thumbnail-derived
    /// `image` classification where the thumbnail says more.
    pub async fn build_camera(
        &self,
        fetcher: &mut Fetcher,
        listing: Listing,
        category: &str,
    ) -> Option<Camera> {
        let Listing {
            id,
            mut name,
            url,
            thumbnail,
        } = listing;

        let mut stream = match &thumbnail {
            Some(thumbnail) => StreamSource::Image {
                image_url: thumbnail.clone(),
            },
            None => StreamSource::Unknown,
        };
        let mut description = None;
        let mut source = None;
        let mut placeholder = false;

        if let Some(thumb) = thumbnail.as_deref() {
            if self.profile.is_video_thumbnail(thumb) {
                if let Some(youtube_id) = video_id_from_thumbnail(thumb) {
                    stream = StreamSource::Youtube { youtube_id };
                    description = Some(self.profile.live_description(category));
                }
            } else if self.profile.is_placeholder(thumb) {
                placeholder = true;
            }
        }

        let needs_detail =
            placeholder || (self.inspect_details && stream.kind() != StreamKind::Youtube);

        if needs_detail && let Some(page) = self.inspect_detail_page(fetcher, &url).await {
            if placeholder && let Some(hls_url) = page.playlist {
                stream = StreamSource::Hls { hls_url };
            }

            if self.inspect_details {
                match page.classified {
                    Some(StreamSource::Image { .. }) if stream.kind() == StreamKind::Hls => {}
                    Some(found) => stream = found,
                    None => {}
                }
                if name == self.profile.fallback_label
                    && let Some(title) = page.detail.title
                {
                    name = title;
                }
                if description.is_none() {
                    description = page.detail.description;
                }
                source = page.detail.source;
            }
        }

        let result = Camera::builder(id, name, category, url)
            .location(category)
            .thumbnail(thumbnail)
            .stream(stream)
            .description(description)
            .source(source)
            .build();

        match result {
            Ok(camera) => {
                debug!("Camera {} classified as {}", camera.id, camera.kind());
                Some(camera)
            }
            Err(e) => {
                warn!("Dropping camera: {}", e);
                None
            }
        }
    }

    async fn inspect_detail_page(&self, fetcher: &mut Fetcher, url: &str) -> Option<DetailPage> {
        let body = fetcher.fetch_page(url).await?;
        let document = parse_document(&body);

        let classified = if self.inspect_details {
            Some(classify_stream(&body)).filter(|s| !s.is_unknown())
        } else {
            None
        };

        Some(DetailPage {
            playlist: extract_playlist_source(&document, self.profile),
            classified,
            detail: extract_detail(&document, self.profile),
        })
    }
}
