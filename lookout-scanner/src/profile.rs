use crate::error::{Result, ScanError};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://tw.live";

/// Markup conventions of the catalogue site.
///
/// The values default to what the live site uses today. They are kept out of
/// the extraction code because the site's structure is outside our control.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub base_url: Url,
    /// Label of the call-to-action buttons that lead to a camera listing.
    pub button_trigger: String,
    /// Path of the generic thumbnail shown for cameras without a snapshot.
    pub placeholder_path: String,
    /// Host fragment identifying the embedded-video platform.
    pub video_host: String,
    /// MIME type of `<source>` tags carrying a playlist stream.
    pub playlist_mime: String,
    /// Name used when a listing block carries no label.
    pub fallback_label: String,
    /// Appended to the category name to describe embedded live videos.
    pub live_suffix: String,
}

impl SiteProfile {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    pub fn with_button_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.button_trigger = trigger.into();
        self
    }

    pub fn with_placeholder_path(mut self, path: impl Into<String>) -> Self {
        self.placeholder_path = path.into();
        self
    }

    pub fn with_video_host(mut self, host: impl Into<String>) -> Self {
        self.video_host = host.into();
        self
    }

    /// Origin of the site without a trailing slash, e.g. `https://tw.live`.
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// Resolve a possibly site-relative address against the base URL.
    ///
    /// Fragments are dropped. Returns `None` for empty, fragment-only and
    /// non-navigable (`javascript:`, `mailto:`, `tel:`) references.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty()
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with('#')
        {
            return None;
        }

        let mut resolved = self.base_url.join(href).ok()?;
        resolved.set_fragment(None);
        Some(resolved.to_string())
    }

    /// Absolute address of the placeholder thumbnail.
    pub fn placeholder_url(&self) -> String {
        self.resolve(&self.placeholder_path)
            .unwrap_or_else(|| self.placeholder_path.clone())
    }

    pub fn is_placeholder(&self, thumbnail: &str) -> bool {
        if thumbnail.is_empty() {
            return false;
        }
        let absolute = self
            .resolve(thumbnail)
            .unwrap_or_else(|| thumbnail.to_string());
        absolute.starts_with(&self.placeholder_url())
    }

    pub fn is_video_thumbnail(&self, thumbnail: &str) -> bool {
        !self.video_host.is_empty() && thumbnail.contains(&self.video_host)
    }

    pub fn live_description(&self, category: &str) -> String {
        format!("{} {}", category, self.live_suffix)
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            button_trigger: "即時影像".to_string(),
            placeholder_path: "/assets/thumbnail.png".to_string(),
            video_host: "youtube.com".to_string(),
            playlist_mime: "application/x-mpegURL".to_string(),
            fallback_label: "未知監控點".to_string(),
            live_suffix: "live".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_fragment() {
        let profile = SiteProfile::default();
        assert_eq!(
            profile.resolve("/city/taipei/#top"),
            Some("https://tw.live/city/taipei/".to_string())
        );
        assert_eq!(profile.resolve("#menu"), None);
        assert_eq!(profile.resolve("javascript:void(0)"), None);
        assert_eq!(profile.resolve(""), None);
    }

    #[test]
    fn test_placeholder_detection() {
        let profile = SiteProfile::new("http://127.0.0.1:8080").unwrap();
        assert!(profile.is_placeholder("http://127.0.0.1:8080/assets/thumbnail.png"));
        assert!(profile.is_placeholder("/assets/thumbnail.png?v=2"));
        assert!(!profile.is_placeholder("https://tw.live/assets/thumbnail.png"));
        assert!(!profile.is_placeholder(""));
    }

    #[test]
    fn test_origin_has_no_trailing_slash() {
        let profile = SiteProfile::new("https://tw.live/").unwrap();
        assert_eq!(profile.origin(), "https://tw.live");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            SiteProfile::new("not a url"),
            Err(ScanError::InvalidUrl(_))
        ));
    }
}
