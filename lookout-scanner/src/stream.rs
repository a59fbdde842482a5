//! Stream classification.
//!
//! A page or thumbnail may contain several candidate locators at once (a
//! fallback snapshot next to an embedded player, say). Matchers are tried in
//! the order of [`STREAM_MATCHERS`] and the first family that matches wins,
//! regardless of where in the text its match occurs.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Delivery type of a camera feed together with its locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamSource {
    Image {
        #[serde(rename = "imageUrl")]
        image_url: String,
    },
    Youtube {
        #[serde(rename = "youtubeId")]
        youtube_id: String,
    },
    Hls {
        #[serde(rename = "hlsUrl")]
        hls_url: String,
    },
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StreamKind {
    Image,
    Youtube,
    Hls,
    Unknown,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Image => "image",
            StreamKind::Youtube => "youtube",
            StreamKind::Hls => "hls",
            StreamKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StreamSource {
    pub fn kind(&self) -> StreamKind {
        match self {
            StreamSource::Image { .. } => StreamKind::Image,
            StreamSource::Youtube { .. } => StreamKind::Youtube,
            StreamSource::Hls { .. } => StreamKind::Hls,
            StreamSource::Unknown => StreamKind::Unknown,
        }
    }

    /// The type-specific payload, `None` for [`StreamSource::Unknown`].
    pub fn locator(&self) -> Option<&str> {
        match self {
            StreamSource::Image { image_url } => Some(image_url),
            StreamSource::Youtube { youtube_id } => Some(youtube_id),
            StreamSource::Hls { hls_url } => Some(hls_url),
            StreamSource::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, StreamSource::Unknown)
    }
}

/// A named pattern family.
pub struct StreamMatcher {
    pub name: &'static str,
    pub find: fn(&str) -> Option<StreamSource>,
}

/// Pattern families in precedence order.
pub static STREAM_MATCHERS: &[StreamMatcher] = &[
    StreamMatcher {
        name: "embedded-player",
        find: find_embedded_player,
    },
    StreamMatcher {
        name: "playlist",
        find: find_playlist,
    },
    StreamMatcher {
        name: "static-image",
        find: find_static_image,
    },
];

static EMBEDDED_PLAYER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"youtube\.com/embed/([a-zA-Z0-9_-]+)",
        r"youtube\.com/vi/([a-zA-Z0-9_-]+)",
        r"youtube-nocookie\.com/embed/([a-zA-Z0-9_-]+)",
        r#"youtubeId['"]?\s*[:=]\s*['"]([a-zA-Z0-9_-]+)['"]"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hardcoded regex pattern is valid"))
    .collect()
});

static PLAYLIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(https?://[^\s"']+\.m3u8[^\s"']*)"#).expect("hardcoded regex pattern is valid")
});

static STATIC_IMAGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(https?://cctv[^\s"']+\.(?:jpg|jpeg|png))"#,
        r#"(https?://[^\s"']+/abs2jpg\.php[^\s"']*)"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hardcoded regex pattern is valid"))
    .collect()
});

static THUMBNAIL_VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/vi/([a-zA-Z0-9_-]+)/").expect("hardcoded regex pattern is valid")
});

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn find_embedded_player(text: &str) -> Option<StreamSource> {
    first_capture(&EMBEDDED_PLAYER_PATTERNS, text).map(|youtube_id| StreamSource::Youtube { youtube_id })
}

fn find_playlist(text: &str) -> Option<StreamSource> {
    PLAYLIST_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| StreamSource::Hls {
            hls_url: m.as_str().to_string(),
        })
}

fn find_static_image(text: &str) -> Option<StreamSource> {
    first_capture(&STATIC_IMAGE_PATTERNS, text).map(|image_url| StreamSource::Image { image_url })
}

/// Classify a thumbnail address or page body with the default matchers.
pub fn classify_stream(text: &str) -> StreamSource {
    classify_with(STREAM_MATCHERS, text)
}

/// Classify `text` with an explicit matcher list; first match wins.
pub fn classify_with(matchers: &[StreamMatcher], text: &str) -> StreamSource {
    for matcher in matchers {
        if let Some(source) = (matcher.find)(text) {
            tracing::debug!("Stream matched by {}", matcher.name);
            return source;
        }
    }
    StreamSource::Unknown
}

/// Video identifier from an embedded-platform thumbnail path
/// (`.../vi/<id>/default.jpg`).
pub fn video_id_from_thumbnail(thumbnail: &str) -> Option<String> {
    THUMBNAIL_VIDEO_ID
        .captures(thumbnail)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_player_beats_playlist() {
        // The playlist appears first in the document but the player family wins.
        let html = r#"
            <video><source src="https://cdn.example/live/cam.m3u8"></video>
            <iframe src="https://www.youtube.com/embed/abcDEF123?autoplay=1"></iframe>
        "#;
        assert_eq!(
            classify_stream(html),
            StreamSource::Youtube {
                youtube_id: "abcDEF123".to_string()
            }
        );
    }

    #[test]
    fn test_playlist_beats_static_image() {
        let html = r#"
            <img src="https://cctv.example.gov/snap/12.jpg">
            <source src="https://cdn.example/hls/12/index.m3u8?token=x" type="application/x-mpegURL">
        "#;
        assert_eq!(
            classify_stream(html),
            StreamSource::Hls {
                hls_url: "https://cdn.example/hls/12/index.m3u8?token=x".to_string()
            }
        );
    }

    #[test]
    fn test_static_image_patterns() {
        assert_eq!(
            classify_stream(r#"<img src="https://cctv.example.gov/snap/7.png">"#),
            StreamSource::Image {
                image_url: "https://cctv.example.gov/snap/7.png".to_string()
            }
        );
        assert_eq!(
            classify_stream("https://traffic.example/abs2jpg.php?id=99"),
            StreamSource::Image {
                image_url: "https://traffic.example/abs2jpg.php?id=99".to_string()
            }
        );
    }

    #[test]
    fn test_youtube_id_assignment_pattern() {
        let script = r#"var player = { youtubeId: "Xy_9-z" };"#;
        assert_eq!(classify_stream(script).locator(), Some("Xy_9-z"));
    }

    #[test]
    fn test_no_match_is_unknown() {
        let source = classify_stream("<p>nothing to see here</p>");
        assert!(source.is_unknown());
        assert_eq!(source.locator(), None);
        assert_eq!(source.kind(), StreamKind::Unknown);
    }

    #[test]
    fn test_custom_matcher_order() {
        let reversed = [
            StreamMatcher {
                name: "playlist",
                find: find_playlist,
            },
            StreamMatcher {
                name: "embedded-player",
                find: find_embedded_player,
            },
        ];
        let text = "https://youtube.com/embed/abc https://cdn.example/a.m3u8";
        assert_eq!(classify_with(&reversed, text).kind(), StreamKind::Hls);
        assert_eq!(classify_stream(text).kind(), StreamKind::Youtube);
    }

    #[test]
    fn test_video_id_from_thumbnail() {
        assert_eq!(
            video_id_from_thumbnail("https://img.youtube.com/vi/abcDEF123/default.jpg"),
            Some("abcDEF123".to_string())
        );
        assert_eq!(video_id_from_thumbnail("https://img.youtube.com/abc.jpg"), None);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(StreamSource::Hls {
            hls_url: "stream.m3u8".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "hls", "hlsUrl": "stream.m3u8"}));

        let unknown = serde_json::to_value(StreamSource::Unknown).unwrap();
        assert_eq!(unknown, serde_json::json!({"type": "unknown"}));
    }
}
