use crate::error::{CoreError, Result};
use lookout_scanner::{StreamKind, StreamSource};
use serde::{Deserialize, Serialize};

/// One camera record. The stream payload is flattened so the JSON carries
/// `type` plus exactly one of `imageUrl`, `youtubeId` or `hlsUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(flatten)]
    pub stream: StreamSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Agency credited on the detail page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Camera {
    /// Serialized names of the stream locators; a record carries at most one.
    pub const LOCATOR_FIELDS: [&'static str; 3] = ["imageUrl", "youtubeId", "hlsUrl"];

    pub fn builder(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        url: impl Into<String>,
    ) -> CameraBuilder {
        CameraBuilder {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            url: url.into(),
            location: None,
            thumbnail: None,
            stream: None,
            description: None,
            source: None,
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.stream.kind()
    }

    /// Check the record invariants: a non-empty id and a non-empty locator
    /// for every stream type except `unknown`.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InvalidCamera("empty id".to_string()));
        }
        match self.stream.locator() {
            Some(locator) if locator.trim().is_empty() => Err(CoreError::InvalidCamera(format!(
                "{}: empty {} locator",
                self.id,
                self.kind()
            ))),
            _ => Ok(()),
        }
    }
}

pub struct CameraBuilder {
    id: String,
    name: String,
    category: String,
    url: String,
    location: Option<String>,
    thumbnail: Option<String>,
    stream: Option<StreamSource>,
    description: Option<String>,
    source: Option<String>,
}

impl CameraBuilder {
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail.filter(|t| !t.is_empty());
        self
    }

    pub fn stream(mut self, stream: StreamSource) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    /// Finish the record. Without an explicit stream the thumbnail becomes an
    /// `image` locator, and a camera with neither is `unknown`. The location
    /// defaults to the category.
    pub fn build(self) -> Result<Camera> {
        let stream = match (self.stream, &self.thumbnail) {
            (Some(stream), _) => stream,
            (None, Some(thumbnail)) => StreamSource::Image {
                image_url: thumbnail.clone(),
            },
            (None, None) => StreamSource::Unknown,
        };

        let camera = Camera {
            location: Some(self.location.unwrap_or_else(|| self.category.clone())),
            id: self.id,
            name: self.name,
            category: self.category,
            url: self.url,
            thumbnail: self.thumbnail,
            stream,
            description: self.description,
            source: self.source,
        };

        camera.validate()?;
        Ok(camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_defaults_to_image() {
        let camera = Camera::builder("cam1", "Gate", "國道", "https://tw.live/cam/?id=cam1")
            .thumbnail(Some("https://cctv.example/1.jpg".to_string()))
            .build()
            .unwrap();

        assert_eq!(camera.kind(), StreamKind::Image);
        assert_eq!(camera.stream.locator(), Some("https://cctv.example/1.jpg"));
        assert_eq!(camera.location.as_deref(), Some("國道"));
    }

    #[test]
    fn test_no_thumbnail_is_unknown() {
        let camera = Camera::builder("cam2", "Gate", "國道", "u")
            .thumbnail(Some(String::new()))
            .build()
            .unwrap();
        assert_eq!(camera.kind(), StreamKind::Unknown);
        assert_eq!(camera.thumbnail, None);
    }

    #[test]
    fn test_rejects_empty_id_and_locator() {
        assert!(Camera::builder(" ", "n", "c", "u").build().is_err());

        let empty_hls = Camera::builder("cam3", "n", "c", "u")
            .stream(StreamSource::Hls {
                hls_url: String::new(),
            })
            .build();
        assert!(matches!(empty_hls, Err(CoreError::InvalidCamera(_))));
    }

    #[test]
    fn test_json_carries_single_locator() {
        let camera = Camera::builder("cam42", "North Bridge", "市區", "https://site/detail?id=cam42")
            .thumbnail(Some("https://site/assets/thumbnail.png".to_string()))
            .stream(StreamSource::Hls {
                hls_url: "stream.m3u8".to_string(),
            })
            .build()
            .unwrap();

        let json = serde_json::to_value(&camera).unwrap();
        assert_eq!(json["type"], "hls");
        assert_eq!(json["hlsUrl"], "stream.m3u8");
        assert!(json.get("imageUrl").is_none());
        assert!(json.get("youtubeId").is_none());
        assert!(json.get("description").is_none());

        let back: Camera = serde_json::from_value(json).unwrap();
        assert_eq!(back, camera);
    }
}
