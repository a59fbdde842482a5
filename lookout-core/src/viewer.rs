// Projection of a camera dataset onto the viewer front end's configuration

use crate::camera::Camera;
use crate::dataset::CameraDataset;
use crate::error::Result;
use crate::store::write_json;
use lookout_scanner::StreamSource;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_VIEWER_FILE: &str = "viewpoints.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerCamera {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub stream: StreamSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&Camera> for ViewerCamera {
    fn from(camera: &Camera) -> Self {
        Self {
            id: camera.id.clone(),
            name: camera.name.clone(),
            stream: camera.stream.clone(),
            location: camera.location.clone(),
            category: Some(camera.category.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub cameras: Vec<ViewerCamera>,
}

impl From<&CameraDataset> for ViewerConfig {
    fn from(dataset: &CameraDataset) -> Self {
        Self {
            cameras: dataset.cameras.iter().map(ViewerCamera::from).collect(),
        }
    }
}

impl ViewerConfig {
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// Structural check applied by the configuration service before it accepts
/// a file: a `cameras` array whose entries all carry `id`, `name` and `type`.
pub fn is_valid_viewer_config(value: &serde_json::Value) -> bool {
    let Some(cameras) = value.get("cameras").and_then(|c| c.as_array()) else {
        return false;
    };

    cameras.iter().all(|camera| {
        ["id", "name", "type"]
            .iter()
            .all(|key| camera.get(key).is_some())
    })
}
