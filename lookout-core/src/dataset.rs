use crate::camera::Camera;
use crate::error::{CoreError, Result};
use crate::store::{read_json, write_json};
use crate::timestamp_now;
use lookout_scanner::StreamKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_DATASET_FILE: &str = "cameras.json";
pub const DATASET_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub total_count: usize,
    pub last_updated: String,
    pub version: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// The terminal artifact of a scrape run, cameras in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDataset {
    pub cameras: Vec<Camera>,
    pub metadata: DatasetMetadata,
}

impl CameraDataset {
    pub fn new(cameras: Vec<Camera>, source: impl Into<String>, method: Option<&str>) -> Self {
        let metadata = DatasetMetadata {
            total_count: cameras.len(),
            last_updated: timestamp_now(),
            version: DATASET_VERSION.to_string(),
            source: source.into(),
            method: method.map(str::to_string),
        };

        Self { cameras, metadata }
    }

    /// Load a dataset and check every record's invariants.
    pub fn load(path: &Path) -> Result<Self> {
        let raw: serde_json::Value = read_json(path)?;
        reject_mixed_locators(&raw)?;

        let dataset: Self = serde_json::from_value(raw).map_err(|source| CoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        for camera in &dataset.cameras {
            camera.validate()?;
        }
        Ok(dataset)
    }

    /// Write the dataset, fully replacing any previous file.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn count_by_kind(&self) -> BTreeMap<StreamKind, usize> {
        let mut counts = BTreeMap::new();
        for camera in &self.cameras {
            *counts.entry(camera.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_by_category(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for camera in &self.cameras {
            *counts.entry(camera.category.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

// Serde drops unknown keys, so a second locator would otherwise vanish silently.
fn reject_mixed_locators(raw: &serde_json::Value) -> Result<()> {
    let Some(cameras) = raw.get("cameras").and_then(serde_json::Value::as_array) else {
        return Ok(());
    };

    for record in cameras {
        let present: Vec<&str> = Camera::LOCATOR_FIELDS
            .into_iter()
            .filter(|field| record.get(*field).is_some())
            .collect();
        if present.len() > 1 {
            let id = record
                .get("id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("?");
            return Err(CoreError::InvalidCamera(format!(
                "{}: conflicting locators {}",
                id,
                present.join(", ")
            )));
        }
    }
    Ok(())
}
