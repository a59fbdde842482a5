use crate::error::Result;
use crate::store::{read_json, write_json};
use crate::timestamp_now;
use lookout_scanner::CategoryLink;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_BLUEPRINT_FILE: &str = "scraper_blueprint.json";

/// How many navigation hops below the root an endpoint was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// A top-level category page.
    Direct,
    /// A sub-category of a top-level overview.
    Sub,
    /// A sub-sub-category.
    SubSub,
}

impl EndpointKind {
    /// Kind for a page at `depth` (0 = top-level category).
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            0 => Some(EndpointKind::Direct),
            1 => Some(EndpointKind::Sub),
            2 => Some(EndpointKind::SubSub),
            _ => None,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            EndpointKind::Direct => 0,
            EndpointKind::Sub => 1,
            EndpointKind::SubSub => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Direct => "direct",
            EndpointKind::Sub => "sub",
            EndpointKind::SubSub => "sub_sub",
        }
    }
}

/// A page confirmed to list cameras. Identity is the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: EndpointKind,
    /// Top-level category label, for `sub` and `sub_sub` endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Sub-category label, for `sub_sub` endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_parent: Option<String>,
}

impl Endpoint {
    /// Build an endpoint from the labels leading to it, top-level first.
    ///
    /// Returns `None` when `path` is empty or deeper than a sub-sub-category.
    pub fn from_path(path: &[String], url: impl Into<String>, separator: &str) -> Option<Self> {
        let kind = EndpointKind::from_depth(path.len().checked_sub(1)?)?;

        Some(Self {
            name: path.join(separator),
            url: url.into(),
            kind,
            parent: (path.len() >= 2).then(|| path[0].clone()),
            sub_parent: (path.len() >= 3).then(|| path[1].clone()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintMetadata {
    pub total_categories: usize,
    pub total_endpoints: usize,
    pub last_updated: String,
    pub source: String,
}

/// The discovered category tree plus the flat endpoint list. This is the only
/// artifact handed from discovery to scraping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub categories: BTreeMap<String, Vec<CategoryLink>>,
    pub endpoints: Vec<Endpoint>,
    pub metadata: BlueprintMetadata,
}

impl Blueprint {
    pub fn new(
        categories: BTreeMap<String, Vec<CategoryLink>>,
        endpoints: Vec<Endpoint>,
        source: impl Into<String>,
    ) -> Self {
        let metadata = BlueprintMetadata {
            total_categories: categories.len(),
            total_endpoints: endpoints.len(),
            last_updated: timestamp_now(),
            source: source.into(),
        };

        Self {
            categories,
            endpoints,
            metadata,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn endpoints_of_kind(&self, kind: EndpointKind) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter().filter(move |e| e.kind == kind)
    }
}
