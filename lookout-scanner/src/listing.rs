use serde::{Deserialize, Serialize};

/// A labelled navigation link. Serialized as a `[label, url]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct CategoryLink {
    pub label: String,
    pub url: String,
}

impl CategoryLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

impl From<(String, String)> for CategoryLink {
    fn from((label, url): (String, String)) -> Self {
        Self { label, url }
    }
}

impl From<CategoryLink> for (String, String) {
    fn from(link: CategoryLink) -> Self {
        (link.label, link.url)
    }
}

/// Raw signals of one camera entry on an endpoint page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingBlock {
    pub href: Option<String>,
    pub label: Option<String>,
    pub thumbnail: Option<String>,
}

/// A listing block that carried a usable camera identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub url: String,
    pub thumbnail: Option<String>,
}

/// Headings scraped from a camera's own detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraDetail {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
}
