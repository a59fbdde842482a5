//! Signal extraction over fetched pages.
//!
//! Every function here is pure: it reads a parsed document and returns owned
//! data, so callers can drop the document before the next await point.

use crate::listing::{CameraDetail, CategoryLink, Listing, ListingBlock};
use crate::profile::SiteProfile;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("hardcoded selector is valid")
}

static NAV_LINKS: LazyLock<Selector> = LazyLock::new(|| selector("div.nav-scroller a.nav-link"));
static MENU_BLOCKS: LazyLock<Selector> = LazyLock::new(|| selector("div.cctv-menu"));
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static BUTTONS: LazyLock<Selector> = LazyLock::new(|| selector("a.btn"));
static CAMERA_STACKS: LazyLock<Selector> = LazyLock::new(|| selector("div.cctv-stack"));
static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static IMAGES: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static SOURCES: LazyLock<Selector> = LazyLock::new(|| selector("source[type]"));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static H2: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static FIGCAPTION_LINKS: LazyLock<Selector> = LazyLock::new(|| selector("figcaption a"));

const BUTTON_CONTAINER_CLASS: &str = "col-md-4";

pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Whitespace-trimmed text of an element, with inner fragments joined.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("")
}

/// Full text of an element with inner spacing preserved, trimmed at the ends.
fn full_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(text_of)
        .filter(|text| !text.is_empty())
}

fn first_full_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(full_text)
        .filter(|text| !text.is_empty())
}

fn doc_full_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(full_text)
        .filter(|text| !text.is_empty())
}

/// Top-level navigation entries, skipping fragment-only and root links.
pub fn extract_nav_categories(document: &Html, profile: &SiteProfile) -> Vec<CategoryLink> {
    let root = profile.base_url.join("/").ok().map(|u| u.to_string());
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut links: Vec<CategoryLink> = Vec::new();

    for anchor in document.select(&NAV_LINKS) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.starts_with('#') || href == "/" {
            continue;
        }
        let label = text_of(anchor);
        if label.is_empty() {
            continue;
        }
        let Some(url) = profile.resolve(href) else {
            continue;
        };
        if root.as_deref() == Some(url.as_str()) {
            continue;
        }
        // A repeated label keeps its first position but takes the later address.
        match positions.get(&label).copied() {
            Some(idx) => links[idx] = CategoryLink::new(label, url),
            None => {
                positions.insert(label.clone(), links.len());
                links.push(CategoryLink::new(label, url));
            }
        }
    }

    links
}

/// Links inside the in-page category menus; empty when the page has none.
pub fn extract_menu_categories(document: &Html, profile: &SiteProfile) -> Vec<CategoryLink> {
    let mut links = Vec::new();

    for menu in document.select(&MENU_BLOCKS) {
        for anchor in menu.select(&ANCHORS) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if href.starts_with('#') {
                continue;
            }
            let label = text_of(anchor);
            if label.is_empty() {
                continue;
            }
            if let Some(url) = profile.resolve(href) {
                links.push(CategoryLink::new(label, url));
            }
        }
    }

    links
}

/// Call-to-action buttons labelled with the trigger text. The display label
/// comes from the heading of the button's enclosing card.
pub fn extract_button_categories(document: &Html, profile: &SiteProfile) -> Vec<CategoryLink> {
    let mut links = Vec::new();

    for button in document.select(&BUTTONS) {
        if text_of(button) != profile.button_trigger {
            continue;
        }
        let Some(url) = button.value().attr("href").and_then(|h| profile.resolve(h)) else {
            continue;
        };

        let container = button.ancestors().filter_map(ElementRef::wrap).find(|el| {
            el.value().name() == "div"
                && el.value().classes().any(|class| class == BUTTON_CONTAINER_CLASS)
        });

        if let Some(label) = container.and_then(|c| first_text(c, &H2)) {
            links.push(CategoryLink::new(label, url));
        }
    }

    links
}

/// Sub-categories of an overview page: menu links, or call-to-action
/// buttons when the page has no menu.
pub fn extract_sub_categories(document: &Html, profile: &SiteProfile) -> Vec<CategoryLink> {
    let menu = extract_menu_categories(document, profile);
    if !menu.is_empty() {
        return menu;
    }
    extract_button_categories(document, profile)
}

pub fn is_endpoint_page(document: &Html) -> bool {
    document.select(&CAMERA_STACKS).next().is_some()
}

pub fn extract_camera_stacks(document: &Html) -> Vec<ListingBlock> {
    document
        .select(&CAMERA_STACKS)
        .map(|stack| ListingBlock {
            href: stack
                .select(&ANCHORS)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
            label: first_full_text(stack, &PARAGRAPHS),
            thumbnail: stack
                .select(&IMAGES)
                .next()
                .and_then(|img| img.value().attr("data-src"))
                .map(|src| src.trim().to_string())
                .filter(|src| !src.is_empty()),
        })
        .collect()
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Camera identity from the `id` query parameter of a listing link.
pub fn camera_id_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.chars().take_while(|c| is_id_char(*c)).collect::<String>())
        .filter(|id| !id.is_empty())
}

/// Identity, label, thumbnail and address of one block. Blocks without a
/// link or without an `id` parameter are decorations and yield `None`.
pub fn extract_listing(block: &ListingBlock, profile: &SiteProfile) -> Option<Listing> {
    let url = block.href.as_deref().and_then(|href| profile.resolve(href))?;
    let id = camera_id_from_url(&url)?;

    Some(Listing {
        id,
        name: block
            .label
            .clone()
            .unwrap_or_else(|| profile.fallback_label.clone()),
        url,
        thumbnail: block.thumbnail.clone(),
    })
}

/// Playlist address from a `<source>` tag of the profile's playlist MIME type.
pub fn extract_playlist_source(document: &Html, profile: &SiteProfile) -> Option<String> {
    document
        .select(&SOURCES)
        .filter(|source| {
            source
                .value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(&profile.playlist_mime))
        })
        .find_map(|source| source.value().attr("src"))
        .map(|src| src.trim().to_string())
        .filter(|src| !src.is_empty())
}

pub fn extract_detail(document: &Html, profile: &SiteProfile) -> CameraDetail {
    let title = doc_full_text(document, &H1)
        .map(|title| title.replace(&profile.button_trigger, "").trim().to_string())
        .filter(|title| !title.is_empty());

    CameraDetail {
        title,
        description: doc_full_text(document, &H2),
        source: doc_full_text(document, &FIGCAPTION_LINKS),
    }
}
