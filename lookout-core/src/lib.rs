pub mod blueprint;
pub mod camera;
pub mod dataset;
pub mod discover;
pub mod error;
pub mod extract;
pub mod report;
pub mod scrape;
pub mod viewer;

mod store;

use colored::Colorize;

pub use blueprint::{Blueprint, BlueprintMetadata, Endpoint, EndpointKind};
pub use camera::{Camera, CameraBuilder};
pub use dataset::{CameraDataset, DatasetMetadata};
pub use discover::{CategoryDiscoverer, DiscoveryOptions, ProgressCallback};
pub use error::CoreError;
pub use extract::CameraExtractor;
pub use scrape::{ScrapeOptions, ScrapeOrchestrator};
pub use viewer::ViewerConfig;

/// Local time in the `%Y-%m-%d %H:%M:%S` form used by every artifact.
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn print_banner() {
    println!(
        "{} {}",
        "lookout".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!("{}", "live-camera catalogue crawler".bright_black());
    println!();
}
