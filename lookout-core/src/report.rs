// Plain-text summaries printed after each phase

use crate::blueprint::{Blueprint, EndpointKind};
use crate::dataset::CameraDataset;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const ENDPOINT_PREVIEW: usize = 10;

fn section(report: &mut String, title: &str) {
    report.push_str(DIVIDER);
    report.push_str(title);
    report.push('\n');
    report.push_str(DIVIDER);
    report.push('\n');
}

pub fn generate_discovery_report(blueprint: &Blueprint) -> String {
    let mut report = String::new();

    section(&mut report, "DISCOVERY SUMMARY");
    report.push_str(&format!("Source:       {}\n", blueprint.metadata.source));
    report.push_str(&format!("Generated:    {}\n", blueprint.metadata.last_updated));
    report.push_str(&format!("Categories:   {}\n", blueprint.metadata.total_categories));
    report.push_str(&format!("Endpoints:    {}\n", blueprint.metadata.total_endpoints));

    for kind in [EndpointKind::Direct, EndpointKind::Sub, EndpointKind::SubSub] {
        let count = blueprint.endpoints_of_kind(kind).count();
        report.push_str(&format!("  {:<10} {}\n", kind.as_str(), count));
    }
    report.push('\n');

    if !blueprint.categories.is_empty() {
        section(&mut report, "CATEGORIES");
        for (label, children) in &blueprint.categories {
            report.push_str(&format!("  {}: {} sub-categories\n", label, children.len()));
        }
        report.push('\n');
    }

    if !blueprint.endpoints.is_empty() {
        section(&mut report, "ENDPOINTS");
        for endpoint in blueprint.endpoints.iter().take(ENDPOINT_PREVIEW) {
            report.push_str(&format!("  {} ({})\n", endpoint.name, endpoint.url));
        }
        if blueprint.endpoints.len() > ENDPOINT_PREVIEW {
            report.push_str(&format!(
                "  ... and {} more endpoints\n",
                blueprint.endpoints.len() - ENDPOINT_PREVIEW
            ));
        }
        report.push('\n');
    }

    report
}

pub fn generate_scrape_report(dataset: &CameraDataset) -> String {
    let mut report = String::new();

    section(&mut report, "SCRAPE SUMMARY");
    report.push_str(&format!("Source:       {}\n", dataset.metadata.source));
    report.push_str(&format!("Generated:    {}\n", dataset.metadata.last_updated));
    if let Some(ref method) = dataset.metadata.method {
        report.push_str(&format!("Method:       {}\n", method));
    }
    report.push_str(&format!("Cameras:      {}\n\n", dataset.metadata.total_count));

    if dataset.cameras.is_empty() {
        return report;
    }

    section(&mut report, "BY STREAM TYPE");
    for (kind, count) in dataset.count_by_kind() {
        report.push_str(&format!("  {:<10} {}\n", kind.as_str(), count));
    }
    report.push('\n');

    section(&mut report, "BY CATEGORY");
    for (category, count) in dataset.count_by_category() {
        report.push_str(&format!("  {}: {}\n", category, count));
    }
    report.push('\n');

    report
}
