// Tests for run summaries

use lookout_core::blueprint::{Blueprint, Endpoint};
use lookout_core::camera::Camera;
use lookout_core::dataset::CameraDataset;
use lookout_core::report::{generate_discovery_report, generate_scrape_report};
use lookout_scanner::{CategoryLink, StreamSource};
use std::collections::BTreeMap;

fn endpoint(labels: &[&str], n: usize) -> Endpoint {
    let path: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
    Endpoint::from_path(&path, format!("https://tw.live/e{}/", n), " - ").unwrap()
}

#[test]
fn test_discovery_report_counts_kinds() {
    let mut categories = BTreeMap::new();
    categories.insert(
        "市區".to_string(),
        vec![CategoryLink::new("台北市", "https://tw.live/taipei/")],
    );
    let blueprint = Blueprint::new(
        categories,
        vec![
            endpoint(&["國道"], 1),
            endpoint(&["市區", "台北市"], 2),
            endpoint(&["市區", "台北市", "中正區"], 3),
            endpoint(&["市區", "台北市", "大安區"], 4),
        ],
        "https://tw.live",
    );

    let report = generate_discovery_report(&blueprint);

    assert!(report.contains("DISCOVERY SUMMARY"));
    assert!(report.contains("Endpoints:    4"));
    assert!(report.contains("direct     1"));
    assert!(report.contains("sub        1"));
    assert!(report.contains("sub_sub    2"));
    assert!(report.contains("市區: 1 sub-categories"));
    assert!(report.contains("市區 - 台北市 - 中正區 (https://tw.live/e3/)"));
}

#[test]
fn test_discovery_report_truncates_endpoint_list() {
    let endpoints = (0..13).map(|n| endpoint(&["國道"], n)).collect();
    let blueprint = Blueprint::new(BTreeMap::new(), endpoints, "https://tw.live");

    let report = generate_discovery_report(&blueprint);

    assert!(report.contains("(https://tw.live/e9/)"));
    assert!(!report.contains("(https://tw.live/e10/)"));
    assert!(report.contains("... and 3 more endpoints"));
    assert!(!report.contains("CATEGORIES"));
}

#[test]
fn test_scrape_report_breakdowns() {
    let cameras = vec![
        Camera::builder("a", "A", "國道", "https://tw.live/cam/?id=a")
            .thumbnail(Some("https://cctv.example/a.jpg".to_string()))
            .build()
            .unwrap(),
        Camera::builder("b", "B", "國道", "https://tw.live/cam/?id=b")
            .stream(StreamSource::Youtube {
                youtube_id: "vid".to_string(),
            })
            .build()
            .unwrap(),
        Camera::builder("c", "C", "市區", "https://tw.live/cam/?id=c")
            .thumbnail(Some("https://cctv.example/c.jpg".to_string()))
            .build()
            .unwrap(),
    ];
    let dataset = CameraDataset::new(cameras, "https://tw.live", Some("blueprint-based"));

    let report = generate_scrape_report(&dataset);

    assert!(report.contains("Cameras:      3"));
    assert!(report.contains("Method:       blueprint-based"));
    assert!(report.contains("image      2"));
    assert!(report.contains("youtube    1"));
    assert!(report.contains("國道: 2"));
    assert!(report.contains("市區: 1"));
}

#[test]
fn test_scrape_report_empty_dataset() {
    let dataset = CameraDataset::new(vec![], "https://tw.live", None);
    let report = generate_scrape_report(&dataset);

    assert!(report.contains("Cameras:      0"));
    assert!(!report.contains("BY STREAM TYPE"));
    assert!(!report.contains("Method:"));
}
