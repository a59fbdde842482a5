// Tests for turning endpoint listings into camera records

use lookout_core::CameraExtractor;
use lookout_core::blueprint::Endpoint;
use lookout_scanner::{Fetcher, SiteProfile, StreamKind, StreamSource};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(format!("<html><body>{}</body></html>", body))
}

fn stack(href: &str, label: Option<&str>, thumbnail: &str) -> String {
    let label = label.map(|l| format!("<p>{}</p>", l)).unwrap_or_default();
    format!(
        r#"<div class="cctv-stack"><a href="{href}"><img src="/lazy.gif" data-src="{thumbnail}"></a>{label}</div>"#
    )
}

async fn mount_listing(server: &MockServer, stacks: &[String]) {
    Mock::given(method("GET"))
        .and(path("/list/"))
        .respond_with(html(&stacks.concat()))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, id: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/cam/"))
        .and(query_param("id", id))
        .respond_with(html(body))
        .expect(hits)
        .mount(server)
        .await;
}

fn profile(server: &MockServer) -> SiteProfile {
    SiteProfile::new(&server.uri()).unwrap()
}

fn fetcher() -> Fetcher {
    Fetcher::new().unwrap().with_visit_tracking(false)
}

fn endpoint(server: &MockServer, name: &str) -> Endpoint {
    Endpoint::from_path(
        &[name.to_string()],
        format!("{}/list/", server.uri()),
        " - ",
    )
    .unwrap()
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_blocks_without_id_are_skipped() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[
            stack("/about/", Some("About"), "https://cctv.example/a.jpg"),
            stack("/cam/?id=ok1", Some("Gate"), "https://cctv.example/1.jpg"),
            stack("/cam/?id=", Some("Empty"), "https://cctv.example/2.jpg"),
        ],
    )
    .await;

    let profile = profile(&server);
    let extractor = CameraExtractor::new(&profile);
    let listings = extractor
        .listings(&mut fetcher(), &format!("{}/list/", server.uri()))
        .await;

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, "ok1");
    assert_eq!(listings[0].url, format!("{}/cam/?id=ok1", server.uri()));
}

#[tokio::test]
async fn test_failed_endpoint_yields_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let profile = profile(&server);
    let cameras = CameraExtractor::new(&profile)
        .extract_endpoint(&mut fetcher(), &endpoint(&server, "國道"))
        .await;
    assert!(cameras.is_empty());
}

// ============================================================================
// Stream classification
// ============================================================================

#[tokio::test]
async fn test_plain_thumbnail_is_image() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[stack("/cam/?id=img7", Some("Harbor"), "https://cctv.example/7.jpg")],
    )
    .await;
    mount_detail(&server, "img7", "<h1>unused</h1>", 0).await;

    let profile = profile(&server);
    let cameras = CameraExtractor::new(&profile)
        .extract_endpoint(&mut fetcher(), &endpoint(&server, "港口"))
        .await;

    assert_eq!(cameras.len(), 1);
    let camera = &cameras[0];
    assert_eq!(camera.name, "Harbor");
    assert_eq!(camera.category, "港口");
    assert_eq!(camera.location.as_deref(), Some("港口"));
    assert_eq!(
        camera.stream,
        StreamSource::Image {
            image_url: "https://cctv.example/7.jpg".to_string()
        }
    );
    assert_eq!(camera.description, None);
}

#[tokio::test]
async fn test_video_thumbnail_becomes_youtube() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[stack(
            "/cam/?id=yt1",
            Some("Lake"),
            "https://img.youtube.com/vi/abcDEF123/default.jpg",
        )],
    )
    .await;
    mount_detail(&server, "yt1", "<h1>unused</h1>", 0).await;

    let profile = profile(&server);
    let cameras = CameraExtractor::new(&profile)
        .extract_endpoint(&mut fetcher(), &endpoint(&server, "風景區"))
        .await;

    let camera = &cameras[0];
    assert_eq!(
        camera.stream,
        StreamSource::Youtube {
            youtube_id: "abcDEF123".to_string()
        }
    );
    assert_eq!(camera.description.as_deref(), Some("風景區 live"));

    let json = serde_json::to_value(camera).unwrap();
    assert_eq!(json["type"], "youtube");
    assert_eq!(json["youtubeId"], "abcDEF123");
    assert!(json.get("imageUrl").is_none());
}

#[tokio::test]
async fn test_placeholder_resolved_to_playlist() {
    let server = MockServer::start().await;
    let placeholder = format!("{}/assets/thumbnail.png", server.uri());
    mount_listing(
        &server,
        &[stack("/cam/?id=cam42", Some("North Bridge"), &placeholder)],
    )
    .await;
    mount_detail(
        &server,
        "cam42",
        r#"<video><source type="application/x-mpegURL" src="stream.m3u8"></video>"#,
        1,
    )
    .await;

    let profile = profile(&server);
    let cameras = CameraExtractor::new(&profile)
        .extract_endpoint(&mut fetcher(), &endpoint(&server, "市區"))
        .await;

    let camera = &cameras[0];
    assert_eq!(camera.id, "cam42");
    assert_eq!(
        camera.stream,
        StreamSource::Hls {
            hls_url: "stream.m3u8".to_string()
        }
    );

    let json = serde_json::to_value(camera).unwrap();
    assert_eq!(json["type"], "hls");
    assert_eq!(json["hlsUrl"], "stream.m3u8");
    assert!(json.get("imageUrl").is_none());
}

#[tokio::test]
async fn test_placeholder_without_playlist_stays_image() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[stack("/cam/?id=cam43", Some("South Bridge"), "/assets/thumbnail.png")],
    )
    .await;
    mount_detail(&server, "cam43", "<h1>No stream</h1>", 1).await;

    let profile = profile(&server);
    let cameras = CameraExtractor::new(&profile)
        .extract_endpoint(&mut fetcher(), &endpoint(&server, "市區"))
        .await;

    assert_eq!(cameras[0].kind(), StreamKind::Image);
    assert_eq!(cameras[0].stream.locator(), Some("/assets/thumbnail.png"));
}

#[tokio::test]
async fn test_missing_thumbnail_is_unknown() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[r#"<div class="cctv-stack"><a href="/cam/?id=bare"></a><p>Bare</p></div>"#.to_string()],
    )
    .await;

    let profile = profile(&server);
    let cameras = CameraExtractor::new(&profile)
        .extract_endpoint(&mut fetcher(), &endpoint(&server, "其他"))
        .await;

    assert_eq!(cameras[0].kind(), StreamKind::Unknown);
    assert_eq!(cameras[0].thumbnail, None);
    let json = serde_json::to_value(&cameras[0]).unwrap();
    assert_eq!(json["type"], "unknown");
}

// ============================================================================
// Detail inspection
// ============================================================================

#[tokio::test]
async fn test_deep_mode_reclassifies_from_detail_page() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[stack("/cam/?id=img8", None, "https://cctv.example/8.jpg")],
    )
    .await;
    mount_detail(
        &server,
        "img8",
        r#"<h1>Harbor Gate 即時影像</h1><h2>Port entrance</h2>
           <figure><figcaption>來源 <a href="https://port.example">Port <b>Authority</b></a></figcaption></figure>
           <iframe src="https://www.youtube.com/embed/zzTop_9"></iframe>"#,
        1,
    )
    .await;

    let profile = profile(&server);
    let cameras = CameraExtractor::new(&profile)
        .with_detail_inspection(true)
        .extract_endpoint(&mut fetcher(), &endpoint(&server, "港口"))
        .await;

    let camera = &cameras[0];
    assert_eq!(camera.name, "Harbor Gate");
    assert_eq!(camera.description.as_deref(), Some("Port entrance"));
    assert_eq!(camera.source.as_deref(), Some("Port Authority"));
    assert_eq!(
        camera.stream,
        StreamSource::Youtube {
            youtube_id: "zzTop_9".to_string()
        }
    );
}

#[tokio::test]
async fn test_unlabelled_block_uses_fallback_name() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[stack("/cam/?id=nolabel", None, "https://cctv.example/9.jpg")],
    )
    .await;

    let profile = profile(&server);
    let cameras = CameraExtractor::new(&profile)
        .extract_endpoint(&mut fetcher(), &endpoint(&server, "港口"))
        .await;

    assert_eq!(cameras[0].name, "未知監控點");
}

#[tokio::test]
async fn test_deep_mode_keeps_playlist_over_image() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[stack("/cam/?id=cam44", Some("Tunnel"), "/assets/thumbnail.png")],
    )
    .await;
    mount_detail(
        &server,
        "cam44",
        r#"<video><source type="application/x-mpegURL" src="/live/44.m3u8"></video>
           <img src="https://cctv.example/still/44.jpg">"#,
        1,
    )
    .await;

    let profile = profile(&server);
    let cameras = CameraExtractor::new(&profile)
        .with_detail_inspection(true)
        .extract_endpoint(&mut fetcher(), &endpoint(&server, "隧道"))
        .await;

    assert_eq!(
        cameras[0].stream,
        StreamSource::Hls {
            hls_url: "/live/44.m3u8".to_string()
        }
    );
}
