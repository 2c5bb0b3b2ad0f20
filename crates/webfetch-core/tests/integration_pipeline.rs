//! End-to-end pipeline tests through the public API, with wire-shape
//! assertions on the serialized results.

#![allow(clippy::unwrap_used, clippy::panic)]

use webfetch_core::{FetchOptions, LinkOptions, WebFetchEngine};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Field Guide</title>
  <meta name="description" content="Identifying common shorebirds.">
  <meta property="og:title" content="Field Guide">
  <meta property="og:type" content="article">
  <meta name="twitter:card" content="summary_large_image">
  <link rel="canonical" href="https://guide.example.com/shorebirds">
</head>
<body>
  <header><a href="/">Guide home</a></header>
  <main>
    <p>Sanderlings chase the surf line in winter plumage, while dunlins probe
    the mudflats nearby. Telling a sanderling from a dunlin takes practice
    and a decent pair of binoculars.</p>
  </main>
  <a href="./waders">More waders</a>
  <a href="#top">Back to top</a>
  <a href="https://birds.example.org/atlas">Atlas</a>
</body>
</html>"##;

async fn start_fixture_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shorebirds"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FIXTURE, "text/html; charset=utf-8"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn fetch_webpage_wire_shape() {
    let server = start_fixture_server().await;
    let engine = WebFetchEngine::new().unwrap();

    let capture = engine
        .fetch_webpage(
            &format!("{}/shorebirds", server.uri()),
            &FetchOptions::default(),
        )
        .await
        .unwrap();

    let json = serde_json::to_value(&capture).unwrap();
    assert_eq!(json["status_code"], 200);
    assert_eq!(json["url"], format!("{}/shorebirds", server.uri()));
    assert_eq!(json["final_url"], json["url"]);
    assert_eq!(json["content"]["extraction_method"], "structured");
    assert_eq!(json["metadata"]["title"], "Field Guide");
    assert_eq!(json["metadata"]["open_graph"]["og:type"], "article");
    assert_eq!(
        json["metadata"]["twitter_card"]["twitter:card"],
        "summary_large_image"
    );
    // The raw body never leaks into serialized output
    assert!(json.get("body").is_none());
    assert!(json.get("raw_html").is_none());
}

#[tokio::test]
async fn batch_report_wire_shape() {
    let server = start_fixture_server().await;
    let engine = WebFetchEngine::new().unwrap();

    let urls = vec![
        format!("{}/shorebirds", server.uri()),
        "ftp://wrong.example/scheme".to_string(),
    ];
    let report = engine
        .fetch_multiple_pages(urls, &FetchOptions::default(), 2)
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["total_urls"], 2);
    assert_eq!(json["successful"], 1);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["results"][0]["status"], "ok");
    assert_eq!(json["results"][1]["status"], "failed");
    assert_eq!(json["results"][1]["kind"], "invalid_url");
}

#[tokio::test]
async fn search_and_links_over_one_fixture() {
    let server = start_fixture_server().await;
    let engine = WebFetchEngine::new().unwrap();
    let url = format!("{}/shorebirds", server.uri());

    let search = engine
        .search_webpage_content(&url, &["sanderling".to_string()], false, 12, None)
        .await
        .unwrap();
    // "Sanderlings" and "sanderling" both match case-insensitively
    assert_eq!(search.total_matches, 2);
    assert!(search.matches[0].context.contains("Sanderling"));

    let links = engine
        .extract_links(&url, LinkOptions::default(), None)
        .await
        .unwrap();
    // Anchor link dropped by default: header link, ./waders, atlas remain
    assert_eq!(links.total_links, 3);
    assert_eq!(links.internal_count, 2);
    assert_eq!(links.external_count, 1);
    assert!(
        links
            .links
            .iter()
            .any(|l| l.href.ends_with("/waders") && l.text == "More waders")
    );

    let with_anchors = engine
        .extract_links(
            &url,
            LinkOptions {
                include_anchors: true,
                ..LinkOptions::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(with_anchors.total_links, 4);
    assert!(with_anchors.links.iter().any(|l| l.is_anchor));
}

#[tokio::test]
async fn metadata_report_is_idempotent() {
    let server = start_fixture_server().await;
    let engine = WebFetchEngine::new().unwrap();
    let url = format!("{}/shorebirds", server.uri());

    let first = engine.get_page_metadata(&url, None).await.unwrap();
    let second = engine.get_page_metadata(&url, None).await.unwrap();

    assert_eq!(first.metadata, second.metadata);
    assert_eq!(
        serde_json::to_vec(&first.metadata).unwrap(),
        serde_json::to_vec(&second.metadata).unwrap()
    );
    assert_eq!(
        first.metadata.canonical_url.as_deref(),
        Some("https://guide.example.com/shorebirds")
    );
}
