// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{build_limiter, build_pool, test_settings};
use scoutrs::engines::fetcher::Fetcher;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn fetches_a_page_with_explicit_scheme() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>hello</html>")
                .insert_header("x-frame-options", "DENY"),
        )
        .mount(&server)
        .await;

    let settings = test_settings();
    let fetcher = Fetcher::new(build_limiter(&settings));
    let client = build_pool(&settings).session().expect("client");

    let page = fetcher
        .fetch(&client, &server.uri(), TIMEOUT)
        .await
        .expect("fetch should succeed");

    assert_eq!(page.status_code, 200);
    assert_eq!(page.content, "<html>hello</html>");
    assert!(!page.is_https);
    assert!(page.final_url.starts_with("http://"));
    assert_eq!(page.headers.get("x-frame-options").map(String::as_str), Some("DENY"));
}

#[tokio::test]
async fn bare_domain_falls_back_from_https_to_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain http"))
        .mount(&server)
        .await;

    // The mock server only speaks plain HTTP, so the HTTPS candidate
    // fails at the TLS handshake and the HTTP candidate wins.
    let bare_domain = server.address().to_string();

    let settings = test_settings();
    let fetcher = Fetcher::new(build_limiter(&settings));
    let client = build_pool(&settings).session().expect("client");

    let page = fetcher
        .fetch(&client, &bare_domain, TIMEOUT)
        .await
        .expect("http fallback should succeed");

    assert!(!page.is_https);
    assert_eq!(page.status_code, 200);
    assert_eq!(page.content, "plain http");
}

#[tokio::test]
async fn http_error_status_is_still_a_successful_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let settings = test_settings();
    let fetcher = Fetcher::new(build_limiter(&settings));
    let client = build_pool(&settings).session().expect("client");

    let page = fetcher
        .fetch(&client, &server.uri(), TIMEOUT)
        .await
        .expect("status errors do not trigger fallback");
    assert_eq!(page.status_code, 503);
}

#[tokio::test]
async fn exhausted_candidates_return_the_last_error() {
    let settings = test_settings();
    let fetcher = Fetcher::new(build_limiter(&settings));
    let client = build_pool(&settings).session().expect("client");

    // Nothing listens on port 1
    let result = fetcher.fetch(&client, "127.0.0.1:1", TIMEOUT).await;
    let error = result.expect_err("both candidates must fail");
    assert!(error.to_string().contains("127.0.0.1:1"));
}

#[tokio::test]
async fn redirects_are_followed_to_the_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/landing"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("landed"))
        .mount(&server)
        .await;

    let settings = test_settings();
    let fetcher = Fetcher::new(build_limiter(&settings));
    let client = build_pool(&settings).session().expect("client");

    let page = fetcher
        .fetch(&client, &server.uri(), TIMEOUT)
        .await
        .expect("redirect should be followed");
    assert_eq!(page.status_code, 200);
    assert!(page.final_url.ends_with("/landing"));
    assert_eq!(page.content, "landed");
}
