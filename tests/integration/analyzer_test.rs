// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{build_analyzer, test_settings};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn full_analysis_of_a_healthy_page() {
    let server = MockServer::start().await;
    let html = r#"
        <html lang="en"><head>
        <title>Acme Shop - Handmade Furniture For Modern Homes</title>
        <meta name="description" content="Acme Shop builds handmade oak furniture.">
        <meta name="viewport" content="width=device-width">
        </head><body>
        <h1>Welcome</h1>
        <p>Write to owner@acme-furniture.com or call (415) 555-2671.</p>
        <a href="/contact">Contact us</a>
        <a href="https://www.facebook.com/acmefurniture">Facebook</a>
        <link href="/wp-content/themes/acme.css">
        </body></html>
    "#;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("strict-transport-security", "max-age=63072000"),
        )
        .mount(&server)
        .await;

    let analyzer = build_analyzer(&test_settings());
    let report = analyzer.analyze(&server.uri(), TIMEOUT, None).await;

    assert_eq!(report.status, "Active");
    assert_eq!(report.platform, "WordPress");
    assert_eq!(report.emails, vec!["owner@acme-furniture.com".to_string()]);
    assert_eq!(report.phones, vec!["4155552671".to_string()]);
    assert_eq!(report.has_hsts, "Yes");
    assert_eq!(report.has_contact_page, "Yes");
    assert_eq!(report.contact_pages[0].link_text, "Contact us");
    assert_eq!(report.has_facebook, "Yes");
    assert_eq!(report.has_tiktok, "No");
    assert_eq!(report.has_title, "Yes");
    assert!(report.error.is_none());
}

#[tokio::test]
async fn contact_page_fallback_supplies_emails() {
    let server = MockServer::start().await;
    let homepage = r#"
        <html><body>
        <h1>No address here</h1>
        <a href="/contact">Contact</a>
        </body></html>
    "#;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(homepage))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>Reach our team: support@biz.com</p>"),
        )
        .mount(&server)
        .await;

    let analyzer = build_analyzer(&test_settings());
    let report = analyzer.analyze(&server.uri(), TIMEOUT, None).await;

    assert_eq!(report.emails, vec!["support@biz.com".to_string()]);
    assert_eq!(report.status, "Active");
}

#[tokio::test]
async fn unreachable_domain_becomes_an_error_report() {
    let analyzer = build_analyzer(&test_settings());
    let report = analyzer.analyze("127.0.0.1:1", TIMEOUT, None).await;

    assert_eq!(report.status, "Error");
    assert_eq!(report.platform, "Error");
    assert!(report.error.is_some());
    assert!(report.emails.is_empty());
    assert_eq!(report.seo_grade, "F");
}

#[tokio::test]
async fn non_200_status_reports_not_accessible() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let analyzer = build_analyzer(&test_settings());
    let report = analyzer.analyze(&server.uri(), TIMEOUT, None).await;

    assert_eq!(report.status, "Not Accessible (403)");
    assert!(report.error.is_none());
}

#[tokio::test]
async fn priority_rules_reorder_discovered_emails() {
    let server = MockServer::start().await;
    let html = "zara@acme-furniture.com paul@acme-furniture.com";
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;

    let analyzer = build_analyzer(&test_settings());
    let rules = vec!["paul@".to_string()];
    let report = analyzer.analyze(&server.uri(), TIMEOUT, Some(&rules)).await;

    assert_eq!(
        report.emails,
        vec![
            "paul@acme-furniture.com".to_string(),
            "zara@acme-furniture.com".to_string()
        ]
    );
}
