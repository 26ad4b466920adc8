//! In-process scenario tests for odk-daemon read-only HTTP endpoints.
//!
//! These tests spin up the Axum router **without** binding a TCP socket.
//! Each test calls `routes::build_router` and drives it via
//! `tower::ServiceExt::oneshot` — no network I/O required.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt; // oneshot

use odk_config::DaemonConfig;
use odk_daemon::{routes, state};
use odk_refdata::{CatalogEntry, NamedEntry, ProductInfo, RefdataBuilder, RefdataStore};
use odk_schemas::{CompanyInfo, ContactInfo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entry(id: &str, name: &str) -> NamedEntry {
    NamedEntry {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn contact(name: &str, company: &str) -> ContactInfo {
    ContactInfo {
        name: name.to_string(),
        title: String::new(),
        company_name: company.to_string(),
        address_line1: "1 Main St".to_string(),
        address_line2: String::new(),
        tel: "555-0100".to_string(),
        email: String::new(),
    }
}

fn sample_refdata() -> RefdataStore {
    RefdataBuilder::new()
        .manufacturers(vec![entry("acme", "Acme Bottling"), entry("globex", "Globex")])
        .ship_to(vec![entry("wh1", "Warehouse One")])
        .authorized_by(vec![entry("jd", "J. Director")])
        .product_families(vec![entry("gin", "Gin"), entry("rum", "Rum")])
        .shipping_methods(vec![entry("sea", "Sea freight")])
        .terms(vec![entry("net30", "Net 30")])
        .family_product(
            "gin",
            ProductInfo {
                id: "p1".to_string(),
                name: "Dry Gin 750ml".to_string(),
                sku: "GIN-750".to_string(),
                barcode: String::new(),
            },
        )
        .family_product(
            "rum",
            ProductInfo {
                id: "p2".to_string(),
                name: "Dark Rum 750ml".to_string(),
                sku: "RUM-750".to_string(),
                barcode: String::new(),
            },
        )
        .price("acme", "gin", "p1", 1_000)
        .other_item(
            "acme",
            CatalogEntry {
                id: "crate".to_string(),
                name: "Shipping crate".to_string(),
                sku: "CRT-01".to_string(),
                barcode: String::new(),
                price_cents: 750,
            },
        )
        .company(CompanyInfo {
            name: "Orderdesk Imports".to_string(),
            address_line1: "42 Harbor Rd".to_string(),
            address_line2: String::new(),
            phone: "555-0199".to_string(),
        })
        .manufacturer_contact("acme", contact("Ann Acme", "Acme Bottling"))
        .ship_to_contact("wh1", contact("Wes House", "Warehouse One"))
        .build()
}

/// Build a fresh in-process router backed by a clean AppState.
fn make_router() -> axum::Router {
    let config = DaemonConfig::from_lookup(|_| None).unwrap();
    let st = Arc::new(state::AppState::new(config, sample_refdata()));
    routes::build_router(st)
}

/// Drive the router with a single request and return (status, body_bytes).
async fn call(router: axum::Router, req: Request<axum::body::Body>) -> (StatusCode, bytes::Bytes) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    (status, body)
}

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

fn parse_json(b: bytes::Bytes) -> serde_json::Value {
    serde_json::from_slice(&b).expect("body is not valid JSON")
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_200_ok_true() {
    let (status, body) = call(make_router(), get("/v1/health")).await;
    assert_eq!(status, StatusCode::OK);

    let json = parse_json(body);
    assert_eq!(json["ok"], true);
    assert_eq!(json["service"], "odk-daemon");
}

// ---------------------------------------------------------------------------
// GET /v1/refdata/*
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refdata_option_lists_are_served() {
    for (uri, expected_first_id) in [
        ("/v1/refdata/manufacturers", "acme"),
        ("/v1/refdata/ship-to", "wh1"),
        ("/v1/refdata/authorized-by", "jd"),
        ("/v1/refdata/product-families", "gin"),
        ("/v1/refdata/shipping-methods", "sea"),
        ("/v1/refdata/terms", "net30"),
    ] {
        let (status, body) = call(make_router(), get(uri)).await;
        assert_eq!(status, StatusCode::OK, "uri: {uri}");
        let json = parse_json(body);
        assert_eq!(json[0]["id"], expected_first_id, "uri: {uri}");
    }
}

#[tokio::test]
async fn product_families_filter_by_manufacturer() {
    // acme prices only gin; the filtered list drops rum.
    let (status, body) = call(
        make_router(),
        get("/v1/refdata/product-families?manufacturer=acme"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = parse_json(body);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], "gin");

    // Unknown manufacturer: empty list, not an error.
    let (status, body) = call(
        make_router(),
        get("/v1/refdata/product-families?manufacturer=initech"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(parse_json(body).as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// GET /v1/catalog/:manufacturer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn catalog_joins_families_with_prices() {
    let (status, body) = call(make_router(), get("/v1/catalog/acme?families=gin,rum")).await;
    assert_eq!(status, StatusCode::OK);

    let json = parse_json(body);
    // p2 has no acme price and is excluded from the catalog.
    assert_eq!(json["catalog"].as_array().unwrap().len(), 1);
    assert_eq!(json["catalog"][0]["id"], "p1");
    assert_eq!(json["catalog"][0]["price_cents"], 1_000);
    assert_eq!(json["other_items"][0]["id"], "crate");
}

#[tokio::test]
async fn catalog_without_families_serves_other_items_only() {
    let (status, body) = call(make_router(), get("/v1/catalog/acme")).await;
    assert_eq!(status, StatusCode::OK);

    let json = parse_json(body);
    assert!(json["catalog"].as_array().unwrap().is_empty());
    assert_eq!(json["other_items"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Unknown routes / methods
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let (status, _) = call(make_router(), get("/v1/does_not_exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forward_rejects_non_post_with_405() {
    let (status, _) = call(make_router(), get("/v1/forward")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
