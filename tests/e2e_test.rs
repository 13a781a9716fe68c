//! End-to-end test: boots the real HTTP server (in-memory store) on a free
//! port and drives the catalog through `reqwest`.
//!
//!   cargo test --test e2e_test

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use chrono::{DateTime, FixedOffset};
use product_catalog::domain::ports::ProductRepository;
use product_catalog::infrastructure::memory_repo::InMemoryProductRepository;
use product_catalog::{build_server, ProductService};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

fn free_port() -> u16 {
    // Bind to port 0 to let the OS assign a free port, then release it.
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind failed")
        .local_addr()
        .expect("addr failed")
        .port()
}

/// Wait until `url` answers, retrying every `interval` for up to `timeout`.
async fn wait_for_http(client: &Client, url: &str, timeout: Duration, interval: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if tokio::time::Instant::now() > deadline {
            panic!("server at {} did not become ready within {:?}", url, timeout);
        }
        // Any HTTP response (even 4xx) means the server is up.
        if client.get(url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(interval).await;
    }
}

async fn start_server() -> (String, actix_web::dev::ServerHandle) {
    let port = free_port();
    let repo: Arc<dyn ProductRepository> = Arc::new(InMemoryProductRepository::new());
    let service = web::Data::new(ProductService::new(repo));

    let server = build_server(service, "127.0.0.1", port).expect("Failed to bind server");
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://127.0.0.1:{}", port), handle)
}

fn timestamp(body: &Value, field: &str) -> DateTime<FixedOffset> {
    let raw = body[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing {field}"));
    DateTime::parse_from_rfc3339(raw).expect("RFC 3339 timestamp")
}

async fn create(client: &Client, base: &str, name: &str, brand: &str, price: &str) -> StatusCode {
    client
        .post(format!("{}/api/products", base))
        .json(&json!({ "name": name, "brand": brand, "price": price }))
        .send()
        .await
        .expect("Failed to POST /api/products")
        .status()
}

#[actix_web::test]
async fn product_lifecycle_over_http() {
    let (base, handle) = start_server().await;
    let http = Client::new();
    wait_for_http(
        &http,
        &format!("{}/api/products", base),
        Duration::from_secs(10),
        Duration::from_millis(50),
    )
    .await;

    // ── 1. Create ────────────────────────────────────────────────────────────
    let resp = http
        .post(format!("{}/api/products", base))
        .json(&json!({ "name": "Phone", "brand": "Acme", "price": "100" }))
        .send()
        .await
        .expect("Failed to POST /api/products");

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/api/products/1")
    );
    assert!(
        resp.headers().contains_key("x-request-id"),
        "every response should carry a request id"
    );
    let created: Value = resp.json().await.expect("create body");
    assert_eq!(created["id"], 1);
    assert_eq!(timestamp(&created, "createdAt"), timestamp(&created, "updatedAt"));

    // ── 2. Duplicate (Name, Brand) ───────────────────────────────────────────
    assert_eq!(
        create(&http, &base, "phone", "ACME", "120").await,
        StatusCode::CONFLICT
    );

    // ── 3. Update price ──────────────────────────────────────────────────────
    tokio::time::sleep(Duration::from_millis(5)).await;
    let resp = http
        .put(format!("{}/api/products/1", base))
        .json(&json!({ "name": "Phone", "brand": "Acme", "price": "50" }))
        .send()
        .await
        .expect("Failed to PUT /api/products/1");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("update body");
    assert_eq!(updated["price"], "50");
    assert_eq!(
        timestamp(&updated, "createdAt"),
        timestamp(&created, "createdAt")
    );
    assert!(timestamp(&updated, "updatedAt") > timestamp(&created, "updatedAt"));

    // ── 4. Delete twice, then read ───────────────────────────────────────────
    for expected in [StatusCode::NO_CONTENT, StatusCode::NOT_FOUND] {
        let status = http
            .delete(format!("{}/api/products/1", base))
            .send()
            .await
            .expect("Failed to DELETE /api/products/1")
            .status();
        assert_eq!(status, expected);
    }

    let resp = http
        .get(format!("{}/api/products/1", base))
        .send()
        .await
        .expect("Failed to GET /api/products/1");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("not found body");
    assert_eq!(body["message"], "Product with ID 1 not found.");

    handle.stop(true).await;
}

#[actix_web::test]
async fn pages_partition_the_filtered_listing() {
    let (base, handle) = start_server().await;
    let http = Client::new();
    wait_for_http(
        &http,
        &format!("{}/api/products", base),
        Duration::from_secs(10),
        Duration::from_millis(50),
    )
    .await;

    for i in 0..12 {
        let status = create(&http, &base, &format!("Widget {i:02}"), "Acme", "9.99").await;
        assert_eq!(status, StatusCode::CREATED);
    }
    assert_eq!(
        create(&http, &base, "Gadget", "Other", "9.99").await,
        StatusCode::CREATED
    );

    let mut seen = HashSet::new();
    for page in 1..=4 {
        let body: Value = http
            .get(format!("{}/api/products", base))
            .query(&[("name", "widget"), ("pageSize", "5")])
            .query(&[("pageNumber", page)])
            .send()
            .await
            .expect("Failed to GET /api/products")
            .json()
            .await
            .expect("list body");

        assert_eq!(body["totalCount"], 12);
        let items = body["items"].as_array().expect("items array");
        assert!(items.len() <= 5);
        for item in items {
            let id = item["id"].as_i64().expect("id");
            assert!(seen.insert(id), "product {} listed twice", id);
        }
    }
    assert_eq!(seen.len(), 12);

    handle.stop(true).await;
}

#[actix_web::test]
async fn serves_openapi_document() {
    let (base, handle) = start_server().await;
    let http = Client::new();
    wait_for_http(
        &http,
        &format!("{}/api/products", base),
        Duration::from_secs(10),
        Duration::from_millis(50),
    )
    .await;

    let doc: Value = http
        .get(format!("{}/api-docs/openapi.json", base))
        .send()
        .await
        .expect("Failed to GET openapi.json")
        .json()
        .await
        .expect("openapi body");

    assert_eq!(doc["info"]["title"], "Product Catalog API");
    assert!(doc["paths"]["/api/products/{id}"].is_object());

    handle.stop(true).await;
}
