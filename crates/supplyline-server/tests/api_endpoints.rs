//! End-to-end API tests over a real listener.
//!
//! Each test spawns the service on an ephemeral port with an in-memory
//! store and speaks raw HTTP/1.1 so status lines, headers, and bodies are
//! asserted exactly as a client sees them.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use supplyline_server::app_state::AppState;
use supplyline_server::auth::sha256_hex;
use supplyline_server::config;
use supplyline_server::router::build_router;
use supplyline_server::store::SqliteStore;

const USER: &str = "alice";
const PASSWORD: &str = "opensesame";

async fn spawn_app() -> SocketAddr {
    let yaml = format!(
        r#"
version: 1
database:
  url: "sqlite::memory:"
auth:
  users:
    - username: "{USER}"
      password_sha256: "{digest}"
"#,
        digest = sha256_hex(PASSWORD.as_bytes())
    );
    let cfg = config::load_from_str(&yaml).expect("test config");
    let store = SqliteStore::connect(&cfg.database).await.expect("store");
    let state = AppState::new(&cfg, store);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn send(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");

    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    if let Some(body) = body {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", body.len()));
        req.push_str("\r\n");
        req.push_str(body);
    } else {
        req.push_str("\r\n");
    }

    stream.write_all(req.as_bytes()).await.expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");

    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

async fn login(addr: SocketAddr) -> String {
    let body = json!({"username": USER, "password": PASSWORD}).to_string();
    let (status, _, resp) = send(addr, "POST", "/token", &[], Some(&body)).await;
    assert_eq!(status, 200, "login failed: {resp}");
    let json: Value = serde_json::from_str(&resp).expect("token json");
    json.get("token")
        .and_then(Value::as_str)
        .expect("token field")
        .to_string()
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn body_json(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

#[tokio::test]
async fn token_issuance_contract() {
    let addr = spawn_app().await;

    // Missing password.
    let (status, _, body) = send(
        addr,
        "POST",
        "/token",
        &[],
        Some(&json!({"username": USER}).to_string()),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body_json(&body)["error"], "BAD_REQUEST");

    // Wrong password.
    let (status, _, body) = send(
        addr,
        "POST",
        "/token",
        &[],
        Some(&json!({"username": USER, "password": "guess"}).to_string()),
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(body_json(&body)["error"], "AUTH_FAILED");

    // Repeated logins return the same opaque token.
    let first = login(addr).await;
    let second = login(addr).await;
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let addr = spawn_app().await;

    let (status, _, body) = send(addr, "GET", "/api/vendors", &[], None).await;
    assert_eq!(status, 401);
    assert_eq!(body_json(&body)["error"], "AUTH_FAILED");

    let (status, _, _) = send(
        addr,
        "GET",
        "/api/purchase_orders",
        &[("Authorization", "Bearer bogus")],
        None,
    )
    .await;
    assert_eq!(status, 401);

    let (status, _, _) = send(
        addr,
        "POST",
        "/api/vendors",
        &[],
        Some(&json!({"vendor_code": "ACME-1"}).to_string()),
    )
    .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn vendor_crud_round_trip() {
    let addr = spawn_app().await;
    let token = login(addr).await;
    let auth = bearer(&token);
    let auth_hdr: &[(&str, &str)] = &[("Authorization", &auth)];

    // Create.
    let (status, _, body) = send(
        addr,
        "POST",
        "/api/vendors",
        auth_hdr,
        Some(&json!({"name": "Acme Industrial", "vendor_code": "ACME-1"}).to_string()),
    )
    .await;
    assert_eq!(status, 201);
    let created = body_json(&body);
    let id = created["vendorID"].as_i64().expect("vendorID");
    assert_eq!(created["vendor_code"], "ACME-1");
    assert_eq!(created["on_time_delivery_rate"], Value::Null);

    // List.
    let (status, _, body) = send(addr, "GET", "/api/vendors", auth_hdr, None).await;
    assert_eq!(status, 200);
    assert_eq!(body_json(&body).as_array().map(Vec::len), Some(1));

    // Get.
    let (status, _, body) =
        send(addr, "GET", &format!("/api/vendors/{id}"), auth_hdr, None).await;
    assert_eq!(status, 200);
    assert_eq!(body_json(&body)["name"], "Acme Industrial");

    // Full update.
    let (status, _, body) = send(
        addr,
        "PUT",
        &format!("/api/vendors/{id}"),
        auth_hdr,
        Some(
            &json!({
                "name": "Acme Industrial Co",
                "vendor_code": "ACME-1",
                "address": "12 Forge Rd"
            })
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, 200);
    let updated = body_json(&body);
    assert_eq!(updated["name"], "Acme Industrial Co");
    assert_eq!(updated["address"], "12 Forge Rd");

    // Unknown id.
    let (status, _, body) = send(addr, "GET", "/api/vendors/999", auth_hdr, None).await;
    assert_eq!(status, 404);
    let err = body_json(&body);
    assert_eq!(err["error"], "NOT_FOUND");
    assert_eq!(err["message"], "Vendor not found");

    // Delete, then the entity is gone.
    let (status, _, _) =
        send(addr, "DELETE", &format!("/api/vendors/{id}"), auth_hdr, None).await;
    assert_eq!(status, 204);
    let (status, _, _) = send(addr, "GET", &format!("/api/vendors/{id}"), auth_hdr, None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn vendor_validation_reports_fields() {
    let addr = spawn_app().await;
    let token = login(addr).await;
    let auth = bearer(&token);
    let auth_hdr: &[(&str, &str)] = &[("Authorization", &auth)];

    let (status, _, body) = send(
        addr,
        "POST",
        "/api/vendors",
        auth_hdr,
        Some(&json!({"name": "No Code"}).to_string()),
    )
    .await;
    assert_eq!(status, 400);
    let err = body_json(&body);
    assert_eq!(err["error"], "VALIDATION_FAILED");
    assert_eq!(err["fields"]["vendor_code"], "required");

    // Duplicate vendor_code.
    let create = json!({"vendor_code": "ACME-1"}).to_string();
    let (status, _, _) = send(addr, "POST", "/api/vendors", auth_hdr, Some(&create)).await;
    assert_eq!(status, 201);
    let (status, _, body) = send(addr, "POST", "/api/vendors", auth_hdr, Some(&create)).await;
    assert_eq!(status, 400);
    assert_eq!(body_json(&body)["fields"]["vendor_code"], "already exists");

    // Malformed JSON body.
    let (status, _, body) = send(addr, "POST", "/api/vendors", auth_hdr, Some("{not json")).await;
    assert_eq!(status, 400);
    assert_eq!(body_json(&body)["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn order_crud_and_vendor_name_search() {
    let addr = spawn_app().await;
    let token = login(addr).await;
    let auth = bearer(&token);
    let auth_hdr: &[(&str, &str)] = &[("Authorization", &auth)];

    let (_, _, body) = send(
        addr,
        "POST",
        "/api/vendors",
        auth_hdr,
        Some(&json!({"name": "Acme Industrial", "vendor_code": "ACME-1"}).to_string()),
    )
    .await;
    let acme = body_json(&body)["vendorID"].as_i64().unwrap();

    let (_, _, body) = send(
        addr,
        "POST",
        "/api/vendors",
        auth_hdr,
        Some(&json!({"name": "Globex", "vendor_code": "GLOB-1"}).to_string()),
    )
    .await;
    let globex = body_json(&body)["vendorID"].as_i64().unwrap();

    // Create one order per vendor.
    let (status, _, body) = send(
        addr,
        "POST",
        "/api/purchase_orders",
        auth_hdr,
        Some(
            &json!({
                "po_number": "PO-1",
                "vendor": acme,
                "status": "pending",
                "issue_date": "2024-05-01T10:00:00Z",
                "items": [{"sku": "bolt-m8", "qty": 200}],
                "quantity": 200
            })
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, 201);
    let po = body_json(&body);
    let po_id = po["purchase_orderID"].as_i64().expect("purchase_orderID");
    assert_eq!(po["vendor"], acme);
    assert_eq!(po["status"], "pending");

    let (status, _, _) = send(
        addr,
        "POST",
        "/api/purchase_orders",
        auth_hdr,
        Some(
            &json!({
                "po_number": "PO-2",
                "vendor": globex,
                "status": "pending",
                "issue_date": "2024-05-02T10:00:00Z"
            })
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, 201);

    // Unfiltered list sees both, search narrows by vendor name.
    let (_, _, body) = send(addr, "GET", "/api/purchase_orders", auth_hdr, None).await;
    assert_eq!(body_json(&body).as_array().map(Vec::len), Some(2));

    let (_, _, body) = send(addr, "GET", "/api/purchase_orders?search=aCmE", auth_hdr, None).await;
    let hits = body_json(&body);
    assert_eq!(hits.as_array().map(Vec::len), Some(1));
    assert_eq!(hits[0]["po_number"], "PO-1");

    // Unknown vendor in the body is a validation problem, not a 500.
    let (status, _, body) = send(
        addr,
        "POST",
        "/api/purchase_orders",
        auth_hdr,
        Some(
            &json!({
                "po_number": "PO-3",
                "vendor": 999,
                "status": "pending",
                "issue_date": "2024-05-03T10:00:00Z"
            })
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body_json(&body)["fields"]["vendor"], "unknown vendor");

    // Full update flips status; missing order 404s.
    let (status, _, body) = send(
        addr,
        "PUT",
        &format!("/api/purchase_orders/{po_id}"),
        auth_hdr,
        Some(
            &json!({
                "po_number": "PO-1",
                "vendor": acme,
                "status": "completed",
                "issue_date": "2024-05-01T10:00:00Z",
                "delivery_date": "2024-05-04T10:00:00Z",
                "quality_rating": 4.5
            })
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body_json(&body)["status"], "completed");

    let (status, _, body) = send(addr, "GET", "/api/purchase_orders/999", auth_hdr, None).await;
    assert_eq!(status, 404);
    assert_eq!(body_json(&body)["message"], "Purchase order not found");

    let (status, _, _) = send(
        addr,
        "DELETE",
        &format!("/api/purchase_orders/{po_id}"),
        auth_hdr,
        None,
    )
    .await;
    assert_eq!(status, 204);
}

#[tokio::test]
async fn performance_endpoint_computes_and_appends() {
    let addr = spawn_app().await;
    let token = login(addr).await;
    let auth = bearer(&token);
    let auth_hdr: &[(&str, &str)] = &[("Authorization", &auth)];

    let (_, _, body) = send(
        addr,
        "POST",
        "/api/vendors",
        auth_hdr,
        Some(&json!({"name": "Acme Industrial", "vendor_code": "ACME-1"}).to_string()),
    )
    .await;
    let vendor = body_json(&body)["vendorID"].as_i64().unwrap();

    // 3 completed (2 on time, ratings 4/5/3), 1 pending.
    let orders = [
        json!({
            "po_number": "PO-1", "vendor": vendor, "status": "completed",
            "issue_date": "2024-05-01T10:00:00Z",
            "delivery_date": "2024-05-03T10:00:00Z",
            "quality_rating": 4.0
        }),
        json!({
            "po_number": "PO-2", "vendor": vendor, "status": "completed",
            "issue_date": "2024-05-01T10:00:00Z",
            "delivery_date": "2024-05-01T10:00:00Z",
            "quality_rating": 5.0
        }),
        json!({
            "po_number": "PO-3", "vendor": vendor, "status": "completed",
            "issue_date": "2024-05-02T10:00:00Z",
            "delivery_date": "2024-05-01T10:00:00Z",
            "quality_rating": 3.0
        }),
        json!({
            "po_number": "PO-4", "vendor": vendor, "status": "pending",
            "issue_date": "2024-05-05T10:00:00Z"
        }),
    ];
    for o in &orders {
        let (status, _, _) =
            send(addr, "POST", "/api/purchase_orders", auth_hdr, Some(&o.to_string())).await;
        assert_eq!(status, 201);
    }

    let (status, _, body) = send(
        addr,
        "GET",
        &format!("/api/vendors/{vendor}/performance"),
        auth_hdr,
        None,
    )
    .await;
    assert_eq!(status, 200);
    let snap = body_json(&body);
    assert_eq!(snap["vendor"], vendor);

    let on_time = snap["on_time_delivery_rate"].as_f64().expect("rate");
    assert!((on_time - 200.0 / 3.0).abs() < 1e-9, "got {on_time}");
    assert_eq!(snap["fulfillment_rate"].as_f64(), Some(75.0));
    assert_eq!(snap["quality_rating_avg"].as_f64(), Some(4.0));
    assert_eq!(snap["average_response_time"].as_f64(), Some(0.0));

    // Each read appends a fresh snapshot row.
    let first_id = snap["performanceID"].as_i64().expect("performanceID");
    let (_, _, body) = send(
        addr,
        "GET",
        &format!("/api/vendors/{vendor}/performance"),
        auth_hdr,
        None,
    )
    .await;
    let second_id = body_json(&body)["performanceID"].as_i64().expect("performanceID");
    assert!(second_id > first_id);

    // Unknown vendor.
    let (status, _, body) =
        send(addr, "GET", "/api/vendors/999/performance", auth_hdr, None).await;
    assert_eq!(status, 404);
    assert_eq!(body_json(&body)["message"], "Vendor not found");
}

#[tokio::test]
async fn performance_with_no_completed_orders_defaults() {
    let addr = spawn_app().await;
    let token = login(addr).await;
    let auth = bearer(&token);
    let auth_hdr: &[(&str, &str)] = &[("Authorization", &auth)];

    let (_, _, body) = send(
        addr,
        "POST",
        "/api/vendors",
        auth_hdr,
        Some(&json!({"name": "Fresh Vendor", "vendor_code": "NEW-1"}).to_string()),
    )
    .await;
    let vendor = body_json(&body)["vendorID"].as_i64().unwrap();

    let (status, _, body) = send(
        addr,
        "GET",
        &format!("/api/vendors/{vendor}/performance"),
        auth_hdr,
        None,
    )
    .await;
    assert_eq!(status, 200);
    let snap = body_json(&body);
    assert_eq!(snap["on_time_delivery_rate"], Value::Null);
    assert_eq!(snap["fulfillment_rate"], Value::Null);
    assert_eq!(snap["quality_rating_avg"].as_f64(), Some(0.0));
    assert_eq!(snap["average_response_time"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn ops_routes_are_open_and_observable() {
    let addr = spawn_app().await;

    let (status, _, body) = send(addr, "GET", "/healthz", &[], None).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");

    let (status, _, body) = send(addr, "GET", "/readyz", &[], None).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ready");

    // A counted request shows up in the exposition output.
    let (_, _, _) = send(addr, "GET", "/api/vendors", &[], None).await;
    let (status, head, body) = send(addr, "GET", "/metrics", &[], None).await;
    assert_eq!(status, 200);
    assert!(head.to_lowercase().contains("content-type: text/plain"));
    assert!(body.contains("supplyline_http_requests_total"));
    assert!(body.contains("supplyline_auth_failures_total"));
}
