//! Integration tests for the HTTP server and request processing pipeline
//!
//! # Test Coverage
//!
//! This module tests the complete HTTP server stack:
//! - Server startup and lifecycle management
//! - Request routing, validation, and dispatching for every route
//! - Exact response bodies, including conditional fields
//! - Error envelopes: 404 routing misses and 422 validation failures
//! - Built-in endpoints: /health, /metrics, /openapi.json, /docs
//!
//! # Test Strategy
//!
//! Each test spins up the full service on a random port and speaks plain
//! HTTP/1.1 over TCP, mirroring what a real client sees on the wire.
//!
//! # Important Notes
//!
//! - Tests use May coroutines with 32KB stack size
//! - The server handle is stopped automatically via RAII when a test ends

use armory::dispatcher::Dispatcher;
use armory::middleware::{MetricsMiddleware, TracingMiddleware};
use armory::registry;
use armory::router::Router;
use armory::routes::routes;
use armory::server::{AppService, HttpServer, ServerHandle};
use serde_json::{json, Value};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

mod common;
use common::http::{parse_response, parse_response_parts, send_request};
use common::test_server::setup_may_runtime;
use tracing_util::TestTracing;

/// Test fixture with automatic setup and teardown using RAII
///
/// Implements Drop to stop the server when the test completes, even if the
/// test panics partway through.
struct ArmoryTestServer {
    _tracing: TestTracing,
    handle: Option<ServerHandle>,
    addr: SocketAddr,
}

impl ArmoryTestServer {
    fn new() -> Self {
        setup_may_runtime();
        let tracing = TestTracing::init();

        let table = routes();
        let router = Arc::new(Router::new(table.clone()));
        let mut dispatcher = Dispatcher::new();
        let metrics = Arc::new(MetricsMiddleware::new());
        dispatcher.add_middleware(metrics.clone());
        dispatcher.add_middleware(Arc::new(TracingMiddleware));
        unsafe {
            registry::register_all(&mut dispatcher);
        }
        let mut service = AppService::new(&table, router, Arc::new(dispatcher));
        service.set_metrics_middleware(metrics);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let handle = HttpServer(service).start(addr).unwrap();
        handle.wait_ready().unwrap();

        Self {
            _tracing: tracing,
            addr: handle.addr(),
            handle: Some(handle),
        }
    }

    fn get(&self, path: &str) -> (u16, Value) {
        let raw = send_request(
            &self.addr,
            &format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        );
        parse_response(&raw)
    }

    fn send(&self, method: &str, path: &str) -> (u16, Value) {
        let raw = send_request(
            &self.addr,
            &format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        );
        parse_response(&raw)
    }

    fn send_json(&self, method: &str, path: &str, body: &Value) -> (u16, Value) {
        let payload = body.to_string();
        let raw = send_request(
            &self.addr,
            &format!(
                "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{payload}",
                payload.len()
            ),
        );
        parse_response(&raw)
    }
}

impl Drop for ArmoryTestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}

#[test]
fn test_root_messages() {
    let server = ArmoryTestServer::new();

    let (status, body) = server.get("/");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "root message" }));

    let (status, body) = server.send("POST", "/");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "post message" }));

    let (status, body) = server.send("PUT", "/");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "put message" }));
}

#[test]
fn test_list_users_echoes_q() {
    let server = ArmoryTestServer::new();

    let (status, body) = server.get("/users");
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "users": [ { "user_name": "Rick" }, { "user_name": "Morty" } ] })
    );

    let (status, body) = server.get("/users?q=ab");
    assert_eq!(status, 200);
    assert_eq!(body["q"], "ab");

    // Too short for the declared bounds
    let (status, body) = server.get("/users?q=a");
    assert_eq!(status, 422);
    assert_eq!(body["details"][0]["code"], "min_length");

    // Duplicate query parameters: the last one wins
    let (status, body) = server.get("/users?q=aa&q=zz");
    assert_eq!(status, 200);
    assert_eq!(body["q"], "zz");

    // Percent-encoded values are decoded before validation
    let (status, body) = server.get("/users?q=a%20b%20c");
    assert_eq!(status, 200);
    assert_eq!(body["q"], "a b c");
}

#[test]
fn test_literal_user_routes_and_lookup() {
    let server = ArmoryTestServer::new();

    let (status, body) = server.get("/users_all");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "all users listed" }));

    let (status, body) = server.get("/users/current");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "current user" }));

    // Any other id is echoed back as found
    let (status, body) = server.get("/users/42");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": "user 42 found" }));
}

#[test]
fn test_access_levels() {
    let server = ArmoryTestServer::new();

    let cases = [
        ("super_admin", "full access"),
        ("admin", "partial access"),
        ("user", "normal user"),
    ];
    for (user_type, message) in cases {
        let (status, body) = server.get(&format!("/access/{user_type}"));
        assert_eq!(status, 200, "{user_type}");
        assert_eq!(
            body,
            json!({ "user_type": user_type, "message": message })
        );
    }

    let (status, body) = server.get("/access/root");
    assert_eq!(status, 422);
    assert_eq!(body["details"][0]["code"], "enum");
}

#[test]
fn test_player_items_slicing() {
    let server = ArmoryTestServer::new();
    let full = json!([
        { "player_item": "sword" },
        { "player_item": "shield" },
        { "player_item": "armor" }
    ]);

    let (status, body) = server.get("/player_items");
    assert_eq!(status, 200);
    assert_eq!(body, full);

    let (status, body) = server.get("/player_items?skip=1&limit=1");
    assert_eq!(status, 200);
    assert_eq!(body, json!([ { "player_item": "shield" } ]));

    // Past the end and zero-width windows are empty, not errors
    let (_, body) = server.get("/player_items?skip=5");
    assert_eq!(body, json!([]));
    let (_, body) = server.get("/player_items?limit=0");
    assert_eq!(body, json!([]));

    // Negative values clamp to the catalog bounds
    let (_, body) = server.get("/player_items?skip=-1");
    assert_eq!(body, full);

    let (status, body) = server.get("/player_items?skip=lots");
    assert_eq!(status, 422);
    assert_eq!(body["details"][0]["code"], "type");
}

#[test]
fn test_get_player_item() {
    let server = ArmoryTestServer::new();
    let description = "This is an amazing item that has a long description";

    let (status, body) = server.get("/player_items/3?sample_query=needed");
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "player_item_id": 3,
            "sample_query": "needed",
            "description": description
        })
    );

    // short=true drops the description entirely
    let (status, body) = server.get("/player_items/3?sample_query=needed&short=true");
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "player_item_id": 3, "sample_query": "needed" })
    );

    let (status, body) =
        server.get("/player_items/3?sample_query=needed&optional_query=extra");
    assert_eq!(status, 200);
    assert_eq!(body["optional_query"], "extra");

    let (status, body) = server.get("/player_items/3");
    assert_eq!(status, 422);
    assert_eq!(
        (
            body["details"][0]["field"].as_str().unwrap(),
            body["details"][0]["code"].as_str().unwrap()
        ),
        ("sample_query", "required")
    );
}

#[test]
fn test_user_player_item() {
    let server = ArmoryTestServer::new();

    let (status, body) = server.get("/users/8/player_items/abc");
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "player_item_id": "abc",
            "owner_id": 8,
            "description": "This is an amazing item that has a long description"
        })
    );

    let (status, body) = server.get("/users/8/player_items/abc?short=1");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "player_item_id": "abc", "owner_id": 8 }));
}

#[test]
fn test_create_user_tax_rule() {
    let server = ArmoryTestServer::new();

    // Non-zero tax adds the combined figure
    let (status, body) = server.send_json(
        "POST",
        "/users",
        &json!({
            "username": "rick",
            "password": "portal",
            "type": "admin",
            "salary": 1000,
            "tax": 100.5
        }),
    );
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "username": "rick",
            "password": "portal",
            "type": "admin",
            "salary": 1000,
            "tax": 100.5,
            "salary_with_tax": 1100.5
        })
    );

    // Omitted tax defaults to zero and suppresses the combined figure
    let (status, body) = server.send_json(
        "POST",
        "/users",
        &json!({
            "username": "morty",
            "password": "aw_geez",
            "type": "user",
            "salary": 200
        }),
    );
    assert_eq!(status, 200);
    assert!(body.get("salary_with_tax").is_none());
    assert_eq!(body["tax"], 0.0);

    // Explicit zero behaves the same as omitted
    let (status, body) = server.send_json(
        "POST",
        "/users",
        &json!({
            "username": "summer",
            "password": "hush",
            "type": "user",
            "salary": 300,
            "tax": 0.0
        }),
    );
    assert_eq!(status, 200);
    assert!(body.get("salary_with_tax").is_none());
}

#[test]
fn test_create_user_validation_envelope() {
    let server = ArmoryTestServer::new();

    let (status, body) = server.send_json("POST", "/users", &json!({ "username": "rick" }));
    assert_eq!(status, 422);
    assert_eq!(body["error"], "Validation Failed");

    let details = body["details"].as_array().unwrap();
    let mut found: Vec<(&str, &str, &str)> = details
        .iter()
        .map(|d| {
            (
                d["location"].as_str().unwrap(),
                d["field"].as_str().unwrap(),
                d["code"].as_str().unwrap(),
            )
        })
        .collect();
    found.sort_unstable();
    assert_eq!(
        found,
        vec![
            ("body", "password", "required"),
            ("body", "salary", "required"),
            ("body", "type", "required"),
        ]
    );
    for detail in details {
        assert!(detail["message"].is_string());
    }
}

#[test]
fn test_update_user_path_id_wins() {
    let server = ArmoryTestServer::new();

    let (status, body) = server.send_json(
        "PUT",
        "/users/10",
        &json!({ "user_id": 99, "user_name": "Beth" }),
    );
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "user_id": 10, "user_name": "Beth" }));

    let (status, body) = server.send_json(
        "PUT",
        "/users/10?q=hello",
        &json!({ "user_id": 99, "user_name": "Beth" }),
    );
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "user_id": 10, "user_name": "Beth", "q": "hello" })
    );
}

#[test]
fn test_hidden_users_fallback() {
    let server = ArmoryTestServer::new();

    let (status, body) = server.get("/users_hidden");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "hidden_query": "not found" }));

    let (status, body) = server.get("/users_hidden?hidden_query=shh");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "hidden_query": "shh" }));

    // An empty value behaves like an omitted one
    let (status, body) = server.get("/users_hidden?hidden_query=");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "hidden_query": "not found" }));
}

#[test]
fn test_update_item_round_trip() {
    let server = ArmoryTestServer::new();

    let item = json!({ "item_id": 1, "item_stock": 3 });
    let user = json!({
        "username": "rick",
        "password": "portal",
        "type": "user",
        "salary": 5,
        "tax": 2.5
    });

    let (status, body) = server.send_json(
        "PUT",
        "/items/5?q=str",
        &json!({ "item": item, "user": user }),
    );
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "item_id": 5, "q": "str", "item": item, "user": user })
    );

    // The body and query are both optional
    let (status, body) = server.send("PUT", "/items/5");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "item_id": 5 }));

    let (status, body) = server.send("PUT", "/items/51");
    assert_eq!(status, 422);
    assert_eq!(body["details"][0]["code"], "max");

    let (status, body) = server.send("PUT", "/items/-1");
    assert_eq!(status, 422);
    assert_eq!(body["details"][0]["code"], "min");
}

#[test]
fn test_not_found_envelope() {
    let server = ArmoryTestServer::new();

    let (status, body) = server.get("/nope");
    assert_eq!(status, 404);
    assert_eq!(
        body,
        json!({ "error": "Not Found", "method": "GET", "path": "/nope" })
    );

    // Known path, unrouted verb
    let (status, _body) = server.send("DELETE", "/users");
    assert_eq!(status, 404);
}

#[test]
fn test_malformed_json_body() {
    let server = ArmoryTestServer::new();

    let raw = send_request(
        &server.addr,
        "POST /users HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 9\r\n\r\n{not json",
    );
    let (status, body) = parse_response(&raw);
    assert_eq!(status, 422);
    assert_eq!(body["details"][0]["code"], "type");
    assert_eq!(
        body["details"][0]["message"],
        "request body is not valid JSON"
    );
}

#[test]
fn test_health_and_metrics_endpoints() {
    let server = ArmoryTestServer::new();

    let (status, body) = server.get("/health");
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "ok" }));

    // Generate one dispatched request so the counters move
    let (status, _) = server.get("/");
    assert_eq!(status, 200);

    let raw = send_request(
        &server.addr,
        "GET /metrics HTTP/1.1\r\nHost: localhost\r\n\r\n",
    );
    let (status, content_type, text) = parse_response_parts(&raw);
    assert_eq!(status, 200);
    assert!(content_type.starts_with("text/plain"));
    assert!(text.contains("armory_requests_total"));
    assert!(text.contains("armory_request_latency_seconds"));
}

#[test]
fn test_openapi_and_docs_endpoints() {
    let server = ArmoryTestServer::new();

    let raw = send_request(
        &server.addr,
        "GET /openapi.json HTTP/1.1\r\nHost: localhost\r\n\r\n",
    );
    let (status, doc) = parse_response(&raw);
    assert_eq!(status, 200);
    assert_eq!(doc["openapi"], "3.1.0");
    assert!(doc["paths"]["/player_items"]["get"].is_object());
    // Hidden parameters are enforced but never documented
    assert!(!raw.contains("hidden_query"));

    let raw = send_request(
        &server.addr,
        "GET /docs HTTP/1.1\r\nHost: localhost\r\n\r\n",
    );
    let (status, content_type, html) = parse_response_parts(&raw);
    assert_eq!(status, 200);
    assert!(content_type.starts_with("text/html"));
    assert!(html.contains("SwaggerUIBundle"));
    assert!(html.contains("dom_id: \"#swagger-ui\""));
}
