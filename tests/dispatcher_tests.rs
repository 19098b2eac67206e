//! Tests for the request dispatcher and coroutine handler system
//!
//! # Test Coverage
//!
//! Validates the dispatcher's core responsibilities:
//! - Handler registration and lookup
//! - The full route -> validate -> dispatch flow against real handlers
//! - Typed handler conversion failures (HandlerRequest -> TypedHandlerRequest)
//! - Middleware short-circuiting and metrics collection
//! - Panic recovery, missing handlers, and unresponsive handlers

use armory::dispatcher::{Dispatcher, HandlerRequest, HeaderVec};
use armory::ids::RequestId;
use armory::middleware::{MetricsMiddleware, Middleware, TracingMiddleware};
use armory::registry;
use armory::router::Router;
use armory::routes::routes;
use armory::runtime_config::RuntimeConfig;
use armory::shape::{validate_request, ValueVec};
use http::Method;
use may::sync::mpsc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing_util::TestTracing;

fn set_stack_size() -> TestTracing {
    may::config().set_stack_size(RuntimeConfig::from_env().stack_size);
    TestTracing::init()
}

fn full_dispatcher() -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    unsafe {
        registry::register_all(&mut dispatcher);
    }
    dispatcher
}

#[test]
fn test_registry_covers_every_route() {
    let _tracing = set_stack_size();
    let dispatcher = full_dispatcher();
    for route in routes() {
        assert!(
            dispatcher.handlers.contains_key(route.handler_name),
            "no handler registered for {}",
            route.handler_name
        );
    }
}

#[test]
fn test_dispatch_get_user() {
    let _tracing = set_stack_size();
    let router = Router::new(routes());
    let dispatcher = full_dispatcher();

    let route_match = router.route(Method::GET, "/users/7").expect("route");
    let input = validate_request(
        &route_match.route,
        &route_match.path_params,
        &HashMap::new(),
        None,
        false,
    )
    .expect("valid request");

    let resp = dispatcher
        .dispatch(&route_match, input, HeaderVec::new(), RequestId::new())
        .expect("dispatch");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, json!({ "message": "user 7 found" }));
}

#[test]
fn test_dispatch_create_user_with_tax() {
    let _tracing = set_stack_size();
    let router = Router::new(routes());
    let dispatcher = full_dispatcher();

    let route_match = router.route(Method::POST, "/users").expect("route");
    let body = json!({
        "username": "rick",
        "password": "portal",
        "type": "admin",
        "salary": 1000,
        "tax": 100.5
    });
    let input = validate_request(
        &route_match.route,
        &route_match.path_params,
        &HashMap::new(),
        Some(&body),
        false,
    )
    .expect("valid request");

    let resp = dispatcher
        .dispatch(&route_match, input, HeaderVec::new(), RequestId::new())
        .expect("dispatch");
    assert_eq!(resp.status, 200);
    assert_eq!(
        resp.body,
        json!({
            "username": "rick",
            "password": "portal",
            "type": "admin",
            "salary": 1000,
            "tax": 100.5,
            "salary_with_tax": 1100.5
        })
    );
}

#[test]
fn test_typed_conversion_failure_returns_400() {
    let _tracing = set_stack_size();
    let dispatcher = full_dispatcher();

    // get_user expects a user_id path param; send a request without one
    let (reply_tx, reply_rx) = mpsc::channel();
    let request = HandlerRequest {
        request_id: RequestId::new(),
        method: Method::GET,
        path: "/users/{user_id}",
        handler_name: "get_user",
        path_params: ValueVec::new(),
        query_params: ValueVec::new(),
        headers: HeaderVec::new(),
        body: None,
        reply_tx,
    };

    dispatcher
        .handlers
        .get("get_user")
        .unwrap()
        .send(request)
        .unwrap();
    let resp = reply_rx.recv().unwrap();
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body["error"], "Invalid request data");
}

#[test]
fn test_panic_handler_returns_500() {
    let _tracing = set_stack_size();
    fn panic_handler(_req: HandlerRequest) {
        panic!("boom! - watch to see if I recover");
    }

    let mut dispatcher = Dispatcher::new();
    unsafe {
        dispatcher.register_handler("panic", panic_handler);
    }

    let (reply_tx, reply_rx) = mpsc::channel();
    let request = HandlerRequest {
        request_id: RequestId::new(),
        method: Method::GET,
        path: "/panic",
        handler_name: "panic",
        path_params: ValueVec::new(),
        query_params: ValueVec::new(),
        headers: HeaderVec::new(),
        body: None,
        reply_tx,
    };

    dispatcher.handlers.get("panic").unwrap().send(request).unwrap();
    let resp = reply_rx.recv().unwrap();
    assert_eq!(resp.status, 500);
    assert!(resp.body["error"]
        .as_str()
        .unwrap()
        .contains("Handler panicked"));
}

#[test]
fn test_unregistered_handler_returns_none() {
    let _tracing = set_stack_size();
    let router = Router::new(routes());
    let dispatcher = Dispatcher::new();

    let route_match = router.route(Method::GET, "/").expect("route");
    let resp = dispatcher.dispatch(
        &route_match,
        Default::default(),
        HeaderVec::new(),
        RequestId::new(),
    );
    assert!(resp.is_none());
}

#[test]
fn test_unresponsive_handler_returns_503() {
    let _tracing = set_stack_size();
    // A handler that consumes the request without ever replying
    fn silent_handler(_req: HandlerRequest) {}

    let mut dispatcher = Dispatcher::new();
    unsafe {
        dispatcher.register_handler("get_root", silent_handler);
    }

    let router = Router::new(routes());
    let route_match = router.route(Method::GET, "/").expect("route");
    let resp = dispatcher
        .dispatch(
            &route_match,
            Default::default(),
            HeaderVec::new(),
            RequestId::new(),
        )
        .expect("dispatch");
    assert_eq!(resp.status, 503);
}

#[test]
fn test_middleware_short_circuit() {
    let _tracing = set_stack_size();

    struct Reject;
    impl Middleware for Reject {
        fn before(
            &self,
            _req: &HandlerRequest,
        ) -> Option<armory::dispatcher::HandlerResponse> {
            Some(armory::dispatcher::HandlerResponse::json(
                403,
                json!({ "error": "denied" }),
            ))
        }
    }

    let reached = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&reached);
    let mut dispatcher = Dispatcher::new();
    unsafe {
        dispatcher.register_handler("get_root", move |req: HandlerRequest| {
            flag.store(true, Ordering::SeqCst);
            let _ = req
                .reply_tx
                .send(armory::dispatcher::HandlerResponse::json(200, json!({})));
        });
    }
    dispatcher.add_middleware(Arc::new(Reject));

    let router = Router::new(routes());
    let route_match = router.route(Method::GET, "/").expect("route");
    let resp = dispatcher
        .dispatch(
            &route_match,
            Default::default(),
            HeaderVec::new(),
            RequestId::new(),
        )
        .expect("dispatch");
    assert_eq!(resp.status, 403);
    assert!(!reached.load(Ordering::SeqCst), "handler must not run");
}

#[test]
fn test_middleware_can_annotate_response_headers() {
    let _tracing = set_stack_size();

    // After hook stamps the request id into the response headers
    struct StampRequestId;
    impl Middleware for StampRequestId {
        fn after(
            &self,
            req: &HandlerRequest,
            res: &mut armory::dispatcher::HandlerResponse,
            _latency: std::time::Duration,
        ) {
            res.set_header("x-request-id", req.request_id.to_string());
        }
    }

    let mut dispatcher = Dispatcher::new();
    unsafe {
        dispatcher.register_handler("get_root", |req: HandlerRequest| {
            let agent = req.get_header("user-agent").unwrap_or("unknown").to_string();
            let _ = req
                .reply_tx
                .send(armory::dispatcher::HandlerResponse::json(
                    200,
                    json!({ "agent": agent }),
                ));
        });
    }
    dispatcher.add_middleware(Arc::new(StampRequestId));

    let router = Router::new(routes());
    let route_match = router.route(Method::GET, "/").expect("route");
    let mut headers = HeaderVec::new();
    headers.push((Arc::from("user-agent"), "armory-tests/1.0".to_string()));
    let request_id = RequestId::new();
    let resp = dispatcher
        .dispatch(&route_match, Default::default(), headers, request_id)
        .expect("dispatch");

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, json!({ "agent": "armory-tests/1.0" }));
    let id = request_id.to_string();
    assert_eq!(resp.get_header("X-Request-Id"), Some(id.as_str()));
}

#[test]
fn test_metrics_middleware_records() {
    let _tracing = set_stack_size();
    let mut dispatcher = full_dispatcher();
    let metrics = Arc::new(MetricsMiddleware::new());
    dispatcher.add_middleware(metrics.clone());
    dispatcher.add_middleware(Arc::new(TracingMiddleware));

    let router = Router::new(routes());
    let route_match = router.route(Method::GET, "/").expect("route");
    let input = validate_request(
        &route_match.route,
        &route_match.path_params,
        &HashMap::new(),
        None,
        false,
    )
    .expect("valid request");
    let resp = dispatcher
        .dispatch(&route_match, input, HeaderVec::new(), RequestId::new())
        .expect("dispatch");

    assert_eq!(resp.status, 200);
    assert_eq!(metrics.request_count(), 1);
}
