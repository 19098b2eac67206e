//! Dispatcher core module - hot path for request dispatch.

// Hot path: keep per-request allocations out of the dispatch loop.
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use crate::ids::RequestId;
use crate::router::RouteMatch;
use crate::runtime_config::RuntimeConfig;
use crate::shape::{ValidatedInput, ValueVec};
use anyhow::anyhow;
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::middleware::Middleware;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the hot path.
///
/// Header names use `Arc<str>` because the common ones repeat across every
/// request; values are per-request data.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data passed to a handler coroutine.
///
/// Parameters arrive pre-validated: the shape pass has already coerced each
/// declared path and query parameter to its target JSON type and substituted
/// defaults, so handlers read typed values instead of raw strings. The reply
/// channel carries the response back to the dispatcher.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Matched route pattern (e.g. `/users/{user_id}`)
    pub path: &'static str,
    /// Name of the handler that should process this request
    pub handler_name: &'static str,
    /// Coerced path parameters (stack-allocated for ≤8 params)
    pub path_params: ValueVec,
    /// Coerced query parameters, defaults applied (stack-allocated for ≤8 params)
    pub query_params: ValueVec,
    /// HTTP headers (stack-allocated for ≤16 headers)
    pub headers: HeaderVec,
    /// Request body parsed as JSON (if present)
    pub body: Option<Value>,
    /// Channel for sending the response back to the dispatcher
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

impl HandlerRequest {
    /// Get a coerced path parameter by name.
    ///
    /// Uses "last write wins" semantics: if duplicate parameter names exist
    /// at different path depths, returns the last occurrence.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&Value> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Get a coerced query parameter by name.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&Value> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Integer path parameter.
    ///
    /// The validation pass guarantees declared integer parameters arrive as
    /// JSON numbers; a miss here means the route table and the handler
    /// disagree, which converts to a 400 at the typed layer.
    pub fn path_i64(&self, name: &str) -> anyhow::Result<i64> {
        self.get_path_param(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| anyhow!("missing integer path parameter `{name}`"))
    }

    /// String path parameter.
    pub fn path_string(&self, name: &str) -> anyhow::Result<String> {
        self.get_path_param(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("missing string path parameter `{name}`"))
    }

    /// Integer query parameter (present after defaulting).
    pub fn query_i64(&self, name: &str) -> anyhow::Result<i64> {
        self.get_query_param(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| anyhow!("missing integer query parameter `{name}`"))
    }

    /// Boolean query parameter (present after defaulting).
    pub fn query_bool(&self, name: &str) -> anyhow::Result<bool> {
        self.get_query_param(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| anyhow!("missing boolean query parameter `{name}`"))
    }

    /// Required string query parameter.
    pub fn query_string(&self, name: &str) -> anyhow::Result<String> {
        self.get_query_param(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("missing string query parameter `{name}`"))
    }

    /// Optional string query parameter.
    #[must_use]
    pub fn query_string_opt(&self, name: &str) -> Option<String> {
        self.get_query_param(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Response data sent back from a handler coroutine.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code (200, 422, 500, etc.)
    pub status: u16,
    /// HTTP response headers (stack-allocated for ≤16 headers)
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON
    pub body: Value,
}

impl HandlerResponse {
    /// Create a new response with the given status, headers, and body
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with default headers
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create an error response
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Type alias for a channel sender that dispatches requests to a handler
pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// Dispatcher that routes validated requests to registered handler coroutines.
///
/// Maintains a registry of handler names to their channel senders, and the
/// ordered middleware pipeline applied around every dispatch.
#[derive(Clone, Default)]
pub struct Dispatcher {
    /// Map of handler names to their channel senders
    pub handlers: HashMap<&'static str, HandlerSender>,
    /// Ordered list of middleware to apply to requests/responses
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    /// Create a new empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add middleware to the processing pipeline.
    ///
    /// Middleware runs in registration order: every `before` ahead of the
    /// handler, every `after` once the response is in hand.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Registers a handler function that will process requests with the given name.
    ///
    /// Spawns a coroutine that consumes requests from a channel. The handler
    /// is wrapped with panic recovery so one failing handler cannot take the
    /// server down.
    ///
    /// # Safety
    ///
    /// This function is marked unsafe because it calls
    /// `may::coroutine::Builder::spawn()`, which is unsafe in the `may`
    /// runtime. The unsafety comes from the coroutine runtime's requirements,
    /// not from this function's logic.
    ///
    /// The caller must ensure:
    /// - The may coroutine runtime is properly initialized before calling this
    /// - The handler sends a response through the reply channel for every request
    ///
    /// # Panics
    ///
    /// Handler panics are caught and converted to 500 error responses.
    pub unsafe fn register_handler<F>(&mut self, name: &'static str, handler_fn: F)
    where
        F: Fn(HandlerRequest) + Send + 'static + Clone,
    {
        let (tx, rx) = mpsc::channel::<HandlerRequest>();
        let stack_size = RuntimeConfig::from_env().stack_size;

        // SAFETY: spawn() is unsafe per the may runtime. The closure is
        // Send + 'static and reports failures through the reply channel.
        let spawn_result = unsafe {
            coroutine::Builder::new()
                .stack_size(stack_size)
                .spawn(move || {
                    debug!(
                        handler_name = name,
                        stack_size = stack_size,
                        "Handler coroutine start"
                    );

                    for req in rx.iter() {
                        let reply_tx = req.reply_tx.clone();
                        let handler_name = req.handler_name;
                        let request_id = req.request_id;

                        debug!(
                            request_id = %request_id,
                            handler_name = handler_name,
                            path_params = ?req.path_params,
                            query_params = ?req.query_params,
                            "Handler execution start"
                        );

                        if let Err(panic) =
                            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                                handler_fn(req);
                            }))
                        {
                            let panic_message = format!("{panic:?}");
                            error!(
                                request_id = %request_id,
                                handler_name = handler_name,
                                panic_message = %panic_message,
                                "Handler panicked"
                            );

                            let error_response = HandlerResponse::error(
                                500,
                                &format!("Handler panicked: {panic_message}"),
                            );
                            let _ = reply_tx.send(error_response);
                        }
                    }
                })
        };

        if let Err(e) = spawn_result {
            error!(
                handler_name = name,
                error = %e,
                stack_size = stack_size,
                "Failed to spawn handler coroutine"
            );
            return;
        }

        self.handlers.insert(name, tx);
    }

    /// Dispatch a validated request to the matched handler.
    ///
    /// Sends the request to the handler's coroutine via channel and blocks
    /// the calling coroutine until the response arrives. Returns `None` if no
    /// handler is registered under the matched name, which the service layer
    /// reports as a 500.
    #[must_use]
    pub fn dispatch(
        &self,
        route_match: &RouteMatch,
        input: ValidatedInput,
        headers: HeaderVec,
        request_id: RequestId,
    ) -> Option<HandlerResponse> {
        let (reply_tx, reply_rx) = mpsc::channel();

        debug!(
            handler_name = route_match.handler_name,
            available_handlers = self.handlers.len(),
            "Handler lookup"
        );

        let tx = match self.handlers.get(route_match.handler_name) {
            Some(tx) => tx,
            None => {
                let available: Vec<&&str> = self.handlers.keys().collect();
                error!(
                    handler_name = route_match.handler_name,
                    available_handlers = ?available,
                    "Handler not found"
                );
                return None;
            }
        };

        let request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path: route_match.route.path_pattern,
            handler_name: route_match.handler_name,
            path_params: input.path_params,
            query_params: input.query_params,
            headers,
            body: input.body,
            reply_tx,
        };

        let mut early_resp: Option<HandlerResponse> = None;
        for mw in &self.middlewares {
            if early_resp.is_none() {
                early_resp = mw.before(&request);
            } else {
                mw.before(&request);
            }
        }

        let (request, mut resp, latency) = if let Some(r) = early_resp {
            (request, r, Duration::from_millis(0))
        } else {
            debug!(
                request_id = %request_id,
                handler_name = request.handler_name,
                method = %request.method,
                path = request.path,
                "Request dispatched to handler"
            );

            let start = Instant::now();

            // The handler gets the only live reply sender; the copy kept for
            // the after hooks carries a dead one. A handler that exits without
            // replying then closes the channel instead of hanging this recv.
            let (dead_tx, _) = mpsc::channel();
            let mut kept = request.clone();
            kept.reply_tx = dead_tx;

            if let Err(e) = tx.send(request) {
                error!(
                    request_id = %request_id,
                    handler_name = kept.handler_name,
                    error = %e,
                    "Failed to send request to handler"
                );
                return None;
            }

            // may::sync::mpsc has no recv_timeout; the reply arrives, or every
            // sender drops and recv reports the closed channel.
            let r = match reply_rx.recv() {
                Ok(response) => {
                    let elapsed = start.elapsed();
                    info!(
                        request_id = %request_id,
                        handler_name = kept.handler_name,
                        latency_ms = elapsed.as_millis() as u64,
                        status = response.status,
                        "Handler response received"
                    );
                    response
                }
                Err(e) => {
                    error!(
                        request_id = %request_id,
                        handler_name = kept.handler_name,
                        error = %e,
                        "Handler channel closed - handler may have crashed"
                    );

                    return Some(HandlerResponse::error(
                        503,
                        &format!("Handler '{}' is not responding", kept.handler_name),
                    ));
                }
            };
            (kept, r, start.elapsed())
        };

        for mw in &self.middlewares {
            mw.after(&request, &mut resp, latency);
        }

        Some(resp)
    }
}
