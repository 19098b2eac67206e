use std::time::Duration;

use tracing::info;

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Access-log middleware.
///
/// Emits one structured event per dispatched request, keyed by the request
/// ID so handler-side events correlate with it.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        info!(
            request_id = %req.request_id,
            method = %req.method,
            route = req.path,
            handler = req.handler_name,
            status = res.status,
            latency_ms = latency.as_millis() as u64,
            user_agent = req.get_header("user-agent").unwrap_or("-"),
            "Request handled"
        );
    }
}
