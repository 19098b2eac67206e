use std::time::Duration;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Hook points around handler dispatch.
///
/// `before` runs ahead of the handler and may short-circuit with a response;
/// `after` observes the response and the measured handler latency.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}
