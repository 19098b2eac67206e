use crate::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
use crate::ids::RequestId;
use crate::runtime_config::RuntimeConfig;
use http::Method;
use may::sync::mpsc;
use serde::Serialize;
use std::convert::TryFrom;
use tracing::error;

/// Trait implemented by typed coroutine handlers.
///
/// A handler receives a [`TypedHandlerRequest`] carrying its associated
/// request type, already extracted from the wire request, and returns a
/// response that serializes to the reply body.
pub trait Handler: Send + 'static {
    /// The typed request type (converted from HandlerRequest)
    type Request: TryFrom<HandlerRequest, Error = anyhow::Error> + Send + 'static;
    /// The typed response type (serialized to JSON)
    type Response: Serialize + Send + 'static;

    /// Handle a typed request and return a typed response
    fn handle(&self, req: TypedHandlerRequest<Self::Request>) -> Self::Response;
}

/// Spawn a typed handler coroutine and return a sender to communicate with it.
///
/// The coroutine converts each incoming [`HandlerRequest`] into the handler's
/// associated request type. Conversion failures become 400 responses; handler
/// panics are caught and become 500 responses.
///
/// # Safety
///
/// This function is unsafe because it spawns a coroutine that will run
/// indefinitely and handle requests. The caller must ensure that:
/// - The may coroutine runtime is properly initialized
/// - The handler is safe to execute in a concurrent context
pub unsafe fn spawn_typed<H>(handler: H) -> mpsc::Sender<HandlerRequest>
where
    H: Handler + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<HandlerRequest>();
    let stack_size = RuntimeConfig::from_env().stack_size;

    let spawn_result = may::coroutine::Builder::new()
        .stack_size(stack_size)
        .spawn(move || {
            let handler = handler;
            for req in rx.iter() {
                // Keep a sender outside the panic boundary for error reporting.
                let reply_tx = req.reply_tx.clone();
                let handler_name = req.handler_name;

                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    let reply_tx_inner = reply_tx.clone();

                    // The shape pass has already checked declared constraints;
                    // a conversion failure here means the handler asked for
                    // something the route table never declared.
                    let data = match H::Request::try_from(req.clone()) {
                        Ok(v) => v,
                        Err(err) => {
                            let _ = reply_tx_inner.send(HandlerResponse::json(
                                400,
                                serde_json::json!({
                                    "error": "Invalid request data",
                                    "message": err.to_string()
                                }),
                            ));
                            return;
                        }
                    };

                    let typed_req = TypedHandlerRequest {
                        request_id: req.request_id,
                        method: req.method,
                        path: req.path,
                        handler_name: req.handler_name,
                        data,
                    };

                    let result = handler.handle(typed_req);

                    let _ = reply_tx_inner.send(HandlerResponse::json(
                        200,
                        serde_json::to_value(result).unwrap_or_else(
                            |_| serde_json::json!({"error": "Failed to serialize response"}),
                        ),
                    ));
                }));

                if let Err(panic) = result {
                    let _ = reply_tx.send(HandlerResponse::json(
                        500,
                        serde_json::json!({
                            "error": "Handler panicked",
                            "details": format!("{panic:?}")
                        }),
                    ));
                    error!(
                        handler_name = handler_name,
                        panic = ?panic,
                        "Typed handler panicked"
                    );
                }
            }
        });

    if let Err(e) = spawn_result {
        error!(error = %e, stack_size = stack_size, "Failed to spawn typed handler coroutine");
    }

    tx
}

/// Typed request data passed to a [`Handler`].
///
/// Carries the HTTP metadata alongside the handler's own request type, which
/// holds everything extracted from parameters and body.
#[derive(Debug, Clone)]
pub struct TypedHandlerRequest<T> {
    /// Request ID for tracing and correlation
    pub request_id: RequestId,
    /// HTTP method
    pub method: Method,
    /// Matched route pattern
    pub path: &'static str,
    /// Handler name
    pub handler_name: &'static str,
    /// Typed request data (converted from the wire request)
    pub data: T,
}

impl Dispatcher {
    /// Register a typed handler that converts [`HandlerRequest`] into the
    /// handler's associated request type using `TryFrom`.
    ///
    /// # Safety
    ///
    /// This function is unsafe because it internally calls [`spawn_typed`],
    /// which spawns a coroutine. The caller must ensure the may coroutine
    /// runtime is properly initialized before calling this.
    pub unsafe fn register_typed<H>(&mut self, name: &'static str, handler: H)
    where
        H: Handler + Send + 'static,
    {
        let tx = unsafe { spawn_typed(handler) };
        self.handlers.insert(name, tx);
    }
}
