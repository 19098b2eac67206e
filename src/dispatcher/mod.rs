//! # Dispatcher Module
//!
//! Coroutine-based request handler dispatch. Each handler runs in its own
//! `may` coroutine; the dispatcher owns the channel senders and forwards a
//! validated request to the matched handler, then blocks on a reply channel
//! for the response.
//!
//! ## Request Flow
//!
//! 1. The service matches and validates an incoming request
//! 2. The dispatcher looks up the handler coroutine by name
//! 3. The request is sent over the handler's channel
//! 4. The handler replies on a one-shot channel carried in the request
//! 5. Middleware `after` hooks run on the response
//!
//! ## Error Handling
//!
//! - Handler panics are caught in the coroutine and become 500 responses
//! - A closed reply channel becomes a 503 response
//! - An unregistered handler name yields `None`, which the service layer
//!   reports as a 500

mod core;

pub use core::{
    Dispatcher, HandlerRequest, HandlerResponse, HandlerSender, HeaderVec, MAX_INLINE_HEADERS,
};
