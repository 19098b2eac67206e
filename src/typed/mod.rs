//! # Typed Module
//!
//! Type-safe request and response handling for handlers. Instead of working
//! with raw [`crate::dispatcher::HandlerRequest`] values, each handler
//! declares a request struct convertible via `TryFrom` and a serializable
//! response struct; the typed layer performs the conversion, invokes the
//! handler, and serializes the reply.
//!
//! Conversion failures surface as 400 responses before handler logic runs.

mod core;

pub use core::*;
