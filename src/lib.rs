//! # armory
//!
//! **armory** is a coroutine-powered demo HTTP API built on the `may` runtime:
//! a small player-item catalog service with declarative request-shape
//! validation, typed handlers, and a static routing table.
//!
//! ## Overview
//!
//! Every endpoint is described once, in the routing table: method, path
//! pattern, parameter shapes, and body shape. The router matches against that
//! table, the validator enforces it (collecting every field violation before
//! rejecting), the dispatcher hands validated input to a handler coroutine,
//! and the OpenAPI document is rendered from the very same table, so docs and
//! enforcement cannot drift apart.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`routes`]** - The static routing table: every endpoint's method, path
//!   and declared parameter/body shapes
//! - **[`router`]** - Path matching and route resolution using regex-based
//!   matchers
//! - **[`shape`]** - Declarative request-shape validation (types, ranges,
//!   lengths, enums, nested objects)
//! - **[`dispatcher`]** - Coroutine-based request handler dispatch
//! - **[`typed`]** - Type-safe request/response handler traits
//! - **[`handlers`]** - The endpoint implementations and their wire types
//! - **[`server`]** - HTTP server built on `may_minihttp` with
//!   request/response plumbing and built-in endpoints
//! - **[`middleware`]** - Pluggable middleware (metrics, tracing)
//! - **[`docs`]** - OpenAPI document generation from the routing table
//! - **[`catalog`]** - The fixed player-item catalog backing the item routes
//!
//! ## Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as AppService<br/>(may_minihttp)
//!     participant Router
//!     participant Validator as shape::validate_request
//!     participant Dispatcher
//!     participant Handler as Handler<br/>(Coroutine)
//!
//!     Client->>Server: GET /player_items?skip=1
//!     Server->>Router: route(GET, "/player_items")
//!     alt No Route Match
//!         Router-->>Client: 404 Not Found
//!     end
//!     Router-->>Server: RouteMatch
//!     Server->>Validator: validate against declared shapes
//!     alt Any Field Invalid
//!         Validator-->>Client: 422 + every violation
//!     end
//!     Validator-->>Server: coerced params + body
//!     Server->>Dispatcher: dispatch(route, input)
//!     Dispatcher->>Handler: HandlerRequest via channel
//!     Handler-->>Dispatcher: HandlerResponse
//!     Dispatcher-->>Client: 200 OK + JSON body
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use armory::dispatcher::Dispatcher;
//! use armory::router::Router;
//! use armory::routes::routes;
//! use armory::server::{AppService, HttpServer};
//! use std::sync::Arc;
//!
//! let table = routes();
//! let router = Arc::new(Router::new(table.clone()));
//!
//! let mut dispatcher = Dispatcher::new();
//! unsafe {
//!     armory::registry::register_all(&mut dispatcher);
//! }
//!
//! let service = AppService::new(&table, router, Arc::new(dispatcher));
//! let handle = HttpServer(service).start("0.0.0.0:8080").unwrap();
//! handle.join().unwrap();
//! ```
//!
//! ## Runtime Considerations
//!
//! armory uses the `may` coroutine runtime, not tokio or async-std:
//!
//! - Each handler runs in its own coroutine, fed by an MPSC channel
//! - Stack size is configurable via the `ARMORY_STACK_SIZE` environment
//!   variable (decimal or `0x`-prefixed hex)
//! - Blocking operations should use `may`'s blocking facilities

pub mod catalog;
pub mod cli;
pub mod dispatcher;
pub mod docs;
pub mod handlers;
pub mod ids;
pub mod middleware;
pub mod registry;
pub mod router;
pub mod routes;
pub mod runtime_config;
pub mod server;
pub mod shape;
pub mod typed;

pub use ids::RequestId;
pub use routes::{routes, ParamLocation, ParamMeta, RouteMeta};
pub use shape::{validate_request, BodySpec, FieldSpec, ObjectShape, Violation};
