//! # Router Module
//!
//! Path matching and route resolution. Path patterns from the route table
//! (e.g. `/users/{user_id}`) are compiled into anchored regexes at startup;
//! each incoming request is tested against the table in declaration order
//! and the first match wins, yielding the route metadata and extracted path
//! parameters for downstream validation and dispatch.

mod core;

pub use core::{ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
