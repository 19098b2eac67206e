//! # Routes Module
//!
//! The routes module is the single source of truth for the HTTP surface of the
//! service. Every endpoint is described by a [`RouteMeta`] entry: method, path
//! pattern, handler name, and the declared parameter and body shapes that the
//! validation pass enforces before a handler ever runs.
//!
//! ## Overview
//!
//! The table built by [`routes()`] feeds three consumers:
//!
//! - The router compiles each `path_pattern` into a matching regex
//! - The validator checks incoming parameters and bodies against the declared
//!   [`crate::shape::FieldSpec`]s and collects violations
//! - The docs generator renders the same metadata as an OpenAPI document
//!
//! Declaring constraints once keeps the three views consistent: a parameter
//! that is range-checked at runtime shows the same bounds in `/openapi.json`.

mod shapes;
mod table;

pub use shapes::{ACCOUNT_SHAPE, ITEM_SHAPE, UPDATE_ITEM_BODY, USER_SHAPE};
pub use table::routes;

use crate::shape::{BodySpec, FieldSpec};
use http::Method;
use serde_json::Value;

/// Where a declared parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
}

impl ParamLocation {
    /// Location name as it appears in violation reports and OpenAPI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
        }
    }
}

/// A single declared parameter of a route.
#[derive(Debug, Clone)]
pub struct ParamMeta {
    pub name: &'static str,
    pub location: ParamLocation,
    pub required: bool,
    pub spec: FieldSpec,
    /// Substituted by the validator when the parameter is absent.
    pub default: Option<Value>,
    /// Hidden parameters are enforced at runtime but left out of the
    /// generated OpenAPI document.
    pub documented: bool,
}

impl ParamMeta {
    /// Path parameter. Always required: the route would not have matched
    /// without it.
    pub fn path(name: &'static str, spec: FieldSpec) -> Self {
        Self {
            name,
            location: ParamLocation::Path,
            required: true,
            spec,
            default: None,
            documented: true,
        }
    }

    /// Optional query parameter.
    pub fn query(name: &'static str, spec: FieldSpec) -> Self {
        Self {
            name,
            location: ParamLocation::Query,
            required: false,
            spec,
            default: None,
            documented: true,
        }
    }

    /// Mark the parameter required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value substituted when the parameter is absent from the request.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Keep the parameter out of the generated OpenAPI document.
    pub fn undocumented(mut self) -> Self {
        self.documented = false;
        self
    }
}

/// Metadata for a single route: everything the router, validator and docs
/// generator need to know about one endpoint.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub method: Method,
    /// Path pattern with `{name}` placeholders, e.g. `/users/{user_id}`.
    pub path_pattern: &'static str,
    pub handler_name: &'static str,
    /// One-line summary shown in the OpenAPI document.
    pub summary: &'static str,
    pub params: Vec<ParamMeta>,
    pub body: BodySpec,
}

impl RouteMeta {
    pub fn new(
        method: Method,
        path_pattern: &'static str,
        handler_name: &'static str,
        summary: &'static str,
    ) -> Self {
        Self {
            method,
            path_pattern,
            handler_name,
            summary,
            params: Vec::new(),
            body: BodySpec::None,
        }
    }

    pub fn param(mut self, param: ParamMeta) -> Self {
        self.params.push(param);
        self
    }

    pub fn body(mut self, body: BodySpec) -> Self {
        self.body = body;
        self
    }
}
