//! Router core module - hot path for request routing.

// Hot path: keep per-request allocations out of the matcher.
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use crate::routes::RouteMeta;
use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum number of path parameters before heap allocation.
/// The deepest route in the table carries two.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>` because they come from the static route table:
/// `Arc::clone()` is an atomic increment, not a string copy. Values are
/// per-request data extracted from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of successfully matching a request path to a route.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route metadata (Arc to avoid expensive clones)
    pub route: Arc<RouteMeta>,
    /// Path parameters extracted from the URL (e.g. `{user_id}` → `"123"`)
    pub path_params: ParamVec,
    /// Name of the handler that should process this request
    pub handler_name: &'static str,
}

impl RouteMatch {
    /// Get a path parameter by name.
    ///
    /// Uses "last write wins" semantics: if duplicate parameter names exist
    /// at different path depths, returns the last occurrence.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Matches HTTP requests to handlers with compiled path regexes.
///
/// Routes are tried in table order, so literal segments shadow parameter
/// segments declared after them (`/users/current` wins over
/// `/users/{user_id}`). The table is small enough that a linear scan over
/// pre-compiled patterns beats anything cleverer.
#[derive(Clone)]
pub struct Router {
    routes: Vec<(Method, Regex, Arc<RouteMeta>, Vec<Arc<str>>)>,
}

impl Router {
    /// Compile a routing table.
    ///
    /// Each path pattern is converted to an anchored regex once, at startup;
    /// matching never allocates pattern state again.
    #[must_use]
    pub fn new(routes: Vec<RouteMeta>) -> Self {
        let routes: Vec<_> = routes
            .into_iter()
            .map(|route| {
                let (regex, param_names) = Self::path_to_regex(route.path_pattern);
                let names: Vec<Arc<str>> =
                    param_names.into_iter().map(Arc::from).collect();
                (route.method.clone(), regex, Arc::new(route), names)
            })
            .collect();

        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|(method, _, meta, _)| format!("{} {}", method, meta.path_pattern))
            .collect();

        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "Routing table compiled"
        );

        Self { routes }
    }

    /// Print all registered routes to stdout.
    ///
    /// Useful for verifying that routes are loaded in the intended order.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for (method, _re, meta, _params) in &self.routes {
            println!(
                "[route] {method} {} -> {}",
                meta.path_pattern, meta.handler_name
            );
        }
    }

    /// Match an HTTP request to a route.
    ///
    /// Returns `None` when no pattern matches, which the service layer turns
    /// into a 404.
    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        for (route_method, regex, meta, param_names) in &self.routes {
            if *route_method != method {
                continue;
            }
            let Some(caps) = regex.captures(path) else {
                continue;
            };

            let mut path_params = ParamVec::new();
            for (name, cap) in param_names.iter().zip(caps.iter().skip(1)) {
                if let Some(value) = cap {
                    path_params.push((Arc::clone(name), value.as_str().to_string()));
                }
            }

            debug!(
                method = %method,
                path = %path,
                handler_name = meta.handler_name,
                route_pattern = meta.path_pattern,
                path_params = ?path_params,
                "Route matched"
            );

            return Some(RouteMatch {
                route: Arc::clone(meta),
                path_params,
                handler_name: meta.handler_name,
            });
        }

        warn!(method = %method, path = %path, "No route matched");
        None
    }

    /// Convert a path pattern to a regex and extract parameter names.
    ///
    /// Transforms patterns like `/users/{user_id}` into `^/users/([^/]+)$`
    /// with parameter names `["user_id"]`.
    pub(crate) fn path_to_regex(path: &str) -> (Regex, Vec<String>) {
        if path == "/" {
            return (
                Regex::new(r"^/$").expect("Failed to compile path regex"),
                Vec::new(),
            );
        }

        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let param_name = segment
                    .trim_start_matches('{')
                    .trim_end_matches('}')
                    .to_string();
                pattern.push_str("/([^/]+)");
                param_names.push(param_name);
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(segment);
            }
        }

        pattern.push('$');
        let regex = Regex::new(&pattern).expect("Failed to compile path regex");

        (regex, param_names)
    }
}
