use super::request::{parse_request, ParsedRequest};
use super::response::{write_handler_response, write_json_error, write_validation_error};
use crate::dispatcher::{Dispatcher, HeaderVec};
use crate::docs::{self, SWAGGER_UI_HTML};
use crate::ids::RequestId;
use crate::middleware::MetricsMiddleware;
use crate::router::Router;
use crate::routes::RouteMeta;
use crate::shape::validate_request;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;

/// The HTTP service: built-in endpoints, then route, validate, dispatch.
///
/// Cloned per connection by the server, so everything shared lives behind an
/// `Arc`. The router and dispatcher are constructed once at startup and never
/// mutate afterwards.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
    pub metrics: Option<Arc<MetricsMiddleware>>,
    openapi_doc: Arc<String>,
}

impl AppService {
    /// Build the service. The OpenAPI document is rendered once here from the
    /// same table the router was compiled from.
    #[must_use]
    pub fn new(routes: &[RouteMeta], router: Arc<Router>, dispatcher: Arc<Dispatcher>) -> Self {
        let openapi_doc = Arc::new(docs::openapi_json(routes).to_string());
        Self {
            router,
            dispatcher,
            metrics: None,
            openapi_doc,
        }
    }

    pub fn set_metrics_middleware(&mut self, metrics: Arc<MetricsMiddleware>) {
        self.metrics = Some(metrics);
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    write_handler_response(res, 200, json!({ "status": "ok" }));
    Ok(())
}

/// Metrics endpoint returning Prometheus text format statistics.
pub fn metrics_endpoint(res: &mut Response, metrics: &MetricsMiddleware) -> io::Result<()> {
    let body = format!(
        "# HELP armory_requests_total Total number of dispatched requests\n\
         # TYPE armory_requests_total counter\n\
         armory_requests_total {}\n\
         # HELP armory_request_latency_seconds Average request latency in seconds\n\
         # TYPE armory_request_latency_seconds gauge\n\
         armory_request_latency_seconds {}\n\
         # HELP armory_top_level_requests_total Requests served by built-in endpoints\n\
         # TYPE armory_top_level_requests_total counter\n\
         armory_top_level_requests_total {}\n\
         # HELP armory_coroutine_stack_bytes Configured coroutine stack size\n\
         # TYPE armory_coroutine_stack_bytes gauge\n\
         armory_coroutine_stack_bytes {}\n",
        metrics.request_count(),
        metrics.average_latency().as_secs_f64(),
        metrics.top_level_request_count(),
        metrics.stack_size(),
    );
    write_handler_response(res, 200, serde_json::Value::String(body));
    Ok(())
}

/// Serves the generated OpenAPI document.
pub fn openapi_endpoint(res: &mut Response, doc: &str) -> io::Result<()> {
    res.status_code(200, "OK");
    res.header("Content-Type: application/json");
    res.body_vec(doc.as_bytes().to_vec());
    Ok(())
}

/// Serves the embedded Swagger UI page pointed at `/openapi.json`.
pub fn swagger_ui_endpoint(res: &mut Response) -> io::Result<()> {
    res.status_code(200, "OK");
    res.header("Content-Type: text/html; charset=utf-8");
    res.body_vec(SWAGGER_UI_HTML.as_bytes().to_vec());
    Ok(())
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let ParsedRequest {
            method,
            path,
            headers,
            query_params,
            body,
            body_malformed,
        } = parse_request(req);

        if method == "GET" {
            let built_in = match path.as_str() {
                "/health" => Some(health_endpoint(res)),
                "/metrics" => match &self.metrics {
                    Some(metrics) => Some(metrics_endpoint(res, metrics)),
                    None => {
                        write_json_error(
                            res,
                            404,
                            json!({"error": "Not Found", "method": method, "path": path}),
                        );
                        Some(Ok(()))
                    }
                },
                "/openapi.json" => Some(openapi_endpoint(res, &self.openapi_doc)),
                "/docs" => Some(swagger_ui_endpoint(res)),
                _ => None,
            };
            if let Some(result) = built_in {
                if let Some(metrics) = &self.metrics {
                    metrics.inc_top_level_request();
                }
                return result;
            }
        }

        let Ok(method) = method.parse::<Method>() else {
            write_json_error(
                res,
                404,
                json!({"error": "Not Found", "method": method, "path": path}),
            );
            return Ok(());
        };

        let Some(route_match) = self.router.route(method.clone(), &path) else {
            write_json_error(
                res,
                404,
                json!({"error": "Not Found", "method": method.as_str(), "path": path}),
            );
            return Ok(());
        };

        let validated = match validate_request(
            &route_match.route,
            &route_match.path_params,
            &query_params,
            body.as_ref(),
            body_malformed,
        ) {
            Ok(validated) => validated,
            Err(violations) => {
                write_validation_error(res, &violations);
                return Ok(());
            }
        };

        let mut header_vec = HeaderVec::new();
        for (k, v) in &headers {
            header_vec.push((Arc::from(k.as_str()), v.clone()));
        }

        let request_id = RequestId::new();
        match self
            .dispatcher
            .dispatch(&route_match, validated, header_vec, request_id)
        {
            Some(hr) => write_handler_response(res, hr.status, hr.body),
            None => {
                write_json_error(
                    res,
                    500,
                    json!({
                        "error": "Handler failed or not registered",
                        "method": method.as_str(),
                        "path": path
                    }),
                );
            }
        }
        Ok(())
    }
}
