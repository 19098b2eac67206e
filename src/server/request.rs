use may_minihttp::Request;
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path with the query string stripped
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Parsed query string parameters
    pub query_params: HashMap<String, String>,
    /// Parsed JSON body (if one was sent and parsed)
    pub body: Option<serde_json::Value>,
    /// A non-empty body was sent but was not valid JSON. Routes that declare
    /// a body shape turn this into a validation failure.
    pub body_malformed: bool,
}

/// Parse query string parameters from a URL path.
///
/// Extracts everything after the `?` and URL-decodes names and values.
/// Duplicate names keep the last occurrence.
pub fn parse_query_params(path: &str) -> HashMap<String, String> {
    if let Some(pos) = path.find('?') {
        let query_str = &path[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    }
}

/// Parse an incoming HTTP request into a [`ParsedRequest`].
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let query_params = parse_query_params(&raw_path);

    let mut body = None;
    let mut body_malformed = false;
    let mut body_str = String::new();
    if let Ok(size) = req.body().read_to_string(&mut body_str) {
        if size > 0 {
            match serde_json::from_str(&body_str) {
                Ok(json) => body = Some(json),
                Err(e) => {
                    body_malformed = true;
                    debug!(error = %e, body_size_bytes = size, "JSON body parse failed");
                }
            }
        }
    }

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_param_count = query_params.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        query_params,
        body,
        body_malformed,
    }
}
