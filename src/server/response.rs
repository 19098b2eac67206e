use crate::shape::Violation;
use may_minihttp::Response;
use serde_json::{json, Value};

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Write a handler response body.
///
/// Bare JSON strings are written as `text/plain` (the metrics endpoint uses
/// this for its Prometheus text); everything else is serialized JSON.
pub fn write_handler_response(res: &mut Response, status: u16, body: Value) {
    let reason = status_reason(status);
    res.status_code(status as usize, reason);
    match body {
        Value::String(s) => {
            res.header("Content-Type: text/plain");
            res.body_vec(s.into_bytes());
        }
        other => {
            res.header("Content-Type: application/json");
            res.body_vec(other.to_string().into_bytes());
        }
    }
}

pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    let reason = status_reason(status);
    res.status_code(status as usize, reason);
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}

/// Write the 422 envelope enumerating every collected violation.
pub fn write_validation_error(res: &mut Response, violations: &[Violation]) {
    write_json_error(
        res,
        422,
        json!({ "error": "Validation Failed", "details": violations }),
    );
}
