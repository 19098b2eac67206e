use super::{BodySpec, FieldSpec, FieldType, ObjectShape, Violation, ValueVec};
use crate::router::ParamVec;
use crate::routes::{ParamLocation, RouteMeta};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Successfully validated request inputs, ready for dispatch.
///
/// Parameters are coerced to their declared types and carry applied defaults;
/// the body is the parsed JSON exactly as submitted (validated in place, never
/// rewritten, so echoes round-trip unmodified).
#[derive(Debug, Clone, Default)]
pub struct ValidatedInput {
    pub path_params: ValueVec,
    pub query_params: ValueVec,
    pub body: Option<Value>,
}

/// Run the validation pass for one matched route.
///
/// Checks every declared parameter and the body against the route's shapes,
/// collecting all violations instead of failing fast. `body_malformed` flags
/// a request that carried a payload which did not parse as JSON.
pub fn validate_request(
    route: &RouteMeta,
    path_params: &ParamVec,
    query_params: &HashMap<String, String>,
    body: Option<&Value>,
    body_malformed: bool,
) -> Result<ValidatedInput, Vec<Violation>> {
    let mut out = ValidatedInput::default();
    let mut violations = Vec::new();

    for param in &route.params {
        let location = param.location.as_str();
        let raw = match param.location {
            ParamLocation::Path => path_params
                .iter()
                .rfind(|(k, _)| k.as_ref() == param.name)
                .map(|(_, v)| v.as_str()),
            ParamLocation::Query => query_params.get(param.name).map(String::as_str),
        };

        match raw {
            Some(raw) => match coerce_param(&param.spec, raw, location, param.name) {
                Ok(value) => {
                    check_field(&param.spec, &value, location, param.name, &mut violations);
                    push_param(&mut out, param.location, param.name, value);
                }
                Err(v) => violations.push(v),
            },
            None => {
                if let Some(default) = &param.default {
                    push_param(&mut out, param.location, param.name, default.clone());
                } else if param.required {
                    violations.push(Violation::new(
                        location,
                        param.name,
                        "required",
                        "missing required parameter",
                    ));
                }
            }
        }
    }

    match &route.body {
        BodySpec::None => {}
        BodySpec::Required(shape) | BodySpec::Optional(shape) => {
            if body_malformed {
                violations.push(Violation::new(
                    "body",
                    shape.name,
                    "type",
                    "request body is not valid JSON",
                ));
            } else {
                match body {
                    Some(value) => {
                        validate_object(shape, value, "", &mut violations);
                        out.body = Some(value.clone());
                    }
                    None => {
                        if route.body.is_required() {
                            violations.push(Violation::new(
                                "body",
                                shape.name,
                                "required",
                                "request body is required",
                            ));
                        }
                    }
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(out)
    } else {
        debug!(
            handler_name = %route.handler_name,
            violation_count = violations.len(),
            "request failed shape validation"
        );
        Err(violations)
    }
}

fn push_param(out: &mut ValidatedInput, location: ParamLocation, name: &'static str, value: Value) {
    let slot = match location {
        ParamLocation::Path => &mut out.path_params,
        ParamLocation::Query => &mut out.query_params,
    };
    slot.push((Arc::from(name), value));
}

/// Coerce a raw path/query string to the declared type.
///
/// Parsing is strict: `"1.5"` is not an integer and `"maybe"` is not a
/// boolean. Booleans accept the usual form-encoding spellings.
fn coerce_param(
    spec: &FieldSpec,
    raw: &str,
    location: &'static str,
    field: &str,
) -> Result<Value, Violation> {
    let mismatch = || {
        Violation::new(
            location,
            field,
            "type",
            format!("expected {}, found \"{raw}\"", spec.ty.name()),
        )
    };
    match &spec.ty {
        FieldType::String | FieldType::Enum(_) => Ok(Value::String(raw.to_string())),
        FieldType::Integer => raw.parse::<i64>().map(Value::from).map_err(|_| mismatch()),
        FieldType::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::from)
            .ok_or_else(mismatch),
        FieldType::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(mismatch()),
        },
        FieldType::Object(_) => serde_json::from_str(raw).map_err(|_| mismatch()),
    }
}

/// Type-check one already-parsed value against its spec, then apply the
/// declared constraints. Nested objects recurse through their shape.
fn check_field(
    spec: &FieldSpec,
    value: &Value,
    location: &'static str,
    field: &str,
    out: &mut Vec<Violation>,
) {
    if !type_matches(&spec.ty, value) {
        out.push(Violation::new(
            location,
            field,
            "type",
            format!(
                "expected {}, found {}",
                spec.ty.name(),
                json_type_name(value)
            ),
        ));
        return;
    }

    if let FieldType::Object(shape) = &spec.ty {
        validate_object(shape, value, field, out);
        return;
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = spec.min {
            if n < min {
                out.push(Violation::new(
                    location,
                    field,
                    "min",
                    format!("{value} is less than minimum {min}"),
                ));
            }
        }
        if let Some(max) = spec.max {
            if n > max {
                out.push(Violation::new(
                    location,
                    field,
                    "max",
                    format!("{value} is greater than maximum {max}"),
                ));
            }
        }
    }

    if let Some(s) = value.as_str() {
        let chars = s.chars().count();
        if let Some(min) = spec.min_length {
            if chars < min {
                out.push(Violation::new(
                    location,
                    field,
                    "min_length",
                    format!("length {chars} is less than minimum {min}"),
                ));
            }
        }
        if let Some(max) = spec.max_length {
            if chars > max {
                out.push(Violation::new(
                    location,
                    field,
                    "max_length",
                    format!("length {chars} is greater than maximum {max}"),
                ));
            }
        }
        if let FieldType::Enum(values) = &spec.ty {
            if !values.contains(&s) {
                out.push(Violation::new(
                    location,
                    field,
                    "enum",
                    format!("expected one of: {}", values.join(", ")),
                ));
            }
        }
    }
}

/// Validate a JSON value against an object shape, depth-first in declared
/// field order. `prefix` is the dotted path of this object within the body
/// (empty at the root).
fn validate_object(shape: &ObjectShape, value: &Value, prefix: &str, out: &mut Vec<Violation>) {
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => {
            let field = if prefix.is_empty() {
                shape.name.to_string()
            } else {
                prefix.to_string()
            };
            out.push(Violation::new(
                "body",
                field,
                "type",
                format!("expected object, found {}", json_type_name(value)),
            ));
            return;
        }
    };

    for field in &shape.fields {
        let path = join_path(prefix, field.name);
        match obj.get(field.name) {
            Some(Value::Null) | None => {
                if field.required {
                    out.push(Violation::new(
                        "body",
                        path,
                        "required",
                        "missing required field",
                    ));
                }
            }
            Some(value) => check_field(&field.spec, value, "body", &path, out),
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn type_matches(ty: &FieldType, value: &Value) -> bool {
    match ty {
        FieldType::String | FieldType::Enum(_) => value.is_string(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Number => value.is_number(),
        // Integral floats (5.0) pass; fractional or out-of-range ones do not
        FieldType::Integer => match value {
            Value::Number(n) => n.is_i64() || n.as_f64().is_some_and(fits_i64),
            _ => false,
        },
        FieldType::Object(_) => value.is_object(),
    }
}

/// Whether an f64 is integral and representable as an i64.
///
/// `i64::MAX as f64` rounds up to 2^63, one past the largest i64, so the
/// upper comparison must be strict.
pub(crate) fn fits_i64(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
