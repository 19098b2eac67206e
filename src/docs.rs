//! OpenAPI document generation.
//!
//! Renders the route table as an OpenAPI 3.1 document with inline schemas.
//! The same `FieldSpec` data the validator enforces at runtime becomes
//! `minimum`/`maximum`/`minLength`/`maxLength`/`enum` in the document, so the
//! two can never drift apart. Parameters flagged undocumented are enforced at
//! runtime but omitted here.

use crate::routes::RouteMeta;
use crate::shape::{FieldSpec, FieldType, ObjectShape};
use serde_json::{json, Map, Value};

/// Embedded Swagger UI page served at `/docs`, pointed at `/openapi.json`.
// Double-hash delimiters: the page body contains `"#` inside the dom_id string.
pub const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html>
<head>
<title>armory - Swagger UI</title>
<link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
<script>
window.onload = () => {
    window.ui = SwaggerUIBundle({
        url: "/openapi.json",
        dom_id: "#swagger-ui",
    });
};
</script>
</body>
</html>
"##;

/// Render the OpenAPI document for a route table.
#[must_use]
pub fn openapi_json(routes: &[RouteMeta]) -> Value {
    let mut paths: Map<String, Value> = Map::new();

    for route in routes {
        let entry = paths
            .entry(route.path_pattern.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(path_item) = entry.as_object_mut() {
            path_item.insert(
                route.method.as_str().to_lowercase(),
                operation_object(route),
            );
        }
    }

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "armory",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": paths,
    })
}

fn operation_object(route: &RouteMeta) -> Value {
    let mut operation = Map::new();
    operation.insert("summary".to_string(), json!(route.summary));
    operation.insert("operationId".to_string(), json!(route.handler_name));

    let parameters: Vec<Value> = route
        .params
        .iter()
        .filter(|p| p.documented)
        .map(|p| {
            let mut schema = field_schema(&p.spec);
            if let (Some(default), Some(obj)) = (&p.default, schema.as_object_mut()) {
                obj.insert("default".to_string(), default.clone());
            }
            json!({
                "name": p.name,
                "in": p.location.as_str(),
                "required": p.required,
                "schema": schema,
            })
        })
        .collect();
    if !parameters.is_empty() {
        operation.insert("parameters".to_string(), json!(parameters));
    }

    if let Some(shape) = route.body.shape() {
        operation.insert(
            "requestBody".to_string(),
            json!({
                "required": route.body.is_required(),
                "content": {
                    "application/json": { "schema": object_schema(shape) }
                }
            }),
        );
    }

    let mut responses = Map::new();
    responses.insert(
        "200".to_string(),
        json!({ "description": "Successful Response" }),
    );
    if !route.params.is_empty() || route.body.shape().is_some() {
        responses.insert(
            "422".to_string(),
            json!({ "description": "Validation Error" }),
        );
    }
    operation.insert("responses".to_string(), Value::Object(responses));

    Value::Object(operation)
}

fn field_schema(spec: &FieldSpec) -> Value {
    let mut schema = Map::new();
    match &spec.ty {
        FieldType::Enum(values) => {
            schema.insert("type".to_string(), json!("string"));
            schema.insert("enum".to_string(), json!(values));
        }
        FieldType::Object(shape) => return object_schema(shape),
        other => {
            schema.insert("type".to_string(), json!(other.name()));
        }
    }
    if let Some(min) = spec.min {
        schema.insert("minimum".to_string(), number_value(min));
    }
    if let Some(max) = spec.max {
        schema.insert("maximum".to_string(), number_value(max));
    }
    if let Some(min_length) = spec.min_length {
        schema.insert("minLength".to_string(), json!(min_length));
    }
    if let Some(max_length) = spec.max_length {
        schema.insert("maxLength".to_string(), json!(max_length));
    }
    Value::Object(schema)
}

/// Integral bounds render as JSON integers, not `0.0`.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

fn object_schema(shape: &ObjectShape) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<&str> = Vec::new();
    for field in &shape.fields {
        properties.insert(field.name.to_string(), field_schema(&field.spec));
        if field.required {
            required.push(field.name);
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("title".to_string(), json!(shape.name));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), json!(required));
    }
    Value::Object(schema)
}
