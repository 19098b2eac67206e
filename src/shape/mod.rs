//! Declarative request-shape validation.
//!
//! Every route declares the shape of its inputs as data: a [`FieldSpec`] per
//! path/query parameter and an optional [`ObjectShape`] for the JSON body.
//! The validation pass ([`validate_request`]) runs before any handler code,
//! coerces raw strings to typed values, applies declared defaults, and
//! collects **every** constraint failure as a [`Violation`] rather than
//! stopping at the first. A request either produces a [`ValidatedInput`] or a
//! non-empty violation list; handlers never see unvalidated data.
//!
//! Constraints are enumerated per field (type, numeric range, string length,
//! enum membership) instead of being scattered through handler code, which
//! also lets the OpenAPI generator render them straight from the same
//! metadata.

mod validate;

pub use validate::{validate_request, ValidatedInput};
pub(crate) use validate::fits_i64;

use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::sync::Arc;

/// Stack-allocated storage for coerced parameter values.
///
/// Names come from the static route table, so `Arc<str>` clones are O(1);
/// values are per-request `serde_json::Value`s produced by coercion. Sized
/// to match [`crate::router::MAX_INLINE_PARAMS`].
pub type ValueVec = SmallVec<[(Arc<str>, Value); crate::router::MAX_INLINE_PARAMS]>;

/// The primitive (or nested) type a field must have.
#[derive(Debug, Clone)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    /// Closed string enumeration; membership failures use the `enum` code.
    Enum(&'static [&'static str]),
    /// Nested object validated recursively against its own shape.
    Object(Arc<ObjectShape>),
}

impl FieldType {
    /// Name used in `expected <type>` violation messages and OpenAPI schemas.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String | FieldType::Enum(_) => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object(_) => "object",
        }
    }
}

/// A field's type plus its declared constraints.
///
/// Numeric bounds are inclusive and apply to integer and number fields;
/// length bounds count characters of string fields.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub ty: FieldType,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl FieldSpec {
    fn of(ty: FieldType) -> Self {
        FieldSpec {
            ty,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    pub fn integer() -> Self {
        Self::of(FieldType::Integer)
    }

    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::of(FieldType::Boolean)
    }

    pub fn enumeration(values: &'static [&'static str]) -> Self {
        Self::of(FieldType::Enum(values))
    }

    pub fn object(shape: Arc<ObjectShape>) -> Self {
        Self::of(FieldType::Object(shape))
    }

    /// Inclusive numeric bounds.
    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min as f64);
        self.max = Some(max as f64);
        self
    }

    /// Inclusive character-count bounds.
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }
}

/// One named field of an [`ObjectShape`].
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub required: bool,
    pub spec: FieldSpec,
}

impl FieldDef {
    pub fn required(name: &'static str, spec: FieldSpec) -> Self {
        FieldDef {
            name,
            required: true,
            spec,
        }
    }

    pub fn optional(name: &'static str, spec: FieldSpec) -> Self {
        FieldDef {
            name,
            required: false,
            spec,
        }
    }
}

/// A named record definition for a JSON body (or nested object).
///
/// Unknown extra fields are ignored; `null` counts as absent.
#[derive(Debug, Clone)]
pub struct ObjectShape {
    pub name: &'static str,
    pub fields: Vec<FieldDef>,
}

/// Whether a route takes a JSON body, and against which shape.
#[derive(Debug, Clone)]
pub enum BodySpec {
    /// No body; a stray body on the request is ignored.
    None,
    Required(Arc<ObjectShape>),
    Optional(Arc<ObjectShape>),
}

impl BodySpec {
    pub fn shape(&self) -> Option<&Arc<ObjectShape>> {
        match self {
            BodySpec::None => None,
            BodySpec::Required(s) | BodySpec::Optional(s) => Some(s),
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, BodySpec::Required(_))
    }
}

/// One field-level validation failure.
///
/// `location` is `path`, `query`, or `body`; `field` is the parameter name or
/// the dotted path of a body field (`item.item_stock`); `code` is one of
/// `required`, `type`, `min`, `max`, `min_length`, `max_length`, `enum`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub location: &'static str,
    pub field: String,
    pub code: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(
        location: &'static str,
        field: impl Into<String>,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Violation {
            location,
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}
