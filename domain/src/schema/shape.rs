//! Output shape definitions
//!
//! An [`OutputShape`] is a declarative description of the structure a
//! generated value must have. Shapes are built once per request kind and
//! never mutated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Format hint for string values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFormat {
    /// Absolute URI (`https://...`) or a `data:` URI
    Uri,
}

/// Declarative description of an expected value structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputShape {
    /// A string, optionally restricted to an enumeration or a format
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        allowed: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<StringFormat>,
    },
    /// A number, optionally bounded and/or integral
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default)]
        integer: bool,
    },
    Boolean,
    /// A homogeneous array
    Array { items: Box<OutputShape> },
    /// An object with declared fields; undeclared fields are ignored
    Object { fields: Vec<FieldShape> },
    /// Any JSON value (no validation)
    Any,
}

/// A named field inside an object shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldShape {
    pub name: String,
    pub shape: OutputShape,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldShape {
    pub fn required(name: impl Into<String>, shape: OutputShape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: true,
            description: None,
        }
    }

    pub fn optional(name: impl Into<String>, shape: OutputShape) -> Self {
        Self {
            name: name.into(),
            shape,
            required: false,
            description: None,
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl OutputShape {
    // ==================== Constructors ====================

    pub fn string() -> Self {
        OutputShape::String {
            allowed: None,
            format: None,
        }
    }

    /// String restricted to the given values
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OutputShape::String {
            allowed: Some(values.into_iter().map(Into::into).collect()),
            format: None,
        }
    }

    pub fn uri() -> Self {
        OutputShape::String {
            allowed: None,
            format: Some(StringFormat::Uri),
        }
    }

    pub fn number() -> Self {
        OutputShape::Number {
            min: None,
            max: None,
            integer: false,
        }
    }

    pub fn integer() -> Self {
        OutputShape::Number {
            min: None,
            max: None,
            integer: true,
        }
    }

    pub fn boolean() -> Self {
        OutputShape::Boolean
    }

    pub fn array(items: OutputShape) -> Self {
        OutputShape::Array {
            items: Box::new(items),
        }
    }

    pub fn object(fields: impl IntoIterator<Item = FieldShape>) -> Self {
        OutputShape::Object {
            fields: fields.into_iter().collect(),
        }
    }

    /// Object with no fields (e.g. zero-argument tool input)
    pub fn empty_object() -> Self {
        OutputShape::Object { fields: Vec::new() }
    }

    pub fn any() -> Self {
        OutputShape::Any
    }

    /// Apply inclusive numeric bounds. No effect on non-number shapes.
    pub fn bounded(self, lower: f64, upper: f64) -> Self {
        match self {
            OutputShape::Number { integer, .. } => OutputShape::Number {
                min: Some(lower),
                max: Some(upper),
                integer,
            },
            other => other,
        }
    }

    // ==================== Introspection ====================

    /// Look up a declared field of an object shape
    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        match self {
            OutputShape::Object { fields } => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    /// Short human-readable description used in error messages
    pub fn describe(&self) -> String {
        match self {
            OutputShape::String {
                allowed: Some(values),
                ..
            } => format!("string (one of: {})", values.join(", ")),
            OutputShape::String {
                format: Some(StringFormat::Uri),
                ..
            } => "uri string".to_string(),
            OutputShape::String { .. } => "string".to_string(),
            OutputShape::Number { min, max, integer } => {
                let kind = if *integer { "integer" } else { "number" };
                match (min, max) {
                    (Some(lo), Some(hi)) => format!("{} in [{}, {}]", kind, lo, hi),
                    (Some(lo), None) => format!("{} >= {}", kind, lo),
                    (None, Some(hi)) => format!("{} <= {}", kind, hi),
                    (None, None) => kind.to_string(),
                }
            }
            OutputShape::Boolean => "boolean".to_string(),
            OutputShape::Array { items } => format!("array of {}", items.describe()),
            OutputShape::Object { .. } => "object".to_string(),
            OutputShape::Any => "any".to_string(),
        }
    }

    /// Render this shape as JSON Schema for provider tool/response declarations
    pub fn to_json_schema(&self) -> Value {
        match self {
            OutputShape::String { allowed, format } => {
                let mut schema = json!({ "type": "string" });
                if let Some(values) = allowed {
                    schema["enum"] = json!(values);
                }
                if let Some(StringFormat::Uri) = format {
                    schema["format"] = json!("uri");
                }
                schema
            }
            OutputShape::Number { min, max, integer } => {
                let mut schema = json!({
                    "type": if *integer { "integer" } else { "number" }
                });
                if let Some(lo) = min {
                    schema["minimum"] = json!(lo);
                }
                if let Some(hi) = max {
                    schema["maximum"] = json!(hi);
                }
                schema
            }
            OutputShape::Boolean => json!({ "type": "boolean" }),
            OutputShape::Array { items } => json!({
                "type": "array",
                "items": items.to_json_schema(),
            }),
            OutputShape::Object { fields } => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for field in fields {
                    let mut schema = field.shape.to_json_schema();
                    if let Some(description) = &field.description {
                        schema["description"] = json!(description);
                    }
                    properties.insert(field.name.clone(), schema);
                    if field.required {
                        required.push(Value::String(field.name.clone()));
                    }
                }
                let mut schema = json!({
                    "type": "object",
                    "properties": Value::Object(properties),
                });
                if !required.is_empty() {
                    schema["required"] = Value::Array(required);
                }
                schema
            }
            OutputShape::Any => json!({}),
        }
    }
}
