use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use swagger2_compiler::CompiledDefinition;
use swagger2_spec::Location;

/// What the value was checked against.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// The violated constraint. At least one field is present.
    Constraint {
        schema: Option<Value>,
        param_type: Option<String>,
        format: Option<String>,
    },
    /// No definition exists for the response status (or method).
    UndefinedSchema,
    /// The value is not allowed at all (undeclared query key).
    Nothing,
    /// No path template matched.
    Path,
}

impl Expected {
    /// The constraint a failed definition describes, or `None` if it declares
    /// no schema, type or format.
    pub fn from_definition(definition: &CompiledDefinition) -> Option<Self> {
        if definition.schema.is_none() && definition.param_type.is_none() && definition.format.is_none() {
            return None;
        }
        Some(Expected::Constraint {
            schema: definition.schema.clone(),
            param_type: definition.param_type.clone(),
            format: definition.format.clone(),
        })
    }

    pub fn constraint_type(&self) -> Option<&str> {
        match self {
            Expected::Constraint { param_type, .. } => param_type.as_deref(),
            _ => None,
        }
    }

    pub fn constraint_schema(&self) -> Option<&Value> {
        match self {
            Expected::Constraint { schema, .. } => schema.as_ref(),
            _ => None,
        }
    }
}

impl Serialize for Expected {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expected::Constraint {
                schema,
                param_type,
                format,
            } => {
                let mut map = serializer.serialize_map(None)?;
                if let Some(schema) = schema {
                    map.serialize_entry("schema", schema)?;
                }
                if let Some(param_type) = param_type {
                    map.serialize_entry("type", param_type)?;
                }
                if let Some(format) = format {
                    map.serialize_entry("format", format)?;
                }
                map.end()
            }
            Expected::UndefinedSchema => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("schema", &Value::Null)?;
                map.end()
            }
            Expected::Nothing => serializer.serialize_map(Some(0))?.end(),
            Expected::Path => serializer.serialize_str("PATH"),
        }
    }
}

/// A single request or response violation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationError {
    /// Where the value came from. Absent for response errors.
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Parameter (or undeclared query key) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The offending value. `None` when it was not supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    /// `None` when no constraint applies (e.g. the body must be empty).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Expected>,
    /// Validator diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationError {
    /// The error for a path that matched no template.
    pub fn undefined_path() -> Self {
        Self {
            location: None,
            name: None,
            actual: Some(Value::String("UNDEFINED_PATH".into())),
            expected: Some(Expected::Path),
            error: None,
        }
    }

    pub(crate) fn at(mut self, location: Location, name: Option<&str>) -> Self {
        self.location = Some(location);
        self.name = name.map(str::to_string);
        self
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.expected, self.location, &self.name) {
            (Some(Expected::Path), _, _) => return f.write_str("no path template matches the request"),
            (Some(Expected::Nothing), Some(location), Some(name)) => {
                return write!(f, "unexpected {} parameter '{}'", location, name)
            }
            (_, Some(location), Some(name)) => write!(f, "invalid {} parameter '{}'", location, name)?,
            (None, Some(Location::Body), None) => return f.write_str("request body must be empty"),
            (_, Some(Location::Body), None) => f.write_str("invalid request body")?,
            (_, Some(location), None) => write!(f, "invalid {} value", location)?,
            (Some(Expected::UndefinedSchema), None, _) => {
                return f.write_str("no response is declared for this status")
            }
            (None, None, _) => return f.write_str("response must have no body"),
            (_, None, _) => f.write_str("invalid response body")?,
        }
        match (&self.error, &self.actual) {
            (Some(error), _) => write!(f, ": {}", error),
            (None, None) => f.write_str(": value is missing"),
            (None, Some(_)) => Ok(()),
        }
    }
}

impl std::error::Error for ValidationError {}
