use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::check::check_document;
use crate::deref::dereference;
use crate::error::ParseError;
use crate::model::{Document, Method};

/// Load a YAML or JSON document into a JSON value.
///
/// JSON is valid YAML, so both go through the YAML parser. Mapping keys that
/// YAML reads as numbers or booleans (`200:`) become strings.
pub fn load_document(input: &str) -> Result<Value, ParseError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(input).map_err(|e| ParseError::ParseError(e.to_string()))?;
    let root = yaml_to_json(yaml)?;
    if !root.is_object() {
        return Err(ParseError::ParseError("document root must be an object".into()));
    }
    Ok(root)
}

/// Load a document from a file path.
pub fn load_document_file(path: &Path) -> Result<Value, ParseError> {
    let content = std::fs::read_to_string(path)?;
    load_document(&content)
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, ParseError> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| ParseError::ParseError(format!("unsupported number: {}", n)))?
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut obj = Map::with_capacity(mapping.len());
            for (key, val) in mapping {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    Yaml::Null => "null".to_string(),
                    other => {
                        return Err(ParseError::ParseError(format!(
                            "unsupported mapping key: {:?}",
                            other
                        )))
                    }
                };
                obj.insert(key, yaml_to_json(val)?);
            }
            Value::Object(obj)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

/// Check, dereference and deserialize a loaded document.
pub fn validate_document(root: &Value) -> Result<Document, ParseError> {
    ensure_valid(root)?;
    let mut resolved = dereference(root)?;
    ensure_valid(&resolved)?;
    prune_extensions(&mut resolved);
    serde_json::from_value(resolved).map_err(|e| ParseError::SchemaError(e.to_string()))
}

/// Parse a Swagger 2.0 document from a YAML/JSON string.
pub fn parse_document(input: &str) -> Result<Document, ParseError> {
    let root = load_document(input)?;
    validate_document(&root)
}

/// Parse a Swagger 2.0 document from a file path.
pub fn parse_document_file(path: &Path) -> Result<Document, ParseError> {
    let root = load_document_file(path)?;
    validate_document(&root)
}

fn ensure_valid(root: &Value) -> Result<(), ParseError> {
    match check_document(root).into_iter().next() {
        None => Ok(()),
        Some(issue) if issue.code == "E1001" => Err(ParseError::UnknownFormat(issue.message)),
        Some(issue) => Err(ParseError::SchemaError(format!(
            "{}: {}",
            issue.location, issue.message
        ))),
    }
}

/// Drop `x-*` keys where the typed model expects a fixed shape.
fn prune_extensions(root: &mut Value) {
    let Some(paths) = root.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };
    paths.retain(|template, _| !template.starts_with("x-"));

    for item in paths.values_mut() {
        for method in Method::ALL {
            if let Some(responses) = item
                .get_mut(method.as_str())
                .and_then(|op| op.get_mut("responses"))
                .and_then(Value::as_object_mut)
            {
                responses.retain(|status, _| !status.starts_with("x-"));
            }
        }
    }
}
