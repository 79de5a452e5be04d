use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{CollectionFormat, Location, Method};

/// A structural problem found in a Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentIssue {
    /// `E1001` for a non-Swagger document, `E1004` for structure errors.
    pub code: &'static str,
    pub message: String,
    /// JSON pointer to the offending node.
    pub location: String,
}

impl DocumentIssue {
    fn format(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: "E1001",
            message: message.into(),
            location: location.into(),
        }
    }

    fn structure(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: "E1004",
            message: message.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for DocumentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.location.is_empty() { "/" } else { &self.location };
        write!(f, "{} {}: {}", self.code, location, self.message)
    }
}

/// Escape a key for use as a JSON pointer segment.
fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Check a loaded document against the Swagger 2.0 structure.
///
/// Parameters given as `$ref` are skipped here; they are checked again once
/// the document has been dereferenced.
pub fn check_document(root: &Value) -> Vec<DocumentIssue> {
    let mut issues = Vec::new();

    let Some(obj) = root.as_object() else {
        issues.push(DocumentIssue::structure("", "document root must be an object"));
        return issues;
    };

    match obj.get("swagger") {
        Some(Value::String(version)) if version == "2.0" => {}
        Some(other) => {
            let version = other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string());
            issues.push(DocumentIssue::format(
                "/swagger",
                format!("unsupported swagger version: {} (only 2.0 supported)", version),
            ));
            return issues;
        }
        None => {
            let message = match obj.get("openapi").and_then(Value::as_str) {
                Some(version) => format!("found OpenAPI {}, expected 'swagger: \"2.0\"'", version),
                None => "missing 'swagger' field".to_string(),
            };
            issues.push(DocumentIssue::format("/swagger", message));
            return issues;
        }
    }

    match obj.get("info").and_then(Value::as_object) {
        Some(info) => {
            for field in ["title", "version"] {
                if !info.get(field).is_some_and(Value::is_string) {
                    issues.push(DocumentIssue::structure(
                        format!("/info/{}", field),
                        format!("missing 'info.{}'", field),
                    ));
                }
            }
        }
        None => issues.push(DocumentIssue::structure("/info", "missing 'info' object")),
    }

    if let Some(base_path) = obj.get("basePath") {
        if !base_path.as_str().is_some_and(|p| p.starts_with('/')) {
            issues.push(DocumentIssue::structure(
                "/basePath",
                "basePath must be a string starting with '/'",
            ));
        }
    }

    match obj.get("paths").and_then(Value::as_object) {
        Some(paths) => {
            for (template, item) in paths {
                if template.starts_with("x-") {
                    continue;
                }
                let pointer = format!("/paths/{}", escape(template));
                if !template.starts_with('/') {
                    issues.push(DocumentIssue::structure(
                        pointer.clone(),
                        format!("path '{}' must start with '/'", template),
                    ));
                }
                check_path_item(item, &pointer, &mut issues);
            }
        }
        None => issues.push(DocumentIssue::structure("/paths", "missing 'paths' object")),
    }

    issues
}

fn check_path_item(item: &Value, pointer: &str, issues: &mut Vec<DocumentIssue>) {
    let Some(item) = item.as_object() else {
        issues.push(DocumentIssue::structure(pointer, "path item must be an object"));
        return;
    };

    if let Some(params) = item.get("parameters") {
        check_parameters(params, &format!("{}/parameters", pointer), issues);
    }

    for method in Method::ALL {
        let Some(operation) = item.get(method.as_str()) else {
            continue;
        };
        let op_pointer = format!("{}/{}", pointer, method.as_str());
        let Some(operation) = operation.as_object() else {
            issues.push(DocumentIssue::structure(op_pointer, "operation must be an object"));
            continue;
        };
        check_operation(operation, &op_pointer, issues);
    }
}

fn check_operation(operation: &Map<String, Value>, pointer: &str, issues: &mut Vec<DocumentIssue>) {
    match operation.get("responses").and_then(Value::as_object) {
        Some(responses) => {
            for (status, response) in responses {
                if status.starts_with("x-") {
                    continue;
                }
                let response_pointer = format!("{}/responses/{}", pointer, escape(status));
                if status != "default" && status.parse::<u16>().is_err() {
                    issues.push(DocumentIssue::structure(
                        response_pointer.clone(),
                        format!("response key '{}' must be a status code or 'default'", status),
                    ));
                }
                if !response.is_object() {
                    issues.push(DocumentIssue::structure(response_pointer, "response must be an object"));
                }
            }
        }
        None => issues.push(DocumentIssue::structure(
            format!("{}/responses", pointer),
            "operation is missing a 'responses' object",
        )),
    }

    if let Some(params) = operation.get("parameters") {
        check_parameters(params, &format!("{}/parameters", pointer), issues);
    }
}

fn check_parameters(params: &Value, pointer: &str, issues: &mut Vec<DocumentIssue>) {
    let Some(params) = params.as_array() else {
        issues.push(DocumentIssue::structure(pointer, "parameters must be an array"));
        return;
    };

    for (index, param) in params.iter().enumerate() {
        let param_pointer = format!("{}/{}", pointer, index);
        let Some(param) = param.as_object() else {
            issues.push(DocumentIssue::structure(param_pointer, "parameter must be an object"));
            continue;
        };
        if param.contains_key("$ref") {
            continue;
        }
        check_parameter(param, &param_pointer, issues);
    }
}

fn check_parameter(param: &Map<String, Value>, pointer: &str, issues: &mut Vec<DocumentIssue>) {
    if !param.get("name").is_some_and(Value::is_string) {
        issues.push(DocumentIssue::structure(
            format!("{}/name", pointer),
            "parameter is missing 'name'",
        ));
    }

    let location = match param.get("in").and_then(Value::as_str) {
        Some(raw) => match Location::parse(raw) {
            Some(location) => location,
            None => {
                issues.push(DocumentIssue::structure(
                    format!("{}/in", pointer),
                    format!("unknown parameter location '{}'", raw),
                ));
                return;
            }
        },
        None => {
            issues.push(DocumentIssue::structure(
                format!("{}/in", pointer),
                "parameter is missing 'in'",
            ));
            return;
        }
    };

    if location == Location::Path && param.get("required") != Some(&Value::Bool(true)) {
        issues.push(DocumentIssue::structure(
            format!("{}/required", pointer),
            "path parameters must be 'required: true'",
        ));
    }

    if location == Location::Body {
        if !param.contains_key("schema") {
            issues.push(DocumentIssue::structure(
                format!("{}/schema", pointer),
                "body parameter is missing 'schema'",
            ));
        }
        return;
    }

    if !param.get("type").is_some_and(Value::is_string) {
        issues.push(DocumentIssue::structure(
            format!("{}/type", pointer),
            format!("{} parameter is missing 'type'", location),
        ));
    }

    if let Some(format) = param.get("collectionFormat") {
        match format.as_str().and_then(CollectionFormat::parse) {
            Some(CollectionFormat::Multi)
                if !matches!(location, Location::Query | Location::FormData) =>
            {
                issues.push(DocumentIssue::structure(
                    format!("{}/collectionFormat", pointer),
                    format!("collectionFormat 'multi' is not allowed in {}", location),
                ));
            }
            Some(_) => {}
            None => issues.push(DocumentIssue::structure(
                format!("{}/collectionFormat", pointer),
                format!("unknown collectionFormat {}", format),
            )),
        }
    }
}
