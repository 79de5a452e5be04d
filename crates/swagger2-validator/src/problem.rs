use std::collections::HashMap;

use serde_json::Value;

use crate::error::ValidationError;

/// RFC 9457 problem details for routing and validation outcomes.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Extended fields for dev mode
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl ProblemDetails {
    /// 400 for a request that failed validation.
    ///
    /// In dev mode the individual errors (including the offending values) are
    /// attached under `errors`.
    pub fn validation_error(errors: &[ValidationError], dev_mode: bool) -> Self {
        let mut extensions = HashMap::new();

        if dev_mode && !errors.is_empty() {
            let error_details: Vec<Value> = errors.iter().map(ValidationError::to_json).collect();
            extensions.insert("errors".into(), Value::Array(error_details));
        }

        let detail = match errors {
            [single] => Some(single.to_string()),
            _ => Some(format!("{} validation errors", errors.len())),
        };

        ProblemDetails {
            error_type: "urn:swagger2:error:validation-failed".into(),
            title: "Request validation failed".into(),
            status: 400,
            detail,
            instance: None,
            extensions,
        }
    }

    /// 404 for a path that matches no template.
    pub fn not_found(path: &str) -> Self {
        ProblemDetails {
            error_type: "urn:swagger2:error:not-found".into(),
            title: "Not Found".into(),
            status: 404,
            detail: Some(format!("no path template matches '{}'", path)),
            instance: Some(path.to_string()),
            extensions: HashMap::new(),
        }
    }

    /// 405 for a method the matched path does not declare.
    pub fn method_not_allowed(method: &str) -> Self {
        ProblemDetails {
            error_type: "urn:swagger2:error:method-not-allowed".into(),
            title: "Method Not Allowed".into(),
            status: 405,
            detail: Some(format!("method {} is not allowed", method.to_uppercase())),
            instance: None,
            extensions: HashMap::new(),
        }
    }

    /// Attach the request path as the problem instance.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"urn:swagger2:error:internal","title":"Serialization error","status":500}"#.into()
        })
    }
}
