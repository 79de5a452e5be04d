//! Request and response validation for compiled Swagger 2.0 documents.
//!
//! Works on already-decoded request data (query map, parsed body, header map)
//! so it can sit behind any HTTP framework. Routing misses and undeclared
//! methods are reported as `None` so callers can answer 404/405; everything
//! else becomes a list of [`ValidationError`]s (400).

use std::borrow::Cow;

use serde_json::Value;
use swagger2_compiler::{CompiledDefinition, CompiledPath};
use swagger2_spec::{Location, Method};

pub mod error;
pub mod problem;

pub use error::{Expected, ValidationError};
pub use problem::ProblemDetails;

/// The decoded parts of a request.
///
/// `query`, `headers` and `path_parameters` are JSON objects; repeated query
/// keys are arrays. `body` is the parsed request body (form fields as an
/// object for `formData` parameters).
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestParts<'a> {
    pub query: Option<&'a Value>,
    pub body: Option<&'a Value>,
    pub headers: Option<&'a Value>,
    /// Explicit path parameters. When set, values are never recovered from
    /// the request path.
    pub path_parameters: Option<&'a Value>,
}

impl<'a> RequestParts<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: &'a Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_body(mut self, body: &'a Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_headers(mut self, headers: &'a Value) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_path_parameters(mut self, path_parameters: &'a Value) -> Self {
        self.path_parameters = Some(path_parameters);
        self
    }
}

/// Compare a value against a definition.
///
/// No definition is itself an error (`expected: {schema: null}`).
pub fn compare(value: Option<&Value>, definition: Option<&CompiledDefinition>) -> Option<ValidationError> {
    let Some(definition) = definition else {
        return Some(ValidationError {
            location: None,
            name: None,
            actual: value.cloned(),
            expected: Some(Expected::UndefinedSchema),
            error: None,
        });
    };

    let rejection = definition.check(value).err()?;
    Some(ValidationError {
        location: None,
        name: None,
        actual: value.cloned(),
        expected: Expected::from_definition(definition),
        error: rejection.detail,
    })
}

/// Validate a request.
///
/// Returns `None` when there is no matched path (404) or the path declares no
/// operation for `method` (405). Otherwise returns every violation found; an
/// empty list means the request is valid.
pub fn request(
    compiled_path: Option<&CompiledPath<'_>>,
    method: &str,
    parts: RequestParts<'_>,
) -> Option<Vec<ValidationError>> {
    let Some(compiled_path) = compiled_path else {
        swagger2_telemetry::log_route_not_found!(method, "request has no matching path");
        return None;
    };
    let Some(operation) = Method::parse(method).and_then(|m| compiled_path.operation(m)) else {
        swagger2_telemetry::log_method_not_allowed!(
            method,
            template = compiled_path.name(),
            "path declares no operation for method"
        );
        return None;
    };

    let mut errors = Vec::new();

    if operation.resolved_parameters.is_empty() {
        if let Some(error) = compare(parts.body, Some(&CompiledDefinition::empty_body())) {
            errors.push(error.at(Location::Body, None));
        }
        if let Some(Value::Object(query)) = parts.query {
            for (key, value) in query {
                errors.push(ValidationError {
                    location: Some(Location::Query),
                    name: Some(key.clone()),
                    actual: Some(value.clone()),
                    expected: Some(Expected::Nothing),
                    error: None,
                });
            }
        }
        log_failures(compiled_path, method, &errors);
        return Some(errors);
    }

    let mut body_claimed = false;
    for compiled in &operation.resolved_parameters {
        let parameter = &compiled.parameter;
        let name = parameter.name.as_str();

        let value: Option<Cow<'_, Value>> = match parameter.location {
            Location::Query => parts.query.and_then(|q| q.get(name)).map(Cow::Borrowed),
            Location::Header => header(parts.headers, name).map(Cow::Borrowed),
            Location::Path => match parts.path_parameters {
                Some(explicit) => explicit.get(name).map(Cow::Borrowed),
                None => compiled_path
                    .path_parameter(name)
                    .map(|v| Cow::Owned(Value::String(v.to_string()))),
            },
            Location::Body => {
                body_claimed = true;
                parts.body.map(Cow::Borrowed)
            }
            Location::FormData => {
                body_claimed = true;
                parts.body.and_then(|b| b.get(name)).map(Cow::Borrowed)
            }
        };

        if let Some(error) = compare(value.as_deref(), Some(&compiled.definition)) {
            errors.push(error.at(parameter.location, Some(name)));
        }
    }

    if !body_claimed && parts.body.is_some() {
        if let Some(error) = compare(parts.body, Some(&CompiledDefinition::empty_body())) {
            errors.push(error.at(Location::Body, None));
        }
    }

    log_failures(compiled_path, method, &errors);
    Some(errors)
}

/// Validate a response body.
///
/// The response is looked up by status, falling back to `default`. Returns
/// `None` when the body is valid.
pub fn response(
    compiled_path: Option<&CompiledPath<'_>>,
    method: &str,
    status: u16,
    body: Option<&Value>,
) -> Option<ValidationError> {
    let Some(compiled_path) = compiled_path else {
        return Some(ValidationError::undefined_path());
    };

    let definition = Method::parse(method)
        .and_then(|m| compiled_path.operation(m))
        .and_then(|operation| operation.response(status));

    let error = compare(body, definition)?;
    swagger2_telemetry::log_validation_failure!(
        template = compiled_path.name(),
        method,
        status,
        error = %error,
        "response failed validation"
    );
    Some(error)
}

/// Header lookup: exact name first, then ASCII case-insensitive.
fn header<'v>(headers: Option<&'v Value>, name: &str) -> Option<&'v Value> {
    let headers = headers?.as_object()?;
    headers.get(name).or_else(|| {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn log_failures(compiled_path: &CompiledPath<'_>, method: &str, errors: &[ValidationError]) {
    if errors.is_empty() {
        return;
    }
    swagger2_telemetry::log_validation_failure!(
        template = compiled_path.name(),
        method,
        errors = errors.len(),
        first = %errors[0],
        "request failed validation"
    );
}
