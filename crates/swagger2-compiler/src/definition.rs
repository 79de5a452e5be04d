use std::fmt;

use jsonschema::{Draft, Validator};
use serde_json::{Map, Value};
use swagger2_spec::{contains_ref, Location, Parameter, Response};

use crate::coerce::Coercion;

/// Why a value failed its definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Validator diagnostics, one line per violation. `None` for the
    /// emptiness rules, which have nothing further to say.
    pub detail: Option<String>,
}

impl Rejection {
    fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }

    fn bare() -> Self {
        Self { detail: None }
    }
}

/// A compiled acceptance rule.
enum Predicate {
    /// Accepts absent, null, `""`, `{}` and `[]`.
    EmptyBody,
    /// Accepts absent, null and `""`.
    NoContent,
    /// JSON Schema check, optionally after string coercion.
    Schema {
        required: bool,
        coercion: Option<Coercion>,
        validator: Result<Validator, String>,
    },
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::EmptyBody => f.write_str("EmptyBody"),
            Predicate::NoContent => f.write_str("NoContent"),
            Predicate::Schema {
                required,
                coercion,
                validator,
            } => f
                .debug_struct("Schema")
                .field("required", required)
                .field("coercion", coercion)
                .field("compiled", &validator.is_ok())
                .finish(),
        }
    }
}

/// What a value is checked against: the declared schema, type and format plus
/// the compiled predicate.
#[derive(Debug)]
pub struct CompiledDefinition {
    /// Wrapper schema (body parameters and responses).
    pub schema: Option<Value>,
    /// Declared `type` (non-body parameters).
    pub param_type: Option<String>,
    /// Declared `format` (non-body parameters).
    pub format: Option<String>,
    predicate: Predicate,
}

impl CompiledDefinition {
    /// The request rule for operations that declare no body: the body must be
    /// absent or empty.
    pub fn empty_body() -> Self {
        Self {
            schema: None,
            param_type: None,
            format: None,
            predicate: Predicate::EmptyBody,
        }
    }

    /// The response rule when no schema is declared: no body at all.
    pub fn no_content() -> Self {
        Self {
            schema: None,
            param_type: None,
            format: None,
            predicate: Predicate::NoContent,
        }
    }

    /// Check a value. `None` means the value was not supplied.
    pub fn check(&self, value: Option<&Value>) -> Result<(), Rejection> {
        match &self.predicate {
            Predicate::EmptyBody => match value {
                None | Some(Value::Null) => Ok(()),
                Some(Value::String(s)) if s.is_empty() => Ok(()),
                Some(Value::Object(o)) if o.is_empty() => Ok(()),
                Some(Value::Array(a)) if a.is_empty() => Ok(()),
                Some(_) => Err(Rejection::bare()),
            },
            Predicate::NoContent => match value {
                None | Some(Value::Null) => Ok(()),
                Some(Value::String(s)) if s.is_empty() => Ok(()),
                Some(_) => Err(Rejection::bare()),
            },
            Predicate::Schema {
                required,
                coercion,
                validator,
            } => {
                let Some(value) = value else {
                    return if *required {
                        Err(Rejection::with_detail("value is required"))
                    } else {
                        Ok(())
                    };
                };
                let validator = validator.as_ref().map_err(|e| {
                    Rejection::with_detail(format!("schema failed to compile: {}", e))
                })?;

                let coerced;
                let instance = match coercion {
                    Some(coercion) => {
                        coerced = coercion.apply(value);
                        &coerced
                    }
                    None => value,
                };

                if validator.is_valid(instance) {
                    return Ok(());
                }
                let detail: Vec<String> = validator
                    .iter_errors(instance)
                    .map(|e| {
                        let path = e.instance_path.to_string();
                        let path = if path.is_empty() { "/".to_string() } else { path };
                        format!("{}: {}", path, e)
                    })
                    .collect();
                Err(Rejection::with_detail(detail.join("\n")))
            }
        }
    }

    /// Whether the check passes.
    pub fn accepts(&self, value: Option<&Value>) -> bool {
        self.check(value).is_ok()
    }

    /// Whether the underlying schema compiled. Emptiness rules always have.
    pub fn is_compiled(&self) -> bool {
        match &self.predicate {
            Predicate::Schema { validator, .. } => validator.is_ok(),
            _ => true,
        }
    }
}

/// Options controlling schema compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Check string `format`s such as `date-time`, `email` and `uuid`.
    /// Unknown formats (`int32`, `int64`, ...) are always ignored.
    pub validate_formats: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            validate_formats: true,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable `format` checking.
    pub fn with_validate_formats(mut self, validate: bool) -> Self {
        self.validate_formats = validate;
        self
    }
}

/// Builds definitions for one document.
///
/// Schemas that still contain `$ref` pointers (recursive definitions) are
/// compiled with the document's `definitions` attached at their root.
pub(crate) struct SchemaFactory<'a> {
    definitions: &'a Map<String, Value>,
    options: &'a CompileOptions,
}

impl<'a> SchemaFactory<'a> {
    pub(crate) fn new(definitions: &'a Map<String, Value>, options: &'a CompileOptions) -> Self {
        Self {
            definitions,
            options,
        }
    }

    /// Compile a parameter. Transport parameters get string coercion; body and
    /// formData parameters are validated as-is.
    pub(crate) fn parameter(&self, parameter: &Parameter, context: &str) -> CompiledDefinition {
        let source = parameter
            .schema
            .clone()
            .unwrap_or_else(|| parameter.as_schema());
        let coercion = parameter
            .location
            .is_transport()
            .then(|| Coercion::for_parameter(parameter));
        let context = format!("{} {} '{}'", context, parameter.location, parameter.name);

        CompiledDefinition {
            schema: parameter.schema.clone(),
            param_type: parameter.param_type.clone(),
            format: parameter.format.clone(),
            predicate: Predicate::Schema {
                required: parameter.required || parameter.location == Location::Path,
                coercion,
                validator: self.build(&source, &context),
            },
        }
    }

    /// Compile a response. No schema means no body may be sent.
    pub(crate) fn response(&self, response: &Response, context: &str) -> CompiledDefinition {
        match &response.schema {
            Some(schema) => CompiledDefinition {
                schema: Some(schema.clone()),
                param_type: None,
                format: None,
                predicate: Predicate::Schema {
                    required: true,
                    coercion: None,
                    validator: self.build(schema, context),
                },
            },
            None => CompiledDefinition::no_content(),
        }
    }

    fn build(&self, schema: &Value, context: &str) -> Result<Validator, String> {
        let with_definitions;
        let schema = match schema {
            Value::Object(obj)
                if contains_ref(schema)
                    && !self.definitions.is_empty()
                    && !obj.contains_key("definitions") =>
            {
                let mut obj = obj.clone();
                obj.insert(
                    "definitions".into(),
                    Value::Object(self.definitions.clone()),
                );
                with_definitions = Value::Object(obj);
                &with_definitions
            }
            other => other,
        };

        jsonschema::options()
            .with_draft(Draft::Draft4)
            .should_validate_formats(self.options.validate_formats)
            .build(schema)
            .map_err(|e| {
                let message = e.to_string();
                swagger2_telemetry::log_schema_compile_failed!(
                    context = %context,
                    error = %message,
                    "schema failed to compile; validator will reject all values"
                );
                message
            })
    }
}
