//! TestApi: compile a document once, then validate requests and responses.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;
use thiserror::Error;

use swagger2_compiler::{compile_spec_file, Compiled, CompiledPath};
use swagger2_spec::Method;
use swagger2_validator::{request, response, RequestParts, ValidationError};

/// Errors from TestApi operations.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("compilation failed: {0}")]
    Compile(#[from] swagger2_compiler::CompileError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("fixture not found: {0}")]
    FixtureNotFound(String),
}

/// Absolute path to the shared `tests/fixtures` directory.
pub fn fixtures_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR = .../crates/swagger2-test
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
}

/// Absolute path to a named fixture.
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// A compiled document with request/response helpers.
pub struct TestApi {
    compiled: Compiled,
    /// Temp directory holding an inline document (kept alive for the test).
    _temp_dir: Option<TempDir>,
}

impl TestApi {
    /// Compile a fixture from `tests/fixtures/`.
    pub fn from_fixture(name: &str) -> Result<Self, TestError> {
        let path = fixture_path(name);
        if !path.exists() {
            return Err(TestError::FixtureNotFound(path.display().to_string()));
        }
        Self::from_file(&path)
    }

    /// Compile a document file.
    pub fn from_file(path: &Path) -> Result<Self, TestError> {
        Ok(Self {
            compiled: compile_spec_file(path)?,
            _temp_dir: None,
        })
    }

    /// Compile an inline YAML or JSON document via a temporary file.
    pub fn from_yaml(document: &str) -> Result<Self, TestError> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("api.yaml");
        std::fs::write(&path, document)?;
        Ok(Self {
            compiled: compile_spec_file(&path)?,
            _temp_dir: Some(temp_dir),
        })
    }

    pub fn compiled(&self) -> &Compiled {
        &self.compiled
    }

    /// Match a request path.
    pub fn path(&self, path: &str) -> Option<CompiledPath<'_>> {
        self.compiled.lookup(path)
    }

    /// Start building a request.
    pub fn request(&self, method: &str, path: &str) -> TestRequest<'_> {
        TestRequest {
            api: self,
            method: method.to_string(),
            path: path.to_string(),
            query: None,
            body: None,
            headers: None,
            path_parameters: None,
        }
    }

    /// Validate a response body for `method path` with `status`.
    pub fn response(&self, method: &str, path: &str, status: u16, body: Option<Value>) -> Option<ValidationError> {
        let compiled_path = self.path(path);
        response(compiled_path.as_ref(), method, status, body.as_ref())
    }

    /// Like [`TestApi::response`], serialized the way callers see it.
    pub fn response_json(&self, method: &str, path: &str, status: u16, body: Option<Value>) -> Option<Value> {
        self.response(method, path, status, body)
            .map(|error| error.to_json())
    }
}

/// A request under construction.
pub struct TestRequest<'a> {
    api: &'a TestApi,
    method: String,
    path: String,
    query: Option<Value>,
    body: Option<Value>,
    headers: Option<Value>,
    path_parameters: Option<Value>,
}

impl TestRequest<'_> {
    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn headers(mut self, headers: Value) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn path_parameters(mut self, path_parameters: Value) -> Self {
        self.path_parameters = Some(path_parameters);
        self
    }

    /// Validate the request. `None` means no path or no operation matched.
    pub fn send(&self) -> Option<Vec<ValidationError>> {
        let compiled_path = self.api.path(&self.path);

        let mut parts = RequestParts::new();
        if let Some(query) = &self.query {
            parts = parts.with_query(query);
        }
        if let Some(body) = &self.body {
            parts = parts.with_body(body);
        }
        if let Some(headers) = &self.headers {
            parts = parts.with_headers(headers);
        }
        if let Some(path_parameters) = &self.path_parameters {
            parts = parts.with_path_parameters(path_parameters);
        }

        request(compiled_path.as_ref(), &self.method, parts)
    }

    /// The errors serialized as a JSON array.
    pub fn send_json(&self) -> Option<Value> {
        self.send()
            .map(|errors| Value::Array(errors.iter().map(ValidationError::to_json).collect()))
    }

    /// The HTTP status a server would answer with: 404, 405, 400 or 200.
    pub fn status(&self) -> u16 {
        let Some(compiled_path) = self.api.path(&self.path) else {
            return 404;
        };
        let declared = Method::parse(&self.method).and_then(|m| compiled_path.operation(m));
        if declared.is_none() {
            return 405;
        }
        match self.send() {
            Some(errors) if errors.is_empty() => 200,
            Some(_) => 400,
            None => 405,
        }
    }
}
