use thiserror::Error;

/// Errors produced while loading a Swagger document (E1001–E1004).
#[derive(Debug, Error)]
pub enum ParseError {
    /// E1001: Document is not Swagger 2.0.
    #[error("E1001: not a Swagger 2.0 document: {0}")]
    UnknownFormat(String),

    /// E1002: YAML/JSON parse error.
    #[error("E1002: parse error: {0}")]
    ParseError(String),

    /// E1003: Unresolved or external $ref.
    #[error("E1003: unresolved $ref: {0}")]
    UnresolvedRef(String),

    /// E1004: Document structure error.
    #[error("E1004: schema validation error: {0}")]
    SchemaError(String),

    /// I/O error reading the document file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// The stable error code, or `E1000` for I/O failures.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::UnknownFormat(_) => "E1001",
            ParseError::ParseError(_) => "E1002",
            ParseError::UnresolvedRef(_) => "E1003",
            ParseError::SchemaError(_) => "E1004",
            ParseError::Io(_) => "E1000",
        }
    }
}
