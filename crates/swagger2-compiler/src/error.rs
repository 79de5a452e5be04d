use thiserror::Error;

/// Errors produced while loading a document for compilation.
///
/// Compilation itself never fails: malformed schemas and templates compile
/// into validators and matchers that reject everything.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Document loading or checking failed.
    #[error(transparent)]
    Parse(#[from] swagger2_spec::ParseError),
}

impl CompileError {
    /// The stable error code of the underlying failure.
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Parse(e) => e.code(),
        }
    }
}
