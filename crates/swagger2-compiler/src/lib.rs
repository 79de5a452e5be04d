//! Swagger 2.0 document compiler.
//!
//! Turns a dereferenced [`Document`](swagger2_spec::Document) into a
//! [`Compiled`] value: one anchored matcher per path template, and for every
//! operation the precedence-resolved parameter list and response validators.
//! Transport parameters (query, header, path) are coerced from strings before
//! their schema is checked.

pub mod coerce;
pub mod compiled;
pub mod compiler;
pub mod definition;
pub mod error;
pub mod matcher;
pub mod parameters;

pub use coerce::{coerce, Coercion};
pub use compiled::{Compiled, CompiledOperation, CompiledParameter, CompiledPath, CompiledRoute};
pub use compiler::{compile, compile_spec, compile_spec_file, compile_with_options};
pub use definition::{CompileOptions, CompiledDefinition, Rejection};
pub use error::CompileError;
pub use matcher::PathTemplate;
pub use parameters::resolve_parameters;
