//! Swagger 2.0 document model and loader.
//!
//! Reads YAML/JSON documents, checks them against the Swagger 2.0 structure,
//! inlines local `$ref` pointers and deserializes the result into a typed
//! [`Document`].

pub mod check;
pub mod deref;
pub mod error;
pub mod model;
pub mod parser;

pub use check::{check_document, DocumentIssue};
pub use deref::{contains_ref, dereference, resolve_ref};
pub use error::ParseError;
pub use model::{
    CollectionFormat, Document, Info, Location, Method, Operation, Parameter, PathItem, Response,
};
pub use parser::{
    load_document, load_document_file, parse_document, parse_document_file, validate_document,
};
