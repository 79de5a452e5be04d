//! Test harnesses for swagger2.
//!
//! Provides `TestApi`, which compiles a document from `tests/fixtures/` (or an
//! inline string) and drives request and response validation against it.

pub mod harness;
#[cfg(test)]
mod scenarios;

pub use harness::{fixture_path, fixtures_dir, TestApi, TestError, TestRequest};
