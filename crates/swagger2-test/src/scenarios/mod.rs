//! End-to-end scenarios against the documents in `tests/fixtures/`.

mod parameters;
mod petstore;

use serde_json::Value;

use crate::harness::TestApi;

fn api(fixture: &str) -> TestApi {
    TestApi::from_fixture(fixture).unwrap_or_else(|e| panic!("{} failed to compile: {}", fixture, e))
}

/// Serialized errors without the free-text `error` diagnostics, which come
/// from the schema validator and are asserted separately where they matter.
fn shape(errors: Option<Value>) -> Option<Value> {
    errors.map(|mut value| {
        match &mut value {
            Value::Array(items) => {
                for item in items {
                    strip_error(item);
                }
            }
            other => strip_error(other),
        }
        value
    })
}

fn strip_error(value: &mut Value) {
    if let Value::Object(obj) = value {
        obj.remove("error");
    }
}
