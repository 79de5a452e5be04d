use serde_json::{json, Value};

use super::{api, shape};
use crate::harness::TestApi;

fn parameters() -> TestApi {
    api("parameters.yaml")
}

fn path_request(api: &TestApi, path: &str, path_parameters: Value) -> Option<Value> {
    shape(api.request("get", path).path_parameters(path_parameters).send_json())
}

#[test]
fn path_level_parameters_apply_to_every_operation() {
    let api = parameters();
    assert_eq!(
        shape(api.request("get", "/api/pets/abc").query(json!({"Number": 1})).send_json()),
        Some(json!([{
            "where": "query",
            "name": "String",
            "expected": {"type": "string"}
        }]))
    );
    assert_eq!(
        api.request("get", "/api/pets/abc")
            .query(json!({"String": "hello", "Number": 1}))
            .send(),
        Some(vec![])
    );
}

#[test]
fn operation_parameters_override_path_level_ones() {
    let api = parameters();
    assert_eq!(
        shape(api.request("put", "/api/pets/abc").query(json!({"String": "abc"})).send_json()),
        Some(json!([{
            "where": "query",
            "name": "String",
            "actual": "abc",
            "expected": {"type": "number"}
        }]))
    );
    assert_eq!(
        api.request("put", "/api/pets/abc").query(json!({"String": 123})).send(),
        Some(vec![])
    );
    assert_eq!(
        api.request("put", "/api/pets/abc").query(json!({"String": "123"})).send(),
        Some(vec![])
    );

    let path = api.path("/api/pets/abc").unwrap();
    let put = path.operation(swagger2_spec::Method::Put).unwrap();
    let names: Vec<&str> = put.resolved_parameters.iter().map(|p| p.parameter.name.as_str()).collect();
    assert_eq!(names, vec!["id", "String", "Number"]);
}

#[test]
fn operation_parameters_extend_path_level_ones() {
    let api = parameters();
    assert_eq!(
        api.request("patch", "/api/pets/abc")
            .query(json!({"String": "hello", "Number": 1}))
            .body(json!({"tag": "dog"}))
            .send(),
        Some(vec![])
    );

    let errors = api
        .request("patch", "/api/pets/abc")
        .query(json!({"String": "hello"}))
        .body(json!({"tag": 7}))
        .send()
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].name.as_deref(), Some("pet"));
}

#[test]
fn numeric_path_parameter() {
    let api = parameters();
    assert_eq!(path_request(&api, "/api/petsByNumber/123", json!({"num": "123"})), Some(json!([])));
    assert_eq!(path_request(&api, "/api/petsByNumber/123", json!({"num": 123})), Some(json!([])));
    assert_eq!(
        path_request(&api, "/api/petsByNumber/abc", json!({"num": "abc"})),
        Some(json!([{"where": "path", "name": "num", "actual": "abc", "expected": {"type": "number"}}]))
    );
}

#[test]
fn boolean_path_parameter() {
    let api = parameters();
    assert_eq!(path_request(&api, "/api/petsByBoolean/true", json!({"bool": "true"})), Some(json!([])));
    assert_eq!(path_request(&api, "/api/petsByBoolean/false", json!({"bool": false})), Some(json!([])));

    for (path, actual) in [
        ("/api/petsByBoolean/abc", json!("abc")),
        ("/api/petsByBoolean/123", json!("123")),
        ("/api/petsByBoolean/123", json!(123)),
    ] {
        assert_eq!(
            path_request(&api, path, json!({"bool": actual.clone()})),
            Some(json!([{"where": "path", "name": "bool", "actual": actual, "expected": {"type": "boolean"}}]))
        );
    }
}

#[test]
fn path_parameters_recovered_from_the_path() {
    let api = parameters();
    assert_eq!(api.request("get", "/api/petsByBoolean/true").send(), Some(vec![]));
    assert_eq!(api.request("get", "/api/petsByNumber/12.5").send(), Some(vec![]));

    let path = api.path("/api/pets/dog/short").unwrap();
    assert_eq!(path.name(), "/pets/{breed}/{fur}");
    assert_eq!(path.path_parameter("breed"), Some("dog"));
    assert_eq!(path.path_parameter("fur"), Some("short"));
    assert_eq!(api.request("get", "/api/pets/dog/short").send(), Some(vec![]));
}

#[test]
fn explicit_path_parameters_must_be_complete() {
    let api = parameters();
    assert_eq!(
        path_request(&api, "/api/pets/dog/short", json!({"breed": "dog", "fur": "short"})),
        Some(json!([]))
    );
    assert_eq!(
        path_request(&api, "/api/pets/dog/short", json!({"breed": "dog"})),
        Some(json!([{"where": "path", "name": "fur", "expected": {"type": "string"}}]))
    );
}
