use serde_json::{json, Value};

use super::{api, shape};
use crate::harness::TestApi;

fn petstore() -> TestApi {
    api("petstore.yaml")
}

fn pets_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "required": ["id", "name"],
            "properties": {
                "id": {"type": "integer", "format": "int64"},
                "name": {"type": "string", "minLength": 1},
                "tag": {"type": "string"}
            }
        }
    })
}

fn error_schema() -> Value {
    json!({
        "required": ["code", "message"],
        "properties": {
            "code": {"type": "integer", "format": "int32"},
            "message": {"type": "string"}
        }
    })
}

#[test]
fn invalid_paths_do_not_match() {
    let api = petstore();
    assert!(api.path("/v1/bad").is_none());
    assert!(api.path("/v2/pets").is_none());
    assert!(api.path("/pets").is_none());
}

#[test]
fn valid_paths_match() {
    let api = petstore();
    let path = api.path("/v1/pets").expect("/v1/pets matches");
    assert_eq!(path.name(), "/pets");
    let get = path.path_item().get.as_ref().expect("get is declared");
    assert_eq!(get.summary.as_deref(), Some("List all pets"));
}

#[test]
fn undeclared_method_and_missing_path() {
    let api = petstore();
    assert_eq!(api.request("delete", "/v1/pets").query(json!({})).body(json!({})).send(), None);
    assert_eq!(api.request("delete", "/v1/pets").status(), 405);
    assert_eq!(api.request("delete", "/v1/nothing").send(), None);
    assert_eq!(api.request("get", "/v1/nothing").status(), 404);
    assert_eq!(
        api.response_json("delete", "/v1/nothing", 201, None),
        Some(json!({"actual": "UNDEFINED_PATH", "expected": "PATH"}))
    );
}

mod put {
    use super::*;

    #[test]
    fn empty_array_is_valid() {
        assert_eq!(petstore().request("put", "/v1/pets").body(json!([])).send(), Some(vec![]));
    }

    #[test]
    fn pet_is_valid() {
        let body = json!([{"id": 123, "name": "name"}]);
        assert_eq!(petstore().request("put", "/v1/pets").body(body).send(), Some(vec![]));
    }

    #[test]
    fn pet_with_empty_name_is_rejected() {
        let body = json!([{"id": 123, "name": ""}]);
        let api = petstore();
        let request = api.request("put", "/v1/pets").body(body.clone());

        assert_eq!(
            shape(request.send_json()),
            Some(json!([{
                "where": "body",
                "name": "pets",
                "actual": body,
                "expected": {"schema": pets_schema()}
            }]))
        );

        let errors = request.send().unwrap();
        let detail = errors[0].error.as_deref().expect("schema diagnostics");
        assert!(detail.starts_with("/0/name: "), "{}", detail);
        assert_eq!(request.status(), 400);
    }

    #[test]
    fn missing_body_is_rejected() {
        let errors = petstore().request("put", "/v1/pets").send().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].actual, None);
        assert_eq!(errors[0].error.as_deref(), Some("value is required"));
    }
}

mod post {
    use super::*;

    #[test]
    fn body_must_be_empty() {
        assert_eq!(
            shape(petstore().request("post", "/v1/pets").body(json!({"x": "hello"})).send_json()),
            Some(json!([{"where": "body", "actual": {"x": "hello"}}]))
        );
    }

    #[test]
    fn empty_bodies_are_accepted() {
        let api = petstore();
        for body in [json!({}), json!([]), json!(""), Value::Null] {
            assert_eq!(api.request("post", "/v1/pets").body(body).send(), Some(vec![]));
        }
    }

    #[test]
    fn query_must_be_empty() {
        assert_eq!(
            petstore().request("post", "/v1/pets").query(json!({"x": "y"})).send_json(),
            Some(json!([{"where": "query", "name": "x", "actual": "y", "expected": {}}]))
        );
    }

    #[test]
    fn plain_request_is_valid() {
        assert_eq!(petstore().request("post", "/v1/pets").send(), Some(vec![]));
    }

    #[test]
    fn response_must_have_no_body() {
        let api = petstore();
        assert_eq!(
            api.response_json("post", "/v1/pets", 201, Some(json!({}))),
            Some(json!({"actual": {}}))
        );
        assert_eq!(api.response("post", "/v1/pets", 201, None), None);
        assert_eq!(api.response("post", "/v1/pets", 201, Some(Value::Null)), None);
        assert_eq!(api.response("post", "/v1/pets", 201, Some(json!(""))), None);
    }
}

mod get {
    use super::*;

    fn query_errors(query: Value) -> Option<Value> {
        shape(petstore().request("get", "/v1/pets").query(query).send_json())
    }

    #[test]
    fn limit_must_be_an_integer() {
        assert_eq!(
            query_errors(json!({"limit": "hello"})),
            Some(json!([{
                "where": "query",
                "name": "limit",
                "actual": "hello",
                "expected": {"type": "integer", "format": "int32"}
            }]))
        );
        assert_eq!(
            query_errors(json!({"limit": 23.3})),
            Some(json!([{
                "where": "query",
                "name": "limit",
                "actual": 23.3,
                "expected": {"type": "integer", "format": "int32"}
            }]))
        );
        assert_eq!(
            query_errors(json!({"numberLimit": "hello"})),
            Some(json!([{
                "where": "query",
                "name": "numberLimit",
                "actual": "hello",
                "expected": {"type": "number"}
            }]))
        );
    }

    #[test]
    fn numeric_limits_accept_numbers_and_numeric_strings() {
        for query in [
            json!({"limit": 5}),
            json!({"numberLimit": 5}),
            json!({"numberLimit": 5.5}),
            json!({"limit": "5"}),
            json!({"numberLimit": "5"}),
            json!({"numberLimit": "5.5"}),
            json!({"limit": 50}),
            json!({"limit": ""}),
            json!({"numberLimit": " "}),
        ] {
            assert_eq!(query_errors(query.clone()), Some(json!([])), "{}", query);
        }
    }

    #[test]
    fn boolean_limit_must_be_a_boolean() {
        for actual in [json!("hello"), json!("0"), json!("1"), json!("TRUE"), json!(0), json!(1)] {
            assert_eq!(
                query_errors(json!({"booleanLimit": actual.clone()})),
                Some(json!([{
                    "where": "query",
                    "name": "booleanLimit",
                    "actual": actual,
                    "expected": {"type": "boolean"}
                }]))
            );
        }

        for query in [
            json!({"booleanLimit": true}),
            json!({"booleanLimit": false}),
            json!({"booleanLimit": "true"}),
            json!({"booleanLimit": "false"}),
        ] {
            assert_eq!(query_errors(query), Some(json!([])));
        }
    }

    #[test]
    fn body_must_be_empty() {
        assert_eq!(
            shape(petstore().request("get", "/v1/pets").body(json!({"x": "hello"})).send_json()),
            Some(json!([{"where": "body", "actual": {"x": "hello"}}]))
        );
    }

    #[test]
    fn no_limit_is_valid() {
        assert_eq!(petstore().request("get", "/v1/pets").send(), Some(vec![]));
    }

    #[test]
    fn undeclared_status_falls_back_to_default() {
        let api = petstore();
        let error = api
            .response("get", "/v1/pets", 201, Some(json!({"code": "hello"})))
            .expect("response is invalid");
        assert_eq!(
            shape(Some(error.to_json())),
            Some(json!({
                "actual": {"code": "hello"},
                "expected": {"schema": error_schema()}
            }))
        );
        assert!(error.error.is_some());

        assert_eq!(
            api.response("get", "/v1/pets", 400, Some(json!({"code": 32, "message": "message"}))),
            None
        );
    }

    #[test]
    fn object_response_is_the_wrong_type() {
        let error = petstore()
            .response("get", "/v1/pets", 200, Some(json!({"bad": "object"})))
            .expect("response is invalid");
        assert_eq!(
            shape(Some(error.to_json())),
            Some(json!({
                "actual": {"bad": "object"},
                "expected": {"schema": pets_schema()}
            }))
        );
        let detail = error.error.expect("schema diagnostics");
        assert!(detail.starts_with("/: "), "{}", detail);
    }

    #[test]
    fn array_response_reports_every_violation() {
        let error = petstore()
            .response("get", "/v1/pets", 200, Some(json!([{"bad": "value"}])))
            .expect("response is invalid");
        assert_eq!(
            shape(Some(error.to_json())),
            Some(json!({
                "actual": [{"bad": "value"}],
                "expected": {"schema": pets_schema()}
            }))
        );
        let detail = error.error.expect("schema diagnostics");
        let lines: Vec<&str> = detail.lines().collect();
        assert_eq!(lines.len(), 2, "{}", detail);
        assert!(lines.iter().all(|line| line.starts_with("/0: ")), "{}", detail);
    }

    #[test]
    fn pet_id_of_the_wrong_type() {
        let error = petstore()
            .response("get", "/v1/pets", 200, Some(json!([{"id": "abc", "name": "hello"}])))
            .expect("response is invalid");
        let detail = error.error.expect("schema diagnostics");
        assert!(detail.starts_with("/0/id: "), "{}", detail);
    }

    #[test]
    fn valid_responses() {
        let api = petstore();
        assert_eq!(api.response("get", "/v1/pets", 200, Some(json!([]))), None);
        assert_eq!(api.response("get", "/v1/pets", 200, Some(json!([{"id": 3, "name": "hello"}]))), None);
    }

    #[test]
    fn response_with_schema_requires_a_body() {
        let error = petstore()
            .response("get", "/v1/pets", 200, None)
            .expect("a body is required");
        assert_eq!(error.actual, None);
        assert_eq!(error.error.as_deref(), Some("value is required"));
    }
}

mod pet_by_id {
    use super::*;

    const IF_MATCH: &str = "XYZ";

    fn get(api: &TestApi, path: &str, query: Value) -> Option<Value> {
        shape(
            api.request("get", path)
                .query(query)
                .headers(json!({"If-Match": IF_MATCH}))
                .path_parameters(json!({"petId": "123"}))
                .send_json(),
        )
    }

    fn array_error(name: &str, actual: &str) -> Option<Value> {
        Some(json!([{
            "where": "query",
            "name": name,
            "actual": actual,
            "expected": {"type": "array"}
        }]))
    }

    #[test]
    fn only_get_is_declared() {
        let api = petstore();
        for method in ["post", "put", "delete"] {
            let request = api.request(method, "/v1/pets/3").query(json!({})).body(json!({}));
            assert_eq!(request.send(), None);
            assert_eq!(request.status(), 405);
        }
    }

    #[test]
    fn optional_header_with_wrong_type() {
        assert_eq!(
            shape(
                petstore()
                    .request("get", "/v1/pets/123")
                    .query(json!({"String": "hello"}))
                    .headers(json!({"If-Match": "XYZ", "If-None-Match": "NOT NUMBER"}))
                    .path_parameters(json!({"petId": "123"}))
                    .send_json()
            ),
            Some(json!([{
                "where": "header",
                "name": "If-None-Match",
                "actual": "NOT NUMBER",
                "expected": {"type": "number"}
            }]))
        );
    }

    #[test]
    fn required_header_missing() {
        assert_eq!(
            shape(
                petstore()
                    .request("get", "/v1/pets/123")
                    .query(json!({"String": "hello"}))
                    .send_json()
            ),
            Some(json!([{
                "where": "header",
                "name": "If-Match",
                "expected": {"type": "string"}
            }]))
        );
    }

    #[test]
    fn headers_match_case_insensitively() {
        let api = petstore();
        let request = api
            .request("get", "/v1/pets/123")
            .query(json!({"String": "hello"}))
            .headers(json!({"if-match": "XYZ"}));
        assert_eq!(request.send(), Some(vec![]));
    }

    #[test]
    fn valid_request_and_response() {
        let api = petstore();
        let request = api
            .request("get", "/v1/pets/123")
            .query(json!({"String": "hello"}))
            .headers(json!({"If-Match": "XYZ"}));
        assert_eq!(request.send(), Some(vec![]));
        assert_eq!(request.status(), 200);
        assert_eq!(
            api.response("get", "/v1/pets/123", 200, Some(json!([{"id": 3, "name": "hello"}]))),
            None
        );
    }

    #[test]
    fn pet_id_is_validated_from_the_path() {
        let api = petstore();
        let errors = api
            .request("get", "/v1/pets/abc")
            .query(json!({"String": "hello"}))
            .headers(json!({"If-Match": "XYZ"}))
            .send_json();
        assert_eq!(
            shape(errors),
            Some(json!([{
                "where": "path",
                "name": "petId",
                "actual": "abc",
                "expected": {"type": "integer", "format": "int32"}
            }]))
        );
    }

    #[test]
    fn required_array_of_strings() {
        let api = petstore();
        for query in [
            json!({"String": "hello"}),
            json!({"String": ["hello"]}),
            json!({"String": ["hello", "hello2"]}),
        ] {
            assert_eq!(get(&api, "/v1/pets/123", query), Some(json!([])));
        }

        assert_eq!(
            shape(
                api.request("get", "/v1/pets/abc")
                    .headers(json!({"If-Match": "XYZ"}))
                    .path_parameters(json!({"petId": "123"}))
                    .send_json()
            ),
            Some(json!([{
                "where": "query",
                "name": "String",
                "expected": {"type": "array"}
            }]))
        );
    }

    #[test]
    fn optional_csv_array_of_numbers() {
        let api = petstore();
        for number in [json!(213), json!("213"), json!("213,456")] {
            assert_eq!(
                get(&api, "/v1/pets/123", json!({"String": "hello", "Number": number})),
                Some(json!([]))
            );
        }
        for actual in ["hello", "123,hello"] {
            assert_eq!(
                get(&api, "/v1/pets/123", json!({"String": "hello", "Number": actual})),
                array_error("Number", actual)
            );
        }
    }

    #[test]
    fn optional_pipes_array_of_booleans() {
        let api = petstore();
        for boolean in [json!(true), json!("true"), json!("false|true")] {
            assert_eq!(
                get(&api, "/v1/pets/123", json!({"String": "hello", "Boolean": boolean})),
                Some(json!([]))
            );
        }
        for actual in ["hello", "true|hello"] {
            assert_eq!(
                get(&api, "/v1/pets/123", json!({"String": "hello", "Boolean": actual})),
                array_error("Boolean", actual)
            );
        }
    }

    #[test]
    fn optional_ssv_array_of_booleans() {
        let api = petstore();
        for boolean in ["true", "false true"] {
            assert_eq!(
                get(&api, "/v1/pets/123", json!({"String": "hello", "SpacedBoolean": boolean})),
                Some(json!([]))
            );
        }
        for actual in ["false abc", "false,true", "false\ttrue", "false|true"] {
            assert_eq!(
                get(&api, "/v1/pets/123", json!({"String": "hello", "SpacedBoolean": actual})),
                array_error("SpacedBoolean", actual)
            );
        }
    }

    #[test]
    fn optional_tsv_array_of_booleans() {
        let api = petstore();
        for boolean in ["true", "false\ttrue"] {
            assert_eq!(
                get(&api, "/v1/pets/123", json!({"String": "hello", "TabbedBoolean": boolean})),
                Some(json!([]))
            );
        }
        assert_eq!(
            get(&api, "/v1/pets/abc", json!({"String": "hello", "TabbedBoolean": "false\tabc"})),
            array_error("TabbedBoolean", "false\tabc")
        );
        for actual in ["false,true", "false true", "false|true"] {
            assert_eq!(
                get(&api, "/v1/pets/123", json!({"String": "hello", "TabbedBoolean": actual})),
                array_error("TabbedBoolean", actual)
            );
        }
    }
}
