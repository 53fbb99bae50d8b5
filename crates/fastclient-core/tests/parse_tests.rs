use fastclient_core::error::ParseError;
use fastclient_core::parse;
use fastclient_core::parse::operation::HttpMethod;
use fastclient_core::parse::parameter::ParameterLocation;
use fastclient_core::parse::response::ResponseOrRef;
use fastclient_core::parse::schema::SchemaOrRef;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

#[test]
fn parse_petstore_yaml() {
    let spec = parse::from_yaml(PETSTORE).expect("should parse petstore");
    assert_eq!(spec.openapi, "3.0.3");
    assert_eq!(spec.info.title, "Swagger Petstore");
    assert_eq!(spec.paths.len(), 8);
    assert_eq!(spec.tags.len(), 3);

    let schemas = spec.schemas().expect("should have schemas");
    assert_eq!(schemas.len(), 6);
    let names: Vec<&str> = schemas.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec!["Category", "Tag", "Pet", "Order", "OrderStatus", "ApiResponse"]
    );
}

#[test]
fn parse_preserves_path_order() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let urls: Vec<&str> = spec.paths.keys().map(String::as_str).collect();
    assert_eq!(urls[0], "/pet");
    assert_eq!(urls[1], "/pet/findByStatus");
    assert_eq!(urls[2], "/pet/{petId}");
    assert_eq!(urls[7], "/user/logout");
}

#[test]
fn parse_path_level_parameters() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let item = spec.paths.get("/pet/{petId}").unwrap();
    assert_eq!(item.parameters.len(), 1);

    let methods: Vec<HttpMethod> = item.operations().map(|(m, _)| m).collect();
    assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Delete]);
}

#[test]
fn parse_component_refs() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let components = spec.components.as_ref().unwrap();

    let op = spec
        .paths
        .get("/store/order/{orderId}")
        .and_then(|item| item.get.as_ref())
        .unwrap();
    let param = components.resolve_parameter(&op.parameters[0]).unwrap();
    assert_eq!(param.name, "orderId");
    assert_eq!(param.location, ParameterLocation::Path);
    assert!(param.required);

    let default = op.responses.get("default").unwrap();
    assert!(matches!(default, ResponseOrRef::Ref { .. }));
    let resolved = components.resolve_response(default).unwrap();
    match resolved.json().and_then(|mt| mt.schema.as_ref()) {
        Some(SchemaOrRef::Ref { ref_path }) => {
            assert_eq!(parse::ref_name(ref_path), "ApiResponse");
        }
        other => panic!("expected ApiResponse ref, got {other:?}"),
    }

    let post = spec
        .paths
        .get("/store/order")
        .and_then(|item| item.post.as_ref())
        .unwrap();
    let body = components
        .resolve_request_body(post.request_body.as_ref().unwrap())
        .unwrap();
    assert!(body.json().is_some());
}

#[test]
fn parse_json_spec() {
    let json = r#"{
        "openapi": "3.1.0",
        "info": {"title": "Tiny", "version": "1"},
        "paths": {
            "/ping": {
                "get": {
                    "operationId": "ping",
                    "tags": ["health"],
                    "responses": {"200": {"description": "ok"}}
                }
            }
        },
        "components": {"schemas": {}}
    }"#;
    let spec = parse::from_json(json).unwrap();
    assert_eq!(spec.paths.len(), 1);
}

#[test]
fn parse_invalid_version() {
    let yaml = r#"
openapi: "2.0.0"
info:
  title: Test
  version: "1.0"
paths: {}
components:
  schemas: {}
"#;
    let result = parse::from_yaml(yaml);
    assert!(matches!(result, Err(ParseError::UnsupportedVersion(_))));
}

#[test]
fn parse_requires_components_schemas() {
    let yaml = r#"
openapi: "3.0.0"
info:
  title: Test
  version: "1.0"
paths: {}
"#;
    let err = parse::from_yaml(yaml).unwrap_err();
    assert_eq!(err.to_string(), "missing required field: components.schemas");
}

#[test]
fn parse_requires_tags() {
    let yaml = r#"
openapi: "3.0.0"
info:
  title: Test
  version: "1.0"
paths:
  /pets:
    get:
      operationId: listPets
      responses: {}
components:
  schemas: {}
"#;
    let err = parse::from_yaml(yaml).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"missing required field: paths./pets.get.tags");
}

#[test]
fn parse_requires_operation_id() {
    let yaml = r#"
openapi: "3.0.0"
info:
  title: Test
  version: "1.0"
paths:
  /pets:
    post:
      tags: [pets]
      responses: {}
components:
  schemas: {}
"#;
    let err = parse::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, ParseError::MissingField(ref f) if f == "paths./pets.post.operationId"));
}

#[test]
fn parse_rejects_unknown_primitive_type() {
    let yaml = r#"
openapi: "3.0.0"
info:
  title: Test
  version: "1.0"
paths: {}
components:
  schemas:
    Money:
      type: decimal
"#;
    assert!(matches!(parse::from_yaml(yaml), Err(ParseError::Yaml(_))));
}
