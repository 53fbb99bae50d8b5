pub mod components;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod spec;

use crate::error::ParseError;
use spec::OpenApiSpec;

pub use ref_resolve::ref_name;

/// Parse an OpenAPI spec from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI spec from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate(&spec)?;
    Ok(spec)
}

/// Check the keys client generation cannot do without: a 3.x version,
/// `components.schemas`, and an `operationId` plus at least one tag on
/// every operation.
pub fn validate(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    spec.schemas()?;

    for (url, item) in &spec.paths {
        for (method, op) in item.operations() {
            if op.operation_id.is_none() {
                return Err(ParseError::MissingField(format!(
                    "paths.{url}.{method}.operationId"
                )));
            }
            if op.tags.is_empty() {
                return Err(ParseError::MissingField(format!("paths.{url}.{method}.tags")));
            }
        }
    }

    log::debug!(
        "validated OpenAPI {} spec '{}' with {} paths",
        spec.openapi,
        spec.info.title,
        spec.paths.len()
    );
    Ok(())
}
