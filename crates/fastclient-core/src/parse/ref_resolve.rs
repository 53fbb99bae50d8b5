use super::components::Components;
use super::parameter::{Parameter, ParameterOrRef};
use super::request_body::{RequestBody, RequestBodyOrRef};
use super::response::{Response, ResponseOrRef};
use crate::error::ResolveError;

/// Ref chains longer than this are reported as circular.
const MAX_REF_DEPTH: usize = 8;

/// The referenced name: the last segment of a `$ref` path.
///
/// `#/components/schemas/Pet` → `Pet`
pub fn ref_name(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}

impl Components {
    /// Follow a parameter `$ref` into `components.parameters`.
    pub fn resolve_parameter<'a>(
        &'a self,
        param: &'a ParameterOrRef,
    ) -> Result<&'a Parameter, ResolveError> {
        let mut current = param;
        for _ in 0..MAX_REF_DEPTH {
            match current {
                ParameterOrRef::Parameter(p) => return Ok(p),
                ParameterOrRef::Ref { ref_path } => {
                    let name = parse_ref_name(ref_path, "parameters")?;
                    current = self
                        .parameters
                        .get(name)
                        .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.clone()))?;
                }
            }
        }
        Err(ResolveError::CircularRef(origin(param)))
    }

    /// Follow a request body `$ref` into `components.requestBodies`.
    pub fn resolve_request_body<'a>(
        &'a self,
        body: &'a RequestBodyOrRef,
    ) -> Result<&'a RequestBody, ResolveError> {
        let mut current = body;
        for _ in 0..MAX_REF_DEPTH {
            match current {
                RequestBodyOrRef::RequestBody(b) => return Ok(b),
                RequestBodyOrRef::Ref { ref_path } => {
                    let name = parse_ref_name(ref_path, "requestBodies")?;
                    current = self
                        .request_bodies
                        .get(name)
                        .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.clone()))?;
                }
            }
        }
        Err(ResolveError::CircularRef(origin(body)))
    }

    /// Follow a response `$ref` into `components.responses`.
    pub fn resolve_response<'a>(
        &'a self,
        response: &'a ResponseOrRef,
    ) -> Result<&'a Response, ResolveError> {
        let mut current = response;
        for _ in 0..MAX_REF_DEPTH {
            match current {
                ResponseOrRef::Response(r) => return Ok(r),
                ResponseOrRef::Ref { ref_path } => {
                    let name = parse_ref_name(ref_path, "responses")?;
                    current = self
                        .responses
                        .get(name)
                        .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.clone()))?;
                }
            }
        }
        Err(ResolveError::CircularRef(origin(response)))
    }
}

/// Anything that may be a `$ref`, for error reporting.
trait RefPath {
    fn ref_path(&self) -> Option<&str>;
}

impl RefPath for ParameterOrRef {
    fn ref_path(&self) -> Option<&str> {
        match self {
            ParameterOrRef::Ref { ref_path } => Some(ref_path),
            ParameterOrRef::Parameter(_) => None,
        }
    }
}

impl RefPath for RequestBodyOrRef {
    fn ref_path(&self) -> Option<&str> {
        match self {
            RequestBodyOrRef::Ref { ref_path } => Some(ref_path),
            RequestBodyOrRef::RequestBody(_) => None,
        }
    }
}

impl RefPath for ResponseOrRef {
    fn ref_path(&self) -> Option<&str> {
        match self {
            ResponseOrRef::Ref { ref_path } => Some(ref_path),
            ResponseOrRef::Response(_) => None,
        }
    }
}

fn origin(value: &impl RefPath) -> String {
    value.ref_path().unwrap_or("<inline>").to_string()
}

/// Parse a `$ref` path like `#/components/parameters/limit` and extract the name.
fn parse_ref_name<'a>(ref_path: &'a str, expected_section: &str) -> Result<&'a str, ResolveError> {
    let stripped = ref_path
        .strip_prefix("#/components/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let (section, name) = stripped
        .split_once('/')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    if section != expected_section {
        return Err(ResolveError::InvalidRefFormat(format!(
            "expected section '{}', got '{}' in {}",
            expected_section, section, ref_path
        )));
    }
    Ok(name)
}
