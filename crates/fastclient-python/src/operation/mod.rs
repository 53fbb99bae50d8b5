//! Everything a manager method needs to know about one operation.

pub mod objects;
pub mod parameters;

use indexmap::IndexSet;

use fastclient_core::parse::components::Components;
use fastclient_core::parse::operation::{HttpMethod, Operation, PathItem};

use crate::error::GenerateError;
use crate::ir::{FieldDecl, PathParameter, PyType};
use crate::naming::function_name;

pub use objects::ResponseObject;
pub use parameters::ParsedParameters;

/// One operation, reduced to what its Python method is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationInfo {
    pub function_name: String,
    pub method: HttpMethod,
    /// URL template with path placeholders renamed to their Python names.
    pub url: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub request: Option<PyType>,
    pub response: ResponseObject,
    pub path_parameters: IndexSet<PathParameter>,
    pub query_fields: IndexSet<FieldDecl>,
    /// Name of the generated query model, once one has been emitted.
    pub query_model: Option<String>,
}

impl OperationInfo {
    pub fn parse(
        tag: &str,
        url: &str,
        method: HttpMethod,
        path_item: &PathItem,
        operation: &Operation,
        components: &Components,
    ) -> Result<Self, GenerateError> {
        let operation_id = operation.operation_id.as_deref().ok_or_else(|| {
            GenerateError::MissingField(format!("paths.{url}.{method}.operationId"))
        })?;
        let ParsedParameters { url, path, query } = parameters::parse(
            url,
            &path_item.parameters,
            &operation.parameters,
            components,
        )?;
        Ok(Self {
            function_name: function_name(tag, operation_id),
            method,
            url,
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            request: objects::parse_request_object(operation, components)?,
            response: objects::parse_response_object(operation, components)?,
            path_parameters: path,
            query_fields: query,
            query_model: None,
        })
    }

    /// `true` when every query field may be omitted, so the whole query
    /// container becomes optional in the signature.
    pub fn query_is_optional(&self) -> bool {
        self.query_fields.iter().all(|f| !f.required)
    }

    /// The docstring text: summary, then description, separated by a blank line.
    pub fn docstring(&self) -> Option<String> {
        let parts: Vec<&str> = [self.summary.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join("\n\n"))
    }
}
