use fastclient_core::parse::components::Components;
use fastclient_core::parse::operation::Operation;
use fastclient_core::parse::schema::{AdditionalProperties, SchemaOrRef, SchemaType};

use crate::error::GenerateError;
use crate::ir::PyType;
use crate::type_mapper::{map_schema_type, ref_type, schema_to_python};

/// Type names that stand for "no content" when they show up as a response.
const EMPTY_RESPONSE_NAMES: &[&str] = &["None", "NoneType", "Metaclass"];

/// What a method hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseObject {
    /// No JSON response with a usable schema was declared.
    Unknown,
    /// The endpoint answers without content.
    Empty,
    /// A typed JSON payload; `is_list` marks a top-level array.
    Typed { item: PyType, is_list: bool },
}

impl ResponseObject {
    /// The annotation of the payload, without the `Optional` wrapper.
    pub fn annotation(&self) -> Option<PyType> {
        match self {
            ResponseObject::Typed { item, is_list: true } => Some(PyType::list(item.clone())),
            ResponseObject::Typed { item, .. } => Some(item.clone()),
            ResponseObject::Unknown | ResponseObject::Empty => None,
        }
    }
}

/// The type of the request body, when the operation has a JSON one.
///
/// A body without schema, or with an inline non-array schema, is typed as
/// `Any` and sent as-is.
pub fn parse_request_object(
    operation: &Operation,
    components: &Components,
) -> Result<Option<PyType>, GenerateError> {
    let Some(body) = &operation.request_body else {
        return Ok(None);
    };
    let body = components.resolve_request_body(body)?;
    let Some(media) = body.json() else {
        log::warn!(
            "{}: request body has no application/json content, skipping",
            operation.operation_id.as_deref().unwrap_or("<unnamed>")
        );
        return Ok(None);
    };
    let ty = match &media.schema {
        None => PyType::Any,
        Some(SchemaOrRef::Ref { ref_path }) => ref_type(ref_path),
        Some(SchemaOrRef::Schema(schema)) => match &schema.items {
            Some(items) => PyType::list(schema_to_python(items)),
            None => PyType::Any,
        },
    };
    Ok(Some(ty))
}

/// The response type of an operation.
///
/// Responses are scanned in document order and the first one with JSON
/// content and a recognizable schema wins.
pub fn parse_response_object(
    operation: &Operation,
    components: &Components,
) -> Result<ResponseObject, GenerateError> {
    for (status, response) in &operation.responses {
        let response = components.resolve_response(response)?;
        let Some(schema) = response.json().and_then(|m| m.schema.as_ref()) else {
            continue;
        };
        match classify(schema) {
            Some(parsed) => return Ok(parsed),
            None => log::debug!(
                "{}: response {} has no usable schema",
                operation.operation_id.as_deref().unwrap_or("<unnamed>"),
                status
            ),
        }
    }
    Ok(ResponseObject::Unknown)
}

fn classify(schema: &SchemaOrRef) -> Option<ResponseObject> {
    let schema = match schema {
        SchemaOrRef::Ref { ref_path } => return Some(typed(ref_type(ref_path), false)),
        SchemaOrRef::Schema(schema) => schema,
    };
    if let Some(items) = &schema.items {
        let item = match items.as_ref() {
            SchemaOrRef::Ref { ref_path } => ref_type(ref_path),
            inline => schema_to_python(inline),
        };
        return Some(typed(item, true));
    }
    if let Some(AdditionalProperties::Schema(values)) = &schema.additional_properties {
        if let SchemaOrRef::Schema(inner) = values.as_ref() {
            if let Some(primitive) = inner.primary_type() {
                let value = PyType::Builtin(map_schema_type(primitive));
                return Some(typed(PyType::dict(value), false));
            }
        }
    }
    match schema.primary_type() {
        Some(SchemaType::Null) => Some(ResponseObject::Empty),
        Some(primitive) if schema.properties.is_empty() => {
            Some(typed(PyType::Builtin(map_schema_type(primitive)), false))
        }
        _ => None,
    }
}

fn typed(item: PyType, is_list: bool) -> ResponseObject {
    let name = match &item {
        PyType::Model(name) => Some(name.as_str()),
        PyType::Builtin(name) => Some(*name),
        _ => None,
    };
    if !is_list && name.is_some_and(|n| EMPTY_RESPONSE_NAMES.contains(&n)) {
        return ResponseObject::Empty;
    }
    ResponseObject::Typed { item, is_list }
}
