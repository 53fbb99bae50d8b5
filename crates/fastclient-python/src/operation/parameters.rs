use indexmap::IndexSet;

use fastclient_core::parse::components::Components;
use fastclient_core::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};

use crate::error::GenerateError;
use crate::ir::{FieldDecl, PathParameter, PyType};
use crate::naming::{to_identifier, to_parameter_name};
use crate::type_mapper::schema_to_python;

/// Comment used for query parameters that carry no description.
pub const MISSING_DESCRIPTION: &str = "The parameter description is missing";

/// Path and query parameters of one operation, with the URL template
/// rewritten to the sanitized path parameter names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedParameters {
    pub url: String,
    pub path: IndexSet<PathParameter>,
    pub query: IndexSet<FieldDecl>,
}

/// Rewrite `{name}` in the URL template to the sanitized parameter name and
/// build the signature fragment for it.
///
/// Only the exact `{name}` token is replaced, so a parameter whose name is a
/// substring of another segment leaves that segment untouched.
pub fn parse_path_parameter(
    url: &str,
    parameter: &Parameter,
) -> Result<(String, PathParameter), GenerateError> {
    let name = to_parameter_name(&parameter.name);
    let placeholder = format!("{{{}}}", parameter.name);
    if !url.contains(&placeholder) {
        log::warn!(
            "path parameter '{}' does not appear in {}",
            parameter.name,
            url
        );
    }
    let url = url.replace(&placeholder, &format!("{{{name}}}"));
    let annotation = parameter_type(parameter)?;
    Ok((url, PathParameter { name, annotation }))
}

/// Build the query-model field for one query parameter: a plain typed field
/// when required, `Optional[...] = None` otherwise.
pub fn parse_query_parameter(parameter: &Parameter) -> Result<FieldDecl, GenerateError> {
    let ty = parameter_type(parameter)?;
    let description = parameter
        .description
        .as_deref()
        .map(one_line)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());
    Ok(FieldDecl::new(
        &parameter.name,
        to_identifier(&parameter.name),
        ty,
        parameter.required,
    )
    .with_description(Some(description)))
}

/// Route every parameter of an operation to the path or query parser.
///
/// Path-level parameters apply first; an operation parameter with the same
/// name and location replaces the path-level one.
pub fn parse(
    url: &str,
    path_level: &[ParameterOrRef],
    operation_level: &[ParameterOrRef],
    components: &Components,
) -> Result<ParsedParameters, GenerateError> {
    let mut merged: Vec<&Parameter> = Vec::new();
    for param in path_level.iter().chain(operation_level) {
        let resolved = components.resolve_parameter(param)?;
        match merged
            .iter()
            .position(|p| p.name == resolved.name && p.location == resolved.location)
        {
            Some(idx) => merged[idx] = resolved,
            None => merged.push(resolved),
        }
    }

    let mut parsed = ParsedParameters {
        url: url.to_string(),
        path: IndexSet::new(),
        query: IndexSet::new(),
    };
    for parameter in merged {
        match parameter.location {
            ParameterLocation::Path => {
                let (url, decl) = parse_path_parameter(&parsed.url, parameter)?;
                parsed.url = url;
                parsed.path.insert(decl);
            }
            ParameterLocation::Query => {
                parsed.query.insert(parse_query_parameter(parameter)?);
            }
            ParameterLocation::Header | ParameterLocation::Cookie => {
                log::debug!(
                    "skipping {:?} parameter '{}' on {}",
                    parameter.location,
                    parameter.name,
                    url
                );
            }
        }
    }
    let declared = |name: &&str| parsed.path.iter().any(|p| p.name == *name);
    if let Some(name) = placeholders(&parsed.url).find(|name| !declared(name)) {
        return Err(GenerateError::UndeclaredPathParameter {
            url: url.to_string(),
            name: name.to_string(),
        });
    }
    Ok(parsed)
}

/// Names between `{` and `}` in a URL template.
fn placeholders(url: &str) -> impl Iterator<Item = &str> {
    url.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
}

fn parameter_type(parameter: &Parameter) -> Result<PyType, GenerateError> {
    parameter
        .schema
        .as_ref()
        .map(schema_to_python)
        .ok_or_else(|| GenerateError::MissingField(format!("parameter '{}' schema", parameter.name)))
}

/// Collapse whitespace runs (including newlines) to single spaces.
pub(crate) fn one_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
