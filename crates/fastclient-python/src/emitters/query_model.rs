use minijinja::context;

use crate::error::GenerateError;
use crate::ir::FieldDecl;
use crate::naming::to_class_name;
use crate::printer::{Printer, QUERY_MODEL_TEMPLATE};

/// Name of the query model for a method: `<Tag>Query<Function>Query`.
///
/// (`pet`, `find_by_status`) → `PetQueryFindByStatusQuery`
pub fn query_model_name(tag: &str, function_name: &str) -> String {
    format!(
        "{}Query{}Query",
        to_class_name(tag),
        to_class_name(function_name)
    )
}

/// Render the Pydantic model holding the query parameters of one method.
///
/// Returns the class definition and its name.
pub fn generate(
    printer: &Printer,
    tag: &str,
    manager_class: &str,
    function_name: &str,
    fields: impl IntoIterator<Item = FieldDecl>,
) -> Result<(String, String), GenerateError> {
    let name = query_model_name(tag, function_name);
    let fields: Vec<FieldDecl> = fields.into_iter().collect();
    let has_alias = fields.iter().any(|f| f.alias.is_some());
    let fields: Vec<minijinja::Value> = fields
        .iter()
        .map(|f| {
            context! {
                declaration => f.declaration(),
                description => f.description.clone(),
            }
        })
        .collect();

    let definition = printer.render(
        QUERY_MODEL_TEMPLATE,
        context! {
            name => name.clone(),
            manager_class => manager_class,
            function_name => function_name,
            has_alias => has_alias,
            fields => fields,
        },
    )?;
    Ok((definition.trim_end().to_string(), name))
}
