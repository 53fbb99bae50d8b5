use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use minijinja::context;

use fastclient_core::GeneratedFile;
use fastclient_core::parse::schema::{Schema, SchemaOrRef, SchemaType};

use crate::error::GenerateError;
use crate::ir::{FieldDecl, PyType, docstring_block, py_str};
use crate::naming::{enum_member_name, schema_class_name, to_identifier};
use crate::operation::parameters::one_line;
use crate::printer::{MODELS_TEMPLATE, Printer, SCHEMA_MODEL_TEMPLATE};
use crate::type_mapper::{ref_type, schema_to_python};

/// Relative path of the models module.
pub const MODELS_FILE: &str = "models.py";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ModelKind {
    Object {
        bases: Vec<String>,
        fields: Vec<FieldDecl>,
    },
    Enum {
        variants: Vec<(String, String)>,
    },
    Alias {
        target: PyType,
    },
}

/// One component schema, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SchemaModel {
    name: String,
    description: Option<String>,
    kind: ModelKind,
}

impl SchemaModel {
    fn from_schema(name: &str, schema_or_ref: &SchemaOrRef) -> Self {
        let name = schema_class_name(name);
        let schema = match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => {
                return Self {
                    name,
                    description: None,
                    kind: ModelKind::Alias {
                        target: ref_type(ref_path),
                    },
                };
            }
            SchemaOrRef::Schema(schema) => schema,
        };
        let description = schema.description.as_deref().map(str::trim).map(String::from);

        let kind = if !schema.all_of.is_empty() {
            composed(schema)
        } else if is_string_enum(schema) {
            ModelKind::Enum {
                variants: enum_variants(schema),
            }
        } else if is_object(schema) {
            ModelKind::Object {
                bases: vec!["BaseModel".to_string()],
                fields: fields(schema),
            }
        } else {
            ModelKind::Alias {
                target: schema_to_python(schema_or_ref),
            }
        };
        Self {
            name,
            description,
            kind,
        }
    }

    /// Models that must be defined before this one: base classes, and
    /// anything an alias evaluates at import time.
    fn dependencies(&self) -> BTreeSet<String> {
        let mut deps = BTreeSet::new();
        match &self.kind {
            ModelKind::Object { bases, .. } => {
                deps.extend(bases.iter().filter(|b| *b != "BaseModel").cloned());
            }
            ModelKind::Alias { target } => target.collect_models(&mut deps),
            ModelKind::Enum { .. } => {}
        }
        deps.remove(&self.name);
        deps
    }

    fn render(&self, printer: &Printer) -> Result<String, GenerateError> {
        let docstring = self
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| docstring_block(d, 4));
        let ctx = match &self.kind {
            ModelKind::Object { bases, fields } => {
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
                context! {
                    kind => "object",
                    name => self.name.clone(),
                    bases => bases,
                    docstring => docstring,
                    has_alias => has_alias,
                    fields => fields,
                }
            }
            ModelKind::Enum { variants } => {
                let variants: Vec<minijinja::Value> = variants
                    .iter()
                    .map(|(name, value)| context! { name => name, value => value })
                    .collect();
                context! {
                    kind => "enum",
                    name => self.name.clone(),
                    docstring => docstring,
                    variants => variants,
                }
            }
            ModelKind::Alias { target } => context! {
                kind => "alias",
                name => self.name.clone(),
                description => self.description.as_deref().map(one_line),
                target => target.to_string(),
            },
        };
        Ok(printer.render(SCHEMA_MODEL_TEMPLATE, ctx)?.trim_end().to_string())
    }
}

fn is_string_enum(schema: &Schema) -> bool {
    !schema.enum_values.is_empty()
        && matches!(schema.primary_type(), None | Some(SchemaType::String))
        && schema.enum_values.iter().all(|v| v.is_string())
}

fn is_object(schema: &Schema) -> bool {
    if !schema.properties.is_empty() {
        return true;
    }
    schema.primary_type() == Some(SchemaType::Object)
        && schema.additional_properties.is_none()
        && schema.one_of.is_empty()
        && schema.any_of.is_empty()
}

fn fields(schema: &Schema) -> Vec<FieldDecl> {
    schema
        .properties
        .iter()
        .map(|(wire_name, prop)| {
            let description = match prop {
                SchemaOrRef::Schema(s) => s.description.as_deref().map(one_line),
                SchemaOrRef::Ref { .. } => None,
            };
            FieldDecl::new(
                wire_name,
                to_identifier(wire_name),
                schema_to_python(prop),
                schema.required.contains(wire_name),
            )
            .with_description(description)
        })
        .collect()
}

fn enum_variants(schema: &Schema) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut variants = Vec::new();
    for value in schema.enum_values.iter().filter_map(|v| v.as_str()) {
        let base = enum_member_name(value);
        let mut name = base.clone();
        let mut n = 2;
        while !seen.insert(name.clone()) {
            name = format!("{base}{n}");
            n += 1;
        }
        variants.push((name, py_str(value)));
    }
    variants
}

/// `allOf`: referenced schemas become base classes, inline parts contribute
/// fields.
fn composed(schema: &Schema) -> ModelKind {
    let mut bases = Vec::new();
    let mut fields_out = Vec::new();
    for part in &schema.all_of {
        match part {
            SchemaOrRef::Ref { ref_path } => bases.push(ref_type(ref_path).to_string()),
            SchemaOrRef::Schema(inline) => fields_out.extend(fields(inline)),
        }
    }
    fields_out.extend(fields(schema));
    if bases.is_empty() {
        bases.push("BaseModel".to_string());
    }
    ModelKind::Object {
        bases,
        fields: fields_out,
    }
}

/// Depth-first ordering so that base classes and alias targets precede their
/// users. Cycles are broken at the first revisit.
fn ordered(models: &[SchemaModel]) -> Vec<&SchemaModel> {
    let by_name: IndexMap<&str, &SchemaModel> =
        models.iter().map(|m| (m.name.as_str(), m)).collect();
    let mut visited = HashSet::new();
    let mut out = Vec::with_capacity(models.len());

    fn visit<'m>(
        model: &'m SchemaModel,
        by_name: &IndexMap<&str, &'m SchemaModel>,
        visited: &mut HashSet<String>,
        out: &mut Vec<&'m SchemaModel>,
    ) {
        if !visited.insert(model.name.clone()) {
            return;
        }
        for dep in model.dependencies() {
            if let Some(dep) = by_name.get(dep.as_str()) {
                visit(dep, by_name, visited, out);
            }
        }
        out.push(model);
    }

    for model in models {
        visit(model, &by_name, &mut visited, &mut out);
    }
    out
}

/// What a component schema renders to, which decides how a payload is turned
/// into it and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelCategory {
    /// A `BaseModel` subclass.
    Object,
    /// A `(str, Enum)` class.
    Enum,
    /// A module-level type alias.
    Alias,
}

/// Category of every component schema, keyed by class name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    categories: HashMap<String, ModelCategory>,
}

impl ModelCatalog {
    /// An alias of another component takes the category of whatever it
    /// finally points at.
    pub fn from_schemas(schemas: &IndexMap<String, SchemaOrRef>) -> Self {
        let models: Vec<SchemaModel> = schemas
            .iter()
            .map(|(name, schema)| SchemaModel::from_schema(name, schema))
            .collect();
        let by_name: HashMap<&str, &ModelKind> =
            models.iter().map(|m| (m.name.as_str(), &m.kind)).collect();

        let categories = models
            .iter()
            .map(|model| {
                let mut kind = &model.kind;
                let mut hops = 0;
                let category = loop {
                    match kind {
                        ModelKind::Object { .. } => break ModelCategory::Object,
                        ModelKind::Enum { .. } => break ModelCategory::Enum,
                        ModelKind::Alias {
                            target: PyType::Model(next),
                        } if hops < models.len() => match by_name.get(next.as_str()) {
                            Some(&next) => {
                                kind = next;
                                hops += 1;
                            }
                            None => break ModelCategory::Alias,
                        },
                        ModelKind::Alias { .. } => break ModelCategory::Alias,
                    }
                };
                (model.name.clone(), category)
            })
            .collect();
        Self { categories }
    }

    /// Names missing from the catalog are treated as objects.
    pub fn category(&self, name: &str) -> ModelCategory {
        self.categories
            .get(name)
            .copied()
            .unwrap_or(ModelCategory::Object)
    }
}

/// Render `models.py`: every component schema, then the query models the
/// manager phase discovered.
pub fn generate_models(
    printer: &Printer,
    schemas: &IndexMap<String, SchemaOrRef>,
    query_definitions: &[String],
) -> Result<GeneratedFile, GenerateError> {
    let models: Vec<SchemaModel> = schemas
        .iter()
        .map(|(name, schema)| SchemaModel::from_schema(name, schema))
        .collect();

    let mut definitions = Vec::with_capacity(models.len() + query_definitions.len());
    for model in ordered(&models) {
        definitions.push(model.render(printer)?);
    }
    definitions.extend(query_definitions.iter().cloned());
    log::debug!(
        "models: {} schemas, {} query models",
        models.len(),
        query_definitions.len()
    );

    let content = printer.render(MODELS_TEMPLATE, context! { definitions => definitions })?;
    Ok(GeneratedFile {
        path: MODELS_FILE.to_string(),
        content,
    })
}
