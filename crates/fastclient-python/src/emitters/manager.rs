use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use minijinja::context;

use fastclient_core::config::ClientKind;
use fastclient_core::parse::components::Components;
use fastclient_core::parse::operation::PathItem;

use crate::emitters::method::MethodBuilder;
use crate::emitters::models::ModelCatalog;
use crate::emitters::query_model;
use crate::error::GenerateError;
use crate::naming::manager_class_name;
use crate::operation::OperationInfo;
use crate::printer::{MANAGER_TEMPLATE, Printer};

/// A rendered manager class and what it discovered along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerClass {
    pub name: String,
    pub body: String,
    /// Model names the class body refers to and must import.
    pub referenced: BTreeSet<String>,
    /// Names the class body needs from `typing`.
    pub typing: BTreeSet<&'static str>,
    /// Names the class body needs from `pydantic`.
    pub pydantic: BTreeSet<&'static str>,
    /// Query model definitions destined for the models module.
    pub definitions: Vec<String>,
}

/// `typing` names every manager class uses.
const BASE_TYPING: &[&str] = &["Any", "Final", "Optional"];

/// Builds the manager class for every operation whose first tag is `tag`.
pub struct ManagerClassGenerator<'a> {
    tag: &'a str,
    paths: &'a IndexMap<String, PathItem>,
    components: &'a Components,
    kind: ClientKind,
    catalog: ModelCatalog,
}

impl<'a> ManagerClassGenerator<'a> {
    pub fn new(
        tag: &'a str,
        paths: &'a IndexMap<String, PathItem>,
        components: &'a Components,
        kind: ClientKind,
    ) -> Self {
        Self {
            tag,
            paths,
            components,
            kind,
            catalog: ModelCatalog::from_schemas(&components.schemas),
        }
    }

    pub fn class_name(&self) -> String {
        manager_class_name(self.tag)
    }

    /// Operations belonging to this tag, in path then method order.
    pub fn operations(&self) -> Result<Vec<OperationInfo>, GenerateError> {
        let mut operations = Vec::new();
        for (url, item) in self.paths {
            for (method, operation) in item.operations() {
                let tag = operation.primary_tag().ok_or_else(|| {
                    GenerateError::MissingField(format!("paths.{url}.{method}.tags"))
                })?;
                if tag != self.tag {
                    continue;
                }
                operations.push(OperationInfo::parse(
                    self.tag,
                    url,
                    method,
                    item,
                    operation,
                    self.components,
                )?);
            }
        }
        Ok(operations)
    }

    pub fn generate(&self, printer: &Printer) -> Result<ManagerClass, GenerateError> {
        let class_name = self.class_name();
        let builder = MethodBuilder::new(self.kind, &self.catalog);
        let mut referenced = BTreeSet::new();
        let mut typing: BTreeSet<&'static str> = BASE_TYPING.iter().copied().collect();
        let mut pydantic = BTreeSet::new();
        let mut definitions = Vec::new();
        let mut methods = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();

        for mut info in self.operations()? {
            let endpoint = format!("{} {}", info.method, info.url);
            if let Some(first) = seen.insert(info.function_name.clone(), endpoint.clone()) {
                return Err(GenerateError::DuplicateMethod {
                    class: class_name,
                    method: info.function_name,
                    first,
                    second: endpoint,
                });
            }
            if !info.query_fields.is_empty() {
                let (definition, name) = query_model::generate(
                    printer,
                    self.tag,
                    &class_name,
                    &info.function_name,
                    info.query_fields.iter().cloned(),
                )?;
                definitions.push(definition);
                referenced.insert(name.clone());
                info.query_model = Some(name);
            }
            if let Some(request) = &info.request {
                request.collect_models(&mut referenced);
                request.collect_typing(&mut typing);
            }
            if let Some(annotation) = info.response.annotation() {
                annotation.collect_models(&mut referenced);
                annotation.collect_typing(&mut typing);
            }
            for parameter in &info.path_parameters {
                parameter.annotation.collect_models(&mut referenced);
                parameter.annotation.collect_typing(&mut typing);
            }
            if builder.uses_type_adapter(&info) {
                pydantic.insert("TypeAdapter");
            }
            log::debug!(
                "{}.{} -> {} {}",
                class_name,
                info.function_name,
                info.method,
                info.url
            );
            methods.push(builder.build(printer, &info)?);
        }

        let body = printer.render(
            MANAGER_TEMPLATE,
            context! {
                class_name => class_name.clone(),
                tag => self.tag,
                is_async => self.kind == ClientKind::Async,
                methods => methods,
            },
        )?;

        Ok(ManagerClass {
            name: class_name,
            body: body.trim_end().to_string(),
            referenced,
            typing,
            pydantic,
            definitions,
        })
    }
}
