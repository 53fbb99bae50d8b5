use indexmap::IndexMap;
use minijinja::context;

use fastclient_core::GeneratedFile;
use fastclient_core::config::ClientKind;
use fastclient_core::parse::components::Components;
use fastclient_core::parse::operation::PathItem;

use crate::emitters::manager::ManagerClassGenerator;
use crate::error::GenerateError;
use crate::printer::{MANAGER_FILE_TEMPLATE, Printer};

/// Directory, relative to the module root, that holds the manager files.
pub const MANAGERS_DIR: &str = "managers";

/// A rendered manager module plus the query models it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerFile {
    pub file: GeneratedFile,
    pub definitions: Vec<String>,
}

/// Relative path of the manager module for a tag.
pub fn manager_file_path(tag: &str) -> String {
    format!("{MANAGERS_DIR}/{}.py", tag.to_lowercase())
}

/// Wraps a manager class with its imports.
pub struct ManagerFileGenerator<'a> {
    class: ManagerClassGenerator<'a>,
    tag: &'a str,
    kind: ClientKind,
    models_import: &'a str,
}

impl<'a> ManagerFileGenerator<'a> {
    pub fn new(
        tag: &'a str,
        paths: &'a IndexMap<String, PathItem>,
        components: &'a Components,
        kind: ClientKind,
        models_import: &'a str,
    ) -> Self {
        Self {
            class: ManagerClassGenerator::new(tag, paths, components, kind),
            tag,
            kind,
            models_import,
        }
    }

    pub fn generate(&self, printer: &Printer) -> Result<ManagerFile, GenerateError> {
        let class = self.class.generate(printer)?;
        // BTreeSet iteration keeps the import list sorted.
        let model_imports: Vec<&String> = class.referenced.iter().collect();
        let content = printer.render(
            MANAGER_FILE_TEMPLATE,
            context! {
                typing => class.typing,
                library => self.kind.library(),
                pydantic => class.pydantic,
                models_import => self.models_import,
                model_imports => model_imports,
                manager => class.body,
            },
        )?;
        Ok(ManagerFile {
            file: GeneratedFile {
                path: manager_file_path(self.tag),
                content,
            },
            definitions: class.definitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastclient_core::parse::spec::OpenApiSpec;

    #[test]
    fn test_manager_file_path() {
        assert_eq!(manager_file_path("Pet"), "managers/pet.py");
        assert_eq!(manager_file_path("StoreFront"), "managers/storefront.py");
    }

    #[test]
    fn test_imports() {
        let spec: OpenApiSpec = serde_yaml_ng::from_str(
            r#"
openapi: "3.0.3"
info: {title: t, version: "1"}
paths:
  /pet/{petId}:
    get:
      operationId: getPetById
      tags: [pet]
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: integer
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
components:
  schemas:
    Pet:
      type: object
"#,
        )
        .unwrap();
        let components = spec.components.clone().unwrap_or_default();
        let printer = Printer::new().unwrap();
        let file = ManagerFileGenerator::new(
            "pet",
            &spec.paths,
            &components,
            ClientKind::Async,
            "..models",
        )
        .generate(&printer)
        .unwrap();
        assert_eq!(file.file.path, "managers/pet.py");
        assert!(file.definitions.is_empty());
        assert!(file.file.content.starts_with(
            "from typing import Any, Final, Optional\n\nimport aiohttp\n\nfrom ..models import (\n    Pet,\n)\n\n\nclass PetManager:\n"
        ));
        assert!(file.file.content.ends_with("return None\n"));
    }
}
