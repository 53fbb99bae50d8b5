use std::fs;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};

use fastclient_core::GeneratedFile;
use fastclient_core::config::{ClientKind, DEFAULT_MODELS_IMPORT};
use fastclient_core::parse::components::Components;
use fastclient_core::parse::operation::PathItem;
use fastclient_core::parse::spec::OpenApiSpec;

use crate::emitters::manager_file::{MANAGERS_DIR, ManagerFileGenerator, manager_file_path};
use crate::emitters::models::generate_models;
use crate::error::GenerateError;
use crate::printer::Printer;

/// Output of the manager phase: one file per tag plus the query models
/// those managers need in `models.py`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerPhase {
    pub files: Vec<GeneratedFile>,
    pub definitions: Vec<String>,
}

/// Drives generation of a whole client package:
///
/// ```text
/// <destination>/<module_name>/__init__.py
/// <destination>/<module_name>/models.py
/// <destination>/<module_name>/managers/__init__.py
/// <destination>/<module_name>/managers/<tag>.py
/// ```
pub struct ProjectGenerator<'a> {
    paths: &'a IndexMap<String, PathItem>,
    components: &'a Components,
    module_path: PathBuf,
    kind: ClientKind,
    models_import: String,
    printer: Printer,
}

impl<'a> ProjectGenerator<'a> {
    /// Fails when the document has no `components.schemas`.
    pub fn new(
        spec: &'a OpenApiSpec,
        destination: &Path,
        module_name: &str,
        kind: ClientKind,
    ) -> Result<Self, GenerateError> {
        spec.schemas()?;
        let components = spec
            .components
            .as_ref()
            .ok_or_else(|| GenerateError::MissingField("components".to_string()))?;
        Ok(Self {
            paths: &spec.paths,
            components,
            module_path: destination.join(module_name),
            kind,
            models_import: DEFAULT_MODELS_IMPORT.to_string(),
            printer: Printer::new()?,
        })
    }

    /// Import path the manager modules use for the models module.
    pub fn with_models_import(mut self, models_import: impl Into<String>) -> Self {
        self.models_import = models_import.into();
        self
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    pub fn managers_path(&self) -> PathBuf {
        self.module_path.join(MANAGERS_DIR)
    }

    /// Primary tags in first-seen order.
    pub fn tags(&self) -> Result<Vec<String>, GenerateError> {
        let mut tags = IndexSet::new();
        for (url, item) in self.paths {
            for (method, operation) in item.operations() {
                let tag = operation.primary_tag().ok_or_else(|| {
                    GenerateError::MissingField(format!("paths.{url}.{method}.tags"))
                })?;
                tags.insert(tag);
            }
        }
        Ok(tags.into_iter().collect())
    }

    /// Create the package and `managers` sub-package. Existing directories and
    /// `__init__.py` files are left untouched.
    pub fn scaffold(&self) -> Result<(), GenerateError> {
        make_python_module(&self.module_path)?;
        make_python_module(&self.managers_path())
    }

    /// Render one manager module per tag. Tags whose module paths coincide
    /// are rejected.
    pub fn render_managers(&self) -> Result<ManagerPhase, GenerateError> {
        let mut phase = ManagerPhase::default();
        let mut owners: IndexMap<String, String> = IndexMap::new();
        for tag in self.tags()? {
            let path = manager_file_path(&tag);
            if let Some(first) = owners.insert(path.clone(), tag.clone()) {
                return Err(GenerateError::TagCollision {
                    first,
                    second: tag,
                    path,
                });
            }
            let file = ManagerFileGenerator::new(
                &tag,
                self.paths,
                self.components,
                self.kind,
                &self.models_import,
            )
            .generate(&self.printer)?;
            phase.files.push(file.file);
            phase.definitions.extend(file.definitions);
        }
        Ok(phase)
    }

    /// Render `models.py`. Takes the manager phase so the query models it
    /// discovered are included.
    pub fn render_models(&self, managers: &ManagerPhase) -> Result<GeneratedFile, GenerateError> {
        generate_models(
            &self.printer,
            &self.components.schemas,
            &managers.definitions,
        )
    }

    /// Every generated file without touching the filesystem.
    pub fn render(&self) -> Result<Vec<GeneratedFile>, GenerateError> {
        let managers = self.render_managers()?;
        let models = self.render_models(&managers)?;
        let mut files = managers.files;
        files.push(models);
        Ok(files)
    }

    pub fn generate_managers(&self) -> Result<ManagerPhase, GenerateError> {
        let phase = self.render_managers()?;
        for file in &phase.files {
            self.write(file)?;
        }
        Ok(phase)
    }

    pub fn generate_models(&self, managers: &ManagerPhase) -> Result<GeneratedFile, GenerateError> {
        let file = self.render_models(managers)?;
        self.write(&file)?;
        Ok(file)
    }

    /// Scaffold, write the managers, then write the models. Returns the paths
    /// written.
    pub fn generate(&self) -> Result<Vec<PathBuf>, GenerateError> {
        self.scaffold()?;
        log::info!("scaffolded {}", self.module_path.display());
        let managers = self.generate_managers()?;
        log::info!(
            "generated {} managers, {} query models",
            managers.files.len(),
            managers.definitions.len()
        );
        let models = self.generate_models(&managers)?;
        let written = managers
            .files
            .iter()
            .chain(std::iter::once(&models))
            .map(|f| self.module_path.join(&f.path))
            .collect();
        Ok(written)
    }

    fn write(&self, file: &GeneratedFile) -> Result<(), GenerateError> {
        let path = self.module_path.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))?;
        }
        fs::write(&path, &file.content).map_err(|e| GenerateError::io(&path, e))?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

fn make_python_module(path: &Path) -> Result<(), GenerateError> {
    fs::create_dir_all(path).map_err(|e| GenerateError::io(path, e))?;
    let init = path.join("__init__.py");
    if !init.exists() {
        fs::write(&init, "").map_err(|e| GenerateError::io(&init, e))?;
        log::debug!("created {}", init.display());
    }
    Ok(())
}
