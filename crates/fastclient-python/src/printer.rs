use minijinja::Environment;
use serde::Serialize;

use crate::error::GenerateError;

pub const METHOD_TEMPLATE: &str = "method.py.j2";
pub const MANAGER_TEMPLATE: &str = "manager.py.j2";
pub const MANAGER_FILE_TEMPLATE: &str = "manager_file.py.j2";
pub const QUERY_MODEL_TEMPLATE: &str = "query_model.py.j2";
pub const SCHEMA_MODEL_TEMPLATE: &str = "schema_model.py.j2";
pub const MODELS_TEMPLATE: &str = "models.py.j2";

/// Renders the Python templates. Built once per project and shared by every
/// emitter.
pub struct Printer {
    env: Environment<'static>,
}

impl Printer {
    pub fn new() -> Result<Self, GenerateError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_template(METHOD_TEMPLATE, include_str!("../templates/method.py.j2"))?;
        env.add_template(MANAGER_TEMPLATE, include_str!("../templates/manager.py.j2"))?;
        env.add_template(
            MANAGER_FILE_TEMPLATE,
            include_str!("../templates/manager_file.py.j2"),
        )?;
        env.add_template(
            QUERY_MODEL_TEMPLATE,
            include_str!("../templates/query_model.py.j2"),
        )?;
        env.add_template(
            SCHEMA_MODEL_TEMPLATE,
            include_str!("../templates/schema_model.py.j2"),
        )?;
        env.add_template(MODELS_TEMPLATE, include_str!("../templates/models.py.j2"))?;
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, template: &str, ctx: S) -> Result<String, GenerateError> {
        let tmpl = self.env.get_template(template)?;
        Ok(tmpl.render(ctx)?)
    }
}
