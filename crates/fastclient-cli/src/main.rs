use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::Parser;

use fastclient_core::config::{self, CONFIG_FILE_NAME, ClientKind, FastclientConfig};
use fastclient_core::parse;
use fastclient_core::parse::spec::OpenApiSpec;
use fastclient_python::ProjectGenerator;

/// Generate a Python API client (per-tag managers and Pydantic models) from an
/// OpenAPI 3 document.
#[derive(Parser, Debug)]
#[command(name = "fastclient", version)]
struct Cli {
    /// Path to the OpenAPI document (YAML, or JSON when the name ends in `.json`)
    openapi_file: PathBuf,

    /// Directory the client package is created in
    destination: PathBuf,

    /// Name of the generated Python package
    module_name: String,

    /// Generate `aiohttp` coroutines instead of blocking `requests` calls
    #[arg(long = "async")]
    use_async: bool,

    /// Skip running ruff on the generated package
    #[arg(long)]
    no_format: bool,

    /// Import path the manager modules use to reach the models module
    #[arg(long)]
    models_import: Option<String>,

    /// Project configuration file
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,
}

impl Cli {
    /// Apply command-line overrides on top of the configuration file.
    fn resolve_config(&self, file: Option<FastclientConfig>) -> FastclientConfig {
        let mut cfg = file.unwrap_or_default();
        if self.use_async {
            cfg.client = ClientKind::Async;
        }
        if self.no_format {
            cfg.format = false;
        }
        if let Some(models_import) = &self.models_import {
            cfg.models_import = models_import.clone();
        }
        cfg
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let file_cfg = config::load_config(&cli.config).map_err(|e| anyhow::anyhow!(e))?;
    let cfg = cli.resolve_config(file_cfg);

    let spec = load_spec(&cli.openapi_file)?;
    let generator = ProjectGenerator::new(&spec, &cli.destination, &cli.module_name, cfg.client)?
        .with_models_import(cfg.models_import.clone());

    log::info!(
        "generating {} client '{}' from {}",
        cfg.client,
        cli.module_name,
        cli.openapi_file.display()
    );
    let written = generator.generate()?;

    if cfg.format {
        try_run_ruff(generator.module_path());
    }

    eprintln!(
        "Generated {} files in {}",
        written.len(),
        generator.module_path().display()
    );
    Ok(())
}

fn load_spec(path: &Path) -> Result<OpenApiSpec> {
    if !path.exists() {
        anyhow::bail!("{} does not exist.", path.display());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let spec = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(spec)
}

/// Run the ruff formatter and import sorter over the generated package.
fn try_run_ruff(module_dir: &Path) {
    match Command::new("ruff")
        .args(["format", "."])
        .current_dir(module_dir)
        .output()
    {
        Ok(result) if result.status.success() => {
            log::info!("formatted with ruff");
        }
        Ok(_) => {
            log::warn!("ruff format had issues (non-zero exit)");
        }
        Err(_) => {
            eprintln!(
                "  note: ruff not found, run `ruff format . && ruff check --select I --fix .` in {} to format",
                module_dir.display()
            );
            return;
        }
    }

    match Command::new("ruff")
        .args(["check", "--select", "I", "--fix", "."])
        .current_dir(module_dir)
        .output()
    {
        Ok(result) if result.status.success() => {
            log::info!("sorted imports with ruff");
        }
        Ok(_) => {
            log::warn!("ruff check had issues (non-zero exit)");
        }
        Err(_) => {}
    }
}
