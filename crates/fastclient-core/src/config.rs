use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Project configuration loaded from `.fastclient.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FastclientConfig {
    pub client: ClientKind,
    /// Import path the manager files use to reach the shared models module.
    pub models_import: String,
    /// Run the external formatter and import sorter over the generated module.
    pub format: bool,
}

impl Default for FastclientConfig {
    fn default() -> Self {
        Self {
            client: ClientKind::Sync,
            models_import: DEFAULT_MODELS_IMPORT.to_string(),
            format: true,
        }
    }
}

/// Which HTTP transport the generated managers are written against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    /// Blocking calls through `requests`.
    #[default]
    Sync,
    /// Coroutines through `aiohttp`.
    Async,
}

impl ClientKind {
    /// Name of the Python transport library.
    pub fn library(&self) -> &'static str {
        match self {
            ClientKind::Sync => "requests",
            ClientKind::Async => "aiohttp",
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientKind::Sync => write!(f, "sync"),
            ClientKind::Async => write!(f, "async"),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".fastclient.yaml";

/// Relative import from `<module>/managers/<tag>.py` to `<module>/models.py`.
pub const DEFAULT_MODELS_IMPORT: &str = "..models";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<FastclientConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: FastclientConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    log::debug!("loaded config from {}", path.display());
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FastclientConfig::default();
        assert_eq!(config.client, ClientKind::Sync);
        assert_eq!(config.models_import, "..models");
        assert!(config.format);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
client: async
models_import: petstore.models
format: false
"#;
        let config: FastclientConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.client, ClientKind::Async);
        assert_eq!(config.models_import, "petstore.models");
        assert!(!config.format);
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "client: async\n";
        let config: FastclientConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.client, ClientKind::Async);
        // Defaults applied
        assert_eq!(config.models_import, "..models");
        assert!(config.format);
    }

    #[test]
    fn test_missing_config_is_none() {
        let loaded = load_config(Path::new("does-not-exist/.fastclient.yaml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_client_kind_library() {
        assert_eq!(ClientKind::Sync.library(), "requests");
        assert_eq!(ClientKind::Async.library(), "aiohttp");
        assert_eq!(ClientKind::Async.to_string(), "async");
    }
}
