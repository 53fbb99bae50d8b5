use fastclient_core::error::{ParseError, ResolveError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("tags '{first}' and '{second}' would both be written to {path}")]
    TagCollision {
        first: String,
        second: String,
        path: String,
    },

    #[error("{class}.{method} is generated by both {first} and {second}")]
    DuplicateMethod {
        class: String,
        method: String,
        first: String,
        second: String,
    },

    #[error("{url}: placeholder '{{{name}}}' has no matching path parameter")]
    UndeclaredPathParameter { url: String, name: String },
}

impl GenerateError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
