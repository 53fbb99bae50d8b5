pub mod config;
pub mod error;
pub mod parse;

/// A generated file with a path relative to the output root and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
