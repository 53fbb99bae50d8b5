//! Structured pieces of generated Python source. Type references, field
//! declarations and path parameters are built as values and only turned into
//! text when a template renders them.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Names that are never imported from the models module.
pub const BUILTIN_SENTINELS: &[&str] = &["Any", "AnyType", "None", "NoneType", "Metaclass"];

/// A Python type annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PyType {
    /// A class defined in the generated models module.
    Model(String),
    /// A builtin such as `int`, `str`, `dict`, `None`.
    Builtin(&'static str),
    List(Box<PyType>),
    /// `dict[str, T]`
    Dict(Box<PyType>),
    Optional(Box<PyType>),
    Union(Vec<PyType>),
    /// `Literal[...]` over already-rendered Python literals.
    Literal(Vec<String>),
    Any,
}

impl PyType {
    pub fn list(inner: PyType) -> Self {
        PyType::List(Box::new(inner))
    }

    pub fn dict(inner: PyType) -> Self {
        PyType::Dict(Box::new(inner))
    }

    /// Wrap in `Optional[...]` unless already optional.
    pub fn optional(self) -> Self {
        match self {
            PyType::Optional(_) => self,
            other => PyType::Optional(Box::new(other)),
        }
    }

    /// Collect every generated model name this annotation mentions.
    pub fn collect_models(&self, out: &mut BTreeSet<String>) {
        match self {
            PyType::Model(name) => {
                if !BUILTIN_SENTINELS.contains(&name.as_str()) {
                    out.insert(name.clone());
                }
            }
            PyType::List(inner) | PyType::Dict(inner) | PyType::Optional(inner) => {
                inner.collect_models(out)
            }
            PyType::Union(variants) => {
                for v in variants {
                    v.collect_models(out);
                }
            }
            PyType::Builtin(_) | PyType::Literal(_) | PyType::Any => {}
        }
    }

    /// Collect the `typing` names this annotation needs at runtime.
    pub fn collect_typing(&self, out: &mut BTreeSet<&'static str>) {
        match self {
            PyType::Optional(inner) => {
                out.insert("Optional");
                inner.collect_typing(out);
            }
            PyType::List(inner) | PyType::Dict(inner) => inner.collect_typing(out),
            PyType::Union(variants) => {
                for v in variants {
                    v.collect_typing(out);
                }
            }
            PyType::Literal(_) => {
                out.insert("Literal");
            }
            PyType::Any => {
                out.insert("Any");
            }
            PyType::Model(_) | PyType::Builtin(_) => {}
        }
    }
}

impl fmt::Display for PyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PyType::Model(name) => f.write_str(name),
            PyType::Builtin(name) => f.write_str(name),
            PyType::List(inner) => write!(f, "list[{inner}]"),
            PyType::Dict(inner) => write!(f, "dict[str, {inner}]"),
            PyType::Optional(inner) => write!(f, "Optional[{inner}]"),
            PyType::Union(variants) => {
                let parts: Vec<String> = variants.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(" | "))
            }
            PyType::Literal(values) => write!(f, "Literal[{}]", values.join(", ")),
            PyType::Any => f.write_str("Any"),
        }
    }
}

/// A field of a generated Pydantic model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldDecl {
    /// Python attribute name.
    pub name: String,
    /// Wire name, when it differs from `name`.
    pub alias: Option<String>,
    pub annotation: String,
    pub required: bool,
    pub description: Option<String>,
}

impl FieldDecl {
    pub fn new(wire_name: &str, name: String, ty: PyType, required: bool) -> Self {
        let annotation = if required { ty } else { ty.optional() };
        let alias = (name != wire_name).then(|| wire_name.to_string());
        Self {
            name,
            alias,
            annotation: annotation.to_string(),
            required,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// The declaration line, e.g. `status: Optional[str] = None`.
    pub fn declaration(&self) -> String {
        let default = match (&self.alias, self.required) {
            (None, true) => String::new(),
            (None, false) => " = None".to_string(),
            (Some(alias), true) => format!(" = Field(alias={})", py_str(alias)),
            (Some(alias), false) => format!(" = Field(default=None, alias={})", py_str(alias)),
        };
        format!("{}: {}{}", self.name, self.annotation, default)
    }
}

/// A positional path parameter of a manager method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathParameter {
    pub name: String,
    pub annotation: PyType,
}

impl PathParameter {
    /// The signature fragment, e.g. `pet_id: int`.
    pub fn declaration(&self) -> String {
        format!("{}: {}", self.name, self.annotation)
    }
}

/// Render a string as a double-quoted Python literal.
pub fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render a JSON value as a Python literal (`true` → `True`, `null` → `None`).
pub fn py_literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "None".to_string(),
        serde_json::Value::Bool(true) => "True".to_string(),
        serde_json::Value::Bool(false) => "False".to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => py_str(s),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(py_literal).collect();
            format!("[{}]", parts.join(", "))
        }
        serde_json::Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", py_str(k), py_literal(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

/// Escape sequences that would end a docstring or comment early.
pub fn escape_docstring(value: &str) -> String {
    value.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

/// An indented, triple-quoted docstring; every line ends with a newline.
pub fn docstring_block(text: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = format!("{pad}\"\"\"\n");
    for line in escape_docstring(text.trim()).lines() {
        let line = line.trim_end();
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{pad}{line}\n"));
        }
    }
    out.push_str(&format!("{pad}\"\"\"\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_types() {
        let ty = PyType::list(PyType::Model("Pet".to_string())).optional();
        assert_eq!(ty.to_string(), "Optional[list[Pet]]");
        assert_eq!(PyType::dict(PyType::Builtin("int")).to_string(), "dict[str, int]");
        assert_eq!(
            PyType::Union(vec![PyType::Builtin("str"), PyType::Builtin("int")]).to_string(),
            "str | int"
        );
        assert_eq!(
            PyType::Literal(vec!["\"a\"".to_string(), "\"b\"".to_string()]).to_string(),
            "Literal[\"a\", \"b\"]"
        );
    }

    #[test]
    fn test_optional_is_idempotent() {
        let ty = PyType::Builtin("str").optional().optional();
        assert_eq!(ty.to_string(), "Optional[str]");
    }

    #[test]
    fn test_collect_models_skips_sentinels() {
        let ty = PyType::Union(vec![
            PyType::list(PyType::Model("Pet".to_string())),
            PyType::Model("NoneType".to_string()),
            PyType::dict(PyType::Model("Tag".to_string())),
        ]);
        let mut names = BTreeSet::new();
        ty.collect_models(&mut names);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["Pet", "Tag"]);
    }

    #[test]
    fn test_collect_typing() {
        let ty = PyType::list(PyType::Literal(vec!["\"cat\"".to_string()])).optional();
        let mut names = BTreeSet::new();
        ty.collect_typing(&mut names);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["Literal", "Optional"]);

        let mut names = BTreeSet::new();
        PyType::dict(PyType::Model("Pet".to_string())).collect_typing(&mut names);
        assert!(names.is_empty());
    }

    #[test]
    fn test_field_declarations() {
        let required = FieldDecl::new("name", "name".to_string(), PyType::Builtin("str"), true);
        assert_eq!(required.declaration(), "name: str");

        let optional = FieldDecl::new("limit", "limit".to_string(), PyType::Builtin("int"), false);
        assert_eq!(optional.declaration(), "limit: Optional[int] = None");

        let aliased = FieldDecl::new("photoUrls", "photo_urls".to_string(), PyType::list(PyType::Builtin("str")), true);
        assert_eq!(aliased.declaration(), "photo_urls: list[str] = Field(alias=\"photoUrls\")");

        let both = FieldDecl::new("api-key", "api_key".to_string(), PyType::Builtin("str"), false);
        assert_eq!(
            both.declaration(),
            "api_key: Optional[str] = Field(default=None, alias=\"api-key\")"
        );
    }

    #[test]
    fn test_py_literal() {
        assert_eq!(py_literal(&serde_json::json!(true)), "True");
        assert_eq!(py_literal(&serde_json::json!(null)), "None");
        assert_eq!(py_literal(&serde_json::json!(3)), "3");
        assert_eq!(py_literal(&serde_json::json!("say \"hi\"")), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_escape_docstring() {
        assert_eq!(escape_docstring("a \"\"\" b"), "a \\\"\\\"\\\" b");
    }

    #[test]
    fn test_docstring_block() {
        assert_eq!(
            docstring_block("Summary\n\nMore text ", 4),
            "    \"\"\"\n    Summary\n\n    More text\n    \"\"\"\n"
        );
    }
}
