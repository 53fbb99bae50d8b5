use heck::{ToSnakeCase, ToUpperCamelCase};

/// Python keywords; identifiers colliding with these get a trailing `_`.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Names a generated method already binds; path parameters must not shadow them.
const METHOD_LOCALS: &[&str] = &["self", "params", "kwargs", "req_data"];

/// Convert an arbitrary name (operationId, parameter name) into a
/// `snake_case` Python identifier.
///
/// `findPetsByStatus` → `find_pets_by_status`, `X-Rate-Limit` → `x_rate_limit`
pub fn to_identifier(name: &str) -> String {
    let mut ident = name.to_snake_case();
    if ident.is_empty() {
        return "_".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    escape_keyword(ident)
}

/// Identifier for a path parameter inside a generated method signature.
pub fn to_parameter_name(name: &str) -> String {
    let ident = to_identifier(name);
    if METHOD_LOCALS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else {
        ident
    }
}

/// Mimic Python's `str.title()`: the first letter of every run of letters is
/// upper-cased, the rest lower-cased.
///
/// `find_pets_by_status` → `Find_Pets_By_Status`, `v2api` → `V2Api`
pub fn python_title(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_cased = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if prev_cased {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(ch);
            prev_cased = false;
        }
    }
    out
}

/// Title-case a value and drop everything that cannot appear in a class name.
///
/// `pet_store` → `PetStore`, `store` → `Store`
pub fn to_class_name(value: &str) -> String {
    let titled: String = python_title(value)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    if titled.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{titled}")
    } else {
        titled
    }
}

/// Name of the manager class generated for a tag.
pub fn manager_class_name(tag: &str) -> String {
    format!("{}Manager", to_class_name(tag))
}

/// Method name for an operation: the snake-cased `operationId` with a leading
/// `<tag>_` prefix removed.
///
/// (`pet`, `pet_findByStatus`) → `find_by_status`
pub fn function_name(tag: &str, operation_id: &str) -> String {
    let ident = to_identifier(operation_id);
    let prefix = format!("{}_", to_identifier(tag));
    match ident.strip_prefix(&prefix) {
        Some(rest) if !rest.is_empty() => escape_keyword(rest.to_string()),
        _ => ident,
    }
}

/// Python class name for a component schema. Valid identifiers are kept
/// verbatim; anything else has invalid characters replaced with `_`.
pub fn schema_class_name(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() {
        return "_".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    escape_keyword(ident)
}

/// Member name for a value of a string enum.
///
/// `available` → `Available`, `in-stock` → `InStock`, `1` → `V1`
pub fn enum_member_name(value: &str) -> String {
    let name = value.to_upper_camel_case();
    if name.is_empty() {
        return "Empty".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("V{name}");
    }
    escape_keyword(name)
}

fn escape_keyword(ident: String) -> String {
    if PYTHON_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else {
        ident
    }
}
