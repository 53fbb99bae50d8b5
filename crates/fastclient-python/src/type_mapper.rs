use fastclient_core::parse::ref_name;
use fastclient_core::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType};

use crate::ir::{PyType, py_literal};
use crate::naming::schema_class_name;

/// Map a primitive schema type to its Python type name. The set of types is
/// closed at deserialization, so the table is total.
pub fn map_schema_type(schema_type: SchemaType) -> &'static str {
    match schema_type {
        SchemaType::Integer => "int",
        SchemaType::Number => "float",
        SchemaType::String => "str",
        SchemaType::Boolean => "bool",
        SchemaType::Array => "list",
        SchemaType::Object => "dict",
        SchemaType::Null => "None",
    }
}

/// The Python class a `$ref` points at.
pub fn ref_type(ref_path: &str) -> PyType {
    PyType::Model(schema_class_name(ref_name(ref_path)))
}

/// Derive a Python annotation for a schema or reference.
pub fn schema_to_python(schema_or_ref: &SchemaOrRef) -> PyType {
    match schema_or_ref {
        SchemaOrRef::Ref { ref_path } => ref_type(ref_path),
        SchemaOrRef::Schema(schema) => {
            let base = inline_schema_to_python(schema);
            if schema.is_nullable() {
                base.optional()
            } else {
                base
            }
        }
    }
}

fn inline_schema_to_python(schema: &Schema) -> PyType {
    if let [single] = schema.all_of.as_slice() {
        return schema_to_python(single);
    }
    if !schema.all_of.is_empty() {
        log::warn!("inline allOf with {} parts rendered as Any", schema.all_of.len());
        return PyType::Any;
    }

    let variants = if schema.one_of.is_empty() {
        &schema.any_of
    } else {
        &schema.one_of
    };
    if !variants.is_empty() {
        let mut types: Vec<PyType> = Vec::new();
        for variant in variants.iter().map(schema_to_python) {
            if !types.contains(&variant) {
                types.push(variant);
            }
        }
        return match types.len() {
            1 => types.remove(0),
            _ => PyType::Union(types),
        };
    }

    if !schema.enum_values.is_empty() {
        return PyType::Literal(schema.enum_values.iter().map(py_literal).collect());
    }

    match schema.primary_type() {
        Some(SchemaType::Array) => {
            let inner = schema
                .items
                .as_deref()
                .map(schema_to_python)
                .unwrap_or(PyType::Any);
            PyType::list(inner)
        }
        Some(SchemaType::Object) | None if !schema.properties.is_empty() => {
            PyType::dict(PyType::Any)
        }
        Some(SchemaType::Object) => match &schema.additional_properties {
            Some(AdditionalProperties::Schema(inner)) => PyType::dict(schema_to_python(inner)),
            _ => PyType::dict(PyType::Any),
        },
        Some(SchemaType::String) if schema.format.as_deref() == Some("binary") => {
            PyType::Builtin("bytes")
        }
        Some(primitive) => PyType::Builtin(map_schema_type(primitive)),
        None => PyType::Any,
    }
}
