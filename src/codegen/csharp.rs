//! C# class emitter

use super::SemanticType;
use crate::metadata::{ColumnDescriptor, TableIdentity};

/// Extension of generated source files
pub const FILE_EXTENSION: &str = "cs";

const INDENT: &str = "    ";

/// C# spelling of a field type. Value types get `?` when the column is nullable.
pub fn csharp_type(semantic: SemanticType, nullable: bool) -> String {
    let base = match semantic {
        SemanticType::Int8 => "byte",
        SemanticType::Int16 => "short",
        SemanticType::Int32 => "int",
        SemanticType::Int64 => "long",
        SemanticType::Boolean => "bool",
        SemanticType::Decimal => "decimal",
        SemanticType::Single => "float",
        SemanticType::Double => "double",
        SemanticType::DateTime => "DateTime",
        SemanticType::TimeOfDay => "TimeSpan",
        SemanticType::DateTimeOffset => "DateTimeOffset",
        SemanticType::Uuid => "Guid",
        SemanticType::String => "string",
        SemanticType::Binary => "byte[]",
        SemanticType::Opaque => "object",
    };

    if nullable && !semantic.is_reference() {
        format!("{}?", base)
    } else {
        base.to_string()
    }
}

/// Table name without its schema prefix (`dbo.Users` -> `Users`)
pub fn clean_table_name(full_name: &str) -> String {
    TableIdentity::parse(full_name).table_name
}

/// Emit one class for a table, one auto-property per column in ordinal order
pub fn emit_class(full_table_name: &str, columns: &[ColumnDescriptor], namespace: &str) -> String {
    let class_name = clean_table_name(full_table_name);
    let mut out = String::new();

    out.push_str(&format!("namespace {}\n", namespace));
    out.push_str("{\n");
    out.push_str(&format!("{}public class {}\n", INDENT, class_name));
    out.push_str(&format!("{}{{\n", INDENT));

    let properties: Vec<String> = columns
        .iter()
        .map(|column| {
            let ty = csharp_type(
                SemanticType::from_engine_type(&column.declared_type),
                column.nullable,
            );
            format!(
                "{indent}{indent}public {} {} {{ get; set; }}\n",
                ty,
                column.name,
                indent = INDENT
            )
        })
        .collect();
    out.push_str(&properties.join("\n"));

    out.push_str(&format!("{}}}\n", INDENT));
    out.push_str("}\n");
    out
}
