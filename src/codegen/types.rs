//! Engine type to semantic type mapping

/// Language-neutral type of a generated field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// tinyint (0..=255)
    Int8,
    Int16,
    Int32,
    Int64,
    Boolean,
    /// Fixed-point: decimal, numeric, money
    Decimal,
    Single,
    Double,
    /// Calendar date, with or without time of day
    DateTime,
    TimeOfDay,
    DateTimeOffset,
    Uuid,
    String,
    Binary,
    /// Anything without a mapping (sql_variant, xml, geography, user types, ...)
    Opaque,
}

impl SemanticType {
    /// Map an engine type name. Unknown names fall back to [`SemanticType::Opaque`].
    pub fn from_engine_type(type_name: &str) -> Self {
        match type_name.trim().to_ascii_lowercase().as_str() {
            "tinyint" => SemanticType::Int8,
            "smallint" => SemanticType::Int16,
            "int" => SemanticType::Int32,
            "bigint" => SemanticType::Int64,
            "bit" => SemanticType::Boolean,
            "decimal" | "numeric" | "money" | "smallmoney" => SemanticType::Decimal,
            "real" => SemanticType::Single,
            "float" => SemanticType::Double,
            "datetime" | "datetime2" | "smalldatetime" | "date" => SemanticType::DateTime,
            "time" => SemanticType::TimeOfDay,
            "datetimeoffset" => SemanticType::DateTimeOffset,
            "uniqueidentifier" => SemanticType::Uuid,
            "char" | "nchar" | "varchar" | "nvarchar" | "text" | "ntext" => SemanticType::String,
            "binary" | "varbinary" | "image" => SemanticType::Binary,
            _ => SemanticType::Opaque,
        }
    }

    /// Reference-like types already admit null and are never wrapped in an optional
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            SemanticType::String | SemanticType::Binary | SemanticType::Opaque
        )
    }
}
