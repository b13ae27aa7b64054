//! Table identity and selection

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Schema assumed when a table name carries no schema prefix
pub const DEFAULT_SCHEMA: &str = "dbo";

/// A user table as listed from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdentity {
    pub schema_name: String,
    pub table_name: String,
    /// Set by the caller before document generation
    pub selected: bool,
}

impl TableIdentity {
    pub fn new(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            selected: false,
        }
    }

    /// Parse `schema.table`. A name without a dot lands in the `dbo` schema.
    ///
    /// Only the first two segments count: `sales.order.items` parses as schema
    /// `sales`, table `order`.
    pub fn parse(full_name: &str) -> Self {
        let mut segments = full_name.split('.');
        match (segments.next(), segments.next()) {
            (Some(schema), Some(table)) => Self::new(schema, table),
            _ => Self::new(DEFAULT_SCHEMA, full_name),
        }
    }

    /// Fully-qualified name (e.g., dbo.Users)
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }
}

// Serialized with the derived full name; the selection flag is not part of the wire shape.
impl Serialize for TableIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TableIdentity", 3)?;
        state.serialize_field("schemaName", &self.schema_name)?;
        state.serialize_field("tableName", &self.table_name)?;
        state.serialize_field("fullName", &self.full_name())?;
        state.end()
    }
}
