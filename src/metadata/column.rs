//! Column metadata

use serde::Serialize;

/// One column of a table, in catalog ordinal order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub name: String,
    /// Engine type name as declared (e.g., nvarchar)
    pub declared_type: String,
    /// `"50"`, `"MAX"`, `"10,2"`, or empty when the type takes no length
    pub length_or_precision: String,
    pub nullable: bool,
    pub is_primary_key: bool,
    pub is_identity: bool,
    /// Default constraint definition, empty if none
    pub default_expression: String,
    /// MS_Description extended property, empty if none
    pub description: String,
}

impl ColumnDescriptor {
    /// Type as shown to readers: `nvarchar(50)`, or the bare type when no length applies
    pub fn display_type(&self) -> String {
        if self.length_or_precision.is_empty() {
            self.declared_type.clone()
        } else {
            format!("{}({})", self.declared_type, self.length_or_precision)
        }
    }
}
