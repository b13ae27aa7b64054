//! Catalog metadata types

mod column;
mod table;

pub use column::ColumnDescriptor;
pub use table::{TableIdentity, DEFAULT_SCHEMA};
