//! Model class generation

mod csharp;
mod types;

pub use csharp::{clean_table_name, csharp_type, emit_class, FILE_EXTENSION};
pub use types::SemanticType;
