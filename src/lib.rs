//! sqldd: SQL Server data dictionaries and model classes
//!
//! This library reads table and column metadata from SQL Server system catalogs
//! and renders it as a Markdown data dictionary or as C# model classes packaged
//! into a ZIP archive.

pub mod archive;
pub mod catalog;
pub mod codegen;
pub mod config;
pub mod connection;
pub mod dictionary;
pub mod error;
pub mod metadata;
pub mod service;
pub mod util;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use archive::GeneratedFiles;
use catalog::CatalogReader;
use dictionary::{DocumentHeader, TableSection};
use metadata::TableIdentity;

pub use connection::{AuthMode, ConnectionDescriptor, ConnectionParams};
pub use error::{Error, ErrorKind, Result};

/// Message for a generation request that selects nothing
pub const NO_TABLES_SELECTED: &str = "Please select at least one table.";

/// Tables to document, by fully-qualified name
#[derive(Debug, Clone)]
pub struct DictionaryRequest {
    pub database: String,
    pub tables: Vec<String>,
}

/// A rendered data dictionary ready to download
#[derive(Debug, Clone)]
pub struct DataDictionary {
    pub markdown: String,
    /// `{database}_DD_{yyyyMMdd_HHmmss}.md`
    pub file_name: String,
    pub table_count: usize,
}

/// Tables to generate model classes for, by fully-qualified name
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub database: String,
    pub tables: Vec<String>,
    pub namespace: String,
}

/// Generated model classes packed into a ZIP
#[derive(Debug, Clone)]
pub struct ModelArchive {
    pub bytes: Vec<u8>,
    /// `{database}_Models_{yyyyMMdd_HHmmss}.zip`
    pub file_name: String,
    /// Classes generated, one per requested table
    pub file_count: usize,
}

impl ModelArchive {
    pub fn to_base64(&self) -> String {
        archive::encode_base64(&self.bytes)
    }
}

/// Build a Markdown data dictionary for the requested tables.
///
/// Tables are listed first and matched against the request; columns are then
/// fetched one table at a time in listing order. Nothing is rendered unless
/// every fetch succeeds.
pub async fn generate_data_dictionary<R: CatalogReader>(
    reader: &R,
    connection: &ConnectionDescriptor,
    request: &DictionaryRequest,
    now: DateTime<Local>,
) -> Result<DataDictionary> {
    if request.tables.is_empty() {
        return Err(Error::validation(NO_TABLES_SELECTED));
    }

    let mut tables = reader.list_tables(connection, &request.database).await?;
    for table in &mut tables {
        table.selected = request.tables.contains(&table.full_name());
    }

    let selected: Vec<TableIdentity> = tables.into_iter().filter(|t| t.selected).collect();
    if selected.is_empty() {
        return Err(Error::validation(NO_TABLES_SELECTED));
    }

    let mut sections = Vec::with_capacity(selected.len());
    for table in selected {
        debug!(table = %table.full_name(), "reading columns");
        let columns = reader
            .list_columns(
                connection,
                &request.database,
                &table.schema_name,
                &table.table_name,
            )
            .await?;
        sections.push(TableSection { table, columns });
    }

    let header = DocumentHeader {
        database: &request.database,
        server: connection.server(),
        generated_at: now.naive_local(),
    };
    let markdown = dictionary::render_markdown(&header, &sections);

    info!(
        database = %request.database,
        tables = sections.len(),
        "generated data dictionary"
    );

    Ok(DataDictionary {
        markdown,
        file_name: util::stamped_file_name(&request.database, "DD", "md", &now),
        table_count: sections.len(),
    })
}

/// Generate one C# class per requested table and pack them into a ZIP.
///
/// Table names without a schema resolve to `dbo`. Files are named after the
/// table without its schema, so two tables with the same name in different
/// schemas share one entry and the later one wins.
pub async fn generate_model_archive<R: CatalogReader>(
    reader: &R,
    connection: &ConnectionDescriptor,
    request: &ModelRequest,
    now: DateTime<Local>,
) -> Result<ModelArchive> {
    if request.tables.is_empty() {
        return Err(Error::validation(NO_TABLES_SELECTED));
    }

    let mut files = GeneratedFiles::new();
    for full_name in &request.tables {
        let table = TableIdentity::parse(full_name);
        debug!(table = %table.full_name(), "reading columns");
        let columns = reader
            .list_columns(
                connection,
                &request.database,
                &table.schema_name,
                &table.table_name,
            )
            .await?;

        let source = codegen::emit_class(full_name, &columns, &request.namespace);
        let file_name = format!("{}.{}", table.table_name, codegen::FILE_EXTENSION);
        files.insert(file_name, source);
    }

    let bytes = archive::create_archive(&files)?;

    info!(
        database = %request.database,
        classes = request.tables.len(),
        entries = files.len(),
        "generated model archive"
    );

    Ok(ModelArchive {
        bytes,
        file_name: util::stamped_file_name(&request.database, "Models", "zip", &now),
        file_count: request.tables.len(),
    })
}
