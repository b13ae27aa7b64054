//! Request boundary: every call takes its connection explicitly and answers
//! with a success flag and a human-readable message

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::warn;

use crate::catalog::{self, CatalogReader};
use crate::connection::ConnectionDescriptor;
use crate::error::{Error, ErrorKind};
use crate::metadata::{ColumnDescriptor, TableIdentity};
use crate::{DataDictionary, DictionaryRequest, ModelArchive, ModelRequest};

/// Outcome of one request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Response<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_kind: None,
            data: Some(data),
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_kind: Some(kind),
            data: None,
        }
    }

    pub fn from_error(err: &Error) -> Self {
        warn!(kind = ?err.kind(), error = %err, "request failed");
        Self::failure(err.kind(), err.to_string())
    }

    /// Swap the payload for its transport form, keeping flag and message
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            success: self.success,
            message: self.message,
            error_kind: self.error_kind,
            data: self.data.map(f),
        }
    }
}

/// Rendered dictionary as handed to a caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryPayload {
    pub markdown: String,
    pub database_name: String,
    pub file_name: String,
}

impl DictionaryPayload {
    pub fn new(dictionary: DataDictionary, database_name: &str) -> Self {
        Self {
            markdown: dictionary.markdown,
            database_name: database_name.to_string(),
            file_name: dictionary.file_name,
        }
    }
}

/// Model archive as handed to a caller, base64 encoded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivePayload {
    pub zip_data: String,
    pub file_name: String,
    pub file_count: usize,
}

impl From<&ModelArchive> for ArchivePayload {
    fn from(archive: &ModelArchive) -> Self {
        Self {
            zip_data: archive.to_base64(),
            file_name: archive.file_name.clone(),
            file_count: archive.file_count,
        }
    }
}

/// Stateless front for a catalog reader
#[derive(Debug, Clone, Default)]
pub struct Service<R> {
    reader: R,
}

impl<R: CatalogReader> Service<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Probe the server, then list its databases
    pub async fn connect(&self, connection: &ConnectionDescriptor) -> Response<Vec<String>> {
        if !catalog::test_connection(&self.reader, connection).await {
            return Response::failure(
                ErrorKind::Connectivity,
                "Connection failed. Please check your credentials.",
            );
        }

        match self.reader.list_databases(connection).await {
            Ok(databases) => Response::success("Connected successfully.", databases),
            Err(e) => Response::from_error(&e),
        }
    }

    pub async fn databases(&self, connection: &ConnectionDescriptor) -> Response<Vec<String>> {
        match self.reader.list_databases(connection).await {
            Ok(databases) => {
                Response::success(format!("Loaded {} databases", databases.len()), databases)
            }
            Err(e) => Response::from_error(&e),
        }
    }

    pub async fn tables(
        &self,
        connection: &ConnectionDescriptor,
        database: &str,
    ) -> Response<Vec<TableIdentity>> {
        match self.reader.list_tables(connection, database).await {
            Ok(tables) => Response::success(format!("Loaded {} tables", tables.len()), tables),
            Err(e) => Response::from_error(&e),
        }
    }

    /// Columns of one table; `full_name` without a schema resolves to `dbo`
    pub async fn columns(
        &self,
        connection: &ConnectionDescriptor,
        database: &str,
        full_name: &str,
    ) -> Response<Vec<ColumnDescriptor>> {
        let table = TableIdentity::parse(full_name);
        match self
            .reader
            .list_columns(connection, database, &table.schema_name, &table.table_name)
            .await
        {
            Ok(columns) => Response::success(
                format!("Loaded {} columns of {}", columns.len(), table.full_name()),
                columns,
            ),
            Err(e) => Response::from_error(&e),
        }
    }

    pub async fn data_dictionary(
        &self,
        connection: &ConnectionDescriptor,
        request: &DictionaryRequest,
        now: DateTime<Local>,
    ) -> Response<DataDictionary> {
        match crate::generate_data_dictionary(&self.reader, connection, request, now).await {
            Ok(dictionary) => Response::success(
                format!(
                    "Successfully generated DD for {} tables!",
                    dictionary.table_count
                ),
                dictionary,
            ),
            Err(e) => Response::from_error(&e),
        }
    }

    pub async fn models(
        &self,
        connection: &ConnectionDescriptor,
        request: &ModelRequest,
        now: DateTime<Local>,
    ) -> Response<ModelArchive> {
        match crate::generate_model_archive(&self.reader, connection, request, now).await {
            Ok(archive) => Response::success(
                format!(
                    "Successfully generated {} model class files",
                    archive.file_count
                ),
                archive,
            ),
            Err(e) => Response::from_error(&e),
        }
    }
}
