//! Read-only access to SQL Server system catalogs

mod queries;
mod rows;
mod sqlserver;

pub use rows::{encode_length, listable_databases, DatabaseEntry, SYSTEM_DATABASES};
pub use sqlserver::SqlServerCatalog;

use std::future::Future;

use crate::connection::ConnectionDescriptor;
use crate::error::Result;
use crate::metadata::{ColumnDescriptor, TableIdentity};

/// Catalog queries against one server.
///
/// Every call opens its own connection, runs a single query and closes the
/// connection again. Implementations hold no per-request state.
pub trait CatalogReader {
    /// Open and immediately close a connection
    fn probe(&self, connection: &ConnectionDescriptor) -> impl Future<Output = Result<()>> + Send;

    /// User databases the login can connect to and that are online, by name
    fn list_databases(
        &self,
        connection: &ConnectionDescriptor,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// User tables of `database`, ordered by schema then table name
    fn list_tables(
        &self,
        connection: &ConnectionDescriptor,
        database: &str,
    ) -> impl Future<Output = Result<Vec<TableIdentity>>> + Send;

    /// Columns of `schema.table` in ordinal order
    fn list_columns(
        &self,
        connection: &ConnectionDescriptor,
        database: &str,
        schema: &str,
        table: &str,
    ) -> impl Future<Output = Result<Vec<ColumnDescriptor>>> + Send;
}

/// Report whether a connection can be opened at all
pub async fn test_connection<R: CatalogReader>(
    reader: &R,
    connection: &ConnectionDescriptor,
) -> bool {
    match reader.probe(connection).await {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(server = connection.server(), error = %e, "connection probe failed");
            false
        }
    }
}
