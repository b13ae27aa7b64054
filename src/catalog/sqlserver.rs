//! Catalog reader over the TDS driver

use tiberius::error::Error as DriverError;
use tiberius::{Client, Row, SqlBrowser, ToSql};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use super::{encode_length, listable_databases, queries, CatalogReader, DatabaseEntry};
use crate::connection::ConnectionDescriptor;
use crate::error::{Error, Result};
use crate::metadata::{ColumnDescriptor, TableIdentity};

type SqlClient = Client<Compat<TcpStream>>;

/// Reads catalogs from a live SQL Server instance
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerCatalog;

impl SqlServerCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl CatalogReader for SqlServerCatalog {
    async fn probe(&self, connection: &ConnectionDescriptor) -> Result<()> {
        let client = connect(connection).await?;
        client
            .close()
            .await
            .map_err(|e| connection.connection_error(driver_message(&e)))
    }

    async fn list_databases(&self, connection: &ConnectionDescriptor) -> Result<Vec<String>> {
        let mut client = connect(connection).await?;
        let rows = query_rows(&mut client, queries::DATABASES, &[]).await?;

        let entries = rows
            .iter()
            .map(|row| {
                Ok(DatabaseEntry {
                    name: get_string(row, 0)?,
                    state: get_string(row, 1)?,
                    can_connect: get_int(row, 2)? == 1,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(rows = entries.len(), "read sys.databases");
        Ok(listable_databases(entries))
    }

    async fn list_tables(
        &self,
        connection: &ConnectionDescriptor,
        database: &str,
    ) -> Result<Vec<TableIdentity>> {
        let scoped = connection.for_database(database);
        let mut client = connect(&scoped).await?;
        let rows = query_rows(&mut client, queries::TABLES, &[]).await?;

        let tables = rows
            .iter()
            .map(|row| Ok(TableIdentity::new(get_string(row, 0)?, get_string(row, 1)?)))
            .collect::<Result<Vec<_>>>()?;

        debug!(database, tables = tables.len(), "listed tables");
        Ok(tables)
    }

    async fn list_columns(
        &self,
        connection: &ConnectionDescriptor,
        database: &str,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnDescriptor>> {
        let full_name = format!("{}.{}", schema, table);
        let scoped = connection.for_database(database);
        let mut client = connect(&scoped).await?;
        let rows = query_rows(&mut client, queries::COLUMNS, &[&full_name]).await?;

        // Every table has at least one column; no rows means OBJECT_ID did not resolve.
        if rows.is_empty() {
            return Err(Error::TableNotFound { full_name });
        }

        let columns = rows
            .iter()
            .map(read_column)
            .collect::<Result<Vec<_>>>()?;

        debug!(database, table = %full_name, columns = columns.len(), "listed columns");
        Ok(columns)
    }
}

async fn connect(connection: &ConnectionDescriptor) -> Result<SqlClient> {
    let config = connection.to_driver_config()?;
    debug!(
        connection = %connection.connection_string(false),
        "opening connection"
    );

    let tcp = TcpStream::connect_named(&config)
        .await
        .map_err(|e| connection.connection_error(driver_message(&e)))?;
    tcp.set_nodelay(true)
        .map_err(|e| connection.connection_error(e.to_string()))?;

    Client::connect(config, tcp.compat_write())
        .await
        .map_err(|e| connection.connection_error(driver_message(&e)))
}

async fn query_rows(
    client: &mut SqlClient,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<Row>> {
    let stream = client.query(sql, params).await.map_err(catalog_error)?;
    stream.into_first_result().await.map_err(catalog_error)
}

fn read_column(row: &Row) -> Result<ColumnDescriptor> {
    let declared_type = get_string(row, 1)?;
    let max_length = row.try_get::<i16, _>(2).map_err(catalog_error)?.unwrap_or(0);
    let precision = row.try_get::<u8, _>(3).map_err(catalog_error)?.unwrap_or(0);
    let scale = row.try_get::<u8, _>(4).map_err(catalog_error)?.unwrap_or(0);

    Ok(ColumnDescriptor {
        name: get_string(row, 0)?,
        length_or_precision: encode_length(&declared_type, max_length, precision, scale),
        declared_type,
        nullable: get_bool(row, 5)?,
        is_primary_key: get_bool(row, 6)?,
        is_identity: get_bool(row, 7)?,
        default_expression: get_string(row, 8)?,
        description: get_string(row, 9)?,
    })
}

fn get_string(row: &Row, idx: usize) -> Result<String> {
    row.try_get::<&str, _>(idx)
        .map(|value| value.unwrap_or_default().to_string())
        .map_err(catalog_error)
}

fn get_bool(row: &Row, idx: usize) -> Result<bool> {
    row.try_get::<bool, _>(idx)
        .map(|value| value.unwrap_or(false))
        .map_err(catalog_error)
}

fn get_int(row: &Row, idx: usize) -> Result<i32> {
    row.try_get::<i32, _>(idx)
        .map(|value| value.unwrap_or(0))
        .map_err(catalog_error)
}

fn catalog_error(err: DriverError) -> Error {
    Error::Catalog {
        message: driver_message(&err),
    }
}

/// The server's own message for server-side errors, the driver's description otherwise
fn driver_message(err: &DriverError) -> String {
    match err {
        DriverError::Server(token) => token.message().to_string(),
        other => other.to_string(),
    }
}
