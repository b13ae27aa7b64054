//! End-to-end tests for catalog reading against SQL Server
//!
//! A throwaway database is created with a small fixture schema, read back
//! through the catalog reader and the generation pipeline, then dropped.
//!
//! Environment variables (with defaults):
//! - SQL_SERVER_HOST (default: localhost)
//! - SQL_SERVER_PORT (default: 1433)
//! - SQL_SERVER_USER (default: sa)
//! - SQL_SERVER_PASSWORD (default: Password1)
//!
//! Run with: cargo test --test e2e_tests -- --ignored --test-threads=1

use std::sync::LazyLock;

use chrono::Local;
use secrecy::SecretString;
use tiberius::{AuthMethod, Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use sqldd::catalog::{test_connection, CatalogReader, SqlServerCatalog};
use sqldd::{
    generate_data_dictionary, generate_model_archive, ConnectionDescriptor, ConnectionParams,
    DictionaryRequest, ErrorKind, ModelRequest,
};

use crate::common::read_zip;

static SQL_CONFIG: LazyLock<SqlServerConfig> = LazyLock::new(|| {
    let _ = dotenvy::dotenv();
    SqlServerConfig {
        host: std::env::var("SQL_SERVER_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: std::env::var("SQL_SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(1433),
        user: std::env::var("SQL_SERVER_USER").unwrap_or_else(|_| "sa".to_string()),
        password: std::env::var("SQL_SERVER_PASSWORD").unwrap_or_else(|_| "Password1".to_string()),
    }
});

struct SqlServerConfig {
    host: String,
    port: u16,
    user: String,
    password: String,
}

const TEST_DATABASE: &str = "SqlddE2E_Test";

type SqlClient = Client<Compat<TcpStream>>;

/// Admin connection used for fixture setup
async fn admin_connect(database: Option<&str>) -> Result<SqlClient, Box<dyn std::error::Error>> {
    let mut config = Config::new();
    config.host(&SQL_CONFIG.host);
    config.port(SQL_CONFIG.port);
    config.authentication(AuthMethod::sql_server(&SQL_CONFIG.user, &SQL_CONFIG.password));
    config.trust_cert();
    if let Some(db) = database {
        config.database(db);
    }

    let tcp = TcpStream::connect(config.get_addr()).await?;
    tcp.set_nodelay(true)?;
    Ok(Client::connect(config, tcp.compat_write()).await?)
}

fn descriptor() -> ConnectionDescriptor {
    ConnectionParams::new(format!("{},{}", SQL_CONFIG.host, SQL_CONFIG.port))
        .sql_login(
            SQL_CONFIG.user.clone(),
            SecretString::from(SQL_CONFIG.password.clone()),
        )
        .build()
}

async fn drop_database_if_exists(client: &mut SqlClient) -> Result<(), Box<dyn std::error::Error>> {
    let query = format!(
        "IF EXISTS (SELECT 1 FROM sys.databases WHERE name = '{0}') \
         BEGIN \
             ALTER DATABASE [{0}] SET SINGLE_USER WITH ROLLBACK IMMEDIATE; \
             DROP DATABASE [{0}]; \
         END",
        TEST_DATABASE
    );
    client.execute(&query, &[]).await?;
    Ok(())
}

/// Create the fixture database: dbo.Users and sales.Orders
async fn create_fixture() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = admin_connect(None).await?;
    drop_database_if_exists(&mut client).await?;
    client
        .execute(&format!("CREATE DATABASE [{}]", TEST_DATABASE), &[])
        .await?;
    drop(client);

    let mut client = admin_connect(Some(TEST_DATABASE)).await?;
    client.execute("CREATE SCHEMA sales", &[]).await?;

    let statements = [
        "CREATE TABLE dbo.Users (
            Id INT IDENTITY(1,1) NOT NULL PRIMARY KEY,
            Name NVARCHAR(50) NULL
        )",
        "CREATE TABLE sales.Orders (
            OrderId BIGINT NOT NULL PRIMARY KEY,
            Total DECIMAL(10,2) NULL,
            Notes NVARCHAR(MAX) NULL,
            PlacedAt DATETIME2 NOT NULL DEFAULT (getdate())
        )",
        "EXEC sp_addextendedproperty
            @name = N'MS_Description', @value = N'Surrogate key',
            @level0type = N'SCHEMA', @level0name = N'dbo',
            @level1type = N'TABLE', @level1name = N'Users',
            @level2type = N'COLUMN', @level2name = N'Id'",
    ];
    for statement in statements {
        client.execute(statement, &[]).await?;
    }
    Ok(())
}

async fn cleanup() {
    if let Ok(mut client) = admin_connect(None).await {
        let _ = drop_database_if_exists(&mut client).await;
    }
}

#[tokio::test]
#[ignore = "Requires SQL Server (configure via .env or environment variables)"]
async fn test_e2e_probe_and_list_databases() {
    create_fixture().await.expect("Should create fixture");
    let catalog = SqlServerCatalog::new();
    let connection = descriptor();

    assert!(test_connection(&catalog, &connection).await);

    let databases = catalog
        .list_databases(&connection)
        .await
        .expect("Should list databases");
    assert!(databases.iter().any(|d| d == TEST_DATABASE));
    for reserved in ["master", "tempdb", "model", "msdb"] {
        assert!(
            !databases.iter().any(|d| d.eq_ignore_ascii_case(reserved)),
            "{} should be excluded",
            reserved
        );
    }

    cleanup().await;
}

#[tokio::test]
#[ignore = "Requires SQL Server (configure via .env or environment variables)"]
async fn test_e2e_bad_password_fails_probe() {
    let catalog = SqlServerCatalog::new();
    let connection = ConnectionParams::new(format!("{},{}", SQL_CONFIG.host, SQL_CONFIG.port))
        .sql_login(
            SQL_CONFIG.user.clone(),
            SecretString::from("definitely-wrong".to_string()),
        )
        .build();

    assert!(!test_connection(&catalog, &connection).await);
    let err = catalog.list_databases(&connection).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connectivity);
}

#[tokio::test]
#[ignore = "Requires SQL Server (configure via .env or environment variables)"]
async fn test_e2e_columns_and_lengths() {
    create_fixture().await.expect("Should create fixture");
    let catalog = SqlServerCatalog::new();
    let connection = descriptor();

    let tables = catalog
        .list_tables(&connection, TEST_DATABASE)
        .await
        .expect("Should list tables");
    let names: Vec<String> = tables.iter().map(|t| t.full_name()).collect();
    assert_eq!(names, vec!["dbo.Users", "sales.Orders"]);

    let users = catalog
        .list_columns(&connection, TEST_DATABASE, "dbo", "Users")
        .await
        .expect("Should list columns");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Id");
    assert!(users[0].is_primary_key);
    assert!(users[0].is_identity);
    assert!(!users[0].nullable);
    assert_eq!(users[0].description, "Surrogate key");
    assert_eq!(users[1].declared_type, "nvarchar");
    assert_eq!(users[1].length_or_precision, "50");

    let orders = catalog
        .list_columns(&connection, TEST_DATABASE, "sales", "Orders")
        .await
        .expect("Should list columns");
    let lengths: Vec<&str> = orders
        .iter()
        .map(|c| c.length_or_precision.as_str())
        .collect();
    assert_eq!(lengths, vec!["", "10,2", "MAX", ""]);
    assert!(orders[3].default_expression.contains("getdate"));

    let err = catalog
        .list_columns(&connection, TEST_DATABASE, "dbo", "Ghost")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Catalog);

    cleanup().await;
}

#[tokio::test]
#[ignore = "Requires SQL Server (configure via .env or environment variables)"]
async fn test_e2e_generate_dictionary_and_models() {
    create_fixture().await.expect("Should create fixture");
    let catalog = SqlServerCatalog::new();
    let connection = descriptor();

    let dictionary = generate_data_dictionary(
        &catalog,
        &connection,
        &DictionaryRequest {
            database: TEST_DATABASE.to_string(),
            tables: vec!["dbo.Users".to_string()],
        },
        Local::now(),
    )
    .await
    .expect("Should generate dictionary");
    assert_eq!(dictionary.table_count, 1);
    assert!(dictionary
        .markdown
        .contains("| Id | int |  | NO | YES | YES |  | Surrogate key |"));

    let archive = generate_model_archive(
        &catalog,
        &connection,
        &ModelRequest {
            database: TEST_DATABASE.to_string(),
            tables: vec!["dbo.Users".to_string()],
            namespace: "E2E".to_string(),
        },
        Local::now(),
    )
    .await
    .expect("Should generate models");

    let entries = read_zip(&archive.bytes);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "Users.cs");
    assert!(entries[0].1.contains("public class Users"));
    assert!(entries[0].1.contains("public int Id { get; set; }"));
    assert!(entries[0].1.contains("public string Name { get; set; }"));

    cleanup().await;
}
