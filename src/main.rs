use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use sqldd::catalog::SqlServerCatalog;
use sqldd::config::{self, ConnectionOverrides, Profile};
use sqldd::service::{ArchivePayload, DictionaryPayload, Response, Service};
use sqldd::{util, AuthMode, ConnectionDescriptor, DictionaryRequest, ModelRequest};

const DEFAULT_NAMESPACE: &str = "Models";

#[derive(Parser)]
#[command(name = "sqldd")]
#[command(
    author,
    version,
    about = "Markdown data dictionaries and C# model classes from SQL Server catalogs"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Path to config file
    #[arg(short = 'c', long, global = true, env = "SQLDD_CONFIG")]
    config: Option<PathBuf>,

    /// Connection profile from the config file
    #[arg(short = 'P', long, global = true, env = "SQLDD_PROFILE")]
    profile: Option<String>,

    /// SQL Server address (host, host,port or host\instance)
    #[arg(short = 's', long, global = true, env = "SQLDD_SERVER")]
    server: Option<String>,

    /// Authentication mode: integrated or sql
    #[arg(short = 'a', long, global = true, env = "SQLDD_AUTH")]
    auth: Option<AuthMode>,

    /// SQL login name
    #[arg(short = 'u', long, global = true, env = "SQLDD_USERNAME")]
    username: Option<String>,

    /// SQL login password
    #[arg(
        short = 'p',
        long,
        global = true,
        env = "SQLDD_PASSWORD",
        hide_env_values = true
    )]
    password: Option<String>,

    /// Validate the server certificate instead of trusting it
    #[arg(long, global = true)]
    no_trust_server_certificate: bool,

    /// Print the full response as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Show passwords in diagnostics
    #[arg(long, global = true)]
    show_secrets: bool,

    /// Enable verbose output
    #[arg(short, long, global = true, env = "SQLDD_VERBOSE")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Test the connection and list databases
    Connect,

    /// List databases the login can connect to
    Databases,

    /// List user tables of a database
    Tables {
        /// Database name
        database: String,
    },

    /// Show the columns of one table
    Columns {
        /// Database name
        database: String,

        /// Table as schema.table (schema defaults to dbo)
        table: String,
    },

    /// Generate a Markdown data dictionary
    Dictionary {
        /// Database name
        database: String,

        /// Tables as schema.table
        #[arg(required_unless_present = "all")]
        tables: Vec<String>,

        /// Document every user table
        #[arg(long, conflicts_with = "tables")]
        all: bool,

        /// Directory for the .md file (defaults to the profile's, then the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the document instead of writing a file
        #[arg(long, conflicts_with = "output_dir")]
        stdout: bool,
    },

    /// Generate C# model classes packed into a ZIP archive
    Models {
        /// Database name
        database: String,

        /// Tables as schema.table (schema defaults to dbo)
        #[arg(required = true)]
        tables: Vec<String>,

        /// Namespace of the generated classes
        #[arg(short, long)]
        namespace: Option<String>,

        /// Directory for the .zip file (defaults to the profile's, then the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the archive base64-encoded instead of writing a file
        #[arg(long, conflicts_with = "output_dir")]
        base64: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (optional, ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let profile = load_profile(&cli.global)?;
    let connection = build_connection(&cli.global, &profile)?;
    let service = Service::new(SqlServerCatalog::new());
    let json = cli.global.json;

    let success = match cli.command {
        Commands::Connect => {
            let response = service.connect(&connection).await;
            report(&response, json, |names| print_lines(names))?
        }
        Commands::Databases => {
            let response = service.databases(&connection).await;
            report(&response, json, |names| print_lines(names))?
        }
        Commands::Tables { database } => {
            let response = service.tables(&connection, &database).await;
            report(&response, json, |tables| {
                for table in tables {
                    println!("{}", table.full_name());
                }
            })?
        }
        Commands::Columns { database, table } => {
            let response = service.columns(&connection, &database, &table).await;
            report(&response, json, |columns| {
                for column in columns {
                    println!(
                        "{}\t{}\t{}",
                        column.name,
                        column.display_type(),
                        if column.nullable { "NULL" } else { "NOT NULL" }
                    );
                }
            })?
        }
        Commands::Dictionary {
            database,
            tables,
            all,
            output_dir,
            stdout,
        } => {
            let tables = if all {
                let listed = service.tables(&connection, &database).await;
                if !listed.success {
                    return exit_with(report(&listed, json, |_| {})?);
                }
                listed
                    .data
                    .unwrap_or_default()
                    .iter()
                    .map(|t| t.full_name())
                    .collect()
            } else {
                tables
            };

            let request = DictionaryRequest {
                database: database.clone(),
                tables,
            };
            let response = service
                .data_dictionary(&connection, &request, Local::now())
                .await
                .map(|dictionary| DictionaryPayload::new(dictionary, &database));

            if json || stdout {
                report(&response, json, |payload| print!("{}", payload.markdown))?
            } else {
                let dir = output_dir_for(output_dir, &profile);
                if let Some(payload) = &response.data {
                    let path =
                        util::write_output(&dir, &payload.file_name, payload.markdown.as_bytes())?;
                    println!("{}", path.display());
                }
                report(&response, false, |_| {})?
            }
        }
        Commands::Models {
            database,
            tables,
            namespace,
            output_dir,
            base64,
        } => {
            let namespace = namespace
                .or_else(|| profile.namespace.clone())
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
            let request = ModelRequest {
                database,
                tables,
                namespace,
            };
            let response = service.models(&connection, &request, Local::now()).await;

            if json || base64 {
                let response = response.map(|archive| ArchivePayload::from(&archive));
                report(&response, json, |payload| println!("{}", payload.zip_data))?
            } else {
                let dir = output_dir_for(output_dir, &profile);
                if let Some(archive) = &response.data {
                    let path = util::write_output(&dir, &archive.file_name, &archive.bytes)?;
                    println!("{}", path.display());
                }
                let response = response.map(|archive| ArchivePayload::from(&archive));
                report(&response, false, |_| {})?
            }
        }
    };

    exit_with(success)
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "sqldd=debug" } else { "sqldd=warn" };
    let filter = EnvFilter::try_from_env("SQLDD_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_profile(args: &GlobalArgs) -> Result<Profile> {
    let source = config::resolve_config_path(args.config.as_deref());
    let config_file = config::load_config(source.as_ref())?;

    match &args.profile {
        Some(name) => Ok(config_file.profile(name)?.clone()),
        None => Ok(Profile::default()),
    }
}

fn build_connection(args: &GlobalArgs, profile: &Profile) -> Result<ConnectionDescriptor> {
    let overrides = ConnectionOverrides {
        server: args.server.clone(),
        auth: args.auth,
        username: args.username.clone(),
        password: args.password.clone(),
        trust_server_certificate: args.no_trust_server_certificate.then_some(false),
    };

    let connection = config::resolve_connection(&overrides, profile)?.build();
    tracing::info!(
        connection = %connection.connection_string(args.show_secrets),
        "resolved connection"
    );
    Ok(connection)
}

fn output_dir_for(explicit: Option<PathBuf>, profile: &Profile) -> PathBuf {
    explicit
        .or_else(|| profile.output_dir.clone())
        .unwrap_or_else(|| Path::new(".").to_path_buf())
}

/// Print a response: JSON when asked, otherwise the payload on stdout and the
/// message on stderr. Returns whether the request succeeded.
fn report<T: Serialize>(
    response: &Response<T>,
    json: bool,
    render: impl FnOnce(&T),
) -> Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else if response.success {
        if let Some(data) = &response.data {
            render(data);
        }
        eprintln!("{}", response.message);
    } else {
        eprintln!("error: {}", response.message);
    }
    Ok(response.success)
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn exit_with(success: bool) -> Result<()> {
    if !success {
        process::exit(1);
    }
    Ok(())
}
