//! Connection descriptors built from user-supplied server and login parameters

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use tiberius::{AuthMethod, Config, EncryptionLevel};

use crate::error::{Error, Result};

/// Catalog used when the caller has not picked a database yet
pub const DEFAULT_DATABASE: &str = "master";

const REDACTED: &str = "[REDACTED]";

/// How the login is authenticated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Windows integrated security; username and password are ignored
    #[default]
    Integrated,
    /// SQL Server login with username and password
    CredentialBased,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "integrated" | "windows" => Ok(AuthMode::Integrated),
            "credentialbased" | "credential-based" | "sql" => Ok(AuthMode::CredentialBased),
            other => Err(format!(
                "unknown auth mode '{}' (expected 'integrated' or 'sql')",
                other
            )),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Integrated => f.write_str("Integrated"),
            AuthMode::CredentialBased => f.write_str("CredentialBased"),
        }
    }
}

/// Raw connection parameters as supplied by the caller
#[derive(Debug)]
pub struct ConnectionParams {
    pub server: String,
    /// Target database, `master` when absent
    pub database: Option<String>,
    pub auth: AuthMode,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub trust_server_certificate: bool,
}

impl ConnectionParams {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            database: None,
            auth: AuthMode::Integrated,
            username: None,
            password: None,
            trust_server_certificate: true,
        }
    }

    pub fn sql_login(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.auth = AuthMode::CredentialBased;
        self.username = Some(username.into());
        self.password = Some(password);
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Build the descriptor. No validation happens here; the driver rejects
    /// malformed values when the connection is opened.
    pub fn build(self) -> ConnectionDescriptor {
        let credentials = match self.auth {
            AuthMode::Integrated => Credentials::Integrated,
            AuthMode::CredentialBased => Credentials::SqlLogin {
                username: self.username.unwrap_or_default(),
                password: self
                    .password
                    .unwrap_or_else(|| SecretString::from(String::new())),
            },
        };

        ConnectionDescriptor {
            server: self.server,
            database: self
                .database
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            credentials,
            trust_server_certificate: self.trust_server_certificate,
        }
    }
}

#[derive(Debug)]
enum Credentials {
    Integrated,
    SqlLogin {
        username: String,
        password: SecretString,
    },
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        match self {
            Credentials::Integrated => Credentials::Integrated,
            Credentials::SqlLogin { username, password } => Credentials::SqlLogin {
                username: username.clone(),
                password: SecretString::from(password.expose_secret().to_string()),
            },
        }
    }
}

/// Immutable, driver-ready description of one server login
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    server: String,
    database: String,
    credentials: Credentials,
    trust_server_certificate: bool,
}

impl ConnectionDescriptor {
    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn auth_mode(&self) -> AuthMode {
        match self.credentials {
            Credentials::Integrated => AuthMode::Integrated,
            Credentials::SqlLogin { .. } => AuthMode::CredentialBased,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match &self.credentials {
            Credentials::Integrated => None,
            Credentials::SqlLogin { username, .. } => Some(username),
        }
    }

    pub fn trust_server_certificate(&self) -> bool {
        self.trust_server_certificate
    }

    /// Same login, scoped to another database
    pub fn for_database(&self, database: &str) -> ConnectionDescriptor {
        ConnectionDescriptor {
            database: database.to_string(),
            ..self.clone()
        }
    }

    /// ADO-style connection string for diagnostics. The password is masked
    /// unless `show_secrets` is set.
    pub fn connection_string(&self, show_secrets: bool) -> String {
        let mut parts = vec![
            format!("Server={}", self.server),
            format!("Database={}", self.database),
        ];

        match &self.credentials {
            Credentials::Integrated => parts.push("Integrated Security=True".to_string()),
            Credentials::SqlLogin { username, password } => {
                parts.push(format!("User ID={}", username));
                let shown = if show_secrets {
                    password.expose_secret()
                } else {
                    REDACTED
                };
                parts.push(format!("Password={}", shown));
            }
        }

        let trust = if self.trust_server_certificate {
            "True"
        } else {
            "False"
        };
        parts.push(format!("TrustServerCertificate={}", trust));

        parts.join(";")
    }

    /// Translate into a driver configuration.
    ///
    /// The server address accepts `host`, `host,port`, `host\instance` and an
    /// optional `tcp:` prefix; parsing is left to the driver.
    pub fn to_driver_config(&self) -> Result<Config> {
        let mut config = Config::from_ado_string(&format!("Server={}", self.server))
            .map_err(|e| self.connection_error(e.to_string()))?;

        config.database(&self.database);
        config.application_name(env!("CARGO_PKG_NAME"));
        config.encryption(EncryptionLevel::Required);
        if self.trust_server_certificate {
            config.trust_cert();
        }

        match &self.credentials {
            Credentials::Integrated => self.apply_integrated(&mut config)?,
            Credentials::SqlLogin { username, password } => {
                config.authentication(AuthMethod::sql_server(
                    username,
                    password.expose_secret(),
                ));
            }
        }

        Ok(config)
    }

    #[cfg(all(any(windows, unix), feature = "integrated-auth"))]
    fn apply_integrated(&self, config: &mut Config) -> Result<()> {
        config.authentication(AuthMethod::Integrated);
        Ok(())
    }

    #[cfg(not(all(any(windows, unix), feature = "integrated-auth")))]
    fn apply_integrated(&self, _config: &mut Config) -> Result<()> {
        Err(self.connection_error(
            "integrated authentication requires a build with the `integrated-auth` feature"
                .to_string(),
        ))
    }

    pub(crate) fn connection_error(&self, message: String) -> Error {
        Error::Connection {
            server: self.server.clone(),
            message,
        }
    }
}
