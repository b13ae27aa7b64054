//! Connection profiles loaded from a TOML file

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use secrecy::SecretString;
use serde::Deserialize;

use crate::connection::{AuthMode, ConnectionParams};
use crate::error::{Error, Result};

/// Parsed config file
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// One named connection profile
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Profile {
    pub server: Option<String>,
    pub auth: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Name of an environment variable holding the password
    pub password_env: Option<String>,
    pub trust_server_certificate: Option<bool>,
    /// Default namespace for generated model classes
    pub namespace: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// Where the config file came from
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    /// Named with --config or SQLDD_CONFIG rather than the platform default
    pub explicit: bool,
}

/// Resolve the config path: explicit path (flag or env) > platform config dir
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<ConfigSource> {
    if let Some(path) = explicit {
        return Some(ConfigSource {
            path: path.to_path_buf(),
            explicit: true,
        });
    }
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME")).map(|dirs| ConfigSource {
        path: dirs.config_dir().join("config.toml"),
        explicit: false,
    })
}

/// Load the config file. A missing default file is an empty config; a missing
/// explicit file is an error.
pub fn load_config(source: Option<&ConfigSource>) -> Result<ConfigFile> {
    let Some(source) = source else {
        return Ok(ConfigFile::default());
    };

    if !source.path.exists() {
        if source.explicit {
            return Err(Error::ConfigNotFound {
                path: source.path.clone(),
            });
        }
        return Ok(ConfigFile::default());
    }

    let content = std::fs::read_to_string(&source.path).map_err(|e| Error::InvalidConfig {
        path: source.path.clone(),
        message: e.to_string(),
    })?;

    parse_config(&content).map_err(|message| Error::InvalidConfig {
        path: source.path.clone(),
        message,
    })
}

pub fn parse_config(content: &str) -> std::result::Result<ConfigFile, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

impl ConfigFile {
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles.get(name).ok_or_else(|| Error::UnknownProfile {
            name: name.to_string(),
        })
    }
}

/// Connection values supplied on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct ConnectionOverrides {
    pub server: Option<String>,
    pub auth: Option<AuthMode>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub trust_server_certificate: Option<bool>,
}

/// Merge overrides over a profile: override > profile > default.
///
/// A username without an explicit auth mode implies a SQL login.
pub fn resolve_connection(
    overrides: &ConnectionOverrides,
    profile: &Profile,
) -> Result<ConnectionParams> {
    let server = overrides
        .server
        .clone()
        .or_else(|| profile.server.clone())
        .ok_or_else(|| Error::Config {
            message: "no server specified, use --server or a profile".to_string(),
        })?;

    let profile_auth = profile
        .auth
        .as_deref()
        .map(str::parse::<AuthMode>)
        .transpose()
        .map_err(|message| Error::Config { message })?;

    let username = overrides
        .username
        .clone()
        .or_else(|| profile.username.clone());

    let auth = overrides
        .auth
        .or(profile_auth)
        .unwrap_or(if username.is_some() {
            AuthMode::CredentialBased
        } else {
            AuthMode::Integrated
        });

    let password = resolve_secret(
        overrides.password.as_deref(),
        profile.password_env.as_deref(),
        profile.password.as_deref(),
    );

    let trust_server_certificate = overrides
        .trust_server_certificate
        .or(profile.trust_server_certificate)
        .unwrap_or(true);

    Ok(ConnectionParams {
        server,
        database: None,
        auth,
        username,
        password,
        trust_server_certificate,
    })
}

/// Password from a direct value (even an empty one), then env indirection, then
/// the profile itself
fn resolve_secret(
    direct: Option<&str>,
    env_key: Option<&str>,
    stored: Option<&str>,
) -> Option<SecretString> {
    if let Some(value) = direct {
        return Some(SecretString::from(value.to_string()));
    }
    if let Some(value) = env_key
        .and_then(|key| std::env::var(key).ok())
        .filter(|v| !v.is_empty())
    {
        return Some(SecretString::from(value));
    }
    stored
        .filter(|v| !v.is_empty())
        .map(|v| SecretString::from(v.to_string()))
}
