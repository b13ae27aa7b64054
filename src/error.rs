//! Error types for sqldd

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Broad failure category, used by the service boundary and the CLI exit path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Server unreachable, login rejected, certificate not trusted
    Connectivity,
    /// Permission or catalog-resolution failure while querying
    Catalog,
    /// Request rejected before any catalog I/O
    Validation,
    /// Archive could not be written
    Archive,
    /// Local file system failure
    Io,
    /// Configuration file or profile problem
    Config,
}

/// Errors that can occur while reading catalogs and generating documents
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot connect to {server}: {message}")]
    Connection { server: String, message: String },

    #[error("{message}")]
    Catalog { message: String },

    #[error("Table not found or not accessible: {full_name}")]
    TableNotFound { full_name: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("ZIP creation error: {message}")]
    ZipError { message: String },

    #[error("Failed to write {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config file {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Profile '{name}' not found in config file")]
    UnknownProfile { name: String },

    #[error("{message}")]
    Config { message: String },
}

impl Error {
    /// Classify the error for reporting
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection { .. } => ErrorKind::Connectivity,
            Error::Catalog { .. } | Error::TableNotFound { .. } => ErrorKind::Catalog,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::ZipError { .. } => ErrorKind::Archive,
            Error::WriteError { .. } => ErrorKind::Io,
            Error::ConfigNotFound { .. }
            | Error::InvalidConfig { .. }
            | Error::UnknownProfile { .. }
            | Error::Config { .. } => ErrorKind::Config,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipError {
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
