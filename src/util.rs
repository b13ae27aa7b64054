//! Shared utility helpers.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::error::{Error, Result};

/// `{database}_{kind}_{yyyyMMdd_HHmmss}.{ext}`, the naming used for every download
pub fn stamped_file_name<Tz: TimeZone>(
    database: &str,
    kind: &str,
    extension: &str,
    at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}_{}.{}",
        database,
        kind,
        at.format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Write an artifact into `dir`, creating the directory when needed
pub fn write_output(dir: &Path, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| Error::WriteError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = dir.join(file_name);
    std::fs::write(&path, contents).map_err(|e| Error::WriteError {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}
