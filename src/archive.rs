//! Package generated files into a ZIP archive

use std::io::{Cursor, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::warn;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{Error, Result};

/// Generated files keyed by archive entry name, in insertion order.
///
/// Names are not deduplicated: inserting an existing name replaces its content
/// and keeps the original position.
#[derive(Debug, Clone, Default)]
pub struct GeneratedFiles {
    entries: Vec<(String, String)>,
}

impl GeneratedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. Returns true when an earlier file with the same name was replaced.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) -> bool {
        let name = name.into();
        let content = content.into();

        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => {
                warn!(file = %name, "generated file name collides with an earlier table, keeping the later one");
                entry.1 = content;
                true
            }
            None => {
                self.entries.push((name, content));
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }
}

/// Build an in-memory ZIP with one deflated entry per file
pub fn create_archive(files: &GeneratedFiles) -> Result<Vec<u8>> {
    let buffer = Cursor::new(Vec::with_capacity(files.len() * 1024));
    let mut zip = ZipWriter::new(buffer);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in files.iter() {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())
            .map_err(|e| Error::ZipError {
                message: format!("failed to write {}: {}", name, e),
            })?;
    }

    let buffer = zip.finish()?;
    Ok(buffer.into_inner())
}

/// Base64 form of an archive for text-only transports
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
