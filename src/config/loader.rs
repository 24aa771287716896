// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::Result;

/// Serialization format of a job file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Yaml,
}

impl FileFormat {
    /// `.yaml` / `.yml` are YAML, anything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            _ => FileFormat::Toml,
        }
    }
}

/// Parse job file contents in the given format without validating them.
pub fn parse_str(contents: &str, format: FileFormat) -> Result<RawJobFile> {
    let raw: RawJobFile = match format {
        FileFormat::Toml => toml::from_str(contents)?,
        FileFormat::Yaml => serde_yaml::from_str(contents)?,
    };
    Ok(raw)
}

/// Load a job file from a given path and return the raw `RawJobFile`.
///
/// This only performs deserialization; use [`load_and_validate`] for the
/// checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJobFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_str(&contents, FileFormat::from_path(path))
}

/// Load a job file from path and validate it.
///
/// This is the recommended entry point for the rest of the application.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<JobFile> {
    let raw = load_from_path(&path)?;
    let file = JobFile::try_from(raw)?;
    Ok(file)
}
