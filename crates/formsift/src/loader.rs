//! Loading profile definitions from JSON and TOML files.

use std::fs;
use std::path::{Path, PathBuf};

use formsift_core::{DefinitionError, Profile, ProfileSpec};
use miette::Diagnostic;
use thiserror::Error;

/// Errors while loading a profile definition from disk.
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum LoadError {
    /// The definition file could not be read.
    #[error("cannot read profile definition {path}")]
    #[diagnostic(code(formsift::load_io))]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The definition is not valid JSON of the expected shape.
    #[error("invalid JSON profile definition: {source}")]
    #[diagnostic(code(formsift::load_json))]
    Json {
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The definition is not valid TOML of the expected shape.
    #[error("invalid TOML profile definition: {source}")]
    #[diagnostic(code(formsift::load_toml))]
    Toml {
        /// The underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The file extension names no supported format.
    #[error("unsupported profile definition format: {path} (expected .json or .toml)")]
    #[diagnostic(code(formsift::load_format))]
    UnknownFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// The definition parsed but does not build into a profile.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Definition(#[from] DefinitionError),
}

/// Parses a JSON profile definition and compiles it with the default
/// catalogs.
///
/// # Errors
///
/// Parse or build failures as [`LoadError`].
pub fn profile_from_json_str(json: &str) -> Result<Profile, LoadError> {
    let spec: ProfileSpec =
        serde_json::from_str(json).map_err(|source| LoadError::Json { source })?;
    Ok(crate::compile(spec)?)
}

/// Parses a TOML profile definition and compiles it with the default
/// catalogs.
///
/// # Errors
///
/// Parse or build failures as [`LoadError`].
pub fn profile_from_toml_str(toml_str: &str) -> Result<Profile, LoadError> {
    let spec: ProfileSpec = toml::from_str(toml_str).map_err(|source| LoadError::Toml { source })?;
    Ok(crate::compile(spec)?)
}

/// Loads and compiles a JSON definition file.
///
/// # Errors
///
/// Read, parse or build failures as [`LoadError`].
pub fn profile_from_json_file(path: impl AsRef<Path>) -> Result<Profile, LoadError> {
    profile_from_json_str(&read(path.as_ref())?)
}

/// Loads and compiles a TOML definition file.
///
/// # Errors
///
/// Read, parse or build failures as [`LoadError`].
pub fn profile_from_toml_file(path: impl AsRef<Path>) -> Result<Profile, LoadError> {
    profile_from_toml_str(&read(path.as_ref())?)
}

/// Loads a definition file, dispatching on its extension.
///
/// # Errors
///
/// [`LoadError::UnknownFormat`] for anything but `.json` and `.toml`,
/// otherwise as the format-specific loaders.
pub fn profile_from_file(path: impl AsRef<Path>) -> Result<Profile, LoadError> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => profile_from_json_file(path),
        Some("toml") => profile_from_toml_file(path),
        _ => Err(LoadError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    tracing::debug!(path = %path.display(), "loading profile definition");
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
