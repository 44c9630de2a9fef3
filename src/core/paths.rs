// src/core/paths.rs

//! Path expansion and display helpers.

use crate::constants::APP_NAME;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A path that could not be worked out.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform reports no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// `~` or a variable in the path could not be expanded.
    #[error("Could not expand path '{template}': {source}")]
    Expansion {
        /// The path as given.
        template: String,
        /// The variable lookup that failed.
        #[source]
        source: shellexpand::LookupError<std::env::VarError>,
    },
}

/// Returns the default repository root (`~/.config/shellphase`).
/// Nothing is created on disk.
pub fn default_repository_root() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .ok_or(PathError::ConfigDirNotFound)
}

/// Expands `~` and `$VAR`/`${VAR}` in a user-supplied path.
pub fn expand_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|source| PathError::Expansion {
        template: template.to_string(),
        source,
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Renders `path` relative to `root` when it lives under it, for log lines.
pub fn display_relative(path: &Path, root: &Path) -> String {
    let path = dunce::simplified(path);
    let root = dunce::simplified(root);
    match path.strip_prefix(root) {
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}
