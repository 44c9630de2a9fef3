// src/core/settings.rs

//! Process-start configuration read from `SHELLPHASE_*` variables.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{
    constants::{
        DEFAULT_UNIT_PREFIX, ENV_BENCH, ENV_CONFIG_ROOT, ENV_DEPTH, ENV_DIALECT, ENV_PHASE,
        ENV_PREFIX, ENV_PROFILES, ENV_ROOT, ENV_VERBOSE, LIST_SEPARATOR, MAX_DEPTH,
    },
    core::paths::{self, PathError},
    models::{Phase, UnknownPhase},
    system::dialect::{Dialect, UnknownDialect},
};

/// Invalid process-start configuration.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A root directory could not be expanded.
    #[error(transparent)]
    Path(#[from] PathError),
    /// `SHELLPHASE_DIALECT` names no known dialect.
    #[error(transparent)]
    Dialect(#[from] UnknownDialect),
    /// `SHELLPHASE_PHASE` names no known phase.
    #[error(transparent)]
    Phase(#[from] UnknownPhase),
    /// `SHELLPHASE_DEPTH` is not an integer in `0..=MAX_DEPTH`.
    #[error("SHELLPHASE_DEPTH must be an integer from 0 to {max}, got '{value}'.")]
    InvalidDepth {
        /// The value as found in the environment.
        value: String,
        /// Deepest nesting accepted.
        max: usize,
    },
    /// The unit prefix holds a path separator.
    #[error("The unit prefix must not contain a path separator.")]
    InvalidPrefix,
}

/// Process-start configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of the configuration repository.
    pub repository_root: PathBuf,
    /// Directory holding one sub-directory per profile.
    pub config_root: PathBuf,
    /// Prefix marking phase files, `@` by default.
    pub unit_prefix: String,
    /// Fallback chain of profiles, most specific first.
    pub candidates: Vec<String>,
    /// Print each action as it runs.
    pub verbose: bool,
    /// Time each action.
    pub benchmark: bool,
    /// Dialect of the shell that started this process.
    pub dialect: Dialect,
    /// Nesting depth inherited from a parent shellphase process.
    pub depth: usize,
    /// Phase inherited from a parent shellphase process.
    pub phase: Option<Phase>,
}

impl Settings {
    /// Defaults for a configuration rooted at `config_root`.
    pub fn new(config_root: impl Into<PathBuf>, dialect: Dialect) -> Self {
        let config_root = config_root.into();
        Self {
            repository_root: config_root.clone(),
            config_root,
            unit_prefix: DEFAULT_UNIT_PREFIX.to_string(),
            candidates: default_candidates(dialect),
            verbose: false,
            benchmark: false,
            dialect,
            depth: 0,
            phase: None,
        }
    }

    /// Reads the `SHELLPHASE_*` variables from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let dialect = match non_empty(ENV_DIALECT) {
            Some(name) => Dialect::from_name(name.trim())?,
            None => non_empty("SHELL")
                .and_then(|shell| {
                    Path::new(&shell)
                        .file_name()
                        .and_then(|n| n.to_str())
                        .and_then(|n| Dialect::from_name(n).ok())
                })
                .unwrap_or(Dialect::Posix),
        };

        let repository_root = match non_empty(ENV_ROOT) {
            Some(root) => paths::expand_path(&root)?,
            None => paths::default_repository_root()?,
        };
        let mut settings = Self::new(repository_root.clone(), dialect);
        if let Some(config_root) = non_empty(ENV_CONFIG_ROOT) {
            settings.config_root = paths::expand_path(&config_root)?;
        }
        if let Some(prefix) = lookup(ENV_PREFIX) {
            settings.set_prefix(prefix)?;
        }
        if let Some(list) = non_empty(ENV_PROFILES) {
            settings.candidates = parse_candidates(&list);
        }
        settings.verbose = non_empty(ENV_VERBOSE).is_some_and(|v| parse_flag(&v));
        settings.benchmark = non_empty(ENV_BENCH).is_some_and(|v| parse_flag(&v));
        if let Some(depth) = non_empty(ENV_DEPTH) {
            settings.depth = parse_depth(&depth)?;
        }
        if let Some(phase) = non_empty(ENV_PHASE) {
            settings.phase = Some(phase.trim().parse()?);
        }

        log::debug!("Settings resolved: {:?}", settings);
        Ok(settings)
    }

    /// Replaces the unit prefix.
    pub fn set_prefix(&mut self, prefix: String) -> Result<(), SettingsError> {
        if prefix.contains('/') || prefix.contains(std::path::MAIN_SEPARATOR) {
            return Err(SettingsError::InvalidPrefix);
        }
        self.unit_prefix = prefix;
        Ok(())
    }
}

/// The active dialect's own profile, then plain `sh`.
pub fn default_candidates(dialect: Dialect) -> Vec<String> {
    let mut list = vec![dialect.extension().to_string()];
    if dialect != Dialect::Posix {
        list.push(Dialect::Posix.extension().to_string());
    }
    list
}

/// Splits a colon-separated profile list, dropping empty entries.
pub fn parse_candidates(list: &str) -> Vec<String> {
    list.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of [`parse_candidates`].
pub fn join_candidates(candidates: &[String]) -> String {
    candidates.join(&LIST_SEPARATOR.to_string())
}

/// A nesting depth above [`MAX_DEPTH`] means nested loads are cycling.
fn parse_depth(value: &str) -> Result<usize, SettingsError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|depth| *depth <= MAX_DEPTH)
        .ok_or_else(|| SettingsError::InvalidDepth {
            value: value.to_string(),
            max: MAX_DEPTH,
        })
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
