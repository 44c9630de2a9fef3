// src/system/profiles_config.rs

//! The profile table read from `profiles.toml`.

use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};
use thiserror::Error;

use crate::{
    constants::PROFILES_CONFIG_FILENAME, core::resolver::Collation, system::dialect::Dialect,
};

/// A `profiles.toml` that could not be used.
#[derive(Error, Debug)]
pub enum ProfilesConfigError {
    /// The file could not be read.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for the table.
    #[error("Failed to parse profiles.toml: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// A profile with an empty extension.
    #[error("Profile '{0}' declares an empty extension.")]
    EmptyExtension(String),
}

/// One profile entry.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    /// Extension of the profile's unit files, without the dot.
    pub extension: String,
}

/// The profile table: each profile maps to exactly one canonical extension.
#[derive(Deserialize, Debug, Clone)]
pub struct ProfilesConfig {
    /// Profiles by name.
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
    /// Order used to pick among several tolerant-pattern matches.
    #[serde(default)]
    pub collation: Collation,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        let profiles = [
            Dialect::Posix,
            Dialect::Bash,
            Dialect::Zsh,
            Dialect::Ksh,
            Dialect::Fish,
        ]
        .into_iter()
        .map(|d| {
            (
                d.extension().to_string(),
                ProfileConfig {
                    extension: d.extension().to_string(),
                },
            )
        })
        .collect();
        Self {
            profiles,
            collation: Collation::default(),
        }
    }
}

impl ProfilesConfig {
    /// Canonical extension of `profile`, if it is known.
    pub fn extension(&self, profile: &str) -> Option<&str> {
        self.profiles.get(profile).map(|p| p.extension.as_str())
    }
}

/// Loads `profiles.toml` from the configuration root on top of the built-in
/// table. A missing file yields the built-in table unchanged.
pub fn load_profiles_config(config_root: &Path) -> Result<ProfilesConfig, ProfilesConfigError> {
    let path = config_root.join(PROFILES_CONFIG_FILENAME);
    let mut config = ProfilesConfig::default();
    if !path.is_file() {
        log::debug!(
            "No {} at '{}'; using built-in profiles.",
            PROFILES_CONFIG_FILENAME,
            path.display()
        );
        return Ok(config);
    }

    let content = fs::read_to_string(&path)?;
    let user: ProfilesConfig = toml::from_str(&content)?;
    for (name, profile) in user.profiles {
        let extension = profile.extension.trim().trim_start_matches('.');
        if extension.is_empty() {
            return Err(ProfilesConfigError::EmptyExtension(name));
        }
        config.profiles.insert(
            name,
            ProfileConfig {
                extension: extension.to_string(),
            },
        );
    }
    config.collation = user.collation;
    Ok(config)
}
