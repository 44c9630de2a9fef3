// src/core/resolver.rs

//! Finding a unit's file along a profile chain.

use glob::{MatchOptions, Pattern};
use serde::Deserialize;
use std::{
    fmt,
    fs::File,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    constants::INIT_FILE_STEM, models::Phase, system::profiles_config::ProfilesConfig,
};

/// What is being looked up, independent of the profile it is found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// `<profile>/<unit>/<prefix><phase>.<ext>`
    Module {
        /// Unit name.
        unit: &'a str,
        /// Phase whose file is wanted.
        phase: Phase,
    },
    /// `<profile>/init.<ext>`
    Init,
    /// `<profile>/<unit>.<ext>`
    Direct {
        /// Unit name.
        unit: &'a str,
    },
}

impl fmt::Display for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module { unit, phase } => write!(f, "unit '{}' ({})", unit, phase),
            Self::Init => f.write_str("init file"),
            Self::Direct { unit } => write!(f, "unit '{}'", unit),
        }
    }
}

/// No candidate profile holds a readable file for a lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No readable file for {lookup} in profiles [{}].", candidates.join(":"))]
pub struct NotFound {
    /// The lookup, as displayed.
    pub lookup: String,
    /// Profiles tried, in order.
    pub candidates: Vec<String>,
}

/// Order used to choose among several files matched by the tolerant pattern.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Collation {
    /// Plain byte order of the file names.
    #[default]
    Bytewise,
    /// Case-folded order, bytewise among names that fold equal.
    CaseInsensitive,
}

impl Collation {
    fn sort(self, paths: &mut [PathBuf]) {
        match self {
            Self::Bytewise => paths.sort(),
            Self::CaseInsensitive => paths.sort_by(|a, b| {
                let fold = |p: &Path| p.to_string_lossy().to_lowercase();
                fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
            }),
        }
    }
}

/// How a resolved file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The expected name exists.
    Exact,
    /// Found through the tolerant pattern.
    Pattern,
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The file found.
    pub path: PathBuf,
    /// Profile it was found in.
    pub profile: String,
    /// Exact or pattern hit.
    pub via: MatchKind,
    /// Candidate profiles consulted, the matching one included.
    pub tried: usize,
}

/// Maps a lookup and an ordered profile chain to the first readable file.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    root: &'a Path,
    prefix: &'a str,
    profiles: &'a ProfilesConfig,
}

impl<'a> Resolver<'a> {
    /// A resolver over `root`, with `prefix` marking phase files.
    pub fn new(root: &'a Path, prefix: &'a str, profiles: &'a ProfilesConfig) -> Self {
        Self {
            root,
            prefix,
            profiles,
        }
    }

    /// Walks `candidates` in order and stops at the first profile holding a
    /// readable file for `lookup`. An exact hit beats a pattern hit within the
    /// same profile. Misses on individual profiles are not errors.
    ///
    /// # Errors
    /// `NotFound` once every candidate has been tried.
    pub fn resolve(
        &self,
        lookup: &Lookup<'_>,
        candidates: &[String],
    ) -> Result<Resolution, NotFound> {
        for (index, profile) in candidates.iter().enumerate() {
            let Some(extension) = self.profiles.extension(profile) else {
                log::warn!(
                    "Skipping unknown profile '{}' while resolving {}.",
                    profile,
                    lookup
                );
                continue;
            };
            let expected = self.expected_path(lookup, profile, extension);
            log::trace!("Checking '{}'", expected.display());

            let hit = if is_readable(&expected) {
                Some((expected, MatchKind::Exact))
            } else {
                self.tolerant_match(&expected)
                    .map(|path| (path, MatchKind::Pattern))
            };

            if let Some((path, via)) = hit {
                log::debug!("Resolved {} to '{}' ({:?})", lookup, path.display(), via);
                return Ok(Resolution {
                    path,
                    profile: profile.clone(),
                    via,
                    tried: index + 1,
                });
            }
        }

        Err(NotFound {
            lookup: lookup.to_string(),
            candidates: candidates.to_vec(),
        })
    }

    fn expected_path(&self, lookup: &Lookup<'_>, profile: &str, extension: &str) -> PathBuf {
        let base = self.root.join(profile);
        match lookup {
            Lookup::Module { unit, phase } => base
                .join(unit)
                .join(format!("{}{}.{}", self.prefix, phase, extension)),
            Lookup::Init => base.join(format!("{}.{}", INIT_FILE_STEM, extension)),
            Lookup::Direct { unit } => base.join(format!("{}.{}", unit, extension)),
        }
    }

    /// `<dir>/*<file name>`: tolerates one arbitrary leading segment before the
    /// expected name, hidden entries included.
    fn tolerant_match(&self, expected: &Path) -> Option<PathBuf> {
        let dir = expected.parent()?;
        let file_name = expected.file_name()?.to_string_lossy();
        let pattern = format!(
            "{}/*{}",
            Pattern::escape(&dir.to_string_lossy()),
            Pattern::escape(&file_name)
        );
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let mut matches: Vec<PathBuf> = match glob::glob_with(&pattern, options) {
            Ok(paths) => paths.filter_map(Result::ok).filter(|p| is_readable(p)).collect(),
            Err(e) => {
                log::debug!("Invalid tolerant pattern '{}': {}", pattern, e);
                return None;
            }
        };
        if matches.len() > 1 {
            log::debug!(
                "{} files match '{}'; choosing by {:?} collation.",
                matches.len(),
                pattern,
                self.profiles.collation
            );
        }
        self.profiles.collation.sort(&mut matches);
        matches.into_iter().next()
    }
}

fn is_readable(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "true\n").unwrap();
        path
    }

    fn chain(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_matching_profile_wins_without_probing_later_ones() {
        let dir = TempDir::new().unwrap();
        let in_zsh = touch(dir.path(), "zsh/git/@login.zsh");
        touch(dir.path(), "sh/git/@login.sh");
        let profiles = ProfilesConfig::default();
        let resolver = Resolver::new(dir.path(), "@", &profiles);

        let found = resolver
            .resolve(&Lookup::Module { unit: "git", phase: Phase::Login }, &chain(&["zsh", "sh"]))
            .unwrap();
        assert_eq!(found.path, in_zsh);
        assert_eq!(found.profile, "zsh");
        assert_eq!(found.via, MatchKind::Exact);
        assert_eq!(found.tried, 1);
    }

    #[test]
    fn test_falls_back_to_later_profile() {
        let dir = TempDir::new().unwrap();
        let in_sh = touch(dir.path(), "sh/git/@login.sh");
        let profiles = ProfilesConfig::default();
        let resolver = Resolver::new(dir.path(), "@", &profiles);

        let found = resolver
            .resolve(&Lookup::Module { unit: "git", phase: Phase::Login }, &chain(&["zsh", "sh"]))
            .unwrap();
        assert_eq!(found.path, in_sh);
        assert_eq!(found.profile, "sh");
        assert_eq!(found.tried, 2);
    }

    #[test]
    fn test_not_found_after_exhausting_every_candidate() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "zsh/git/@env.zsh");
        let profiles = ProfilesConfig::default();
        let resolver = Resolver::new(dir.path(), "@", &profiles);

        let err = resolver
            .resolve(&Lookup::Module { unit: "git", phase: Phase::Logout }, &chain(&["zsh", "sh"]))
            .unwrap_err();
        assert_eq!(err.candidates, chain(&["zsh", "sh"]));
        assert!(err.to_string().contains("zsh:sh"));
    }

    #[test]
    fn test_init_and_direct_lookups() {
        let dir = TempDir::new().unwrap();
        let init = touch(dir.path(), "bash/init.bash");
        let direct = touch(dir.path(), "bash/aliases.bash");
        let profiles = ProfilesConfig::default();
        let resolver = Resolver::new(dir.path(), "@", &profiles);

        assert_eq!(resolver.resolve(&Lookup::Init, &chain(&["bash"])).unwrap().path, init);
        assert_eq!(
            resolver
                .resolve(&Lookup::Direct { unit: "aliases" }, &chain(&["zsh", "bash"]))
                .unwrap()
                .path,
            direct
        );
    }

    #[test]
    fn test_tolerant_pattern_accepts_leading_segment() {
        let dir = TempDir::new().unwrap();
        let hidden = touch(dir.path(), "zsh/git/.@env.zsh");
        let profiles = ProfilesConfig::default();
        let resolver = Resolver::new(dir.path(), "@", &profiles);

        let found = resolver
            .resolve(&Lookup::Module { unit: "git", phase: Phase::Env }, &chain(&["zsh"]))
            .unwrap();
        assert_eq!(found.path, hidden);
        assert_eq!(found.via, MatchKind::Pattern);
    }

    #[test]
    fn test_exact_path_beats_pattern_match() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "zsh/git/.@env.zsh");
        let exact = touch(dir.path(), "zsh/git/@env.zsh");
        let profiles = ProfilesConfig::default();
        let resolver = Resolver::new(dir.path(), "@", &profiles);

        let found = resolver
            .resolve(&Lookup::Module { unit: "git", phase: Phase::Env }, &chain(&["zsh"]))
            .unwrap();
        assert_eq!(found.path, exact);
        assert_eq!(found.via, MatchKind::Exact);
    }

    #[test]
    fn test_pattern_tie_break_follows_collation() {
        let dir = TempDir::new().unwrap();
        let upper = touch(dir.path(), "zsh/git/B@env.zsh");
        let lower = touch(dir.path(), "zsh/git/a@env.zsh");
        let lookup = Lookup::Module { unit: "git", phase: Phase::Env };

        let mut profiles = ProfilesConfig::default();
        let found = Resolver::new(dir.path(), "@", &profiles)
            .resolve(&lookup, &chain(&["zsh"]))
            .unwrap();
        assert_eq!(found.path, upper);

        profiles.collation = Collation::CaseInsensitive;
        let found = Resolver::new(dir.path(), "@", &profiles)
            .resolve(&lookup, &chain(&["zsh"]))
            .unwrap();
        assert_eq!(found.path, lower);
    }

    #[test]
    fn test_unknown_profiles_are_skipped() {
        let dir = TempDir::new().unwrap();
        let in_sh = touch(dir.path(), "sh/init.sh");
        let profiles = ProfilesConfig::default();
        let resolver = Resolver::new(dir.path(), "@", &profiles);

        let found = resolver.resolve(&Lookup::Init, &chain(&["nope", "sh"])).unwrap();
        assert_eq!(found.path, in_sh);
        assert_eq!(found.tried, 2);
    }

    #[test]
    fn test_custom_prefix() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "sh/git/_login.sh");
        let profiles = ProfilesConfig::default();
        let resolver = Resolver::new(dir.path(), "_", &profiles);

        let found = resolver
            .resolve(&Lookup::Module { unit: "git", phase: Phase::Login }, &chain(&["sh"]))
            .unwrap();
        assert_eq!(found.path, file);
    }
}
