// src/core/loader.rs

//! Immediate loading of a unit from inside another one.

use thiserror::Error;

use crate::{
    core::{
        executor::UnitRunner,
        registry::{self, ValidationError},
        resolver::{Lookup, NotFound},
        scheduler::{BatchReport, Scheduler},
        session::Session,
    },
    models::Phase,
};

/// Why a load did not run anything.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No candidate profile holds the unit.
    #[error(transparent)]
    NotFound(#[from] NotFound),
    /// The unit name is not valid.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Changes how [`load`] looks a unit up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOverride {
    /// Resolve the unit's phase file instead of its direct file.
    Phase(Phase),
    /// Resolve (and run) against this profile chain instead of the session's.
    Profiles(Vec<String>),
}

/// Resolves `unit` and runs it right away, before returning, so the caller
/// sees its effects on the next line. Unlike phase loading nothing is left
/// pending: the load gets its own scheduler, drained on the spot.
///
/// Without an override the unit's direct file `<profile>/<unit>.<ext>` is
/// looked up against the session's current profile chain.
///
/// # Errors
/// `NotFound` when no candidate profile holds the unit. The caller decides
/// whether that matters.
pub fn load(
    session: &mut Session,
    runner: &mut dyn UnitRunner,
    unit: &str,
    override_: Option<LoadOverride>,
) -> Result<BatchReport, LoadError> {
    registry::validate_name(unit)?;
    match override_ {
        None => load_with(session, runner, Lookup::Direct { unit }),
        Some(LoadOverride::Phase(phase)) => {
            load_with(session, runner, Lookup::Module { unit, phase })
        }
        Some(LoadOverride::Profiles(candidates)) => {
            session.with_candidates(candidates, |session| {
                load_with(session, runner, Lookup::Direct { unit })
            })
        }
    }
}

fn load_with(
    session: &mut Session,
    runner: &mut dyn UnitRunner,
    lookup: Lookup<'_>,
) -> Result<BatchReport, LoadError> {
    let resolution = session.resolver().resolve(&lookup, session.candidates())?;
    log::debug!(
        "Loading {} from profile '{}' at depth {}",
        lookup,
        resolution.profile,
        session.depth()
    );

    let mut scope = Scheduler::new();
    scope.schedule(resolution.path);
    Ok(scope.drain(session, runner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{settings::Settings, test_support::RecordingRunner},
        system::{dialect::Dialect, profiles_config::ProfilesConfig},
    };
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "true\n").unwrap();
        path
    }

    fn session(root: &Path) -> Session {
        Session::new(Settings::new(root, Dialect::Zsh), ProfilesConfig::default())
    }

    #[test]
    fn test_direct_load_runs_immediately() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "sh/aliases.sh");
        let mut session = session(dir.path());
        let mut runner = RecordingRunner::default();

        let report = load(&mut session, &mut runner, "aliases", None).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(runner.paths(), vec![file]);
        assert_eq!(runner.runs[0].depth, 1);
    }

    #[test]
    fn test_missing_unit_is_reported_to_the_caller() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());
        let mut runner = RecordingRunner::default();

        let err = load(&mut session, &mut runner, "nothing", None).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(ref nf) if nf.candidates == ["zsh", "sh"]));
        assert!(runner.runs.is_empty());
    }

    #[test]
    fn test_invalid_unit_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path());
        let mut runner = RecordingRunner::default();

        assert!(matches!(
            load(&mut session, &mut runner, "a:b", None),
            Err(LoadError::Invalid(ValidationError::ReservedCharacter { .. }))
        ));
    }

    #[test]
    fn test_profile_override_is_visible_while_the_unit_runs() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "bash/completion.bash");
        touch(dir.path(), "zsh/completion.zsh");
        let mut session = session(dir.path());
        let mut runner = RecordingRunner::default();

        load(
            &mut session,
            &mut runner,
            "completion",
            Some(LoadOverride::Profiles(vec!["bash".to_string()])),
        )
        .unwrap();

        assert_eq!(runner.paths(), vec![file]);
        assert_eq!(runner.runs[0].candidates, vec!["bash"]);
        assert_eq!(session.candidates(), ["zsh", "sh"]);
    }

    #[test]
    fn test_phase_override_resolves_the_phase_file() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "zsh/prompt/@interactive.zsh");
        let mut session = session(dir.path());
        let mut runner = RecordingRunner::default();

        load(
            &mut session,
            &mut runner,
            "prompt",
            Some(LoadOverride::Phase(Phase::Interactive)),
        )
        .unwrap();
        assert_eq!(runner.paths(), vec![file]);
    }
}
