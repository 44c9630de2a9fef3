// src/core/scheduler.rs

//! Batches of deferred actions.

use std::path::PathBuf;

use crate::{
    core::{
        executor::{self, ActionReport, UnitRunner},
        session::Session,
    },
    models::DeferredAction,
};

/// Pending actions of one batch. Scheduling never runs anything; draining
/// runs everything.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<DeferredAction>,
}

/// Reports of a drained batch, in execution order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// One report per action, in execution order.
    pub actions: Vec<ActionReport>,
}

impl BatchReport {
    /// Logical OR of the individual failures.
    pub fn failed(&self) -> bool {
        self.actions.iter().any(ActionReport::failed)
    }

    /// Number of failed actions.
    pub fn failures(&self) -> usize {
        self.actions.iter().filter(|a| a.failed()).count()
    }

    /// Number of actions run.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether nothing ran.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Scheduler {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `path` without running it.
    pub fn schedule(&mut self, path: impl Into<PathBuf>) {
        let action = DeferredAction::new(path);
        log::trace!("Scheduled '{}'", action.path.display());
        self.pending.push(action);
    }

    /// Actions queued so far.
    pub fn pending(&self) -> &[DeferredAction] {
        &self.pending
    }

    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Executes every pending action in scheduling order and empties the list.
    /// A failing action never stops the ones after it.
    pub fn drain(&mut self, session: &mut Session, runner: &mut dyn UnitRunner) -> BatchReport {
        let batch = std::mem::take(&mut self.pending);
        log::debug!("Draining {} action(s) at depth {}", batch.len(), session.depth());

        let actions = batch
            .iter()
            .map(|action| executor::execute(session, runner, action))
            .collect();
        BatchReport { actions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{loader::LoadOverride, settings::Settings, test_support::RecordingRunner},
        models::Phase,
        system::{dialect::Dialect, profiles_config::ProfilesConfig},
    };
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "true\n").unwrap();
        path
    }

    #[test]
    fn test_schedule_does_not_execute() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule("/cfg/sh/a/@env.sh");
        scheduler.schedule("/cfg/sh/b/@env.sh");
        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.pending()[1].path, PathBuf::from("/cfg/sh/b/@env.sh"));
    }

    #[test]
    fn test_every_action_runs_in_order_despite_a_failure() {
        let settings = Settings::new("/cfg", Dialect::Posix);
        let mut session = Session::new(settings, ProfilesConfig::default());
        let paths = ["/cfg/sh/a/@env.sh", "/cfg/sh/b/@env.sh", "/cfg/sh/c/@env.sh"];
        let mut runner = RecordingRunner::default().with_status(Path::new(paths[1]), 1);

        let mut scheduler = Scheduler::new();
        for path in paths {
            scheduler.schedule(path);
        }
        let report = scheduler.drain(&mut session, &mut runner);

        assert_eq!(runner.paths(), paths.iter().map(PathBuf::from).collect::<Vec<_>>());
        assert_eq!(
            report.actions.iter().map(|a| a.status).collect::<Vec<_>>(),
            vec![0, 1, 0]
        );
        assert!(report.failed());
        assert_eq!(report.failures(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_depth_returns_to_baseline_after_nested_loads() {
        let dir = TempDir::new().unwrap();
        let top = touch(dir.path(), "sh/app/@login.sh");
        let first = touch(dir.path(), "sh/lib.sh");
        let second = touch(dir.path(), "sh/base.sh");

        let mut settings = Settings::new(dir.path(), Dialect::Posix);
        settings.depth = 2;
        let mut session = Session::new(settings, ProfilesConfig::default());
        let mut runner = RecordingRunner::default()
            .with_nested_load(&top, "lib", None)
            .with_nested_load(&first, "base", None);

        let mut scheduler = Scheduler::new();
        scheduler.schedule(&top);
        let report = scheduler.drain(&mut session, &mut runner);

        assert!(!report.failed());
        assert_eq!(session.depth(), 2);
        let depths: Vec<(PathBuf, usize)> = runner
            .runs
            .iter()
            .map(|r| (r.path.clone(), r.depth))
            .collect();
        assert_eq!(depths, vec![(top, 3), (first, 4), (second, 5)]);
    }

    #[test]
    fn test_nested_load_with_phase_override() {
        let dir = TempDir::new().unwrap();
        let top = touch(dir.path(), "sh/app/@interactive.sh");
        let dep = touch(dir.path(), "sh/dep/@login.sh");

        let settings = Settings::new(dir.path(), Dialect::Posix);
        let mut session = Session::new(settings, ProfilesConfig::default());
        let mut runner = RecordingRunner::default()
            .with_nested_load(&top, "dep", Some(LoadOverride::Phase(Phase::Login)));

        let mut scheduler = Scheduler::new();
        scheduler.schedule(&top);
        scheduler.drain(&mut session, &mut runner);

        assert_eq!(runner.paths(), vec![top, dep]);
        assert_eq!(session.depth(), 0);
    }
}
