// src/core/executor.rs

//! Runs one deferred action and reports how it ended.

use colored::Colorize;
use std::path::PathBuf;
use thiserror::Error;

use crate::{
    constants::{MAX_DEPTH, SPAWN_FAILURE_STATUS},
    core::{clock::Stopwatch, paths, session::Session},
    models::DeferredAction,
    system::dialect::{Dialect, Invocation},
};

/// Ways a runner can fail to produce an exit status.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The interpreter could not be started.
    #[error("Unit '{path}' could not be started: {source}")]
    Spawn {
        /// Path of the unit file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The interpreter was killed before exiting.
    #[error("Unit '{0}' was terminated by a signal.")]
    Signalled(String),
}

impl ExecutionError {
    /// Completion status recorded for an action that ended in this error.
    pub fn status(&self) -> i32 {
        match self {
            Self::Spawn { .. } => SPAWN_FAILURE_STATUS,
            Self::Signalled(_) => 128,
        }
    }
}

/// Strategy that actually runs a unit file.
///
/// The runner gets the session back so a unit can load other units while it
/// is running (see [`crate::core::loader::load`]).
pub trait UnitRunner {
    /// Runs one action and returns its completion status (0 is success).
    fn run(
        &mut self,
        session: &mut Session,
        action: &DeferredAction,
        invocation: &Invocation,
    ) -> Result<i32, ExecutionError>;
}

/// Outcome of one executed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    /// The unit file that ran.
    pub path: PathBuf,
    /// Nesting depth the action ran at (1 for a top-level action).
    pub depth: usize,
    /// Completion status, 0 on success.
    pub status: i32,
    /// Wall time, when benchmarking is on.
    pub elapsed_ms: Option<u128>,
}

impl ActionReport {
    /// Whether the action ended with a non-zero status.
    pub fn failed(&self) -> bool {
        self.status != 0
    }
}

/// Runs a single action. The nesting depth is raised for the duration of the
/// action and restored afterwards whatever the outcome. A unit whose extension
/// names another dialect runs in that dialect's compatibility mode, for this
/// action only.
pub fn execute(
    session: &mut Session,
    runner: &mut dyn UnitRunner,
    action: &DeferredAction,
) -> ActionReport {
    let baseline = session.depth();
    let mut session = scopeguard::guard(session, move |s| s.leave(baseline));
    session.enter();
    let depth = session.depth();

    let active = session.dialect();
    let invocation = active.invocation(Dialect::from_path(&action.path));
    log::debug!(
        "[depth {}] Running '{}' as {:?}",
        depth,
        action.path.display(),
        invocation
    );

    let stopwatch = session
        .settings()
        .benchmark
        .then(|| Stopwatch::start(active));

    let status = match runner.run(&mut **session, action, &invocation) {
        Ok(status) => status,
        Err(e) => {
            log::error!("{}", e);
            e.status()
        }
    };
    let elapsed_ms = stopwatch.map(|w| w.elapsed_ms());

    if session.settings().verbose {
        let relative = paths::display_relative(&action.path, session.config_root());
        let line = format_action_line(depth, &relative, elapsed_ms, status);
        if status == 0 {
            eprintln!("{}", line);
        } else {
            eprintln!("{}", line.red());
        }
    }

    ActionReport {
        path: action.path.clone(),
        depth,
        status,
        elapsed_ms,
    }
}

/// `<indent><relative path>[ <N>ms][ [exit S]]`, two spaces per level below
/// the top. The indent stops growing at [`MAX_DEPTH`].
pub fn format_action_line(
    depth: usize,
    relative: &str,
    elapsed_ms: Option<u128>,
    status: i32,
) -> String {
    let indent = depth.saturating_sub(1).min(MAX_DEPTH);
    let mut line = format!("{}{}", "  ".repeat(indent), relative);
    if let Some(ms) = elapsed_ms {
        line.push_str(&format!(" {}ms", ms));
    }
    if status != 0 {
        line.push_str(&format!(" [exit {}]", status));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{settings::Settings, test_support::RecordingRunner};
    use crate::system::{dialect::CompatMode, profiles_config::ProfilesConfig};

    fn session(dialect: Dialect) -> Session {
        Session::new(Settings::new("/cfg", dialect), ProfilesConfig::default())
    }

    #[test]
    fn test_format_action_line() {
        assert_eq!(format_action_line(1, "zsh/git/@env.zsh", None, 0), "zsh/git/@env.zsh");
        assert_eq!(
            format_action_line(3, "sh/x.sh", Some(12), 2),
            "    sh/x.sh 12ms [exit 2]"
        );
    }

    #[test]
    fn test_depth_is_restored_even_when_the_unit_fails() {
        let mut session = session(Dialect::Zsh);
        let action = DeferredAction::new("/cfg/zsh/bad/@env.zsh");
        let mut runner = RecordingRunner::default().with_status(&action.path, 5);

        let report = execute(&mut session, &mut runner, &action);
        assert_eq!(report.status, 5);
        assert_eq!(report.depth, 1);
        assert!(report.failed());
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn test_runner_error_is_recorded_as_status() {
        let mut session = session(Dialect::Bash);
        let action = DeferredAction::new("/cfg/bash/gone/@env.bash");
        let mut runner = RecordingRunner::default().with_spawn_failure(&action.path);

        let report = execute(&mut session, &mut runner, &action);
        assert_eq!(report.status, SPAWN_FAILURE_STATUS);
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn test_compat_mode_applies_to_a_single_action() {
        let mut session = session(Dialect::Zsh);
        let mut runner = RecordingRunner::default();

        execute(&mut session, &mut runner, &DeferredAction::new("/cfg/sh/a/@env.sh"));
        execute(&mut session, &mut runner, &DeferredAction::new("/cfg/zsh/b/@env.zsh"));

        assert_eq!(runner.runs[0].invocation.compat, Some(CompatMode::ZshEmulate("sh")));
        assert_eq!(runner.runs[1].invocation.compat, None);
        assert_eq!(session.dialect(), Dialect::Zsh);
    }

    #[test]
    fn test_benchmark_records_elapsed_time() {
        let mut settings = Settings::new("/cfg", Dialect::Zsh);
        settings.benchmark = true;
        let mut session = Session::new(settings, ProfilesConfig::default());
        let mut runner = RecordingRunner::default();

        let action = DeferredAction::new("/cfg/zsh/a/@env.zsh");
        let report = execute(&mut session, &mut runner, &action);
        assert!(report.elapsed_ms.is_some());
    }

    #[test]
    fn test_execute_at_maximum_depth_does_not_overflow() {
        let mut settings = Settings::new("/cfg", Dialect::Zsh);
        settings.depth = usize::MAX;
        settings.verbose = true;
        let mut session = Session::new(settings, ProfilesConfig::default());
        let mut runner = RecordingRunner::default();

        let action = DeferredAction::new("/cfg/zsh/a/@env.zsh");
        let report = execute(&mut session, &mut runner, &action);
        assert_eq!(report.depth, usize::MAX);
        assert_eq!(session.depth(), usize::MAX);
    }

    #[test]
    fn test_indent_is_capped() {
        let line = format_action_line(usize::MAX, "a.sh", None, 0);
        assert_eq!(line.len(), 2 * MAX_DEPTH + "a.sh".len());
    }
}
