// src/cli/handlers/commons.rs

//! Shared plumbing for the handlers.

use anyhow::Result;
use colored::Colorize;

use crate::{
    cli::Status,
    core::{
        executor::UnitRunner,
        orchestrator::{self, InitReport, PhaseReport},
        session::Session,
        settings::Settings,
    },
    system::{
        profiles_config,
        runner::{EmitRunner, ShellRunner},
    },
};

/// Builds the session for this process from its settings and `profiles.toml`.
pub fn open_session(settings: Settings) -> Result<Session> {
    let profiles = profiles_config::load_profiles_config(&settings.config_root)?;
    Ok(Session::new(settings, profiles))
}

/// Runs the init pass, reporting every rejected declaration on stderr.
pub fn initialize(session: &mut Session) -> Result<InitReport> {
    let report = orchestrator::initialize(session)?;
    for rejected in &report.rejected {
        eprintln!(
            "{} {}: {}",
            t!("init.warning.rejected").yellow().bold(),
            report.path.display(),
            rejected
        );
    }
    Ok(report)
}

/// Hands `f` the runner selected by `--emit`. Emitted lines go to stdout once
/// `f` has returned.
pub fn with_runner<T>(emit: bool, f: impl FnOnce(&mut dyn UnitRunner) -> T) -> T {
    if emit {
        let mut runner = EmitRunner::new();
        let result = f(&mut runner);
        print!("{}", runner.into_script());
        result
    } else {
        f(&mut ShellRunner::new())
    }
}

/// Prints a one-line summary of failed units for each failing phase.
pub fn report_phases(reports: &[PhaseReport]) -> Status {
    let mut status = Status::Success;
    for report in reports.iter().filter(|r| r.failed()) {
        eprintln!(
            "{}",
            format!(
                t!("run.summary.failures"),
                phase = report.phase,
                failed = report.batch.failures(),
                total = report.batch.len()
            )
            .red()
        );
        status = Status::Failure;
    }
    status
}
