// src/cli/handlers/run.rs

//! `run`: one lifecycle phase.

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{Status, handlers::commons},
    core::{orchestrator, settings::Settings},
    models::Phase,
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Reads the init declarations and runs every unit tagged with one phase."
)]
struct RunArgs {
    /// The phase to run: env, login, interactive or logout.
    phase: Phase,

    /// Print sourcing lines for `eval` instead of running the units.
    #[arg(long)]
    emit: bool,
}

/// Handles `shellphase run`.
pub fn handle(args: Vec<String>, settings: Settings) -> Result<Status> {
    let run_args = RunArgs::try_parse_from(&args)?;

    let mut session = commons::open_session(settings)?;
    let init = commons::initialize(&mut session)?;
    let report = commons::with_runner(run_args.emit, |runner| {
        orchestrator::run_phase(&mut session, runner, run_args.phase)
    });

    Ok(Status::from_failed(init.failed()).and(commons::report_phases(&[report])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_argument_is_validated() {
        let parsed = RunArgs::try_parse_from(["logout", "--emit"]).unwrap();
        assert_eq!(parsed.phase, Phase::Logout);
        assert!(parsed.emit);
        assert!(RunArgs::try_parse_from(["boot"]).is_err());
    }
}
