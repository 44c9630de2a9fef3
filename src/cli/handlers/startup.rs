// src/cli/handlers/startup.rs

//! `startup`: the env, login and interactive phases in turn.

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{Status, handlers::commons},
    core::{orchestrator, settings::Settings},
    models::Phase,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Runs the startup chain: env, then login, then interactive."
)]
struct StartupArgs {
    /// Leave a phase out of the chain (repeatable).
    #[arg(long, value_name = "PHASE")]
    skip: Vec<Phase>,

    /// Print sourcing lines for `eval` instead of running the units.
    #[arg(long)]
    emit: bool,
}

/// Handles `shellphase startup`.
pub fn handle(args: Vec<String>, settings: Settings) -> Result<Status> {
    let startup_args = StartupArgs::try_parse_from(&args)?;

    let mut session = commons::open_session(settings)?;
    let init = commons::initialize(&mut session)?;
    let reports = commons::with_runner(startup_args.emit, |runner| {
        orchestrator::run_startup(&mut session, runner, &startup_args.skip)
    });

    Ok(Status::from_failed(init.failed()).and(commons::report_phases(&reports)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_is_repeatable() {
        let parsed = StartupArgs::try_parse_from(["--skip", "env", "--skip", "login"]).unwrap();
        assert_eq!(parsed.skip, vec![Phase::Env, Phase::Login]);
        assert!(!parsed.emit);
    }
}
