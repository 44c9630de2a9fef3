// src/cli/handlers/load.rs

//! `load`: run one unit right away.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::{Status, handlers::commons},
    core::{
        loader::{self, LoadError, LoadOverride},
        settings::{self, Settings},
    },
    models::Phase,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Loads a unit right away, typically from inside another unit."
)]
struct LoadArgs {
    /// Name of the unit to load.
    unit: String,

    /// Load the unit's file for this phase instead of its direct file.
    #[arg(long, conflicts_with = "profiles")]
    phase: Option<Phase>,

    /// Resolve and run against this colon-separated profile chain.
    #[arg(long, value_name = "LIST")]
    profiles: Option<String>,

    /// A missing unit is not an error.
    #[arg(long)]
    optional: bool,

    /// Print sourcing lines for `eval` instead of running the unit.
    #[arg(long)]
    emit: bool,
}

impl LoadArgs {
    fn load_override(&self) -> Option<LoadOverride> {
        match (&self.phase, &self.profiles) {
            (Some(phase), _) => Some(LoadOverride::Phase(*phase)),
            (None, Some(list)) => Some(LoadOverride::Profiles(settings::parse_candidates(list))),
            (None, None) => None,
        }
    }
}

/// Handles `shellphase load`.
pub fn handle(args: Vec<String>, settings: Settings) -> Result<Status> {
    let load_args = LoadArgs::try_parse_from(&args)?;
    let verbose = settings.verbose;

    let mut session = commons::open_session(settings)?;
    let result = commons::with_runner(load_args.emit, |runner| {
        loader::load(&mut session, runner, &load_args.unit, load_args.load_override())
    });

    match result {
        Ok(report) => Ok(Status::from_failed(report.failed())),
        Err(LoadError::NotFound(not_found)) if load_args.optional => {
            log::debug!("Optional load skipped: {}", not_found);
            if verbose {
                eprintln!(
                    "{}",
                    format!(t!("load.info.optional_missing"), unit = load_args.unit).dimmed()
                );
            }
            Ok(Status::Success)
        }
        Err(e) => Err(e.into()),
    }
}
