// src/cli/handlers/resolve.rs

//! `resolve`: show which file a unit resolves to.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::{Status, handlers::commons},
    core::{
        resolver::{Lookup, Resolution},
        settings::{self, Settings},
    },
    models::Phase,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the file a unit resolves to, without running it."
)]
struct ResolveArgs {
    /// Name of the unit to look up.
    #[arg(required_unless_present = "init")]
    unit: Option<String>,

    /// Look up the unit's file for this phase.
    #[arg(long, conflicts_with = "init")]
    phase: Option<Phase>,

    /// Look up the init file instead of a unit.
    #[arg(long, conflicts_with = "unit")]
    init: bool,

    /// Resolve against this colon-separated profile chain.
    #[arg(long, value_name = "LIST")]
    profiles: Option<String>,
}

impl ResolveArgs {
    fn lookup(&self) -> Lookup<'_> {
        match (&self.unit, self.phase) {
            (Some(unit), Some(phase)) => Lookup::Module { unit, phase },
            (Some(unit), None) => Lookup::Direct { unit },
            (None, _) => Lookup::Init,
        }
    }
}

/// Handles `shellphase resolve`.
pub fn handle(args: Vec<String>, settings: Settings) -> Result<Status> {
    let resolve_args = ResolveArgs::try_parse_from(&args)?;
    if let Some(unit) = &resolve_args.unit {
        crate::core::registry::validate_name(unit)?;
    }
    let verbose = settings.verbose;

    let session = commons::open_session(settings)?;
    let candidates = match &resolve_args.profiles {
        Some(list) => settings::parse_candidates(list),
        None => session.candidates().to_vec(),
    };
    let resolution = session.resolver().resolve(&resolve_args.lookup(), &candidates)?;

    println!("{}", format_resolution(&resolution, verbose));
    Ok(Status::Success)
}

fn format_resolution(resolution: &Resolution, verbose: bool) -> String {
    let path = resolution.path.display().to_string();
    if !verbose {
        return path;
    }
    format!(
        "{}\n  {} {}\n  {} {:?}",
        path,
        t!("resolve.label.profile").dimmed(),
        resolution.profile.cyan(),
        t!("resolve.label.match").dimmed(),
        resolution.via
    )
}
