// src/core/orchestrator.rs

//! Initialization and phase driving for one session.

use std::{fs, path::PathBuf};
use thiserror::Error;

use crate::{
    core::{
        declaration::{self, Declaration, DeclarationError},
        executor::UnitRunner,
        resolver::{Lookup, NotFound},
        scheduler::{BatchReport, Scheduler},
        session::Session,
    },
    models::{Phase, UnitKind},
};

/// Failures that abort an initialization pass.
#[derive(Error, Debug)]
pub enum InitError {
    /// No candidate profile has an init file.
    #[error(transparent)]
    NotFound(#[from] NotFound),
    /// The init file exists but could not be read.
    #[error("Could not read init file '{path}': {source}")]
    Io {
        /// Path of the init file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result of reading the init declarations into the registry.
#[derive(Debug)]
pub struct InitReport {
    /// The init file that was read.
    pub path: PathBuf,
    /// Number of units registered.
    pub registered: usize,
    /// Declarations that were reported and skipped.
    pub rejected: Vec<DeclarationError>,
}

impl InitReport {
    /// Whether any declaration was rejected.
    pub fn failed(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Result of one lifecycle phase.
#[derive(Debug)]
pub struct PhaseReport {
    /// The phase that ran.
    pub phase: Phase,
    /// Outcome of its actions.
    pub batch: BatchReport,
}

impl PhaseReport {
    /// Whether any action of the phase failed.
    pub fn failed(&self) -> bool {
        self.batch.failed()
    }
}

/// Starts a new initialization pass: resets the session, resolves the init
/// file along the session's profile chain and registers what it declares.
///
/// # Errors
/// `InitError::NotFound` when no candidate profile has an init file. This is
/// the one resolution miss that is fatal for the process.
pub fn initialize(session: &mut Session) -> Result<InitReport, InitError> {
    session.reset();
    let resolution = session.resolver().resolve(&Lookup::Init, session.candidates())?;
    let content = fs::read_to_string(&resolution.path).map_err(|source| InitError::Io {
        path: resolution.path.display().to_string(),
        source,
    })?;

    let (declarations, mut rejected) = declaration::parse_declarations(&content);
    let registered = register_declarations(session, declarations, &mut rejected);
    for error in &rejected {
        log::warn!("{}: {}", resolution.path.display(), error);
    }
    log::debug!(
        "Registered {} unit(s) from '{}'",
        registered,
        resolution.path.display()
    );

    Ok(InitReport {
        path: resolution.path,
        registered,
        rejected,
    })
}

/// Registers each declaration against the session's candidates. A declaration
/// the registry refuses is added to `rejected`. Returns how many registered.
fn register_declarations(
    session: &mut Session,
    declarations: Vec<Declaration>,
    rejected: &mut Vec<DeclarationError>,
) -> usize {
    let candidates = session.candidates().to_vec();
    let mut registered = 0;
    for decl in declarations {
        match session
            .registry_mut()
            .register(&decl.name, &candidates, decl.phases, decl.kind)
        {
            Ok(_) => registered += 1,
            Err(source) => rejected.push(DeclarationError::Invalid {
                line: decl.line,
                source,
            }),
        }
    }
    registered
}

/// Drives one phase: resolves every unit tagged with it (managers first, then
/// modules, each in registration order), schedules the hits and drains them.
/// Units with no matching file are skipped silently.
pub fn run_phase(
    session: &mut Session,
    runner: &mut dyn UnitRunner,
    phase: Phase,
) -> PhaseReport {
    session.set_phase(phase);
    let mut scheduler = Scheduler::new();

    {
        let resolver = session.resolver();
        for kind in UnitKind::EXECUTION_ORDER {
            for unit in session.registry().tagged(kind, phase) {
                let lookup = Lookup::Module {
                    unit: &unit.name,
                    phase,
                };
                match resolver.resolve(&lookup, &unit.candidates) {
                    Ok(resolution) => scheduler.schedule(resolution.path),
                    Err(_) => log::trace!("No {} file for {} '{}'", phase, kind, unit.name),
                }
            }
        }
    }

    log::debug!("Phase '{}': {} action(s) scheduled", phase, scheduler.len());
    PhaseReport {
        phase,
        batch: scheduler.drain(session, runner),
    }
}

/// Runs the startup chain `env -> login -> interactive`, leaving out the
/// phases in `skip`. Every phase runs even if an earlier one failed.
pub fn run_startup(
    session: &mut Session,
    runner: &mut dyn UnitRunner,
    skip: &[Phase],
) -> Vec<PhaseReport> {
    Phase::STARTUP_CHAIN
        .into_iter()
        .filter(|phase| {
            let skipped = skip.contains(phase);
            if skipped {
                log::debug!("Skipping phase '{}'", phase);
            }
            !skipped
        })
        .map(|phase| run_phase(session, runner, phase))
        .collect()
}
