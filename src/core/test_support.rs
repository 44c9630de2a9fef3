// src/core/test_support.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{
    core::{
        executor::{ExecutionError, UnitRunner},
        loader::{self, LoadOverride},
        session::Session,
    },
    models::DeferredAction,
    system::dialect::Invocation,
};

/// What the runner saw for one action.
#[derive(Debug, Clone)]
pub(crate) struct RunRecord {
    pub path: PathBuf,
    pub depth: usize,
    pub invocation: Invocation,
    pub candidates: Vec<String>,
}

/// In-memory runner: records every action and replays scripted outcomes
/// instead of spawning a shell.
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    pub runs: Vec<RunRecord>,
    statuses: HashMap<PathBuf, i32>,
    spawn_failures: Vec<PathBuf>,
    nested: HashMap<PathBuf, Vec<(String, Option<LoadOverride>)>>,
}

impl RecordingRunner {
    pub fn with_status(mut self, path: &Path, status: i32) -> Self {
        self.statuses.insert(path.to_path_buf(), status);
        self
    }

    pub fn with_spawn_failure(mut self, path: &Path) -> Self {
        self.spawn_failures.push(path.to_path_buf());
        self
    }

    /// While `path` runs, it loads `unit` as a unit script would.
    pub fn with_nested_load(
        mut self,
        path: &Path,
        unit: &str,
        override_: Option<LoadOverride>,
    ) -> Self {
        self.nested
            .entry(path.to_path_buf())
            .or_default()
            .push((unit.to_string(), override_));
        self
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.runs.iter().map(|r| r.path.clone()).collect()
    }
}

impl UnitRunner for RecordingRunner {
    fn run(
        &mut self,
        session: &mut Session,
        action: &DeferredAction,
        invocation: &Invocation,
    ) -> Result<i32, ExecutionError> {
        self.runs.push(RunRecord {
            path: action.path.clone(),
            depth: session.depth(),
            invocation: *invocation,
            candidates: session.candidates().to_vec(),
        });

        if self.spawn_failures.contains(&action.path) {
            return Err(ExecutionError::Spawn {
                path: action.path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no interpreter"),
            });
        }

        let nested = self.nested.get(&action.path).cloned().unwrap_or_default();
        let mut status = self.statuses.get(&action.path).copied().unwrap_or(0);
        for (unit, override_) in nested {
            match loader::load(session, self, &unit, override_) {
                Ok(report) if report.failed() && status == 0 => status = 1,
                Ok(_) => {}
                Err(_) if status == 0 => status = 1,
                Err(_) => {}
            }
        }
        Ok(status)
    }
}
