// src/system/runner.rs

//! The two ways a unit gets run: in a child interpreter, or as a line for
//! the calling shell to `eval`.

use std::process::{Command, Stdio};

use crate::{
    constants::{ENV_UNIT, SESSION_ENV_VARS},
    core::{
        executor::{ExecutionError, UnitRunner},
        session::Session,
    },
    models::DeferredAction,
    system::dialect::{Dialect, Invocation},
};

/// Runs every unit in a fresh interpreter of its invocation dialect.
///
/// The session state is exported as `SHELLPHASE_*` variables, so a unit that
/// calls `shellphase load <unit>` starts a nested process that carries on at
/// the right depth, phase and profile chain.
#[derive(Debug, Default)]
pub struct ShellRunner;

impl ShellRunner {
    /// A runner spawning one interpreter per action.
    pub fn new() -> Self {
        Self
    }

    /// `-c` script: optional compat preamble, then a source of
    /// `$SHELLPHASE_UNIT`.
    fn script(invocation: &Invocation) -> String {
        let source = invocation.dialect.source_from_env(ENV_UNIT);
        match invocation.compat {
            Some(compat) => format!("{}\n{}", compat.preamble(), source),
            None => source,
        }
    }
}

impl UnitRunner for ShellRunner {
    fn run(
        &mut self,
        session: &mut Session,
        action: &DeferredAction,
        invocation: &Invocation,
    ) -> Result<i32, ExecutionError> {
        let unit_path = dunce::simplified(&action.path);
        let interpreter = invocation.dialect.interpreter();
        log::trace!("Spawning {} for '{}'", interpreter, unit_path.display());

        let status = Command::new(interpreter)
            .arg("-c")
            .arg(Self::script(invocation))
            .envs(session.child_env(invocation.dialect))
            .env(ENV_UNIT, unit_path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ExecutionError::Spawn {
                path: unit_path.display().to_string(),
                source,
            })?;

        status
            .code()
            .ok_or_else(|| ExecutionError::Signalled(unit_path.display().to_string()))
    }
}

/// Collects one sourcing line per action instead of running anything.
/// The calling shell `eval`s the result, so units act on its own state.
///
/// Each line first exports the session variables the unit would have seen
/// under [`ShellRunner`]. The script ends by putting back the values the
/// calling shell had before, or unsetting those it did not have.
#[derive(Debug)]
pub struct EmitRunner {
    script: String,
    outer: Vec<(&'static str, Option<String>)>,
    dialect: Option<Dialect>,
}

impl EmitRunner {
    /// An emitter restoring the `SHELLPHASE_*` values of this process.
    pub fn new() -> Self {
        Self::with_outer_env(|key| std::env::var(key).ok())
    }

    /// An emitter restoring the values `lookup` reports for the session
    /// variables.
    pub fn with_outer_env(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            script: String::new(),
            outer: SESSION_ENV_VARS
                .iter()
                .map(|&name| (name, lookup(name)))
                .collect(),
            dialect: None,
        }
    }

    /// The script to `eval`. Empty when no action ran.
    pub fn into_script(self) -> String {
        let mut script = self.script;
        if let Some(dialect) = self.dialect {
            script.push_str(&restore_line(dialect, &self.outer));
            script.push('\n');
        }
        script
    }
}

impl Default for EmitRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRunner for EmitRunner {
    fn run(
        &mut self,
        session: &mut Session,
        action: &DeferredAction,
        invocation: &Invocation,
    ) -> Result<i32, ExecutionError> {
        let dialect = session.dialect();
        self.dialect = Some(dialect);

        let unit_path = dunce::simplified(&action.path);
        let mut env = session.child_env(invocation.dialect);
        env.push((ENV_UNIT, unit_path.to_string_lossy().into_owned()));

        self.script.push_str(&dialect.export_vars(&env));
        self.script.push_str("; ");
        self.script.push_str(&dialect.emit_line(invocation, &action.path));
        self.script.push('\n');
        Ok(0)
    }
}

fn restore_line(dialect: Dialect, outer: &[(&'static str, Option<String>)]) -> String {
    let kept: Vec<(&str, &str)> = outer
        .iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (*name, v)))
        .collect();
    let removed: Vec<&str> = outer
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();

    let mut statements = Vec::new();
    if !kept.is_empty() {
        statements.push(dialect.export_vars(&kept));
    }
    if !removed.is_empty() {
        statements.push(dialect.unset_vars(&removed));
    }
    statements.join("; ")
}
