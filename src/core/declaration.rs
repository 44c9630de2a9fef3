// src/core/declaration.rs

//! Reads unit declarations out of a profile's init file.
//!
//! The init file is a plain shell script; only its `register-module` and
//! `register-manager` lines matter here:
//!
//! ```sh
//! register-manager zinit
//! register-module path env git - prompt interactive:logout
//! ```
//!
//! Every other line is ignored.

use thiserror::Error;

use crate::{
    constants::{
        DEFAULT_PHASES_SENTINEL, LIST_SEPARATOR, REGISTER_MANAGER_COMMAND,
        REGISTER_MODULE_COMMAND,
    },
    core::registry::{self, ValidationError},
    models::{Phase, PhaseSet, UnitKind},
};

/// A declaration line, or one pair on it, that could not be registered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// The line has an unterminated quote.
    #[error("line {line}: unbalanced quoting")]
    Tokenize {
        /// 1-based line number.
        line: usize,
    },
    /// A register command with no unit after it.
    #[error("line {line}: '{command}' needs at least one unit name")]
    MissingName {
        /// 1-based line number.
        line: usize,
        /// The command as written.
        command: String,
    },
    /// A pair whose name or phase list failed validation.
    #[error("line {line}: {source}")]
    Invalid {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the pair.
        #[source]
        source: ValidationError,
    },
}

/// One `(name, phase-list)` pair taken from a declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Which register command declared it.
    pub kind: UnitKind,
    /// Unit name.
    pub name: String,
    /// `None` when the phase list was omitted or given as `-`.
    pub phases: Option<PhaseSet>,
    /// 1-based line number in the init file.
    pub line: usize,
}

/// Collects every valid declaration and every rejected one.
/// A bad pair never hides the valid pairs around it.
pub fn parse_declarations(source: &str) -> (Vec<Declaration>, Vec<DeclarationError>) {
    let mut declarations = Vec::new();
    let mut errors = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some(tokens) = shlex::split(trimmed) else {
            errors.push(DeclarationError::Tokenize { line });
            continue;
        };
        let mut tokens = tokens.into_iter().peekable();
        let kind = match tokens.next().as_deref() {
            Some(REGISTER_MODULE_COMMAND) => UnitKind::Module,
            Some(REGISTER_MANAGER_COMMAND) => UnitKind::Manager,
            _ => {
                log::trace!("Ignoring non-declaration line {}: {}", line, trimmed);
                continue;
            }
        };

        if tokens.peek().is_none() {
            errors.push(DeclarationError::MissingName {
                line,
                command: command_name(kind).to_string(),
            });
            continue;
        }

        while let Some(name) = tokens.next() {
            let phase_token = tokens.next_if(|t| is_phase_list(t));
            let parsed = registry::validate_name(&name).and_then(|()| {
                phase_token
                    .as_deref()
                    .map_or(Ok(None), registry::parse_phase_list)
            });
            match parsed {
                Ok(phases) => declarations.push(Declaration {
                    kind,
                    name,
                    phases,
                    line,
                }),
                Err(source) => errors.push(DeclarationError::Invalid { line, source }),
            }
        }
    }

    (declarations, errors)
}

/// A token following a unit name is its phase list when it is the `-`
/// sentinel, contains the list separator, or is a bare phase name.
fn is_phase_list(token: &str) -> bool {
    token == DEFAULT_PHASES_SENTINEL
        || token.contains(LIST_SEPARATOR)
        || token.parse::<Phase>().is_ok()
}

fn command_name(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::Module => REGISTER_MODULE_COMMAND,
        UnitKind::Manager => REGISTER_MANAGER_COMMAND,
    }
}
