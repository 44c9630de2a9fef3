// src/core/registry.rs

//! The ordered list of unit declarations for one initialization pass.

use thiserror::Error;

use crate::{
    constants::{DEFAULT_PHASES_SENTINEL, LIST_SEPARATOR, RESERVED_NAME_CHARS},
    models::{Phase, PhaseSet, UnitKind, UnitRegistration, UnknownPhase},
};

/// A unit name or phase list that cannot be registered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The unit name is empty.
    #[error("A unit name is required.")]
    EmptyName,
    /// The unit name holds a space, colon or semicolon.
    #[error("Unit name '{name}' contains the reserved character '{found}'.")]
    ReservedCharacter {
        /// The rejected name.
        name: String,
        /// First reserved character found in it.
        found: char,
    },
    /// A phase list names an unknown phase.
    #[error(transparent)]
    UnknownPhase(#[from] UnknownPhase),
    /// A phase list made only of separators.
    #[error("Phase list '{0}' names no phase.")]
    EmptyPhaseList(String),
}

/// Ordered declarations of one initialization pass.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    entries: Vec<UnitRegistration>,
}

/// Read-only view of the registry, grouped by kind in execution order.
#[derive(Debug)]
pub struct Listing<'a> {
    /// Manager units, in registration order.
    pub managers: Vec<&'a UnitRegistration>,
    /// Module units, in registration order.
    pub modules: Vec<&'a UnitRegistration>,
}

impl<'a> Listing<'a> {
    /// Both groups, managers first.
    pub fn groups(&self) -> [(UnitKind, &[&'a UnitRegistration]); 2] {
        [
            (UnitKind::Manager, self.managers.as_slice()),
            (UnitKind::Module, self.modules.as_slice()),
        ]
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a registration and returns a copy of it. `phases: None`
    /// applies the kind's default.
    ///
    /// # Errors
    /// Returns a `ValidationError` for an empty name or one containing a space,
    /// colon or semicolon. The registry is left untouched in that case.
    pub fn register(
        &mut self,
        name: &str,
        candidates: &[String],
        phases: Option<PhaseSet>,
        kind: UnitKind,
    ) -> Result<UnitRegistration, ValidationError> {
        validate_name(name)?;
        let phases = match phases {
            Some(set) if !set.is_empty() => set,
            _ => kind.default_phases(),
        };
        log::debug!(
            "Registering {} '{}' for [{}] with profiles [{}]",
            kind,
            name,
            phases,
            candidates.join(":")
        );
        let registration = UnitRegistration {
            name: name.to_string(),
            candidates: candidates.to_vec(),
            phases,
            kind,
        };
        self.entries.push(registration.clone());
        Ok(registration)
    }

    /// Drops every registration.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Every registration, grouped by kind.
    pub fn list(&self) -> Listing<'_> {
        let (managers, modules): (Vec<_>, Vec<_>) = self
            .entries
            .iter()
            .partition(|e| e.kind == UnitKind::Manager);
        Listing { managers, modules }
    }

    /// Registrations of `kind` tagged with `phase`, in registration order.
    pub fn tagged(
        &self,
        kind: UnitKind,
        phase: Phase,
    ) -> impl Iterator<Item = &UnitRegistration> {
        self.entries
            .iter()
            .filter(move |e| e.kind == kind && e.phases.contains(phase))
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rejects empty names and names holding a reserved character.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if let Some(found) = name.chars().find(|c| RESERVED_NAME_CHARS.contains(c)) {
        return Err(ValidationError::ReservedCharacter {
            name: name.to_string(),
            found,
        });
    }
    Ok(())
}

/// Parses a colon-separated phase list. `-` or an empty string mean
/// "kind default" and yield `None`.
pub fn parse_phase_list(list: &str) -> Result<Option<PhaseSet>, ValidationError> {
    let list = list.trim();
    if list.is_empty() || list == DEFAULT_PHASES_SENTINEL {
        return Ok(None);
    }
    let mut set = PhaseSet::EMPTY;
    for part in list.split(LIST_SEPARATOR).filter(|p| !p.is_empty()) {
        set.insert(part.parse::<Phase>()?);
    }
    if set.is_empty() {
        return Err(ValidationError::EmptyPhaseList(list.to_string()));
    }
    Ok(Some(set))
}
