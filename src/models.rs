// src/models.rs

//! Phases, unit kinds and the records passed between the engine's parts.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::LIST_SEPARATOR;

/// A phase tag that is not one of the four known ones.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown phase '{0}'. Expected one of: env, login, interactive, logout.")]
pub struct UnknownPhase(pub String);

// --- PHASES ---

/// One of the four lifecycle tags gating when a unit runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Environment setup, run by every shell that reads its configuration.
    Env,
    /// Login shells only.
    Login,
    /// Interactive shells only.
    Interactive,
    /// Shutdown of a login shell.
    Logout,
}

impl Phase {
    /// All phases, in declaration order.
    pub const ALL: [Self; 4] = [Self::Env, Self::Login, Self::Interactive, Self::Logout];

    /// The forward chain followed at shell startup. `Logout` is a separate entry point.
    pub const STARTUP_CHAIN: [Self; 3] = [Self::Env, Self::Login, Self::Interactive];

    /// Tag used in declarations, file names and the environment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Login => "login",
            Self::Interactive => "interactive",
            Self::Logout => "logout",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Env => 1,
            Self::Login => 1 << 1,
            Self::Interactive => 1 << 2,
            Self::Logout => 1 << 3,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| UnknownPhase(s.to_string()))
    }
}

/// A set of phases, stored as a small bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PhaseSet(u8);

impl PhaseSet {
    /// No phase at all.
    pub const EMPTY: Self = Self(0);

    /// Every phase.
    pub fn all() -> Self {
        Phase::ALL.into_iter().collect()
    }

    /// A set holding just `phase`.
    pub fn only(phase: Phase) -> Self {
        Self(phase.bit())
    }

    /// Adds `phase` to the set.
    pub fn insert(&mut self, phase: Phase) {
        self.0 |= phase.bit();
    }

    /// Whether `phase` is in the set.
    pub fn contains(self, phase: Phase) -> bool {
        self.0 & phase.bit() != 0
    }

    /// Whether the set holds no phase.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the contained phases in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Phase> {
        Phase::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<Phase> for PhaseSet {
    fn from_iter<I: IntoIterator<Item = Phase>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for phase in iter {
            set.insert(phase);
        }
        set
    }
}

impl fmt::Display for PhaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(Phase::as_str)
            .collect::<Vec<_>>()
            .join(&LIST_SEPARATOR.to_string());
        f.write_str(&joined)
    }
}

impl Serialize for PhaseSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for phase in self.iter() {
            seq.serialize_element(&phase)?;
        }
        seq.end()
    }
}

// --- UNITS ---

/// Determines default phases and relative execution priority of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Ordinary configuration unit, tagged with every phase by default.
    Module,
    /// Plugin or package manager, interactive-only by default. Runs first.
    Manager,
}

impl UnitKind {
    /// Execution priority inside a phase: managers run before modules.
    pub const EXECUTION_ORDER: [Self; 2] = [Self::Manager, Self::Module];

    /// Phases a unit of this kind is tagged with when the declaration omits them.
    pub fn default_phases(self) -> PhaseSet {
        match self {
            Self::Module => PhaseSet::all(),
            Self::Manager => PhaseSet::only(Phase::Interactive),
        }
    }

    /// Lowercase name used in listings and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Manager => "manager",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared unit. Immutable once the registry has accepted it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UnitRegistration {
    /// Unit name, also the name of its directory under each profile.
    pub name: String,
    /// Profiles consulted, in order, when resolving this unit.
    pub candidates: Vec<String>,
    /// Phases the unit runs in.
    pub phases: PhaseSet,
    /// Module or manager.
    pub kind: UnitKind,
}

/// A resolved unit file waiting to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredAction {
    /// The file to source.
    pub path: PathBuf,
}

impl DeferredAction {
    /// Wraps a resolved path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_parsing_accepts_only_known_tags() {
        assert_eq!("login".parse::<Phase>().unwrap(), Phase::Login);
        assert_eq!(
            "Login".parse::<Phase>().unwrap_err(),
            UnknownPhase("Login".to_string())
        );
    }

    #[test]
    fn test_phase_set_iterates_in_declaration_order() {
        let set: PhaseSet = [Phase::Logout, Phase::Env].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Phase::Env, Phase::Logout]);
        assert_eq!(set.to_string(), "env:logout");
    }

    #[test]
    fn test_kind_defaults() {
        assert_eq!(UnitKind::Module.default_phases(), PhaseSet::all());
        let manager = UnitKind::Manager.default_phases();
        assert!(manager.contains(Phase::Interactive));
        assert!(!manager.contains(Phase::Env));
        assert!(!manager.contains(Phase::Login));
        assert!(!manager.contains(Phase::Logout));
    }

    #[test]
    fn test_phase_set_serializes_as_list() {
        let set: PhaseSet = [Phase::Env, Phase::Interactive].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            r#"["env","interactive"]"#
        );
    }
}
