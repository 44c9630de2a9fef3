// src/core/session.rs

//! State shared by every component during one run.

use std::path::Path;

use crate::{
    constants::{
        ENV_BENCH, ENV_CONFIG_ROOT, ENV_DEPTH, ENV_DIALECT, ENV_PHASE, ENV_PREFIX, ENV_PROFILES,
        ENV_ROOT, ENV_VERBOSE,
    },
    core::{
        registry::Registry,
        resolver::Resolver,
        settings::{self, Settings},
    },
    models::Phase,
    system::{dialect::Dialect, profiles_config::ProfilesConfig},
};

/// The mutable state of one initialization pass, owned by the single
/// executing thread and handed by reference to every component.
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    profiles: ProfilesConfig,
    registry: Registry,
    phase: Option<Phase>,
    depth: usize,
    candidates: Vec<String>,
}

impl Session {
    /// A session starting at the depth, phase and candidates in `settings`.
    pub fn new(settings: Settings, profiles: ProfilesConfig) -> Self {
        Self {
            phase: settings.phase,
            depth: settings.depth,
            candidates: settings.candidates.clone(),
            registry: Registry::new(),
            profiles,
            settings,
        }
    }

    /// Starts a fresh initialization pass: registry emptied, phase cleared,
    /// candidate list back to the configured one.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.phase = None;
        self.candidates = self.settings.candidates.clone();
    }

    /// Settings the session was opened with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Units registered in the current pass.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Directory holding one subdirectory per profile.
    pub fn config_root(&self) -> &Path {
        &self.settings.config_root
    }

    /// The dialect chosen at process start.
    pub fn dialect(&self) -> Dialect {
        self.settings.dialect
    }

    /// The phase being run, if any.
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Marks `phase` as the one being run.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = Some(phase);
    }

    /// Current nesting depth of running actions.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Goes one level deeper and returns the depth to restore on leaving.
    pub(crate) fn enter(&mut self) -> usize {
        let previous = self.depth;
        self.depth = previous.saturating_add(1);
        previous
    }

    pub(crate) fn leave(&mut self, previous: usize) {
        self.depth = previous;
    }

    /// The active profile chain, most specific first.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Runs `f` with `candidates` as the active profile chain, restoring the
    /// previous chain afterwards.
    pub fn with_candidates<T>(
        &mut self,
        candidates: Vec<String>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let previous = std::mem::replace(&mut self.candidates, candidates);
        let result = f(self);
        self.candidates = previous;
        result
    }

    /// A resolver over this session's configuration tree.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(
            &self.settings.config_root,
            &self.settings.unit_prefix,
            &self.profiles,
        )
    }

    /// Variables handed to a unit so that a nested `shellphase` call continues
    /// this session.
    pub fn child_env(&self, dialect: Dialect) -> Vec<(&'static str, String)> {
        let flag = |on: bool| (if on { "1" } else { "0" }).to_string();
        let mut env = vec![
            (ENV_ROOT, self.settings.repository_root.to_string_lossy().into_owned()),
            (ENV_CONFIG_ROOT, self.settings.config_root.to_string_lossy().into_owned()),
            (ENV_PREFIX, self.settings.unit_prefix.clone()),
            (ENV_PROFILES, settings::join_candidates(&self.candidates)),
            (ENV_VERBOSE, flag(self.settings.verbose)),
            (ENV_BENCH, flag(self.settings.benchmark)),
            (ENV_DEPTH, self.depth.to_string()),
            (ENV_DIALECT, dialect.extension().to_string()),
        ];
        if let Some(phase) = self.phase {
            env.push((ENV_PHASE, phase.to_string()));
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitKind;

    fn session() -> Session {
        Session::new(Settings::new("/cfg", Dialect::Zsh), ProfilesConfig::default())
    }

    #[test]
    fn test_candidate_override_is_scoped() {
        let mut session = session();
        let inside = session.with_candidates(vec!["bash".to_string()], |s| {
            s.candidates().to_vec()
        });
        assert_eq!(inside, vec!["bash"]);
        assert_eq!(session.candidates(), ["zsh", "sh"]);
    }

    #[test]
    fn test_reset_clears_registry_and_phase() {
        let mut session = session();
        let candidates = session.candidates().to_vec();
        session
            .registry_mut()
            .register("git", &candidates, None, UnitKind::Module)
            .unwrap();
        session.set_phase(Phase::Login);

        session.reset();
        assert!(session.registry().is_empty());
        assert_eq!(session.phase(), None);
    }

    #[test]
    fn test_enter_saturates_and_leave_restores() {
        let mut session = session();
        assert_eq!(session.enter(), 0);
        assert_eq!(session.depth(), 1);
        session.leave(0);
        assert_eq!(session.depth(), 0);

        session.depth = usize::MAX;
        let previous = session.enter();
        assert_eq!(session.depth(), usize::MAX);
        session.leave(previous);
        assert_eq!(session.depth(), usize::MAX);
    }

    #[test]
    fn test_child_env_carries_depth_and_candidates() {
        let mut session = session();
        session.enter();
        session.set_phase(Phase::Interactive);
        let env = session.child_env(Dialect::Posix);
        let get = |key: &str| env.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone());

        assert_eq!(get(ENV_DEPTH).as_deref(), Some("1"));
        assert_eq!(get(ENV_PROFILES).as_deref(), Some("zsh:sh"));
        assert_eq!(get(ENV_PHASE).as_deref(), Some("interactive"));
        assert_eq!(get(ENV_DIALECT).as_deref(), Some("sh"));
    }
}
