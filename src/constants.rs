// src/constants.rs

//! Names, file conventions and environment variables shared across modules.

/// Name of the tool, used for the default repository directory and in hints.
pub const APP_NAME: &str = "shellphase";

/// Default character prepended to phase file names inside a unit directory.
pub const DEFAULT_UNIT_PREFIX: &str = "@";

/// File stem of the per-profile init declaration file.
pub const INIT_FILE_STEM: &str = "init";

/// Optional profile table at the configuration root.
pub const PROFILES_CONFIG_FILENAME: &str = "profiles.toml";

/// Separator of candidate-profile lists and phase lists.
pub const LIST_SEPARATOR: char = ':';

/// Phase-list token meaning "use the kind's default phases".
pub const DEFAULT_PHASES_SENTINEL: &str = "-";

/// Characters that may never appear in a unit name.
pub const RESERVED_NAME_CHARS: &[char] = &[' ', ':', ';'];

/// Declaration command registering a `module` unit.
pub const REGISTER_MODULE_COMMAND: &str = "register-module";

/// Declaration command registering a `manager` unit.
pub const REGISTER_MANAGER_COMMAND: &str = "register-manager";

/// Exit status recorded when a unit could not be started at all.
pub const SPAWN_FAILURE_STATUS: i32 = 127;

/// Deepest nesting accepted from `SHELLPHASE_DEPTH`. Beyond it a chain of
/// nested loads is treated as a cycle.
pub const MAX_DEPTH: usize = 256;

// --- Process-start configuration, also exported to running units ---

/// Repository root.
pub const ENV_ROOT: &str = "SHELLPHASE_ROOT";
/// Directory holding one sub-directory per profile.
pub const ENV_CONFIG_ROOT: &str = "SHELLPHASE_CONFIG_ROOT";
/// Phase file prefix.
pub const ENV_PREFIX: &str = "SHELLPHASE_PREFIX";
/// Colon-separated profile chain.
pub const ENV_PROFILES: &str = "SHELLPHASE_PROFILES";
/// Per-unit instrumentation lines.
pub const ENV_VERBOSE: &str = "SHELLPHASE_VERBOSE";
/// Elapsed time on instrumentation lines.
pub const ENV_BENCH: &str = "SHELLPHASE_BENCH";
/// Dialect of the calling shell.
pub const ENV_DIALECT: &str = "SHELLPHASE_DIALECT";
/// Nesting depth of the unit that started this process.
pub const ENV_DEPTH: &str = "SHELLPHASE_DEPTH";
/// Phase being run by the parent process.
pub const ENV_PHASE: &str = "SHELLPHASE_PHASE";
/// Path of the unit being run.
pub const ENV_UNIT: &str = "SHELLPHASE_UNIT";

/// Every variable set on behalf of a running unit.
pub const SESSION_ENV_VARS: &[&str] = &[
    ENV_ROOT,
    ENV_CONFIG_ROOT,
    ENV_PREFIX,
    ENV_PROFILES,
    ENV_VERBOSE,
    ENV_BENCH,
    ENV_DEPTH,
    ENV_DIALECT,
    ENV_PHASE,
    ENV_UNIT,
];
