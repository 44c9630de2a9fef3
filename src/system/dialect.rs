// src/system/dialect.rs

//! Shell dialects and the per-dialect text shellphase hands to a shell.

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// A shell name that maps to no supported dialect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown shell dialect '{0}'. Expected one of: sh, bash, zsh, ksh, fish.")]
pub struct UnknownDialect(pub String);

/// A shell language whose quoting and globbing rules a unit is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// POSIX `sh`.
    Posix,
    /// GNU bash.
    Bash,
    /// zsh.
    Zsh,
    /// KornShell.
    Ksh,
    /// fish.
    Fish,
}

/// Temporary emulation entered by the active shell to run a foreign unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompatMode {
    /// zsh `emulate <mode>`, with `sh` or `ksh` as the mode.
    ZshEmulate(&'static str),
    /// bash `set -o posix`.
    BashPosix,
}

impl CompatMode {
    /// Line entering the mode at the top of a fresh interpreter.
    pub fn preamble(self) -> String {
        match self {
            Self::ZshEmulate(mode) => format!("emulate {}", mode),
            Self::BashPosix => "set -o posix".to_string(),
        }
    }
}

/// How one action is to be run: which interpreter, in which mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    /// Interpreter that runs the unit.
    pub dialect: Dialect,
    /// Emulation entered around the unit, if any.
    pub compat: Option<CompatMode>,
}

impl Invocation {
    /// `dialect` running its own units, no emulation.
    pub fn native(dialect: Dialect) -> Self {
        Self {
            dialect,
            compat: None,
        }
    }
}

impl Dialect {
    /// Parses a shell name such as `bash` or `dash`.
    pub fn from_name(name: &str) -> Result<Self, UnknownDialect> {
        match name {
            "sh" | "posix" | "dash" | "ash" => Ok(Self::Posix),
            "bash" => Ok(Self::Bash),
            "zsh" => Ok(Self::Zsh),
            "ksh" | "mksh" | "ksh93" => Ok(Self::Ksh),
            "fish" => Ok(Self::Fish),
            other => Err(UnknownDialect(other.to_string())),
        }
    }

    /// Maps a unit file extension to its dialect.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "sh" => Some(Self::Posix),
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "ksh" => Some(Self::Ksh),
            "fish" => Some(Self::Fish),
            _ => None,
        }
    }

    /// The dialect implied by a unit file's extension, if it is a known one.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Extension and built-in profile name of the dialect.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Posix => "sh",
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Ksh => "ksh",
            Self::Fish => "fish",
        }
    }

    /// Program started to run a unit of this dialect.
    pub fn interpreter(self) -> &'static str {
        self.extension()
    }

    /// Whether the shell has a sub-second in-process clock
    /// (`EPOCHREALTIME` in bash/zsh, `SECONDS` as float in ksh).
    pub fn has_monotonic_clock(self) -> bool {
        matches!(self, Self::Bash | Self::Zsh | Self::Ksh)
    }

    /// Decides how a unit written in `target` runs while `self` is the active
    /// dialect.
    pub fn invocation(self, target: Option<Self>) -> Invocation {
        let target = match target {
            Some(t) if t != self => t,
            _ => return Invocation::native(self),
        };
        match (self, target) {
            (Self::Zsh, Self::Posix) => Invocation {
                dialect: Self::Zsh,
                compat: Some(CompatMode::ZshEmulate("sh")),
            },
            (Self::Zsh, Self::Bash | Self::Ksh) => Invocation {
                dialect: Self::Zsh,
                compat: Some(CompatMode::ZshEmulate("ksh")),
            },
            (Self::Bash, Self::Posix) => Invocation {
                dialect: Self::Bash,
                compat: Some(CompatMode::BashPosix),
            },
            (Self::Ksh, Self::Posix) => Invocation::native(Self::Ksh),
            _ => Invocation::native(target),
        }
    }

    /// Single-quotes `value` for this dialect.
    pub fn quote(self, value: &str) -> String {
        match self {
            Self::Fish => format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'")),
            _ => format!("'{}'", value.replace('\'', "'\\''")),
        }
    }

    /// Command sourcing the file named by the environment variable `var`.
    pub fn source_from_env(self, var: &str) -> String {
        match self {
            Self::Fish => format!("source ${}", var),
            _ => format!(". \"${}\"", var),
        }
    }

    /// Statement exporting every `(name, value)` pair to child processes.
    pub fn export_vars<K, V>(self, vars: &[(K, V)]) -> String
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        match self {
            Self::Fish => vars
                .iter()
                .map(|(k, v)| format!("set -gx {} {}", k.as_ref(), self.quote(v.as_ref())))
                .collect::<Vec<_>>()
                .join("; "),
            _ => {
                let pairs: Vec<String> = vars
                    .iter()
                    .map(|(k, v)| format!("{}={}", k.as_ref(), self.quote(v.as_ref())))
                    .collect();
                format!("export {}", pairs.join(" "))
            }
        }
    }

    /// Statement removing every variable in `names`.
    pub fn unset_vars(self, names: &[&str]) -> String {
        match self {
            Self::Fish => names
                .iter()
                .map(|name| format!("set -e {}", name))
                .collect::<Vec<_>>()
                .join("; "),
            _ => format!("unset {}", names.join(" ")),
        }
    }

    /// A line that, evaluated by a shell of this dialect, runs `path` as
    /// `invocation` says.
    pub fn emit_line(self, invocation: &Invocation, path: &Path) -> String {
        let quoted = self.quote(&path.to_string_lossy());
        if invocation.dialect != self {
            return format!("{} {}", invocation.dialect.interpreter(), quoted);
        }
        match (self, invocation.compat) {
            (Self::Zsh, Some(CompatMode::ZshEmulate(mode))) => {
                format!("() {{ emulate -L {}; . {}; }}", mode, quoted)
            }
            (_, Some(CompatMode::BashPosix)) => {
                format!("set -o posix; . {}; set +o posix", quoted)
            }
            (Self::Fish, _) => format!("source {}", quoted),
            _ => format!(". {}", quoted),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
