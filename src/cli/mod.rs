// src/cli/mod.rs

//! Command-line surface: global flags, the command table and the handlers.

use clap::Parser;

use crate::{
    cli::dispatcher::DispatchError,
    core::{
        loader::LoadError,
        paths,
        registry::ValidationError,
        settings::{self, Settings, SettingsError},
    },
    system::dialect::Dialect,
};

pub mod dispatcher;
pub mod handlers;

/// Renders the semantic tags of the help template (`<title>`, `<cmd>`, ...)
/// as ANSI styles, or strips them when colors are off.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();
    let style = |code: &'static str| if use_colors { code } else { "" };

    let title = style("\x1b[1;33m"); // Bold Yellow
    let hl = style("\x1b[1;36m"); // Bold Cyan
    let cmd = style("\x1b[36m"); // Cyan
    let group = style("\x1b[1;32m"); // Bold Green
    let dim = style("\x1b[2m");
    let reset = style("\x1b[0m");

    let formatted = t!("cli.help.template")
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted.into_boxed_str())
}

/// shellphase: phase-driven loader for shell configuration units.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Print one line per executed unit on stderr.
    #[arg(long, short)]
    pub verbose: bool,

    /// Add the elapsed time to each per-unit line.
    #[arg(long)]
    pub bench: bool,

    /// Colon-separated fallback chain of profiles, most specific first.
    #[arg(long, value_name = "LIST")]
    pub profiles: Option<String>,

    /// Character(s) prepended to phase file names.
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Directory holding one sub-directory per profile.
    #[arg(long, value_name = "DIR")]
    pub config_root: Option<String>,

    /// Dialect of the calling shell.
    #[arg(long, value_name = "NAME")]
    pub dialect: Option<String>,

    /// The command and its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Applies the global flags on top of settings read from the environment.
    pub fn apply(&self, settings: &mut Settings) -> Result<(), SettingsError> {
        if let Some(name) = &self.dialect {
            let dialect = Dialect::from_name(name.trim())?;
            // A chain that was only the old dialect's default follows the new one.
            if settings.candidates == settings::default_candidates(settings.dialect) {
                settings.candidates = settings::default_candidates(dialect);
            }
            settings.dialect = dialect;
        }
        if let Some(root) = &self.config_root {
            settings.config_root = paths::expand_path(root)?;
        }
        if let Some(prefix) = &self.prefix {
            settings.set_prefix(prefix.clone())?;
        }
        if let Some(list) = &self.profiles {
            settings.candidates = settings::parse_candidates(list);
        }
        settings.verbose |= self.verbose;
        settings.benchmark |= self.bench;
        Ok(())
    }
}

/// Aggregate outcome of a command. Failed units are not errors: the command
/// completes and reports a failure status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every unit ran cleanly.
    Success,
    /// At least one unit or declaration failed.
    Failure,
}

impl Status {
    /// `Failure` when `failed` holds.
    pub fn from_failed(failed: bool) -> Self {
        if failed { Self::Failure } else { Self::Success }
    }

    /// `Failure` if either side failed.
    pub fn and(self, other: Self) -> Self {
        Self::from_failed(self == Self::Failure || other == Self::Failure)
    }

    /// Process exit code for this status.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

/// Errors caused by how the tool was invoked rather than by the configuration.
pub fn is_usage_error(error: &anyhow::Error) -> bool {
    error.is::<DispatchError>()
        || error.is::<ValidationError>()
        || matches!(error.downcast_ref::<LoadError>(), Some(LoadError::Invalid(_)))
}
