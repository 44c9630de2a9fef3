// src/cli/dispatcher.rs

//! The command table and the routing of arguments to handlers.

use anyhow::Result;
use thiserror::Error;

use crate::{
    cli::{Status, handlers},
    core::settings::Settings,
};

/// The command word is missing or not in the table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Nothing followed the global flags.
    #[error("No command given.")]
    MissingCommand,
    /// The command word matches no command or alias.
    #[error("Unknown command '{0}'.")]
    UnknownCommand(String),
}

/// A command, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, Settings) -> Result<Status>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &["phase"],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "startup",
        aliases: &[],
        handler: handlers::startup::handle,
    },
    CommandDefinition {
        name: "load",
        aliases: &[],
        handler: handlers::load::handle,
    },
    CommandDefinition {
        name: "resolve",
        aliases: &[],
        handler: handlers::resolve::handle,
    },
];

fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `<command> [args...]` to its handler.
pub fn dispatch(all_args: Vec<String>, settings: Settings) -> Result<Status> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(name) = args.next() else {
        return Err(DispatchError::MissingCommand.into());
    };
    let command = find_command(&name).ok_or_else(|| DispatchError::UnknownCommand(name.clone()))?;
    (command.handler)(args.collect(), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::dialect::Dialect;

    #[test]
    fn test_aliases_resolve_to_their_command() {
        assert_eq!(find_command("phase").map(|c| c.name), Some("run"));
        assert_eq!(find_command("ls").map(|c| c.name), Some("list"));
        assert!(find_command("boot").is_none());
    }

    #[test]
    fn test_unknown_and_missing_commands_are_errors() {
        let settings = Settings::new("/cfg", Dialect::Posix);
        let err = dispatch(vec!["boot".to_string()], settings.clone()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DispatchError>(),
            Some(&DispatchError::UnknownCommand("boot".to_string()))
        );
        let err = dispatch(Vec::new(), settings).unwrap_err();
        assert_eq!(err.downcast_ref::<DispatchError>(), Some(&DispatchError::MissingCommand));
    }
}
