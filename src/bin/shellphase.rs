// src/bin/shellphase.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use shellphase::{
    cli::{self, Cli, Status, dispatcher},
    core::settings::Settings,
    t,
};

/// Sets up logging, layers the global flags over the environment, dispatches,
/// and turns the outcome into the process exit status.
fn main() {
    env_logger::init();

    match run_cli(Cli::parse()) {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(e) => {
            if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("\n{}: {}", "Error".red().bold(), e);
            if cli::is_usage_error(&e) {
                eprintln!("{}", t!("cli.hint.help").dimmed());
            }
            std::process::exit(Status::Failure.exit_code());
        }
    }
}

fn run_cli(cli: Cli) -> Result<Status> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut settings = Settings::from_env()?;
    cli.apply(&mut settings)?;
    dispatcher::dispatch(cli.args, settings)
}
