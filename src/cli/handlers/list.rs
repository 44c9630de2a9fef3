// src/cli/handlers/list.rs

//! `list`: the units registered by the init file.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::{Status, handlers::commons},
    core::{registry::Listing, settings::Settings},
    models::{UnitKind, UnitRegistration},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Reads the init declarations and lists the registered units."
)]
struct ListArgs {
    /// Print the listing as JSON.
    #[arg(long)]
    json: bool,
}

/// Handles `shellphase list`.
pub fn handle(args: Vec<String>, settings: Settings) -> Result<Status> {
    let list_args = ListArgs::try_parse_from(&args)?;

    let mut session = commons::open_session(settings)?;
    let init = commons::initialize(&mut session)?;
    let listing = session.registry().list();

    if list_args.json {
        println!("{}", render_json(&listing)?);
    } else {
        print_table(&listing);
    }

    Ok(Status::from_failed(init.failed()))
}

fn render_json(listing: &Listing<'_>) -> Result<String> {
    let value = serde_json::json!({
        "managers": listing.managers,
        "modules": listing.modules,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn print_table(listing: &Listing<'_>) {
    let width = listing
        .groups()
        .iter()
        .flat_map(|(_, group)| group.iter().map(|u| u.name.len()))
        .max()
        .unwrap_or(0);

    for (kind, group) in listing.groups() {
        let header = match kind {
            UnitKind::Manager => t!("list.header.managers"),
            UnitKind::Module => t!("list.header.modules"),
        };
        println!("{}", header.yellow().bold());
        if group.is_empty() {
            println!("  {}", t!("list.info.none").dimmed());
            continue;
        }
        for unit in group {
            println!("{}", format_row(unit, width));
        }
    }
}

/// `  <name>  <candidates>  <phases>`, names padded to `width`.
fn format_row(unit: &UnitRegistration, width: usize) -> String {
    format!(
        "  {:<width$}  {}  {}",
        unit.name,
        unit.candidates.join(":"),
        unit.phases,
        width = width
    )
}
