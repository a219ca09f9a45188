//! Interactive prompts for server selection and destructive confirmation.
//!
//! Uses dialoguer for terminal UI prompts. Operator-initiated aborts
//! (Esc or Ctrl-C) are surfaced as graceful cancellations, never as
//! errors.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, MultiSelect, theme::ColorfulTheme};

use switch_core::registry::ServerEntry;

/// Outcome of the interactive server selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// Operator confirmed a selection (possibly empty: disable everything).
    Selected(Vec<String>),
    /// Operator aborted the prompt.
    Cancelled,
    /// No servers exist in the merged registry; nothing to prompt for.
    EmptyRegistry,
}

/// Show the multi-select checklist over all known servers.
///
/// Entries already enabled are pre-checked. The operator's final
/// selection is returned verbatim; deselecting everything is a valid
/// answer.
pub fn select_servers(
    servers: &BTreeMap<String, ServerEntry>,
    enabled: &[String],
    registry_location: &Path,
) -> Result<SelectionOutcome> {
    print_header(registry_location);

    if servers.is_empty() {
        println!(
            "{}",
            style("No MCP servers available in registry").yellow()
        );
        return Ok(SelectionOutcome::EmptyRegistry);
    }

    let names: Vec<&String> = servers.keys().collect();
    let items: Vec<String> = servers
        .values()
        .map(|server| format!("{} - {}", server.name, server.description))
        .collect();
    let defaults: Vec<bool> = names
        .iter()
        .map(|name| enabled.contains(*name))
        .collect();

    let selection = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select MCP servers to enable (space to toggle, enter to confirm)")
        .items(&items)
        .defaults(&defaults)
        .interact_opt();

    match cancel_on_interrupt(selection)? {
        Some(indices) => Ok(SelectionOutcome::Selected(
            indices.into_iter().map(|i| names[i].clone()).collect(),
        )),
        None => Ok(SelectionOutcome::Cancelled),
    }
}

/// Confirm removal of every configured server. Defaults to no.
///
/// Returns `None` on operator abort.
pub fn confirm_clear(count: usize) -> Result<Option<bool>> {
    let confirmation = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Remove all {count} configured servers?"))
        .default(false)
        .interact_opt();

    cancel_on_interrupt(confirmation)
}

fn print_header(registry_location: &Path) {
    println!();
    println!(
        "{}",
        style("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━").bold().cyan()
    );
    println!("{}", style("  MCP Switch").bold().cyan());
    println!(
        "{}",
        style(format!("  Registry: {}", registry_location.display())).dim()
    );
    println!(
        "{}",
        style("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━").bold().cyan()
    );
    println!();
}

/// Fold an operator interrupt (Ctrl-C) into the same graceful path as an
/// Esc dismissal.
fn cancel_on_interrupt<T>(result: dialoguer::Result<Option<T>>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(value),
        Err(dialoguer::Error::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(err.into()),
    }
}
