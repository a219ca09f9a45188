//! mcp-switch - Profile-based MCP server configuration manager
//!
//! Usage:
//!   mcp-switch                # Interactive server selection
//!   mcp-switch work           # Apply the "work" profile
//!   mcp-switch work fetch     # Combine profiles and server names
//!   mcp-switch list|status|profiles|add|remove|clear

mod interactive;

use std::collections::BTreeMap;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use switch_core::commands::{ApplyCommand, ApplyError, EditCommand, StatusCommand};
use switch_core::registry::{Profile, RegistryLoader, ServerEntry};
use switch_core::resolve::ResolveError;

use crate::interactive::SelectionOutcome;

#[derive(Parser)]
#[command(name = "mcp-switch")]
#[command(version)]
#[command(about = "Profile-based MCP server configuration manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available MCP servers
    List,

    /// Show current MCP configuration
    Status,

    /// List available profiles
    Profiles,

    /// Add specific MCP servers
    Add {
        /// Server names to enable
        #[arg(required = true)]
        servers: Vec<String>,
    },

    /// Remove specific MCP servers
    Remove {
        /// Server names to disable
        #[arg(required = true)]
        servers: Vec<String>,
    },

    /// Clear all MCP servers
    Clear,
}

/// Subcommand names that must never be treated as profile/server tokens.
const RESERVED_COMMANDS: [&str; 6] = ["list", "status", "profiles", "add", "remove", "clear"];

/// Classification of an invocation, computed once from the raw non-flag
/// arguments before any handler runs.
#[derive(Debug, Clone, PartialEq)]
enum Invocation {
    /// No positional arguments: interactive checklist.
    Interactive,
    /// First argument is a reserved subcommand name.
    Reserved,
    /// First argument names a known profile or server: direct activation.
    Direct(Vec<String>),
    /// Anything else: let clap report it.
    Unhandled,
}

fn classify(
    raw_args: &[String],
    profiles: &BTreeMap<String, Profile>,
    servers: &BTreeMap<String, ServerEntry>,
) -> Invocation {
    let tokens: Vec<String> = raw_args
        .iter()
        .filter(|arg| !arg.starts_with('-'))
        .cloned()
        .collect();

    match tokens.first() {
        None => Invocation::Interactive,
        Some(first) if RESERVED_COMMANDS.contains(&first.as_str()) => Invocation::Reserved,
        Some(first) if profiles.contains_key(first) || servers.contains_key(first) => {
            Invocation::Direct(tokens)
        }
        Some(_) => Invocation::Unhandled,
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcp_switch=debug,switch_core=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let loader = RegistryLoader::with_defaults()?;
    let profiles = loader.load_profiles();
    let servers = loader.load_servers();

    // Direct activation bypasses clap entirely, as a shortcut for
    // `mcp-switch <profile-or-server>...`.
    if let Invocation::Direct(tokens) = classify(&raw_args, &profiles, &servers) {
        return run_direct(&tokens, &profiles);
    }

    let cli = Cli::parse();
    match cli.command {
        None => run_interactive(),
        Some(Commands::List) => {
            display_list(&servers);
            Ok(())
        }
        Some(Commands::Status) => run_status(),
        Some(Commands::Profiles) => {
            display_profiles(&profiles);
            Ok(())
        }
        Some(Commands::Add { servers }) => run_add(&servers),
        Some(Commands::Remove { servers }) => run_remove(&servers),
        Some(Commands::Clear) => run_clear(),
    }
}

fn run_interactive() -> Result<()> {
    let cmd = ApplyCommand::with_defaults()?;
    let servers = cmd.loader().load_servers();
    let enabled = cmd.store().read_enabled();

    match interactive::select_servers(&servers, &enabled, cmd.loader().packaged_dir())? {
        SelectionOutcome::Selected(selection) => {
            let changed = cmd.apply_selection(&selection)?;
            if changed {
                display_success("Configuration updated successfully");
            } else {
                display_info("Configuration unchanged");
            }
        }
        SelectionOutcome::Cancelled => display_info("Cancelled"),
        SelectionOutcome::EmptyRegistry => {}
    }
    Ok(())
}

fn run_direct(tokens: &[String], profiles: &BTreeMap<String, Profile>) -> Result<()> {
    let cmd = ApplyCommand::with_defaults()?;

    // Single recognized profile keeps the legacy convenience behavior;
    // everything else goes through general batch resolution.
    if tokens.len() == 1 && profiles.contains_key(&tokens[0]) {
        return run_apply_profile(&cmd, &tokens[0]);
    }

    match cmd.apply_tokens(tokens) {
        Ok(report) => {
            if report.changed {
                display_success("Configuration applied successfully");
                if !report.profiles.is_empty() {
                    println!("Applied profiles: {}", report.profiles.join(", "));
                }
                if !report.singles.is_empty() {
                    println!("Added servers: {}", report.singles.join(", "));
                }
                println!("Enabled servers: {}", report.servers.join(", "));
            } else {
                display_info("Configuration unchanged");
            }
            Ok(())
        }
        Err(ApplyError::Resolve(err)) => exit_with_resolve_error(err),
        Err(ApplyError::Other(err)) => Err(err),
    }
}

fn run_apply_profile(cmd: &ApplyCommand, name: &str) -> Result<()> {
    match cmd.apply_profile(name, &[]) {
        Ok(report) => {
            if report.changed {
                display_success(&format!("Profile \"{name}\" applied successfully"));
                println!("Enabled servers: {}", report.servers.join(", "));
            } else {
                display_info(&format!("Profile \"{name}\" already active"));
            }
            Ok(())
        }
        Err(ApplyError::Resolve(err)) => exit_with_resolve_error(err),
        Err(ApplyError::Other(err)) => Err(err),
    }
}

/// Print a resolver hard error and exit non-zero. Nothing has been
/// written at this point.
fn exit_with_resolve_error(err: ResolveError) -> Result<()> {
    display_error(&err.to_string());
    match err {
        ResolveError::UnknownToken {
            known_profiles,
            known_servers,
            ..
        } => {
            println!("Available profiles: {}", known_profiles.join(", "));
            println!("Available servers: {}", known_servers.join(", "));
        }
        ResolveError::UnknownProfile { known_profiles, .. } => {
            if !known_profiles.is_empty() {
                println!("Available profiles: {}", known_profiles.join(", "));
            }
        }
        ResolveError::EmptySelection => {}
    }
    std::process::exit(1)
}

fn run_status() -> Result<()> {
    let cmd = StatusCommand::with_defaults()?;
    let report = cmd.execute();

    println!("{}", style("\nCurrent MCP Configuration:").bold());

    if report.enabled.is_empty() {
        println!("{}", style("  No MCP servers configured").yellow());
    } else {
        for entry in &report.enabled {
            match &entry.server {
                Some(server) => println!(
                    "  {} {}",
                    style(format!("✓ {}", entry.name)).green(),
                    style(format!("({})", server.description)).dim()
                ),
                None => println!(
                    "  {} {}",
                    style(format!("✓ {}", entry.name)).yellow(),
                    style("(unknown - not in registry)").dim()
                ),
            }
        }
    }

    if !report.available.is_empty() {
        println!("{}", style("\nAvailable servers not enabled:").bold());
        for server in &report.available {
            println!(
                "    {} {}",
                style(&server.name).dim(),
                style(format!("({})", server.description)).dim()
            );
        }
    }

    println!();
    Ok(())
}

fn display_list(servers: &BTreeMap<String, ServerEntry>) {
    println!("{}", style("\nAvailable MCP Servers:").bold());

    if servers.is_empty() {
        println!("{}", style("  No servers available").yellow());
        return;
    }

    for server in servers.values() {
        println!("  {}", style(&server.name).cyan());
        println!("    {}", style(&server.description).dim());
        println!("    {}", style(format!("Tags: {}", server.tags.join(", "))).dim());
        println!(
            "    {}",
            style(format!("Tools: {}", format_tools(&server.tools))).dim()
        );
        println!();
    }
}

fn display_profiles(profiles: &BTreeMap<String, Profile>) {
    println!("{}", style("\nAvailable Profiles:").bold());

    if profiles.is_empty() {
        println!("{}", style("  No profiles available").yellow());
        return;
    }

    for profile in profiles.values() {
        println!("  {}", style(&profile.name).cyan());
        println!("    {}", style(&profile.description).dim());
        println!(
            "    {}",
            style(format!("Servers: {}", profile.servers.join(", "))).dim()
        );
        println!();
    }
}

fn run_add(servers: &[String]) -> Result<()> {
    let cmd = EditCommand::with_defaults()?;
    cmd.add(servers)?;
    display_success(&format!("Added servers: {}", servers.join(", ")));
    Ok(())
}

fn run_remove(servers: &[String]) -> Result<()> {
    let cmd = EditCommand::with_defaults()?;
    cmd.remove(servers)?;
    display_success(&format!("Removed servers: {}", servers.join(", ")));
    Ok(())
}

fn run_clear() -> Result<()> {
    let cmd = EditCommand::with_defaults()?;
    let count = cmd.enabled_count();

    if count == 0 {
        display_info("No servers configured");
        return Ok(());
    }

    match interactive::confirm_clear(count)? {
        Some(true) => {
            cmd.clear()?;
            display_success("All servers removed");
        }
        Some(false) | None => display_info("Cancelled"),
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn display_success(message: &str) {
    println!("\n{}\n", style(format!("✓ {message}")).green());
}

fn display_error(message: &str) {
    println!("\n{}\n", style(format!("✗ {message}")).red());
}

fn display_info(message: &str) {
    println!("\n{}\n", style(format!("• {message}")).blue());
}

/// First three tool names, with an ellipsis when more exist.
fn format_tools(tools: &[String]) -> String {
    let shown = tools.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
    if tools.len() > 3 {
        format!("{shown}...")
    } else {
        shown
    }
}
