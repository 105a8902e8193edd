//! Binary entry point for graphiti-guard.
//!
//! This binary provides the CLI interface for the Graphiti policy guard.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use graphiti_guard::cli::{HookCommand, StateCommand, read_hook_input};
use graphiti_guard::config::GuardConfig;
use graphiti_guard::hooks::HOOK_NAME;
use graphiti_guard::observability::{self, InitOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Graphiti Guard - data-governance rules for Graphiti knowledge-graph calls.
#[derive(Parser)]
#[command(name = "graphiti-guard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Handle Claude Code hooks.
    Hook {
        /// Hook event type.
        #[command(subcommand)]
        event: HookEvent,
    },

    /// Inspect or reset session state.
    State {
        /// State subcommand.
        #[command(subcommand)]
        action: StateAction,
    },
}

/// Hook events.
#[derive(Subcommand)]
enum HookEvent {
    /// Pre tool use hook: decide whether an intercepted call may proceed.
    PreToolUse,
}

/// State subcommands.
#[derive(Subcommand)]
enum StateAction {
    /// Print the session state document.
    Show {
        /// Session id (defaults to `CLAUDE_SESSION_ID`, then today's date).
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Print the state and lock file paths.
    Path {
        /// Session id (defaults to `CLAUDE_SESSION_ID`, then today's date).
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Reset the session state document.
    Clear {
        /// Session id (defaults to `CLAUDE_SESSION_ID`, then today's date).
        #[arg(short, long)]
        session: Option<String>,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let config = match GuardConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        // Hooks must answer even with a broken config file.
        Err(e) if matches!(cli.command, Commands::Hook { .. }) => {
            eprintln!("Failed to load configuration, using defaults: {e}");
            GuardConfig::default().with_env_overrides(|key| std::env::var(key).ok())
        },
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &GuardConfig) -> graphiti_guard::Result<()> {
    match command {
        Commands::Hook { event } => {
            cmd_hook(event, config);
            Ok(())
        },
        Commands::State { action } => cmd_state(action, config),
    }
}

/// Hook command.
fn cmd_hook(event: HookEvent, config: &GuardConfig) {
    let input = read_hook_input(std::io::stdin().lock());

    let response = match event {
        HookEvent::PreToolUse => HookCommand::new(config.clone()).run_pre_tool_use(&input),
    };

    println!("{response}");
}

/// State command.
fn cmd_state(action: StateAction, config: &GuardConfig) -> graphiti_guard::Result<()> {
    match action {
        StateAction::Show { session } => {
            let cmd = StateCommand::new(config, session.as_deref());
            println!("{}", cmd.show()?);
            println!(
                "\nsession {} - guard {}",
                cmd.session(),
                if cmd.is_hook_active(HOOK_NAME) {
                    "active"
                } else {
                    "not yet fired"
                }
            );
        },
        StateAction::Path { session } => {
            println!("{}", StateCommand::new(config, session.as_deref()).paths());
        },
        StateAction::Clear { session } => {
            let cmd = StateCommand::new(config, session.as_deref());
            cmd.clear()?;
            println!("Cleared state for session {}", cmd.session());
        },
    }
    Ok(())
}
