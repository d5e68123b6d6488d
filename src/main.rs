// Copyright 2026 Macwatch Contributors
// SPDX-License-Identifier: Apache-2.0

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::error;

use macwatch::cli;

#[derive(Parser)]
#[command(
    name = "macwatch",
    about = "macwatch — macOS release watcher with Telegram notifications",
    version,
    after_help = "Run 'macwatch <command> --help' for details on each command."
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, short, global = true)]
    config: Option<String>,

    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one watch cycle: refresh recipients, fetch, compare, notify
    Check {
        /// Detect changes but send nothing and write nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// Show configuration and the last recorded version
    Status,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Check { dry_run } => {
            cli::check_cmd::run(cli.config.as_deref(), dry_run, cli.json, cli.quiet).await
        }
        Commands::Status => cli::status_cmd::run(cli.config.as_deref(), cli.json).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "macwatch", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: configuration problems are the only fatal
    // errors (1); failed fetches and extraction misses are logged and the
    // run still exits 0.
    if let Err(e) = result {
        error!("{e:#}");
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": true,
                    "message": format!("{e:#}"),
                })
            );
        }
        std::process::exit(1);
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let default = if quiet {
        "macwatch=error"
    } else if verbose {
        "macwatch=debug"
    } else {
        "macwatch=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default.parse().unwrap()),
        )
        .init();
}
