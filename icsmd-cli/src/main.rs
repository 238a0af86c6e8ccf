mod commands;
mod config;
mod file;
mod format;
mod source;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::commands::run::RunArgs;
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "ics-to-markdown", version)]
#[command(about = "Convert ICS calendar files into Markdown tables")]
struct Cli {
    /// Stop immediately if any error occurs
    #[arg(long, global = true)]
    strict: bool,

    /// More log output (-v, -vv, -vvv). RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an ICS file or URL into a Markdown table
    Run {
        /// Path or URL of the calendar (".ics" may be omitted)
        file: Option<String>,

        /// Only events starting on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only events ending on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Write the table here instead of <name>.md
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep the table unaligned
        #[arg(long)]
        no_format: bool,

        /// Print the table without writing a file
        #[arg(long)]
        stdout_only: bool,
    },
    /// List ICS files in a directory
    List {
        /// Directory to search (defaults to the current one)
        path: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(cli: Cli) -> Result<u8> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(commands::EXIT_OK);
    };

    let config = AppConfig::load().context("Could not load configuration")?;
    let strict = cli.strict || config.strict;
    tracing::debug!(?config, strict, "loaded configuration");

    match command {
        Commands::Run {
            file,
            from,
            to,
            output,
            no_format,
            stdout_only,
        } => {
            let args = RunArgs {
                file,
                from,
                to,
                output,
                no_format,
                stdout_only,
            };
            commands::run::run(args, &config, strict).await
        }
        Commands::List { path } => commands::list::run(path),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
