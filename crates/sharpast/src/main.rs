//! Sharpast CLI - syntax trees as line-delimited JSON.
//!
//! `sharpast serve` (the default) answers parse requests on stdin/stdout;
//! `sharpast parse <FILE>` prints the tree of a single file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use sharpast::Language;
use tracing_subscriber::EnvFilter;

mod cli;

/// Sharpast: parse source text into JSON syntax trees.
#[derive(Parser)]
#[command(name = "sharpast")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Source language (overrides the configuration file)
    #[arg(short, long, value_enum, global = true)]
    language: Option<Language>,

    /// Omit properties holding default values (false, 0, "", null, [])
    #[arg(long, global = true)]
    omit_defaults: bool,

    /// Attach the partial tree to parse failure responses
    #[arg(long, global = true)]
    partial_ast: bool,

    /// Annotate nodes with language-neutral roles (`@role`)
    #[arg(long, global = true)]
    roles: bool,

    /// Verbose output on stderr (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer parse requests on stdin, one JSON line per request
    Serve,

    /// Parse one file and print its tree
    Parse {
        /// Source file to parse
        file: PathBuf,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs go to stderr
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let overrides = cli::Overrides {
        config: cli.config,
        language: cli.language,
        omit_defaults: cli.omit_defaults,
        partial_ast: cli.partial_ast,
        roles: cli.roles,
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cli::serve::run(&overrides),
        Commands::Parse { file, pretty } => cli::parse::run(&overrides, &file, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {cause}", "caused by".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}
