//! hl7tmpl CLI entry point.
//!
//! Provides command-line tools for HL7 v2 messages and templates:
//! - `hl7tmpl check` - Parse a message and summarize its segments
//! - `hl7tmpl segments` - Print the segments with the given names as JSON
//! - `hl7tmpl render` - Render a handlebars template against a message
//! - `hl7tmpl helpers` - List the template helpers

mod commands;
mod output;

use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    run_check, run_helpers, run_render, run_segments, CheckArgs, HelpersArgs, RenderArgs,
    SegmentsArgs,
};
use log::LevelFilter;

/// HL7 v2 message and template tools.
#[derive(Debug, Parser)]
#[command(name = "hl7tmpl")]
#[command(about = "HL7 v2 message and template tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a message and summarize its segments
    Check(CheckArgs),
    /// Print all segments with the given names as JSON
    Segments(SegmentsArgs),
    /// Render a template against a message
    Render(RenderArgs),
    /// List the template helpers
    Helpers(HelpersArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors automatically checks TTY, NO_COLOR, FORCE_COLOR
        }
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Log warnings by default, debug output with `--verbose`. `RUST_LOG` wins.
fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_logging(cli.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Segments(args) => run_segments(args),
        Commands::Render(args) => run_render(args),
        Commands::Helpers(args) => run_helpers(args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{:?}", e);
            exit(exitcode::SOFTWARE);
        }
    }
}
