//! Implementation of the `hl7tmpl check` command.

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;

use super::load_message;
use crate::output::table::format_segment_table;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Message files to check (ER7)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print the parsed message tree as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the check command.
///
/// Every file is parsed; the first parse error is reported as a diagnostic.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    for path in &args.files {
        let tree = load_message(path)?;
        log::debug!("{}: {} segments", path.display(), tree.len());

        if args.json {
            println!("{}", serde_json::to_string_pretty(&tree).into_diagnostic()?);
        } else {
            println!(
                "{} {} ({} segments)",
                "ok".green(),
                path.display(),
                tree.len()
            );
            println!("{}", format_segment_table(&tree));
        }
    }
    Ok(exitcode::OK)
}
