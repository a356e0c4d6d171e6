//! Implementation of the `hl7tmpl segments` command.

use std::path::PathBuf;

use hl7tmpl::resolver::segment_lists;
use miette::{IntoDiagnostic, Result};

use super::load_message;

/// Arguments for the segments command.
#[derive(Debug, clap::Args)]
pub struct SegmentsArgs {
    /// Message file (ER7)
    pub message: PathBuf,

    /// Segment names to collect (e.g., OBX NTE)
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Run the segments command.
pub fn run_segments(args: SegmentsArgs) -> Result<i32> {
    let tree = load_message(&args.message)?;
    let names: Vec<&str> = args.names.iter().map(String::as_str).collect();
    let lists = segment_lists(&tree, &names);
    println!("{}", serde_json::to_string_pretty(&lists).into_diagnostic()?);
    Ok(exitcode::OK)
}
