//! Implementation of the `hl7tmpl helpers` command.

use hl7tmpl::HELPERS;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::output::table::format_helper_table;

/// Arguments for the helpers command.
#[derive(Debug, clap::Args)]
pub struct HelpersArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one helper.
#[derive(Serialize)]
struct HelperJson {
    name: &'static str,
    arguments: String,
    description: &'static str,
}

/// Run the helpers command.
pub fn run_helpers(args: HelpersArgs) -> Result<i32> {
    if args.json {
        let helpers: Vec<HelperJson> = HELPERS
            .iter()
            .map(|spec| HelperJson {
                name: spec.name,
                arguments: spec.arity.to_string(),
                description: spec.description,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&helpers).into_diagnostic()?);
    } else {
        println!("{}", format_helper_table(HELPERS));
    }
    Ok(exitcode::OK)
}
