//! Implementation of the `hl7tmpl render` command.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hl7tmpl::{new_engine, Evaluator, HelperRegistry};
use miette::{miette, Result};
use owo_colors::OwoColorize;
use serde_json::json;

use super::load_message;

/// Arguments for the render command.
#[derive(Debug, clap::Args)]
pub struct RenderArgs {
    /// Handlebars template to render
    pub template: PathBuf,

    /// Message file (ER7), available to the template as `msg`
    #[arg(short, long)]
    pub message: PathBuf,

    /// Directory that `evaluate` resolves sub-template names against.
    /// Defaults to the template's directory.
    #[arg(long, env = "HL7TMPL_TEMPLATE_ROOT")]
    pub template_root: Option<PathBuf>,

    /// Pretty-print the output if it is valid JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Run the render command.
pub fn run_render(args: RenderArgs) -> Result<i32> {
    let source = read_to_string(&args.template)
        .map_err(|e| miette!("Cannot read template {}: {}", args.template.display(), e))?;
    let tree = load_message(&args.message)?;

    let template_root = args
        .template_root
        .clone()
        .or_else(|| args.template.parent().map(Path::to_path_buf));
    log::debug!("template root: {:?}", template_root);

    let evaluator = Evaluator::builder()
        .maybe_template_root(template_root)
        .build();
    let registry = Arc::new(HelperRegistry::new(Arc::new(evaluator)));
    let engine = new_engine(&registry);

    match engine.render_template(&source, &json!({ "msg": tree })) {
        Ok(output) => {
            let output = if args.pretty {
                pretty_json(&output).unwrap_or(output)
            } else {
                output
            };
            println!("{}", output);
            log::debug!(
                "compiled sub-templates: {}",
                registry.evaluator().cache().names().join(", ")
            );
            Ok(exitcode::OK)
        }
        Err(e) => {
            eprintln!("{} {}", "Render error:".red(), e);
            Ok(exitcode::DATAERR)
        }
    }
}

fn pretty_json(output: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(output).ok()?;
    serde_json::to_string_pretty(&value).ok()
}
