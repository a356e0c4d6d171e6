//! CLI command implementations.

mod check;
mod helpers;
mod render;
mod segments;

use std::fs::read;
use std::path::Path;

use hl7tmpl::parser::parse_message_bytes;
use hl7tmpl::MessageTree;
use miette::{miette, Result};

use crate::output::MessageDiagnostic;

pub use check::{run_check, CheckArgs};
pub use helpers::{run_helpers, HelpersArgs};
pub use render::{run_render, RenderArgs};
pub use segments::{run_segments, SegmentsArgs};

/// Read and parse a message file, reporting parse errors with source context.
fn load_message(path: &Path) -> Result<MessageTree> {
    let bytes = read(path)
        .map_err(|e| miette!("Cannot read message file {}: {}", path.display(), e))?;
    parse_message_bytes(&bytes).map_err(|e| {
        let content = String::from_utf8_lossy(&bytes);
        MessageDiagnostic::from_parse_error(path, &content, &e).into()
    })
}
