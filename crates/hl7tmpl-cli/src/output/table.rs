//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};
use hl7tmpl::{HelperSpec, MessageTree};

/// Format a per-name segment summary: count and positions.
pub fn format_segment_table(tree: &MessageTree) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Segment", "Count", "Positions"]);

    for name in tree.names() {
        let positions: Vec<String> = tree
            .occurrences(name)
            .map(|segment| segment.position.to_string())
            .collect();
        table.add_row(vec![
            name.to_string(),
            positions.len().to_string(),
            positions.join(", "),
        ]);
    }

    table
}

/// Format the helper table.
pub fn format_helper_table(helpers: &[HelperSpec]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Helper", "Arguments", "Description"]);

    for spec in helpers {
        table.add_row(vec![
            spec.name.to_string(),
            spec.arity.to_string(),
            spec.description.to_string(),
        ]);
    }

    table
}
