// SPDX-License-Identifier: Apache-2.0

use crate::common::{load_design, resolve_hierarchy};
use crate::doc_config::{get_parse_options, get_top, DocConfig};
use clap::ArgMatches;
use hdldoc::DocumentModel;
use std::fmt::Write;

fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Flat dump: one `#` heading per module with a port table, plus a parameter
/// table for modules that have parameters.
pub fn render_markdown(doc: &DocumentModel) -> String {
    let mut out = String::new();
    for section in &doc.sections {
        let _ = writeln!(out, "# {}\n", cell(&section.name));

        out.push_str("## arguments\n\n");
        out.push_str("| direction | type | size | name | conditionals |\n");
        out.push_str("| --- | --- | --- | --- | --- |\n");
        for port in &section.ports {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                port.direction,
                cell(&port.data_type),
                cell(&port.size),
                cell(&port.name),
                cell(&port.conditionals)
            );
        }
        out.push('\n');

        if !section.parameters.is_empty() {
            out.push_str("## parameter\n\n");
            out.push_str("| size | name | default |\n");
            out.push_str("| --- | --- | --- |\n");
            for param in &section.parameters {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} |",
                    cell(&param.size_or_type),
                    cell(&param.name),
                    cell(&param.default_expression)
                );
            }
            out.push('\n');
        }
    }
    out
}

pub fn handle_markdown(matches: &ArgMatches, config: &Option<DocConfig>) {
    log::info!("handle_markdown");
    let options = get_parse_options(config);
    let mut design = load_design(matches, "markdown", &options);
    let tree = resolve_hierarchy(&mut design, &get_top(matches, config), "markdown");
    let doc = DocumentModel::build(&design.registry, &tree);
    print!("{}", render_markdown(&doc));
}
