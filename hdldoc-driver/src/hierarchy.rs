// SPDX-License-Identifier: Apache-2.0

use crate::common::{load_design, resolve_hierarchy};
use crate::doc_config::{get_parse_options, get_top, DocConfig};
use clap::ArgMatches;
use hdldoc::DependencyNode;

/// One line per tree node, indented two spaces per level. Nodes that close a
/// cycle are suffixed with ` (cycle)`.
pub fn render_tree(tree: &DependencyNode) -> String {
    let mut out = String::new();
    for (depth, node) in tree.walk() {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.name);
        if node.cycle {
            out.push_str(" (cycle)");
        }
        out.push('\n');
    }
    out
}

pub fn handle_tree(matches: &ArgMatches, config: &Option<DocConfig>) {
    log::info!("handle_tree");
    let options = get_parse_options(config);
    let mut design = load_design(matches, "tree", &options);
    let tree = resolve_hierarchy(&mut design, &get_top(matches, config), "tree");
    print!("{}", render_tree(&tree));
}
