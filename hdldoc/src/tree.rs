// SPDX-License-Identifier: Apache-2.0

//! Expansion of the instantiation relation into a rooted tree.
//!
//! The tree is not deduplicated: a module instantiated twice appears as two
//! sibling subtrees, each fully expanded.

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::registry::ModuleRegistry;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyNode {
    pub name: String,
    pub children: Vec<DependencyNode>,
    /// Set when `name` already appears on the path from the root; such a
    /// node is never expanded.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cycle: bool,
}

impl DependencyNode {
    fn leaf(name: &str, cycle: bool) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
            cycle,
        }
    }

    /// Pre-order traversal yielding `(depth, node)`; the root has depth 0.
    pub fn walk(&self) -> Vec<(usize, &DependencyNode)> {
        let mut out = Vec::new();
        let mut worklist: Vec<(usize, &DependencyNode)> = vec![(0, self)];
        while let Some((depth, node)) = worklist.pop() {
            out.push((depth, node));
            for child in node.children.iter().rev() {
                worklist.push((depth + 1, child));
            }
        }
        out
    }

    /// Total number of nodes, root included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(|c| c.size()).sum::<usize>()
    }
}

/// Expands `root` against `registry`.
///
/// Each instance whose callee is a known module becomes a child, in
/// instantiation order; unknown callees are left out. A callee already on the
/// ancestor path becomes a `cycle` leaf and is reported as
/// `CircularInstantiation`.
pub fn expand(registry: &ModuleRegistry, root: &str, diags: &mut Diagnostics) -> DependencyNode {
    let mut path: Vec<&str> = Vec::new();
    expand_on_path(registry, root, &mut path, diags)
}

fn expand_on_path<'r>(
    registry: &'r ModuleRegistry,
    name: &'r str,
    path: &mut Vec<&'r str>,
    diags: &mut Diagnostics,
) -> DependencyNode {
    let Some(record) = registry.get(name) else {
        return DependencyNode::leaf(name, false);
    };
    path.push(name);
    let mut children = Vec::new();
    for instance in &record.instances {
        let callee = instance.callee_name.as_str();
        if !registry.contains(callee) {
            continue;
        }
        if path.contains(&callee) {
            let cycle_path = path
                .iter()
                .chain(std::iter::once(&callee))
                .copied()
                .collect::<Vec<_>>()
                .join(" -> ");
            diags.report(DiagnosticKind::CircularInstantiation, name, cycle_path);
            children.push(DependencyNode::leaf(callee, true));
            continue;
        }
        children.push(expand_on_path(registry, callee, path, diags));
    }
    path.pop();
    DependencyNode {
        name: name.to_string(),
        children,
        cycle: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use crate::source::SourceFile;
    use pretty_assertions::assert_eq;

    fn registry(text: &str) -> ModuleRegistry {
        let mut diags = Diagnostics::new();
        ModuleRegistry::build(&[SourceFile::new("d.v", text)], &ParseOptions::default(), &mut diags)
    }

    fn names(node: &DependencyNode) -> Vec<(usize, String)> {
        node.walk()
            .into_iter()
            .map(|(depth, n)| (depth, n.name.clone()))
            .collect()
    }

    #[test]
    fn test_duplicate_instances_are_expanded_separately() {
        let reg = registry(
            "module a(); b u0 (); b u1 (); endmodule\n\
             module b(); c u0 (); endmodule\n\
             module c(); endmodule",
        );
        let mut diags = Diagnostics::new();
        let tree = expand(&reg, "a", &mut diags);
        assert!(diags.is_empty());
        assert_eq!(tree.children.len(), 2);
        for child in &tree.children {
            assert_eq!(child.name, "b");
            assert_eq!(child.children.len(), 1);
            assert_eq!(child.children[0].name, "c");
        }
        assert_eq!(
            names(&tree),
            vec![
                (0, "a".to_string()),
                (1, "b".to_string()),
                (2, "c".to_string()),
                (1, "b".to_string()),
                (2, "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let reg = registry("module a(); b u0 (); endmodule module b(); endmodule");
        let mut diags = Diagnostics::new();
        assert_eq!(expand(&reg, "a", &mut diags), expand(&reg, "a", &mut diags));
    }

    #[test]
    fn test_unknown_callees_are_omitted() {
        let reg = registry("module a(); vendor_ram u0 (.a(x)); b u1 (); endmodule module b(); endmodule");
        let mut diags = Diagnostics::new();
        let tree = expand(&reg, "a", &mut diags);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].name, "b");
    }

    #[test]
    fn test_cycle_is_cut_and_reported() {
        let reg = registry("module a(); b u0 (); endmodule module b(); a u1 (); endmodule");
        let mut diags = Diagnostics::new();
        let tree = expand(&reg, "a", &mut diags);
        assert_eq!(tree.size(), 3);
        let back_edge = &tree.children[0].children[0];
        assert_eq!(back_edge.name, "a");
        assert!(back_edge.cycle);
        assert!(back_edge.children.is_empty());
        let reported: Vec<&str> = diags
            .of_kind(DiagnosticKind::CircularInstantiation)
            .map(|d| d.text.as_str())
            .collect();
        assert_eq!(reported, vec!["a -> b -> a"]);
    }

    #[test]
    fn test_self_instantiation() {
        let reg = registry("module a(); a u0 (); endmodule");
        let mut diags = Diagnostics::new();
        let tree = expand(&reg, "a", &mut diags);
        assert_eq!(tree.children.len(), 1);
        assert!(tree.children[0].cycle);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_shared_module_on_sibling_paths_is_not_a_cycle() {
        let reg = registry(
            "module a(); b u0 (); c u1 (); endmodule\n\
             module b(); c u0 (); endmodule\n\
             module c(); endmodule",
        );
        let mut diags = Diagnostics::new();
        let tree = expand(&reg, "a", &mut diags);
        assert!(diags.is_empty());
        assert_eq!(tree.size(), 4);
    }
}
