// SPDX-License-Identifier: Apache-2.0

//! Small directed-graph description for per-module flow diagrams, and the
//! interface to whatever engine lays it out.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Box,
    Plaintext,
}

impl NodeShape {
    fn as_dot(&self) -> &'static str {
        match self {
            NodeShape::Box => "box",
            NodeShape::Plaintext => "plaintext",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
    /// Hyperlink target, e.g. `alu.html#alu`.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    /// `(from, to)` pairs of node ids.
    pub edges: Vec<(String, String)>,
}

/// Quotes `s` as a DOT string literal.
fn dot_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node unless one with the same id exists.
    pub fn add_node(&mut self, node: GraphNode) {
        if !self.nodes.iter().any(|n| n.id == node.id) {
            self.nodes.push(node);
        }
    }

    /// Adds an edge unless it is already present.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let edge = (from.to_string(), to.to_string());
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Emits Graphviz DOT, laid out left to right.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str("digraph G {\n  rankdir=LR;\n");
        for node in &self.nodes {
            let _ = write!(
                out,
                "  {} [label={}, shape={}",
                dot_quote(&node.id),
                dot_quote(&node.label),
                node.shape.as_dot()
            );
            if let Some(url) = &node.url {
                let _ = write!(out, ", URL={}", dot_quote(url));
            }
            out.push_str("];\n");
        }
        for (from, to) in &self.edges {
            let _ = writeln!(out, "  {} -> {};", dot_quote(from), dot_quote(to));
        }
        out.push_str("}\n");
        out
    }
}

/// Turns a `Graph` into displayable image bytes.
pub trait GraphRenderer {
    fn render_graph(&self, graph: &Graph) -> anyhow::Result<Vec<u8>>;
}

/// Renders a graph as its DOT source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotSourceRenderer;

impl GraphRenderer for DotSourceRenderer {
    fn render_graph(&self, graph: &Graph) -> anyhow::Result<Vec<u8>> {
        Ok(graph.to_dot().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Graph {
        let mut g = Graph::new();
        g.add_node(GraphNode {
            id: "alu".to_string(),
            label: "alu".to_string(),
            shape: NodeShape::Box,
            url: None,
        });
        g.add_node(GraphNode {
            id: "adder".to_string(),
            label: "adder".to_string(),
            shape: NodeShape::Plaintext,
            url: Some("math.html#adder".to_string()),
        });
        g.add_edge("alu", "adder");
        g.add_edge("alu", "adder");
        g
    }

    #[test]
    fn test_to_dot() {
        assert_eq!(
            sample().to_dot(),
            "digraph G {\n  rankdir=LR;\n  \"alu\" [label=\"alu\", shape=box];\n  \"adder\" [label=\"adder\", shape=plaintext, URL=\"math.html#adder\"];\n  \"alu\" -> \"adder\";\n}\n"
        );
    }

    #[test]
    fn test_nodes_and_edges_are_deduplicated() {
        let mut g = sample();
        g.add_node(GraphNode {
            id: "alu".to_string(),
            label: "other".to_string(),
            shape: NodeShape::Plaintext,
            url: None,
        });
        assert_eq!(g.nodes.len(), 2);
        assert_eq!(g.node("alu").map(|n| n.label.as_str()), Some("alu"));
        assert_eq!(g.edges.len(), 1);
    }

    #[test]
    fn test_quoting() {
        assert_eq!(dot_quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn test_dot_source_renderer() {
        let bytes = DotSourceRenderer.render_graph(&sample()).unwrap();
        assert!(String::from_utf8(bytes).unwrap().starts_with("digraph G {"));
    }
}
