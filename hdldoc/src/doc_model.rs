// SPDX-License-Identifier: Apache-2.0

//! Renderer-neutral view of a parsed design: one section per module plus the
//! hierarchical menu derived from the dependency tree.

use crate::graph::{Graph, GraphNode, NodeShape};
use crate::model::ModuleRecord;
use crate::registry::ModuleRegistry;
use crate::tree::DependencyNode;
use std::path::Path;

/// Page that documents every module of `source_file`: its basename plus
/// `.html`.
pub fn page_name(source_file: &str) -> String {
    let base = Path::new(source_file)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_file.to_string());
    format!("{}.html", base)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLink {
    pub name: String,
    pub source_file: String,
    pub page: String,
}

impl ModuleLink {
    fn of(record: &ModuleRecord) -> Self {
        Self {
            name: record.name.clone(),
            source_file: record.source_file.clone(),
            page: page_name(&record.source_file),
        }
    }

    /// `page#name`.
    pub fn href(&self) -> String {
        format!("{}#{}", self.page, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRow {
    pub direction: String,
    pub data_type: String,
    pub size: String,
    pub name: String,
    pub conditionals: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRow {
    pub size_or_type: String,
    pub name: String,
    pub default_expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSection {
    pub name: String,
    pub source_file: String,
    pub page: String,
    /// Modules instantiating this one, first-seen order.
    pub callers: Vec<ModuleLink>,
    /// Known modules this one instantiates, first-seen order.
    pub callees: Vec<ModuleLink>,
    /// Instantiated names with no module record.
    pub unresolved_callees: Vec<String>,
    pub ports: Vec<PortRow>,
    pub parameters: Vec<ParameterRow>,
    pub body_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub depth: usize,
    pub name: String,
    pub page: String,
    pub cycle: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentModel {
    pub top: String,
    pub sections: Vec<ModuleSection>,
    pub menu: Vec<MenuEntry>,
}

fn section_for(registry: &ModuleRegistry, record: &ModuleRecord) -> ModuleSection {
    let callers = registry.callers_of(&record.name).into_iter().map(ModuleLink::of).collect();
    let mut callees = Vec::new();
    let mut unresolved_callees = Vec::new();
    for callee in record.callee_names() {
        match registry.get(callee) {
            Some(known) => callees.push(ModuleLink::of(known)),
            None => unresolved_callees.push(callee.to_string()),
        }
    }
    let ports = record
        .ports
        .values()
        .map(|p| PortRow {
            direction: p.direction.map(|d| d.to_string()).unwrap_or_default(),
            data_type: p.data_type.clone().unwrap_or_default(),
            size: p.size.clone().unwrap_or_default(),
            name: p.name.clone(),
            conditionals: p.active_conditionals.join(", "),
        })
        .collect();
    let parameters = record
        .parameters
        .values()
        .map(|p| ParameterRow {
            size_or_type: p.size_or_type.clone().unwrap_or_default(),
            name: p.name.clone(),
            default_expression: p.default_expression.clone().unwrap_or_default(),
        })
        .collect();
    ModuleSection {
        name: record.name.clone(),
        source_file: record.source_file.clone(),
        page: page_name(&record.source_file),
        callers,
        callees,
        unresolved_callees,
        ports,
        parameters,
        body_text: record.body_text.clone(),
    }
}

impl DocumentModel {
    /// Sections follow registry order; the menu is a pre-order walk of
    /// `tree`, repeats included.
    pub fn build(registry: &ModuleRegistry, tree: &DependencyNode) -> Self {
        let sections = registry.modules().map(|m| section_for(registry, m)).collect();
        let menu = tree
            .walk()
            .into_iter()
            .map(|(depth, node)| MenuEntry {
                depth,
                name: node.name.clone(),
                page: registry
                    .get(&node.name)
                    .map(|m| page_name(&m.source_file))
                    .unwrap_or_default(),
                cycle: node.cycle,
            })
            .collect();
        Self {
            top: tree.name.clone(),
            sections,
            menu,
        }
    }

    pub fn section(&self, name: &str) -> Option<&ModuleSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Sections whose module was defined in `source_file`.
    pub fn sections_for_file<'a>(
        &'a self,
        source_file: &'a str,
    ) -> impl Iterator<Item = &'a ModuleSection> + 'a {
        self.sections.iter().filter(move |s| s.source_file == source_file)
    }

    /// Page of the top module, if it has a section.
    pub fn top_page(&self) -> Option<&str> {
        self.section(&self.top).map(|s| s.page.as_str())
    }
}

/// Flow diagram for one module: callers on the left, the module itself as a
/// box, known callees on the right. Neighbors link to their own section.
pub fn flow_graph(section: &ModuleSection) -> Graph {
    let mut graph = Graph::new();
    graph.add_node(GraphNode {
        id: section.name.clone(),
        label: section.name.clone(),
        shape: NodeShape::Box,
        url: None,
    });
    let neighbor = |link: &ModuleLink| GraphNode {
        id: link.name.clone(),
        label: link.name.clone(),
        shape: NodeShape::Plaintext,
        url: Some(link.href()),
    };
    for caller in &section.callers {
        graph.add_node(neighbor(caller));
        graph.add_edge(&caller.name, &section.name);
    }
    for callee in &section.callees {
        graph.add_node(neighbor(callee));
        graph.add_edge(&section.name, &callee.name);
    }
    graph
}
