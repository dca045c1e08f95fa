// SPDX-License-Identifier: Apache-2.0

//! Parsed representation of module declarations.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
    Inout,
}

impl PortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
            PortDirection::Inout => "inout",
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One port of a module interface.
///
/// A port produced by the bare-identifier rule (`input a, b, c`) shares
/// `direction`, `data_type` and `size` with the nearest preceding fully
/// specified port but has its own `name` and `active_conditionals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortRecord {
    pub name: String,
    pub direction: Option<PortDirection>,
    pub data_type: Option<String>,
    pub size: Option<String>,
    /// Conditional directives active at the declaration, outermost first.
    pub active_conditionals: Vec<String>,
}

impl PortRecord {
    /// A port that carries nothing but its name.
    pub fn bare(name: impl Into<String>, active_conditionals: Vec<String>) -> Self {
        Self {
            name: name.into(),
            direction: None,
            data_type: None,
            size: None,
            active_conditionals,
        }
    }

    /// Copies the attributes of `self` onto a port with a different name and
    /// conditional snapshot.
    pub fn renamed(&self, name: impl Into<String>, active_conditionals: Vec<String>) -> Self {
        Self {
            name: name.into(),
            active_conditionals,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterRecord {
    pub name: String,
    pub size_or_type: Option<String>,
    pub default_expression: Option<String>,
}

/// A statement in a module body classified as a submodule instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceRef {
    pub callee_name: String,
    /// Instance name following the callee (and its optional `#(...)`), when
    /// one could be identified.
    pub instance_name: Option<String>,
    pub raw_statement_text: String,
    pub active_conditionals: Vec<String>,
}

/// Everything extracted from one module declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRecord {
    pub name: String,
    pub source_file: String,
    /// Declaration order.
    pub ports: IndexMap<String, PortRecord>,
    /// Explicit `#(...)` entries followed by in-body declarations; later
    /// entries overwrite earlier ones with the same name.
    pub parameters: IndexMap<String, ParameterRecord>,
    pub body_text: String,
    pub instances: Vec<InstanceRef>,
}

impl ModuleRecord {
    /// Distinct callee names in first-instantiation order.
    pub fn callee_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for inst in &self.instances {
            if !names.contains(&inst.callee_name.as_str()) {
                names.push(inst.callee_name.as_str());
            }
        }
        names
    }

    pub fn instantiates(&self, callee: &str) -> bool {
        self.instances.iter().any(|i| i.callee_name == callee)
    }
}
