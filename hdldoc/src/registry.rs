// SPDX-License-Identifier: Apache-2.0

//! Aggregation of module records across input files, plus top-module
//! resolution.

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::extract::{extract_modules, ModuleSource};
use crate::instances::{classify_statement, split_statements};
use crate::model::{ModuleRecord, ParameterRecord};
use crate::options::ParseOptions;
use crate::params::{match_parameter_statement, parse_parameter_block, ParamMatch};
use crate::ports::{apply_body_port_declaration, parse_port_list};
use crate::source::{strip_comments, SourceFile};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Names tried, in order, when the requested top module is absent.
pub const FALLBACK_TOP_NAMES: &[&str] = &["rio", "top"];

/// Builds the record for one extracted module.
///
/// Body statements are tried, in order, as parameter declarations, as
/// non-ANSI port declarations and finally as instantiations. Port
/// declarations inside a `task` or `function` are local to it and leave the
/// module's ports alone. A statement that
/// carries the parameter keyword but does not parse is reported once and is
/// still offered to the instance scan.
pub fn parse_module(
    source: &ModuleSource<'_>,
    source_file: &str,
    options: &ParseOptions,
    diags: &mut Diagnostics,
) -> ModuleRecord {
    let name = source.name.as_str();
    let mut ports = parse_port_list(name, source.port_list, options, diags);
    let mut parameters: IndexMap<String, ParameterRecord> = IndexMap::new();
    let mut insert_params = |records: Vec<ParameterRecord>| {
        for record in records {
            parameters.insert(record.name.clone(), record);
        }
    };
    if let Some(block) = source.param_block {
        insert_params(parse_parameter_block(name, block, options, diags));
    }

    let mut instances = Vec::new();
    for statement in split_statements(name, source.body, options, diags) {
        match match_parameter_statement(&statement.text, options) {
            ParamMatch::Declared { records, rejected } if rejected.is_empty() => {
                insert_params(records);
                continue;
            }
            ParamMatch::Declared { records, .. } => {
                insert_params(records);
                diags.report(DiagnosticKind::UnrecognizedParameter, name, statement.text.clone());
            }
            ParamMatch::NotParameter => {}
        }
        if !statement.in_subprogram
            && apply_body_port_declaration(&mut ports, &statement.text, &statement.active_conditionals)
        {
            continue;
        }
        if let Some(instance) = classify_statement(&statement, options) {
            instances.push(instance);
        }
    }

    ModuleRecord {
        name: source.name.clone(),
        source_file: source_file.to_string(),
        ports,
        parameters,
        body_text: source.body.to_string(),
        instances,
    }
}

/// Every module discovered in a run, keyed by name, in discovery order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ModuleRegistry {
    modules: IndexMap<String, ModuleRecord>,
}

/// Outcome of a successful top-module lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopModule {
    pub name: String,
    /// Whether `name` is a fallback rather than the requested module.
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopModuleNotFound {
    pub requested: String,
    pub available: Vec<String>,
}

impl fmt::Display for TopModuleNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top module '{}' not found (fallbacks tried: {}); available modules: {}",
            self.requested,
            FALLBACK_TOP_NAMES.join(", "),
            if self.available.is_empty() {
                "<none>".to_string()
            } else {
                self.available.join(", ")
            }
        )
    }
}

impl std::error::Error for TopModuleNotFound {}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every file in order. On a name collision the later file wins.
    pub fn build(files: &[SourceFile], options: &ParseOptions, diags: &mut Diagnostics) -> Self {
        let mut registry = Self::new();
        for file in files {
            registry.add_file(file, options, diags);
        }
        registry
    }

    pub fn add_file(&mut self, file: &SourceFile, options: &ParseOptions, diags: &mut Diagnostics) {
        let normalized = strip_comments(&file.text);
        let sources = extract_modules(&normalized);
        log::info!("{}: found {} module(s)", file.path, sources.len());
        for source in &sources {
            let record = parse_module(source, &file.path, options, diags);
            self.insert(record, diags);
        }
    }

    /// Inserts `record`, replacing (in place) any module of the same name.
    pub fn insert(&mut self, record: ModuleRecord, diags: &mut Diagnostics) {
        if let Some(previous) = self.modules.get(&record.name) {
            diags.report(
                DiagnosticKind::ModuleRedefined,
                &record.name,
                format!("{} replaces definition from {}", record.source_file, previous.source_file),
            );
        }
        self.modules.insert(record.name.clone(), record);
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(|k| k.as_str())
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.values()
    }

    /// Modules that instantiate `name`, in registry order.
    pub fn callers_of(&self, name: &str) -> Vec<&ModuleRecord> {
        self.modules.values().filter(|m| m.instantiates(name)).collect()
    }

    /// Resolves the root of the hierarchy: `requested` if present, otherwise
    /// the first of `FALLBACK_TOP_NAMES` that is present.
    pub fn resolve_top(&self, requested: &str) -> Result<TopModule, TopModuleNotFound> {
        if self.contains(requested) {
            return Ok(TopModule {
                name: requested.to_string(),
                fallback: false,
            });
        }
        match FALLBACK_TOP_NAMES.iter().find(|name| self.contains(name)) {
            Some(name) => {
                log::warn!("FALLBACK: setting top module to '{}'", name);
                Ok(TopModule {
                    name: name.to_string(),
                    fallback: true,
                })
            }
            None => Err(TopModuleNotFound {
                requested: requested.to_string(),
                available: self.names().map(|s| s.to_string()).collect(),
            }),
        }
    }
}
