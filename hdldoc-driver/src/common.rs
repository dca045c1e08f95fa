// SPDX-License-Identifier: Apache-2.0

use crate::report_cli_error::{report_cli_error_and_exit, report_diagnostic_summary};
use anyhow::{anyhow, Result};
use clap::ArgMatches;
use hdldoc::io::load_sources_from_paths;
use hdldoc::{expand, DependencyNode, Diagnostics, ModuleRegistry, ParseOptions};
use std::path::PathBuf;
use std::process::{Command, Output};

/// Parsed inputs for one driver invocation.
pub struct LoadedDesign {
    /// Source identifiers in command-line order.
    pub files: Vec<String>,
    pub registry: ModuleRegistry,
    pub diags: Diagnostics,
}

/// Reads and parses the positional `files` argument; exits on I/O failure.
pub fn load_design(matches: &ArgMatches, subcommand: &str, options: &ParseOptions) -> LoadedDesign {
    let paths: Vec<PathBuf> = matches
        .get_many::<String>("files")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();
    let sources = match load_sources_from_paths(&paths) {
        Ok(sources) => sources,
        Err(e) => report_cli_error_and_exit(&e.to_string(), Some(subcommand), vec![]),
    };
    let mut diags = Diagnostics::new();
    let registry = ModuleRegistry::build(&sources, options, &mut diags);
    log::info!(
        "{}: parsed {} module(s) from {} file(s); {} diagnostic(s)",
        subcommand,
        registry.len(),
        sources.len(),
        diags.len()
    );
    if registry.is_empty() {
        log::warn!("{}: no modules found in the given files", subcommand);
    }
    LoadedDesign {
        files: sources.into_iter().map(|s| s.path).collect(),
        registry,
        diags,
    }
}

/// Resolves `requested` (with fallbacks) and expands the hierarchy from it;
/// exits listing every known module when no root can be found. Diagnostics
/// gathered so far are tallied on stderr.
pub fn resolve_hierarchy(design: &mut LoadedDesign, requested: &str, subcommand: &str) -> DependencyNode {
    let top = match design.registry.resolve_top(requested) {
        Ok(top) => top,
        Err(e) => {
            let available = e.available.join(", ");
            report_cli_error_and_exit(
                &format!("top module '{}' not found", e.requested),
                Some(subcommand),
                vec![("available modules", &available)],
            )
        }
    };
    log::info!("{}: top module is '{}'", subcommand, top.name);
    let tree = expand(&design.registry, &top.name, &mut design.diags);
    report_diagnostic_summary(subcommand, &design.diags);
    tree
}

/// Locates `name`: `explicit_path` if given (it must exist), otherwise via
/// `PATH`.
pub fn find_and_verify_executable(name: &str, explicit_path: Option<&str>) -> Result<PathBuf> {
    match explicit_path {
        Some(path) => {
            let path = PathBuf::from(path);
            if path.is_file() {
                Ok(path)
            } else {
                Err(anyhow!(
                    "{} not found at configured path '{}'",
                    name,
                    path.display()
                ))
            }
        }
        None => which::which(name).map_err(|e| anyhow!("{} not found in PATH: {}", name, e)),
    }
}

pub fn execute_command_with_context(mut command: Command, context: &str) -> Result<Output> {
    log::debug!("running {:?}", command);
    command
        .output()
        .map_err(|e| anyhow!("{}: {}", context, e))
}
