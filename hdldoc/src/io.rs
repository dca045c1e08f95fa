// SPDX-License-Identifier: Apache-2.0

//! Reading HDL sources from disk and building a registry from them.

use crate::diag::Diagnostics;
use crate::options::ParseOptions;
use crate::registry::ModuleRegistry;
use crate::source::SourceFile;
use anyhow::{anyhow, Result};
use std::path::Path;

/// Reads one file. Invalid UTF-8 is replaced rather than rejected.
pub fn load_source_from_path(path: &Path) -> Result<SourceFile> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow!("reading source '{}': {}", path.display(), e))?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    log::info!("loaded {} ({} bytes)", path.display(), text.len());
    Ok(SourceFile::new(path.display().to_string(), text))
}

/// Reads every path in order; fails on the first unreadable file.
pub fn load_sources_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SourceFile>> {
    paths.iter().map(|p| load_source_from_path(p.as_ref())).collect()
}

/// Loads `paths` and parses them into a registry.
pub fn build_registry_from_paths<P: AsRef<Path>>(
    paths: &[P],
    options: &ParseOptions,
    diags: &mut Diagnostics,
) -> Result<ModuleRegistry> {
    let files = load_sources_from_paths(paths)?;
    Ok(ModuleRegistry::build(&files, options, diags))
}
