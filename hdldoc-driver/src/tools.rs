// SPDX-License-Identifier: Apache-2.0

//! Graphviz `dot` as the diagram-rendering engine.

use crate::common::{execute_command_with_context, find_and_verify_executable};
use anyhow::{anyhow, Result};
use hdldoc::{Graph, GraphRenderer};
use std::path::PathBuf;
use std::process::Command;

/// Runs `dot -Tsvg` on each graph.
pub struct DotCommandRenderer {
    dot_path: PathBuf,
}

impl DotCommandRenderer {
    /// Finds `dot` at `configured_path`, or on `PATH` when none is
    /// configured.
    pub fn locate(configured_path: Option<&str>) -> Result<Self> {
        let dot_path = find_and_verify_executable("dot", configured_path)?;
        log::info!("using dot at {}", dot_path.display());
        Ok(Self { dot_path })
    }
}

impl GraphRenderer for DotCommandRenderer {
    fn render_graph(&self, graph: &Graph) -> Result<Vec<u8>> {
        let tmp_file = tempfile::Builder::new().suffix(".dot").tempfile()?;
        std::fs::write(tmp_file.path(), graph.to_dot())?;

        let mut command = Command::new(&self.dot_path);
        command.arg("-Tsvg").arg(tmp_file.path());
        let output = execute_command_with_context(
            command,
            &format!("failed to execute dot at '{}'", self.dot_path.display()),
        )?;
        if !output.status.success() {
            return Err(anyhow!(
                "dot exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            ));
        }
        Ok(output.stdout)
    }
}
