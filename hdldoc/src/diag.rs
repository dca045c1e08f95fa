// SPDX-License-Identifier: Apache-2.0

//! Recoverable diagnostics produced while extracting module structure.
//!
//! Nothing in the extraction pipeline aborts on malformed input; problems are
//! recorded here (and logged) and the offending fragment is left out of the
//! resulting record.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    UnrecognizedPort,
    UnrecognizedParameter,
    UnbalancedEndif,
    CircularInstantiation,
    ModuleRedefined,
}

impl DiagnosticKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::UnrecognizedPort => "UNKNOWN ARG",
            DiagnosticKind::UnrecognizedParameter => "UNKNOWN PARAMETER",
            DiagnosticKind::UnbalancedEndif => "UNBALANCED `endif",
            DiagnosticKind::CircularInstantiation => "circular instantiation detected",
            DiagnosticKind::ModuleRedefined => "MODULE REDEFINED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Module the diagnostic belongs to.
    pub module: String,
    /// Offending raw text (or, for cycles, the instantiation path).
    pub text: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind.label(), self.module, self.text)
    }
}

/// Accumulates diagnostics in emission order.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: DiagnosticKind, module: &str, text: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            module: module.to_string(),
            text: text.into(),
        };
        log::warn!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }
}
