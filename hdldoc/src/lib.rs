// SPDX-License-Identifier: Apache-2.0

//! Structural extraction from Verilog sources, for documentation.
//!
//! The pipeline runs per file: comments are stripped (`source`), module
//! declarations are located (`extract`), and each module's port list,
//! parameters and body statements are parsed (`ports`, `params`,
//! `instances`) into a `ModuleRecord`. Records from every file are merged
//! into a `ModuleRegistry`, from which a `DependencyNode` tree is expanded
//! and a renderer-neutral `DocumentModel` is built.
//!
//! ```
//! use hdldoc::{expand, Diagnostics, DocumentModel, ModuleRegistry, ParseOptions, SourceFile};
//!
//! let files = vec![SourceFile::new(
//!     "top.v",
//!     "module top(input clk); sub u0 (.clk(clk)); endmodule\nmodule sub(input clk); endmodule\n",
//! )];
//! let mut diags = Diagnostics::new();
//! let registry = ModuleRegistry::build(&files, &ParseOptions::default(), &mut diags);
//! let top = registry.resolve_top("top").unwrap();
//! let tree = expand(&registry, &top.name, &mut diags);
//! let doc = DocumentModel::build(&registry, &tree);
//! assert_eq!(doc.menu.len(), 2);
//! ```

pub mod conditional;
pub mod diag;
pub mod doc_model;
pub mod extract;
pub mod graph;
pub mod instances;
pub mod io;
pub mod model;
pub mod options;
pub mod params;
pub mod ports;
pub mod registry;
pub mod scan;
pub mod source;
pub mod tree;

pub use conditional::{ConditionalStack, ElsePolicy};
pub use diag::{Diagnostic, DiagnosticKind, Diagnostics};
pub use doc_model::{flow_graph, page_name, DocumentModel, MenuEntry, ModuleLink, ModuleSection};
pub use graph::{DotSourceRenderer, Graph, GraphRenderer};
pub use model::{InstanceRef, ModuleRecord, ParameterRecord, PortDirection, PortRecord};
pub use options::ParseOptions;
pub use registry::{ModuleRegistry, TopModule, TopModuleNotFound};
pub use source::SourceFile;
pub use tree::{expand, DependencyNode};
