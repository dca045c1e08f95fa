// SPDX-License-Identifier: Apache-2.0

//! End-to-end extraction over the shared sample designs.

use hdldoc::io::build_registry_from_paths;
use hdldoc::{
    expand, flow_graph, DiagnosticKind, Diagnostics, DocumentModel, ElsePolicy, ModuleRegistry,
    ParseOptions, PortDirection, SourceFile,
};
use hdldoc_test_helpers::{write_design_to_tempdir, DesignFile, CPU_DESIGN, CYCLIC_DESIGN};
use pretty_assertions::assert_eq;

fn sources(design: &[DesignFile]) -> Vec<SourceFile> {
    design
        .iter()
        .map(|f| SourceFile::new(f.name, f.text))
        .collect()
}

fn build(design: &[DesignFile], options: &ParseOptions) -> (ModuleRegistry, Diagnostics) {
    let mut diags = Diagnostics::new();
    let registry = ModuleRegistry::build(&sources(design), options, &mut diags);
    (registry, diags)
}

#[test]
fn test_cpu_design_modules() {
    let (registry, diags) = build(CPU_DESIGN, &ParseOptions::default());
    assert!(diags.is_empty(), "{:?}", diags.items());
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["cpu_top", "alu", "adder", "regfile"]
    );
}

#[test]
fn test_cpu_top_record() {
    let (registry, _) = build(CPU_DESIGN, &ParseOptions::default());
    let top = registry.get("cpu_top").unwrap();
    assert_eq!(top.source_file, "rtl/cpu_top.v");
    assert_eq!(
        top.ports.keys().collect::<Vec<_>>(),
        vec!["clk", "rst_n", "dbg_pc", "status"]
    );
    let dbg = &top.ports["dbg_pc"];
    assert_eq!(dbg.direction, Some(PortDirection::Output));
    assert_eq!(dbg.data_type.as_deref(), Some("wire"));
    assert_eq!(dbg.size.as_deref(), Some("[XLEN-1:0]"));
    assert_eq!(dbg.active_conditionals, vec!["`ifdef DEBUG"]);
    assert!(top.ports["status"].active_conditionals.is_empty());

    let params: Vec<(&str, Option<&str>, Option<&str>)> = top
        .parameters
        .values()
        .map(|p| {
            (
                p.name.as_str(),
                p.size_or_type.as_deref(),
                p.default_expression.as_deref(),
            )
        })
        .collect();
    assert_eq!(
        params,
        vec![
            ("XLEN", Some("integer"), Some("32")),
            ("NREGS", Some("integer"), Some("16")),
        ]
    );

    assert_eq!(top.callee_names(), vec!["alu", "regfile", "vendor_pll"]);
    let instance_names: Vec<Option<&str>> =
        top.instances.iter().map(|i| i.instance_name.as_deref()).collect();
    assert_eq!(
        instance_names,
        vec![Some("u_alu0"), Some("u_alu1"), Some("u_rf"), Some("u_pll")]
    );
}

#[test]
fn test_port_inheritance_across_files() {
    let (registry, _) = build(CPU_DESIGN, &ParseOptions::default());
    let adder = registry.get("adder").unwrap();
    for name in ["a", "b"] {
        assert_eq!(adder.ports[name].direction, Some(PortDirection::Input));
        assert_eq!(adder.ports[name].size.as_deref(), Some("[W-1:0]"));
    }
    assert_eq!(adder.ports["s"].direction, Some(PortDirection::Output));
}

#[test]
fn test_non_ansi_ports_take_body_declarations() {
    let (registry, _) = build(CPU_DESIGN, &ParseOptions::default());
    let regfile = registry.get("regfile").unwrap();
    assert_eq!(
        regfile.ports.keys().collect::<Vec<_>>(),
        vec!["clk", "we", "waddr"]
    );
    assert!(regfile
        .ports
        .values()
        .all(|p| p.direction == Some(PortDirection::Input)));
    assert_eq!(regfile.ports["waddr"].size.as_deref(), Some("[3:0]"));
    assert_eq!(
        regfile.parameters["DEPTH"].default_expression.as_deref(),
        Some("16")
    );
}

#[test]
fn test_localparams_are_opt_in() {
    let (registry, _) = build(CPU_DESIGN, &ParseOptions::default());
    assert!(!registry.get("cpu_top").unwrap().parameters.contains_key("HALF"));

    let options = ParseOptions {
        capture_localparams: true,
        ..ParseOptions::default()
    };
    let (registry, _) = build(CPU_DESIGN, &options);
    let half = &registry.get("cpu_top").unwrap().parameters["HALF"];
    assert_eq!(half.default_expression.as_deref(), Some("XLEN / 2"));
}

#[test]
fn test_cpu_tree_and_menu() {
    let (registry, mut diags) = build(CPU_DESIGN, &ParseOptions::default());
    let top = registry.resolve_top("cpu_top").unwrap();
    let tree = expand(&registry, &top.name, &mut diags);
    assert!(diags.is_empty());
    let walked: Vec<(usize, &str)> = tree
        .walk()
        .into_iter()
        .map(|(d, n)| (d, n.name.as_str()))
        .collect();
    assert_eq!(
        walked,
        vec![
            (0, "cpu_top"),
            (1, "alu"),
            (2, "adder"),
            (1, "alu"),
            (2, "adder"),
            (1, "regfile"),
        ]
    );

    let doc = DocumentModel::build(&registry, &tree);
    assert_eq!(doc.menu.len(), 6);
    assert_eq!(doc.top_page(), Some("cpu_top.v.html"));
    let section = doc.section("cpu_top").unwrap();
    assert_eq!(section.unresolved_callees, vec!["vendor_pll"]);
    let graph = flow_graph(section);
    assert_eq!(graph.edges.len(), 2);
}

#[test]
fn test_missing_top_falls_back_or_fails() {
    let (registry, _) = build(CPU_DESIGN, &ParseOptions::default());
    let err = registry.resolve_top("top").unwrap_err();
    assert_eq!(err.available, vec!["cpu_top", "alu", "adder", "regfile"]);
}

#[test]
fn test_cyclic_design_terminates() {
    let (registry, mut diags) = build(CYCLIC_DESIGN, &ParseOptions::default());
    let tree = expand(&registry, "ring_a", &mut diags);
    assert_eq!(tree.size(), 3);
    assert_eq!(
        diags
            .of_kind(DiagnosticKind::CircularInstantiation)
            .count(),
        1
    );
    let doc = DocumentModel::build(&registry, &tree);
    assert!(doc.menu[2].cycle);
}

#[test]
fn test_else_policy_changes_reported_conditionals() {
    let design = [DesignFile {
        name: "m.v",
        text: "module m(\n`ifdef FAST\n  input a,\n`else\n  input b,\n`endif\n  input c);\nendmodule\n",
    }];
    let (keep, _) = build(&design, &ParseOptions::default());
    assert_eq!(keep.get("m").unwrap().ports["b"].active_conditionals, vec!["`ifdef FAST"]);

    let negate_options = ParseOptions {
        else_policy: ElsePolicy::Negate,
        ..ParseOptions::default()
    };
    let (negate, _) = build(&design, &negate_options);
    let m = negate.get("m").unwrap();
    assert_eq!(m.ports["a"].active_conditionals, vec!["`ifdef FAST"]);
    assert_eq!(m.ports["b"].active_conditionals, vec!["`ifndef FAST"]);
    assert!(m.ports["c"].active_conditionals.is_empty());
}

#[test]
fn test_registry_from_disk_serializes_to_json() {
    let (_dir, paths) = write_design_to_tempdir(CPU_DESIGN);
    let mut diags = Diagnostics::new();
    let registry =
        build_registry_from_paths(&paths, &ParseOptions::default(), &mut diags).unwrap();
    assert_eq!(registry.len(), 4);
    let json = serde_json::to_value(&registry).unwrap();
    assert_eq!(json["alu"]["parameters"]["W"]["default_expression"], "8");
    assert_eq!(json["cpu_top"]["ports"]["clk"]["direction"], "input");
    assert_eq!(json["cpu_top"]["instances"][0]["callee_name"], "alu");
}
