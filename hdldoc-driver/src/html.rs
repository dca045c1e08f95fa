// SPDX-License-Identifier: Apache-2.0

//! Multi-page HTML output: a frameset `index.html`, the hierarchical
//! `menu.html`, and one page per input file.

use crate::common::{load_design, resolve_hierarchy};
use crate::doc_config::{get_dot_path, get_output_dir, get_parse_options, get_top, DocConfig};
use crate::report_cli_error::report_cli_error_and_exit;
use crate::tools::DotCommandRenderer;
use anyhow::{anyhow, Result};
use clap::ArgMatches;
use hdldoc::{flow_graph, page_name, DocumentModel, GraphRenderer, ModuleSection};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const PAGE_STYLE: &str = "<style>
table, th, td {
    border: 1px solid black;
    border-collapse: collapse;
}
</style>
";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_index(doc: &DocumentModel) -> String {
    format!(
        "<html>\n  <frameset cols=\"200, *\">\n    <frame src=\"menu.html\" name=\"menu\">\n    <frame src=\"{}\" name=\"main\">\n  </frameset>\n</html>\n",
        escape_html(doc.top_page().unwrap_or_default())
    )
}

/// Indented link list, one line per tree node, `|&nbsp;` per level.
pub fn render_menu(doc: &DocumentModel) -> String {
    let mut out = String::new();
    for entry in &doc.menu {
        let name = escape_html(&entry.name);
        let _ = write!(
            out,
            "{}<a target='main' href='{}#{}'>{}</a>",
            "|&nbsp;".repeat(entry.depth),
            escape_html(&entry.page),
            name,
            name
        );
        if entry.cycle {
            out.push_str(" (cycle)");
        }
        out.push_str("<br/>\n");
    }
    out
}

/// Flow diagram markup. With no renderer, or if rendering fails, the DOT
/// source is shown instead.
fn render_flow(section: &ModuleSection, renderer: Option<&dyn GraphRenderer>) -> String {
    let graph = flow_graph(section);
    if let Some(renderer) = renderer {
        match renderer
            .render_graph(&graph)
            .and_then(|bytes| String::from_utf8(bytes).map_err(|e| anyhow!(e)))
        {
            Ok(svg) => return svg,
            Err(e) => log::warn!("rendering flow graph for {} failed: {}", section.name, e),
        }
    }
    format!("<pre>{}</pre>", escape_html(&graph.to_dot()))
}

fn render_section(out: &mut String, section: &ModuleSection, renderer: Option<&dyn GraphRenderer>) {
    let name = escape_html(&section.name);
    let _ = writeln!(out, "<h2 id='{}'>{}</h2>", name, name);
    out.push_str("<hr/>\n");

    out.push_str("<h3>flow</h3>\n");
    out.push_str(&render_flow(section, renderer));
    out.push_str("\n<br>\n");

    out.push_str("<h3>arguments</h3>\n<table>\n");
    out.push_str("<tr><th>direction</th><th>type</th><th>size</th><th>name</th><th>conditionals</th></tr>\n");
    for port in &section.ports {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            port.direction,
            escape_html(&port.data_type),
            escape_html(&port.size),
            escape_html(&port.name),
            escape_html(&port.conditionals)
        );
    }
    out.push_str("</table>\n<br>\n");

    if !section.parameters.is_empty() {
        out.push_str("<h3>parameter</h3>\n<table>\n");
        out.push_str("<tr><th>size</th><th>name</th><th>default</th></tr>\n");
        for param in &section.parameters {
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&param.size_or_type),
                escape_html(&param.name),
                escape_html(&param.default_expression)
            );
        }
        out.push_str("</table>\n<br>\n");
    }

    if !section.unresolved_callees.is_empty() {
        out.push_str("<h3>unresolved instances</h3>\n<ul>\n");
        for name in &section.unresolved_callees {
            let _ = writeln!(out, "<li>{}</li>", escape_html(name));
        }
        out.push_str("</ul>\n");
    }

    let _ = writeln!(out, "<pre>{}</pre>", escape_html(&section.body_text));
}

/// Page for every module defined in `source_file`.
pub fn render_file_page(
    doc: &DocumentModel,
    source_file: &str,
    renderer: Option<&dyn GraphRenderer>,
) -> String {
    let mut out = String::from(PAGE_STYLE);
    let title = page_name(source_file);
    let _ = writeln!(
        out,
        "<h1>{}</h1>",
        escape_html(title.strip_suffix(".html").unwrap_or(&title))
    );
    for section in doc.sections_for_file(source_file) {
        render_section(&mut out, section, renderer);
    }
    out
}

fn write_page(dir: &Path, name: &str, contents: &str) -> Result<()> {
    let path = dir.join(name);
    std::fs::write(&path, contents)
        .map_err(|e| anyhow!("writing '{}': {}", path.display(), e))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Writes the whole site into `output_dir`.
pub fn write_site(
    doc: &DocumentModel,
    files: &[String],
    output_dir: &Path,
    renderer: Option<&dyn GraphRenderer>,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| anyhow!("creating '{}': {}", output_dir.display(), e))?;
    write_page(output_dir, "index.html", &render_index(doc))?;
    write_page(output_dir, "menu.html", &render_menu(doc))?;
    for file in files {
        write_page(
            output_dir,
            &page_name(file),
            &render_file_page(doc, file, renderer),
        )?;
    }
    Ok(())
}

/// Directory containing the top module's source file.
fn default_output_dir(doc: &DocumentModel) -> PathBuf {
    doc.section(&doc.top)
        .and_then(|s| Path::new(&s.source_file).parent())
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn handle_html(matches: &ArgMatches, config: &Option<DocConfig>) {
    log::info!("handle_html");
    let options = get_parse_options(config);
    let mut design = load_design(matches, "html", &options);
    let tree = resolve_hierarchy(&mut design, &get_top(matches, config), "html");
    let doc = DocumentModel::build(&design.registry, &tree);

    let output_dir = match get_output_dir(matches, config) {
        Some(dir) => PathBuf::from(dir),
        None => {
            let dir = default_output_dir(&doc);
            log::warn!("setting output directory to {}", dir.display());
            dir
        }
    };

    let dot = match DotCommandRenderer::locate(get_dot_path(config).as_deref()) {
        Ok(dot) => Some(dot),
        Err(e) => {
            log::warn!("{}; flow diagrams will be emitted as DOT source", e);
            None
        }
    };
    let renderer = dot.as_ref().map(|d| d as &dyn GraphRenderer);

    if let Err(e) = write_site(&doc, &design.files, &output_dir, renderer) {
        report_cli_error_and_exit(&e.to_string(), Some("html"), vec![]);
    }
}
