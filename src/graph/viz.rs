use std::path::Path;

use serde_json::json;

use crate::error::Result;
use crate::graph::views::{AdjacencyMatrix, NodeAdjacency, NodeLink};
use crate::graph::ServiceGraph;
use crate::util::template;

pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/graph.html.tera");

/// Renders the chord page. `nodes` and `matrix` are exposed to the template.
pub fn render_html(view: &AdjacencyMatrix, template_path: Option<&Path>) -> Result<String> {
    let context = json!({
        "nodes": view.nodes,
        "matrix": view.matrix,
    });
    match template_path {
        Some(path) => template::render_template_file(path, &context),
        None => template::render_template(DEFAULT_TEMPLATE, &context),
    }
}

pub fn render_json(view: &NodeLink) -> Result<String> {
    let mut out = serde_json::to_string_pretty(view).map_err(anyhow::Error::new)?;
    out.push('\n');
    Ok(out)
}

pub fn render_dot(graph: &ServiceGraph) -> String {
    let mut out = String::from("digraph svcgraph {\n");
    for id in graph.node_ids() {
        let escaped = escape_dot_label(id);
        out.push_str(&format!("  \"{escaped}\";\n"));
    }
    for (from, to) in graph.edges() {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            escape_dot_label(from),
            escape_dot_label(to)
        ));
    }
    out.push_str("}\n");
    out
}

pub fn render_list(entries: &[NodeAdjacency]) -> String {
    let mut out = String::new();
    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        render_entry(entry, &mut out);
    }
    out
}

pub fn render_entry(entry: &NodeAdjacency, out: &mut String) {
    out.push_str(&entry.id);
    out.push('\n');
    out.push_str(&format!("  depends on ({}):\n", entry.outbound.len()));
    for edge in &entry.outbound {
        out.push_str(&format!("    {}\n", edge.target));
    }
    out.push_str(&format!("  used by ({}):\n", entry.inbound.len()));
    for edge in &entry.inbound {
        out.push_str(&format!("    {}\n", edge.source));
    }
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
