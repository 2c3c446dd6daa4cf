//! ASCII tree rendering for mind map documents.

use std::collections::HashSet;

use crate::graph::tree::{children_of, roots};
use crate::models::{Document, Node};

const HIDDEN_MARK: &str = " (hidden)";

/// Render a document as ASCII art.
///
/// Example output:
/// ```text
/// [Plans]
/// Root
/// ├── Research
/// │   └── Papers (hidden)
/// └── Writing
/// ```
///
/// Every node is printed at most once. Nodes only reachable through a cycle
/// are printed as extra roots after the real ones.
pub fn render_document(doc: &Document) -> String {
    let mut output = format!("[{}]\n", doc.name);
    let mut visited = HashSet::new();

    for root in roots(&doc.nodes, &doc.edges) {
        render_node(&mut output, doc, root, "", true, true, &mut visited);
    }
    for node in &doc.nodes {
        if !visited.contains(node.id.as_str()) {
            render_node(&mut output, doc, node, "", true, true, &mut visited);
        }
    }
    output
}

fn render_node<'a>(
    output: &mut String,
    doc: &'a Document,
    node: &'a Node,
    prefix: &str,
    is_last: bool,
    is_root: bool,
    visited: &mut HashSet<&'a str>,
) {
    visited.insert(node.id.as_str());

    if !is_root {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
    }
    output.push_str(&node.label);
    if node.hidden {
        output.push_str(HIDDEN_MARK);
    }
    output.push('\n');

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    // Claim direct children up front so a sibling's subtree cannot take them.
    let mut children: Vec<&Node> = Vec::new();
    for child in children_of(&node.id, &doc.nodes, &doc.edges) {
        if visited.insert(child.id.as_str()) {
            children.push(child);
        }
    }
    for (i, child) in children.iter().enumerate() {
        let child_is_last = i == children.len() - 1;
        render_node(output, doc, child, &child_prefix, child_is_last, false, visited);
    }
}
