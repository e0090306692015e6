//! Snapshot rendering helpers.
//!
//! Functions for converting render trees into indented pseudo-markup suitable
//! for snapshot testing and assertions.

use crate::node::RenderNode;
use crate::props::{Props, Value};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render a tree to indented pseudo-markup.
///
/// Each element, component, or text node is one line; children are indented
/// by two spaces. Childless elements are self-closing. Fragments contribute
/// their children at the fragment's own depth. String attributes are quoted;
/// other values are written as JSON. Lines are joined with `'\n'` and the
/// last line has no trailing newline.
///
/// # Examples
///
/// ```
/// use rule_render::node::{create_element, RenderNode};
/// use rule_render::props;
/// use rule_render::testing::render_to_string;
///
/// let node = create_element("p", props! { "class" => "note" }, vec![RenderNode::text("hi")]);
/// assert_eq!(render_to_string(&node), "<p class=\"note\">\n  hi\n</p>");
/// ```
pub fn render_to_string(node: &RenderNode) -> String {
    let mut lines = Vec::new();
    write_node(node, 0, &mut lines);
    lines.join("\n")
}

/// Render the tree after expanding every component into its own output.
pub fn render_expanded_to_string(node: &RenderNode) -> String {
    render_to_string(&node.expand())
}

/// Format an attribute map as ` key="value" key=value`.
pub fn attrs_to_string(attrs: &Props) -> String {
    let mut out = String::new();
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push('=');
        match value {
            Value::String(s) => {
                out.push('"');
                out.push_str(s);
                out.push('"');
            }
            other => out.push_str(&other.to_string()),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn write_node(node: &RenderNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match node {
        RenderNode::Text(text) => lines.push(format!("{indent}{text}")),
        RenderNode::Fragment(children) => {
            for child in children {
                write_node(child, depth, lines);
            }
        }
        RenderNode::Element { .. } | RenderNode::Component { .. } => {
            let name = node.tag().unwrap_or_default();
            let attrs = node.attrs().map(attrs_to_string).unwrap_or_default();
            let children = node.children();
            if children.is_empty() {
                lines.push(format!("{indent}<{name}{attrs} />"));
            } else {
                lines.push(format!("{indent}<{name}{attrs}>"));
                for child in children {
                    write_node(child, depth + 1, lines);
                }
                lines.push(format!("{indent}</{name}>"));
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
