//! Render pass: per-item rule selection, property resolution, output shaping.
//!
//! Everything here is a pure function of the registry, the `data` list, and
//! the bound properties, except for whatever the rule render functions do
//! with the context they are handed.

use crate::context::RenderContext;
use crate::node::{create_element, RenderNode};
use crate::props::Props;
use crate::rule::{Rule, RuleRegistry};

use super::config::ContainingElement;

/// Name of the item-list property of the produced component.
pub const DATA_PROP: &str = "data";

/// Resolved property carrying the item's ordinal position in `data`.
pub const ORDINAL_PROP: &str = "id";

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// The shaped render tree.
    pub node: RenderNode,
    /// Positions in `data` of the items that matched no rule.
    pub unmatched: Vec<usize>,
}

/// Merge properties for one matched item.
///
/// Override order: rule defaults, then bound component properties (`data`
/// excluded), then the item's own fields, then the ordinal under `id`.
pub fn resolve_props(rule: &Rule, bound: &Props, item: &Props, index: usize) -> Props {
    let mut resolved = rule.defaults();
    for (key, value) in bound {
        if key != DATA_PROP {
            resolved.insert(key.clone(), value.clone());
        }
    }
    for (key, value) in item {
        resolved.insert(key.clone(), value.clone());
    }
    resolved.insert(ORDINAL_PROP.to_owned(), index.into());
    resolved
}

/// Render every item of `data` in order.
///
/// Unmatched items contribute nothing and are reported by index; matched
/// siblings keep their relative order.
pub fn render_items(
    registry: &RuleRegistry,
    data: &[Props],
    bound: &Props,
    ctx: &RenderContext,
) -> (Vec<RenderNode>, Vec<usize>) {
    let mut nodes = Vec::with_capacity(data.len());
    let mut unmatched = Vec::new();

    for (index, item) in data.iter().enumerate() {
        let Some(rule) = registry.match_item(item) else {
            log::warn!(
                "no rule matches item {index} (keys: {:?}); skipping",
                item.keys().collect::<Vec<_>>()
            );
            unmatched.push(index);
            continue;
        };
        let resolved = resolve_props(rule, bound, item, index);
        nodes.push(rule.render(&resolved, ctx, index));
    }

    (nodes, unmatched)
}

/// Properties forwarded to a wrapping component: bound properties then
/// attributes, both without `data`.
pub fn forwarded_props(bound: &Props, attrs: &Props) -> Props {
    bound
        .iter()
        .chain(attrs.iter())
        .filter(|(key, _)| *key != DATA_PROP)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Compose rendered nodes according to `containing`.
pub fn shape_output(
    nodes: Vec<RenderNode>,
    containing: &ContainingElement,
    forwarded: Props,
) -> RenderNode {
    match containing {
        ContainingElement::None => RenderNode::Fragment(nodes),
        ContainingElement::Tag(tag) => create_element(tag.as_str(), Props::new(), nodes),
        ContainingElement::Component(component) => {
            create_element(component.clone(), forwarded, nodes)
        }
    }
}
