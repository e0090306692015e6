//! Render tree: RenderNode, Component, create_element.
//!
//! A [`RenderNode`] is the unit of output of every render function. Host
//! elements are addressed by tag name; components are addressed through a
//! shared [`ComponentRef`] and carry their children as default slot content.

use std::fmt;
use std::rc::Rc;

use crate::props::{PropSpecs, Props};

// ---------------------------------------------------------------------------
// Component trait
// ---------------------------------------------------------------------------

/// A host component description: declared properties, declared events, and a
/// render function over resolved props and default slot content.
pub trait Component {
    /// Display name (used in snapshots and diagnostics).
    fn name(&self) -> &str;

    /// Declared properties. Defaults to none.
    fn properties(&self) -> PropSpecs {
        PropSpecs::new()
    }

    /// Declared events. Defaults to none.
    fn emitted_events(&self) -> Vec<String> {
        Vec::new()
    }

    /// Render this component given its props and default slot content.
    fn render(&self, props: &Props, slot: &[RenderNode]) -> RenderNode;
}

/// Shared, cheaply clonable handle to a component.
pub type ComponentRef = Rc<dyn Component>;

// ---------------------------------------------------------------------------
// RenderNode
// ---------------------------------------------------------------------------

/// A node in the render tree.
#[derive(Clone)]
pub enum RenderNode {
    /// Host element identified by tag name.
    Element {
        tag: String,
        attrs: Props,
        children: Vec<RenderNode>,
    },
    /// Component invocation. `children` is the default slot content.
    Component {
        component: ComponentRef,
        props: Props,
        children: Vec<RenderNode>,
    },
    /// Text content.
    Text(String),
    /// Ordered list of sibling nodes with no wrapper.
    Fragment(Vec<RenderNode>),
}

impl RenderNode {
    /// Text node.
    pub fn text(content: impl Into<String>) -> Self {
        RenderNode::Text(content.into())
    }

    /// Fragment node.
    pub fn fragment(children: Vec<RenderNode>) -> Self {
        RenderNode::Fragment(children)
    }

    /// Children of this node. Text nodes have none.
    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Element { children, .. }
            | RenderNode::Component { children, .. }
            | RenderNode::Fragment(children) => children.as_slice(),
            RenderNode::Text(_) => &[],
        }
    }

    /// Tag name for elements, component name for components.
    pub fn tag(&self) -> Option<&str> {
        match self {
            RenderNode::Element { tag, .. } => Some(tag.as_str()),
            RenderNode::Component { component, .. } => Some(component.name()),
            _ => None,
        }
    }

    /// Attributes of an element or props of a component.
    pub fn attrs(&self) -> Option<&Props> {
        match self {
            RenderNode::Element { attrs, .. } => Some(attrs),
            RenderNode::Component { props, .. } => Some(props),
            _ => None,
        }
    }

    /// Whether this is a fragment.
    pub fn is_fragment(&self) -> bool {
        matches!(self, RenderNode::Fragment(_))
    }

    /// Concatenated text content of this subtree, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            RenderNode::Text(t) => out.push_str(t),
            other => {
                for child in other.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Replace every component node by its rendered output, recursively.
    ///
    /// The result contains only elements, text, and fragments.
    pub fn expand(&self) -> RenderNode {
        match self {
            RenderNode::Element {
                tag,
                attrs,
                children,
            } => RenderNode::Element {
                tag: tag.clone(),
                attrs: attrs.clone(),
                children: children.iter().map(RenderNode::expand).collect(),
            },
            RenderNode::Component {
                component,
                props,
                children,
            } => {
                let slot: Vec<RenderNode> = children.iter().map(RenderNode::expand).collect();
                component.render(props, &slot).expand()
            }
            RenderNode::Text(t) => RenderNode::Text(t.clone()),
            RenderNode::Fragment(children) => {
                RenderNode::Fragment(children.iter().map(RenderNode::expand).collect())
            }
        }
    }
}

impl fmt::Debug for RenderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderNode::Element {
                tag,
                attrs,
                children,
            } => f
                .debug_struct("Element")
                .field("tag", tag)
                .field("attrs", attrs)
                .field("children", children)
                .finish(),
            RenderNode::Component {
                component,
                props,
                children,
            } => f
                .debug_struct("Component")
                .field("name", &component.name())
                .field("props", props)
                .field("children", children)
                .finish(),
            RenderNode::Text(t) => f.debug_tuple("Text").field(t).finish(),
            RenderNode::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
        }
    }
}

// Components compare by identity.
impl PartialEq for RenderNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                RenderNode::Element {
                    tag: t1,
                    attrs: a1,
                    children: c1,
                },
                RenderNode::Element {
                    tag: t2,
                    attrs: a2,
                    children: c2,
                },
            ) => t1 == t2 && a1 == a2 && c1 == c2,
            (
                RenderNode::Component {
                    component: k1,
                    props: p1,
                    children: c1,
                },
                RenderNode::Component {
                    component: k2,
                    props: p2,
                    children: c2,
                },
            ) => Rc::ptr_eq(k1, k2) && p1 == p2 && c1 == c2,
            (RenderNode::Text(a), RenderNode::Text(b)) => a == b,
            (RenderNode::Fragment(a), RenderNode::Fragment(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for RenderNode {
    fn from(s: &str) -> Self {
        RenderNode::Text(s.to_owned())
    }
}

impl From<String> for RenderNode {
    fn from(s: String) -> Self {
        RenderNode::Text(s)
    }
}

impl From<Vec<RenderNode>> for RenderNode {
    fn from(children: Vec<RenderNode>) -> Self {
        RenderNode::Fragment(children)
    }
}

// ---------------------------------------------------------------------------
// create_element
// ---------------------------------------------------------------------------

/// What `create_element` instantiates: a host tag or a component.
#[derive(Clone)]
pub enum ElementTarget {
    Tag(String),
    Component(ComponentRef),
}

impl From<&str> for ElementTarget {
    fn from(tag: &str) -> Self {
        ElementTarget::Tag(tag.to_owned())
    }
}

impl From<String> for ElementTarget {
    fn from(tag: String) -> Self {
        ElementTarget::Tag(tag)
    }
}

impl From<ComponentRef> for ElementTarget {
    fn from(component: ComponentRef) -> Self {
        ElementTarget::Component(component)
    }
}

/// Create an element or component node.
pub fn create_element(
    target: impl Into<ElementTarget>,
    attrs: Props,
    children: Vec<RenderNode>,
) -> RenderNode {
    match target.into() {
        ElementTarget::Tag(tag) => RenderNode::Element {
            tag,
            attrs,
            children,
        },
        ElementTarget::Component(component) => RenderNode::Component {
            component,
            props: attrs,
            children,
        },
    }
}
