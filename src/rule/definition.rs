//! Rule: a named input shape paired with a render function.

use std::fmt;
use std::rc::Rc;

use crate::context::RenderContext;
use crate::node::RenderNode;
use crate::props::{PropSpec, PropSpecs, Props};

/// Render function of a rule: `(resolved props, context, ordinal) -> node`.
///
/// The ordinal is the zero-based position of the item in the current `data`
/// list, not a persistent identity.
pub type RenderFn = Rc<dyn Fn(&Props, &RenderContext, usize) -> RenderNode>;

/// One recognizable input shape and how to render it.
///
/// An item matches a rule when it carries a value under the rule's `name` and
/// every other key it carries is one of the rule's declared properties.
#[derive(Clone)]
pub struct Rule {
    name: String,
    props: PropSpecs,
    emits: Vec<String>,
    render: RenderFn,
}

impl Rule {
    /// Create a rule with no declared properties or events.
    pub fn new(
        name: impl Into<String>,
        render: impl Fn(&Props, &RenderContext, usize) -> RenderNode + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            props: PropSpecs::new(),
            emits: Vec::new(),
            render: Rc::new(render),
        }
    }

    /// Declare a property (builder). Re-declaring a name replaces its spec.
    pub fn with_prop(mut self, name: impl Into<String>, spec: PropSpec) -> Self {
        self.props.insert(name.into(), spec);
        self
    }

    /// Declare several properties (builder).
    pub fn with_props<K: Into<String>>(
        mut self,
        props: impl IntoIterator<Item = (K, PropSpec)>,
    ) -> Self {
        for (name, spec) in props {
            self.props.insert(name.into(), spec);
        }
        self
    }

    /// Declare an event this rule may emit (builder). Duplicates are ignored.
    pub fn with_emit(mut self, event: impl Into<String>) -> Self {
        let event = event.into();
        if !self.emits.contains(&event) {
            self.emits.push(event);
        }
        self
    }

    /// The discriminant key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared property specs, in declaration order.
    pub fn props(&self) -> &PropSpecs {
        &self.props
    }

    /// Declared events, in declaration order.
    pub fn emitted_events(&self) -> &[String] {
        &self.emits
    }

    /// Declared properties flagged `input`.
    pub fn input_props(&self) -> impl Iterator<Item = (&String, &PropSpec)> {
        self.props.iter().filter(|(_, spec)| spec.input)
    }

    /// Structural match test.
    pub fn matches(&self, item: &Props) -> bool {
        item.contains_key(&self.name)
            && item
                .keys()
                .all(|key| *key == self.name || self.props.contains_key(key))
    }

    /// Map of every declared property with a default to that default.
    pub fn defaults(&self) -> Props {
        self.props
            .iter()
            .filter_map(|(name, spec)| spec.default.clone().map(|d| (name.clone(), d)))
            .collect()
    }

    /// Invoke the render function.
    pub fn render(&self, props: &Props, ctx: &RenderContext, index: usize) -> RenderNode {
        (self.render)(props, ctx, index)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("props", &self.props)
            .field("emits", &self.emits)
            .finish_non_exhaustive()
    }
}

/// Identity helper for declaring rules; returns its argument unchanged.
pub fn define_rule(rule: Rule) -> Rule {
    rule
}
