//! Output configuration of the produced component.

use std::fmt;
use std::rc::Rc;

use crate::context::SetupContext;
use crate::node::ComponentRef;

/// Tag name used when no containing element is configured.
pub const DEFAULT_CONTAINER_TAG: &str = "div";

/// Component name used when none is configured.
pub const DEFAULT_COMPONENT_NAME: &str = "RuleList";

/// Initialization hook run once per stateful instance.
pub type SetupHook = Rc<dyn Fn(&SetupContext<'_>)>;

// ---------------------------------------------------------------------------
// ContainingElement
// ---------------------------------------------------------------------------

/// How the per-item render outputs are composed into one tree.
#[derive(Clone)]
pub enum ContainingElement {
    /// Return the rendered nodes unwrapped, as a fragment.
    None,
    /// Wrap the rendered nodes in a host element. No attributes are forwarded.
    Tag(String),
    /// Wrap the rendered nodes as the default slot content of a component,
    /// forwarding every passed attribute and bound property except `data`.
    Component(ComponentRef),
}

impl ContainingElement {
    /// Parse the string form: `"none"` means no wrapper, anything else is a tag.
    pub fn parse(s: &str) -> Self {
        if s == "none" {
            ContainingElement::None
        } else {
            ContainingElement::Tag(s.to_owned())
        }
    }
}

impl Default for ContainingElement {
    fn default() -> Self {
        ContainingElement::Tag(DEFAULT_CONTAINER_TAG.to_owned())
    }
}

impl From<&str> for ContainingElement {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<ComponentRef> for ContainingElement {
    fn from(component: ComponentRef) -> Self {
        ContainingElement::Component(component)
    }
}

impl fmt::Debug for ContainingElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainingElement::None => f.write_str("None"),
            ContainingElement::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            ContainingElement::Component(c) => f.debug_tuple("Component").field(&c.name()).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Configuration for [`transform_rules_to_component`](super::transform_rules_to_component).
#[derive(Clone, Default)]
pub struct OutputConfig {
    /// `false` (default): every mounted instance owns its own globals and runs
    /// the setup hook. `true`: a functional component whose globals are
    /// captured once and shared by every instance of the definition.
    ///
    /// Note the inversion: `true` means functional. Prefer reading it through
    /// [`OutputConfig::is_functional`].
    pub stateful_output: bool,
    /// Name of the produced component. Defaults to [`DEFAULT_COMPONENT_NAME`].
    pub name: Option<String>,
    /// Composition of the rendered nodes.
    pub containing_element: ContainingElement,
    /// Hook run when a stateful instance is created.
    pub setup_hook: Option<SetupHook>,
}

impl OutputConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output mode (builder).
    pub fn with_stateful_output(mut self, stateful_output: bool) -> Self {
        self.stateful_output = stateful_output;
        self
    }

    /// Set the component name (builder).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the containing element (builder).
    pub fn with_containing_element(mut self, element: impl Into<ContainingElement>) -> Self {
        self.containing_element = element.into();
        self
    }

    /// Set the setup hook (builder).
    pub fn with_setup_hook(mut self, hook: impl Fn(&SetupContext<'_>) + 'static) -> Self {
        self.setup_hook = Some(Rc::new(hook));
        self
    }

    /// Whether the produced component is functional (shared globals).
    pub fn is_functional(&self) -> bool {
        self.stateful_output
    }

    /// The configured component name, or the default.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_COMPONENT_NAME)
    }
}

impl fmt::Debug for OutputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputConfig")
            .field("stateful_output", &self.stateful_output)
            .field("name", &self.name())
            .field("containing_element", &self.containing_element)
            .field("setup_hook", &self.setup_hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OutputConfig::new();
        assert!(!config.stateful_output);
        assert!(!config.is_functional());
        assert!(config.setup_hook.is_none());
        assert_eq!(config.name(), DEFAULT_COMPONENT_NAME);
        assert!(matches!(
            config.containing_element,
            ContainingElement::Tag(ref t) if t == DEFAULT_CONTAINER_TAG
        ));
    }

    #[test]
    fn parse_none_and_tag() {
        assert!(matches!(ContainingElement::parse("none"), ContainingElement::None));
        assert!(matches!(
            ContainingElement::from("ul"),
            ContainingElement::Tag(ref t) if t == "ul"
        ));
    }

    #[test]
    fn builders() {
        let config = OutputConfig::new()
            .with_stateful_output(true)
            .with_containing_element("none")
            .with_name("Menu")
            .with_setup_hook(|_| {});
        assert!(config.is_functional());
        assert_eq!(config.name(), "Menu");
        assert!(config.setup_hook.is_some());
        assert!(matches!(config.containing_element, ContainingElement::None));
    }

    #[test]
    fn debug_is_readable() {
        let s = format!("{:?}", OutputConfig::new());
        assert!(s.contains("Tag(\"div\")"));
        assert!(s.contains("setup_hook: false"));
    }
}
