//! ProducedComponent and its mounted Instance.
//!
//! A [`ProducedComponent`] is the definition returned by the transform: the
//! registry, the output configuration, the derived property surface, and the
//! declared events. Mounting it yields an [`Instance`] that holds the bound
//! properties, the `data` list, the globals handle, and the event queue.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::context::{Event, EventEmitter, Globals, RenderContext, SetupContext, UPDATE_PREFIX};
use crate::node::{Component, ElementTarget, RenderNode};
use crate::props::{props_from_value, PropSpec, PropSpecs, PropType, Props};
use crate::rule::RuleRegistry;

use super::config::{ContainingElement, OutputConfig};
use super::engine::{self, RenderOutput, DATA_PROP};

/// Errors raised when binding properties on an instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropError {
    #[error("`data` must be an array, got {0}")]
    DataNotArray(String),
    #[error("data item {index} is not an object")]
    ItemNotObject { index: usize },
    #[error("`{0}` is not a bindable input property")]
    NotBindable(String),
}

// ---------------------------------------------------------------------------
// ProducedComponent
// ---------------------------------------------------------------------------

/// Globals scope of a produced component.
#[derive(Debug, Clone)]
enum Mode {
    /// Fresh globals per instance.
    Stateful,
    /// One globals map captured at construction, shared by every instance.
    Functional(Globals),
}

struct Definition {
    registry: RuleRegistry,
    config: OutputConfig,
    properties: PropSpecs,
    emits: Vec<String>,
    mode: Mode,
}

/// Component produced from a rule registry. Cheap to clone; clones share the
/// same definition (and, in functional mode, the same globals).
#[derive(Clone)]
pub struct ProducedComponent {
    def: Rc<Definition>,
}

/// Compile `rules` into a component that renders a `data` list of items, each
/// by its first structurally matching rule.
pub fn transform_rules_to_component(
    rules: impl Into<RuleRegistry>,
    config: OutputConfig,
) -> ProducedComponent {
    ProducedComponent::new(rules.into(), config)
}

impl ProducedComponent {
    fn new(registry: RuleRegistry, config: OutputConfig) -> Self {
        let mut properties = PropSpecs::new();
        properties.insert(
            DATA_PROP.to_owned(),
            PropSpec::new(PropType::Array).with_default(Value::Array(Vec::new())),
        );
        let mut emits: Vec<String> = Vec::new();

        for rule in &registry {
            for (name, spec) in rule.input_props() {
                if name == DATA_PROP {
                    log::warn!("rule {}: input property `data` is reserved; ignoring", rule.name());
                    continue;
                }
                if !properties.contains_key(name) {
                    properties.insert(name.clone(), spec.clone());
                    emits.push(format!("{UPDATE_PREFIX}{name}"));
                }
            }
            for event in rule.emitted_events() {
                if !emits.contains(event) {
                    emits.push(event.clone());
                }
            }
        }

        let mode = if config.is_functional() {
            if config.setup_hook.is_some() {
                log::warn!("setup hook ignored: functional components have no instance state");
            }
            Mode::Functional(Globals::new())
        } else {
            Mode::Stateful
        };

        Self {
            def: Rc::new(Definition {
                registry,
                config,
                properties,
                emits,
                mode,
            }),
        }
    }

    /// Property surface: `data` followed by every rule `input` property, in
    /// first-declaration order.
    pub fn properties(&self) -> &PropSpecs {
        &self.def.properties
    }

    /// Union of every rule's events, plus `update:<prop>` per input property.
    pub fn emitted_events(&self) -> &[String] {
        &self.def.emits
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.def.registry
    }

    pub fn config(&self) -> &OutputConfig {
        &self.def.config
    }

    /// Whether this definition shares one globals map across instances.
    pub fn is_functional(&self) -> bool {
        matches!(self.def.mode, Mode::Functional(_))
    }

    /// The definition-wide globals, in functional mode.
    pub fn shared_globals(&self) -> Option<&Globals> {
        match &self.def.mode {
            Mode::Functional(globals) => Some(globals),
            Mode::Stateful => None,
        }
    }

    /// Create an instance from the passed properties.
    ///
    /// Declared properties (`data` and input properties) are bound; anything
    /// else is kept as an attribute. A stateful instance gets fresh globals and
    /// runs the setup hook; a functional instance reuses the definition's
    /// globals.
    pub fn mount(&self, passed: Props) -> Result<Instance, PropError> {
        let mut bound = Props::new();
        let mut attrs = Props::new();
        let mut data = Vec::new();

        for (key, value) in passed {
            if key == DATA_PROP {
                data = parse_data(value)?;
            } else if self.def.properties.contains_key(&key) {
                bound.insert(key, value);
            } else {
                attrs.insert(key, value);
            }
        }

        let globals = match &self.def.mode {
            Mode::Functional(globals) => globals.clone(),
            Mode::Stateful => {
                let globals = Globals::new();
                if let Some(hook) = &self.def.config.setup_hook {
                    log::debug!("running setup hook");
                    let mut all = bound.clone();
                    all.insert(
                        DATA_PROP.to_owned(),
                        Value::Array(data.iter().map(crate::props::props_to_value).collect()),
                    );
                    hook(&SetupContext {
                        props: &all,
                        attrs: &attrs,
                        globals: &globals,
                    });
                }
                globals
            }
        };

        Ok(Instance {
            component: self.clone(),
            bound,
            attrs,
            data,
            globals,
            emitter: EventEmitter::new(self.def.emits.iter().cloned()),
        })
    }

    /// Whether two handles refer to the same definition.
    pub fn same_definition(&self, other: &ProducedComponent) -> bool {
        Rc::ptr_eq(&self.def, &other.def)
    }
}

impl fmt::Debug for ProducedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducedComponent")
            .field("rules", &self.def.registry.len())
            .field("properties", &self.def.properties.keys().collect::<Vec<_>>())
            .field("emits", &self.def.emits)
            .field("config", &self.def.config)
            .finish()
    }
}

impl Component for ProducedComponent {
    fn name(&self) -> &str {
        self.def.config.name()
    }

    fn properties(&self) -> PropSpecs {
        self.def.properties.clone()
    }

    fn emitted_events(&self) -> Vec<String> {
        self.def.emits.clone()
    }

    /// Render embedded in another tree: mount a transient instance over
    /// `props` and run one pass. A stateful definition gets fresh globals and
    /// a setup-hook run each time; a functional one uses its shared globals.
    /// Events emitted here have no listener and are dropped; mount through
    /// [`Host`](crate::host::Host) to observe them. Slot content is ignored.
    fn render(&self, props: &Props, _slot: &[RenderNode]) -> RenderNode {
        let mut instance = match self.mount(props.clone()) {
            Ok(instance) => instance,
            Err(err) => {
                log::warn!("{}: {err}; rendering nothing", self.name());
                return RenderNode::Fragment(Vec::new());
            }
        };
        let node = instance.render();
        let dropped = instance.take_events();
        if !dropped.is_empty() {
            log::debug!("{}: dropped {} embedded event(s)", self.name(), dropped.len());
        }
        node
    }
}

impl From<ProducedComponent> for ElementTarget {
    fn from(component: ProducedComponent) -> Self {
        ElementTarget::Component(Rc::new(component))
    }
}

impl From<ProducedComponent> for ContainingElement {
    fn from(component: ProducedComponent) -> Self {
        ContainingElement::Component(Rc::new(component))
    }
}

fn parse_data(value: Value) -> Result<Vec<Props>, PropError> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(PropError::DataNotArray(other.to_string())),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| props_from_value(item).ok_or(PropError::ItemNotObject { index }))
        .collect()
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

/// A mounted produced component.
#[derive(Debug)]
pub struct Instance {
    component: ProducedComponent,
    bound: Props,
    attrs: Props,
    data: Vec<Props>,
    globals: Globals,
    emitter: EventEmitter,
}

impl Instance {
    /// Run a render pass over the current `data`.
    pub fn render_pass(&self) -> RenderOutput {
        let def = &self.component.def;
        let ctx = RenderContext::new(
            self.globals.clone(),
            self.attrs.clone(),
            self.emitter.clone(),
        );
        let (nodes, unmatched) =
            engine::render_items(&def.registry, &self.data, &self.bound, &ctx);
        let forwarded = engine::forwarded_props(&self.bound, &self.attrs);
        RenderOutput {
            node: engine::shape_output(nodes, &def.config.containing_element, forwarded),
            unmatched,
        }
    }

    /// Run a render pass and return only the render tree.
    pub fn render(&self) -> RenderNode {
        self.render_pass().node
    }

    /// The definition this instance was mounted from.
    pub fn component(&self) -> &ProducedComponent {
        &self.component
    }

    pub fn data(&self) -> &[Props] {
        &self.data
    }

    /// Replace the item list.
    pub fn set_data(&mut self, data: Vec<Props>) {
        self.data = data;
    }

    /// Replace the item list from a JSON array value.
    pub fn set_data_value(&mut self, value: Value) -> Result<(), PropError> {
        self.data = parse_data(value)?;
        Ok(())
    }

    /// Bound input properties (never contains `data`).
    pub fn bound(&self) -> &Props {
        &self.bound
    }

    /// Undeclared attributes.
    pub fn attrs(&self) -> &Props {
        &self.attrs
    }

    /// Bind an input property.
    pub fn set_prop(&mut self, name: &str, value: impl Into<Value>) -> Result<(), PropError> {
        if name == DATA_PROP || !self.component.def.properties.contains_key(name) {
            return Err(PropError::NotBindable(name.to_owned()));
        }
        self.bound.insert(name.to_owned(), value.into());
        Ok(())
    }

    /// Unbind an input property, returning its value.
    pub fn unset_prop(&mut self, name: &str) -> Option<Value> {
        self.bound.shift_remove(name)
    }

    /// This instance's globals handle.
    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    /// Drain events emitted by render functions, in emission order.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.emitter.drain()
    }

    /// Drain events, applying every `update:<prop>` to the bound property and
    /// returning the remaining events. `update:data` replaces the item list;
    /// a payload that is not a valid list is returned with the rest.
    pub fn sync_bindings(&mut self) -> Vec<Event> {
        let mut rest = Vec::new();
        for event in self.emitter.drain() {
            match event.bound_property() {
                Some(DATA_PROP) => match parse_data(event.payload.clone()) {
                    Ok(data) => self.data = data,
                    Err(err) => {
                        log::warn!("ignoring `{}`: {err}", event.name);
                        rest.push(event);
                    }
                },
                Some(prop) if self.component.def.properties.contains_key(prop) => {
                    self.bound.insert(prop.to_owned(), event.payload);
                }
                _ => rest.push(event),
            }
        }
        rest
    }
}
