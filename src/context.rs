//! Render context: shared globals, event emission, forwarded attributes.
//!
//! Every rule render invocation receives a [`RenderContext`]. The context is
//! passed explicitly; nothing is looked up ambiently. [`Globals`] is the
//! cross-sibling state channel: a shared handle to one mutable map whose
//! lifetime is bound to the owning instance (or definition, in functional
//! mode).

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::props::{Props, Value};

// ---------------------------------------------------------------------------
// Globals
// ---------------------------------------------------------------------------

/// Shared mutable key/value map visible to every rule render invocation.
///
/// Cloning produces another handle to the same map. Single-threaded: the
/// handle is `!Send`.
#[derive(Clone, Default)]
pub struct Globals(Rc<RefCell<IndexMap<String, Value>>>);

impl Globals {
    /// Create a fresh, empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    /// Remove `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Snapshot of all keys, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Run `f` with mutable access to the entry for `key`, inserting
    /// `Value::Null` first if absent.
    ///
    /// The map stays borrowed for the duration of `f`; `f` must not touch
    /// this `Globals` again.
    pub fn update<R>(&self, key: &str, f: impl FnOnce(&mut Value) -> R) -> R {
        let mut map = self.0.borrow_mut();
        let entry = map.entry(key.to_owned()).or_insert(Value::Null);
        f(entry)
    }

    /// Whether two handles point at the same map.
    pub fn shares_with(&self, other: &Globals) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Globals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.0.borrow().iter()).finish()
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Prefix of the event emitted to request a two-way bound property update.
pub const UPDATE_PREFIX: &str = "update:";

/// An event signalled upward by a render function.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event name.
    pub name: String,
    /// Event payload.
    pub payload: Value,
}

impl Event {
    pub fn new(name: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }

    /// The bound property name if this is an `update:<prop>` event.
    pub fn bound_property(&self) -> Option<&str> {
        self.name.strip_prefix(UPDATE_PREFIX)
    }
}

/// Queues events declared by the produced component; drops undeclared ones.
#[derive(Clone)]
pub struct EventEmitter {
    declared: Rc<HashSet<String>>,
    queue: Rc<RefCell<Vec<Event>>>,
}

impl EventEmitter {
    /// Create an emitter accepting only `declared` event names.
    pub fn new(declared: impl IntoIterator<Item = String>) -> Self {
        Self {
            declared: Rc::new(declared.into_iter().collect()),
            queue: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Whether `name` is a declared event.
    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    /// Queue an event. Returns `false` (and logs a warning) if undeclared.
    pub fn emit(&self, name: &str, payload: impl Into<Value>) -> bool {
        if !self.is_declared(name) {
            log::warn!("dropping undeclared event `{name}`");
            return false;
        }
        self.queue.borrow_mut().push(Event::new(name, payload));
        true
    }

    /// Drain all queued events in emission order.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("declared", &self.declared.len())
            .field("pending", &self.pending())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RenderContext
// ---------------------------------------------------------------------------

/// Context handed to every rule render invocation during a render pass.
#[derive(Debug, Clone)]
pub struct RenderContext {
    globals: Globals,
    attrs: Props,
    emitter: EventEmitter,
}

impl RenderContext {
    pub fn new(globals: Globals, attrs: Props, emitter: EventEmitter) -> Self {
        Self {
            globals,
            attrs,
            emitter,
        }
    }

    /// Shared globals of the owning instance (or definition).
    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    /// Attributes passed to the produced component that are not declared
    /// properties.
    pub fn attrs(&self) -> &Props {
        &self.attrs
    }

    /// Signal an event upward. Undeclared events are dropped.
    pub fn emit(&self, name: &str, payload: impl Into<Value>) -> bool {
        self.emitter.emit(name, payload)
    }

    /// Request that the caller update the two-way bound property `prop`.
    pub fn update(&self, prop: &str, value: impl Into<Value>) -> bool {
        self.emitter.emit(&format!("{UPDATE_PREFIX}{prop}"), value)
    }
}

// ---------------------------------------------------------------------------
// SetupContext
// ---------------------------------------------------------------------------

/// Argument of the setup hook run when a stateful instance is created.
#[derive(Debug)]
pub struct SetupContext<'a> {
    /// Declared properties the instance was created with (including `data`).
    pub props: &'a Props,
    /// Undeclared attributes the instance was created with.
    pub attrs: &'a Props,
    /// The instance's fresh globals.
    pub globals: &'a Globals,
}
