//! Host arena: mount, render, update, and unmount produced-component instances.
//!
//! [`Host`] is a minimal in-process stand-in for a UI framework runtime. Every
//! mounted [`Instance`] lives in a slotmap arena under an [`InstanceId`].
//! Unmounting drops the instance, and with it its globals handle (the last
//! handle, for stateful instances). Lifecycle events accumulate until drained.

use slotmap::{new_key_type, SlotMap};

use crate::context::Event;
use crate::node::RenderNode;
use crate::props::{Props, Value};
use crate::transform::{Instance, ProducedComponent, PropError, RenderOutput};

new_key_type! {
    /// Identifier of a mounted instance. Copy, lightweight (u64).
    pub struct InstanceId;
}

/// Errors from host operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("no mounted instance {0:?}")]
    UnknownInstance(InstanceId),
    #[error(transparent)]
    Prop(#[from] PropError),
}

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// Events that occur during an instance's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// An instance was mounted.
    Mount { id: InstanceId },
    /// An instance was unmounted and its state discarded.
    Unmount { id: InstanceId },
    /// An instance's `data` or bound properties changed.
    Update { id: InstanceId },
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// Arena of mounted instances.
#[derive(Debug, Default)]
pub struct Host {
    instances: SlotMap<InstanceId, Instance>,
    pending: Vec<LifecycleEvent>,
}

impl Host {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `component` with the passed properties.
    pub fn mount(
        &mut self,
        component: &ProducedComponent,
        passed: Props,
    ) -> Result<InstanceId, HostError> {
        let instance = component.mount(passed)?;
        let id = self.instances.insert(instance);
        log::debug!("mounted instance {id:?}");
        self.pending.push(LifecycleEvent::Mount { id });
        Ok(id)
    }

    /// Unmount and return the instance. `None` if it was not mounted.
    pub fn unmount(&mut self, id: InstanceId) -> Option<Instance> {
        let instance = self.instances.remove(id)?;
        log::debug!("unmounted instance {id:?}");
        self.pending.push(LifecycleEvent::Unmount { id });
        Some(instance)
    }

    /// Run a render pass on a mounted instance.
    pub fn render(&self, id: InstanceId) -> Result<RenderNode, HostError> {
        Ok(self.instance(id)?.render())
    }

    /// Run a render pass and return the unmatched item positions as well.
    pub fn render_pass(&self, id: InstanceId) -> Result<RenderOutput, HostError> {
        Ok(self.instance(id)?.render_pass())
    }

    /// Replace an instance's `data` list.
    pub fn set_data(&mut self, id: InstanceId, data: Vec<Props>) -> Result<(), HostError> {
        self.instance_mut(id)?.set_data(data);
        self.pending.push(LifecycleEvent::Update { id });
        Ok(())
    }

    /// Bind an input property on an instance.
    pub fn set_prop(
        &mut self,
        id: InstanceId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), HostError> {
        self.instance_mut(id)?.set_prop(name, value)?;
        self.pending.push(LifecycleEvent::Update { id });
        Ok(())
    }

    /// Apply pending `update:<prop>` events of an instance and return the
    /// other emitted events. Records an update if a binding or `data` changed.
    pub fn sync_bindings(&mut self, id: InstanceId) -> Result<Vec<Event>, HostError> {
        let instance = self.instance_mut(id)?;
        let bound = instance.bound().clone();
        let data = instance.data().to_vec();
        let rest = instance.sync_bindings();
        if *instance.bound() != bound || instance.data() != data.as_slice() {
            self.pending.push(LifecycleEvent::Update { id });
        }
        Ok(rest)
    }

    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.instances.get_mut(id)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    /// Number of mounted instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Drain and return all pending lifecycle events.
    pub fn pending_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Unmount everything.
    pub fn clear(&mut self) {
        let ids: Vec<InstanceId> = self.instances.keys().collect();
        for id in ids {
            self.unmount(id);
        }
    }

    fn instance(&self, id: InstanceId) -> Result<&Instance, HostError> {
        self.instances.get(id).ok_or(HostError::UnknownInstance(id))
    }

    fn instance_mut(&mut self, id: InstanceId) -> Result<&mut Instance, HostError> {
        self.instances
            .get_mut(id)
            .ok_or(HostError::UnknownInstance(id))
    }
}
