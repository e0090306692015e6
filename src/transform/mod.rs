//! Transform engine: compile a rule registry into a renderable component.

pub mod component;
pub mod config;
pub mod engine;

pub use component::{transform_rules_to_component, Instance, ProducedComponent, PropError};
pub use config::{ContainingElement, OutputConfig, SetupHook};
pub use engine::{RenderOutput, DATA_PROP, ORDINAL_PROP};
