//! Rules and the rule registry.

pub mod definition;
pub mod registry;

pub use definition::{define_rule, RenderFn, Rule};
pub use registry::{RuleError, RuleRegistry};
