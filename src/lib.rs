//! # rule-render
//!
//! Compile a set of declarative rules into one component that renders a
//! heterogeneous list of items.
//!
//! Each [`Rule`](rule::Rule) names an input shape and knows how to render it.
//! [`transform_rules_to_component`](transform::transform_rules_to_component)
//! turns an ordered list of rules into a [`ProducedComponent`](transform::ProducedComponent)
//! whose `data` property is a list of items; every item is rendered by the
//! first rule it structurally matches, with properties merged from the rule's
//! defaults, the component's bound inputs, and the item itself.
//!
//! ## Core Systems
//!
//! - **[`props`]** — Values, ordered property maps, property specifications
//! - **[`rule`]** — Rule definitions and the first-match-wins registry
//! - **[`transform`]** — Render pass, output shaping, produced component, instances
//! - **[`context`]** — Render context, shared globals, event emission
//! - **[`node`]** — Render tree nodes, `create_element`, the `Component` trait
//! - **[`host`]** — Slotmap arena of mounted instances with lifecycle events
//! - **[`testing`]** — Render trees to text for assertions

// Lets `view!`-generated paths resolve inside this crate's own tests.
extern crate self as rule_render;

// Foundation
pub mod props;
pub mod node;
pub mod context;

// Rules and the engine
pub mod rule;
pub mod transform;

// Runtime
pub mod host;

// Test support
pub mod testing;

pub use props::Value;
pub use rule::{define_rule, Rule, RuleRegistry};
pub use transform::{transform_rules_to_component, OutputConfig, ProducedComponent};

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use rule_render_macros::view;
