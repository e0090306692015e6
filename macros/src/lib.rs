//! Proc macros for rule-render: `view!` RSX render-tree composition.
//!
//! This crate is not meant to be used directly — enable the `macros` feature on `rule-render`.

use proc_macro::TokenStream;

mod view_macro;

/// RSX-style render-tree macro.
///
/// Expands to a `Vec<rule_render::node::RenderNode>` built with
/// `create_element`.
///
/// # Syntax
///
/// - `<tag />` — host element with no children
/// - `<tag attr="val" attr={expr}> ... </tag>` — element with children
/// - `"text"` — text node
/// - `{expr}` — any expression convertible into a `RenderNode`
///
/// Attribute values go through `rule_render::Value::from`.
///
/// # Example
///
/// ```ignore
/// let title = "Inbox";
/// let nodes = view! {
///     <section class="panel">
///         <h2>{title}</h2>
///         <p count={3}>"three new messages"</p>
///     </section>
/// };
/// ```
#[proc_macro]
pub fn view(input: TokenStream) -> TokenStream {
    view_macro::view_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
