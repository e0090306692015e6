//! RSX view! macro: parse JSX-like syntax and generate rule-render node code.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{braced, Error, Expr, Ident, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// Value of an attribute: a string literal or a braced expression.
#[derive(Clone)]
pub(crate) enum AttrValue {
    Lit(LitStr),
    Expr(Expr),
}

/// A parsed RSX attribute: `name="value"` or `name={expr}`.
#[derive(Clone)]
pub(crate) struct Attribute {
    pub name: Ident,
    pub value: AttrValue,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match &self.value {
            AttrValue::Lit(lit) => lit.value(),
            AttrValue::Expr(expr) => quote!(#expr).to_string(),
        };
        f.debug_struct("Attribute")
            .field("name", &self.name.to_string())
            .field("value", &value)
            .finish()
    }
}

/// A parsed RSX element: `<tag attrs... />` or `<tag attrs...> children </tag>`.
#[derive(Clone)]
pub(crate) struct Element {
    pub tag: Ident,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag.to_string())
            .field("attrs", &self.attrs)
            .field("children", &self.children.len())
            .field("self_closing", &self.self_closing)
            .finish()
    }
}

/// Any node position: element, text literal, or braced expression.
#[derive(Clone, Debug)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
    Expr(ExprNode),
}

/// Wrapper so `Node` can derive `Debug`.
#[derive(Clone)]
pub(crate) struct ExprNode(Expr);

impl std::fmt::Debug for ExprNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let expr = &self.0;
        write!(f, "{{{}}}", quote!(#expr))
    }
}

/// The top-level view! input: a sequence of nodes.
#[derive(Debug)]
struct ViewInput {
    nodes: Vec<Node>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for ViewInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut nodes = Vec::new();
        while !input.is_empty() {
            nodes.push(parse_node(input)?);
        }
        Ok(ViewInput { nodes })
    }
}

/// Parse one node: `<...>`, `"text"`, or `{expr}`.
pub(crate) fn parse_node(input: ParseStream) -> Result<Node> {
    if input.peek(Token![<]) {
        return parse_element(input).map(Node::Element);
    }
    if input.peek(LitStr) {
        let lit: LitStr = input.parse()?;
        return Ok(Node::Text(lit.value()));
    }
    if input.peek(syn::token::Brace) {
        let content;
        braced!(content in input);
        let expr: Expr = content.parse()?;
        return Ok(Node::Expr(ExprNode(expr)));
    }
    Err(input.error("expected `<element>`, a string literal, or `{expression}`"))
}

/// Parse a single RSX element from the token stream.
pub(crate) fn parse_element(input: ParseStream) -> Result<Element> {
    // Expect `<`
    input.parse::<Token![<]>()?;

    // Parse tag name
    let tag: Ident = input.parse()?;

    // Parse attributes until we hit `/>` or `>`
    let mut attrs = Vec::new();
    loop {
        // Check for self-closing `/>`.
        if input.peek(Token![/]) {
            input.parse::<Token![/]>()?;
            input.parse::<Token![>]>()?;
            return Ok(Element {
                tag,
                attrs,
                children: Vec::new(),
                self_closing: true,
            });
        }

        // Check for open tag close `>`.
        if input.peek(Token![>]) {
            input.parse::<Token![>]>()?;
            break;
        }

        // Parse attribute: `name = "value"` or `name = {expr}`
        let attr_name: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        let value = if input.peek(syn::token::Brace) {
            let content;
            braced!(content in input);
            AttrValue::Expr(content.parse()?)
        } else {
            AttrValue::Lit(input.parse()?)
        };
        attrs.push(Attribute {
            name: attr_name,
            value,
        });
    }

    // Parse children until closing tag `</tag>`.
    let mut children = Vec::new();
    loop {
        if input.is_empty() {
            return Err(Error::new(
                tag.span(),
                format!("unclosed element: expected `</{}>`", tag),
            ));
        }

        // Check for closing tag: `</`
        if input.peek(Token![<]) && input.peek2(Token![/]) {
            input.parse::<Token![<]>()?;
            input.parse::<Token![/]>()?;
            let closing_tag: Ident = input.parse()?;
            if closing_tag != tag {
                return Err(Error::new(
                    closing_tag.span(),
                    format!(
                        "mismatched closing tag: expected `</{}>`, found `</{}>`",
                        tag, closing_tag
                    ),
                ));
            }
            input.parse::<Token![>]>()?;
            break;
        }

        children.push(parse_node(input)?);
    }

    Ok(Element {
        tag,
        attrs,
        children,
        self_closing: false,
    })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// Generate code for a single node.
fn generate_node(node: &Node) -> TokenStream {
    match node {
        Node::Element(elem) => generate_element(elem),
        Node::Text(text) => quote! { ::rule_render::node::RenderNode::text(#text) },
        Node::Expr(ExprNode(expr)) => quote! { ::rule_render::node::RenderNode::from(#expr) },
    }
}

/// Generate code for a single element.
fn generate_element(elem: &Element) -> TokenStream {
    let tag = elem.tag.to_string();

    let inserts: Vec<TokenStream> = elem
        .attrs
        .iter()
        .map(|attr| {
            let name = attr.name.to_string();
            let value = match &attr.value {
                AttrValue::Lit(lit) => quote! { #lit },
                AttrValue::Expr(expr) => quote! { #expr },
            };
            quote! {
                __attrs.insert(
                    ::std::string::String::from(#name),
                    ::rule_render::Value::from(#value),
                );
            }
        })
        .collect();

    let children: Vec<TokenStream> = elem.children.iter().map(generate_node).collect();

    quote! {
        ::rule_render::node::create_element(
            #tag,
            {
                #[allow(unused_mut)]
                let mut __attrs = ::rule_render::props::Props::new();
                #(#inserts)*
                __attrs
            },
            ::std::vec![#(#children),*],
        )
    }
}

/// Entry point: generate code for the entire view! macro.
pub(crate) fn view_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: ViewInput = syn::parse2(input)?;

    if parsed.nodes.is_empty() {
        return Err(Error::new(
            Span::call_site(),
            "view! macro requires at least one node",
        ));
    }

    let nodes: Vec<TokenStream> = parsed.nodes.iter().map(generate_node).collect();

    Ok(quote! {
        {
            let __nodes: ::std::vec::Vec<::rule_render::node::RenderNode> =
                ::std::vec![#(#nodes),*];
            __nodes
        }
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    // Helper: parse a token stream into a ViewInput.
    fn parse_view(tokens: TokenStream) -> Result<ViewInput> {
        syn::parse2(tokens)
    }

    // Helper: parse a single element.
    fn parse_single_element(tokens: TokenStream) -> Result<Element> {
        syn::parse2::<ViewInput>(tokens).map(|v| match v.nodes.into_iter().next() {
            Some(Node::Element(elem)) => elem,
            other => panic!("expected element, got {:?}", other),
        })
    }

    // -----------------------------------------------------------------------
    // Parsing tests
    // -----------------------------------------------------------------------

    #[test]
    fn parse_self_closing_element() {
        let elem = parse_single_element(quote! { <hr class="rule" /> }).unwrap();
        assert_eq!(elem.tag.to_string(), "hr");
        assert!(elem.self_closing);
        assert!(elem.children.is_empty());
        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.attrs[0].name.to_string(), "class");
        assert!(matches!(&elem.attrs[0].value, AttrValue::Lit(l) if l.value() == "rule"));
    }

    #[test]
    fn parse_expression_attribute() {
        let elem = parse_single_element(quote! { <li index={i + 1} /> }).unwrap();
        assert!(matches!(elem.attrs[0].value, AttrValue::Expr(_)));
    }

    #[test]
    fn parse_mixed_children() {
        let elem = parse_single_element(quote! {
            <p>
                "Hello, "
                {name}
                <b>"!"</b>
            </p>
        })
        .unwrap();
        assert_eq!(elem.children.len(), 3);
        assert!(matches!(&elem.children[0], Node::Text(t) if t == "Hello, "));
        assert!(matches!(elem.children[1], Node::Expr(_)));
        assert!(matches!(&elem.children[2], Node::Element(e) if e.tag == "b"));
    }

    #[test]
    fn parse_nested_elements() {
        let elem = parse_single_element(quote! {
            <ul>
                <li>
                    <span>"deep"</span>
                </li>
            </ul>
        })
        .unwrap();
        let Node::Element(li) = &elem.children[0] else {
            panic!("expected li");
        };
        assert_eq!(li.children.len(), 1);
    }

    #[test]
    fn parse_multiple_root_nodes() {
        let view = parse_view(quote! {
            <h1>"Title"</h1>
            "loose text"
            {extra}
        })
        .unwrap();
        assert_eq!(view.nodes.len(), 3);
    }

    #[test]
    fn parse_error_mismatched_closing_tag() {
        let result = parse_single_element(quote! {
            <div>
                <span />
            </section>
        });
        let err = result.unwrap_err().to_string();
        assert!(err.contains("mismatched closing tag"));
    }

    #[test]
    fn parse_error_unclosed_element() {
        let result = parse_view(quote! { <div> "x" });
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unclosed element"));
    }

    #[test]
    fn parse_error_bad_child() {
        let result = parse_view(quote! { <div> 42 </div> });
        assert!(result.is_err());
    }

    // -----------------------------------------------------------------------
    // Code generation tests
    // -----------------------------------------------------------------------

    #[test]
    fn codegen_element_uses_create_element() {
        let elem = parse_single_element(quote! { <hr /> }).unwrap();
        let code_str = generate_element(&elem).to_string();
        assert!(code_str.contains("create_element"), "got: {}", code_str);
        assert!(code_str.contains("\"hr\""), "got: {}", code_str);
    }

    #[test]
    fn codegen_attributes_insert_values() {
        let elem = parse_single_element(quote! { <p id="main" count={3} /> }).unwrap();
        let code_str = generate_element(&elem).to_string();
        assert!(code_str.contains("\"id\""), "got: {}", code_str);
        assert!(code_str.contains("\"main\""), "got: {}", code_str);
        assert!(code_str.contains("Value :: from (3)"), "got: {}", code_str);
    }

    #[test]
    fn codegen_text_and_expr_children() {
        let elem = parse_single_element(quote! { <p>"a" {b}</p> }).unwrap();
        let code_str = generate_element(&elem).to_string();
        assert!(code_str.contains("RenderNode :: text (\"a\")"), "got: {}", code_str);
        assert!(code_str.contains("RenderNode :: from (b)"), "got: {}", code_str);
    }

    #[test]
    fn codegen_full_view() {
        let code_str = view_impl(quote! {
            <h1>"Title"</h1>
            <p>"Body"</p>
        })
        .unwrap()
        .to_string();
        assert!(code_str.contains("__nodes"));
        assert!(code_str.contains("\"h1\""));
        assert!(code_str.contains("\"p\""));
    }

    #[test]
    fn codegen_empty_view_is_error() {
        let result = view_impl(quote! {});
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at least one node"));
    }
}
