//! Integration tests for rule-render.
//!
//! These tests exercise the public API from outside the crate: rules compiled
//! into a component, mounted in a host, rendered, and inspected as markup.

use std::rc::Rc;

use pretty_assertions::assert_eq;
use rule_render::context::RenderContext;
use rule_render::host::{Host, LifecycleEvent};
use rule_render::node::{create_element, Component, RenderNode};
use rule_render::props::{present, PropSpec, PropType, Props};
use rule_render::testing::render_to_string;
use rule_render::transform::{ContainingElement, DATA_PROP, ORDINAL_PROP};
use rule_render::{
    define_rule, props, transform_rules_to_component, OutputConfig, Rule, RuleRegistry,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn heading() -> Rule {
    define_rule(
        Rule::new("heading", |props: &Props, _: &RenderContext, _| {
            create_element(
                "h1",
                Props::new(),
                vec![RenderNode::text(props["title"].as_str().unwrap_or_default())],
            )
        })
        .with_prop("title", PropSpec::string().required()),
    )
}

fn card() -> Rule {
    define_rule(
        Rule::new("card", |props: &Props, _: &RenderContext, i| {
            create_element(
                "article",
                props! { "index" => i as u64, "thing" => props["thing"].clone() },
                vec![RenderNode::text(props["body"].as_str().unwrap_or_default())],
            )
        })
        .with_prop("title", PropSpec::string())
        .with_prop("body", PropSpec::string().with_default("D"))
        .with_prop("thing", PropSpec::number().with_default(0).input()),
    )
}

/// Submenu rule coordinating "only one open" through globals.
fn submenu() -> Rule {
    Rule::new("submenu", |props: &Props, ctx: &RenderContext, _| {
        let label = props["label"].as_str().unwrap_or_default().to_owned();
        if props.get("open").and_then(|v| v.as_bool()).unwrap_or(false)
            && !ctx.globals().contains("open")
        {
            ctx.globals().set("open", label.clone());
            ctx.emit("opened", label.clone());
        }
        let open = ctx.globals().get("open") == Some(json!(label));
        create_element(
            "li",
            props! { "open" => open },
            vec![RenderNode::text(label)],
        )
    })
    .with_prop("label", PropSpec::string())
    .with_prop("open", PropSpec::boolean())
    .with_emit("opened")
}

struct Panel;

impl Component for Panel {
    fn name(&self) -> &str {
        "Panel"
    }

    fn render(&self, props: &Props, slot: &[RenderNode]) -> RenderNode {
        create_element("section", props.clone(), slot.to_vec())
    }
}

fn data(items: serde_json::Value) -> Props {
    props! { DATA_PROP => items }
}

fn flat() -> OutputConfig {
    OutputConfig::new().with_containing_element("none")
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[test]
fn first_match_wins() {
    let a = Rule::new("x", |_: &Props, _: &RenderContext, _| RenderNode::text("A"));
    let b = Rule::new("x", |_: &Props, _: &RenderContext, _| RenderNode::text("B"))
        .with_prop("extra", PropSpec::any());
    let comp = transform_rules_to_component(vec![a, b], flat());
    let inst = comp
        .mount(data(json!([{"x": true}, {"x": true, "extra": 1}])))
        .unwrap();
    assert_eq!(render_to_string(&inst.render()), "A\nB");
}

#[test]
fn unknown_field_rejected() {
    let registry = RuleRegistry::new([Rule::new("x", |_: &Props, _: &RenderContext, _| {
        RenderNode::text("A")
    })]);
    assert!(registry.match_item(&props! { "x" => present() }).is_some());
    assert!(registry
        .match_item(&props! { "x" => present(), "extra" => 1 })
        .is_none());
}

// ---------------------------------------------------------------------------
// Property resolution
// ---------------------------------------------------------------------------

#[test]
fn default_applied() {
    let comp = transform_rules_to_component(vec![card()], flat());
    let inst = comp.mount(data(json!([{"card": true, "title": "x"}]))).unwrap();
    assert_eq!(inst.render().text_content(), "D");
}

#[test]
fn bound_input_overrides_default() {
    let comp = transform_rules_to_component(vec![card()], flat());
    let inst = comp
        .mount(props! {
            DATA_PROP => json!([{"card": true, "title": "t"}]),
            "thing" => 1,
        })
        .unwrap();
    let node = inst.render();
    assert_eq!(node.children()[0].attrs().unwrap()["thing"], json!(1));
}

#[test]
fn item_field_overrides_bound_input() {
    let comp = transform_rules_to_component(vec![card()], flat());
    let inst = comp
        .mount(props! {
            DATA_PROP => json!([{"card": true, "thing": 5}]),
            "thing" => 1,
        })
        .unwrap();
    let node = inst.render();
    assert_eq!(node.children()[0].attrs().unwrap()["thing"], json!(5));
}

#[test]
fn ordinal_overrides_item_id() {
    let tagged = Rule::new("tagged", |props: &Props, _: &RenderContext, i| {
        assert_eq!(props[ORDINAL_PROP], json!(i));
        RenderNode::text(props[ORDINAL_PROP].to_string())
    })
    .with_prop("id", PropSpec::string());
    let comp = transform_rules_to_component(vec![tagged], flat());
    let inst = comp
        .mount(data(json!([
            {"tagged": true, "id": "first"},
            {"skip": true},
            {"tagged": true},
        ])))
        .unwrap();
    assert_eq!(render_to_string(&inst.render()), "0\n2");
}

// ---------------------------------------------------------------------------
// Ordering and shaping
// ---------------------------------------------------------------------------

#[test]
fn ordering_preserved_and_unmatched_dropped() {
    let comp = transform_rules_to_component(vec![heading(), card()], OutputConfig::new());
    let inst = comp
        .mount(data(json!([
            {"heading": true, "title": "Hello"},
            {"mystery": true},
            {"card": true, "body": "B"},
        ])))
        .unwrap();
    let out = inst.render_pass();
    assert_eq!(out.unmatched, vec![1]);
    insta::assert_snapshot!(render_to_string(&out.node), @r#"
    <div>
      <h1>
        Hello
      </h1>
      <article index=2 thing=0>
        B
      </article>
    </div>
    "#);
}

#[test]
fn containing_none_is_flat() {
    let comp = transform_rules_to_component(
        vec![heading()],
        OutputConfig::new().with_containing_element(ContainingElement::None),
    );
    let inst = comp
        .mount(data(json!([
            {"heading": true, "title": "a"},
            {"heading": true, "title": "b"},
            {"nope": true},
        ])))
        .unwrap();
    let node = inst.render();
    assert!(node.is_fragment());
    assert_eq!(node.children().len(), 2);
}

#[test]
fn containing_tag_wraps_without_forwarding() {
    let comp = transform_rules_to_component(
        vec![card()],
        OutputConfig::new().with_containing_element("ul"),
    );
    let inst = comp
        .mount(props! {
            DATA_PROP => json!([{"card": true}]),
            "thing" => 3,
            "class" => "cards",
        })
        .unwrap();
    let node = inst.render();
    assert_eq!(node.tag(), Some("ul"));
    assert!(node.attrs().unwrap().is_empty());
    assert_eq!(node.children().len(), 1);
}

#[test]
fn containing_component_forwards_all_but_data() {
    let panel: Rc<dyn Component> = Rc::new(Panel);
    let comp = transform_rules_to_component(
        vec![card()],
        OutputConfig::new().with_containing_element(panel),
    );
    let inst = comp
        .mount(props! {
            DATA_PROP => json!([{"card": true}]),
            "thing" => 3,
            "class" => "cards",
        })
        .unwrap();
    let node = inst.render();
    assert_eq!(node.tag(), Some("Panel"));
    assert_eq!(node.attrs().unwrap(), &props! { "thing" => 3, "class" => "cards" });
    insta::assert_snapshot!(render_to_string(&node.expand()), @r#"
    <section thing=3 class="cards">
      <article index=0 thing=3>
        D
      </article>
    </section>
    "#);
}

#[test]
fn produced_component_nests_in_rule_output() {
    let inner = transform_rules_to_component(
        vec![heading()],
        OutputConfig::new().with_containing_element("header").with_name("Headings"),
    );
    let section = Rule::new("section", move |props: &Props, _: &RenderContext, _| {
        create_element(
            "section",
            Props::new(),
            vec![create_element(
                inner.clone(),
                props! { DATA_PROP => props["headings"].clone(), "class" => "h" },
                vec![],
            )],
        )
    })
    .with_prop("headings", PropSpec::new(PropType::Array).with_default(json!([])));
    let outer = transform_rules_to_component(vec![section], flat());
    let inst = outer
        .mount(data(json!([
            {"section": true, "headings": [{"heading": true, "title": "One"}]},
            {"section": true},
        ])))
        .unwrap();
    let node = inst.render();
    assert_eq!(node.children()[0].children()[0].tag(), Some("Headings"));
    insta::assert_snapshot!(render_to_string(&node.expand()), @r#"
    <section>
      <header>
        <h1>
          One
        </h1>
      </header>
    </section>
    <section>
      <header />
    </section>
    "#);
}

// ---------------------------------------------------------------------------
// Globals
// ---------------------------------------------------------------------------

#[test]
fn globals_coordinate_siblings() {
    let comp = transform_rules_to_component(
        vec![submenu()],
        OutputConfig::new().with_containing_element("ul"),
    );
    let mut inst = comp
        .mount(data(json!([
            {"submenu": true, "label": "File", "open": true},
            {"submenu": true, "label": "Edit", "open": true},
        ])))
        .unwrap();
    let node = inst.render();
    let open: Vec<bool> = node
        .children()
        .iter()
        .map(|li| li.attrs().unwrap()["open"].as_bool().unwrap())
        .collect();
    assert_eq!(open, vec![true, false]);
    let events = inst.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].payload, json!("File"));
}

#[test]
fn stateful_globals_per_instance() {
    let comp = transform_rules_to_component(vec![submenu()], OutputConfig::new());
    let items = json!([{"submenu": true, "label": "File", "open": true}]);
    let a = comp.mount(data(items.clone())).unwrap();
    let b = comp.mount(data(items)).unwrap();
    a.render();
    assert!(a.globals().contains("open"));
    assert!(!b.globals().contains("open"));
    assert!(!a.globals().shares_with(b.globals()));
}

#[test]
fn functional_globals_shared_across_instances() {
    let comp = transform_rules_to_component(
        vec![submenu()],
        OutputConfig::new().with_stateful_output(true),
    );
    let a = comp
        .mount(data(json!([{"submenu": true, "label": "File", "open": true}])))
        .unwrap();
    let b = comp
        .mount(data(json!([{"submenu": true, "label": "Edit", "open": true}])))
        .unwrap();
    a.render();
    // b sees a's entry, so its own submenu cannot open.
    let node = b.render();
    assert_eq!(node.children()[0].attrs().unwrap()["open"], json!(false));
    assert!(a.globals().shares_with(b.globals()));
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

#[test]
fn host_lifecycle_and_binding() {
    let comp = transform_rules_to_component(vec![card()], OutputConfig::new());
    let mut host = Host::new();
    let id = host.mount(&comp, data(json!([{"card": true}]))).unwrap();
    host.set_prop(id, "thing", 7).unwrap();
    let node = host.render(id).unwrap();
    assert_eq!(node.children()[0].attrs().unwrap()["thing"], json!(7));
    host.unmount(id);
    assert_eq!(
        host.pending_events(),
        vec![
            LifecycleEvent::Mount { id },
            LifecycleEvent::Update { id },
            LifecycleEvent::Unmount { id },
        ]
    );
}

#[test]
fn property_surface_and_events() {
    let comp =
        transform_rules_to_component(vec![heading(), card(), submenu()], OutputConfig::new());
    let props: Vec<&String> = comp.properties().keys().collect();
    assert_eq!(props, vec!["data", "thing"]);
    assert_eq!(comp.emitted_events(), ["update:thing", "opened"]);
}

// ---------------------------------------------------------------------------
// view! macro
// ---------------------------------------------------------------------------

#[cfg(feature = "macros")]
#[test]
fn view_macro_builds_nodes() {
    use rule_render::view;

    let name = "world";
    let nodes = view! {
        <p class="greeting" count={2}>
            "Hello, "
            {name}
        </p>
        <hr />
    };
    assert_eq!(nodes.len(), 2);
    assert_eq!(
        render_to_string(&RenderNode::fragment(nodes)),
        "<p class=\"greeting\" count=2>\n  Hello, \n  world\n</p>\n<hr />"
    );
}
