use std::cell::RefCell;

use serde_json::json;
use sprig_core::*;
use sprig_dom::{Document, Mutation, SharedDocument};

#[derive(Default)]
struct Counter;

impl Component for Counter {
    fn render(&self, this: &Instance) -> anyhow::Result<Node> {
        let count = this.state_value("count").and_then(|v| v.as_i64()).unwrap_or(0);
        let me = this.downgrade();
        Ok(create_element(
            "div",
            None,
            children![
                create_element("h1", None, children![count.to_string()]),
                create_element(
                    "button",
                    Some(Attributes::new().on("click", move |_| {
                        if let Some(me) = me.upgrade() {
                            let n = me.state_value("count").and_then(|v| v.as_i64()).unwrap_or(0);
                            if let Err(e) = me.set_state(json!({ "count": n + 1 })) {
                                panic!("increment failed: {e}");
                            }
                        }
                    })),
                    children!["+"],
                ),
            ],
        ))
    }
}

fn mount(node: Node) -> (SharedDocument, Instance) {
    let doc = Document::shared();
    let root = doc.borrow().root();
    let instance = node.as_component().cloned().unwrap();
    render(&node, &doc, root).unwrap();
    (doc, instance)
}

fn find(doc: &SharedDocument, tag: &str) -> NodeHandle {
    let d = doc.borrow();
    d.find_by_tag(d.root(), tag)[0]
}

#[test]
fn test_counter_increments_through_dispatch() {
    let (doc, counter) = mount(create_element(NodeType::component::<Counter>(), None, children![]));
    let div = find(&doc, "div");
    let h1 = find(&doc, "h1");
    assert_eq!(doc.borrow().text_content(h1), "0");
    assert!(counter.is_mounted());
    assert!(counter.placement().is_some());

    for expected in 1..=3 {
        let button = find(&doc, "button");
        assert_eq!(doc.borrow().listener_count(button, "click"), 1);
        assert_eq!(Document::dispatch(&doc, button, "click"), 1);
        assert_eq!(counter.state_value("count"), Some(json!(expected)));
    }

    let d = doc.borrow();
    assert_eq!(find_again(&d, "div"), div);
    assert_eq!(find_again(&d, "h1"), h1);
    assert_eq!(d.text_content(d.root()), "3+");
    assert_eq!(d.find_by_tag(d.root(), "button").len(), 1);
}

fn find_again(d: &Document, tag: &str) -> NodeHandle {
    d.find_by_tag(d.root(), tag)[0]
}

#[test]
fn test_dispatch_without_listeners() {
    let (doc, _) = mount(create_element(NodeType::component::<Counter>(), None, children![]));
    let h1 = find(&doc, "h1");
    assert_eq!(Document::dispatch(&doc, h1, "click"), 0);
    assert_eq!(Document::dispatch(&doc, NodeHandle(u64::MAX), "click"), 0);
}

#[derive(Default)]
struct Settings;

impl Component for Settings {
    fn render(&self, this: &Instance) -> anyhow::Result<Node> {
        let theme = this.state_value("theme").unwrap_or(json!({}));
        let field = |name: &str| theme.get(name).map(|v| v.to_string()).unwrap_or_default();
        Ok(create_element(
            "dl",
            None,
            children![
                create_element("dt", None, children![field("color")]),
                create_element("dd", None, children![field("size")]),
            ],
        ))
    }
}

#[test]
fn test_set_state_deep_merges() {
    let (doc, settings) = mount(create_element(NodeType::component::<Settings>(), None, children![]));

    settings.set_state(json!({"theme": {"color": "red"}})).unwrap();
    settings.set_state(json!({"theme": {"size": 3}})).unwrap();

    assert_eq!(
        settings.state_value("theme"),
        Some(json!({"color": "red", "size": 3}))
    );
    let d = doc.borrow();
    assert_eq!(
        d.inner_markup(d.root()),
        "<dl><dt>\"red\"</dt><dd>3</dd></dl>"
    );
}

#[derive(Default)]
struct Fragile;

impl Component for Fragile {
    fn render(&self, this: &Instance) -> anyhow::Result<Node> {
        if this.state_value("broken") == Some(json!(true)) {
            anyhow::bail!("cannot render broken state");
        }
        Ok(create_element("p", None, children!["fine"]))
    }
}

#[test]
fn test_failed_render_rolls_back_state() {
    let (doc, fragile) = mount(create_element(NodeType::component::<Fragile>(), None, children![]));
    fragile.set_state(json!({"seen": 1})).unwrap();
    doc.borrow_mut().take_mutations();

    let err = fragile.set_state(json!({"broken": true, "seen": 2})).unwrap_err();
    match &err {
        Error::Render { component, .. } => assert!(component.ends_with("Fragile")),
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(fragile.state_value("broken"), None);
    assert_eq!(fragile.state_value("seen"), Some(json!(1)));
    assert!(doc.borrow().mutations().is_empty());
    assert!(fragile.last_tree().is_some());

    // The instance is still usable afterwards.
    fragile.set_state(json!({"seen": 3})).unwrap();
    assert_eq!(doc.borrow().inner_markup(doc.borrow().root()), "<p>fine</p>");
}

#[test]
fn test_update_while_medium_borrowed_is_rejected() {
    let (doc, counter) = mount(create_element(NodeType::component::<Counter>(), None, children![]));

    let guard = doc.borrow_mut();
    let err = counter.set_state(json!({"count": 10})).unwrap_err();
    drop(guard);

    assert!(matches!(err, Error::MediumBusy));
    assert_eq!(counter.state_value("count"), None);
    counter.set_state(json!({"count": 10})).unwrap();
    assert_eq!(doc.borrow().text_content(find(&doc, "h1")), "10");
}

#[test]
fn test_dropped_medium_unmounts() {
    let (doc, counter) = mount(create_element(NodeType::component::<Counter>(), None, children![]));
    drop(doc);
    assert!(!counter.is_mounted());
    let err = counter.set_state(json!({"count": 1})).unwrap_err();
    assert!(matches!(err, Error::NotMounted { .. }));
    assert_eq!(counter.state_value("count"), None);
}

#[derive(Default)]
struct Shell;

impl Component for Shell {
    fn render(&self, this: &Instance) -> anyhow::Result<Node> {
        Ok(create_element(
            "main",
            Some(Attributes::new().with("className", "shell")),
            children![this.children()],
        ))
    }
}

#[test]
fn test_nested_instances_are_not_update_roots() {
    let inner = create_element(NodeType::component::<Counter>(), None, children![]);
    let nested = inner.as_component().cloned().unwrap();
    let (doc, shell) = mount(create_element(
        NodeType::component::<Shell>(),
        None,
        children![inner, create_element("footer", None, children![])],
    ));

    assert!(shell.is_mounted());
    assert!(!nested.is_mounted());
    assert!(matches!(
        nested.set_state(json!({"count": 5})),
        Err(Error::NotMounted { .. })
    ));

    let d = doc.borrow();
    assert_eq!(
        d.inner_markup(d.root()),
        "<main class=\"shell\"><div><h1>0</h1><button>+</button></div><footer></footer></main>"
    );
}

#[test]
fn test_render_journal_for_first_mount() {
    let doc = Document::shared();
    let root = doc.borrow().root();
    render(
        &create_element("a", Some(Attributes::new().with("href", "/")), children!["home"]),
        &doc,
        root,
    )
    .unwrap();

    let d = doc.borrow();
    let ops = d.mutations();
    assert!(matches!(&ops[0], Mutation::CreateElement { tag, .. } if tag == "a"));
    assert!(matches!(&ops[1], Mutation::SetAttribute { name, value, .. } if name == "href" && value == "/"));
    assert!(matches!(&ops[2], Mutation::CreateText { content, .. } if content == "home"));
    assert!(matches!(ops[3], Mutation::Insert { index: 0, .. }));
    assert!(matches!(ops[4], Mutation::Insert { parent, index: 0, .. } if parent == root));
    assert_eq!(ops.len(), 5);
}

#[test]
fn test_spans_stay_bounded_across_updates() {
    let (doc, counter) = mount(create_element(NodeType::component::<Counter>(), None, children![]));
    let baseline = doc.borrow().live_spans();
    for n in 0..10 {
        counter.set_state(json!({ "count": n })).unwrap();
    }
    assert_eq!(doc.borrow().live_spans(), baseline);
}

thread_local! {
    static MIRROR: RefCell<Option<Instance>> = const { RefCell::new(None) };
}

/// Pushes its count into whatever instance sits in `MIRROR` while rendering.
#[derive(Default)]
struct Source;

impl Component for Source {
    fn render(&self, this: &Instance) -> anyhow::Result<Node> {
        let count = this.state_value("count").and_then(|v| v.as_i64()).unwrap_or(0);
        if let Some(mirror) = MIRROR.with(|m| m.borrow().clone()) {
            mirror.set_state(json!({ "count": count }))?;
        }
        Ok(create_element("p", None, children![count.to_string()]))
    }
}

#[test]
fn test_nested_update_on_another_document() {
    let (_doc, source) = mount(create_element(NodeType::component::<Source>(), None, children![]));
    let (other, counter) = mount(create_element(NodeType::component::<Counter>(), None, children![]));
    MIRROR.with(|m| *m.borrow_mut() = Some(counter.clone()));

    let result = source.set_state(json!({"count": 7}));
    MIRROR.with(|m| m.borrow_mut().take());
    result.unwrap();

    assert_eq!(counter.state_value("count"), Some(json!(7)));
    assert_eq!(other.borrow().text_content(find(&other, "h1")), "7");
}

#[test]
fn test_nested_update_on_same_document_is_rejected() {
    let doc = Document::shared();
    let root = doc.borrow().root();
    let layout = create_element(
        "div",
        None,
        children![
            create_element("aside", None, children![]),
            create_element("main", None, children![]),
        ],
    );
    render(&layout, &doc, root).unwrap();

    let counter_node = create_element(NodeType::component::<Counter>(), None, children![]);
    let counter = counter_node.as_component().cloned().unwrap();
    render(&counter_node, &doc, find(&doc, "aside")).unwrap();
    let source_node = create_element(NodeType::component::<Source>(), None, children![]);
    let source = source_node.as_component().cloned().unwrap();
    render(&source_node, &doc, find(&doc, "main")).unwrap();
    MIRROR.with(|m| *m.borrow_mut() = Some(counter.clone()));

    let result = source.set_state(json!({"count": 7}));
    MIRROR.with(|m| m.borrow_mut().take());

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Render { .. }));
    let cause = std::error::Error::source(&err).map(|e| e.to_string());
    assert_eq!(cause.as_deref(), Some(Error::MediumBusy.to_string().as_str()));
    assert_eq!(source.state_value("count"), None);
    assert_eq!(counter.state_value("count"), None);
}
