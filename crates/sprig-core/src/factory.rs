//! Tree assembly: declarative calls in, nodes out.

use std::rc::Rc;

use crate::attr::Attributes;
use crate::component::{Component, Instance};
use crate::node::{ElementNode, Node, TextNode};

/// What `create_element` builds: a tag, or a component type.
#[derive(Clone)]
pub enum NodeType {
    Tag(String),
    Component(fn() -> Rc<dyn Component>),
}

impl NodeType {
    pub fn component<C: Component + Default>() -> Self {
        NodeType::Component(instantiate::<C>)
    }
}

fn instantiate<C: Component + Default>() -> Rc<dyn Component> {
    Rc::new(C::default())
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        NodeType::Tag(tag.to_string())
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        NodeType::Tag(tag)
    }
}

/// One argument in a child list, before flattening.
#[derive(Clone, Debug)]
pub enum Child {
    Node(Node),
    Text(String),
    List(Vec<Child>),
    Empty,
}

impl From<Node> for Child {
    fn from(n: Node) -> Self {
        Child::Node(n)
    }
}

impl From<ElementNode> for Child {
    fn from(e: ElementNode) -> Self {
        Child::Node(Node::Element(e))
    }
}

impl From<Instance> for Child {
    fn from(i: Instance) -> Self {
        Child::Node(Node::Component(i))
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::Text(s.to_string())
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::Text(s)
    }
}

impl From<&String> for Child {
    fn from(s: &String) -> Self {
        Child::Text(s.clone())
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(items: Vec<T>) -> Self {
        Child::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(item: Option<T>) -> Self {
        item.map_or(Child::Empty, Into::into)
    }
}

/// `children!["a", node, vec!["b", "c"], None::<&str>]`
#[macro_export]
macro_rules! children {
    () => {
        ::std::vec::Vec::<$crate::Child>::new()
    };
    ($($child:expr),+ $(,)?) => {
        ::std::vec![$($crate::Child::from($child)),+]
    };
}

/// Build an element or instantiate a component.
///
/// Attributes go through the target's `set_attribute`. Children are flattened
/// depth first: nested lists are spliced in place, empty entries dropped,
/// strings become text leaves.
pub fn create_element(
    ty: impl Into<NodeType>,
    attrs: Option<Attributes>,
    children: Vec<Child>,
) -> Node {
    let mut flat = Vec::new();
    flatten(children, &mut flat);
    let attrs = attrs.unwrap_or_default();

    match ty.into() {
        NodeType::Tag(tag) => {
            let mut el = ElementNode::new(tag);
            for (name, value) in attrs {
                el.set_attribute(name, value);
            }
            for child in flat {
                el.append_child(child);
            }
            Node::Element(el)
        }
        NodeType::Component(make) => {
            let instance = Instance::from_component(make());
            for (name, value) in attrs {
                instance.set_attribute(name, value);
            }
            for child in flat {
                instance.append_child(child);
            }
            Node::Component(instance)
        }
    }
}

fn flatten(children: Vec<Child>, out: &mut Vec<Node>) {
    for child in children {
        match child {
            Child::Node(n) => out.push(n),
            Child::Text(s) => out.push(Node::Text(TextNode::new(s))),
            Child::List(items) => flatten(items, out),
            Child::Empty => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::children;

    fn texts(node: &Node) -> Vec<String> {
        node.as_element()
            .unwrap()
            .children
            .iter()
            .map(|c| c.as_text().unwrap().to_string())
            .collect()
    }

    #[test]
    fn nested_lists_flatten_in_order() {
        let node = create_element(
            "div",
            None,
            children![children!["a", children!["b", "c"]], None::<&str>, "d"],
        );
        assert_eq!(texts(&node), ["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_entries_are_skipped() {
        let node = create_element("p", None, children![Child::Empty, None::<String>, "x"]);
        assert_eq!(texts(&node), ["x"]);
    }

    #[test]
    fn attributes_apply_to_elements() {
        let node = create_element(
            "a",
            Some(Attributes::new().with("href", "/").with("key", "k")),
            children![],
        );
        let el = node.as_element().unwrap();
        assert_eq!(el.tag, "a");
        assert_eq!(el.attributes.get("href").and_then(|v| v.as_text()), Some("/"));
        assert_eq!(el.key.as_deref(), Some("k"));
    }

    #[derive(Default)]
    struct Card;

    impl Component for Card {
        fn render(&self, this: &Instance) -> anyhow::Result<Node> {
            Ok(create_element("section", None, children![this.children()]))
        }
    }

    #[test]
    fn component_types_are_instantiated_with_props_and_children() {
        let node = create_element(
            NodeType::component::<Card>(),
            Some(Attributes::new().with("title", "hello")),
            children![create_element("b", None, children!["x"]), "y"],
        );
        let instance = node.as_component().unwrap();
        assert_eq!(instance.prop_text("title").as_deref(), Some("hello"));
        assert_eq!(instance.children().len(), 2);
        assert!(instance.name().ends_with("Card"));
    }

    #[test]
    fn interpolated_children_are_spliced() {
        let passed = vec![Node::text("one"), Node::text("two")];
        let node = create_element("ul", None, children!["zero", passed]);
        assert_eq!(texts(&node), ["zero", "one", "two"]);
    }
}
