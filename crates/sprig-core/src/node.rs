use std::rc::Rc;

use crate::attr::{AttrValue, Attributes};
use crate::build::build;
use crate::component::Instance;
use crate::error::Result;
use crate::matcher::ChildMatcher;
use crate::medium::{Medium, Placement, WeakMedium};
use crate::patch::mount;
use crate::root::MountedRoot;

/// Attribute captured as the element's key instead of being rendered.
pub const KEY_ATTR: &str = "key";

/// What tree assembly produces: an element, a text leaf, or a component
/// instance that still has to be rendered.
#[derive(Clone, Debug)]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
    Component(Instance),
}

#[derive(Clone, Debug)]
pub struct ElementNode {
    pub tag: String,
    pub attributes: Attributes,
    pub key: Option<String>,
    pub matcher: Option<Rc<dyn ChildMatcher>>,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextNode {
    pub content: String,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            key: None,
            matcher: None,
            children: Vec::new(),
        }
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        match value.into() {
            AttrValue::Text(key) if name == KEY_ATTR => self.key = Some(key),
            value => self.attributes.set(name, value),
        }
    }

    pub fn append_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Opt this element's child list into a non-positional identity check.
    pub fn match_children_with(mut self, matcher: impl ChildMatcher + 'static) -> Self {
        self.matcher = Some(Rc::new(matcher));
        self
    }
}

impl TextNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(TextNode::new(content))
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(&t.content),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&Instance> {
        match self {
            Node::Component(c) => Some(c),
            _ => None,
        }
    }

    /// Materialize this node into `span`. Components additionally keep the
    /// built tree and the span so they can patch themselves later.
    pub(crate) fn render_into(
        &self,
        medium: &mut dyn Medium,
        owner: &WeakMedium,
        span: Placement,
    ) -> Result<MountedRoot> {
        match self {
            Node::Component(instance) => {
                instance.render_into(medium, owner, span)?;
                Ok(MountedRoot::Component {
                    instance: instance.clone(),
                    placement: span,
                })
            }
            Node::Element(_) | Node::Text(_) => {
                let mut tree = build(self)?;
                mount(medium, &mut tree, span);
                Ok(MountedRoot::Tree(tree))
            }
        }
    }
}

impl From<ElementNode> for Node {
    fn from(e: ElementNode) -> Self {
        Node::Element(e)
    }
}

impl From<TextNode> for Node {
    fn from(t: TextNode) -> Self {
        Node::Text(t)
    }
}

impl From<Instance> for Node {
    fn from(i: Instance) -> Self {
        Node::Component(i)
    }
}
