//! Node descriptors: the per-render virtual tree.

use std::rc::Rc;

use crate::attr::Attributes;
use crate::matcher::ChildMatcher;
use crate::medium::Placement;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

/// A fully resolved descriptor: only elements and text, no components.
///
/// Built fresh on every render. The only thing written after construction is
/// the placement, attached when the descriptor is mounted or inherited during
/// a patch.
#[derive(Clone, Debug)]
pub enum VNode {
    Element(VElement),
    Text(VText),
}

#[derive(Clone, Debug)]
pub struct VElement {
    pub tag: String,
    pub attributes: Attributes,
    pub key: Option<String>,
    pub matcher: Option<Rc<dyn ChildMatcher>>,
    pub children: Vec<VNode>,
    pub(crate) placement: Option<Placement>,
}

#[derive(Clone, Debug)]
pub struct VText {
    pub content: String,
    pub(crate) placement: Option<Placement>,
}

impl VNode {
    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text(VText {
            content: content.into(),
            placement: None,
        })
    }

    pub fn element(tag: impl Into<String>, attributes: Attributes, children: Vec<VNode>) -> Self {
        VNode::Element(VElement {
            tag: tag.into(),
            attributes,
            key: None,
            matcher: None,
            children,
            placement: None,
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            VNode::Element(_) => NodeKind::Element,
            VNode::Text(_) => NodeKind::Text,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element(e) => Some(&e.tag),
            VNode::Text(_) => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            VNode::Text(t) => Some(&t.content),
            VNode::Element(_) => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            VNode::Element(e) => e.key.as_deref(),
            VNode::Text(_) => None,
        }
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            VNode::Element(e) => Some(&e.attributes),
            VNode::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element(e) => &e.children,
            VNode::Text(_) => &[],
        }
    }

    pub fn placement(&self) -> Option<Placement> {
        match self {
            VNode::Element(e) => e.placement,
            VNode::Text(t) => t.placement,
        }
    }

    pub(crate) fn set_placement(&mut self, placement: Placement) {
        match self {
            VNode::Element(e) => e.placement = Some(placement),
            VNode::Text(t) => t.placement = Some(placement),
        }
    }

    /// Number of descriptors in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(VNode::node_count).sum::<usize>()
    }

    /// One line per descriptor, indented by depth, with its placement.
    #[cfg(feature = "inspector")]
    pub fn debug_tree(&self) -> String {
        fn walk(node: &VNode, depth: usize, out: &mut String) {
            let place = match node.placement() {
                Some(p) => format!(" @{}", p.0),
                None => String::new(),
            };
            let pad = "  ".repeat(depth);
            match node {
                VNode::Element(e) => out.push_str(&format!("{pad}<{}>{place}\n", e.tag)),
                VNode::Text(t) => out.push_str(&format!("{pad}{:?}{place}\n", t.content)),
            }
            for child in node.children() {
                walk(child, depth + 1, out);
            }
        }
        let mut out = String::new();
        walk(self, 0, &mut out);
        out
    }
}

/// Whether `new` may reuse `old`'s materialized node.
///
/// Same kind and tag; `old` carries no more attributes than `new`; every
/// attribute on `new` has an identical value on `old`; text content matches.
pub fn is_same_node(old: &VNode, new: &VNode) -> bool {
    match (old, new) {
        (VNode::Text(a), VNode::Text(b)) => a.content == b.content,
        (VNode::Element(a), VNode::Element(b)) => {
            a.tag == b.tag
                && a.attributes.len() <= b.attributes.len()
                && b
                    .attributes
                    .iter()
                    .all(|(name, value)| a.attributes.get(name) == Some(value))
        }
        _ => false,
    }
}
