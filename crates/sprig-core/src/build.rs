use crate::error::Result;
use crate::node::Node;
use crate::vnode::{VElement, VNode};

/// Resolve `node` into a descriptor tree of elements and text only.
///
/// Components are rendered and their output built in turn, so a component
/// is replaced by whatever it finally renders to. Children keep declaration
/// order. Nothing here touches a medium.
pub fn build(node: &Node) -> Result<VNode> {
    match node {
        Node::Text(t) => Ok(VNode::text(t.content.clone())),
        Node::Element(e) => {
            let children = e.children.iter().map(build).collect::<Result<Vec<_>>>()?;
            Ok(VNode::Element(VElement {
                tag: e.tag.clone(),
                attributes: e.attributes.clone(),
                key: e.key.clone(),
                matcher: e.matcher.clone(),
                children,
                placement: None,
            }))
        }
        Node::Component(instance) => instance.build(),
    }
}
