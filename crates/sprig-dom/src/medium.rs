//! `Medium` for `Document`, with DOM-range style live spans.

use smallvec::SmallVec;
use sprig_core::{Handler, Medium, MountedRoot, NodeHandle, Placement, SpanBounds};

use crate::document::{
    DomId, DomNode, Document, ElementData, NodeData, Span, dom_id, handle, is_inclusive_ancestor,
    placement, span_id,
};
use crate::mutation::Mutation;

impl Document {
    fn alloc(&mut self, data: NodeData) -> DomId {
        self.nodes.insert(DomNode {
            parent: None,
            children: Vec::new(),
            data,
        })
    }

    /// Insert `node` as child `index` of `parent`, moving it if attached.
    ///
    /// Span boundaries in `parent` strictly after `index` shift right.
    fn insert_child(&mut self, parent: DomId, index: usize, node: DomId) {
        if let Some(old_parent) = self.nodes.get(node).and_then(|n| n.parent) {
            if let Some(i) = self.nodes[old_parent].children.iter().position(|&c| c == node) {
                self.remove_child(old_parent, i);
            }
        }
        let Some(p) = self.nodes.get_mut(parent) else {
            log::warn!("insert into unknown node {:?}", handle(parent));
            return;
        };
        let index = index.min(p.children.len());
        p.children.insert(index, node);
        self.nodes[node].parent = Some(parent);

        for span in self.spans.values_mut() {
            if span.container == parent {
                if span.start > index {
                    span.start += 1;
                }
                if span.end > index {
                    span.end += 1;
                }
            }
        }
        self.record(Mutation::Insert {
            parent: handle(parent),
            index,
            node: handle(node),
        });
    }

    /// Detach child `index` of `parent`.
    ///
    /// Spans inside the removed subtree collapse onto `(parent, index)`;
    /// boundaries in `parent` after `index` shift left.
    fn remove_child(&mut self, parent: DomId, index: usize) -> Option<DomId> {
        let p = self.nodes.get_mut(parent)?;
        if index >= p.children.len() {
            return None;
        }
        let node = p.children.remove(index);
        self.nodes[node].parent = None;

        let nodes = &self.nodes;
        for span in self.spans.values_mut() {
            if span.container == parent {
                if span.start > index {
                    span.start -= 1;
                }
                if span.end > index {
                    span.end -= 1;
                }
            } else if is_inclusive_ancestor(nodes, node, span.container) {
                span.container = parent;
                span.start = index;
                span.end = index;
            }
        }
        self.record(Mutation::Remove {
            parent: handle(parent),
            index,
            node: handle(node),
        });
        Some(node)
    }

    fn free_subtree(&mut self, id: DomId) {
        if let Some(root) = self.roots.remove(id) {
            root.release(self);
        }
        if let Some(node) = self.nodes.remove(id) {
            for child in node.children {
                self.free_subtree(child);
            }
        }
    }

    fn span(&self, p: Placement) -> Option<&Span> {
        let span = self.spans.get(span_id(p));
        if span.is_none() {
            log::warn!("unknown span {p:?}");
        }
        span
    }

    fn span_mut(&mut self, p: Placement) -> Option<&mut Span> {
        let span = self.spans.get_mut(span_id(p));
        if span.is_none() {
            log::warn!("unknown span {p:?}");
        }
        span
    }

    /// Parent and index of an attached node.
    fn position(&self, node: NodeHandle) -> Option<(DomId, usize)> {
        let id = dom_id(node);
        let parent = self.nodes.get(id)?.parent?;
        let index = self.nodes[parent].children.iter().position(|&c| c == id)?;
        Some((parent, index))
    }
}

impl Medium for Document {
    fn create_element(&mut self, tag: &str) -> NodeHandle {
        let id = self.alloc(NodeData::Element(ElementData {
            tag: tag.to_string(),
            attributes: SmallVec::new(),
            listeners: SmallVec::new(),
        }));
        self.record(Mutation::CreateElement {
            node: handle(id),
            tag: tag.to_string(),
        });
        handle(id)
    }

    fn create_text(&mut self, content: &str) -> NodeHandle {
        let id = self.alloc(NodeData::Text(content.to_string()));
        self.record(Mutation::CreateText {
            node: handle(id),
            content: content.to_string(),
        });
        handle(id)
    }

    fn set_attribute(&mut self, node: NodeHandle, name: &str, value: &str) {
        let Some(el) = self.element_mut(node) else {
            log::warn!("set_attribute `{name}` on non-element {node:?}");
            return;
        };
        match el.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
        self.record(Mutation::SetAttribute {
            node,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn set_class(&mut self, node: NodeHandle, value: &str) {
        let Some(el) = self.element_mut(node) else {
            log::warn!("set_class on non-element {node:?}");
            return;
        };
        match el.attributes.iter_mut().find(|(n, _)| n == "class") {
            Some((_, v)) => *v = value.to_string(),
            None => el.attributes.push(("class".to_string(), value.to_string())),
        }
        self.record(Mutation::SetClass {
            node,
            value: value.to_string(),
        });
    }

    fn add_listener(&mut self, node: NodeHandle, event: &str, handler: Handler) {
        let Some(el) = self.element_mut(node) else {
            log::warn!("add_listener `{event}` on non-element {node:?}");
            return;
        };
        el.listeners.push((event.to_string(), handler));
        self.record(Mutation::AddListener {
            node,
            event: event.to_string(),
        });
    }

    fn child_count(&self, node: NodeHandle) -> usize {
        self.node(node).map_or(0, |n| n.children.len())
    }

    fn node_at(&self, container: NodeHandle, index: usize) -> Option<NodeHandle> {
        self.node(container)?.children.get(index).copied().map(handle)
    }

    fn create_span(&mut self, container: NodeHandle, start: usize, end: usize) -> Placement {
        let len = self.child_count(container);
        if !self.contains(container) {
            log::warn!("span over unknown node {container:?}");
        }
        let start = start.min(len);
        let end = end.clamp(start, len.max(start));
        placement(self.spans.insert(Span {
            container: dom_id(container),
            start,
            end,
        }))
    }

    fn span_bounds(&self, span: Placement) -> Option<SpanBounds> {
        self.spans.get(span_id(span)).map(|s| SpanBounds {
            container: handle(s.container),
            start: s.start,
            end: s.end,
        })
    }

    fn insert_at_start(&mut self, span: Placement, node: NodeHandle) {
        if !self.contains(node) {
            log::warn!("insert of unknown node {node:?}");
            return;
        }
        let Some(s) = self.span(span) else { return };
        let (container, start, collapsed) = (s.container, s.start, s.start == s.end);

        self.insert_child(container, start, dom_id(node));

        if collapsed && let Some(s) = self.spans.get_mut(span_id(span)) {
            s.end = s.start + 1;
        }
    }

    fn set_start_after(&mut self, span: Placement, node: NodeHandle) {
        let Some((parent, index)) = self.position(node) else {
            log::warn!("set_start_after detached node {node:?}");
            return;
        };
        let Some(s) = self.span_mut(span) else { return };
        let start = index + 1;
        if s.container != parent || s.end < start {
            s.container = parent;
            s.end = start;
        }
        s.start = start;
    }

    fn delete_contents(&mut self, span: Placement) {
        let Some(s) = self.span(span) else { return };
        let (container, start, end) = (s.container, s.start, s.end);
        if start >= end {
            return;
        }
        for _ in start..end {
            match self.remove_child(container, start) {
                Some(removed) => self.free_subtree(removed),
                None => break,
            }
        }
    }

    fn wrap_node(&mut self, span: Placement, node: NodeHandle) {
        let Some((parent, index)) = self.position(node) else {
            log::warn!("wrap_node on detached node {node:?}");
            return;
        };
        if let Some(s) = self.span_mut(span) {
            s.container = parent;
            s.start = index;
            s.end = index + 1;
        }
    }

    fn release_span(&mut self, span: Placement) {
        self.spans.remove(span_id(span));
    }

    fn replace_root(
        &mut self,
        container: NodeHandle,
        root: Option<MountedRoot>,
    ) -> Option<MountedRoot> {
        let id = dom_id(container);
        match root {
            Some(root) if self.nodes.contains_key(id) => self.roots.insert(id, root),
            Some(root) => {
                log::warn!("replace_root on unknown node {container:?}");
                root.release(self);
                None
            }
            None => self.roots.remove(id),
        }
    }
}
