//! Document tree (arena-based allocation)

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{Key, KeyData, SecondaryMap, SlotMap, new_key_type};
use smallvec::SmallVec;
use sprig_core::{Event, Handler, MountedRoot, NodeHandle};

use crate::mutation::Mutation;

new_key_type! {
    pub(crate) struct DomId;
    pub(crate) struct SpanId;
}

pub type SharedDocument = Rc<RefCell<Document>>;

pub(crate) enum NodeData {
    Root,
    Element(ElementData),
    Text(String),
}

pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) attributes: SmallVec<[(String, String); 4]>,
    pub(crate) listeners: SmallVec<[(String, Handler); 2]>,
}

pub(crate) struct DomNode {
    pub(crate) parent: Option<DomId>,
    pub(crate) children: Vec<DomId>,
    pub(crate) data: NodeData,
}

/// A live range: `start..end` child offsets inside `container`.
pub(crate) struct Span {
    pub(crate) container: DomId,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// In-memory document.
///
/// Nodes live in an arena and are addressed by [`NodeHandle`]. Spans are
/// kept live across inserts and removals the way DOM ranges are, which is
/// what the patch engine's placements rely on.
pub struct Document {
    pub(crate) nodes: SlotMap<DomId, DomNode>,
    pub(crate) spans: SlotMap<SpanId, Span>,
    /// What `render` mounted, keyed by container.
    pub(crate) roots: SecondaryMap<DomId, MountedRoot>,
    root: DomId,
    journal: Vec<Mutation>,
    recording: bool,
}

pub(crate) fn handle(id: DomId) -> NodeHandle {
    NodeHandle(id.data().as_ffi())
}

pub(crate) fn dom_id(h: NodeHandle) -> DomId {
    DomId::from(KeyData::from_ffi(h.0))
}

pub(crate) fn span_id(p: sprig_core::Placement) -> SpanId {
    SpanId::from(KeyData::from_ffi(p.0))
}

pub(crate) fn placement(id: SpanId) -> sprig_core::Placement {
    sprig_core::Placement(id.data().as_ffi())
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(DomNode {
            parent: None,
            children: Vec::new(),
            data: NodeData::Root,
        });
        Self {
            nodes,
            spans: SlotMap::with_key(),
            roots: SecondaryMap::new(),
            root,
            journal: Vec::new(),
            recording: true,
        }
    }

    pub fn shared() -> SharedDocument {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn root(&self) -> NodeHandle {
        handle(self.root)
    }

    /// Journal mutations from now on (the default) or stop journaling.
    pub fn set_recording(&mut self, on: bool) {
        self.recording = on;
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.journal
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    pub(crate) fn record(&mut self, m: Mutation) {
        if self.recording {
            self.journal.push(m);
        }
    }

    pub(crate) fn node(&self, h: NodeHandle) -> Option<&DomNode> {
        self.nodes.get(dom_id(h))
    }

    pub(crate) fn element_mut(&mut self, h: NodeHandle) -> Option<&mut ElementData> {
        match self.nodes.get_mut(dom_id(h)) {
            Some(DomNode {
                data: NodeData::Element(e),
                ..
            }) => Some(e),
            _ => None,
        }
    }

    fn element(&self, h: NodeHandle) -> Option<&ElementData> {
        match self.node(h) {
            Some(DomNode {
                data: NodeData::Element(e),
                ..
            }) => Some(e),
            _ => None,
        }
    }

    pub fn contains(&self, h: NodeHandle) -> bool {
        self.node(h).is_some()
    }

    /// Nodes currently allocated, attached or not. Removed subtrees are freed.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Spans that have not been released.
    pub fn live_spans(&self) -> usize {
        self.spans.len()
    }

    pub fn parent(&self, h: NodeHandle) -> Option<NodeHandle> {
        self.node(h)?.parent.map(handle)
    }

    pub fn children(&self, h: NodeHandle) -> Vec<NodeHandle> {
        self.node(h)
            .map(|n| n.children.iter().copied().map(handle).collect())
            .unwrap_or_default()
    }

    pub fn tag(&self, h: NodeHandle) -> Option<&str> {
        self.element(h).map(|e| e.tag.as_str())
    }

    /// Content of a text node.
    pub fn text(&self, h: NodeHandle) -> Option<&str> {
        match self.node(h) {
            Some(DomNode {
                data: NodeData::Text(t),
                ..
            }) => Some(t),
            _ => None,
        }
    }

    pub fn attribute(&self, h: NodeHandle, name: &str) -> Option<&str> {
        self.element(h)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes of an element in the order they were first set.
    pub fn attributes(&self, h: NodeHandle) -> Vec<(&str, &str)> {
        self.element(h)
            .map(|e| {
                e.attributes
                    .iter()
                    .map(|(n, v)| (n.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Event names with at least one listener, in registration order.
    pub fn listeners(&self, h: NodeHandle) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        if let Some(e) = self.element(h) {
            for (name, _) in &e.listeners {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn class(&self, h: NodeHandle) -> Option<&str> {
        self.attribute(h, "class")
    }

    pub fn listener_count(&self, h: NodeHandle, event: &str) -> usize {
        self.element(h)
            .map(|e| e.listeners.iter().filter(|(n, _)| n == event).count())
            .unwrap_or(0)
    }

    /// Concatenated text of every text node under `h`, in document order.
    pub fn text_content(&self, h: NodeHandle) -> String {
        let mut out = String::new();
        self.collect_text(dom_id(h), &mut out);
        out
    }

    fn collect_text(&self, id: DomId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if let NodeData::Text(t) = &node.data {
            out.push_str(t);
        }
        for &child in &node.children {
            self.collect_text(child, out);
        }
    }

    /// Descendants of `h` with the given tag, in document order.
    pub fn find_by_tag(&self, h: NodeHandle, tag: &str) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        self.collect_tag(dom_id(h), tag, &mut out);
        out
    }

    fn collect_tag(&self, id: DomId, tag: &str, out: &mut Vec<NodeHandle>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        for &child in &node.children {
            if matches!(&self.nodes[child].data, NodeData::Element(e) if e.tag == tag) {
                out.push(handle(child));
            }
            self.collect_tag(child, tag, out);
        }
    }

    /// Deliver `event` to the listeners on `target`.
    ///
    /// Handlers are cloned out first and run with the document unborrowed,
    /// so they are free to call `set_state`. Returns how many ran.
    pub fn dispatch(doc: &SharedDocument, target: NodeHandle, event: &str) -> usize {
        let handlers: Vec<Handler> = match doc.borrow().element(target) {
            Some(e) => e
                .listeners
                .iter()
                .filter(|(n, _)| n == event)
                .map(|(_, h)| h.clone())
                .collect(),
            None => {
                log::warn!("dispatch `{event}` to unknown or non-element node {target:?}");
                return 0;
            }
        };

        log::debug!("dispatch `{event}` to {target:?}: {} listener(s)", handlers.len());
        let ev = Event::new(event, target);
        for h in &handlers {
            h.call(&ev);
        }
        handlers.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn is_inclusive_ancestor(
    nodes: &SlotMap<DomId, DomNode>,
    ancestor: DomId,
    mut id: DomId,
) -> bool {
    loop {
        if id == ancestor {
            return true;
        }
        match nodes.get(id).and_then(|n| n.parent) {
            Some(p) => id = p,
            None => return false,
        }
    }
}
