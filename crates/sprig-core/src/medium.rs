//! The output medium collaborator.
//!
//! The patch engine never touches a concrete document. Everything it needs is
//! behind [`Medium`]: node creation, attribute and listener wiring, and a small
//! span API modelled on live DOM ranges.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::attr::Handler;
use crate::root::MountedRoot;

/// Opaque handle to a node owned by a medium.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeHandle(pub u64);

/// Opaque handle to a live span owned by a medium.
///
/// A placement survives mutations of the medium: its boundaries are kept up to
/// date by the medium until it is released.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement(pub u64);

/// Boundaries of a span: `start..end` child offsets inside `container`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpanBounds {
    pub container: NodeHandle,
    pub start: usize,
    pub end: usize,
}

impl SpanBounds {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Event delivered to listeners.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub name: String,
    pub target: NodeHandle,
}

impl Event {
    pub fn new(name: impl Into<String>, target: NodeHandle) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

pub type SharedMedium = Rc<RefCell<dyn Medium>>;
pub type WeakMedium = Weak<RefCell<dyn Medium>>;

pub trait Medium {
    fn create_element(&mut self, tag: &str) -> NodeHandle;
    fn create_text(&mut self, content: &str) -> NodeHandle;

    fn set_attribute(&mut self, node: NodeHandle, name: &str, value: &str);
    /// The class-list attribute; `className` descriptors land here.
    fn set_class(&mut self, node: NodeHandle, value: &str);
    fn add_listener(&mut self, node: NodeHandle, event: &str, handler: Handler);

    fn child_count(&self, node: NodeHandle) -> usize;
    fn node_at(&self, container: NodeHandle, index: usize) -> Option<NodeHandle>;

    fn create_span(&mut self, container: NodeHandle, start: usize, end: usize) -> Placement;
    fn span_bounds(&self, span: Placement) -> Option<SpanBounds>;
    /// Insert `node` at the start of the span. A collapsed span grows to
    /// cover the inserted node.
    fn insert_at_start(&mut self, span: Placement, node: NodeHandle);
    /// Move the span start to just after `node`, collapsing the end onto it
    /// if the start would pass it.
    fn set_start_after(&mut self, span: Placement, node: NodeHandle);
    fn delete_contents(&mut self, span: Placement);
    /// Set the span to exactly cover `node`.
    fn wrap_node(&mut self, span: Placement, node: NodeHandle);
    fn release_span(&mut self, span: Placement);

    /// Store `root` as what is mounted at `container`, or clear the record
    /// with `None`. Returns the previous record.
    fn replace_root(
        &mut self,
        container: NodeHandle,
        root: Option<MountedRoot>,
    ) -> Option<MountedRoot>;
}

/// Collapsed span at the end of `container`'s children.
pub(crate) fn append_span(medium: &mut dyn Medium, container: NodeHandle) -> Placement {
    let end = medium.child_count(container);
    medium.create_span(container, end, end)
}

/// Swap `node` into `span`, replacing whatever the span held.
///
/// Insert first, then trim everything after the new node, then refit the
/// span. Clearing first would let the trim catch the freshly inserted node.
pub(crate) fn replace_content(medium: &mut dyn Medium, span: Placement, node: NodeHandle) {
    medium.insert_at_start(span, node);
    medium.set_start_after(span, node);
    medium.delete_contents(span);
    medium.wrap_node(span, node);
}
