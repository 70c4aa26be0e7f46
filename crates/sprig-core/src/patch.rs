//! Mount and positional patch.
//!
//! `mount` materializes a descriptor unconditionally. `patch` compares an old
//! descriptor (already materialized) against a new one and touches the medium
//! only where the two differ. Children are paired strictly by index.

use crate::attr::{AttrValue, Attributes, event_name};
use crate::error::{Error, Result};
use crate::medium::{Medium, NodeHandle, Placement, SpanBounds, append_span, replace_content};
use crate::vnode::{VElement, VNode, is_same_node};

/// Descriptor attribute that maps onto the medium's class list.
pub const CLASS_ALIAS: &str = "className";

pub(crate) fn mount(medium: &mut dyn Medium, node: &mut VNode, span: Placement) {
    node.set_placement(span);
    match node {
        VNode::Text(t) => {
            let text = medium.create_text(&t.content);
            replace_content(medium, span, text);
        }
        VNode::Element(e) => {
            let el = medium.create_element(&e.tag);
            apply_attributes(medium, el, &e.attributes);
            for child in &mut e.children {
                let sub = append_span(medium, el);
                mount(medium, child, sub);
            }
            replace_content(medium, span, el);
        }
    }
}

pub(crate) fn patch(medium: &mut dyn Medium, old: &VNode, new: &mut VNode) -> Result<()> {
    let placement = placement_of(old)?;
    if !is_same_node(old, new) {
        log::trace!("replace {} with {}", describe(old), describe(new));
        replace(medium, old, new, placement);
        return Ok(());
    }

    new.set_placement(placement);
    match new {
        VNode::Element(el) => reconcile_children(medium, old, el),
        VNode::Text(_) => Ok(()),
    }
}

fn reconcile_children(medium: &mut dyn Medium, old: &VNode, new: &mut VElement) -> Result<()> {
    let old_children = old.children();
    let matcher = new.matcher.clone();

    for (old_child, new_child) in old_children.iter().zip(new.children.iter_mut()) {
        let same = matcher
            .as_ref()
            .is_none_or(|m| m.same_entity(old_child, new_child));
        if same {
            patch(medium, old_child, new_child)?;
        } else {
            log::trace!("matcher split {} / {}", describe(old_child), describe(new_child));
            let placement = placement_of(old_child)?;
            replace(medium, old_child, new_child, placement);
        }
    }

    if new.children.len() > old_children.len() {
        let (container, mut offset) = match old_children.last() {
            Some(last) => {
                let b = bounds(medium, last)?;
                (b.container, b.end)
            }
            None => {
                let el = own_node(medium, old)?;
                (el, medium.child_count(el))
            }
        };
        for child in &mut new.children[old_children.len()..] {
            let span = medium.create_span(container, offset, offset);
            mount(medium, child, span);
            offset = medium.span_bounds(span).map_or(offset + 1, |b| b.end);
        }
    }

    for stale in old_children.iter().skip(new.children.len()) {
        log::trace!("drop {}", describe(stale));
        if let Some(p) = stale.placement() {
            medium.delete_contents(p);
        }
        release_tree(medium, stale);
    }
    Ok(())
}

/// Remount `new` over `old`'s span, discarding the whole old subtree.
fn replace(medium: &mut dyn Medium, old: &VNode, new: &mut VNode, placement: Placement) {
    for child in old.children() {
        release_tree(medium, child);
    }
    mount(medium, new, placement);
}

pub(crate) fn release_tree(medium: &mut dyn Medium, node: &VNode) {
    if let Some(p) = node.placement() {
        medium.release_span(p);
    }
    for child in node.children() {
        release_tree(medium, child);
    }
}

fn apply_attributes(medium: &mut dyn Medium, node: NodeHandle, attrs: &Attributes) {
    for (name, value) in attrs.iter() {
        match value {
            AttrValue::Handler(handler) => match event_name(name) {
                Some(event) => medium.add_listener(node, &event, handler.clone()),
                None => log::warn!("handler under non-event attribute `{name}` ignored"),
            },
            AttrValue::Text(text) if name == CLASS_ALIAS => medium.set_class(node, text),
            AttrValue::Text(text) => medium.set_attribute(node, name, text),
        }
    }
}

fn placement_of(node: &VNode) -> Result<Placement> {
    node.placement()
        .ok_or_else(|| Error::Unplaced(describe(node)))
}

fn bounds(medium: &dyn Medium, node: &VNode) -> Result<SpanBounds> {
    medium
        .span_bounds(placement_of(node)?)
        .ok_or_else(|| Error::Unplaced(describe(node)))
}

/// The medium node a placed element occupies.
fn own_node(medium: &dyn Medium, node: &VNode) -> Result<NodeHandle> {
    let b = bounds(medium, node)?;
    medium
        .node_at(b.container, b.start)
        .ok_or_else(|| Error::Unplaced(describe(node)))
}

fn describe(node: &VNode) -> String {
    match node {
        VNode::Element(e) => e.tag.clone(),
        VNode::Text(t) => format!("#text {:?}", t.content),
    }
}
