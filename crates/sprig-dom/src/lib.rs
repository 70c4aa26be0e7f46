//! In-memory output medium for `sprig-core`.
//!
//! [`Document`] is an arena of element and text nodes with DOM-range style
//! live spans. Every visible change is appended to a mutation journal, which
//! is what tests and the devtools inspect:
//!
//! ```rust
//! use sprig_core::*;
//! use sprig_dom::{Document, Mutation};
//!
//! let doc = Document::shared();
//! let root = doc.borrow().root();
//! render(&create_element("p", None, children!["hi"]), &doc, root)?;
//!
//! let d = doc.borrow();
//! assert_eq!(d.inner_markup(root), "<p>hi</p>");
//! assert!(d.mutations().iter().any(|m| matches!(m, Mutation::CreateText { .. })));
//! # Ok::<(), sprig_core::Error>(())
//! ```

mod document;
mod markup;
mod medium;
mod mutation;

pub use document::{Document, SharedDocument};
pub use mutation::Mutation;

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::{Medium, NodeHandle, SpanBounds};

    fn attach(doc: &mut Document, parent: NodeHandle, tag: &str) -> NodeHandle {
        let n = doc.create_element(tag);
        let end = doc.child_count(parent);
        let span = doc.create_span(parent, end, end);
        doc.insert_at_start(span, n);
        doc.release_span(span);
        n
    }

    #[test]
    fn test_insert_into_collapsed_span_grows_it() {
        let mut doc = Document::new();
        let root = doc.root();
        let span = doc.create_span(root, 0, 0);
        let a = doc.create_element("a");
        doc.insert_at_start(span, a);

        let b = doc.span_bounds(span).unwrap();
        assert_eq!(b, SpanBounds { container: root, start: 0, end: 1 });
        assert_eq!(doc.children(root), vec![a]);
    }

    #[test]
    fn test_sibling_spans_track_inserts_and_removals() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = attach(&mut doc, root, "a");
        let b = attach(&mut doc, root, "b");

        let sa = doc.create_span(root, 0, 1);
        let sb = doc.create_span(root, 1, 2);

        // Swap `a` for `x` the way the patch engine does.
        let x = doc.create_element("x");
        doc.insert_at_start(sa, x);
        assert_eq!(doc.span_bounds(sa).unwrap().end, 2);
        assert_eq!(doc.span_bounds(sb).unwrap().start, 2);

        doc.set_start_after(sa, x);
        doc.delete_contents(sa);
        doc.wrap_node(sa, x);

        assert_eq!(doc.children(root), vec![x, b]);
        assert_eq!(doc.span_bounds(sa).unwrap().start, 0);
        assert_eq!(doc.span_bounds(sb).unwrap().start, 1);
        assert_eq!(doc.span_bounds(sb).unwrap().end, 2);
        assert!(!doc.contains(a));
    }

    #[test]
    fn test_spans_inside_removed_subtree_collapse_onto_parent() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = attach(&mut doc, root, "div");
        let _inner = attach(&mut doc, outer, "span");
        let deep = doc.create_span(outer, 0, 1);

        let all = doc.create_span(root, 0, 1);
        doc.delete_contents(all);

        let b = doc.span_bounds(deep).unwrap();
        assert_eq!(b.container, root);
        assert!(b.is_collapsed());
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn test_set_start_after_collapses_end() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = attach(&mut doc, root, "a");
        attach(&mut doc, root, "b");
        let span = doc.create_span(root, 0, 1);
        doc.set_start_after(span, a);
        let b = doc.span_bounds(span).unwrap();
        assert_eq!((b.start, b.end), (1, 1));
    }

    #[test]
    fn test_bad_handles_are_ignored() {
        let mut doc = Document::new();
        let root = doc.root();
        let text = doc.create_text("t");
        doc.set_attribute(text, "id", "x");
        doc.set_class(root, "c");
        doc.release_span(sprig_core::Placement(u64::MAX));
        assert_eq!(doc.span_bounds(sprig_core::Placement(u64::MAX)), None);
        assert_eq!(doc.attribute(text, "id"), None);
        assert_eq!(doc.child_count(NodeHandle(u64::MAX)), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_mutations_serialize_tagged() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.set_class(p, "lead");
        let v = serde_json::to_value(doc.mutations()).unwrap();
        assert_eq!(v[0]["op"], "create_element");
        assert_eq!(v[0]["tag"], "p");
        assert_eq!(v[1]["op"], "set_class");
        assert_eq!(v[1]["value"], "lead");
    }
}
