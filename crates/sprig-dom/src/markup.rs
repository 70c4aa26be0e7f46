use std::fmt::Write;

use sprig_core::NodeHandle;

use crate::document::{DomId, Document, NodeData, dom_id};

impl Document {
    /// Serialize `h` and its subtree as HTML-like markup.
    ///
    /// Attributes come out in the order they were first set. Listeners are not
    /// serialized.
    pub fn to_markup(&self, h: NodeHandle) -> String {
        let mut out = String::new();
        self.write_node(dom_id(h), &mut out);
        out
    }

    /// Markup of `h`'s children, without `h` itself.
    pub fn inner_markup(&self, h: NodeHandle) -> String {
        let mut out = String::new();
        if let Some(node) = self.nodes.get(dom_id(h)) {
            for &child in &node.children {
                self.write_node(child, &mut out);
            }
        }
        out
    }

    fn write_node(&self, id: DomId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(t) => escape(t, false, out),
            NodeData::Root => {
                for &child in &node.children {
                    self.write_node(child, out);
                }
            }
            NodeData::Element(e) => {
                let _ = write!(out, "<{}", e.tag);
                for (name, value) in &e.attributes {
                    let _ = write!(out, " {name}=\"");
                    escape(value, true, out);
                    out.push('"');
                }
                out.push('>');
                for &child in &node.children {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{}>", e.tag);
            }
        }
    }
}

fn escape(s: &str, attr: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::Medium;

    #[test]
    fn test_markup_escapes_text_and_attributes() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create_element("p");
        doc.set_attribute(p, "title", "a \"b\" & c");
        let t = doc.create_text("1 < 2");
        let span = doc.create_span(p, 0, 0);
        doc.insert_at_start(span, t);
        let span = doc.create_span(root, 0, 0);
        doc.insert_at_start(span, p);

        assert_eq!(
            doc.to_markup(p),
            "<p title=\"a &quot;b&quot; &amp; c\">1 &lt; 2</p>"
        );
        assert_eq!(doc.inner_markup(root), doc.to_markup(p));
        assert_eq!(doc.inner_markup(p), "1 &lt; 2");
    }
}
