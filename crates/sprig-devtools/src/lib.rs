use std::fmt::Write;

use serde::Serialize;
use sprig_core::{Instance, NodeHandle};
use sprig_dom::{Document, SharedDocument};
use web_time::Instant;

/// Indented dump of `node` and everything under it.
///
/// Elements print as `<tag attr="v">`, followed by `[event, ..]` when they
/// carry listeners. Text prints quoted.
pub fn outline(doc: &Document, node: NodeHandle) -> String {
    let mut lines = Vec::new();
    walk(doc, node, 0, &mut lines);
    lines.join("\n")
}

fn walk(doc: &Document, node: NodeHandle, depth: usize, lines: &mut Vec<String>) {
    let mut line = "  ".repeat(depth);
    if node == doc.root() {
        line.push_str("#document");
    } else if let Some(text) = doc.text(node) {
        let _ = write!(line, "{text:?}");
    } else if let Some(tag) = doc.tag(node) {
        let _ = write!(line, "<{tag}");
        for (name, value) in doc.attributes(node) {
            let _ = write!(line, " {name}={value:?}");
        }
        line.push('>');
        let listeners = doc.listeners(node);
        if !listeners.is_empty() {
            let _ = write!(line, " [{}]", listeners.join(", "));
        }
    } else {
        log::warn!("outline: unknown node {node:?}");
        return;
    }
    lines.push(line);
    for child in doc.children(node) {
        walk(doc, child, depth + 1, lines);
    }
}

/// The descriptor tree `instance` last rendered, with placements.
pub fn vtree(instance: &Instance) -> Option<String> {
    instance.last_tree().map(|tree| tree.debug_tree())
}

/// Numbers from one measured update cycle.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Metrics {
    pub cycle: u64,
    pub update_ms: f32,
    pub mutations: usize,
    pub structural: usize,
    pub nodes: usize,
    pub live_spans: usize,
}

pub struct Inspector {
    pub enabled: bool,
    cycles: u64,
    avg_ms: f32,
    pub metrics: Option<Metrics>,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self {
            enabled: true,
            cycles: 0,
            avg_ms: 0.0,
            metrics: None,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Run `f` (typically a `set_state` or a dispatch) and record what it
    /// did to `doc`.
    ///
    /// Mutations are counted from the journal, so `f` must not drain it.
    pub fn measure<T>(&mut self, doc: &SharedDocument, f: impl FnOnce() -> T) -> T {
        if !self.enabled {
            return f();
        }
        let before = doc.borrow().mutations().len();
        let start = Instant::now();
        let out = f();
        let ms = start.elapsed().as_secs_f32() * 1000.0;

        let d = doc.borrow();
        let fresh = d.mutations().get(before..).unwrap_or_default();
        self.cycles += 1;
        // simple EMA
        let a = 0.2;
        self.avg_ms = if self.cycles == 1 {
            ms
        } else {
            (1.0 - a) * self.avg_ms + a * ms
        };
        let m = Metrics {
            cycle: self.cycles,
            update_ms: ms,
            mutations: fresh.len(),
            structural: fresh.iter().filter(|m| m.is_structural()).count(),
            nodes: d.node_count(),
            live_spans: d.live_spans(),
        };
        log::debug!("cycle {}: {} mutation(s) in {ms:.3} ms", m.cycle, m.mutations);
        self.metrics = Some(m);
        out
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// One-line summary of the last measured cycle.
    pub fn report(&self) -> String {
        let mut lines = vec![format!("cycles: {}", self.cycles)];
        if let Some(m) = &self.metrics {
            lines.push(format!("last: {:.2} ms (avg {:.2})", m.update_ms, self.avg_ms));
            lines.push(format!("mutations: {} ({} structural)", m.mutations, m.structural));
            lines.push(format!("nodes: {}", m.nodes));
            lines.push(format!("spans: {}", m.live_spans));
        }
        lines.join("  |  ")
    }

    /// The last cycle's [`Metrics`] as JSON, `null` before the first one.
    pub fn report_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.metrics)
    }
}
