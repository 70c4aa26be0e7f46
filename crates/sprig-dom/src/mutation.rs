use sprig_core::NodeHandle;

/// One structural or visible change made to a [`Document`](crate::Document).
///
/// Span bookkeeping is not a mutation and never shows up here.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum Mutation {
    CreateElement {
        node: NodeHandle,
        tag: String,
    },
    CreateText {
        node: NodeHandle,
        content: String,
    },
    SetAttribute {
        node: NodeHandle,
        name: String,
        value: String,
    },
    SetClass {
        node: NodeHandle,
        value: String,
    },
    AddListener {
        node: NodeHandle,
        event: String,
    },
    Insert {
        parent: NodeHandle,
        index: usize,
        node: NodeHandle,
    },
    Remove {
        parent: NodeHandle,
        index: usize,
        node: NodeHandle,
    },
}

impl Mutation {
    /// Insertions and removals.
    pub fn is_structural(&self) -> bool {
        matches!(self, Mutation::Insert { .. } | Mutation::Remove { .. })
    }
}
