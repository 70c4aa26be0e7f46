use std::fmt;

use crate::vnode::VNode;

/// Decides whether the old and new child at the same index are the same
/// logical entity.
///
/// Children are always paired by position. A matcher can only veto a pair,
/// which makes the patch engine replace it instead of patching it in place.
pub trait ChildMatcher {
    fn same_entity(&self, old: &VNode, new: &VNode) -> bool;
}

/// Every positional pair is the same entity.
#[derive(Clone, Copy, Debug, Default)]
pub struct Positional;

impl ChildMatcher for Positional {
    fn same_entity(&self, _old: &VNode, _new: &VNode) -> bool {
        true
    }
}

/// Pairs whose keys differ are different entities. Two unkeyed children still
/// match each other.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByKey;

impl ChildMatcher for ByKey {
    fn same_entity(&self, old: &VNode, new: &VNode) -> bool {
        old.key() == new.key()
    }
}

impl fmt::Debug for dyn ChildMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<matcher>")
    }
}
