//! # Components, descriptors, and patching
//!
//! Sprig keeps a lightweight virtual tree next to a live output medium and,
//! when state changes, patches the medium instead of rebuilding it. There are
//! four moving parts:
//!
//! - `create_element`: assembles [`Node`]s from declarative calls.
//! - `build`: resolves components into a [`VNode`] tree of elements and text.
//! - the patch engine: mounts a tree, or diffs two trees position by position.
//! - [`Instance`]: owns a component's state, last tree and placement.
//!
//! ## Assembling and building
//!
//! ```rust
//! use sprig_core::*;
//!
//! let list = create_element("ul", None, children!["a", vec!["b", "c"], None::<&str>]);
//! let tree = build(&list)?;
//! assert_eq!(tree.children().len(), 3);
//! assert_eq!(tree.children()[1].content(), Some("b"));
//! # Ok::<(), sprig_core::Error>(())
//! ```
//!
//! ## Components
//!
//! A component is any type implementing [`Component`]. `render` reads props,
//! state and children from the instance and returns a node:
//!
//! ```rust
//! use sprig_core::*;
//!
//! #[derive(Default)]
//! struct Counter;
//!
//! impl Component for Counter {
//!     fn render(&self, this: &Instance) -> anyhow::Result<Node> {
//!         let count = this.state_value("count").and_then(|v| v.as_i64()).unwrap_or(0);
//!         Ok(create_element("span", None, children![count.to_string()]))
//!     }
//! }
//! ```
//!
//! Mounting needs a [`Medium`]; see `sprig-dom` for the in-memory one. Once
//! rendered with [`render`], `Instance::set_state` deep-merges the partial
//! state and patches the medium before returning.
//!
//! ## Patching
//!
//! Two descriptors are the *same node* when kind and tag match, the old one
//! has no more attributes than the new one, every new attribute has an
//! identical old value, and text content matches. Same nodes keep their
//! placement and only their children are reconciled; anything else is
//! remounted over the old placement. Children pair up by index: extras on the
//! new side are appended after the last old child, extras on the old side are
//! removed.

pub mod attr;
pub mod build;
pub mod component;
pub mod error;
pub mod factory;
pub mod matcher;
pub mod medium;
pub mod node;
pub mod patch;
pub mod prelude;
pub mod root;
pub mod state;
pub mod tests;
pub mod vnode;

use std::cell::RefCell;
use std::rc::Rc;

pub use attr::*;
pub use build::build;
pub use component::*;
pub use error::*;
pub use factory::*;
pub use matcher::*;
pub use medium::{Event, Medium, NodeHandle, Placement, SharedMedium, SpanBounds, WeakMedium};
pub use node::*;
pub use patch::CLASS_ALIAS;
pub use root::MountedRoot;
pub use state::*;
pub use vnode::*;

/// First mount: clear everything under `container` and render `root` there.
///
/// Component roots remember the medium, so later `set_state` calls can patch
/// it. Element and text roots are mounted as-is. Whatever an earlier `render`
/// left in `container` is torn down first: its spans are released and a
/// displaced component instance stops being mounted.
pub fn render<M: Medium + 'static>(
    root: &Node,
    medium: &Rc<RefCell<M>>,
    container: NodeHandle,
) -> Result<()> {
    let shared: SharedMedium = medium.clone();
    let owner = Rc::downgrade(&shared);
    let mut m = shared.try_borrow_mut().map_err(|_| Error::MediumBusy)?;

    if let Some(previous) = m.replace_root(container, None) {
        previous.release(&mut *m);
    }
    let existing = m.child_count(container);
    let span = m.create_span(container, 0, existing);
    m.delete_contents(span);

    match root.render_into(&mut *m, &owner, span) {
        Ok(mounted) => {
            m.replace_root(container, Some(mounted));
            Ok(())
        }
        Err(err) => {
            m.release_span(span);
            Err(err)
        }
    }
}
