use crate::component::Instance;
use crate::medium::{Medium, Placement};
use crate::patch::release_tree;
use crate::vnode::VNode;

/// What [`render`](crate::render) left at the root of a container.
///
/// Media keep one of these per container so the next `render` into the same
/// container can tear the previous root down.
#[derive(Debug)]
pub enum MountedRoot {
    /// A component root. It stays patchable until displaced.
    Component {
        instance: Instance,
        placement: Placement,
    },
    /// An element or text root, mounted without a lifecycle.
    Tree(VNode),
}

impl MountedRoot {
    /// Release every span the root holds. A displaced instance is detached
    /// and reports not mounted from then on.
    ///
    /// An instance that was since rendered somewhere else is left alone.
    pub fn release(self, medium: &mut dyn Medium) {
        match self {
            MountedRoot::Component {
                instance,
                placement,
            } => {
                if instance.placement() == Some(placement) {
                    instance.detach(medium);
                } else {
                    log::debug!("{}: remounted elsewhere, not detaching", instance.name());
                }
            }
            MountedRoot::Tree(tree) => release_tree(medium, &tree),
        }
    }
}
