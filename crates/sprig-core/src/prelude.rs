pub use crate::attr::{AttrValue, Attributes, Handler};
pub use crate::children;
pub use crate::component::{Component, Instance, WeakInstance};
pub use crate::error::{Error, Result};
pub use crate::factory::{Child, NodeType, create_element};
pub use crate::matcher::{ByKey, ChildMatcher, Positional};
pub use crate::medium::{Event, Medium, NodeHandle, Placement};
pub use crate::root::MountedRoot;
pub use crate::node::{ElementNode, Node, TextNode};
pub use crate::render;
pub use crate::vnode::{VNode, is_same_node};
