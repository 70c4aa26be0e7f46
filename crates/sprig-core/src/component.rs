use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::attr::{AttrValue, Attributes};
use crate::build::build;
use crate::error::{Error, Result};
use crate::medium::{Medium, Placement, SharedMedium, WeakMedium};
use crate::node::Node;
use crate::patch::{mount, patch, release_tree};
use crate::state::{State, merge};
use crate::vnode::VNode;

/// User-defined render logic.
///
/// `render` reads props, state and children through `this` and returns the
/// node it renders to. It must not mutate anything; updates go through
/// [`Instance::set_state`].
pub trait Component: 'static {
    fn render(&self, this: &Instance) -> anyhow::Result<Node>;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A live component: render logic plus props, children, state, and the tree
/// and span from its last render.
#[derive(Clone)]
pub struct Instance(Rc<RefCell<InstanceInner>>);

/// Non-owning handle, for event handlers that point back at their owner.
#[derive(Clone)]
pub struct WeakInstance(Weak<RefCell<InstanceInner>>);

struct InstanceInner {
    component: Rc<dyn Component>,
    props: Attributes,
    children: Vec<Node>,
    state: State,
    last_tree: Option<VNode>,
    placement: Option<Placement>,
    medium: Option<WeakMedium>,
}

impl Instance {
    pub fn new(component: impl Component) -> Self {
        Self::from_component(Rc::new(component))
    }

    pub(crate) fn from_component(component: Rc<dyn Component>) -> Self {
        Self(Rc::new(RefCell::new(InstanceInner {
            component,
            props: Attributes::new(),
            children: Vec::new(),
            state: State::new(),
            last_tree: None,
            placement: None,
            medium: None,
        })))
    }

    pub fn name(&self) -> &'static str {
        self.0.borrow().component.name()
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.borrow_mut().props.set(name, value);
    }

    pub fn append_child(&self, child: Node) {
        self.0.borrow_mut().children.push(child);
    }

    pub fn props(&self) -> Ref<'_, Attributes> {
        Ref::map(self.0.borrow(), |i| &i.props)
    }

    pub fn prop(&self, name: &str) -> Option<AttrValue> {
        self.0.borrow().props.get(name).cloned()
    }

    pub fn prop_text(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .props
            .get(name)
            .and_then(|v| v.as_text().map(str::to_string))
    }

    /// Children supplied by the parent, ready to be interpolated into a
    /// rendered node.
    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn state(&self) -> Ref<'_, State> {
        Ref::map(self.0.borrow(), |i| &i.state)
    }

    pub fn state_value(&self, key: &str) -> Option<Value> {
        self.0.borrow().state.get(key).cloned()
    }

    pub fn placement(&self) -> Option<Placement> {
        self.0.borrow().placement
    }

    pub fn last_tree(&self) -> Option<Ref<'_, VNode>> {
        Ref::filter_map(self.0.borrow(), |i| i.last_tree.as_ref()).ok()
    }

    pub fn is_mounted(&self) -> bool {
        let inner = self.0.borrow();
        inner.last_tree.is_some() && inner.medium.as_ref().is_some_and(|m| m.strong_count() > 0)
    }

    pub fn downgrade(&self) -> WeakInstance {
        WeakInstance(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Render and resolve this instance's current descriptor tree.
    pub fn build(&self) -> Result<VNode> {
        let component = self.0.borrow().component.clone();
        let rendered = component
            .render(self)
            .map_err(|e| Error::render(component.name(), e))?;
        build(&rendered)
    }

    /// Merge `partial` into the state and patch the medium to match.
    ///
    /// Runs the whole cycle before returning. If the cycle fails the state is
    /// put back the way it was, so it never disagrees with the medium.
    pub fn set_state(&self, partial: Value) -> Result<()> {
        let partial = match partial {
            Value::Object(map) => map,
            other => return Err(Error::InvalidState(json_kind(&other))),
        };

        let snapshot = {
            let mut inner = self.0.borrow_mut();
            let snapshot = inner.state.clone();
            merge(&mut inner.state, partial);
            snapshot
        };

        if let Err(err) = self.update() {
            log::debug!("{}: update failed, restoring state: {err}", self.name());
            self.0.borrow_mut().state = snapshot;
            return Err(err);
        }
        Ok(())
    }

    /// Rebuild and patch against the last rendered tree.
    pub fn update(&self) -> Result<()> {
        let shared = self.medium()?;
        let mut medium = shared.try_borrow_mut().map_err(|_| Error::MediumBusy)?;

        let mut tree = self.build()?;
        let old = self.0.borrow_mut().last_tree.take();
        let old = old.ok_or_else(|| Error::NotMounted {
            component: self.name(),
        })?;

        let result = patch(&mut *medium, &old, &mut tree);
        let mut inner = self.0.borrow_mut();
        match result {
            Ok(()) => {
                log::debug!(
                    "{}: patched {} descriptors",
                    inner.component.name(),
                    tree.node_count()
                );
                inner.last_tree = Some(tree);
                Ok(())
            }
            Err(err) => {
                inner.last_tree = Some(old);
                Err(err)
            }
        }
    }

    pub(crate) fn render_into(
        &self,
        medium: &mut dyn Medium,
        owner: &WeakMedium,
        span: Placement,
    ) -> Result<()> {
        let mut tree = self.build()?;
        self.release_previous(medium, owner);
        mount(medium, &mut tree, span);

        let mut inner = self.0.borrow_mut();
        log::debug!(
            "{}: mounted {} descriptors",
            inner.component.name(),
            tree.node_count()
        );
        inner.last_tree = Some(tree);
        inner.placement = Some(span);
        inner.medium = Some(owner.clone());
        Ok(())
    }

    /// Drop the tree from the last mount and release its spans. Afterwards
    /// the instance is not mounted and `set_state` fails with `NotMounted`.
    pub(crate) fn detach(&self, medium: &mut dyn Medium) {
        let tree = {
            let mut inner = self.0.borrow_mut();
            inner.placement = None;
            inner.medium = None;
            inner.last_tree.take()
        };
        if let Some(tree) = tree {
            log::debug!("{}: detached", self.name());
            release_tree(medium, &tree);
        }
    }

    /// Rendering an already mounted instance again moves it; the spans of the
    /// old mount go back to whichever medium holds them.
    fn release_previous(&self, medium: &mut dyn Medium, owner: &WeakMedium) {
        let previous = self.0.borrow().medium.clone();
        let Some(previous) = previous else { return };
        if previous.ptr_eq(owner) {
            self.detach(medium);
        } else if let Some(other) = previous.upgrade() {
            match other.try_borrow_mut() {
                Ok(mut other) => self.detach(&mut *other),
                Err(_) => log::warn!("{}: previous medium busy, spans kept", self.name()),
            }
        }
    }

    fn medium(&self) -> Result<SharedMedium> {
        let inner = self.0.borrow();
        inner
            .medium
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| Error::NotMounted {
                component: inner.component.name(),
            })
    }
}

impl WeakInstance {
    pub fn upgrade(&self) -> Option<Instance> {
        self.0.upgrade().map(Instance)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inner) => f
                .debug_struct("Instance")
                .field("component", &inner.component.name())
                .field("props", &inner.props)
                .field("state", &inner.state)
                .field("placement", &inner.placement)
                .finish(),
            Err(_) => write!(f, "Instance(<borrowed>)"),
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
