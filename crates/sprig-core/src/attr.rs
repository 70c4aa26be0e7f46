use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::medium::Event;

/// Event callback. Two handlers are equal only if they are the same closure.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Event)>);

impl Handler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<handler>")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Text(String),
    Handler(Handler),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Handler(_) => None,
        }
    }

    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            AttrValue::Handler(h) => Some(h),
            AttrValue::Text(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<Handler> for AttrValue {
    fn from(h: Handler) -> Self {
        AttrValue::Handler(h)
    }
}

/// Insertion-ordered attribute map.
///
/// Setting a name that already exists replaces the value without moving it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    entries: SmallVec<[(String, AttrValue); 4]>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn on(self, event: &str, f: impl Fn(&Event) + 'static) -> Self {
        self.with(handler_attr_name(event), Handler::new(f))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl IntoIterator for Attributes {
    type Item = (String, AttrValue);
    type IntoIter = smallvec::IntoIter<[(String, AttrValue); 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

/// `onClick` -> `Some("click")`. Anything not shaped `on<Name>` is `None`.
pub fn event_name(attr: &str) -> Option<String> {
    let rest = attr.strip_prefix("on")?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

/// `click` -> `onClick`.
fn handler_attr_name(event: &str) -> String {
    let mut chars = event.chars();
    match chars.next() {
        Some(first) => format!("on{}{}", first.to_uppercase(), chars.as_str()),
        None => "on".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names() {
        assert_eq!(event_name("onClick").as_deref(), Some("click"));
        assert_eq!(event_name("onMouseDown").as_deref(), Some("mouseDown"));
        assert_eq!(event_name("oninput").as_deref(), Some("input"));
        assert_eq!(event_name("on"), None);
        assert_eq!(event_name("class"), None);
    }

    #[test]
    fn set_keeps_insertion_order() {
        let mut attrs = Attributes::new().with("id", "a").with("title", "t");
        attrs.set("id", "b");
        let names: Vec<_> = attrs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["id", "title"]);
        assert_eq!(attrs.get("id"), Some(&AttrValue::from("b")));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn handlers_compare_by_identity() {
        let h = Handler::new(|_| {});
        let same = h.clone();
        let other = Handler::new(|_| {});
        assert_eq!(h, same);
        assert_ne!(h, other);
    }

    #[test]
    fn on_builds_handler_attribute() {
        let attrs = Attributes::new().on("click", |_| {});
        let (name, value) = attrs.iter().next().unwrap();
        assert_eq!(name, "onClick");
        assert!(value.as_handler().is_some());
    }
}
