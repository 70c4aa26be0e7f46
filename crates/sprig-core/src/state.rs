use serde_json::{Map, Value};

/// Component state: a JSON object.
pub type State = Map<String, Value>;

/// Deep-merge `partial` into `target`.
///
/// Objects merge key by key and arrays index by index. Anything else
/// (scalars, null, or an object meeting an array) overwrites. Recursion only
/// descends while both sides are composite, so it stops at the first leaf.
pub fn merge(target: &mut State, partial: State) {
    for (key, incoming) in partial {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, incoming),
            None => {
                target.insert(key, incoming);
            }
        }
    }
}

fn merge_value(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Object(old), Value::Object(new)) => merge(old, new),
        (Value::Array(old), Value::Array(new)) => {
            for (i, value) in new.into_iter().enumerate() {
                match old.get_mut(i) {
                    Some(slot) => merge_value(slot, value),
                    None => old.push(value),
                }
            }
        }
        (slot, incoming) => *slot = incoming,
    }
}
