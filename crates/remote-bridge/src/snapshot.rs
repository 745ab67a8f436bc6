//! Local copy of the listened node, rebuilt from `put` and `patch` events.

use serde_json::{Map, Value};

/// JSON tree mirroring the value at the listened path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    root: Value,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value at `path`. `null` deletes it.
    pub fn put(&mut self, path: &str, data: Value) {
        let segments: Vec<&str> = split_path(path).collect();
        set_at(&mut self.root, &segments, data);
    }

    /// Merge the children of `data` into the node at `path`.
    pub fn patch(&mut self, path: &str, data: Value) {
        let Value::Object(children) = data else {
            self.put(path, data);
            return;
        };

        for (key, value) in children {
            let segments: Vec<&str> = split_path(path).chain(split_path(&key)).collect();
            set_at(&mut self.root, &segments, value);
        }
    }

    pub fn value(&self) -> &Value {
        &self.root
    }

    /// The snapshot when it can hold a command record.
    pub fn record(&self) -> Option<&Value> {
        self.root.is_object().then_some(&self.root)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn set_at(node: &mut Value, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    if !node.is_object() {
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }
    let Value::Object(children) = node else {
        return;
    };

    let child = children.entry(head.to_string()).or_insert(Value::Null);
    set_at(child, rest, value);

    if child.is_null() {
        children.remove(*head);
    }
    // an object left without children no longer exists
    if children.is_empty() {
        *node = Value::Null;
    }
}
