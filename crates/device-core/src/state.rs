//! Hierarchical save-state tree.
//!
//! Devices serialize themselves into named nodes of typed entries. The tree
//! is `serde`-serializable so hosts can persist it in whatever container
//! format they like. Loading is strict: a missing entry or one of the wrong
//! width fails the load, and loaders must leave the device untouched when
//! that happens.

use serde::{Deserialize, Serialize};

/// A typed save-state value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    F64(f64),
    String(String),
}

/// A named node holding typed entries and child nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateNode {
    pub name: String,
    pub entries: Vec<(String, StateValue)>,
    pub children: Vec<StateNode>,
}

impl StateNode {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.entries.push((key.to_string(), StateValue::Bool(value)));
    }

    pub fn set_u8(&mut self, key: &str, value: u8) {
        self.entries.push((key.to_string(), StateValue::U8(value)));
    }

    pub fn set_u16(&mut self, key: &str, value: u16) {
        self.entries.push((key.to_string(), StateValue::U16(value)));
    }

    pub fn set_u32(&mut self, key: &str, value: u32) {
        self.entries.push((key.to_string(), StateValue::U32(value)));
    }

    pub fn set_f64(&mut self, key: &str, value: f64) {
        self.entries.push((key.to_string(), StateValue::F64(value)));
    }

    /// Add a child node, returning a handle to fill it in.
    pub fn add_child(&mut self, name: &str) -> &mut StateNode {
        self.children.push(StateNode::new(name));
        self.children.last_mut().expect("just pushed")
    }

    fn lookup(&self, key: &str) -> Option<&StateValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Find a direct child node by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&StateNode> {
        self.children.iter().find(|node| node.name == name)
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.lookup(key)? {
            StateValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_u8(&self, key: &str) -> Option<u8> {
        match self.lookup(key)? {
            StateValue::U8(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_u16(&self, key: &str) -> Option<u16> {
        match self.lookup(key)? {
            StateValue::U16(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        match self.lookup(key)? {
            StateValue::U32(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.lookup(key)? {
            StateValue::F64(value) => Some(*value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookup_rejects_wrong_width() {
        let mut node = StateNode::new("cpu");
        node.set_u8("a", 0x42);
        assert_eq!(node.get_u8("a"), Some(0x42));
        assert_eq!(node.get_u16("a"), None);
        assert_eq!(node.get_u8("missing"), None);
    }

    #[test]
    fn serde_round_trip() {
        let mut node = StateNode::new("cpu");
        node.set_u16("pc", 0x1234);
        node.set_bool("iff1", true);
        node.add_child("lines").set_bool("INT", false);

        let json = serde_json::to_string(&node).unwrap();
        let back: StateNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
