//! Nested configuration tree with idempotent section creation.

use serde_json::{Map, Value};

use crate::tree::{TreeError, TreeResult};

/// A nested mapping of string keys to JSON values describing one target's configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    root: Map<String, Value>,
}

impl ConfigTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an empty mapping under `key` if it is absent and return a handle to it.
    ///
    /// An existing section is returned untouched.
    pub fn ensure_section(&mut self, key: &str) -> TreeResult<&mut Map<String, Value>> {
        ensure_child(&mut self.root, key, key)
    }

    /// Walk `path`, creating every missing section along the way, and return the last one.
    pub fn ensure_path(&mut self, path: &[&str]) -> TreeResult<&mut Map<String, Value>> {
        let mut section = &mut self.root;
        for (depth, key) in path.iter().enumerate() {
            let dotted = path[..=depth].join(".");
            section = ensure_child(section, key, &dotted)?;
        }
        Ok(section)
    }

    /// Write `value` at `section_path.leaf`, creating intermediate sections first.
    pub fn set_leaf(&mut self, section_path: &[&str], leaf: &str, value: Value) -> TreeResult<()> {
        self.ensure_path(section_path)?.insert(leaf.to_string(), value);
        Ok(())
    }

    /// Look up a value by its dotted path components.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        let mut section = &self.root;
        for key in parents {
            section = section.get(*key)?.as_object()?;
        }
        section.get(*last)
    }

    /// Whether the top level contains `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Borrow the whole tree as a mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }
}

impl From<Map<String, Value>> for ConfigTree {
    fn from(root: Map<String, Value>) -> Self {
        Self { root }
    }
}

fn ensure_child<'a>(
    section: &'a mut Map<String, Value>,
    key: &str,
    dotted: &str,
) -> TreeResult<&'a mut Map<String, Value>> {
    if !section.contains_key(key) {
        tracing::debug!(section = %dotted, "Created section in config params");
    }
    section
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| TreeError::NotASection {
            path: dotted.to_string(),
        })
}
