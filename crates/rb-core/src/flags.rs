//! Boolean world flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named boolean facts about the world. Unset flags read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    values: BTreeMap<String, bool>,
}

impl Flags {
    /// Create an empty flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a flag, defaulting to `false`.
    pub fn get(&self, name: &str) -> bool {
        self.values.get(name).copied().unwrap_or(false)
    }

    /// Set a flag.
    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.values.insert(name.into(), value);
    }

    /// Iterate over every explicitly set flag.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
