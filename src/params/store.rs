//! In-memory parameter state driving the renderer
//!
//! Merges are additive and last-write-wins per (category, name); `reset` is
//! the only way an entry disappears.

use crate::core::types::{Category, Parameter, ParameterKey};
use ahash::AHashMap;
use serde::{Serialize, Serializer};

/// Current value of every parameter that has been touched this session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: AHashMap<ParameterKey, f64>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category, name: &str) -> Option<f64> {
        self.values.get(&ParameterKey::new(category, name)).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterKey, f64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    /// Entries ordered by category then name, for display
    pub fn to_sorted_vec(&self) -> Vec<Parameter> {
        let mut params: Vec<_> = self
            .values
            .iter()
            .map(|(key, value)| Parameter::new(key.category, key.name.clone(), *value))
            .collect();
        params.sort_by(|a, b| (a.category, &a.name).cmp(&(b.category, &b.name)));
        params
    }

    fn upsert(&mut self, parameter: &Parameter) {
        self.values.insert(parameter.key(), parameter.value);
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_sorted_vec().serialize(serializer)
    }
}

/// Owner of the live [`ParameterSet`]
#[derive(Debug, Default)]
pub struct ParameterStore {
    current: ParameterSet,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure merge: `incoming` overwrites matching keys, everything else is kept
    pub fn merge(existing: &ParameterSet, incoming: &[Parameter]) -> ParameterSet {
        let mut merged = existing.clone();
        for parameter in incoming {
            merged.upsert(parameter);
        }
        merged
    }

    /// Pure reset: always the empty set
    pub fn reset() -> ParameterSet {
        ParameterSet::new()
    }

    /// Merge `incoming` into the live set
    pub fn apply(&mut self, incoming: &[Parameter]) {
        self.current = Self::merge(&self.current, incoming);
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.current = Self::reset();
    }

    pub fn current(&self) -> &ParameterSet {
        &self.current
    }
}
