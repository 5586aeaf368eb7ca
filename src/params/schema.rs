//! Registry of legal (category, name) pairs and their numeric ranges
//!
//! The schema is pure data: validation, prompts and the manual editor all read
//! it, so adding a parameter is a table change and nothing else.

use crate::core::error::{Result, VrmError};
use crate::core::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const POSE_BONES: [&str; 8] = [
    "head", "spine", "leftArm", "rightArm", "leftHand", "rightHand", "leftLeg", "rightLeg",
];
const POSE_AXES: [&str; 3] = ["X", "Y", "Z"];
const FACE_EXPRESSIONS: [&str; 7] = [
    "happy", "sad", "angry", "surprised", "blink", "neutral", "relaxed",
];

/// Inclusive legal range of one parameter, plus its resting value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ParamRange {
    pub fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    fn check(&self) -> std::result::Result<(), String> {
        if !(self.min.is_finite() && self.max.is_finite() && self.default.is_finite()) {
            return Err("range bounds must be finite".into());
        }
        if self.min > self.max {
            return Err(format!("min ({}) > max ({})", self.min, self.max));
        }
        if !self.contains(self.default) {
            return Err(format!(
                "default ({}) outside [{}, {}]",
                self.default, self.min, self.max
            ));
        }
        Ok(())
    }
}

/// Range entry as written in a TOML schema file; `default` may be omitted
#[derive(Debug, Deserialize)]
struct RangeSpec {
    min: f64,
    max: f64,
    default: Option<f64>,
}

/// Static table mapping category -> name -> range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSchema {
    table: BTreeMap<Category, BTreeMap<String, ParamRange>>,
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self::vrm_default()
    }
}

impl ParameterSchema {
    /// An empty schema (everything is rejected)
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// The standard humanoid table: bone rotations, expression weights and
    /// material properties.
    pub fn vrm_default() -> Self {
        let mut schema = Self::empty();

        for bone in POSE_BONES {
            for axis in POSE_AXES {
                schema.insert_unchecked(
                    Category::Pose,
                    format!("{bone}Rotation{axis}"),
                    ParamRange::new(-1.0, 1.0, 0.0),
                );
            }
        }

        for expression in FACE_EXPRESSIONS {
            schema.insert_unchecked(Category::Face, expression, ParamRange::new(0.0, 1.0, 0.0));
        }

        schema.insert_unchecked(Category::Material, "opacity", ParamRange::new(0.0, 1.0, 1.0));
        schema.insert_unchecked(Category::Material, "metallic", ParamRange::new(0.0, 1.0, 0.0));
        schema.insert_unchecked(Category::Material, "roughness", ParamRange::new(0.0, 1.0, 0.5));

        schema
    }

    fn insert_unchecked(&mut self, category: Category, name: impl Into<String>, range: ParamRange) {
        self.table
            .entry(category)
            .or_default()
            .insert(name.into(), range);
    }

    /// Add or replace a parameter definition
    pub fn insert(
        &mut self,
        category: Category,
        name: impl Into<String>,
        range: ParamRange,
    ) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VrmError::InvalidSchema(format!(
                "empty parameter name in category {}",
                category
            )));
        }
        range
            .check()
            .map_err(|e| VrmError::InvalidSchema(format!("{}/{}: {}", category, name, e)))?;
        self.insert_unchecked(category, name, range);
        Ok(())
    }

    /// Parse a schema from TOML:
    ///
    /// ```toml
    /// [pose]
    /// headRotationX = { min = -1.0, max = 1.0, default = 0.0 }
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: BTreeMap<Category, BTreeMap<String, RangeSpec>> = toml::from_str(content)?;
        let mut schema = Self::empty();
        for (category, entries) in raw {
            for (name, spec) in entries {
                let default = spec.default.unwrap_or(if spec.min <= 0.0 && spec.max >= 0.0 {
                    0.0
                } else {
                    spec.min
                });
                schema.insert(category, name, ParamRange::new(spec.min, spec.max, default))?;
            }
        }
        Ok(schema)
    }

    /// Load a schema file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Legal range for (category, name), if known
    pub fn range(&self, category: Category, name: &str) -> Option<ParamRange> {
        self.table.get(&category)?.get(name).copied()
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.range(category, name).is_some()
    }

    /// Known pair with a finite value inside its range
    pub fn is_valid(&self, category: Category, name: &str, value: f64) -> bool {
        self.range(category, name)
            .is_some_and(|range| range.contains(value))
    }

    /// Parameter names of a category in sorted order
    pub fn names(&self, category: Category) -> impl Iterator<Item = &str> {
        self.table
            .get(&category)
            .into_iter()
            .flat_map(|entries| entries.keys().map(String::as_str))
    }

    /// All entries, grouped by category
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str, ParamRange)> {
        self.table.iter().flat_map(|(category, entries)| {
            entries
                .iter()
                .map(move |(name, range)| (*category, name.as_str(), *range))
        })
    }

    pub fn len(&self) -> usize {
        self.table.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable listing used inside oracle prompts
    pub fn describe(&self) -> String {
        let mut s = String::new();
        for (category, entries) in &self.table {
            if entries.is_empty() {
                continue;
            }
            s.push_str(&format!("{} (category: \"{}\")\n", category_title(*category), category));
            for (name, range) in entries {
                s.push_str(&format!("  - {}: {:.1} to {:.1}\n", name, range.min, range.max));
            }
        }
        s
    }
}

fn category_title(category: Category) -> &'static str {
    match category {
        Category::Pose => "Pose (bone rotation)",
        Category::Face => "Face (expression weight)",
        Category::Material => "Material (shader property)",
    }
}
