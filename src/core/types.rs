//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parameter category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Skeletal joint rotation
    Pose,
    /// Expression (blendshape) weight
    Face,
    /// Shader property
    Material,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Pose, Category::Face, Category::Material];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pose => "pose",
            Category::Face => "face",
            Category::Material => "material",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pose" => Ok(Category::Pose),
            "face" => Ok(Category::Face),
            "material" => Ok(Category::Material),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Key of a parameter inside a [`ParameterSet`](crate::params::store::ParameterSet)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParameterKey {
    pub category: Category,
    pub name: String,
}

impl ParameterKey {
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

/// A single controllable value applied to the avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub category: Category,
    pub name: String,
    pub value: f64,
}

impl Parameter {
    pub fn new(category: Category, name: impl Into<String>, value: f64) -> Self {
        Self {
            category,
            name: name.into(),
            value,
        }
    }

    pub fn key(&self) -> ParameterKey {
        ParameterKey::new(self.category, self.name.clone())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} = {:.2}", self.category, self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&Category::Material).unwrap();
        assert_eq!(json, "\"material\"");
        let back: Category = serde_json::from_str("\"face\"").unwrap();
        assert_eq!(back, Category::Face);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Pose".parse::<Category>(), Ok(Category::Pose));
        assert_eq!(" material ".parse::<Category>(), Ok(Category::Material));
        assert!("body".parse::<Category>().is_err());
    }

    #[test]
    fn test_parameter_display() {
        let p = Parameter::new(Category::Face, "happy", 1.0);
        assert_eq!(p.to_string(), "face/happy = 1.00");
        assert_eq!(p.key().to_string(), "face/happy");
    }
}
