//! Translate parameters into renderer-side operations

use crate::core::types::{Category, Parameter};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// One operation on the avatar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Set a normalized bone's local rotation (radians) around one axis
    BoneRotation { bone: String, axis: Axis, radians: f64 },
    /// Set an expression preset weight
    Expression { preset: String, weight: f64 },
    /// Set a shader property on every standard material
    Material {
        property: &'static str,
        value: f64,
        transparent: bool,
    },
}

impl RenderCommand {
    /// `None` when the renderer has no target for this parameter
    pub fn from_parameter(parameter: &Parameter) -> Option<Self> {
        Self::from_parts(parameter.category, &parameter.name, parameter.value)
    }

    pub fn from_parts(category: Category, name: &str, value: f64) -> Option<Self> {
        match category {
            Category::Pose => {
                let (split, _) = name.char_indices().last()?;
                let (bone, axis) = name.split_at(split);
                let bone = bone.strip_suffix("Rotation").filter(|b| !b.is_empty())?;
                Some(RenderCommand::BoneRotation {
                    bone: bone.to_string(),
                    axis: Axis::from_suffix(axis)?,
                    radians: value,
                })
            }
            Category::Face => {
                if name.is_empty() {
                    return None;
                }
                let preset = match name {
                    "happy" => "joy",
                    "sad" => "sorrow",
                    other => other,
                };
                Some(RenderCommand::Expression {
                    preset: preset.to_string(),
                    weight: value,
                })
            }
            Category::Material => {
                let property = match name {
                    "opacity" => "opacity",
                    "metallic" => "metalness",
                    "roughness" => "roughness",
                    _ => return None,
                };
                Some(RenderCommand::Material {
                    property,
                    value,
                    transparent: property == "opacity" && value < 1.0,
                })
            }
        }
    }
}

impl fmt::Display for RenderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderCommand::BoneRotation { bone, axis, radians } => {
                write!(f, "bone {}.rotation.{:?} = {:.3}", bone, axis, radians)
            }
            RenderCommand::Expression { preset, weight } => {
                write!(f, "expression {} = {:.3}", preset, weight)
            }
            RenderCommand::Material {
                property,
                value,
                transparent,
            } => {
                write!(f, "material.{} = {:.3}", property, value)?;
                if *transparent {
                    write!(f, " (transparent)")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_maps_to_bone_axis() {
        let cmd = RenderCommand::from_parts(Category::Pose, "leftArmRotationZ", 0.4).unwrap();
        assert_eq!(
            cmd,
            RenderCommand::BoneRotation {
                bone: "leftArm".into(),
                axis: Axis::Z,
                radians: 0.4
            }
        );
    }

    #[test]
    fn test_malformed_pose_names() {
        assert!(RenderCommand::from_parts(Category::Pose, "headRotationW", 0.1).is_none());
        assert!(RenderCommand::from_parts(Category::Pose, "RotationX", 0.1).is_none());
        assert!(RenderCommand::from_parts(Category::Pose, "head", 0.1).is_none());
        assert!(RenderCommand::from_parts(Category::Pose, "", 0.1).is_none());
    }

    #[test]
    fn test_expression_aliases() {
        let joy = RenderCommand::from_parts(Category::Face, "happy", 1.0).unwrap();
        assert_eq!(
            joy,
            RenderCommand::Expression {
                preset: "joy".into(),
                weight: 1.0
            }
        );
        let sorrow = RenderCommand::from_parts(Category::Face, "sad", 0.5).unwrap();
        assert!(matches!(sorrow, RenderCommand::Expression { ref preset, .. } if preset == "sorrow"));
        let blink = RenderCommand::from_parts(Category::Face, "blink", 0.2).unwrap();
        assert!(matches!(blink, RenderCommand::Expression { ref preset, .. } if preset == "blink"));
    }

    #[test]
    fn test_material_properties() {
        let cmd = RenderCommand::from_parts(Category::Material, "metallic", 0.7).unwrap();
        assert!(matches!(
            cmd,
            RenderCommand::Material { property: "metalness", transparent: false, .. }
        ));

        let opaque = RenderCommand::from_parts(Category::Material, "opacity", 1.0).unwrap();
        assert!(matches!(opaque, RenderCommand::Material { transparent: false, .. }));
        let faded = RenderCommand::from_parts(Category::Material, "opacity", 0.3).unwrap();
        assert!(matches!(faded, RenderCommand::Material { transparent: true, .. }));
        assert_eq!(faded.to_string(), "material.opacity = 0.300 (transparent)");

        assert!(RenderCommand::from_parts(Category::Material, "shininess", 0.5).is_none());
    }
}
