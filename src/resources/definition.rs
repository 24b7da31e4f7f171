//! Serde representation of model (`.csjsmodel`) and animation
//! (`.csjsmodelanim`) files.
//!
//! These types mirror the JSON layout one to one; turning them into posable
//! data happens in [`crate::data_structures`].

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// `{ title, tree, transparent? }`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    #[serde(default)]
    pub title: String,
    pub tree: Vec<BoxDefinition>,
    /// Any JSON value; its truthiness decides.
    #[serde(default, deserialize_with = "truthy")]
    pub transparent: bool,
}

impl ModelDefinition {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxDefinition {
    pub name: String,
    pub position: [f32; 3],
    pub offset_from_pivot: [f32; 3],
    pub size: [f32; 3],
    /// Euler angles in degrees.
    pub rotation: [f32; 3],
    pub tex_offset: [i32; 2],
    #[serde(default)]
    pub children: Vec<BoxDefinition>,
    #[serde(default)]
    pub vertex_coords: Option<Vec<[f32; 3]>>,
}

/// `{ title, duration, holdLastKeyframe, nodeAnimations: { <box>: ... } }`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDefinition {
    #[serde(default)]
    pub title: String,
    pub duration: u32,
    #[serde(default)]
    pub hold_last_keyframe: bool,
    #[serde(default)]
    pub node_animations: HashMap<String, NodeAnimationDefinition>,
}

impl AnimationDefinition {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NodeAnimationDefinition {
    #[serde(default)]
    pub position: Vec<PositionKeyframe>,
    #[serde(default)]
    pub orientation: Vec<OrientationKeyframe>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PositionKeyframe {
    pub frame: u32,
    pub value: [f32; 3],
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct OrientationKeyframe {
    pub frame: u32,
    /// Euler angles in degrees, same convention as box rotations.
    pub angles: [f32; 3],
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
