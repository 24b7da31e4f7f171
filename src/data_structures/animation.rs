//! Animation sampling for box models.
//!
//! The pose engine does not know about keyframes: it asks an
//! [`AnimationSampler`] for a position delta and an orientation delta per box
//! and frame and applies them on top of the rest pose. How frames loop or
//! clamp is entirely up to the sampler.

use std::collections::HashMap;

use cgmath::{One, Quaternion, Vector3, VectorSpace, Zero};
use log::warn;

use crate::{
    data_structures::{instance::orientation_from_euler_degrees, model::Model},
    resources::definition::AnimationDefinition,
};

/// Per-box deltas relative to the rest pose.
///
/// Both methods return `None` when the sampler has no data for `box_name`;
/// the pose engine reports that as [`crate::ModelError::UnknownBox`].
pub trait AnimationSampler {
    fn position_delta(&self, box_name: &str, frame: u32) -> Option<Vector3<f32>>;

    fn orientation_delta(&self, box_name: &str, frame: u32) -> Option<Quaternion<f32>>;
}

#[derive(Clone, Debug)]
pub enum Keyframes {
    Translation(Vec<(u32, Vector3<f32>)>),
    Rotation(Vec<(u32, Quaternion<f32>)>),
}

/// Keyframe tracks of one box. Empty tracks mean "stay at rest".
#[derive(Clone, Debug, Default)]
pub struct BoxTracks {
    pub position: Vec<(u32, Vector3<f32>)>,
    pub orientation: Vec<(u32, Quaternion<f32>)>,
}

impl BoxTracks {
    fn push(&mut self, keyframes: Keyframes) {
        match keyframes {
            Keyframes::Translation(mut frames) => self.position.append(&mut frames),
            Keyframes::Rotation(mut frames) => self.orientation.append(&mut frames),
        }
        self.position.sort_by_key(|(frame, _)| *frame);
        self.orientation.sort_by_key(|(frame, _)| *frame);
    }
}

/// An animation clip sampled from per-box keyframes.
#[derive(Clone, Debug)]
pub struct KeyframeAnimation {
    pub title: String,
    /// Loop length in frames.
    pub duration: u32,
    /// Freeze on the last keyframe instead of looping.
    pub hold_last_keyframe: bool,
    tracks: HashMap<String, BoxTracks>,
}

impl KeyframeAnimation {
    pub fn new(title: &str, duration: u32, hold_last_keyframe: bool) -> Self {
        Self {
            title: title.to_string(),
            duration,
            hold_last_keyframe,
            tracks: HashMap::new(),
        }
    }

    pub fn from_definition(def: &AnimationDefinition) -> Self {
        let mut animation = Self::new(&def.title, def.duration, def.hold_last_keyframe);
        for (box_name, node) in &def.node_animations {
            let translations = node
                .position
                .iter()
                .map(|key| (key.frame, Vector3::from(key.value)))
                .collect();
            let rotations = node
                .orientation
                .iter()
                .map(|key| (key.frame, orientation_from_euler_degrees(key.angles)))
                .collect();
            animation.add_keyframes(box_name, Keyframes::Translation(translations));
            animation.add_keyframes(box_name, Keyframes::Rotation(rotations));
        }
        animation
    }

    pub fn add_keyframes(&mut self, box_name: &str, keyframes: Keyframes) {
        self.tracks
            .entry(box_name.to_string())
            .or_default()
            .push(keyframes);
    }

    /// Make the clip answer for every box of `model`.
    ///
    /// Boxes without keyframes get empty (rest) tracks. Tracks that name boxes
    /// the model does not have are kept but reported.
    pub fn bind(mut self, model: &Model) -> Self {
        for name in self.tracks.keys() {
            if model.tree().id_of(name).is_none() {
                warn!(
                    "animation {} has keyframes for box {} which model {} does not contain",
                    self.title, name, model.title
                );
            }
        }
        for name in model.tree().names() {
            self.tracks.entry(name.to_string()).or_default();
        }
        self
    }

    pub fn has_box(&self, box_name: &str) -> bool {
        self.tracks.contains_key(box_name)
    }

    /// Map an arbitrary frame into the clip, looping or holding.
    fn local_frame(&self, frame: u32) -> u32 {
        if self.duration == 0 {
            0
        } else if self.hold_last_keyframe {
            frame.min(self.duration)
        } else {
            frame % self.duration
        }
    }

    fn sample<T: Copy>(
        &self,
        track: &[(u32, T)],
        frame: u32,
        rest: T,
        blend: impl Fn(T, T, f32) -> T,
    ) -> T {
        let frame = self.local_frame(frame);
        let (Some(&(first_frame, first)), Some(&(last_frame, last))) = (track.first(), track.last())
        else {
            return rest;
        };

        if frame < first_frame || frame >= last_frame {
            // interpolate across the loop seam, from the last keyframe back to the first
            let seam = self.duration.saturating_sub(last_frame) + first_frame;
            let holding = self.hold_last_keyframe || seam == 0 || track.len() == 1;
            if frame < first_frame {
                if holding || self.duration == 0 {
                    return first;
                }
                let since_last = (frame + self.duration).saturating_sub(last_frame);
                return blend(last, first, since_last as f32 / seam as f32);
            }
            if holding {
                return last;
            }
            let t = (frame - last_frame) as f32 / seam as f32;
            return blend(last, first, t);
        }

        let next = track.partition_point(|(key_frame, _)| *key_frame <= frame);
        let (from_frame, from) = track[next - 1];
        let (to_frame, to) = track[next];
        let t = (frame - from_frame) as f32 / (to_frame - from_frame) as f32;
        blend(from, to, t)
    }
}

impl AnimationSampler for KeyframeAnimation {
    fn position_delta(&self, box_name: &str, frame: u32) -> Option<Vector3<f32>> {
        let tracks = self.tracks.get(box_name)?;
        Some(self.sample(&tracks.position, frame, Vector3::zero(), |a, b, t| a.lerp(b, t)))
    }

    fn orientation_delta(&self, box_name: &str, frame: u32) -> Option<Quaternion<f32>> {
        let tracks = self.tracks.get(box_name)?;
        Some(self.sample(&tracks.orientation, frame, Quaternion::one(), |a, b, t| {
            a.slerp(b, t)
        }))
    }
}
