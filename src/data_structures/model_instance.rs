//! A posable instance of a box model.
//!
//! The instance shares one [`Model`] and owns one [`Geometry`] sized for it.
//! Several instances may pose the same model from different threads. Posing
//! rewrites every vertex, normal and UV of the geometry, so calling
//! [`ModelInstance::set_pose`] twice with the same arguments yields identical
//! buffers.

use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix};
use log::debug;

use crate::{
    data_structures::{
        animation::AnimationSampler, geometry::Geometry, instance::BoxTransform, model::Model,
    },
    error::ModelError,
    pose::{local_transform, pose_pass, resolve_pose},
};

pub struct ModelInstance {
    model: Arc<Model>,
    geometry: Geometry,
}

impl ModelInstance {
    /// Bind `model` to freshly allocated geometry. Vertex data is left zeroed
    /// until the first pose.
    pub fn new(model: impl Into<Arc<Model>>) -> Result<Self, ModelError> {
        let model = model.into();
        let geometry = Geometry::allocate(model.box_count())?;
        debug!(
            "instanced model {} ({} chunks)",
            model.title,
            geometry.chunks().len()
        );
        Ok(Self { model, geometry })
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Pose the model at rest.
    pub fn reset_pose(&mut self) -> Result<(), ModelError> {
        self.set_pose(None, 0)
    }

    /// Pose every box for `frame` of `animation` (or at rest without one).
    pub fn set_pose(
        &mut self,
        animation: Option<&dyn AnimationSampler>,
        frame: u32,
    ) -> Result<(), ModelError> {
        pose_pass(
            &mut self.geometry,
            self.model.tree(),
            self.model.texture(),
            animation,
            frame,
        )?;
        Ok(())
    }

    /// World transform of a single box, computed from the box up to its root
    /// without touching the geometry.
    ///
    /// Unknown names yield the identity transform, so callers can probe for
    /// optional attachment points. Scale is discarded.
    pub fn box_transform(
        &self,
        box_name: &str,
        animation: Option<&dyn AnimationSampler>,
        frame: u32,
    ) -> Result<BoxTransform, ModelError> {
        let tree = self.model.tree();
        let Some(mut id) = tree.id_of(box_name) else {
            return Ok(BoxTransform::new());
        };

        let mut global = Matrix4::identity();
        loop {
            let node = tree.get(id);
            let (position, orientation) = resolve_pose(node, animation, frame)?;
            let box_matrix =
                local_transform(position, orientation, node.offset_from_pivot).to_matrix();
            global = box_matrix * global;
            match node.parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
        Ok(BoxTransform::from_matrix(&global))
    }

    /// Release the geometry buffers, and the model with its texture once no
    /// other instance shares it.
    pub fn dispose(self) {
        debug!("disposing instance of {}", self.model.title);
        match Arc::try_unwrap(self.model) {
            Ok(model) => model.dispose(),
            Err(shared) => debug!(
                "model {} still used by {} other instances",
                shared.title,
                Arc::strong_count(&shared) - 1
            ),
        }
    }
}
