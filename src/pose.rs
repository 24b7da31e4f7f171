//! Pose engine.
//!
//! Walks the box tree of a model in pre-order, composes rest pose and optional
//! animation deltas into global rigid transforms and bakes every box into the
//! flat geometry buffers: 6 faces of 4 vertices each, one normal per face and
//! atlas UVs derived from the box size and texture offset.
//!
//! Box `b` always occupies vertex slots `b * 24 .. b * 24 + 24` and face `f`
//! of that box the slots `b * 24 + f * 4 .. + 4`, which is what the index
//! buffer built by [`Geometry::allocate`] assumes.

use cgmath::{Point3, Quaternion, Vector3};
use log::trace;

use crate::{
    data_structures::{
        animation::AnimationSampler,
        box_tree::{BoxId, BoxNode, BoxTree, corner::*},
        geometry::{Geometry, VERTICES_PER_BOX},
        instance::{BoxTransform, normalize_or_zero},
        texture::TextureMetadata,
    },
    error::ModelError,
};

/// Box faces in buffer order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
    Right,
    Bottom,
    Left,
    Top,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Right,
        Face::Bottom,
        Face::Left,
        Face::Top,
    ];

    /// Corners of the face, wound so that `(v1 - v0) x (v2 - v0)` points outwards.
    pub fn corners(self) -> [usize; 4] {
        match self {
            Face::Front => [RIGHT_TOP_FRONT, LEFT_TOP_FRONT, LEFT_BOTTOM_FRONT, RIGHT_BOTTOM_FRONT],
            Face::Back => [LEFT_TOP_BACK, RIGHT_TOP_BACK, RIGHT_BOTTOM_BACK, LEFT_BOTTOM_BACK],
            Face::Right => [RIGHT_TOP_BACK, RIGHT_TOP_FRONT, RIGHT_BOTTOM_FRONT, RIGHT_BOTTOM_BACK],
            Face::Bottom => [RIGHT_BOTTOM_FRONT, LEFT_BOTTOM_FRONT, LEFT_BOTTOM_BACK, RIGHT_BOTTOM_BACK],
            Face::Left => [LEFT_TOP_FRONT, LEFT_TOP_BACK, LEFT_BOTTOM_BACK, LEFT_BOTTOM_FRONT],
            Face::Top => [RIGHT_TOP_BACK, LEFT_TOP_BACK, LEFT_TOP_FRONT, RIGHT_TOP_FRONT],
        }
    }

    /// Atlas cell of the face as `(offset, size)` in texels, before `tex_offset`.
    ///
    /// This is the usual cube net: the top row holds top and bottom, the row
    /// below holds left, front, right and back.
    pub fn atlas_cell(self, size: Vector3<f32>) -> ([f32; 2], [f32; 2]) {
        let Vector3 { x, y, z } = size;
        match self {
            Face::Front => ([z, z], [x, y]),
            Face::Back => ([z * 2.0 + x, z], [x, y]),
            Face::Right => ([z + x, z], [z, y]),
            Face::Bottom => ([z + x, 0.0], [x, z]),
            Face::Left => ([0.0, z], [z, y]),
            Face::Top => ([z, 0.0], [x, z]),
        }
    }
}

/// Effective position and orientation of a box for `frame`.
pub fn resolve_pose(
    node: &BoxNode,
    animation: Option<&dyn AnimationSampler>,
    frame: u32,
) -> Result<(Vector3<f32>, Quaternion<f32>), ModelError> {
    let Some(animation) = animation else {
        return Ok((node.position, node.orientation));
    };
    let unknown = || ModelError::UnknownBox(node.name.clone());
    let position_delta = animation.position_delta(&node.name, frame).ok_or_else(unknown)?;
    let orientation_delta = animation
        .orientation_delta(&node.name, frame)
        .ok_or_else(unknown)?;
    Ok((node.position + position_delta, orientation_delta * node.orientation))
}

/// Transform of a box relative to its parent: rotate about the pivot, then
/// move the pivot offset into place.
pub fn local_transform(
    position: Vector3<f32>,
    orientation: Quaternion<f32>,
    offset_from_pivot: Vector3<f32>,
) -> BoxTransform {
    let origin = orientation * offset_from_pivot + position;
    BoxTransform::from_parts(origin, orientation)
}

/// Pose every box of `tree` into `geometry`.
///
/// Returns the number of vertices written. Nothing is written when the
/// geometry was allocated for a different box count; an animation that lacks
/// data for a box aborts the pass with [`ModelError::UnknownBox`], leaving the
/// buffers partially updated.
pub fn pose_pass<T: TextureMetadata + ?Sized>(
    geometry: &mut Geometry,
    tree: &BoxTree,
    texture: &T,
    animation: Option<&dyn AnimationSampler>,
    frame: u32,
) -> Result<usize, ModelError> {
    if geometry.box_count() != tree.len() {
        return Err(ModelError::GeometryMismatch {
            expected: geometry.box_count(),
            actual: tree.len(),
        });
    }
    let mut pass = PosePass {
        geometry,
        tree,
        atlas: [texture.width() as f32, texture.height() as f32],
        animation,
        frame,
    };

    let identity = BoxTransform::new();
    let mut box_index = 0;
    for &root in tree.roots() {
        box_index += pass.pose_recursive(box_index, root, &identity)?;
    }
    trace!("posed {} boxes at frame {}", box_index, frame);
    Ok(box_index * VERTICES_PER_BOX)
}

struct PosePass<'a> {
    geometry: &'a mut Geometry,
    tree: &'a BoxTree,
    atlas: [f32; 2],
    animation: Option<&'a dyn AnimationSampler>,
    frame: u32,
}

impl PosePass<'_> {
    /// Pose `id` and its subtree starting at buffer slot `box_index`.
    /// Returns how many boxes were written.
    fn pose_recursive(
        &mut self,
        box_index: usize,
        id: BoxId,
        parent: &BoxTransform,
    ) -> Result<usize, ModelError> {
        let tree = self.tree;
        let node = tree.get(id);

        let (position, orientation) = resolve_pose(node, self.animation, self.frame)?;
        let global = parent * &local_transform(position, orientation, node.offset_from_pivot);

        let corners: [Point3<f32>; 8] = node.vertex_coords.map(|v| global.transform_point(v));
        self.write_box(box_index, node, &corners);

        let mut box_count = 1;
        for &child in &node.children {
            box_count += self.pose_recursive(box_index + box_count, child, &global)?;
        }
        Ok(box_count)
    }

    fn write_box(&mut self, box_index: usize, node: &BoxNode, corners: &[Point3<f32>; 8]) {
        let [width, height] = self.atlas;
        let [tex_u, tex_v] = node.tex_offset.map(|t| t as f32);

        for (face_index, face) in Face::ALL.into_iter().enumerate() {
            let offset = box_index * VERTICES_PER_BOX + face_index * 4;

            let quad = face.corners().map(|c| corners[c]);
            let normal = normalize_or_zero((quad[1] - quad[0]).cross(quad[2] - quad[0]));
            self.geometry
                .write_quad(offset, quad.map(Into::into), normal.into());

            let ([cell_u, cell_v], [cell_w, cell_h]) = face.atlas_cell(node.size);
            let left = (cell_u + tex_u) / width;
            let right = (cell_u + tex_u + cell_w) / width;
            let top = 1.0 - (cell_v + tex_v) / height;
            let bottom = 1.0 - (cell_v + tex_v + cell_h) / height;
            self.geometry.write_quad_uvs(
                offset,
                [[right, top], [left, top], [left, bottom], [right, bottom]],
            );
        }
    }
}
