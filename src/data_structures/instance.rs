//! Rigid transforms for boxes.
//!
//! Boxes only ever carry a position and an orientation; hierarchical scale is
//! not supported, so composing two transforms never skews.

use std::ops::Mul;

use cgmath::{EuclideanSpace, InnerSpace, Matrix3, Matrix4, One, Point3, Quaternion, Rad, Rotation3, Vector3};

/// Rigid transformation: position plus orientation (as quaternion).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxTransform {
    pub position: Vector3<f32>,
    pub orientation: Quaternion<f32>,
}

impl BoxTransform {
    /// Identity transformation (no move, no rotate).
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            orientation: Quaternion::one(),
        }
    }

    pub fn from_parts(position: Vector3<f32>, orientation: Quaternion<f32>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from(self.orientation)
    }

    /// Split a matrix into translation and rotation. Any scale in the upper 3x3
    /// is normalised away before the rotation is extracted.
    pub fn from_matrix(matrix: &Matrix4<f32>) -> Self {
        let position = matrix.w.truncate();
        let x = matrix.x.truncate();
        let y = matrix.y.truncate();
        let z = matrix.z.truncate();
        let rotation = Matrix3::from_cols(
            normalize_or_zero(x),
            normalize_or_zero(y),
            normalize_or_zero(z),
        );
        Self {
            position,
            orientation: Quaternion::from(rotation).normalize(),
        }
    }

    pub fn transform_point(&self, point: Vector3<f32>) -> Point3<f32> {
        Point3::from_vec(self.orientation * point + self.position)
    }
}

/// Orientation from Euler angles in degrees, applied Y first, then X, then Z.
pub fn orientation_from_euler_degrees(angles: [f32; 3]) -> Quaternion<f32> {
    let [x, y, z] = angles.map(f32::to_radians);
    Quaternion::from_angle_y(Rad(y)) * Quaternion::from_angle_x(Rad(x)) * Quaternion::from_angle_z(Rad(z))
}

pub(crate) fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let magnitude = v.magnitude();
    if magnitude > 0.0 { v / magnitude } else { Vector3::new(0.0, 0.0, 0.0) }
}

impl Mul<BoxTransform> for BoxTransform {
    type Output = Self;

    fn mul(self, rhs: BoxTransform) -> Self::Output {
        &self * &rhs
    }
}

/// `parent * child`: the child is expressed in the parent's frame.
impl<'a, 'b> Mul<&'b BoxTransform> for &'a BoxTransform {
    type Output = BoxTransform;

    fn mul(self, rhs: &'b BoxTransform) -> Self::Output {
        BoxTransform {
            position: self.position + self.orientation * rhs.position,
            orientation: self.orientation * rhs.orientation,
        }
    }
}

impl From<Vector3<f32>> for BoxTransform {
    fn from(position: Vector3<f32>) -> Self {
        BoxTransform {
            position,
            ..Default::default()
        }
    }
}

impl Default for BoxTransform {
    fn default() -> Self {
        Self::new()
    }
}
