//! Planar kinematics helpers shared by the contact pipeline.
//!
//! Poses and twists are 3-vectors `(x, y, theta)` / `(vx, vy, omega)`.
//! All maps here are total for finite inputs; failure handling lives in the
//! contact layer.

use nalgebra::{Matrix3, Vector2, Vector3};

/// Planar rotation embedded in twist coordinates: 2×2 rotation block, 1 on
/// the angular entry. Orthonormal for all `theta`.
#[inline]
pub fn rotation(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(
        c, -s, 0.0, //
        s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// Rigid-body velocity transfer to an offset `(x_r, y_r)` from the
/// reference point: identity plus the nilpotent angular-to-linear block.
///
/// Always invertible; `jacobian(x, y)⁻¹ = jacobian(-x, -y)`.
#[inline]
pub fn jacobian(x_r: f64, y_r: f64) -> Matrix3<f64> {
    let mut j = Matrix3::identity();
    j[(0, 2)] = -y_r;
    j[(1, 2)] = x_r;
    j
}

/// Equivalent radius of a uniform rectangular pressure patch: the radius of
/// gyration `sqrt(I / area)` with `I = (w·h³ + h·w³)/12`.
#[inline]
pub fn eq_radius(width: f64, height: f64) -> f64 {
    let area = width * height;
    let inertia = (width * height.powi(3) + height * width.powi(3)) / 12.0;
    (inertia / area).sqrt()
}

/// Precondition gate for the contact pipeline: is the pusher's circular
/// contact patch fully inside the object's rectangular footprint?
///
/// The circle center is expressed in the rectangle's rotated frame and the
/// bounds are inset by the circle radius on every side.
pub fn contact_inside_footprint(
    pusher_pose: Vector3<f64>,
    pusher_radius: f64,
    object_pose: Vector3<f64>,
    width: f64,
    height: f64,
) -> bool {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let (s, c) = object_pose.z.sin_cos();
    let rel = Vector2::new(
        pusher_pose.x - object_pose.x,
        pusher_pose.y - object_pose.y,
    );
    // R(theta)^T applied to the world-frame offset.
    let local = Vector2::new(c * rel.x + s * rel.y, -s * rel.x + c * rel.y);
    local.x >= -half_w + pusher_radius
        && local.x <= half_w - pusher_radius
        && local.y >= -half_h + pusher_radius
        && local.y <= half_h - pusher_radius
}
