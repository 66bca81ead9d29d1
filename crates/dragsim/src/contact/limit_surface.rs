//! Limit surface construction for the two frictional interfaces.
//!
//! `A` bounds the friction wrench the ground can exert on the object under
//! the combined object weight and pusher load; `B` bounds the wrench the
//! pusher patch can exert on the object. Both are ellipsoidal (quadratic
//! form) approximations, rebuilt from scratch every tick from the current
//! relative pose — no history is retained.
//!
//! Convention note: the diagonal friction bounds are turned into ellipsoid
//! coefficients by an element-wise invert-then-square on the diagonal. This
//! is the quadratic friction-force bound of the source model, not a matrix
//! inverse/square, and is preserved exactly.

use nalgebra::{Matrix3, Vector3};

use crate::kinematics::jacobian;

use super::types::{ContactGeometry, DragError, FrictionParams};

/// Element-wise invert-and-square of a diagonal friction bound.
#[inline]
fn inv_square_diag(elements: Vector3<f64>) -> Matrix3<f64> {
    Matrix3::from_diagonal(&elements.map(|e| 1.0 / (e * e)))
}

/// Build the ground (`A`) and pusher (`B`) limit surfaces for the current
/// pusher normal force and relative pose.
///
/// Fails with `DragError::Domain` before any matrix is formed if the weight,
/// the normal force, or either equivalent radius is non-positive; silently
/// producing a non-positive-definite surface is not an option.
pub fn limit_surfaces(
    params: &FrictionParams,
    geometry: &ContactGeometry,
    normal_force: f64,
    q_rel: Vector3<f64>,
) -> Result<(Matrix3<f64>, Matrix3<f64>), DragError> {
    params.validate()?;
    geometry.validate()?;
    if !(normal_force > 0.0) || !normal_force.is_finite() {
        return Err(DragError::domain(format!(
            "pusher normal force must be strictly positive, got {normal_force}"
        )));
    }

    let total_load = params.weight_force + normal_force;
    let ground_bound = params.mu_ground * total_load;
    let a_cop = inv_square_diag(Vector3::new(
        ground_bound,
        ground_bound,
        geometry.eq_radius_object * params.c_o * ground_bound,
    ));

    // Added pusher load shifts the ground pressure center toward the
    // contact; s -> 0 as Hw -> 0 and saturates below 1.
    let s = 1.0 - (params.c_p * normal_force / params.weight_force + 1.0).powf(-params.delta);
    let shift = jacobian(-s * q_rel.x, -s * q_rel.y);
    let a = shift * a_cop * shift.transpose();

    let contact_bound = params.mu_contact * normal_force;
    let b = inv_square_diag(Vector3::new(
        contact_bound,
        contact_bound,
        geometry.eq_radius_pusher * params.c_o * contact_bound,
    ));

    Ok((a, b))
}
