//! Candidate sampler: sweep commanded pusher directions and keep those with
//! near-rigid coupling.
//!
//! The retained velocity set is the interface artifact handed to the
//! external motion planner, which expands it into successor/edge templates.
//! Directions are independent pure evaluations; order among them carries no
//! meaning and the result is de-duplicated.

use nalgebra::Vector3;

use crate::kinematics::rotation;

use super::solver::Decomposition;
use super::types::DragError;

/// Number of commanded directions swept over `[0, 2π)`.
pub const DIRECTION_COUNT: usize = 20;
/// Near-rigid coupling threshold on the translational slip error.
pub const SLIP_TOLERANCE: f64 = 0.02;

/// Geometric de-duplication tolerance on candidate twists.
const DEDUP_EPS: f64 = 1e-9;

impl Decomposition {
    /// Sweep [`DIRECTION_COUNT`] commanded directions at speed `unit_speed`
    /// and retain each resolved object twist whose translational part tracks
    /// the command within [`SLIP_TOLERANCE`].
    ///
    /// The resolved twist is rotated by the planner's fixed +90° heading
    /// convention before the slip comparison (a literal frame constant, kept
    /// as-is). A pivoting direction whose root search fails falls back to
    /// the previously retained velocity of the sweep, starting from zero.
    pub fn sticky_candidates(&self, unit_speed: f64) -> Vec<Vector3<f64>> {
        let frame_correction = rotation(std::f64::consts::FRAC_PI_2).transpose();
        let step = std::f64::consts::PI / 10.0;
        let mut last = Vector3::zeros();
        let mut candidates: Vec<Vector3<f64>> = Vec::new();
        for k in 0..DIRECTION_COUNT {
            let theta = k as f64 * step;
            let q_h_dot = Vector3::new(
                unit_speed * theta.cos(),
                unit_speed * theta.sin(),
                0.0,
            );
            let mode = self.classify(q_h_dot);
            let velocity = match self.resolve(mode, q_h_dot) {
                Ok(v) => {
                    last = v;
                    v
                }
                Err(DragError::RootNotFound { .. }) => last,
                // Resolution of a valid decomposition cannot hit the fatal
                // variants; skip the direction if it somehow does.
                Err(_) => continue,
            };
            let corrected = frame_correction * velocity;
            let slip_error = (corrected.xy() - q_h_dot.xy()).norm();
            if slip_error < SLIP_TOLERANCE
                && !candidates
                    .iter()
                    .any(|c| (c - corrected).norm() < DEDUP_EPS)
            {
                candidates.push(corrected);
            }
        }
        candidates
    }
}
