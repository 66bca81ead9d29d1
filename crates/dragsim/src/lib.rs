//! Quasi-static planar dragging: limit-surface contact model and velocity
//! resolution.
//!
//! Given a circular pusher pressed onto a rigid object resting on a
//! frictional plane, and a commanded pusher velocity, this crate predicts
//! the object velocity and the active contact regime (sticking, slipping,
//! or pivoting). The pipeline per tick:
//!
//! 1. build the ground and pusher limit surfaces for the current relative
//!    pose (`contact::limit_surface`),
//! 2. jointly diagonalize them via a generalized eigendecomposition of the
//!    SPD pencil `(B, A_dot)` (`contact::eigen`),
//! 3. classify the regime from eigenvalue invariants and resolve the object
//!    twist, with a bracketed root-find in the pivoting regime
//!    (`contact::solver`, `rootfind`).
//!
//! The caller owns all mutable simulation state and integrates poses; the
//! core is pure per call apart from the documented last-good-velocity
//! fallback in [`contact::DragSession`].

pub mod contact;
pub mod kinematics;
pub mod rootfind;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::contact::{
        ContactGeometry, ContactMode, ContactSolver, Decomposition, DragError, DragSession,
        FrictionParams, ObjectState, PusherState,
    };
    pub use crate::kinematics::{contact_inside_footprint, eq_radius, jacobian, rotation};
    pub use nalgebra::{Matrix3 as Mat3, Vector3 as Vec3};
}
