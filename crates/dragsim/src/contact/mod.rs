//! Quasi-static contact model for top-contact dragging.
//!
//! Purpose
//! - Build the two friction limit surfaces for the current relative pose,
//!   jointly diagonalize them, classify the contact regime, and resolve the
//!   pushed object's twist.
//!
//! Layout
//! - `types`: value structs, `ContactMode`, `DragError`.
//! - `limit_surface`: the `(A, B)` ellipsoid builder.
//! - `eigen`: generalized eigendecomposition for SPD pencils.
//! - `solver`: `ContactSolver::update`, classification/resolution on
//!   `Decomposition`, and the stateful `DragSession` fallback wrapper.
//! - `candidates`: the direction sweep feeding the external planner.

mod candidates;
mod eigen;
mod limit_surface;
mod solver;
mod types;

pub use candidates::{DIRECTION_COUNT, SLIP_TOLERANCE};
pub use eigen::generalized_eigh;
pub use limit_surface::limit_surfaces;
pub use solver::{ContactSolver, Decomposition, DragSession, ALPHA_BRACKET};
pub use types::{
    ContactGeometry, ContactMode, DragError, FrictionParams, ObjectState, PusherState,
};

#[cfg(test)]
mod tests;
