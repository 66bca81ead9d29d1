//! Mode classification and velocity resolution.
//!
//! `ContactSolver::update` rebuilds the limit surfaces for the current
//! relative pose and jointly diagonalizes them; the resulting
//! [`Decomposition`] answers velocity queries: `classify` selects the
//! contact regime, `resolve` produces the object twist for it. Both are
//! pure per call. The only stateful piece is [`DragSession`], which caches
//! the last known-good velocity for the recoverable pivoting fallback.

use nalgebra::{Matrix3, Vector3};

use crate::kinematics::{jacobian, rotation};
use crate::rootfind::{brent, RootCfg};

use super::limit_surface::limit_surfaces;
use super::types::{
    ContactGeometry, ContactMode, DragError, FrictionParams, ObjectState, PusherState,
};

/// Search bracket for the pivoting load-redistribution parameter.
pub const ALPHA_BRACKET: (f64, f64) = (0.0, 100.0);

/// Immutable solver over one friction/geometry configuration.
#[derive(Clone, Copy, Debug)]
pub struct ContactSolver {
    params: FrictionParams,
    geometry: ContactGeometry,
}

impl ContactSolver {
    /// Validates the configuration up front; invalid physical parameters
    /// must halt before any decomposition is attempted.
    pub fn new(params: FrictionParams, geometry: ContactGeometry) -> Result<Self, DragError> {
        params.validate()?;
        geometry.validate()?;
        Ok(Self { params, geometry })
    }

    pub fn params(&self) -> &FrictionParams {
        &self.params
    }

    pub fn geometry(&self) -> &ContactGeometry {
        &self.geometry
    }

    /// Rebuild the limit surfaces for the current poses and jointly
    /// diagonalize them. Idempotent per call; the result is transient and
    /// valid until either pose or the normal force changes.
    pub fn update(
        &self,
        pusher: &PusherState,
        object: &ObjectState,
    ) -> Result<Decomposition, DragError> {
        let q_rel = rotation(-object.pose.z) * (pusher.pose - object.pose);
        let (a, b) = limit_surfaces(&self.params, &self.geometry, pusher.normal_force, q_rel)?;

        // Contact-transfer Jacobian expressed in the rotated relative frame.
        let g = rotation(q_rel.z).transpose() * jacobian(q_rel.x, q_rel.y);
        let g_inv = g
            .try_inverse()
            .ok_or_else(|| DragError::numerical("contact Jacobian is singular"))?;
        let a_dot = g * a * g.transpose();
        let a_dot_inv = a_dot
            .try_inverse()
            .ok_or_else(|| DragError::numerical("A_dot is singular"))?;

        let (lambda, phi) = super::eigen::generalized_eigh(&b, &a_dot)?;
        Ok(Decomposition {
            lambda,
            phi,
            g,
            g_inv,
            b,
            a_dot_inv,
            pusher_theta: pusher.pose.z,
            object_theta: object.pose.z,
        })
    }
}

/// Transient per-update result: the eigenbasis of the pencil `(B, A_dot)`
/// plus the factors velocity queries need. Never read before `update`.
#[derive(Clone, Copy, Debug)]
pub struct Decomposition {
    /// Pencil eigenvalues, ascending, strictly positive.
    pub lambda: Vector3<f64>,
    /// Eigenbasis with `Φᵀ·A_dot·Φ = I`.
    pub phi: Matrix3<f64>,
    /// Contact-transfer Jacobian `G` and its inverse.
    pub g: Matrix3<f64>,
    pub g_inv: Matrix3<f64>,
    /// Pusher limit surface.
    pub b: Matrix3<f64>,
    /// Inverse of `A_dot = G·A·Gᵀ`.
    pub a_dot_inv: Matrix3<f64>,
    /// Pusher heading at update time (world to pusher body frame).
    pub pusher_theta: f64,
    /// Object heading at update time (object body to world frame).
    pub object_theta: f64,
}

impl Decomposition {
    /// Commanded pusher twist expressed in the pusher body frame.
    #[inline]
    fn body_velocity(&self, q_h_dot: Vector3<f64>) -> Vector3<f64> {
        rotation(self.pusher_theta).transpose() * q_h_dot
    }

    /// Select the contact regime for a commanded pusher velocity.
    ///
    /// Total and deterministic: exactly one mode for any decomposition and
    /// velocity. With a nonzero command the quadratic-form tests run in the
    /// eigenbasis; boundary equality routes to Slipping.
    pub fn classify(&self, q_h_dot: Vector3<f64>) -> ContactMode {
        let v_h = self.body_velocity(q_h_dot);
        if v_h.norm() == 0.0 {
            if self.lambda.iter().all(|&l| l > 1.0) {
                return ContactMode::Sticking;
            }
            if self.lambda.iter().all(|&l| l < 1.0) {
                return ContactMode::Slipping;
            }
            return ContactMode::Pivoting;
        }
        let v_bar = self.phi.transpose() * v_h;
        let c = self.lambda.map(|l| l - 1.0);
        let sticking_form: f64 = (0..3).map(|i| c[i] * v_bar[i] * v_bar[i]).sum();
        if sticking_form < 0.0 {
            return ContactMode::Sticking;
        }
        let slipping_form: f64 = (0..3)
            .map(|i| c[i] * v_bar[i] * v_bar[i] / (self.lambda[i] * self.lambda[i]))
            .sum();
        if slipping_form >= 0.0 {
            ContactMode::Slipping
        } else {
            ContactMode::Pivoting
        }
    }

    /// Resolve the object twist for a classified regime, returned in the
    /// world frame.
    ///
    /// Pivoting solves `Σ Cᵢ·(v̄ᵢ/(α·λᵢ+1))² = 0` over [`ALPHA_BRACKET`];
    /// a bracket without sign change yields `DragError::RootNotFound`,
    /// which the caller (or [`DragSession`]) handles by retaining the last
    /// known-good velocity.
    pub fn resolve(
        &self,
        mode: ContactMode,
        q_h_dot: Vector3<f64>,
    ) -> Result<Vector3<f64>, DragError> {
        let v_h = self.body_velocity(q_h_dot);
        let v_o = match mode {
            ContactMode::Sticking => self.g_inv * v_h,
            ContactMode::Slipping => Vector3::zeros(),
            ContactMode::Pivoting => {
                let v_bar = self.phi.transpose() * v_h;
                let c = self.lambda.map(|l| l - 1.0);
                let lambda = self.lambda;
                let load_balance = |alpha: f64| -> f64 {
                    (0..3)
                        .map(|i| {
                            let scaled = v_bar[i] / (alpha * lambda[i] + 1.0);
                            c[i] * scaled * scaled
                        })
                        .sum()
                };
                let (lo, hi) = ALPHA_BRACKET;
                let alpha = brent(load_balance, lo, hi, RootCfg::default())
                    .ok_or(DragError::RootNotFound {
                        bracket: ALPHA_BRACKET,
                    })?;
                let coupling = (Matrix3::identity() + alpha * self.b * self.a_dot_inv)
                    .try_inverse()
                    .ok_or_else(|| {
                        DragError::numerical("pivoting coupling matrix is singular")
                    })?;
                self.g_inv * coupling * v_h
            }
        };
        Ok(rotation(self.object_theta) * v_o)
    }

    /// Classify and resolve in one call.
    pub fn object_velocity(
        &self,
        q_h_dot: Vector3<f64>,
    ) -> Result<(Vector3<f64>, ContactMode), DragError> {
        let mode = self.classify(q_h_dot);
        let velocity = self.resolve(mode, q_h_dot)?;
        Ok((velocity, mode))
    }
}

/// Thin stateful wrapper realizing the bounded-staleness fallback: on
/// `RootNotFound` the last known-good object velocity is returned unchanged
/// and a warning is emitted; the numeric core below stays pure.
#[derive(Clone, Debug)]
pub struct DragSession {
    solver: ContactSolver,
    last_velocity: Vector3<f64>,
}

impl DragSession {
    pub fn new(solver: ContactSolver) -> Self {
        Self {
            solver,
            last_velocity: Vector3::zeros(),
        }
    }

    pub fn solver(&self) -> &ContactSolver {
        &self.solver
    }

    pub fn last_velocity(&self) -> Vector3<f64> {
        self.last_velocity
    }

    /// Run the full pipeline for one tick. Domain and Numerical errors
    /// propagate (fatal); RootNotFound is absorbed here and never escapes.
    pub fn step(
        &mut self,
        pusher: &PusherState,
        object: &ObjectState,
    ) -> Result<(Vector3<f64>, ContactMode), DragError> {
        let decomposition = self.solver.update(pusher, object)?;
        self.resolve_with(&decomposition, pusher.velocity)
    }

    /// Classify and resolve against an externally produced decomposition,
    /// applying the last-good-velocity policy on a missing pivot bracket.
    pub fn resolve_with(
        &mut self,
        decomposition: &Decomposition,
        q_h_dot: Vector3<f64>,
    ) -> Result<(Vector3<f64>, ContactMode), DragError> {
        let mode = decomposition.classify(q_h_dot);
        match decomposition.resolve(mode, q_h_dot) {
            Ok(velocity) => {
                self.last_velocity = velocity;
                Ok((velocity, mode))
            }
            Err(DragError::RootNotFound { bracket }) => {
                tracing::warn!(
                    ?bracket,
                    "pivoting root not bracketed; retaining previous object velocity"
                );
                Ok((self.last_velocity, mode))
            }
            Err(fatal) => Err(fatal),
        }
    }
}
