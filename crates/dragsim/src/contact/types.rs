//! Value types and errors for the contact pipeline.
//!
//! States are plain `Copy` structs; the simulation loop owns them and the
//! core reads them per call. Nothing here retains references across calls.

use std::fmt;

use nalgebra::Vector3;

use crate::kinematics::eq_radius;

/// Immutable friction/pressure model parameters, loaded once per scene.
///
/// `mu_ground` acts at the object–ground interface, `mu_contact` at the
/// pusher–object interface. `c_o`, `c_p`, `delta` shape the pressure
/// distribution and its shift under pusher load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrictionParams {
    pub mu_ground: f64,
    pub mu_contact: f64,
    /// Object weight force `Ow` (mass times gravity), in newtons.
    pub weight_force: f64,
    pub c_o: f64,
    pub c_p: f64,
    pub delta: f64,
}

impl FrictionParams {
    /// All parameters must be strictly positive; friction coefficients stay
    /// in `(0, 1]` by convention of the physical model.
    pub fn validate(&self) -> Result<(), DragError> {
        let positive = [
            ("mu_ground", self.mu_ground),
            ("mu_contact", self.mu_contact),
            ("weight_force", self.weight_force),
            ("c_o", self.c_o),
            ("c_p", self.c_p),
            ("delta", self.delta),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(DragError::domain(format!(
                    "{name} must be strictly positive, got {value}"
                )));
            }
        }
        for (name, mu) in [("mu_ground", self.mu_ground), ("mu_contact", self.mu_contact)] {
            if mu > 1.0 {
                return Err(DragError::domain(format!(
                    "{name} must lie in (0, 1], got {mu}"
                )));
            }
        }
        Ok(())
    }
}

/// Fixed equivalent radii of the two contact patches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactGeometry {
    /// Radius of gyration of the object's ground-pressure footprint.
    pub eq_radius_object: f64,
    /// Equivalent radius of the pusher's contact patch.
    pub eq_radius_pusher: f64,
}

impl ContactGeometry {
    /// Derive the object radius from its rectangular footprint; the pusher
    /// patch radius is taken as given.
    pub fn from_footprint(width: f64, height: f64, pusher_radius: f64) -> Result<Self, DragError> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(DragError::domain(format!(
                "footprint dimensions must be strictly positive, got {width} x {height}"
            )));
        }
        let geometry = Self {
            eq_radius_object: eq_radius(width, height),
            eq_radius_pusher: pusher_radius,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> Result<(), DragError> {
        for (name, r) in [
            ("eq_radius_object", self.eq_radius_object),
            ("eq_radius_pusher", self.eq_radius_pusher),
        ] {
            if !(r > 0.0) || !r.is_finite() {
                return Err(DragError::domain(format!(
                    "{name} must be strictly positive, got {r}"
                )));
            }
        }
        Ok(())
    }
}

/// Pusher state for one tick: pose `(x, y, theta)`, commanded body twist
/// `(vx, vy, omega)`, and contact normal force `Hw`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PusherState {
    pub pose: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub normal_force: f64,
}

/// Pushed-object state for one tick. The caller integrates the pose from
/// the velocity this crate returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectState {
    pub pose: Vector3<f64>,
}

/// Contact regime, recomputed per velocity query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactMode {
    /// Zero relative velocity at the contact; the object follows rigidly.
    Sticking,
    /// The object stays put while the pusher slides against it.
    Slipping,
    /// The object partially follows, rotating about an instantaneous
    /// center; requires the load-redistribution root-find.
    Pivoting,
}

/// Error type shared by the contact pipeline.
///
/// `Domain` and `Numerical` are fatal (invalid configuration); `RootNotFound`
/// is recoverable and is absorbed by [`super::DragSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum DragError {
    /// Physically invalid parameters (non-positive force, weight, radius).
    Domain { reason: String },
    /// The SPD assumptions of the eigendecomposition failed numerically.
    Numerical { reason: String },
    /// The pivoting equation has no sign change over the search bracket.
    RootNotFound { bracket: (f64, f64) },
}

impl DragError {
    pub(crate) fn domain(reason: impl Into<String>) -> Self {
        Self::Domain {
            reason: reason.into(),
        }
    }

    pub(crate) fn numerical(reason: impl Into<String>) -> Self {
        Self::Numerical {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain { reason } => write!(f, "invalid physical parameters: {reason}"),
            Self::Numerical { reason } => write!(f, "numerical failure: {reason}"),
            Self::RootNotFound { bracket } => write!(
                f,
                "pivoting root not bracketed in [{}, {}]",
                bracket.0, bracket.1
            ),
        }
    }
}

impl std::error::Error for DragError {}
