//! Scene configuration for the simulation runner.
//!
//! Parsing stays in the CLI; the core library only sees validated value
//! structs. Angles are given in degrees in the file and converted here,
//! matching the units a scene author works in.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use dragsim::prelude::*;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SceneConfig {
    pub friction: FrictionConfig,
    pub object: ObjectConfig,
    pub pusher: PusherConfig,
    pub simulation: SimulationConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FrictionConfig {
    pub mu_ground: f64,
    pub mu_contact: f64,
    /// Object mass in kilograms; the weight force uses `gravity` below.
    pub mass: f64,
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    pub c_o: f64,
    pub c_p: f64,
    pub delta: f64,
}

fn default_gravity() -> f64 {
    9.8
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ObjectConfig {
    pub position: [f64; 2],
    /// Initial heading in degrees.
    pub rotation: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PusherConfig {
    pub position: [f64; 2],
    /// Initial heading in degrees.
    pub rotation: f64,
    pub contact_radius: f64,
    pub contact_force: f64,
    /// Commanded body twist `(vx, vy, omega)` held for the whole run.
    pub velocity: [f64; 3],
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub steps: usize,
    pub dt: f64,
    /// Sweep speed for the candidate sampler.
    pub unit_speed: f64,
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing scene config {}", path.display()))?;
        Ok(config)
    }

    pub fn friction_params(&self) -> FrictionParams {
        FrictionParams {
            mu_ground: self.friction.mu_ground,
            mu_contact: self.friction.mu_contact,
            weight_force: self.friction.mass * self.friction.gravity,
            c_o: self.friction.c_o,
            c_p: self.friction.c_p,
            delta: self.friction.delta,
        }
    }

    pub fn contact_geometry(&self) -> Result<ContactGeometry> {
        let geometry = ContactGeometry::from_footprint(
            self.object.width,
            self.object.height,
            self.pusher.contact_radius,
        )?;
        Ok(geometry)
    }

    pub fn initial_object(&self) -> ObjectState {
        ObjectState {
            pose: Vec3::new(
                self.object.position[0],
                self.object.position[1],
                self.object.rotation.to_radians(),
            ),
        }
    }

    pub fn initial_pusher(&self) -> PusherState {
        PusherState {
            pose: Vec3::new(
                self.pusher.position[0],
                self.pusher.position[1],
                self.pusher.rotation.to_radians(),
            ),
            velocity: Vec3::new(
                self.pusher.velocity[0],
                self.pusher.velocity[1],
                self.pusher.velocity[2],
            ),
            normal_force: self.pusher.contact_force,
        }
    }
}
