//! Simulation runner and candidate exporter for the dragging model.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use dragsim::prelude::*;

mod config;
use config::SceneConfig;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Quasi-static dragging simulation runner")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run the tick loop and write a JSON trajectory
    Simulate {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the sticky velocity candidate set for the initial poses
    Candidates {
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Simulate { config, out } => simulate(&config, &out),
        Action::Candidates { config } => candidates(&config),
    }
}

#[derive(Serialize)]
struct TrajectorySample {
    time: f64,
    pusher_pose: [f64; 3],
    object_pose: [f64; 3],
    object_velocity: [f64; 3],
    mode: Option<String>,
}

fn mode_name(mode: ContactMode) -> &'static str {
    match mode {
        ContactMode::Sticking => "sticking",
        ContactMode::Slipping => "slipping",
        ContactMode::Pivoting => "pivoting",
    }
}

fn as_array(v: Vec3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

fn simulate(config_path: &Path, out: &Path) -> Result<()> {
    let scene = SceneConfig::load(config_path)?;
    let solver = ContactSolver::new(scene.friction_params(), scene.contact_geometry()?)?;
    let mut session = DragSession::new(solver);

    let mut pusher = scene.initial_pusher();
    let mut object = scene.initial_object();
    let dt = scene.simulation.dt;

    let mut samples = Vec::with_capacity(scene.simulation.steps);
    for step in 0..scene.simulation.steps {
        // Only engage the contact model while the pusher patch stays inside
        // the object footprint; otherwise the object stays put this tick.
        let in_contact = contact_inside_footprint(
            pusher.pose,
            scene.pusher.contact_radius,
            object.pose,
            scene.object.width,
            scene.object.height,
        );
        let (velocity, mode) = if in_contact {
            let (v, mode) = session.step(&pusher, &object)?;
            (v, Some(mode))
        } else {
            (Vec3::zeros(), None)
        };

        samples.push(TrajectorySample {
            time: step as f64 * dt,
            pusher_pose: as_array(pusher.pose),
            object_pose: as_array(object.pose),
            object_velocity: as_array(velocity),
            mode: mode.map(|m| mode_name(m).to_string()),
        });

        // First-order pose integration, owned by the loop rather than the
        // contact core.
        pusher.pose += pusher.velocity * dt;
        object.pose += velocity * dt;
    }

    tracing::info!(
        steps = samples.len(),
        final_object_pose = ?samples.last().map(|s| s.object_pose),
        "simulate"
    );
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(&samples)?)
        .with_context(|| format!("writing trajectory {}", out.display()))?;
    Ok(())
}

fn candidates(config_path: &Path) -> Result<()> {
    let scene = SceneConfig::load(config_path)?;
    let solver = ContactSolver::new(scene.friction_params(), scene.contact_geometry()?)?;
    let pusher = scene.initial_pusher();
    let object = scene.initial_object();
    let decomposition = solver.update(&pusher, &object)?;
    let set: Vec<[f64; 3]> = decomposition
        .sticky_candidates(scene.simulation.unit_speed)
        .into_iter()
        .map(as_array)
        .collect();
    tracing::info!(count = set.len(), "candidates");
    println!("{}", serde_json::to_string_pretty(&set)?);
    Ok(())
}
