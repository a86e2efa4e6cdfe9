//! Orbital Position Models
//!
//! Interchangeable orbital motion models for constellation shells: a
//! closed-form Kepler two-body ellipse solved per orbital plane, and a
//! perturbation-aware SGP4 propagator owned per satellite. Both produce
//! Earth-centered inertial positions in meters for a simulation time
//! measured in seconds since the shell epoch.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod elements;
pub mod kepler;
pub mod propagator;

pub use elements::ShellElements;
pub use kepler::KeplerModel;
pub use propagator::Sgp4Model;

#[derive(Error, Debug)]
pub enum OrbitalError {
    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),
    #[error("Invalid shell geometry: {0}")]
    InvalidShell(String),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;

/// Earth's standard gravitational parameter, m^3/s^2.
pub const MU_EARTH: f64 = 3.986004418e14;

/// Which motion model a shell runs. Selected once at construction,
/// never switched mid-run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MotionModel {
    /// Analytic two-body ellipse, one solver per orbital plane.
    Kepler,
    /// SGP4 propagation, one solver per satellite.
    Sgp4,
}

/// The per-satellite constants a motion model needs to place it.
///
/// `id` is dense and contiguous: `plane * nodes_per_plane + offset`.
/// `time_offset_s` staggers satellites evenly along their plane's ring
/// (`period / nodes_per_plane * offset`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SatelliteSlot {
    pub id: u32,
    pub plane: u32,
    pub offset: u32,
    pub time_offset_s: f64,
}

/// A stateless-per-call position function over the whole shell.
///
/// Implementations must be safe to evaluate concurrently for different
/// slots; the state table updates positions in parallel.
pub trait PositionModel: Send + Sync {
    /// ECI position in meters at `t_seconds` since the shell epoch.
    ///
    /// Never fails: a satellite whose elements could not be initialized
    /// (or whose propagation errors at `t`) reports the origin instead,
    /// so downstream distance sweeps keep running.
    fn position_at(&self, slot: &SatelliteSlot, t_seconds: f64) -> Vector3<f64>;
}

/// Build the selected model for a shell.
pub fn build_model(
    kind: MotionModel,
    shell: &ShellElements,
    epoch: DateTime<Utc>,
) -> Result<Box<dyn PositionModel>> {
    shell.validate()?;
    Ok(match kind {
        MotionModel::Kepler => Box::new(KeplerModel::new(shell)),
        MotionModel::Sgp4 => Box::new(Sgp4Model::new(shell, epoch)),
    })
}
