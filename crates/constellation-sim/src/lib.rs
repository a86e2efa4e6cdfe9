//! Constellation Geometry Simulation
//!
//! Time-stepped simulator of a multi-plane satellite constellation's
//! geometry. Owns a fixed satellite state table and a fixed "+Grid"
//! inter-satellite link table; every `set_time` fully recomputes all
//! satellite positions under the selected orbital model, then every
//! link's distance, Earth-clearance height and active status.
//!
//! All tables are preallocated at construction; stepping never
//! allocates. Both per-step phases are flat parallel sweeps over
//! contiguous records.

use thiserror::Error;

pub mod config;
pub mod geometry;
pub mod satellites;
pub mod simulation;
pub mod topology;

pub use config::{presets, ShellConfig};
pub use orbital_models::MotionModel;
pub use satellites::{SatelliteRecord, SatelliteStateTable};
pub use simulation::ConstellationSimulation;
pub use topology::{LinkRecord, LinkTable};

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("link table capacity exceeded: topology needs {required} slots, capacity is {capacity}")]
    LinkCapacityExceeded { required: usize, capacity: usize },
    #[error("invalid shell configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Orbital(#[from] orbital_models::OrbitalError),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
