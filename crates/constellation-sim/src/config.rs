//! Shell Configuration
//!
//! Construction-time parameters for one constellation shell, plus the
//! published LEO shells used as presets. A shell is simulated as a
//! fully isolated unit; nothing here is shared across shells.

use chrono::{DateTime, Utc};
use orbital_models::{MotionModel, ShellElements};
use serde::{Deserialize, Serialize};

use crate::{Result, SimulationError};

/// Earth equatorial radius, meters (WGS84).
pub const EARTH_RADIUS_EQUATORIAL_M: f64 = 6_378_137.0;

/// Earth polar radius, meters (WGS84).
pub const EARTH_RADIUS_POLAR_M: f64 = 6_356_752.3;

/// Minimum altitude an ISL must clear above Earth's surface: the
/// thermosphere, below which the beam is considered obstructed.
pub const MIN_COMMS_ALTITUDE_M: f64 = 80_000.0;

/// One constellation shell's construction-time parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShellConfig {
    pub name: String,
    pub planes: u32,
    pub nodes_per_plane: u32,
    pub inclination_deg: f64,
    /// Semi-major axis in meters; the orbital radius for circular orbits.
    pub semi_major_axis_m: f64,
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default = "default_earth_radius_equatorial")]
    pub earth_radius_equatorial_m: f64,
    #[serde(default = "default_earth_radius_polar")]
    pub earth_radius_polar_m: f64,
    #[serde(default = "default_min_comms_altitude")]
    pub min_communications_altitude_m: f64,
    #[serde(default = "default_motion_model")]
    pub motion_model: MotionModel,
    #[serde(default = "default_arc_of_ascending_nodes")]
    pub arc_of_ascending_nodes_deg: f64,
    /// Stride sparsification for cross-plane links: only satellites
    /// whose global index + 1 divides evenly get a crosslink.
    #[serde(default = "default_crosslink_interpolation")]
    pub crosslink_interpolation: u32,
    /// Link table capacity. Defaults to the exact topology size.
    #[serde(default)]
    pub link_capacity: Option<usize>,
    #[serde(default = "default_epoch")]
    pub epoch: DateTime<Utc>,
}

fn default_earth_radius_equatorial() -> f64 {
    EARTH_RADIUS_EQUATORIAL_M
}

fn default_earth_radius_polar() -> f64 {
    EARTH_RADIUS_POLAR_M
}

fn default_min_comms_altitude() -> f64 {
    MIN_COMMS_ALTITUDE_M
}

fn default_motion_model() -> MotionModel {
    MotionModel::Sgp4
}

fn default_arc_of_ascending_nodes() -> f64 {
    360.0
}

fn default_crosslink_interpolation() -> u32 {
    1
}

fn default_epoch() -> DateTime<Utc> {
    // 2024-01-01T00:00:00Z
    DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default()
}

impl ShellConfig {
    /// A circular LEO shell at `altitude_km` above the equatorial
    /// radius, the way the published shell tables state them.
    pub fn leo(
        name: &str,
        planes: u32,
        nodes_per_plane: u32,
        altitude_km: f64,
        inclination_deg: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            planes,
            nodes_per_plane,
            inclination_deg,
            semi_major_axis_m: (altitude_km + EARTH_RADIUS_EQUATORIAL_M / 1000.0) * 1000.0,
            eccentricity: 0.0,
            earth_radius_equatorial_m: default_earth_radius_equatorial(),
            earth_radius_polar_m: default_earth_radius_polar(),
            min_communications_altitude_m: default_min_comms_altitude(),
            motion_model: default_motion_model(),
            arc_of_ascending_nodes_deg: default_arc_of_ascending_nodes(),
            crosslink_interpolation: default_crosslink_interpolation(),
            link_capacity: None,
            epoch: default_epoch(),
        }
    }

    pub fn total_satellites(&self) -> u32 {
        self.planes * self.nodes_per_plane
    }

    /// Conservative worst-case Earth obstruction bound: a link is
    /// active only if its closest approach to Earth's center clears
    /// the larger radius plus the communications margin.
    pub fn min_clearance_m(&self) -> f64 {
        self.earth_radius_equatorial_m.max(self.earth_radius_polar_m)
            + self.min_communications_altitude_m
    }

    /// The orbital geometry both motion models derive from.
    pub fn shell_elements(&self) -> ShellElements {
        ShellElements {
            planes: self.planes,
            nodes_per_plane: self.nodes_per_plane,
            semi_major_axis_m: self.semi_major_axis_m,
            eccentricity: self.eccentricity,
            inclination_deg: self.inclination_deg,
            arc_of_ascending_nodes_deg: self.arc_of_ascending_nodes_deg,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.planes == 0 || self.nodes_per_plane == 0 {
            return Err(SimulationError::InvalidConfig(format!(
                "shell {} needs at least one plane and one node per plane",
                self.name
            )));
        }
        if self.crosslink_interpolation == 0 {
            return Err(SimulationError::InvalidConfig(format!(
                "shell {}: crosslink interpolation stride must be >= 1",
                self.name
            )));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(SimulationError::InvalidConfig(format!(
                "shell {}: eccentricity {} outside [0, 1)",
                self.name, self.eccentricity
            )));
        }
        if self.semi_major_axis_m <= self.earth_radius_equatorial_m {
            return Err(SimulationError::InvalidConfig(format!(
                "shell {}: semi-major axis {} m is below the Earth's surface",
                self.name, self.semi_major_axis_m
            )));
        }
        Ok(())
    }
}

pub mod presets {
    //! Published LEO constellation shells.

    use super::ShellConfig;

    /// The shell configurations as filed: Starlink (st1-st5),
    /// Kuiper (ku1-ku3) and OneWeb (ow1-ow3).
    pub fn known_shells() -> Vec<ShellConfig> {
        vec![
            ShellConfig::leo("st1", 72, 22, 550.0, 53.0),
            ShellConfig::leo("st2", 72, 22, 540.0, 53.2),
            ShellConfig::leo("st3", 36, 20, 570.0, 70.0),
            ShellConfig::leo("st4", 6, 58, 560.0, 97.6),
            ShellConfig::leo("st5", 4, 43, 560.0, 97.6),
            ShellConfig::leo("ku1", 34, 34, 630.0, 51.9),
            ShellConfig::leo("ku2", 28, 28, 590.0, 33.0),
            ShellConfig::leo("ku3", 36, 36, 610.0, 42.0),
            ShellConfig::leo("ow1", 36, 49, 1200.0, 87.9),
            ShellConfig::leo("ow2", 32, 72, 1200.0, 40.0),
            ShellConfig::leo("ow3", 32, 72, 1200.0, 55.0),
        ]
    }
}
