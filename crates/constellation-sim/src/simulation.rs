//! Constellation Simulation
//!
//! Composes the satellite state table, the +Grid link table and the
//! selected orbital model into one steppable unit. Shells share no
//! state: each `ConstellationSimulation` is a fully isolated value and
//! multiple shells can run in parallel processes or threads without
//! synchronization.

use orbital_models::{build_model, PositionModel};
use tracing::info;

use crate::config::ShellConfig;
use crate::geometry::update_link_geometry;
use crate::satellites::{SatelliteRecord, SatelliteStateTable};
use crate::topology::{build_plus_grid, required_capacity, LinkRecord, LinkTable};
use crate::Result;

pub struct ConstellationSimulation {
    config: ShellConfig,
    satellites: SatelliteStateTable,
    links: LinkTable,
    model: Box<dyn PositionModel>,
    min_clearance_m: f64,
    current_time_s: f64,
}

impl ConstellationSimulation {
    /// Build a shell: validate the configuration, construct the
    /// selected orbital model, preallocate both tables, build the
    /// static topology (fatal if capacity is short, before any
    /// stepping) and evaluate t = 0 so snapshots are immediately valid.
    pub fn new(config: ShellConfig) -> Result<Self> {
        config.validate()?;

        let shell = config.shell_elements();
        let model = build_model(config.motion_model, &shell, config.epoch)?;
        let satellites = SatelliteStateTable::new(&shell);

        let capacity = config.link_capacity.unwrap_or_else(|| {
            required_capacity(
                config.planes,
                config.nodes_per_plane,
                config.crosslink_interpolation,
            )
        });
        let mut links = LinkTable::with_capacity(capacity);
        let link_count = build_plus_grid(
            &mut links,
            config.planes,
            config.nodes_per_plane,
            config.crosslink_interpolation,
        )?;

        info!(
            shell = %config.name,
            satellites = satellites.len(),
            links = link_count,
            model = ?config.motion_model,
            "constellation shell constructed"
        );

        let min_clearance_m = config.min_clearance_m();
        let mut sim = Self {
            config,
            satellites,
            links,
            model,
            min_clearance_m,
            current_time_s: 0.0,
        };
        sim.set_time(0.0);
        Ok(sim)
    }

    /// Move the shell to simulation time `t` (seconds since epoch).
    ///
    /// Full recomputation, idempotent: all satellite positions first,
    /// then all link geometry. The position sweep completes before the
    /// link sweep starts, so links only ever read finalized positions.
    pub fn set_time(&mut self, t_seconds: f64) {
        self.current_time_s = t_seconds;
        self.satellites.update_positions(self.model.as_ref(), t_seconds);
        update_link_geometry(&mut self.links, &self.satellites, self.min_clearance_m);
    }

    pub fn current_time(&self) -> f64 {
        self.current_time_s
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Per-timestep link snapshot: one record per topology link, in
    /// build order.
    pub fn links(&self) -> &[LinkRecord] {
        self.links.links()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn satellites(&self) -> &[SatelliteRecord] {
        self.satellites.records()
    }
}
