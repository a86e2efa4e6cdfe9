//! Satellite State Table
//!
//! Fixed-size table of satellite records, allocated once per shell and
//! mutated in place every step by the active orbital model. Record `i`
//! is satellite id `i` (dense, `plane * nodes_per_plane + offset`).
//!
//! Positions are fixed-precision integer meters (i64), truncated toward
//! zero from the model's floating-point output so downstream distance
//! sweeps are reproducible bit for bit.

use orbital_models::{PositionModel, SatelliteSlot, ShellElements};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SatelliteRecord {
    pub slot: SatelliteSlot,
    /// ECI position in meters at the table's current time.
    pub position_m: [i64; 3],
}

pub struct SatelliteStateTable {
    records: Vec<SatelliteRecord>,
}

impl SatelliteStateTable {
    /// Lay out the shell's satellites in id order with their fixed
    /// per-slot phase offsets. Positions start at the origin until the
    /// first `update_positions`.
    pub fn new(shell: &ShellElements) -> Self {
        let mut records = Vec::with_capacity(shell.total_satellites() as usize);
        for plane in 0..shell.planes {
            for offset in 0..shell.nodes_per_plane {
                records.push(SatelliteRecord {
                    slot: SatelliteSlot {
                        id: plane * shell.nodes_per_plane + offset,
                        plane,
                        offset,
                        time_offset_s: shell.time_offset_s(offset),
                    },
                    position_m: [0, 0, 0],
                });
            }
        }
        Self { records }
    }

    /// Recompute every position for time `t`. Parallel over satellites;
    /// each worker writes only its own record.
    pub fn update_positions(&mut self, model: &dyn PositionModel, t_seconds: f64) {
        self.records.par_iter_mut().for_each(|record| {
            let p = model.position_at(&record.slot, t_seconds);
            record.position_m = [p.x as i64, p.y as i64, p.z as i64];
        });
    }

    pub fn records(&self) -> &[SatelliteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
