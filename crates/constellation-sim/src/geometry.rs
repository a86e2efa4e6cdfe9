//! Link Geometry Sweep
//!
//! Per-step recomputation of every link's distance, clearance height
//! and active status. This is the dominant per-step cost: a flat
//! parallel loop over the populated link prefix, reading finalized
//! satellite positions, writing only each iteration's own record, with
//! no per-iteration allocation.

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::satellites::SatelliteStateTable;
use crate::topology::LinkTable;

/// Recompute distance, height and active status for every populated
/// link. `min_clearance_m` is the spherical-Earth obstruction bound:
/// `max(r_equatorial, r_polar) + min_communications_altitude`.
///
/// Degenerate geometry is defined, never NaN: coincident endpoints
/// measure distance 0, height 0, inactive; endpoints collinear with
/// Earth's center span a zero-area triangle and go inactive the same
/// way.
pub fn update_link_geometry(
    links: &mut LinkTable,
    satellites: &SatelliteStateTable,
    min_clearance_m: f64,
) {
    let records = satellites.records();

    links.links_mut().par_iter_mut().for_each(|link| {
        let p1 = to_vector(records[link.node_1 as usize].position_m);
        let p2 = to_vector(records[link.node_2 as usize].position_m);

        // c is the link length; a and b anchor the triangle at the
        // Earth's center.
        let c = (p1 - p2).norm();
        link.distance = c as i64;

        if c == 0.0 {
            link.height = 0;
            link.active = false;
            return;
        }

        let a = p1.norm();
        let b = p2.norm();

        // Heron's formula; the radicand is clamped so collinear
        // endpoints produce a zero-height triangle instead of NaN.
        let s = (a + b + c) / 2.0;
        let area = (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt();
        let height = 2.0 * area / c;

        link.height = height as i64;
        link.active = height >= min_clearance_m;
    });
}

#[inline]
fn to_vector(position_m: [i64; 3]) -> Vector3<f64> {
    Vector3::new(position_m[0] as f64, position_m[1] as f64, position_m[2] as f64)
}
