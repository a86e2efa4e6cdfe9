//! Kepler Two-Body Model
//!
//! Closed-form two-body ellipse, solved analytically per orbital plane.
//! Satellites within a plane share one solver and are staggered along
//! the ring by their fixed time offset, so the whole shell needs only
//! `planes` solvers. No perturbations: the geometry at time t is exact
//! for the ideal ellipse.

use nalgebra::Vector3;

use crate::{PositionModel, SatelliteSlot, ShellElements};

const TAU: f64 = 2.0 * std::f64::consts::PI;

/// One orbital plane's ellipse, oriented by RAAN and inclination with
/// argument of perigee fixed at zero.
#[derive(Debug, Clone, Copy)]
pub struct KeplerEllipse {
    semi_major_axis_m: f64,
    eccentricity: f64,
    period_s: f64,
    raan_rad: f64,
    inclination_rad: f64,
}

impl KeplerEllipse {
    pub fn new(
        semi_major_axis_m: f64,
        eccentricity: f64,
        period_s: f64,
        raan_deg: f64,
        inclination_deg: f64,
    ) -> Self {
        Self {
            semi_major_axis_m,
            eccentricity,
            period_s,
            raan_rad: raan_deg.to_radians(),
            inclination_rad: inclination_deg.to_radians(),
        }
    }

    /// ECI position in meters at `t_s` seconds past perigee.
    pub fn position_at(&self, t_s: f64) -> Vector3<f64> {
        let e = self.eccentricity;
        let mean_anomaly = (TAU * t_s / self.period_s).rem_euclid(TAU);
        let ecc_anomaly = solve_kepler(mean_anomaly, e);

        // True anomaly via the half-angle form, radius from the
        // eccentric anomaly.
        let true_anomaly = 2.0
            * ((1.0 + e).sqrt() * (ecc_anomaly / 2.0).sin())
                .atan2((1.0 - e).sqrt() * (ecc_anomaly / 2.0).cos());
        let r = self.semi_major_axis_m * (1.0 - e * ecc_anomaly.cos());

        // Perifocal -> ECI with argument of perigee 0.
        let (sin_u, cos_u) = true_anomaly.sin_cos();
        let (sin_raan, cos_raan) = self.raan_rad.sin_cos();
        let (sin_inc, cos_inc) = self.inclination_rad.sin_cos();

        Vector3::new(
            r * (cos_raan * cos_u - sin_raan * sin_u * cos_inc),
            r * (sin_raan * cos_u + cos_raan * sin_u * cos_inc),
            r * (sin_u * sin_inc),
        )
    }
}

/// Newton iteration on Kepler's equation M = E - e sin E.
fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    // High-eccentricity orbits converge better from E0 = π.
    let mut ecc_anomaly = if eccentricity < 0.8 {
        mean_anomaly
    } else {
        std::f64::consts::PI
    };
    for _ in 0..30 {
        let f = ecc_anomaly - eccentricity * ecc_anomaly.sin() - mean_anomaly;
        let step = f / (1.0 - eccentricity * ecc_anomaly.cos());
        ecc_anomaly -= step;
        if step.abs() < 1e-12 {
            break;
        }
    }
    ecc_anomaly
}

/// Analytic two-body model for a whole shell: one ellipse per plane,
/// evaluated at `t + time_offset` per satellite.
pub struct KeplerModel {
    planes: Vec<KeplerEllipse>,
}

impl KeplerModel {
    pub fn new(shell: &ShellElements) -> Self {
        let period_s = shell.period_s();
        let planes = (0..shell.planes)
            .map(|plane| {
                KeplerEllipse::new(
                    shell.semi_major_axis_m,
                    shell.eccentricity,
                    period_s,
                    shell.raan_deg(plane),
                    shell.inclination_deg,
                )
            })
            .collect();
        Self { planes }
    }
}

impl PositionModel for KeplerModel {
    fn position_at(&self, slot: &SatelliteSlot, t_seconds: f64) -> Vector3<f64> {
        self.planes[slot.plane as usize].position_at(t_seconds + slot.time_offset_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMA_550_KM: f64 = 6_928_137.0;

    fn circular_shell(planes: u32, nodes: u32) -> ShellElements {
        ShellElements {
            planes,
            nodes_per_plane: nodes,
            semi_major_axis_m: SMA_550_KM,
            eccentricity: 0.0,
            inclination_deg: 53.0,
            arc_of_ascending_nodes_deg: 360.0,
        }
    }

    fn slot(shell: &ShellElements, plane: u32, offset: u32) -> SatelliteSlot {
        SatelliteSlot {
            id: plane * shell.nodes_per_plane + offset,
            plane,
            offset,
            time_offset_s: shell.time_offset_s(offset),
        }
    }

    #[test]
    fn circular_orbit_radius_stays_at_semi_major_axis() {
        let shell = circular_shell(1, 4);
        let model = KeplerModel::new(&shell);
        let s = slot(&shell, 0, 0);
        for t in [0.0, 100.0, 1000.0, 4321.5, shell.period_s()] {
            let r = model.position_at(&s, t).norm();
            assert!((r - SMA_550_KM).abs() < 1.0, "|r| = {r} at t = {t}");
        }
    }

    #[test]
    fn antipodal_satellites_are_two_semi_major_axes_apart() {
        // Two satellites half a period apart in one plane, circular
        // orbit: their separation at t = 0 is the orbit diameter.
        let shell = circular_shell(1, 2);
        let model = KeplerModel::new(&shell);
        let p0 = model.position_at(&slot(&shell, 0, 0), 0.0);
        let p1 = model.position_at(&slot(&shell, 0, 1), 0.0);
        let d = (p0 - p1).norm();
        assert!((d - 2.0 * SMA_550_KM).abs() < 1.0, "distance {d}");
    }

    #[test]
    fn ring_spacing_is_symmetric_at_t0() {
        let shell = circular_shell(1, 4);
        let model = KeplerModel::new(&shell);
        let chord = 2.0 * SMA_550_KM * (std::f64::consts::PI / 4.0).sin();
        for offset in 0..4 {
            let a = model.position_at(&slot(&shell, 0, offset), 0.0);
            let b = model.position_at(&slot(&shell, 0, (offset + 1) % 4), 0.0);
            let d = (a - b).norm();
            assert!((d - chord).abs() < 1.0, "chord {d} vs {chord}");
        }
    }

    #[test]
    fn position_is_periodic() {
        let shell = circular_shell(3, 5);
        let model = KeplerModel::new(&shell);
        let s = slot(&shell, 2, 3);
        let p0 = model.position_at(&s, 123.0);
        let p1 = model.position_at(&s, 123.0 + shell.period_s());
        assert!((p0 - p1).norm() < 1e-3);
    }

    #[test]
    fn eccentric_orbit_respects_apsides() {
        let mut shell = circular_shell(1, 1);
        shell.eccentricity = 0.3;
        let ellipse = KeplerEllipse::new(
            shell.semi_major_axis_m,
            shell.eccentricity,
            shell.period_s(),
            0.0,
            shell.inclination_deg,
        );
        let perigee = ellipse.position_at(0.0).norm();
        let apogee = ellipse.position_at(shell.period_s() / 2.0).norm();
        assert!((perigee - SMA_550_KM * 0.7).abs() < 10.0, "perigee {perigee}");
        assert!((apogee - SMA_550_KM * 1.3).abs() < 10.0, "apogee {apogee}");
    }

    #[test]
    fn kepler_solver_handles_high_eccentricity() {
        let e = solve_kepler(1.0, 0.95);
        assert!((e - 0.95 * e.sin() - 1.0).abs() < 1e-9);
    }
}
