//! Derived Orbital Elements
//!
//! Everything both motion models derive from a shell's configured
//! geometry: the two-body period, per-plane RAAN offsets, per-slot
//! phase offsets, and the synthetic two-line element sets that seed
//! the SGP4 solver arena.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::{OrbitalError, Result, MU_EARTH};

/// Shell-wide orbital geometry shared by every satellite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellElements {
    pub planes: u32,
    pub nodes_per_plane: u32,
    /// Semi-major axis in meters (orbital radius for circular orbits).
    pub semi_major_axis_m: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    /// Arc over which ascending nodes are evenly spaced. 360 for a full
    /// shell, 180 for a Pi constellation like Iridium.
    pub arc_of_ascending_nodes_deg: f64,
}

impl ShellElements {
    pub fn validate(&self) -> Result<()> {
        if self.planes == 0 || self.nodes_per_plane == 0 {
            return Err(OrbitalError::InvalidShell(format!(
                "need at least one plane and one node per plane, got {}x{}",
                self.planes, self.nodes_per_plane
            )));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitalError::InvalidElements(format!(
                "eccentricity {} outside [0, 1)",
                self.eccentricity
            )));
        }
        if self.semi_major_axis_m <= 0.0 {
            return Err(OrbitalError::InvalidElements(format!(
                "semi-major axis {} m is not positive",
                self.semi_major_axis_m
            )));
        }
        Ok(())
    }

    pub fn total_satellites(&self) -> u32 {
        self.planes * self.nodes_per_plane
    }

    /// Two-body orbital period: T = 2π sqrt(a³/μ), seconds.
    pub fn period_s(&self) -> f64 {
        2.0 * std::f64::consts::PI
            * (self.semi_major_axis_m.powi(3) / MU_EARTH).sqrt()
    }

    /// Mean motion in revolutions per day.
    pub fn mean_motion_rev_day(&self) -> f64 {
        86_400.0 / self.period_s()
    }

    /// RAAN of plane `p`, degrees: ascending nodes evenly spaced over
    /// the configured arc.
    pub fn raan_deg(&self, plane: u32) -> f64 {
        self.arc_of_ascending_nodes_deg / self.planes as f64 * plane as f64
    }

    /// Kepler phase offset of slot `offset` within its plane, seconds.
    /// Spaces satellites evenly along the ring at t = 0.
    pub fn time_offset_s(&self, offset: u32) -> f64 {
        self.period_s() / self.nodes_per_plane as f64 * offset as f64
    }

    /// Mean anomaly of slot `offset`, degrees, as seeded into SGP4.
    pub fn mean_anomaly_deg(&self, offset: u32) -> f64 {
        let base = offset as f64 * (360.0 / self.nodes_per_plane as f64);
        (base + self.time_offset_s(offset) / self.period_s()).rem_euclid(360.0)
    }
}

/// One satellite's element set as written into a synthetic TLE.
#[derive(Debug, Clone, Copy)]
pub struct TleElements {
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub eccentricity: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion_rev_day: f64,
}

/// Format a checksummed two-line element set at `epoch`. Drag terms are
/// zeroed: the simulated shells carry no ballistic history.
pub fn generate_tle_lines(
    catalog_number: u32,
    elements: &TleElements,
    epoch: DateTime<Utc>,
) -> (String, String) {
    // Epoch field: YYDDD.DDDDDDDD (2-digit year, fractional day of year)
    let year = epoch.format("%y").to_string().parse::<u32>().unwrap_or(24);
    let day_of_year = epoch.ordinal() as f64
        + (epoch.hour() as f64 / 24.0)
        + (epoch.minute() as f64 / 1440.0)
        + (epoch.second() as f64 / 86400.0);

    let line1_base = format!(
        "1 {:05}U 24001A   {:02}{:012.8} -.00000000  00000-0  00000-0 0  999",
        catalog_number, year, day_of_year
    );
    let line1 = format!("{}{}", line1_base, checksum_digit(&line1_base));

    // Eccentricity is written as 7 digits with an implied leading decimal.
    let ecc_str = format!("{:07}", (elements.eccentricity * 10_000_000.0) as u32);

    let line2_base = format!(
        "2 {:05} {:8.4} {:8.4} {} {:8.4} {:8.4} {:11.8}{:05}",
        catalog_number,
        elements.inclination_deg,
        elements.raan_deg,
        ecc_str,
        elements.arg_perigee_deg,
        elements.mean_anomaly_deg,
        elements.mean_motion_rev_day,
        0 // revolution number at epoch
    );
    let line2 = format!("{}{}", line2_base, checksum_digit(&line2_base));

    (line1, line2)
}

/// Standard TLE checksum: digits sum at face value, '-' counts 1.
fn checksum_digit(line: &str) -> u32 {
    let sum: u32 = line
        .chars()
        .map(|c| match c {
            '0'..='9' => c.to_digit(10).unwrap(),
            '-' => 1,
            _ => 0,
        })
        .sum();
    sum % 10
}
