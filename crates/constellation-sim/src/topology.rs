//! +Grid Link Topology
//!
//! Static inter-satellite link table for the "+Grid" pattern: every
//! satellite links to its ring neighbors within its plane, and (subject
//! to stride sparsification) to the same-offset satellite in the next
//! plane. Node pairs are fixed at build time; only distance, height and
//! active status change per step.
//!
//! The table is a preallocated arena with a checked insert: running out
//! of capacity is a fatal configuration error, never a silent
//! truncation, and leaves zero usable links.

use serde::{Deserialize, Serialize};

use crate::{Result, SimulationError};

/// One inter-satellite link's endpoints and measured geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkRecord {
    pub node_1: u32,
    pub node_2: u32,
    /// Euclidean endpoint distance, meters.
    pub distance: i64,
    /// Closest approach of the link line to Earth's center, meters.
    pub height: i64,
    /// Whether the link clears the Earth plus the communications margin.
    pub active: bool,
}

/// Fixed-capacity link arena. `len` is set once at topology build.
pub struct LinkTable {
    entries: Vec<LinkRecord>,
    len: usize,
}

impl LinkTable {
    pub fn with_capacity(capacity: usize) -> Self {
        let zero = LinkRecord {
            node_1: 0,
            node_2: 0,
            distance: 0,
            height: 0,
            active: false,
        };
        Self {
            entries: vec![zero; capacity],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of populated links.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The populated prefix, in build order.
    pub fn links(&self) -> &[LinkRecord] {
        &self.entries[..self.len]
    }

    /// Mutable populated prefix; geometry updates write through this.
    pub(crate) fn links_mut(&mut self) -> &mut [LinkRecord] {
        &mut self.entries[..self.len]
    }

    fn checked_push(&mut self, node_1: u32, node_2: u32, required: usize) -> Result<()> {
        if self.len >= self.entries.len() {
            return Err(SimulationError::LinkCapacityExceeded {
                required,
                capacity: self.entries.len(),
            });
        }
        self.entries[self.len] = LinkRecord {
            node_1,
            node_2,
            distance: 0,
            height: 0,
            active: false,
        };
        self.len += 1;
        Ok(())
    }
}

/// Exact number of links the +Grid build will populate: one ring link
/// per satellite plus one cross link per satellite passing the stride
/// filter.
pub fn required_capacity(planes: u32, nodes_per_plane: u32, crosslink_interpolation: u32) -> usize {
    let total = (planes * nodes_per_plane) as usize;
    let ring = total;
    let cross = (0..total as u32)
        .filter(|id| (id + 1) % crosslink_interpolation == 0)
        .count();
    ring + cross
}

/// Populate `table` with the +Grid topology and return the link count.
///
/// Build order is fixed: all intra-plane ring links first (plane by
/// plane, wrapping last back to first), then all cross-plane links to
/// `(plane + 1) mod planes` at the same offset, filtered by
/// `(node_1 + 1) % crosslink_interpolation == 0`.
///
/// Capacity overflow is fatal: the table is reset to zero usable links
/// and the caller must treat the configuration as invalid.
pub fn build_plus_grid(
    table: &mut LinkTable,
    planes: u32,
    nodes_per_plane: u32,
    crosslink_interpolation: u32,
) -> Result<usize> {
    let required = required_capacity(planes, nodes_per_plane, crosslink_interpolation);
    table.len = 0;

    let result = (|| {
        // Intra-plane rings: consecutive offsets, wrap last -> first.
        for plane in 0..planes {
            for node in 0..nodes_per_plane {
                let node_1 = plane * nodes_per_plane + node;
                let node_2 = if node == nodes_per_plane - 1 {
                    plane * nodes_per_plane
                } else {
                    node_1 + 1
                };
                table.checked_push(node_1, node_2, required)?;
            }
        }

        // Cross-plane links to the adjacent plane, stride-sparsified.
        for plane in 0..planes {
            let plane2 = (plane + 1) % planes;
            for node in 0..nodes_per_plane {
                let node_1 = plane * nodes_per_plane + node;
                let node_2 = plane2 * nodes_per_plane + node;
                if (node_1 + 1) % crosslink_interpolation == 0 {
                    table.checked_push(node_1, node_2, required)?;
                }
            }
        }
        Ok(())
    })();

    if let Err(e) = result {
        // No partial topology is valid.
        table.len = 0;
        return Err(e);
    }

    Ok(table.len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn build(planes: u32, nodes: u32, stride: u32) -> LinkTable {
        let mut table = LinkTable::with_capacity(required_capacity(planes, nodes, stride));
        build_plus_grid(&mut table, planes, nodes, stride).unwrap();
        table
    }

    #[test]
    fn two_by_four_yields_sixteen_links() {
        let table = build(2, 4, 1);
        assert_eq!(table.len(), 16);

        // First 8 are the two rings, in plane-major order.
        let pairs: Vec<(u32, u32)> = table.links().iter().map(|l| (l.node_1, l.node_2)).collect();
        assert_eq!(
            &pairs[..8],
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 0),
                (4, 5),
                (5, 6),
                (6, 7),
                (7, 4)
            ]
        );
        // Then the cross links, wrapping plane 1 back to plane 0.
        assert_eq!(
            &pairs[8..],
            &[
                (0, 4),
                (1, 5),
                (2, 6),
                (3, 7),
                (4, 0),
                (5, 1),
                (6, 2),
                (7, 3)
            ]
        );
    }

    #[test]
    fn stride_two_halves_the_cross_links() {
        let table = build(2, 4, 2);
        // 8 ring links + crosslinks only where (id + 1) % 2 == 0.
        assert_eq!(table.len(), 8 + 4);
        let cross: Vec<u32> = table.links()[8..].iter().map(|l| l.node_1).collect();
        assert_eq!(cross, vec![1, 3, 5, 7]);
    }

    #[test]
    fn rebuild_is_deterministic() {
        let a = build(5, 7, 3);
        let b = build(5, 7, 3);
        assert_eq!(a.links(), b.links());
    }

    #[test]
    fn rebuilding_in_place_resets_the_count() {
        let mut table = LinkTable::with_capacity(required_capacity(3, 4, 1));
        let first = build_plus_grid(&mut table, 3, 4, 1).unwrap();
        let second = build_plus_grid(&mut table, 3, 4, 1).unwrap();
        assert_eq!(first, second);
        assert_eq!(table.len(), first);
    }

    #[test]
    fn capacity_one_short_fails_with_zero_links() {
        let required = required_capacity(2, 4, 1);
        let mut table = LinkTable::with_capacity(required - 1);
        let err = build_plus_grid(&mut table, 2, 4, 1);
        assert!(matches!(
            err,
            Err(SimulationError::LinkCapacityExceeded { required: 16, capacity: 15 })
        ));
        assert_eq!(table.len(), 0);
        assert!(table.links().is_empty());
    }

    proptest! {
        #[test]
        fn link_count_matches_the_closed_form(
            planes in 1u32..8,
            nodes in 1u32..12,
            stride in 1u32..5,
        ) {
            let required = required_capacity(planes, nodes, stride);
            let mut table = LinkTable::with_capacity(required);
            let count = build_plus_grid(&mut table, planes, nodes, stride).unwrap();

            let total = (planes * nodes) as usize;
            let passing = (1..=total as u32).filter(|n| n % stride == 0).count();
            prop_assert_eq!(count, total + passing);
            prop_assert_eq!(count, required);
        }

        #[test]
        fn endpoints_are_always_in_range(
            planes in 1u32..6,
            nodes in 1u32..10,
            stride in 1u32..4,
        ) {
            let table = build(planes, nodes, stride);
            let total = planes * nodes;
            for link in table.links() {
                prop_assert!(link.node_1 < total);
                prop_assert!(link.node_2 < total);
            }
        }
    }
}
