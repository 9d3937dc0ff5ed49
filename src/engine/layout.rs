// Fleet layout: dimension normalization + grid placement.
//
// Raw hull dimensions span several orders of magnitude (20 m starters up to
// capital ships), so they are divided down to a legible render scale and
// clamped to a floor so every record stays a visible, non-degenerate box.
// Placement is a near-square grid centred on the origin, derived only from
// the fleet length and the record's index. Both steps are pure functions;
// the host recomputes them whenever the fleet changes.

use glam::Vec3;

use super::fleet::ShipRecord;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Metres of hull length / beam per render unit.
pub const LENGTH_UNIT: f32 = 30.0;
/// Metres of hull height per render unit.
pub const HEIGHT_UNIT: f32 = 10.0;
/// Minimum render scale on X and Z. Keeps zero / missing dimensions visible.
pub const MIN_SCALE_XZ: f32 = 0.5;
/// Minimum render scale on Y.
pub const MIN_SCALE_Y: f32 = 0.3;
/// Distance between neighbouring grid cells in render units.
///
/// Fixed regardless of per-ship scale. Known limitation: a ship whose
/// normalized footprint exceeds the spacing will visually overlap its
/// neighbours' cells; spacing is not auto-scaled to the fleet.
pub const SPACING: f32 = 20.0;

// ============================================================================
// DIMENSION NORMALIZER
// ============================================================================

/// Per-axis render scale for one ship's box.
///
/// `sx = max(0.5, length/30)`, `sy = max(0.3, height/10)`,
/// `sz = max(0.5, beam/30)`. Missing or non-numeric dimensions count as 0,
/// so the floor applies and the box never collapses to zero volume.
pub fn normalize_scale(ship: &ShipRecord) -> Vec3 {
    let dim = |d: Option<f64>| d.unwrap_or(0.0) as f32;
    Vec3::new(
        (dim(ship.length) / LENGTH_UNIT).max(MIN_SCALE_XZ),
        (dim(ship.height) / HEIGHT_UNIT).max(MIN_SCALE_Y),
        (dim(ship.beam) / LENGTH_UNIT).max(MIN_SCALE_XZ),
    )
}

// ============================================================================
// GRID LAYOUT PLANNER
// ============================================================================

/// Row/column shape of the placement grid. Derived solely from fleet length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPlan {
    pub columns: usize,
    pub rows: usize,
    pub spacing: f32,
}

impl LayoutPlan {
    /// Near-square grid for `count` ships: `columns = ceil(sqrt(max(count, 1)))`.
    /// A zero-length fleet still yields a 1x1 plan so downstream grid maths
    /// never divides by zero.
    pub fn for_fleet(count: usize) -> Self {
        let columns = (count.max(1) as f64).sqrt().ceil() as usize;
        let rows = count.div_ceil(columns).max(1);
        Self {
            columns,
            rows,
            spacing: SPACING,
        }
    }

    /// Ground-plane position of the ship at `index`.
    ///
    /// Row-major order; the `(columns - 1) / 2` offset centres the grid on
    /// the origin, so a single ship sits exactly at (0, 0, 0) and growing
    /// the fleet re-centres the arrangement instead of growing to one side.
    pub fn position(&self, index: usize) -> Vec3 {
        let row = index / self.columns;
        let col = index % self.columns;
        let x = (col as f32 - (self.columns as f32 - 1.0) / 2.0) * self.spacing;
        let z = (row as f32 - (self.rows as f32 - 1.0) / 2.0) * self.spacing;
        Vec3::new(x, 0.0, z)
    }
}

/// One ship ready for rendering: its record plus derived scale and position.
/// Recomputed wholesale on every fleet change, never persisted.
#[derive(Debug, Clone)]
pub struct PlacedShip {
    pub record: ShipRecord,
    pub scale: Vec3,
    pub position: Vec3,
}

/// Normalize and place every ship in the fleet. Deterministic: the same
/// fleet always yields the same placements, in the same order.
pub fn place_fleet(fleet: &[ShipRecord]) -> Vec<PlacedShip> {
    let plan = LayoutPlan::for_fleet(fleet.len());
    fleet
        .iter()
        .enumerate()
        .map(|(i, record)| PlacedShip {
            record: record.clone(),
            scale: normalize_scale(record),
            position: plan.position(i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ship(length: f64, beam: f64, height: f64) -> ShipRecord {
        ShipRecord {
            length: Some(length),
            beam: Some(beam),
            height: Some(height),
            ..ShipRecord::default()
        }
    }

    #[test]
    fn test_column_counts() {
        let expected = [(0, 1), (1, 1), (2, 2), (3, 2), (4, 2), (5, 3), (10, 4)];
        for (count, columns) in expected {
            assert_eq!(
                LayoutPlan::for_fleet(count).columns,
                columns,
                "columns for fleet of {}",
                count
            );
        }
    }

    #[test]
    fn test_every_index_gets_a_unique_cell() {
        for count in [0, 1, 2, 3, 5, 7, 10, 16, 23] {
            let plan = LayoutPlan::for_fleet(count);
            let mut cells = HashSet::new();
            for i in 0..count {
                let (row, col) = (i / plan.columns, i % plan.columns);
                assert!(row < plan.rows && col < plan.columns);
                assert!(cells.insert((row, col)), "duplicate cell for index {}", i);
            }
            assert_eq!(cells.len(), count);
        }
    }

    #[test]
    fn test_single_ship_sits_at_origin() {
        let placed = place_fleet(&[ship(10.0, 10.0, 10.0)]);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].position, Vec3::ZERO);
    }

    #[test]
    fn test_complete_grids_are_centred_on_origin() {
        for count in [1, 4, 9, 16, 25] {
            let plan = LayoutPlan::for_fleet(count);
            let (mut sum_x, mut sum_z) = (0.0f32, 0.0f32);
            for i in 0..count {
                let p = plan.position(i);
                sum_x += p.x;
                sum_z += p.z;
                assert_eq!(p.y, 0.0);
            }
            assert!((sum_x / count as f32).abs() < 1e-4);
            assert!((sum_z / count as f32).abs() < 1e-4);
        }
    }

    #[test]
    fn test_spacing_between_neighbours() {
        let plan = LayoutPlan::for_fleet(4);
        assert_eq!(plan.position(1).x - plan.position(0).x, SPACING);
        assert_eq!(plan.position(2).z - plan.position(0).z, SPACING);
    }

    #[test]
    fn test_normalize_scale_is_pure() {
        let s = ship(126.0, 76.0, 30.0);
        let a = normalize_scale(&s);
        let b = normalize_scale(&s);
        assert_eq!(a, b);
        assert_eq!(a, Vec3::new(126.0 / 30.0, 3.0, 76.0 / 30.0));
    }

    #[test]
    fn test_normalize_scale_floor_invariant() {
        let cases = [
            ship(0.0, 0.0, 0.0),
            ship(1.0, 1.0, 1.0),
            ShipRecord::default(), // all dimensions missing
        ];
        for s in &cases {
            let scale = normalize_scale(s);
            assert!(scale.x >= MIN_SCALE_XZ);
            assert!(scale.y >= MIN_SCALE_Y);
            assert!(scale.z >= MIN_SCALE_XZ);
        }
    }

    #[test]
    fn test_empty_fleet_places_nothing() {
        assert!(place_fleet(&[]).is_empty());
    }
}
