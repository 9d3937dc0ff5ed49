// Axis-aligned bounds over the placed fleet.
//
// The camera fit works from a single Aabb grown over every placed box, so
// framing cost is independent of how the boxes got there. An empty fleet has
// no bounds; the camera falls back to its default view.

use glam::Vec3;

use super::layout::PlacedShip;

/// Extra height added above each box so floating name labels stay in frame.
const LABEL_HEADROOM: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Smallest box containing both corners of one placed ship.
    pub fn of_ship(ship: &PlacedShip) -> Self {
        let half = ship.scale / 2.0;
        Self {
            min: ship.position - half,
            max: ship.position + half + Vec3::new(0.0, LABEL_HEADROOM, 0.0),
        }
    }

    /// Grow to include `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    /// Radius of the bounding sphere around the box centre. This is what the
    /// camera fit frames against, so any box orientation stays in view.
    pub fn radius(&self) -> f32 {
        (self.max - self.min).length() / 2.0
    }
}

/// Bounds over the whole placed fleet, or None when it is empty.
pub fn fleet_bounds(placed: &[PlacedShip]) -> Option<Aabb> {
    placed
        .iter()
        .map(Aabb::of_ship)
        .reduce(Aabb::union)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fleet::ShipRecord;

    fn placed(position: Vec3, scale: Vec3) -> PlacedShip {
        PlacedShip {
            record: ShipRecord::default(),
            scale,
            position,
        }
    }

    #[test]
    fn test_empty_fleet_has_no_bounds() {
        assert!(fleet_bounds(&[]).is_none());
    }

    #[test]
    fn test_bounds_contain_every_corner() {
        let ships = [
            placed(Vec3::new(-20.0, 0.0, -20.0), Vec3::new(4.0, 3.0, 2.0)),
            placed(Vec3::new(20.0, 0.0, 20.0), Vec3::splat(1.0)),
        ];
        let bounds = fleet_bounds(&ships).unwrap();
        for ship in &ships {
            let half = ship.scale / 2.0;
            assert!(bounds.min.cmple(ship.position - half).all());
            assert!(bounds.max.cmpge(ship.position + half).all());
        }
    }

    #[test]
    fn test_single_ship_centre_and_radius() {
        let bounds = fleet_bounds(&[placed(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0))]).unwrap();
        assert_eq!(bounds.center().x, 0.0);
        assert_eq!(bounds.center().z, 0.0);
        assert!(bounds.radius() > 0.0);
    }
}
