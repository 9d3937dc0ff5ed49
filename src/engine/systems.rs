// Fleet → ECS synchronisation.
//
// The fleet Vec is the single source of truth; ship entities are a derived
// view. On every fleet replacement the old entities are despawned and the
// whole arrangement is respawned from place_fleet(), so the world can never
// hold a stale or partially-updated layout.

use bevy_ecs::prelude::*;
use glam::Vec3;

use super::components::{BoxScale, NameTag, Tint, Transform};
use super::fleet::ShipRecord;
use super::layout::place_fleet;

/// Replace every ship entity in the world with the new fleet's placements.
pub fn rebuild_fleet(world: &mut World, fleet: &[ShipRecord]) {
    let mut query = world.query_filtered::<Entity, With<BoxScale>>();
    let stale: Vec<Entity> = query.iter(world).collect();
    for entity in stale {
        world.despawn(entity);
    }

    for placed in place_fleet(fleet) {
        world.spawn((
            Transform::from_position(placed.position),
            BoxScale {
                scale: placed.scale,
            },
            Tint::random(),
            NameTag {
                name: placed.record.ship_name,
                manufacturer: placed.record.manufacturer,
            },
        ));
    }
}

pub fn ship_count(world: &mut World) -> usize {
    world.query::<&BoxScale>().iter(world).count()
}

/// World-space anchor of each ship's floating label: just above the box top.
pub fn label_anchors(world: &mut World) -> Vec<(Vec3, NameTag)> {
    let mut query = world.query::<(&Transform, &BoxScale, &NameTag)>();
    query
        .iter(world)
        .map(|(transform, size, tag)| {
            let anchor = transform.position + Vec3::new(0.0, size.scale.y / 2.0 + 0.2, 0.0);
            (anchor, tag.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fleet::sample_fleet;

    #[test]
    fn test_rebuild_spawns_one_entity_per_ship() {
        let mut world = World::new();
        rebuild_fleet(&mut world, &sample_fleet());
        assert_eq!(ship_count(&mut world), 3);
    }

    #[test]
    fn test_rebuild_replaces_wholesale() {
        let mut world = World::new();
        rebuild_fleet(&mut world, &sample_fleet());
        rebuild_fleet(&mut world, &sample_fleet()[..1]);
        assert_eq!(ship_count(&mut world), 1);
        rebuild_fleet(&mut world, &[]);
        assert_eq!(ship_count(&mut world), 0);
    }

    #[test]
    fn test_label_anchors_sit_above_the_box() {
        let mut world = World::new();
        rebuild_fleet(&mut world, &sample_fleet()[..1]);
        let anchors = label_anchors(&mut world);
        assert_eq!(anchors.len(), 1);
        let (anchor, tag) = &anchors[0];
        assert_eq!(tag.name, "Carrack");
        // Carrack: sy = 30/10 = 3.0, so the label floats at 1.7.
        assert!((anchor.y - 1.7).abs() < 1e-5);
    }
}
