// ECS components for placed fleet entities.
// One entity per ship; all of them are respawned wholesale on fleet change.

use bevy_ecs::prelude::*;
use glam::Vec3;

/// Position of an entity in 3D space
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }
}

/// Per-axis render scale of a ship's box (the normalized hull dimensions).
#[derive(Component, Debug, Clone, Copy)]
pub struct BoxScale {
    pub scale: Vec3,
}

/// RGB tint for rendering
#[derive(Component, Debug, Clone, Copy)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Tint {
    /// Muted random hull colour so neighbouring boxes stay distinguishable.
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        Self {
            r: rng.gen_range(0.35..0.75),
            g: rng.gen_range(0.35..0.75),
            b: rng.gen_range(0.45..0.85),
        }
    }
}

/// Label text floated above a ship's box.
#[derive(Component, Debug, Clone)]
pub struct NameTag {
    pub name: String,
    pub manufacturer: String,
}
