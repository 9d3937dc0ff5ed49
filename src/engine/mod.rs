// Engine module - fleet data, layout maths, camera and UI panel

pub mod bounds;
pub mod camera;
pub mod components;
pub mod fleet;
pub mod input;
pub mod layout;
pub mod panel;
pub mod systems;

// Re-export commonly used items
pub use components::*;
