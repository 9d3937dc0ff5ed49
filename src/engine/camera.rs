// Orbit camera with damped fleet framing.
//
// Camera model:
//   - A "target" point the camera looks at, in world space
//   - Yaw (horizontal rotation) and pitch (elevation) set by mouse drag
//   - Zoom by adjusting distance along the look vector (mouse wheel)
//   - fit_bounds() frames the whole placed fleet: it only moves the goal
//     target/distance; update() eases the live values toward the goals with
//     an exponential damping factor, so a fleet swap glides into frame
//     instead of snapping

use glam::{Mat4, Vec3};
use winit::event::MouseButton;

use super::bounds::Aabb;
use super::input::InputState;

/// Viewing distance used when there is nothing to frame.
const DEFAULT_DISTANCE: f32 = 120.0;

pub struct OrbitCamera {
    /// Point the camera looks at. Eased toward `goal_target` each frame.
    target: Vec3,
    /// Distance from target along the look direction. Eased toward
    /// `goal_distance` and clamped to [min_distance, max_distance].
    distance: f32,

    goal_target: Vec3,
    goal_distance: f32,

    pub min_distance: f32,
    pub max_distance: f32,

    /// Elevation angle in radians (0 = horizontal, PI/2 = straight down).
    pub pitch: f32,
    /// Horizontal rotation in radians (0 = looking along -Z axis).
    pub yaw: f32,

    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    /// Radians of orbit per pixel of mouse drag.
    pub orbit_speed: f32,
    /// Zoom change (fraction of current distance) per scroll line.
    pub zoom_speed: f32,
    /// Exponential easing rate toward the fit goals, per second.
    pub damping: f32,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: DEFAULT_DISTANCE,
            goal_target: Vec3::ZERO,
            goal_distance: DEFAULT_DISTANCE,
            min_distance: 5.0,
            max_distance: 600.0,
            pitch: 18.0_f32.to_radians(),
            yaw: 0.0,
            fov: 50.0_f32.to_radians(),
            near: 0.1,
            far: 2000.0,
            orbit_speed: 0.008,
            zoom_speed: 0.1,
            damping: 6.0,
        }
    }

    /// Frame the given fleet bounds: aim the goal target at the box centre
    /// and back the goal distance off until the bounding sphere fits the
    /// narrower of the vertical and horizontal fields of view.
    ///
    /// `None` (empty fleet) falls back to the default origin view. Only the
    /// goals move here; the visible transition happens in update().
    pub fn fit_bounds(&mut self, bounds: Option<Aabb>, aspect: f32) {
        match bounds {
            Some(b) => {
                let half_v = self.fov / 2.0;
                let half_h = ((half_v.tan() * aspect.max(0.1)).atan()).min(half_v);
                let fit = (b.radius() / half_h.sin().max(1e-3)).max(self.min_distance);
                // A big fleet pushes the zoom ceiling and the far plane out
                // with it, so the whole arrangement stays frameable no
                // matter how many ships are placed.
                self.max_distance = self.max_distance.max(fit);
                self.far = self.far.max(fit * 3.0);
                self.goal_target = b.center();
                self.goal_distance = fit;
            }
            None => {
                self.goal_target = Vec3::ZERO;
                self.goal_distance = DEFAULT_DISTANCE;
            }
        }
    }

    /// Apply input and ease toward the fit goals. Call once per frame.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        // Drag to orbit. Pitch stays off the poles so look_at stays stable.
        if input.is_button_held(MouseButton::Left) {
            let (dx, dy) = input.mouse_delta;
            self.yaw -= dx * self.orbit_speed;
            self.pitch = (self.pitch + dy * self.orbit_speed)
                .clamp(0.05, std::f32::consts::FRAC_PI_2 - 0.05);
        }

        // Scroll up zooms in. Manual zoom retargets the goal so the fit
        // easing does not fight the user.
        if input.scroll_delta != 0.0 {
            self.goal_distance = (self.goal_distance
                * (1.0 - input.scroll_delta * self.zoom_speed))
                .clamp(self.min_distance, self.max_distance);
        }

        // Exponential ease toward the goals; frame-rate independent.
        let t = 1.0 - (-self.damping * dt.max(0.0)).exp();
        self.target += (self.goal_target - self.target) * t;
        self.distance += (self.goal_distance - self.distance) * t;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    /// World-space position of the camera eye.
    pub fn camera_position(&self) -> Vec3 {
        self.target + self.eye_offset()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.camera_position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    // Offset from target to camera eye based on pitch, yaw, and distance.
    fn eye_offset(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos() * self.distance,
            self.pitch.sin() * self.distance,
            self.yaw.cos() * self.pitch.cos() * self.distance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fit_targets_default_view() {
        let mut camera = OrbitCamera::new();
        camera.fit_bounds(None, 16.0 / 9.0);
        assert_eq!(camera.goal_target, Vec3::ZERO);
        assert_eq!(camera.goal_distance, DEFAULT_DISTANCE);
    }

    #[test]
    fn test_bigger_bounds_back_the_camera_off() {
        let mut camera = OrbitCamera::new();
        let small = Aabb {
            min: Vec3::splat(-5.0),
            max: Vec3::splat(5.0),
        };
        let big = Aabb {
            min: Vec3::splat(-80.0),
            max: Vec3::splat(80.0),
        };
        camera.fit_bounds(Some(small), 16.0 / 9.0);
        let near = camera.goal_distance;
        camera.fit_bounds(Some(big), 16.0 / 9.0);
        assert!(camera.goal_distance > near);
    }

    #[test]
    fn test_huge_fleets_raise_the_zoom_ceiling() {
        let mut camera = OrbitCamera::new();
        // A grid of several hundred ships spans far wider than the default
        // 600-unit zoom ceiling allows for.
        let bounds = Aabb {
            min: Vec3::new(-190.0, 0.0, -190.0),
            max: Vec3::new(190.0, 10.0, 190.0),
        };
        let aspect = 16.0_f32 / 9.0;
        camera.fit_bounds(Some(bounds), aspect);

        let half_v = camera.fov / 2.0;
        let half_h = (half_v.tan() * aspect).atan().min(half_v);
        let required = bounds.radius() / half_h.sin();
        assert!(
            camera.goal_distance >= required - 0.1,
            "fit goal {} sits short of the {} needed to frame the fleet",
            camera.goal_distance,
            required
        );
        assert!(camera.max_distance >= camera.goal_distance);
        assert!(camera.far > camera.goal_distance);
    }

    #[test]
    fn test_update_converges_on_the_fit_goal() {
        let mut camera = OrbitCamera::new();
        let input = InputState::new();
        let bounds = Aabb {
            min: Vec3::new(-30.0, 0.0, -30.0),
            max: Vec3::new(30.0, 10.0, 30.0),
        };
        camera.fit_bounds(Some(bounds), 16.0 / 9.0);
        // 120 frames at 60 fps is ample for damping = 6.
        for _ in 0..120 {
            camera.update(&input, 1.0 / 60.0);
        }
        assert!((camera.target() - camera.goal_target).length() < 0.01);
        assert!((camera.distance() - camera.goal_distance).abs() < 0.01);
    }

    #[test]
    fn test_off_centre_bounds_move_the_target() {
        let mut camera = OrbitCamera::new();
        let bounds = Aabb {
            min: Vec3::new(10.0, 0.0, 10.0),
            max: Vec3::new(30.0, 5.0, 30.0),
        };
        camera.fit_bounds(Some(bounds), 1.0);
        assert_eq!(camera.goal_target, Vec3::new(20.0, 2.5, 20.0));
    }
}
