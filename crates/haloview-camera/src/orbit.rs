//! Damped orbit camera controller: rotate, pan, and zoom around a target.

use glam::{Quat, Vec3};
use haloview_input::MouseState;
use haloview_render::Camera;
use winit::event::MouseButton;

/// Orbit/pan/zoom camera state with per-tick exponential damping.
///
/// User input moves the *goal* yaw/pitch/distance; [`update`](Self::update)
/// eases the applied values toward the goals each tick. The orbit target is
/// applied immediately through [`set_target`](Self::set_target); panning and
/// the fly-to animator both go through that one step, which is what keeps the
/// two writers consistent.
///
/// Pitch is unclamped: the camera may orbit over the poles freely. The camera
/// frame is built from yaw/pitch quaternions directly, so there is no
/// up-vector singularity to protect against.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    target: Vec3,
    goal_yaw: f32,
    goal_pitch: f32,
    goal_distance: f32,
    yaw: f32,
    pitch: f32,
    distance: f32,
    /// Fraction of the remaining goal delta applied per tick (0..=1).
    pub damping: f32,
    /// Radians of orbit per pixel of drag.
    pub orbit_sensitivity: f32,
    /// Pan speed in world units per pixel at unit distance.
    pub pan_sensitivity: f32,
    /// Zoom speed per scroll line.
    pub zoom_sensitivity: f32,
    /// Minimum zoom distance.
    pub min_distance: f32,
    /// Maximum zoom distance.
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            goal_yaw: 0.0,
            goal_pitch: -0.5,
            goal_distance: 100.0,
            yaw: 0.0,
            pitch: -0.5,
            distance: 100.0,
            damping: 0.1,
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.0012,
            zoom_sensitivity: 0.1,
            min_distance: 0.05,
            max_distance: 500.0,
        }
    }
}

impl OrbitCamera {
    /// Process one frame of mouse input: left drag orbits, right or middle
    /// drag pans in the camera plane, scroll zooms.
    pub fn handle_input(&mut self, mouse: &MouseState) {
        let delta = mouse.delta();

        if mouse.is_button_pressed(MouseButton::Left) && delta != glam::Vec2::ZERO {
            self.goal_yaw -= delta.x * self.orbit_sensitivity;
            self.goal_pitch -= delta.y * self.orbit_sensitivity;
        }

        let panning = mouse.is_button_pressed(MouseButton::Right)
            || mouse.is_button_pressed(MouseButton::Middle);
        if panning && delta != glam::Vec2::ZERO {
            // Pan in the camera plane, scaled by distance so screen-space
            // speed stays constant while zooming.
            let rotation = self.rotation();
            let right = rotation * Vec3::X;
            let up = rotation * Vec3::Y;
            let scale = self.pan_sensitivity * self.distance;
            let target = self.target + (-right * delta.x + up * delta.y) * scale;
            self.set_target(target);
        }

        let scroll = mouse.scroll();
        if scroll.abs() > f32::EPSILON {
            // Exponential zoom: each line scales distance by a fixed factor.
            self.goal_distance *= (-scroll * self.zoom_sensitivity).exp();
            self.goal_distance = self.goal_distance.clamp(self.min_distance, self.max_distance);
        }
    }

    /// Apply the orbit target. Panning and the fly-to animator both funnel
    /// through here; the controller itself never overwrites the target.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// The current orbit target.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Place the camera at an explicit world position by re-deriving the
    /// spherical state relative to the current target. Both goal and applied
    /// values snap, so damping does not fight an external driver.
    pub fn set_position(&mut self, position: Vec3) {
        let offset = position - self.target;
        let distance = offset.length();
        if distance > 1e-6 {
            // offset = d * (cos p sin y, -sin p, cos p cos y)
            let pitch = (-offset.y / distance).clamp(-1.0, 1.0).asin();
            let yaw = offset.x.atan2(offset.z);
            self.goal_yaw = yaw;
            self.goal_pitch = pitch;
            self.yaw = yaw;
            self.pitch = pitch;
        }
        let distance = distance.max(self.min_distance);
        self.goal_distance = distance;
        self.distance = distance;
    }

    /// Advance damping by one tick: ease applied yaw/pitch/distance toward
    /// their goals. Call exactly once per frame tick.
    pub fn update(&mut self) {
        let t = self.damping.clamp(0.0, 1.0);
        self.yaw += (self.goal_yaw - self.yaw) * t;
        self.pitch += (self.goal_pitch - self.pitch) * t;
        self.distance += (self.goal_distance - self.distance) * t;
    }

    /// Camera orientation: yaw about world Y, then pitch about camera X.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Camera world position derived from target and spherical state.
    pub fn position(&self) -> Vec3 {
        self.target + self.rotation() * Vec3::Z * self.distance
    }

    /// Applied zoom distance.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Applied pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Applied yaw in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Write position and orientation into the render camera. The camera
    /// forward axis points at the orbit target by construction.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.rotation = self.rotation();
    }
}
