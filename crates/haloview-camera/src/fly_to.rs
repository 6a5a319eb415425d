//! Fly-to animation: an explicit interpolation state machine that moves the
//! camera and orbit target to a selected halo in lockstep.
//!
//! No hidden animation registry: the active interpolation is a plain field
//! the animator owns, so supersession and teardown cancel it synchronously.

use glam::Vec3;

use crate::orbit::OrbitCamera;

/// Easing curves for camera transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EasingFunction {
    /// Constant speed, no acceleration.
    Linear,
    /// Slow start, fast end.
    EaseIn,
    /// Fast start, slow end.
    EaseOut,
    /// Slow start, fast middle, slow end.
    #[default]
    EaseInOut,
}

impl EasingFunction {
    /// Map a linear progress value (0.0..=1.0) to an eased value.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseIn => t * t,
            EasingFunction::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// One in-flight camera transition.
#[derive(Clone, Copy, Debug)]
pub struct FlyTo {
    /// Camera position at the start of the transition.
    pub from_position: Vec3,
    /// Camera position when the transition completes.
    pub to_position: Vec3,
    /// Orbit target at the start of the transition.
    pub from_target: Vec3,
    /// Orbit target when the transition completes (the halo position).
    pub to_target: Vec3,
    /// Seconds accumulated so far.
    pub elapsed: f32,
    /// Total duration in seconds.
    pub duration: f32,
    /// Easing curve applied to both position and target.
    pub easing: EasingFunction,
}

/// Drives fly-to transitions. Idle until [`start`](Self::start); a new start
/// supersedes any in-flight transition; [`cancel`](Self::cancel) drops it
/// immediately (teardown path).
#[derive(Clone, Debug)]
pub struct FlyToAnimator {
    active: Option<FlyTo>,
    /// Approach distance as a multiple of the target halo's outer radius.
    pub approach_scale: f32,
    /// Minimum approach distance in Mpc.
    pub approach_floor: f32,
    /// Transition duration in seconds.
    pub duration: f32,
}

impl FlyToAnimator {
    pub fn new(approach_scale: f32, approach_floor: f32, duration: f32) -> Self {
        Self {
            active: None,
            approach_scale,
            approach_floor,
            duration: duration.max(f32::EPSILON),
        }
    }

    /// Final camera distance from a halo with the given outer radius.
    pub fn approach_distance(&self, outer_radius: f32) -> f32 {
        (outer_radius * self.approach_scale).max(self.approach_floor)
    }

    /// Final camera position: backed off from the halo along the line toward
    /// the current camera position. A camera already at the halo falls back
    /// to approaching along +Z.
    pub fn end_position(&self, camera_position: Vec3, halo_position: Vec3, outer_radius: f32) -> Vec3 {
        let mut direction = (halo_position - camera_position).normalize_or_zero();
        if direction == Vec3::ZERO {
            direction = Vec3::Z;
        }
        halo_position - direction * self.approach_distance(outer_radius)
    }

    /// Begin a transition toward a halo, superseding any in-flight one.
    pub fn start(
        &mut self,
        camera_position: Vec3,
        current_target: Vec3,
        halo_position: Vec3,
        outer_radius: f32,
    ) {
        self.active = Some(FlyTo {
            from_position: camera_position,
            to_position: self.end_position(camera_position, halo_position, outer_radius),
            from_target: current_target,
            to_target: halo_position,
            elapsed: 0.0,
            duration: self.duration,
            easing: EasingFunction::EaseInOut,
        });
    }

    /// Drop any in-flight transition. Idempotent; called on supersession by
    /// deselection and on teardown before GPU resources are released.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Advance the transition by `dt` seconds, writing the interpolated
    /// target and position into the orbit controller. The target goes
    /// through the controller's own `set_target` step every frame so damped
    /// orbiting is consistent the moment the transition ends.
    pub fn advance(&mut self, dt: f32, orbit: &mut OrbitCamera) {
        let Some(anim) = &mut self.active else {
            return;
        };

        anim.elapsed += dt;
        if anim.elapsed >= anim.duration {
            // Complete: snap to the final state and return to Idle.
            orbit.set_target(anim.to_target);
            orbit.set_position(anim.to_position);
            self.active = None;
            return;
        }

        let t = anim.easing.apply(anim.elapsed / anim.duration);
        let target = anim.from_target.lerp(anim.to_target, t);
        let position = anim.from_position.lerp(anim.to_position, t);
        orbit.set_target(target);
        orbit.set_position(position);
    }
}

impl Default for FlyToAnimator {
    fn default() -> Self {
        Self::new(3.0, 0.5, 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run_to_completion(animator: &mut FlyToAnimator, orbit: &mut OrbitCamera) {
        let mut ticks = 0;
        while animator.is_animating() {
            animator.advance(DT, orbit);
            ticks += 1;
            assert!(ticks < 10_000, "animation failed to terminate");
        }
    }

    #[test]
    fn test_end_position_lies_on_camera_halo_line() {
        let animator = FlyToAnimator::new(3.0, 0.5, 2.0);
        let camera = Vec3::ZERO;
        let halo = Vec3::new(1.0, 0.0, 0.0);
        let end = animator.end_position(camera, halo, 0.1);

        // max(0.1 * 3.0, 0.5) = 0.5 back from the halo toward the camera.
        let from_halo = end - halo;
        assert!((from_halo.length() - 0.5).abs() < 1e-6);
        let back_toward_camera = (camera - halo).normalize();
        assert!(
            from_halo.normalize().dot(back_toward_camera) > 0.9999,
            "end position must lie on the line from the halo back toward the camera"
        );
    }

    #[test]
    fn test_approach_distance_floor_and_scale() {
        let animator = FlyToAnimator::new(3.0, 0.5, 2.0);
        // Small halo: the floor wins.
        assert_eq!(animator.approach_distance(0.1), 0.5);
        // Large halo: the scaled radius wins.
        assert_eq!(animator.approach_distance(2.0), 6.0);
    }

    #[test]
    fn test_completed_animation_frames_the_halo() {
        let mut orbit = OrbitCamera::default();
        orbit.set_target(Vec3::new(50.0, 0.0, 50.0));
        orbit.set_position(Vec3::new(50.0, 30.0, 80.0));

        let halo = Vec3::ZERO;
        let outer = 0.2;
        let mut animator = FlyToAnimator::new(3.0, 0.5, 2.0);
        animator.start(orbit.position(), orbit.target(), halo, outer);
        run_to_completion(&mut animator, &mut orbit);

        assert!(
            (orbit.target() - halo).length() < 1e-4,
            "orbit target should land on the halo, got {:?}",
            orbit.target()
        );
        let distance = (orbit.position() - halo).length();
        let expected = (outer * 3.0_f32).max(0.5);
        assert!(
            (distance - expected).abs() < 1e-3,
            "camera should settle {expected} Mpc from the halo, got {distance}"
        );
    }

    #[test]
    fn test_superseding_leaves_one_animation_ending_at_second_target() {
        let mut orbit = OrbitCamera::default();
        orbit.set_target(Vec3::ZERO);
        orbit.set_position(Vec3::new(0.0, 0.0, 20.0));

        let first = Vec3::new(10.0, 0.0, 0.0);
        let second = Vec3::new(-5.0, 3.0, 8.0);

        let mut animator = FlyToAnimator::new(3.0, 0.5, 2.0);
        animator.start(orbit.position(), orbit.target(), first, 0.3);
        for _ in 0..30 {
            animator.advance(DT, &mut orbit);
        }
        assert!(animator.is_animating());

        // Supersede mid-flight; exactly one interpolation remains.
        animator.start(orbit.position(), orbit.target(), second, 0.3);
        run_to_completion(&mut animator, &mut orbit);

        assert!(
            (orbit.target() - second).length() < 1e-4,
            "camera must end at the second target, not an average: {:?}",
            orbit.target()
        );
    }

    #[test]
    fn test_cancel_stops_immediately() {
        let mut orbit = OrbitCamera::default();
        let mut animator = FlyToAnimator::new(3.0, 0.5, 2.0);
        animator.start(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, Vec3::X, 0.1);
        animator.advance(DT, &mut orbit);
        assert!(animator.is_animating());

        animator.cancel();
        assert!(!animator.is_animating());

        // Advancing after cancel must not move the camera.
        let before = orbit.target();
        animator.advance(DT, &mut orbit);
        assert_eq!(orbit.target(), before);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut animator = FlyToAnimator::default();
        animator.cancel();
        animator.cancel();
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_camera_at_halo_position_still_produces_valid_end() {
        let animator = FlyToAnimator::new(3.0, 0.5, 2.0);
        let halo = Vec3::new(2.0, 2.0, 2.0);
        let end = animator.end_position(halo, halo, 0.1);
        assert!(end.is_finite());
        assert!(((end - halo).length() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_target_interpolates_monotonically_toward_halo() {
        let mut orbit = OrbitCamera::default();
        orbit.set_target(Vec3::ZERO);
        orbit.set_position(Vec3::new(0.0, 0.0, 20.0));
        let halo = Vec3::new(10.0, 0.0, 0.0);

        let mut animator = FlyToAnimator::new(3.0, 0.5, 2.0);
        animator.start(orbit.position(), orbit.target(), halo, 0.3);

        let mut prev = (orbit.target() - halo).length();
        while animator.is_animating() {
            animator.advance(DT, &mut orbit);
            let now = (orbit.target() - halo).length();
            assert!(
                now <= prev + 1e-4,
                "target distance to halo increased mid-flight: {prev} -> {now}"
            );
            prev = now;
        }
    }

    #[test]
    fn test_easing_endpoints_and_midpoint() {
        let easings = [
            EasingFunction::Linear,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
        ];
        for easing in &easings {
            assert!((easing.apply(0.0)).abs() < 1e-6, "{easing:?} at t=0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at t=1");
        }
        assert!((EasingFunction::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(EasingFunction::EaseIn.apply(0.25) < 0.25);
        assert!(EasingFunction::EaseOut.apply(0.75) > 0.75);
    }

    #[test]
    fn test_ease_in_out_starts_and_ends_slow() {
        let early = EasingFunction::EaseInOut.apply(0.1);
        let late = 1.0 - EasingFunction::EaseInOut.apply(0.9);
        assert!(early < 0.1, "ease-in-out should start slow, got {early}");
        assert!(late < 0.1, "ease-in-out should end slow, got {late}");
    }
}
