//! The two-zone density profile law, as a pure function.
//!
//! This is the Rust mirror of the fragment math in
//! [`HALO_SHADER_SOURCE`](crate::halo_pipeline::HALO_SHADER_SOURCE): a halo is
//! fully opaque inside its core radius, fades linearly to zero at its outer
//! radius, and is discarded beyond it. Keeping the law testable on the CPU is
//! what makes the shader's behavior verifiable without a GPU.

/// Fraction of the outer radius where the boundary ring begins.
pub const RING_FRACTION: f32 = 0.98;

/// Opacity at physical radius `rho` for a halo with outer radius `outer` and
/// core radius `core`. Returns `None` where the fragment is discarded
/// (`rho > outer`).
///
/// The degenerate case `outer == core` is fully opaque everywhere inside
/// `outer` rather than dividing by zero.
pub fn profile_alpha(rho: f32, outer: f32, core: f32) -> Option<f32> {
    if rho > outer {
        return None;
    }
    if rho <= core {
        return Some(1.0);
    }
    let falloff_width = outer - core;
    if falloff_width <= f32::EPSILON * outer {
        return Some(1.0);
    }
    Some(((outer - rho) / falloff_width).clamp(0.0, 1.0))
}

/// Whether `rho` falls inside the thin boundary ring that marks the outer
/// radius on screen.
pub fn in_boundary_ring(rho: f32, outer: f32) -> bool {
    rho <= outer && rho >= outer * RING_FRACTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_opaque_at_core_radius() {
        let alpha = profile_alpha(0.1, 0.5, 0.1);
        assert_eq!(alpha, Some(1.0));
    }

    #[test]
    fn test_fully_opaque_inside_core() {
        for rho in [0.0, 0.02, 0.05, 0.099] {
            assert_eq!(
                profile_alpha(rho, 0.5, 0.1),
                Some(1.0),
                "rho={rho} inside the core must be opaque"
            );
        }
    }

    #[test]
    fn test_opacity_approaches_zero_at_outer_radius() {
        let outer = 0.5;
        let core = 0.1;
        let alpha = profile_alpha(outer - 1e-4, outer, core).unwrap();
        assert!(
            alpha < 0.001,
            "opacity just inside the outer radius should approach 0, got {alpha}"
        );
    }

    #[test]
    fn test_discarded_outside_outer_radius() {
        assert_eq!(profile_alpha(0.5001, 0.5, 0.1), None);
        assert_eq!(profile_alpha(10.0, 0.5, 0.1), None);
    }

    #[test]
    fn test_linear_falloff_midpoint() {
        // Halfway between core and outer the opacity is exactly one half.
        let alpha = profile_alpha(0.3, 0.5, 0.1).unwrap();
        assert!((alpha - 0.5).abs() < 1e-6, "expected 0.5, got {alpha}");
    }

    #[test]
    fn test_falloff_is_monotonically_decreasing() {
        let mut prev = 1.0;
        let mut rho = 0.1;
        while rho < 0.5 {
            let alpha = profile_alpha(rho, 0.5, 0.1).unwrap();
            assert!(
                alpha <= prev + 1e-6,
                "opacity increased from {prev} to {alpha} at rho={rho}"
            );
            prev = alpha;
            rho += 0.01;
        }
    }

    #[test]
    fn test_core_equal_to_outer_does_not_divide_by_zero() {
        let alpha = profile_alpha(0.3, 0.5, 0.5);
        assert_eq!(alpha, Some(1.0), "degenerate profile is opaque inside R");
        assert_eq!(profile_alpha(0.6, 0.5, 0.5), None);
    }

    #[test]
    fn test_zero_core_radius_still_falls_off() {
        let alpha = profile_alpha(0.25, 0.5, 0.0).unwrap();
        assert!((alpha - 0.5).abs() < 1e-6);
        assert_eq!(profile_alpha(0.0, 0.5, 0.0), Some(1.0));
    }

    #[test]
    fn test_boundary_ring_band() {
        let outer = 1.0;
        assert!(!in_boundary_ring(0.97, outer));
        assert!(in_boundary_ring(0.98, outer));
        assert!(in_boundary_ring(0.999, outer));
        assert!(in_boundary_ring(1.0, outer));
        assert!(!in_boundary_ring(1.001, outer));
    }

    #[test]
    fn test_ring_width_is_two_percent_of_outer() {
        // The ring scales with the halo: at outer=2.0 it starts at 1.96.
        assert!(in_boundary_ring(1.97, 2.0));
        assert!(!in_boundary_ring(1.95, 2.0));
    }
}
