//! A single cataloged halo with its two characteristic radii.

use glam::Vec3;

/// One halo from the catalog.
///
/// Positions and radii are in comoving megaparsecs. The renderer consumes
/// `position`, `outer_radius`, and `core_radius`; `mass` exists for the
/// upstream threshold filter that decides which halos are shown at all.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HaloRecord {
    /// Stable catalog identifier.
    pub id: u64,
    /// Comoving position in Mpc.
    pub position: Vec3,
    /// Outer (virial) radius in Mpc. Rendered opacity reaches zero here.
    pub outer_radius: f32,
    /// Core radius in Mpc. The footprint is fully opaque inside it.
    pub core_radius: f32,
    /// Mass in units of 1e10 solar masses.
    pub mass: f32,
}

impl HaloRecord {
    /// Whether this record satisfies the renderer's input invariants:
    /// every field finite, radii non-negative, core no larger than outer.
    pub fn is_valid(&self) -> bool {
        self.position.is_finite()
            && self.outer_radius.is_finite()
            && self.core_radius.is_finite()
            && self.mass.is_finite()
            && self.outer_radius > 0.0
            && self.core_radius >= 0.0
            && self.core_radius <= self.outer_radius
    }
}
