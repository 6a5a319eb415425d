//! Deterministic procedural halo catalog generation.
//!
//! Stands in for the external catalog service during development and in the
//! demo shell: the same seed always produces the same catalog, so camera and
//! selection behavior is reproducible across runs.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::halo::HaloRecord;

/// Radius scale: outer radius in Mpc per cube root of mass (1e10 Msun).
const RADIUS_PER_CBRT_MASS: f32 = 0.25;

/// Generates a deterministic halo catalog from a seed.
pub struct CatalogGenerator {
    seed: u64,
    count: u32,
    /// Side length of the cubic volume in Mpc, centered on the origin.
    box_size: f32,
}

impl CatalogGenerator {
    /// Create a generator for `count` halos in a `box_size` Mpc cube.
    pub fn new(seed: u64, count: u32, box_size: f32) -> Self {
        Self {
            seed,
            count,
            box_size,
        }
    }

    /// Generate the catalog. Deterministic for a given seed.
    pub fn generate(&self) -> Vec<HaloRecord> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let half = self.box_size * 0.5;
        let mut halos = Vec::with_capacity(self.count as usize);

        for id in 0..self.count {
            let position = Vec3::new(
                rng.random::<f32>() * self.box_size - half,
                rng.random::<f32>() * self.box_size - half,
                rng.random::<f32>() * self.box_size - half,
            );

            // Steep power law: many low-mass halos, few cluster-scale ones.
            let raw: f32 = rng.random();
            let mass = 1.0 + raw.powf(6.0) * 500.0;

            // Virial-like scaling: radius grows with the cube root of mass.
            let outer_radius = RADIUS_PER_CBRT_MASS * mass.cbrt();

            // Core is a sampled fraction of the outer radius.
            let core_fraction = 0.05 + rng.random::<f32>() * 0.25;
            let core_radius = outer_radius * core_fraction;

            halos.push(HaloRecord {
                id: u64::from(id),
                position,
                outer_radius,
                core_radius,
                mass,
            });
        }

        halos
    }
}
