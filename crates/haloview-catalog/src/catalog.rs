//! The halo catalog collection: lookup, validation, and threshold filtering.

use crate::halo::HaloRecord;

/// An ordered collection of halo records.
///
/// Order is significant: the renderer packs GPU instances in catalog order,
/// so index-based associations stay valid for the lifetime of a snapshot.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    halos: Vec<HaloRecord>,
}

impl Catalog {
    /// Build a catalog from records, preserving their order.
    pub fn from_records(halos: Vec<HaloRecord>) -> Self {
        Self { halos }
    }

    /// Look up a halo by its catalog id.
    pub fn find(&self, id: u64) -> Option<&HaloRecord> {
        self.halos.iter().find(|h| h.id == id)
    }

    /// Drop records that violate the renderer's input invariants.
    ///
    /// Returns the number of records removed. Invalid records are logged
    /// rather than silently discarded so bad upstream data is visible.
    pub fn retain_valid(&mut self) -> usize {
        let before = self.halos.len();
        self.halos.retain(|h| {
            let ok = h.is_valid();
            if !ok {
                log::warn!("dropping invalid halo record id={}", h.id);
            }
            ok
        });
        before - self.halos.len()
    }

    /// A new catalog containing only halos at or above the given mass,
    /// mirroring the upstream mass-threshold filter that re-supplies
    /// entity arrays to the renderer.
    pub fn above_mass(&self, threshold: f32) -> Catalog {
        Catalog {
            halos: self
                .halos
                .iter()
                .copied()
                .filter(|h| h.mass >= threshold)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.halos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.halos.is_empty()
    }

    /// The records in catalog order.
    pub fn records(&self) -> &[HaloRecord] {
        &self.halos
    }
}
