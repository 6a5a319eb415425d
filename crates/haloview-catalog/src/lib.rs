//! Halo catalog data model: records, the catalog collection, and a deterministic
//! procedural generator standing in for the upstream catalog service.

pub mod catalog;
pub mod generate;
pub mod halo;

pub use catalog::Catalog;
pub use generate::CatalogGenerator;
pub use halo::HaloRecord;
