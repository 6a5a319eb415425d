//! GPU rendering for the halo viewer: device/surface management, the reverse-Z
//! perspective camera, the instanced halo profile pipeline, and scene fixtures
//! (ground grid, axis indicator).

pub mod camera;
pub mod depth;
pub mod geometry;
pub mod gpu;
pub mod grid;
pub mod halo_pipeline;
pub mod profile;

pub use camera::{Camera, SceneUniform};
pub use depth::DepthBuffer;
pub use geometry::{GeometryError, HaloGeometry, pack_instances};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use grid::{LineMesh, LinePipeline, LineVertex, axis_vertices, grid_vertices};
pub use halo_pipeline::{HALO_SHADER_SOURCE, HaloInstance, HaloPipeline, SceneBinding};
pub use profile::{RING_FRACTION, in_boundary_ring, profile_alpha};
