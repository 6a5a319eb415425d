//! Halo geometry builder: packs catalog records into per-instance GPU buffers.
//!
//! The builder owns the instance buffer exclusively. Rebuilding validates the
//! input first, then destroys the previous buffer before allocating its
//! replacement, so a failed rebuild leaves the prior geometry intact and a
//! successful one never leaks GPU memory.

use bytemuck::cast_slice;
use wgpu::util::DeviceExt;

use haloview_catalog::HaloRecord;

use crate::halo_pipeline::{HaloInstance, QuadVertex};

/// Error type for geometry construction failures.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    /// A record violated the renderer's input invariants. Upstream is
    /// supposed to filter these; hitting this is a loud boundary failure,
    /// not silent corruption.
    #[error("invalid halo record id={id}: non-finite field or core > outer")]
    InvalidRecord { id: u64 },
}

/// Pack catalog records into instance data, in catalog order.
///
/// Pure and deterministic: the same input always produces byte-identical
/// instances, which is what makes rebuilds idempotent.
pub fn pack_instances(halos: &[HaloRecord]) -> Result<Vec<HaloInstance>, GeometryError> {
    halos
        .iter()
        .map(|halo| {
            if !halo.is_valid() {
                return Err(GeometryError::InvalidRecord { id: halo.id });
            }
            Ok(HaloInstance {
                position: halo.position.to_array(),
                outer_radius: halo.outer_radius,
                core_radius: halo.core_radius,
                _padding: [0.0; 3],
            })
        })
        .collect()
}

/// GPU-resident halo geometry: a shared unit quad plus one instance per halo.
pub struct HaloGeometry {
    quad_vertex_buffer: wgpu::Buffer,
    quad_index_buffer: wgpu::Buffer,
    instance_buffer: Option<wgpu::Buffer>,
    instance_count: u32,
    rebuild_count: u64,
}

impl HaloGeometry {
    /// Indices in the unit quad (two triangles).
    pub const QUAD_INDEX_COUNT: u32 = 6;

    /// Create the shared quad buffers with no instances yet.
    pub fn new(device: &wgpu::Device) -> Self {
        let corners = [
            QuadVertex { corner: [-1.0, -1.0] },
            QuadVertex { corner: [1.0, -1.0] },
            QuadVertex { corner: [1.0, 1.0] },
            QuadVertex { corner: [-1.0, 1.0] },
        ];
        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("halo-quad-vertices"),
            contents: cast_slice(&corners),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices: [u16; 6] = [0, 1, 2, 2, 3, 0];
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("halo-quad-indices"),
            contents: cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            quad_vertex_buffer,
            quad_index_buffer,
            instance_buffer: None,
            instance_count: 0,
            rebuild_count: 0,
        }
    }

    /// Rebuild the instance buffer from a catalog snapshot.
    ///
    /// Validates every record before touching GPU state; on success the old
    /// instance buffer is destroyed and replaced. An empty catalog is valid
    /// and simply leaves nothing to draw.
    pub fn rebuild(
        &mut self,
        device: &wgpu::Device,
        halos: &[HaloRecord],
    ) -> Result<(), GeometryError> {
        let instances = pack_instances(halos)?;

        self.release_instances();

        if !instances.is_empty() {
            self.instance_buffer = Some(device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("halo-instances"),
                    contents: cast_slice(&instances),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            ));
        }
        self.instance_count = instances.len() as u32;
        self.rebuild_count += 1;
        log::debug!("halo geometry rebuilt: {} instances", self.instance_count);
        Ok(())
    }

    /// Destroy the instance buffer. Idempotent; safe on the teardown path.
    pub fn release_instances(&mut self) {
        if let Some(old) = self.instance_buffer.take() {
            old.destroy();
        }
        self.instance_count = 0;
    }

    pub fn instances(&self) -> Option<&wgpu::Buffer> {
        self.instance_buffer.as_ref()
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Number of successful rebuilds since creation.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    pub fn quad_vertices(&self) -> &wgpu::Buffer {
        &self.quad_vertex_buffer
    }

    pub fn quad_indices(&self) -> &wgpu::Buffer {
        &self.quad_index_buffer
    }
}
