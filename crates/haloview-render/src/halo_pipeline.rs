//! Instanced halo billboard pipeline with the two-zone profile shader.
//!
//! Each halo is a unit quad expanded in the vertex stage along the camera's
//! right/up basis, scaled by the instance's outer radius, so the on-screen
//! footprint diameter equals `2R` world units under true perspective
//! projection. The fragment stage maps each pixel back to a physical radius
//! and applies the core/falloff/ring law from [`crate::profile`].

use bytemuck::{Pod, Zeroable};
use std::num::NonZeroU64;

use crate::camera::SceneUniform;
use crate::geometry::HaloGeometry;

/// Per-instance GPU data for one halo.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct HaloInstance {
    /// World position in Mpc.
    pub position: [f32; 3],
    /// Outer radius in Mpc (billboard half-extent).
    pub outer_radius: f32,
    /// Core radius in Mpc.
    pub core_radius: f32,
    /// Alignment padding.
    pub _padding: [f32; 3],
}

impl HaloInstance {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<HaloInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            // Position + outer radius packed as one vec4.
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 0,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 16,
                shader_location: 2,
            },
        ],
    };
}

/// Per-vertex corner of the unit billboard quad, in [-1, 1]².
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    pub corner: [f32; 2],
}

impl QuadVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        }],
    };
}

/// WGSL source for the halo profile shader.
///
/// The fragment math must stay in lockstep with
/// [`profile_alpha`](crate::profile::profile_alpha) and
/// [`in_boundary_ring`](crate::profile::in_boundary_ring).
pub const HALO_SHADER_SOURCE: &str = r#"
struct SceneUniform {
    view_proj: mat4x4<f32>,
    cam_right: vec4<f32>,
    cam_up: vec4<f32>,
    point_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> scene: SceneUniform;

struct VertexInput {
    @location(0) corner: vec2<f32>,
};

struct InstanceInput {
    @location(1) center_outer: vec4<f32>,
    @location(2) core_radius: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) outer_radius: f32,
    @location(2) core_radius: f32,
};

@vertex
fn vs_halo(v: VertexInput, inst: InstanceInput) -> VertexOutput {
    let center = inst.center_outer.xyz;
    let outer = inst.center_outer.w;

    // Billboard: expand the quad along the camera basis so the footprint
    // diameter is 2R world units, scaled by perspective like any geometry.
    let world = center
        + scene.cam_right.xyz * (v.corner.x * outer)
        + scene.cam_up.xyz * (v.corner.y * outer);

    var out: VertexOutput;
    out.clip_position = scene.view_proj * vec4<f32>(world, 1.0);
    out.uv = v.corner;
    out.outer_radius = outer;
    out.core_radius = inst.core_radius;
    return out;
}

const RING_FRACTION: f32 = 0.98;
const RING_COLOR: vec3<f32> = vec3<f32>(1.0, 0.82, 0.25);
const RING_ALPHA: f32 = 0.9;

@fragment
fn fs_halo(in: VertexOutput) -> @location(0) vec4<f32> {
    // Physical radius at this fragment: |uv| spans [0, 1] across the quad,
    // so scaling by the outer radius recovers Mpc.
    let rho = length(in.uv) * in.outer_radius;

    if rho > in.outer_radius {
        discard;
    }

    // Thin near-opaque ring makes the outer radius legible.
    if rho >= in.outer_radius * RING_FRACTION {
        return vec4<f32>(RING_COLOR * RING_ALPHA, RING_ALPHA);
    }

    var alpha = 1.0;
    let falloff_width = in.outer_radius - in.core_radius;
    if rho > in.core_radius && falloff_width > 0.000001 * in.outer_radius {
        alpha = clamp((in.outer_radius - rho) / falloff_width, 0.0, 1.0);
    }

    return vec4<f32>(scene.point_color.rgb * alpha, alpha);
}
"#;

/// Additive blending: overlapping translucent halos accumulate.
pub const HALO_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Halos test depth but never write it, so they blend instead of occluding
/// each other while opaque geometry still occludes them.
pub const HALO_DEPTH_WRITE: bool = false;

/// The per-frame scene uniform buffer and its bind group, shared by the halo
/// and line pipelines.
pub struct SceneBinding {
    pub layout: wgpu::BindGroupLayout,
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl SceneBinding {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<SceneUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene-uniform"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene-bind-group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            layout,
            buffer,
            bind_group,
        }
    }

    /// Upload this frame's camera/color state.
    pub fn update(&self, queue: &wgpu::Queue, uniform: &SceneUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }
}

/// The instanced halo render pipeline.
pub struct HaloPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl HaloPipeline {
    /// Create the halo pipeline for the given surface and depth formats.
    pub fn new(
        device: &wgpu::Device,
        scene: &SceneBinding,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("halo-shader"),
            source: wgpu::ShaderSource::Wgsl(HALO_SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("halo-pipeline-layout"),
            bind_group_layouts: &[&scene.layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("halo-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_halo"),
                buffers: &[QuadVertex::LAYOUT, HaloInstance::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: HALO_DEPTH_WRITE,
                depth_compare: wgpu::CompareFunction::GreaterEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_halo"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(HALO_BLEND),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self { pipeline }
    }

    /// Draw all halo instances. A no-op for an empty catalog.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        scene: &SceneBinding,
        geometry: &HaloGeometry,
    ) {
        let Some(instances) = geometry.instances() else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &scene.bind_group, &[]);
        pass.set_vertex_buffer(0, geometry.quad_vertices().slice(..));
        pass.set_vertex_buffer(1, instances.slice(..));
        pass.set_index_buffer(geometry.quad_indices().slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..HaloGeometry::QUAD_INDEX_COUNT, 0, 0..geometry.instance_count());
    }
}
