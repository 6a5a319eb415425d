//! Scene fixtures: ground grid and axis indicator, drawn as line lists.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::halo_pipeline::SceneBinding;

/// Vertex format for line geometry: position and color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 12,
                shader_location: 1,
            },
        ],
    };
}

/// WGSL source for the unlit line shader. Shares the scene uniform with the
/// halo pipeline but only reads the view-projection matrix.
pub const LINE_SHADER_SOURCE: &str = r#"
struct SceneUniform {
    view_proj: mat4x4<f32>,
    cam_right: vec4<f32>,
    cam_up: vec4<f32>,
    point_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> scene: SceneUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = scene.view_proj * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_line(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// A non-indexed line-list mesh.
pub struct LineMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl LineMesh {
    /// Upload line vertices to the GPU.
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[LineVertex]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        }
    }
}

/// Opaque line pipeline for grid and axes. Writes depth so halos behind the
/// grid are correctly occluded where they should be.
pub struct LinePipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl LinePipeline {
    pub fn new(
        device: &wgpu::Device,
        scene: &SceneBinding,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line-shader"),
            source: wgpu::ShaderSource::Wgsl(LINE_SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line-pipeline-layout"),
            bind_group_layouts: &[&scene.layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                buffers: &[LineVertex::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::GreaterEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self { pipeline }
    }

    /// Draw one or more line meshes.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        scene: &SceneBinding,
        meshes: &[&LineMesh],
    ) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &scene.bind_group, &[]);
        for mesh in meshes {
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.draw(0..mesh.vertex_count, 0..1);
        }
    }
}

/// Dim gray for grid lines.
const GRID_COLOR: [f32; 4] = [0.25, 0.25, 0.3, 1.0];

/// Generate a square grid of lines on the y=0 plane.
///
/// Lines run parallel to the X and Z axes, spaced `step` apart, spanning
/// `[-extent, extent]` in both directions.
pub fn grid_vertices(extent: f32, step: f32) -> Vec<LineVertex> {
    let mut vertices = Vec::new();
    if step <= 0.0 || extent <= 0.0 {
        return vertices;
    }

    let line_count = (extent / step).floor() as i32;
    for i in -line_count..=line_count {
        let offset = i as f32 * step;
        // Line parallel to X at z = offset.
        vertices.push(LineVertex {
            position: [-extent, 0.0, offset],
            color: GRID_COLOR,
        });
        vertices.push(LineVertex {
            position: [extent, 0.0, offset],
            color: GRID_COLOR,
        });
        // Line parallel to Z at x = offset.
        vertices.push(LineVertex {
            position: [offset, 0.0, -extent],
            color: GRID_COLOR,
        });
        vertices.push(LineVertex {
            position: [offset, 0.0, extent],
            color: GRID_COLOR,
        });
    }
    vertices
}

/// Generate the RGB axis indicator: X red, Y green, Z blue, from the origin.
pub fn axis_vertices(length: f32) -> Vec<LineVertex> {
    let axes: [([f32; 3], [f32; 4]); 3] = [
        ([length, 0.0, 0.0], [0.9, 0.2, 0.2, 1.0]),
        ([0.0, length, 0.0], [0.2, 0.9, 0.2, 1.0]),
        ([0.0, 0.0, length], [0.2, 0.4, 0.9, 1.0]),
    ];

    let mut vertices = Vec::with_capacity(6);
    for (end, color) in axes {
        vertices.push(LineVertex {
            position: [0.0, 0.0, 0.0],
            color,
        });
        vertices.push(LineVertex {
            position: end,
            color,
        });
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_vertex_layout() {
        let layout = LineVertex::LAYOUT;
        assert_eq!(layout.array_stride, 28);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].offset, 12);
    }

    #[test]
    fn test_grid_vertex_count() {
        // extent 10, step 5 → lines at -10,-5,0,5,10 in each direction,
        // 5 offsets × 2 directions × 2 vertices per line = 20.
        let vertices = grid_vertices(10.0, 5.0);
        assert_eq!(vertices.len(), 20);
    }

    #[test]
    fn test_grid_vertices_come_in_pairs() {
        let vertices = grid_vertices(60.0, 10.0);
        assert_eq!(vertices.len() % 2, 0, "line list needs an even vertex count");
    }

    #[test]
    fn test_grid_lies_on_ground_plane() {
        for v in grid_vertices(30.0, 10.0) {
            assert_eq!(v.position[1], 0.0);
        }
    }

    #[test]
    fn test_grid_spans_extent() {
        let extent = 40.0;
        let vertices = grid_vertices(extent, 10.0);
        let max_coord = vertices
            .iter()
            .flat_map(|v| [v.position[0].abs(), v.position[2].abs()])
            .fold(0.0f32, f32::max);
        assert_eq!(max_coord, extent);
    }

    #[test]
    fn test_degenerate_grid_inputs_are_empty() {
        assert!(grid_vertices(10.0, 0.0).is_empty());
        assert!(grid_vertices(0.0, 1.0).is_empty());
        assert!(grid_vertices(10.0, -1.0).is_empty());
    }

    #[test]
    fn test_axis_indicator_has_three_colored_axes() {
        let vertices = axis_vertices(5.0);
        assert_eq!(vertices.len(), 6);
        // Each axis starts at the origin.
        for pair in vertices.chunks(2) {
            assert_eq!(pair[0].position, [0.0, 0.0, 0.0]);
        }
        // X axis is red, Y green, Z blue.
        assert!(vertices[1].color[0] > vertices[1].color[2]);
        assert!(vertices[3].color[1] > vertices[3].color[0]);
        assert!(vertices[5].color[2] > vertices[5].color[0]);
    }

    #[test]
    fn test_axis_length() {
        let vertices = axis_vertices(7.5);
        assert_eq!(vertices[1].position, [7.5, 0.0, 0.0]);
        assert_eq!(vertices[3].position, [0.0, 7.5, 0.0]);
        assert_eq!(vertices[5].position, [0.0, 0.0, 7.5]);
    }

    #[test]
    fn test_line_shader_contains_entry_points() {
        assert!(LINE_SHADER_SOURCE.contains("fn vs_line"));
        assert!(LINE_SHADER_SOURCE.contains("fn fs_line"));
    }
}
