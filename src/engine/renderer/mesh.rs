// Lit mesh rendering
//
// Meshes are uploaded the first time a scene part references them. Every draw
// gets its own small uniform buffer (model matrix + color); slots are reused
// across frames and only grow.

use super::vertex::MeshVertex;
use super::DEPTH_FORMAT;
use crate::core::math::target_color;
use crate::engine::assets::{AssetId, AssetManager, MeshData};
use crate::engine::scene::Scene;
use bytemuck::{Pod, Zeroable};
use std::collections::HashMap;
use wgpu::util::DeviceExt;

/// Per-draw uniform
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct DrawCommand {
    mesh: AssetId,
    slot: usize,
}

/// Draws every populated anchor part in the scene
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    object_layout: wgpu::BindGroupLayout,
    meshes: HashMap<AssetId, GpuMesh>,
    slots: Vec<ObjectSlot>,
    draws: Vec<DrawCommand>,
    srgb_target: bool,
}

impl MeshRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[frame_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[MeshVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Loaded models do not agree on winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        Self {
            pipeline,
            object_layout,
            meshes: HashMap::new(),
            slots: Vec::new(),
            draws: Vec::new(),
            srgb_target: format.is_srgb(),
        }
    }

    /// Upload missing meshes and write this frame's per-draw uniforms
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
        assets: &AssetManager,
    ) {
        self.draws.clear();

        for (_, anchor) in scene.anchors() {
            let model = anchor.part_matrix().to_cols_array_2d();

            for part in &anchor.parts {
                let id = part.mesh.id();
                if !self.meshes.contains_key(&id) {
                    let Some(mesh) = assets.get_mesh(part.mesh) else {
                        continue;
                    };
                    if mesh.data.is_empty() {
                        continue;
                    }
                    self.meshes.insert(id, upload_mesh(device, &mesh.data));
                }

                let slot = self.draws.len();
                if slot == self.slots.len() {
                    let object_slot = self.create_slot(device);
                    self.slots.push(object_slot);
                }

                let color = target_color(part.color, self.srgb_target)
                    .extend(1.0)
                    .to_array();
                queue.write_buffer(
                    &self.slots[slot].buffer,
                    0,
                    bytemuck::cast_slice(&[ObjectUniform { model, color }]),
                );
                self.draws.push(DrawCommand { mesh: id, slot });
            }
        }
    }

    /// Record draws prepared by [`prepare`](Self::prepare); group 0 must already be bound
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.draws.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        for draw in &self.draws {
            let Some(mesh) = self.meshes.get(&draw.mesh) else {
                continue;
            };
            render_pass.set_bind_group(1, &self.slots[draw.slot].bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    /// Number of meshes resident on the GPU
    pub fn uploaded_meshes(&self) -> usize {
        self.meshes.len()
    }

    fn create_slot(&self, device: &wgpu::Device) -> ObjectSlot {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniform Buffer"),
            size: std::mem::size_of::<ObjectUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        ObjectSlot { buffer, bind_group }
    }
}

fn mesh_vertices(data: &MeshData) -> Vec<MeshVertex> {
    data.positions
        .iter()
        .enumerate()
        .map(|(i, &position)| MeshVertex {
            position,
            normal: data.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
        })
        .collect()
}

fn upload_mesh(device: &wgpu::Device, data: &MeshData) -> GpuMesh {
    let vertices = mesh_vertices(data);

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Vertex Buffer"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Index Buffer"),
        contents: bytemuck::cast_slice(&data.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: data.indices.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_uniform_size() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 80);
    }

    #[test]
    fn test_missing_normals_default_to_up() {
        let data = MeshData {
            positions: vec![[0.0; 3], [1.0, 0.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]],
            indices: vec![],
        };
        let vertices = mesh_vertices(&data);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].normal, [0.0, 1.0, 0.0]);
    }
}
