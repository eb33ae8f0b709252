// Rendering system using wgpu

mod camera;
mod lines;
mod mesh;
mod vertex;

pub use camera::Camera;

use lines::LineRenderer;
use mesh::MeshRenderer;

use crate::core::math::{hex_to_rgb, target_color};
use crate::engine::assets::AssetManager;
use crate::engine::scene::{GridHelper, Scene};
use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use log::{info, warn};
use std::sync::Arc;
use winit::window::Window;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame uniform shared by the mesh and line shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
}

impl FrameUniform {
    /// Light colors are premultiplied by intensity, in the target's color space
    pub fn new(camera: &Camera, scene: &Scene, srgb_target: bool) -> Self {
        let ambient = target_color(scene.ambient.color, srgb_target) * scene.ambient.intensity;
        let light_color =
            target_color(scene.directional.color, srgb_target) * scene.directional.intensity;

        Self {
            view_proj: camera.view_proj_matrix().to_cols_array_2d(),
            ambient: ambient.extend(1.0).to_array(),
            light_dir: scene.directional.direction().extend(0.0).to_array(),
            light_color: light_color.extend(1.0).to_array(),
        }
    }
}

/// Main renderer responsible for initializing wgpu and coordinating rendering
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    mesh_renderer: MeshRenderer,
    line_renderer: LineRenderer,
    clear_color: wgpu::Color,
    srgb_target: bool,
}

impl Renderer {
    /// Create a new renderer for the given window
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface
        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        info!("Using GPU: {}", adapter.get_info().name);

        // Request device and queue
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;
        let srgb_target = surface_format.is_srgb();
        if !srgb_target {
            warn!(
                "No sRGB surface format, using {:?}; colors are written unconverted",
                surface_format
            );
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        // Frame uniform, bound at group 0 by both pipelines
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
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

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let mesh_renderer = MeshRenderer::new(&device, surface_format, &frame_layout);
        let line_renderer = LineRenderer::new(&device, surface_format, &frame_layout);

        info!(
            "Renderer initialized with {}x{} resolution",
            size.width, size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_view,
            frame_buffer,
            frame_bind_group,
            mesh_renderer,
            line_renderer,
            clear_color: clear_color_from_hex(0x222222, srgb_target),
            srgb_target,
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Reconfigure the surface at its current size, after it was lost
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    /// Background color as `0xRRGGBB`
    pub fn set_clear_color(&mut self, hex: u32) {
        self.clear_color = clear_color_from_hex(hex, self.srgb_target);
    }

    /// Replace the ground grid; `None` removes it
    pub fn set_grid(&mut self, grid: Option<&GridHelper>) {
        let lines = grid.map(GridHelper::lines).unwrap_or_default();
        self.line_renderer.set_lines(&self.device, &lines);
    }

    /// Render a frame
    pub fn render(
        &mut self,
        scene: &Scene,
        assets: &AssetManager,
        camera: &Camera,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::cast_slice(&[FrameUniform::new(camera, scene, self.srgb_target)]),
        );
        self.mesh_renderer
            .prepare(&self.device, &self.queue, scene, assets);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            self.line_renderer.render(&mut render_pass);
            self.mesh_renderer.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Number of meshes uploaded to the GPU so far
    pub fn uploaded_meshes(&self) -> usize {
        self.mesh_renderer.uploaded_meshes()
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn clear_color_from_hex(hex: u32, srgb_target: bool) -> wgpu::Color {
    let color = target_color(hex_to_rgb(hex), srgb_target);
    wgpu::Color {
        r: color.x as f64,
        g: color.y as f64,
        b: color.z as f64,
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::tests::empty_scene;
    use glam::Vec3;

    #[test]
    fn test_frame_uniform_layout() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 112);
    }

    #[test]
    fn test_frame_uniform_lights() {
        let scene = empty_scene();
        let camera = Camera::new(Vec3::new(10.0, 15.0, 20.0), Vec3::ZERO, 75.0, 0.1, 1000.0);
        let uniform = FrameUniform::new(&camera, &scene, true);

        // White at 0.6 stays 0.6 after linearization
        assert!((uniform.ambient[0] - 0.6).abs() < 1e-5);
        assert_eq!(uniform.light_color[..3], [1.0, 1.0, 1.0]);
        let dir = Vec3::from_slice(&uniform.light_dir[..3]);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.y < 0.0);
    }

    #[test]
    fn test_clear_color_black_and_white() {
        let black = clear_color_from_hex(0x000000, true);
        assert_eq!((black.r, black.g, black.b), (0.0, 0.0, 0.0));
        let white = clear_color_from_hex(0xffffff, true);
        assert!((white.r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clear_color_on_non_srgb_target() {
        let grey = clear_color_from_hex(0x808080, false);
        assert!((grey.r - 128.0 / 255.0).abs() < 1e-6);

        let linear = clear_color_from_hex(0x808080, true);
        assert!(linear.r < grey.r);
    }

    #[test]
    fn test_frame_uniform_on_non_srgb_target() {
        let mut scene = empty_scene();
        scene.ambient.color = Vec3::splat(0.5);
        scene.ambient.intensity = 1.0;
        let camera = Camera::new(Vec3::new(10.0, 15.0, 20.0), Vec3::ZERO, 75.0, 0.1, 1000.0);

        let uniform = FrameUniform::new(&camera, &scene, false);
        assert!((uniform.ambient[0] - 0.5).abs() < 1e-6);
    }
}
