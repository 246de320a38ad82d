use std::time::{Duration, Instant};

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::debug;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::runtime::FrameUpdate;
use crate::scene::{
    plane_grid, plane_world_transform, Camera, PLANE_HEIGHT, PLANE_SEGMENTS, PLANE_WIDTH,
};
use crate::smoothing::LightSmoothing;
use crate::types::RendererConfig;
use crate::SetupError;

use super::context::GpuContext;
use super::pipeline::WavePipeline;
use super::uniforms::{UniformValue, WaveUniforms};

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Owns the camera, the wave mesh, the bound shader program, and the drawable
/// surface; issues the per-frame draw.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: WavePipeline,
    mesh: MeshBuffers,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: WaveUniforms,
    camera: Camera,
    model: glam::Mat4,
    multisample_target: Option<MultisampleTarget>,
    last_fps_update: Instant,
    frames_since_last_update: u32,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> Result<Self, SetupError>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size, config.antialiasing)
            .map_err(SetupError::Graphics)?;
        let pipeline = WavePipeline::new(&context.device, context.surface_format, context.sample_count)?;

        let (vertices, indices) = plane_grid(PLANE_WIDTH, PLANE_HEIGHT, PLANE_SEGMENTS, PLANE_SEGMENTS);
        let vertex_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("wave vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("wave indices"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let mesh = MeshBuffers {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        };

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("wave uniform buffer"),
            size: std::mem::size_of::<WaveUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("wave uniform bind group"),
            layout: &pipeline.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let lights = LightSmoothing::new(config.enhanced_at_start);
        let mut uniforms = WaveUniforms::new(
            lights.brightness.current(),
            lights.range.current(),
        );
        let camera = Camera::new(context.size.width as f32 / context.size.height as f32);
        let model = plane_world_transform();
        uniforms.set(
            "clip_from_model",
            UniformValue::Matrix((camera.clip_from_world() * model).to_cols_array_2d()),
        );
        Self::write_uniforms(&context.queue, &uniform_buffer, &uniforms);

        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        });

        Ok(Self {
            context,
            pipeline,
            mesh,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            camera,
            model,
            multisample_target,
            last_fps_update: Instant::now(),
            frames_since_last_update: 0,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);
        self.camera
            .set_aspect(new_size.width as f32 / new_size.height as f32);
        self.uniforms.set(
            "clip_from_model",
            UniformValue::Matrix((self.camera.clip_from_world() * self.model).to_cols_array_2d()),
        );
        self.multisample_target = (self.context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                self.context.size,
                self.context.sample_count,
            )
        });
    }

    /// Submits one frame: writes the uniform update and draws the wave mesh.
    pub(crate) fn render(&mut self, update: &FrameUpdate) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;

        self.uniforms.set("time", UniformValue::Float(update.seconds));
        self.uniforms
            .set("time_scale", UniformValue::Float(update.time_scale));
        self.uniforms
            .set("brightness", UniformValue::Float(update.brightness));
        self.uniforms.set("range", UniformValue::Float(update.range));
        Self::write_uniforms(&self.context.queue, &self.uniform_buffer, &self.uniforms);

        let now = Instant::now();
        self.frames_since_last_update += 1;
        let elapsed = now.saturating_duration_since(self.last_fps_update);
        if elapsed >= Duration::from_secs(1) {
            debug!(
                fps = (self.frames_since_last_update as f32 / elapsed.as_secs_f32()).round(),
                frame = update.frame_index,
                time = self.uniforms.time(),
                brightness = self.uniforms.brightness(),
                range = self.uniforms.range(),
                "render stats"
            );
            self.frames_since_last_update = 0;
            self.last_fps_update = now;
        }

        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("wave encoder"),
            });

        {
            let color_attachment = match &self.multisample_target {
                Some(msaa) => wgpu::RenderPassColorAttachment {
                    view: &msaa.view,
                    depth_slice: None,
                    resolve_target: Some(&frame_view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                },
                None => wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                },
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("wave pass"),
                color_attachments: &[Some(color_attachment)],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Releases mesh and uniform resources ahead of the surface itself.
    pub(crate) fn dispose(self) {
        self.mesh.vertex_buffer.destroy();
        self.mesh.index_buffer.destroy();
        self.uniform_buffer.destroy();
        debug!("released wave GPU resources");
        // The surface and device drop with `self.context` after the buffers
        // are already gone.
    }

    fn write_uniforms(queue: &wgpu::Queue, buffer: &wgpu::Buffer, uniforms: &WaveUniforms) {
        queue.write_buffer(buffer, 0, bytemuck::bytes_of(uniforms));
    }
}
