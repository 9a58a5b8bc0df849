//! WebGPU sprite pipeline setup

use std::collections::HashMap;

use anyhow::Context;
use wgpu::util::DeviceExt;

use super::batch::{SpriteBatch, TextureId, build_batches};
use super::vertex::{Vertex, colors};
use crate::assets::{AssetKey, LoadedImage};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::settings::Settings;
use crate::sim::GameState;

/// Map canvas pixels (origin top-left, y down) to NDC, letterboxed so the
/// scene keeps its aspect ratio inside a `viewport` of any shape.
pub fn canvas_to_ndc(x: f32, y: f32, viewport: (u32, u32)) -> (f32, f32) {
    let (w, h) = viewport;
    let nx = x / (CANVAS_WIDTH / 2.0) - 1.0;
    let ny = 1.0 - y / (CANVAS_HEIGHT / 2.0);
    if w == 0 || h == 0 {
        return (nx, ny);
    }

    let scene_aspect = CANVAS_WIDTH / CANVAS_HEIGHT;
    let aspect = w as f32 / h as f32;
    if aspect > scene_aspect {
        // Wider than the scene: bars left and right
        (nx * scene_aspect / aspect, ny)
    } else {
        // Taller than the scene: bars top and bottom
        (nx, ny * aspect / scene_aspect)
    }
}

/// A texture uploaded to the GPU with its frame grid
struct GpuTexture {
    bind_group: wgpu::BindGroup,
    image: Option<LoadedImage>,
}

/// Main render state
pub struct SpriteRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    textures: HashMap<TextureId, GpuTexture>,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl SpriteRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        images: Vec<LoadedImage>,
        settings: &Settings,
    ) -> anyhow::Result<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("double-jump-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("Surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let filter = if settings.pixel_art {
            wgpu::FilterMode::Nearest
        } else {
            wgpu::FilterMode::Linear
        };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        });

        let mut textures = HashMap::new();
        let white = upload_texture(
            &device,
            &queue,
            &bind_group_layout,
            &sampler,
            "white",
            1,
            1,
            &[255, 255, 255, 255],
        );
        textures.insert(
            TextureId::White,
            GpuTexture {
                bind_group: white,
                image: None,
            },
        );
        for image in images {
            let bind_group = upload_texture(
                &device,
                &queue,
                &bind_group_layout,
                &sampler,
                image.key.name(),
                image.width,
                image.height,
                &image.rgba,
            );
            textures.insert(
                TextureId::Asset(image.key),
                GpuTexture {
                    bind_group,
                    image: Some(image),
                },
            );
        }
        for key in AssetKey::ALL {
            if !textures.contains_key(&TextureId::Asset(key)) {
                anyhow::bail!("Texture '{}' was never loaded", key.name());
            }
        }

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!(
            "Sprite renderer ready ({} textures, {:?} sampling)",
            textures.len(),
            filter
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            textures,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn frame_uv(&self, key: AssetKey, frame: u32) -> [f32; 4] {
        self.textures
            .get(&TextureId::Asset(key))
            .and_then(|t| t.image.as_ref())
            .map_or([0.0, 0.0, 1.0, 1.0], |image| image.frame_uv(frame))
    }

    /// Draw one frame of `state`
    pub fn render(&mut self, state: &GameState, settings: &Settings) -> Result<(), wgpu::SurfaceError> {
        let batches = build_batches(state, settings, &|key: AssetKey, frame: u32| {
            self.frame_uv(key, frame)
        });

        // Flatten into one buffer, remembering each batch's range
        let mut ndc_vertices: Vec<Vertex> = Vec::new();
        let mut draws: Vec<(TextureId, std::ops::Range<u32>)> = Vec::with_capacity(batches.len());
        for SpriteBatch { texture, vertices } in &batches {
            let start = ndc_vertices.len() as u32;
            ndc_vertices.extend(vertices.iter().map(|v| {
                let (x, y) = canvas_to_ndc(v.position[0], v.position[1], self.size);
                Vertex {
                    position: [x, y],
                    ..*v
                }
            }));
            draws.push((*texture, start..ndc_vertices.len() as u32));
        }

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("sprite_vertex_buffer"),
                contents: bytemuck::cast_slice(&ndc_vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprite_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            for (texture, range) in draws {
                if let Some(gpu) = self.textures.get(&texture) {
                    render_pass.set_bind_group(0, &gpu.bind_group, &[]);
                    render_pass.draw(range, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::BindGroup {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_corners_fill_matching_viewport() {
        assert_eq!(canvas_to_ndc(0.0, 0.0, (800, 600)), (-1.0, 1.0));
        assert_eq!(canvas_to_ndc(800.0, 600.0, (800, 600)), (1.0, -1.0));
        assert_eq!(canvas_to_ndc(400.0, 300.0, (1600, 1200)), (0.0, 0.0));
    }

    #[test]
    fn test_letterbox_wide_viewport() {
        // 1600x600 is twice as wide as 4:3 needs
        let (x, y) = canvas_to_ndc(800.0, 0.0, (1600, 600));
        assert!((x - 0.5).abs() < 1e-6);
        assert_eq!(y, 1.0);
    }

    #[test]
    fn test_letterbox_tall_viewport() {
        let (x, y) = canvas_to_ndc(0.0, 600.0, (800, 1200));
        assert_eq!(x, -1.0);
        assert!((y + 0.5).abs() < 1e-6);
    }
}
