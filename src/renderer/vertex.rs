//! Vertex types for 2D sprite rendering

use bytemuck::{Pod, Zeroable};

/// Textured, tinted 2D vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for untextured overlays
pub mod colors {
    /// No tint
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Dynamic body outline (debug)
    pub const DEBUG_DYNAMIC: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    /// Static body outline (debug)
    pub const DEBUG_STATIC: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    /// Letterbox clear colour
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
