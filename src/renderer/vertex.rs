//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::Rgba;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Rgba) -> Self {
        Self {
            position: [x, y],
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
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::Rgba;

    pub const BACKGROUND: Rgba = [0.0, 0.0, 0.0, 1.0];
    /// #00ff00
    pub const PADDLE: Rgba = [0.0, 1.0, 0.0, 1.0];
    /// #ff00ff
    pub const BALL: Rgba = [1.0, 0.0, 1.0, 1.0];
    /// #00ffea
    pub const SCORE_TEXT: Rgba = [0.0, 1.0, 0.918, 1.0];
    /// #ff00ff
    pub const LIVES_TEXT: Rgba = [1.0, 0.0, 1.0, 1.0];

    /// Same color with its alpha scaled by `alpha`
    #[inline]
    pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
        [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
    }
}
