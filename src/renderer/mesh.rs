//! Surface that tessellates draw calls into a vertex list
//!
//! Text is not rasterized; it is collected so the host can place it (the
//! browser build writes it into HUD elements).

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use super::{Surface2d, TextAlign};
use crate::Rgba;

/// A queued text label
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub at: Vec2,
    pub align: TextAlign,
    pub color: Rgba,
}

/// Triangle-list surface in field pixels
#[derive(Debug, Clone)]
pub struct MeshSurface {
    pub vertices: Vec<Vertex>,
    pub text: Vec<TextItem>,
    /// Segments per circle
    segments: u32,
}

impl MeshSurface {
    pub fn new(segments: u32) -> Self {
        Self {
            vertices: Vec::new(),
            text: Vec::new(),
            segments,
        }
    }

    /// Circle detail, changed with the quality preset
    pub fn set_segments(&mut self, segments: u32) {
        self.segments = segments;
    }

    /// First label whose text starts with `prefix`
    pub fn label(&self, prefix: &str) -> Option<&TextItem> {
        self.text.iter().find(|t| t.text.starts_with(prefix))
    }
}

impl Surface2d for MeshSurface {
    fn clear(&mut self) {
        self.vertices.clear();
        self.text.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: Option<f32>) {
        if let Some(blur) = glow {
            self.vertices
                .extend(shapes::circle_glow(center, radius, blur, color, self.segments));
        }
        self.vertices
            .extend(shapes::circle(center, radius, color, self.segments));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba, glow: Option<f32>) {
        if let Some(blur) = glow {
            self.vertices
                .extend(shapes::rect_glow(origin, size, blur, color));
        }
        self.vertices.extend(shapes::rect(origin, size, color));
    }

    fn draw_text(&mut self, text: &str, at: Vec2, align: TextAlign, color: Rgba) {
        self.text.push(TextItem {
            text: text.to_string(),
            at,
            align,
            color,
        });
    }
}
