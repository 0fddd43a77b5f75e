//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in field pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::Rgba;

/// Halo layers drawn for a glow
pub const GLOW_LAYERS: u32 = 4;
/// Peak opacity of the innermost halo layer, relative to the shape
const GLOW_STRENGTH: f32 = 0.35;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Rgba,
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let (sin1, cos1) = theta1.sin_cos();
        let (sin2, cos2) = theta2.sin_cos();
        let inner1 = center + Vec2::new(cos1, sin1) * inner_radius;
        let outer1 = center + Vec2::new(cos1, sin1) * outer_radius;
        let inner2 = center + Vec2::new(cos2, sin2) * inner_radius;
        let outer2 = center + Vec2::new(cos2, sin2) * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(origin: Vec2, size: Vec2, color: Rgba) -> Vec<Vertex> {
    let (x0, y0) = (origin.x, origin.y);
    let (x1, y1) = (origin.x + size.x, origin.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Opacity of halo `layer` (1 = innermost)
fn glow_alpha(color: Rgba, layer: u32) -> Rgba {
    let falloff = 1.0 - layer as f32 / (GLOW_LAYERS + 1) as f32;
    [color[0], color[1], color[2], color[3] * GLOW_STRENGTH * falloff]
}

/// Soft halo around a circle, out to `radius + blur`
pub fn circle_glow(center: Vec2, radius: f32, blur: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    if blur <= 0.0 {
        return Vec::new();
    }
    let step = blur / GLOW_LAYERS as f32;
    let mut vertices = Vec::new();
    for layer in 1..=GLOW_LAYERS {
        let inner = radius + step * (layer - 1) as f32;
        vertices.extend(ring(center, inner, inner + step, glow_alpha(color, layer), segments));
    }
    vertices
}

/// Soft halo around a rectangle: stacked frames, each `blur / GLOW_LAYERS` wide
pub fn rect_glow(origin: Vec2, size: Vec2, blur: f32, color: Rgba) -> Vec<Vertex> {
    if blur <= 0.0 {
        return Vec::new();
    }
    let step = blur / GLOW_LAYERS as f32;
    let mut vertices = Vec::new();
    for layer in 1..=GLOW_LAYERS {
        let inner = step * (layer - 1) as f32;
        let c = glow_alpha(color, layer);
        let min = origin - Vec2::splat(inner);
        let max = origin + size + Vec2::splat(inner);
        let w = max.x - min.x;
        let h = max.y - min.y;
        // Top, bottom, left, right bands
        vertices.extend(rect(Vec2::new(min.x - step, min.y - step), Vec2::new(w + 2.0 * step, step), c));
        vertices.extend(rect(Vec2::new(min.x - step, max.y), Vec2::new(w + 2.0 * step, step), c));
        vertices.extend(rect(Vec2::new(min.x - step, min.y), Vec2::new(step, h), c));
        vertices.extend(rect(Vec2::new(max.x, min.y), Vec2::new(step, h), c));
    }
    vertices
}
