//! Collision detection and response for axis-aligned shapes
//!
//! The ball is tested by its bounding box, never a single point, so a ball
//! grazing a corner still registers.

use glam::Vec2;

/// Axis-aligned box in field pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box with a top-left origin and a size
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Bounding box of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: boxes that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// Where along the paddle the ball struck: -1 = left edge, 0 = center, 1 = right edge
///
/// Hits past the edges (the ball overhangs by up to its radius) clamp to ±1.
#[inline]
pub fn normalized_hit(ball_x: f32, paddle: &Aabb) -> f32 {
    let half_width = paddle.width() / 2.0;
    if half_width <= 0.0 {
        return 0.0;
    }
    ((ball_x - paddle.center().x) / half_width).clamp(-1.0, 1.0)
}

/// Outgoing ball velocity after a paddle hit
///
/// The deflection angle is measured from vertical and grows linearly with
/// the hit offset up to `max_angle`. The result always points upward and
/// has magnitude `speed`.
pub fn paddle_bounce_velocity(ball_x: f32, paddle: &Aabb, speed: f32, max_angle: f32) -> Vec2 {
    let angle = normalized_hit(ball_x, paddle) * max_angle;
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_3;

    fn paddle() -> Aabb {
        Aabb::from_origin_size(Vec2::new(350.0, 570.0), Vec2::new(100.0, 10.0))
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::from_origin_size(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Aabb::from_origin_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let crossing = Aabb::from_origin_size(Vec2::new(9.5, 5.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&crossing));
        assert!(crossing.overlaps(&a));
    }

    #[test]
    fn test_around_circle() {
        let b = Aabb::around_circle(Vec2::new(50.0, 40.0), 10.0);
        assert_eq!(b.min, Vec2::new(40.0, 30.0));
        assert_eq!(b.max, Vec2::new(60.0, 50.0));
    }

    #[test]
    fn test_center_hit_goes_straight_up() {
        let v = paddle_bounce_velocity(400.0, &paddle(), 6.0, FRAC_PI_3);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y + 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_edge_hits_deflect_sixty_degrees() {
        let right = paddle_bounce_velocity(450.0, &paddle(), 6.0, FRAC_PI_3);
        assert!((right.x - 6.0 * FRAC_PI_3.sin()).abs() < 1e-4);
        assert!((right.y + 6.0 * FRAC_PI_3.cos()).abs() < 1e-4);

        let left = paddle_bounce_velocity(350.0, &paddle(), 6.0, FRAC_PI_3);
        assert!((left.x + right.x).abs() < 1e-4);
        assert!(left.y < 0.0);
    }

    #[test]
    fn test_overhanging_hit_is_clamped() {
        let p = paddle();
        assert_eq!(normalized_hit(458.0, &p), 1.0);
        assert_eq!(normalized_hit(342.0, &p), -1.0);
        let v = paddle_bounce_velocity(458.0, &p, 6.0, FRAC_PI_3);
        assert!((v.length() - 6.0).abs() < 1e-4);
    }
}
