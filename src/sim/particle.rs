//! Brick-break particle bursts
//!
//! Purely visual: particles never feed back into gameplay.

use glam::Vec2;
use rand::Rng;

use crate::Rgba;

/// A single fading particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Rgba,
    /// 1.0 at spawn, removed once it reaches 0
    pub alpha: f32,
}

/// The live particle set
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    /// Maximum live particles; the oldest are dropped past this
    capacity: usize,
    /// Opacity lost per nominal frame
    fade: f32,
    /// Full width of the per-axis velocity range
    spread: f32,
}

impl ParticleSystem {
    pub fn new(capacity: usize, fade: f32, spread: f32) -> Self {
        Self {
            particles: Vec::new(),
            capacity,
            fade,
            spread,
        }
    }

    /// Emit `count` particles at `pos` with random velocity and size
    pub fn spawn(&mut self, pos: Vec2, color: Rgba, count: usize, rng: &mut impl Rng) {
        let count = count.min(self.capacity);
        let overflow = (self.particles.len() + count).saturating_sub(self.capacity);
        if overflow > 0 {
            self.particles.drain(..overflow);
        }

        for _ in 0..count {
            let radius = rng.random::<f32>() * 2.0 + 1.0;
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * self.spread,
                (rng.random::<f32>() - 0.5) * self.spread,
            );
            self.particles.push(Particle {
                pos,
                vel,
                radius,
                color,
                alpha: 1.0,
            });
        }
    }

    /// Move and fade every particle once, dropping the ones that faded out
    pub fn tick(&mut self, dt_scale: f32) {
        let fade = self.fade * dt_scale;
        self.particles.retain_mut(|p| {
            p.pos += p.vel * dt_scale;
            p.alpha -= fade;
            p.alpha > 0.0
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Change the cap, dropping the oldest particles that no longer fit
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        let overflow = self.particles.len().saturating_sub(capacity);
        if overflow > 0 {
            self.particles.drain(..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const RED: Rgba = [1.0, 0.0, 0.0, 1.0];

    fn system() -> ParticleSystem {
        ParticleSystem::new(256, 0.02, 5.0)
    }

    #[test]
    fn test_spawn_burst() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ps = system();
        ps.spawn(Vec2::new(10.0, 20.0), RED, 10, &mut rng);
        assert_eq!(ps.len(), 10);
        for p in ps.iter() {
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
            assert_eq!(p.alpha, 1.0);
            assert_eq!(p.color, RED);
            assert!(p.radius >= 1.0 && p.radius < 3.0);
            assert!(p.vel.x.abs() <= 2.5 && p.vel.y.abs() <= 2.5);
        }
    }

    #[test]
    fn test_tick_moves_and_fades() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ps = system();
        ps.spawn(Vec2::ZERO, RED, 1, &mut rng);
        let vel = ps.iter().next().unwrap().vel;
        ps.tick(2.0);
        let p = ps.iter().next().unwrap();
        assert_eq!(p.pos, vel * 2.0);
        assert!((p.alpha - 0.96).abs() < 1e-6);
    }

    #[test]
    fn test_faded_particles_are_removed() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ps = system();
        ps.spawn(Vec2::ZERO, RED, 10, &mut rng);
        // Fades out after about 50 nominal frames
        for _ in 0..49 {
            ps.tick(1.0);
        }
        assert!(!ps.is_empty());
        ps.tick(1.0);
        ps.tick(1.0);
        assert!(ps.is_empty());
    }

    #[test]
    fn test_every_particle_ticks_once_while_removing() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ps = system();
        ps.spawn(Vec2::ZERO, RED, 3, &mut rng);
        ps.tick(45.0); // alpha 0.1
        ps.spawn(Vec2::ZERO, RED, 3, &mut rng);
        // Old ones fade out this tick, new ones must still each lose 0.2
        ps.tick(10.0);
        assert_eq!(ps.len(), 3);
        for p in ps.iter() {
            assert!((p.alpha - 0.8).abs() < 1e-5);
        }
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ps = ParticleSystem::new(15, 0.02, 5.0);
        ps.spawn(Vec2::ZERO, RED, 10, &mut rng);
        ps.tick(1.0);
        ps.spawn(Vec2::ONE, RED, 10, &mut rng);
        assert_eq!(ps.len(), 15);
        // The five survivors of the first burst come first, then the new burst
        assert_eq!(ps.iter().filter(|p| p.alpha == 1.0).count(), 10);
    }

    #[test]
    fn test_zero_capacity_spawns_nothing() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ps = ParticleSystem::new(0, 0.02, 5.0);
        ps.spawn(Vec2::ZERO, RED, 10, &mut rng);
        assert!(ps.is_empty());
    }

    #[test]
    fn test_shrinking_capacity_keeps_newest() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ps = system();
        ps.spawn(Vec2::ZERO, RED, 6, &mut rng);
        ps.tick(1.0);
        ps.spawn(Vec2::ONE, RED, 4, &mut rng);

        ps.set_capacity(4);
        assert_eq!(ps.len(), 4);
        assert!(ps.iter().all(|p| p.pos == Vec2::ONE));

        ps.set_capacity(0);
        assert!(ps.is_empty());
        ps.spawn(Vec2::ZERO, RED, 3, &mut rng);
        assert!(ps.is_empty());
    }
}
