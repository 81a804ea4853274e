//! Particle types: simulation state, fixed-capacity pool, render instance data

use bytemuck::{Pod, Zeroable};
use ember_core::{Color, Vec2};

/// Fixed pool capacity per system
pub const MAX_PARTICLES: usize = 500;

/// One live particle. Created and destroyed by the pool only; all rate
/// fields are sampled once at spawn.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,

    pub gravity: f32,
    pub radial_accel: f32,
    pub tangential_accel: f32,

    pub spin: f32,
    pub spin_delta: f32,
    pub size: f32,
    pub size_delta: f32,
    pub color: Color,
    pub color_delta: Color,

    /// Seconds since spawn
    pub age: f32,
    /// Sampled lifetime; the particle is retired once age reaches this
    pub terminal_age: f32,
}

impl Particle {
    pub fn dead() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity: 0.0,
            radial_accel: 0.0,
            tangential_accel: 0.0,
            spin: 0.0,
            spin_delta: 0.0,
            size: 0.0,
            size_delta: 0.0,
            color: Color::TRANSPARENT,
            color_delta: Color::TRANSPARENT,
            age: 0.0,
            terminal_age: 0.0,
        }
    }
}

/// GPU/renderer instance data for one particle.
/// 32 bytes, two vec4 rows.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// x, y = world position, z = rotation (radians), w = uniform scale
    pub pos_rot_size: [f32; 4],
    /// rgba
    pub color: [f32; 4],
}

impl ParticleInstance {
    /// Pack a particle for drawing. `offset` is the system's render-space
    /// transposition; rotation accumulates as spin over the particle's life.
    pub fn from_particle(p: &Particle, offset: Vec2) -> Self {
        Self {
            pos_rot_size: [
                p.position.x + offset.x,
                p.position.y + offset.y,
                p.spin * p.age,
                p.size,
            ],
            color: p.color.to_array(),
        }
    }
}

/// Swap-remove pool: contiguous storage with a live-count cursor for O(1)
/// retirement and cache-friendly iteration over the live prefix.
pub struct ParticlePool {
    particles: Box<[Particle]>,
    alive_count: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![Particle::dead(); capacity].into_boxed_slice(),
            alive_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn is_full(&self) -> bool {
        self.alive_count >= self.particles.len()
    }

    /// Claim the next free slot, returning a mutable ref to initialize it.
    /// Returns None when the pool is full — exhaustion is not an error.
    pub fn spawn(&mut self) -> Option<&mut Particle> {
        if self.is_full() {
            return None;
        }
        let idx = self.alive_count;
        self.alive_count += 1;
        Some(&mut self.particles[idx])
    }

    /// Retire the particle at `index` by swapping the last live particle
    /// into its slot. The caller must re-examine `index` afterwards since
    /// it now holds a different live particle.
    pub fn retire(&mut self, index: usize) {
        debug_assert!(index < self.alive_count);
        self.alive_count -= 1;
        self.particles.swap(index, self.alive_count);
    }

    /// Drop all live particles at once
    pub fn clear(&mut self) {
        self.alive_count = 0;
    }

    /// Live particles (first `alive_count` slots)
    pub fn alive(&self) -> &[Particle] {
        &self.particles[..self.alive_count]
    }

    /// Live particles, mutable
    pub fn alive_mut(&mut self) -> &mut [Particle] {
        &mut self.particles[..self.alive_count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_spawn_and_retire() {
        let mut pool = ParticlePool::new(4);
        assert_eq!(pool.alive_count(), 0);

        for i in 0..3 {
            let p = pool.spawn().unwrap();
            p.terminal_age = 1.0;
            p.age = 0.0;
            p.position.x = i as f32;
        }
        assert_eq!(pool.alive_count(), 3);

        // Retire the middle one; the last particle takes its slot
        pool.retire(1);
        assert_eq!(pool.alive_count(), 2);
        assert!((pool.alive()[1].position.x - 2.0).abs() < 1e-6);

        // Fill to capacity — spawn then fails silently
        pool.spawn().unwrap();
        pool.spawn().unwrap();
        assert!(pool.is_full());
        assert!(pool.spawn().is_none());

        pool.clear();
        assert_eq!(pool.alive_count(), 0);
        assert_eq!(pool.capacity(), 4);
    }

    #[test]
    fn particle_instance_layout() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 32);
        assert_eq!(std::mem::align_of::<ParticleInstance>(), 4);
    }

    #[test]
    fn particle_instance_applies_offset_and_rotation() {
        let mut p = Particle::dead();
        p.position = Vec2::new(1.0, 2.0);
        p.spin = 2.0;
        p.age = 0.5;
        p.size = 3.0;
        let inst = ParticleInstance::from_particle(&p, Vec2::new(10.0, 20.0));
        assert!((inst.pos_rot_size[0] - 11.0).abs() < 1e-6);
        assert!((inst.pos_rot_size[1] - 22.0).abs() < 1e-6);
        assert!((inst.pos_rot_size[2] - 1.0).abs() < 1e-6);
        assert!((inst.pos_rot_size[3] - 3.0).abs() < 1e-6);
    }
}
