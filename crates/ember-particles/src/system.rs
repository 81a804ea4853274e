//! The particle simulation: spawn, physics integration, aging, retirement

use crate::info::{ParticleSystemInfo, LIFETIME_INFINITE};
use crate::particle::{Particle, ParticleInstance, ParticlePool, MAX_PARTICLES};
use crate::rand::ParticleRng;
use ember_core::{Color, Rect, Vec2};
use std::f32::consts::FRAC_PI_2;

/// System age sentinel: stopped/dormant, not spawning
pub const AGE_STOPPED: f32 = -2.0;
/// System age sentinel: running with no lifetime limit
pub const AGE_INFINITE: f32 = -1.0;

/// Uniform jitter (units) applied on each axis to spawn positions
const SPAWN_JITTER: f32 = 2.0;

/// A bounded pool of particles advanced by `update`, engine-agnostic.
///
/// The system owns its pool and random source exclusively; `update` is
/// called once per frame from a caller-owned loop. Rendering happens
/// elsewhere, against the data `pack_instances` produces.
pub struct ParticleSystem {
    info: ParticleSystemInfo,
    rng: ParticleRng,
    pool: ParticlePool,

    location: Vec2,
    prev_location: Vec2,
    transposition: Vec2,

    /// `AGE_STOPPED`, `AGE_INFINITE`, or elapsed seconds of a finite run
    age: f32,
    /// Fractional particle carried to the next step
    emission_residue: f32,
    /// Fixed substep length in seconds; 0 steps by raw frame delta
    update_interval: f32,
    /// Accumulated time not yet consumed by fixed substeps
    update_residue: f32,

    track_bounds: bool,
    bounds: Rect,
}

impl ParticleSystem {
    /// Create a dormant system. Call `fire` or `fire_at` to start spawning.
    pub fn new(info: ParticleSystemInfo, rng: ParticleRng) -> Self {
        Self {
            info,
            rng,
            pool: ParticlePool::new(MAX_PARTICLES),
            location: Vec2::ZERO,
            prev_location: Vec2::ZERO,
            transposition: Vec2::ZERO,
            age: AGE_STOPPED,
            emission_residue: 0.0,
            update_interval: 0.0,
            update_residue: 0.0,
            track_bounds: false,
            bounds: Rect::new(),
        }
    }

    pub fn info(&self) -> &ParticleSystemInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut ParticleSystemInfo {
        &mut self.info
    }

    pub fn location(&self) -> Vec2 {
        self.location
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn alive_count(&self) -> usize {
        self.pool.alive_count()
    }

    /// Stopped with no particles left to age out; an owning manager may
    /// reclaim the system.
    pub fn is_done(&self) -> bool {
        self.age == AGE_STOPPED && self.pool.alive_count() == 0
    }

    /// Step the simulation at a fixed rate regardless of frame delta.
    /// An interval of 0 (the default) steps once per `update` call.
    pub fn set_update_interval(&mut self, seconds: f32) {
        self.update_interval = seconds.max(0.0);
        self.update_residue = 0.0;
    }

    /// Enable or disable bounding-box accumulation
    pub fn track_bounds(&mut self, enabled: bool) {
        self.track_bounds = enabled;
        if !enabled {
            self.bounds.clear();
        }
    }

    /// Bounding rect of live particle positions from the last step.
    /// Empty unless tracking is enabled.
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    /// Render-space shift applied when packing instances
    pub fn transpose(&mut self, x: f32, y: f32) {
        self.transposition = Vec2::new(x, y);
    }

    /// Start spawning at the current location
    pub fn fire(&mut self) {
        if self.info.lifetime == LIFETIME_INFINITE {
            self.age = AGE_INFINITE;
        } else {
            self.age = 0.0;
        }
        self.emission_residue = 0.0;
        self.update_residue = 0.0;
    }

    /// Start spawning at `(x, y)`. The previous location is discarded, so
    /// the first step spawns from the new point rather than along a
    /// motion segment.
    pub fn fire_at(&mut self, x: f32, y: f32) {
        self.stop(false);
        self.move_to(x, y, false);
        self.fire();
    }

    /// Halt spawning. With `kill_particles`, live particles and the
    /// bounding box are cleared immediately; otherwise they age out.
    pub fn stop(&mut self, kill_particles: bool) {
        self.age = AGE_STOPPED;
        if kill_particles {
            self.pool.clear();
            self.bounds.clear();
        }
    }

    /// Reposition the emission point.
    ///
    /// With `move_particles`, every live particle is dragged by the same
    /// delta. Otherwise the old location becomes the interpolation start
    /// for the next step's spawns (or is discarded when dormant).
    pub fn move_to(&mut self, x: f32, y: f32, move_particles: bool) {
        let new_location = Vec2::new(x, y);
        if move_particles {
            let delta = new_location - self.location;
            for p in self.pool.alive_mut() {
                p.position += delta;
            }
            self.prev_location += delta;
        } else if self.age == AGE_STOPPED {
            self.prev_location = new_location;
        } else {
            self.prev_location = self.location;
        }
        self.location = new_location;
    }

    /// Advance the simulation by `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) {
        if self.update_interval > 0.0 {
            self.update_residue += delta_time;
            while self.update_residue >= self.update_interval {
                self.step(self.update_interval);
                self.update_residue -= self.update_interval;
            }
        } else {
            self.step(delta_time);
        }
    }

    /// Pack live particles for an instanced renderer
    pub fn pack_instances(&self, out: &mut Vec<ParticleInstance>) {
        for p in self.pool.alive() {
            out.push(ParticleInstance::from_particle(p, self.transposition));
        }
    }

    pub fn instances(&self) -> Vec<ParticleInstance> {
        let mut out = Vec::with_capacity(self.pool.alive_count());
        self.pack_instances(&mut out);
        out
    }

    /// One simulation step. The phase order is load-bearing: aging gates
    /// this step's spawning, integration sees only particles spawned in
    /// earlier steps, and the previous location must not advance until
    /// spawning has interpolated along the motion segment.
    fn step(&mut self, dt: f32) {
        // System aging. Reaching the lifetime stops spawning; live
        // particles still age out on their own.
        if self.age >= 0.0 {
            self.age += dt;
            if self.age >= self.info.lifetime {
                self.age = AGE_STOPPED;
            }
        }

        if self.track_bounds {
            self.bounds.clear();
        }

        // Integrate and retire the live prefix
        let mut i = 0;
        while i < self.pool.alive_count() {
            let p = &mut self.pool.alive_mut()[i];
            p.age += dt;
            if p.age >= p.terminal_age {
                // Swap-remove; the slot now holds a different particle,
                // so do not advance i
                self.pool.retire(i);
                continue;
            }

            // Radial direction is undefined when the particle sits on the
            // emission point; normalized() yields ZERO there, so neither
            // acceleration contributes that step.
            let radial_dir = (p.position - self.location).normalized();
            let accel = radial_dir * p.radial_accel
                + radial_dir.rotated_90() * p.tangential_accel;
            p.velocity += accel * dt;
            p.velocity.y += p.gravity * dt;
            p.position += p.velocity * dt;

            p.spin += p.spin_delta * dt;
            p.size += p.size_delta * dt;
            p.color += p.color_delta * dt;

            let position = p.position;
            if self.track_bounds {
                self.bounds.encapsulate(position);
            }
            i += 1;
        }

        // Spawn, unless stopped. Fractional emission carries to the next
        // step so spawn rate is independent of frame rate.
        if self.age != AGE_STOPPED {
            let particles_needed = self.info.emission * dt + self.emission_residue;
            let particles_created = particles_needed.floor();
            self.emission_residue = particles_needed - particles_created;

            for _ in 0..particles_created as u32 {
                if !self.spawn_particle() {
                    // Pool exhausted; truncate this step's emission
                    break;
                }
            }
        }

        self.prev_location = self.location;
    }

    /// Sample and emit one particle. Returns false when the pool is full.
    fn spawn_particle(&mut self) -> bool {
        let Some(p) = self.pool.spawn() else {
            return false;
        };

        let info = &self.info;
        let rng = &mut self.rng;

        let terminal_age = rng.range(info.particle_life_min, info.particle_life_max);

        // Spawn along the segment travelled since the last step, plus a
        // small jitter so point emitters do not produce a visible line
        let mut position =
            self.prev_location + (self.location - self.prev_location) * rng.next_f32();
        position.x += rng.range(-SPAWN_JITTER, SPAWN_JITTER);
        position.y += rng.range(-SPAWN_JITTER, SPAWN_JITTER);

        let mut angle =
            info.direction - FRAC_PI_2 + rng.range(0.0, info.spread) - info.spread / 2.0;
        if info.relative {
            angle += (self.prev_location - self.location).angle() + FRAC_PI_2;
        }
        let velocity = Vec2::from_angle(angle) * rng.range(info.speed_min, info.speed_max);

        let gravity = rng.range(info.gravity_min, info.gravity_max);
        let radial_accel = rng.range(info.radial_accel_min, info.radial_accel_max);
        let tangential_accel =
            rng.range(info.tangential_accel_min, info.tangential_accel_max);

        // Start values are sampled between the configured start and a
        // variance-scaled point toward the end; deltas are chosen so each
        // attribute lands on its end value exactly at terminal_age
        let size = rng.range(
            info.size_start,
            info.size_start + (info.size_end - info.size_start) * info.size_var,
        );
        let size_delta = (info.size_end - size) / terminal_age;

        let spin = rng.range(
            info.spin_start,
            info.spin_start + (info.spin_end - info.spin_start) * info.spin_var,
        );
        let spin_delta = (info.spin_end - spin) / terminal_age;

        let start = info.color_start;
        let end = info.color_end;
        let color = Color::new(
            rng.range(start.r, start.r + (end.r - start.r) * info.color_var),
            rng.range(start.g, start.g + (end.g - start.g) * info.color_var),
            rng.range(start.b, start.b + (end.b - start.b) * info.color_var),
            rng.range(start.a, start.a + (end.a - start.a) * info.alpha_var),
        );
        let color_delta = Color::new(
            (end.r - color.r) / terminal_age,
            (end.g - color.g) / terminal_age,
            (end.b - color.b) / terminal_age,
            (end.a - color.a) / terminal_age,
        );

        *p = Particle {
            position,
            velocity,
            gravity,
            radial_accel,
            tangential_accel,
            spin,
            spin_delta,
            size,
            size_delta,
            color,
            color_delta,
            age: 0.0,
            terminal_age,
        };

        if self.track_bounds {
            self.bounds.encapsulate(position);
        }
        true
    }
}
