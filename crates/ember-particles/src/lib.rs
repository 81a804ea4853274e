//! Ember Particles - pooled 2D particle simulation
//!
//! A fixed-capacity, swap-remove particle pool advanced by a per-frame
//! `update`, with:
//! - frame-rate-independent emission via fractional residue accumulation
//! - radial/tangential acceleration, gravity, spin, and size/color
//!   interpolation sampled per particle at spawn
//! - optional fixed-substep stepping and bounding-box tracking
//! - spawn descriptors decoded from TOML or the packed editor format
//! - a manager arena that reclaims drained systems by index swap
//!
//! Rendering is out of scope: `instances()` yields plain packed data for
//! whatever renderer the host application uses.

pub mod info;
pub mod manager;
pub mod particle;
pub mod rand;
pub mod system;

pub use info::{ParticleSystemInfo, LIFETIME_INFINITE, PACKED_SIZE};
pub use manager::{ParticleManager, MAX_SYSTEMS};
pub use particle::{Particle, ParticleInstance, ParticlePool, MAX_PARTICLES};
pub use rand::ParticleRng;
pub use system::{ParticleSystem, AGE_INFINITE, AGE_STOPPED};
