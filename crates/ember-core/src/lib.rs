//! Ember Core - Foundational types for the Ember particle toolkit
//!
//! This crate provides the types the rest of the workspace depends on:
//! - `Vec2` - 2D vector math for the particle integrator
//! - `Color` - RGBA color with component-wise arithmetic
//! - `Rect` - Axis-aligned bounding rectangle with point accumulation
//! - Error types and Result alias

mod error;
mod types;

pub use error::{EmberError, Result};
pub use types::{Color, Rect, Vec2};
