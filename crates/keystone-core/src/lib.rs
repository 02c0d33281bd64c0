//! Keystone Core - Shared types for the Keystone engine samples
//!
//! This crate provides the foundational types used by the other crates:
//! - Mathematical primitives (re-exported from glam)
//! - `Transform` for joint and entity poses
//! - `FrameClock` for per-frame delta time

pub mod clock;
pub mod transform;

pub use clock::{ClockConfig, FrameClock};
pub use glam::{Mat4, Quat, Vec3};
pub use transform::Transform;
