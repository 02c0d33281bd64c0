//! Keystone Scene - Entities and components
//!
//! Entities are generational indices. Each component type lives in its own
//! column indexed by entity slot.

mod entity;
mod world;

pub use entity::Entity;
pub use world::{Component, World};
