//! Keystone Anim - Skeletal animation
//!
//! An [`AnimatorComponent`] sits on an entity next to its [`SkinnedMeshRenderer`] and,
//! each frame, advances a clip, poses the renderer's skeleton, resolves forward
//! kinematics and refreshes the skinning matrices.

mod anim;
mod animator;
mod clip;
mod error;
mod renderer;
mod skeleton;

#[cfg(test)]
mod fixtures;

pub use anim::{JointChannel, Keyframe, SkeletalAnim};
pub use animator::{animate, AnimatorComponent};
pub use clip::SkeletalAnimClip;
pub use error::AnimError;
pub use renderer::SkinnedMeshRenderer;
pub use skeleton::{Joint, Skeleton};
