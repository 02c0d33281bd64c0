use std::sync::Arc;

use keystone_scene::{Entity, World};
use tracing::{trace, warn};

use crate::anim::SkeletalAnim;
use crate::clip::SkeletalAnimClip;
use crate::error::AnimError;
use crate::renderer::SkinnedMeshRenderer;

/// Drives the skeleton of the [`SkinnedMeshRenderer`] on the same entity.
#[derive(Debug, Clone)]
pub struct AnimatorComponent {
    owner: Entity,
    clip: SkeletalAnimClip,
}

impl AnimatorComponent {
    /// Bind `anim` to the skeleton of `owner`'s renderer.
    pub fn new(world: &World, owner: Entity, anim: Arc<SkeletalAnim>) -> Result<Self, AnimError> {
        let renderer = world
            .get::<SkinnedMeshRenderer>(owner)
            .ok_or(AnimError::MissingRenderer(owner))?;
        Ok(Self {
            owner,
            clip: SkeletalAnimClip::new(anim, renderer.skeleton())?,
        })
    }

    /// Advance the clip, pose the skeleton, run FK, and refresh skinning matrices.
    ///
    /// `renderer` must be the owner's; the clip's joint bindings index its skeleton.
    pub fn update(&mut self, renderer: &mut SkinnedMeshRenderer, dt: f32) {
        debug_assert!(
            self.clip.bindings_fit(renderer.skeleton()),
            "animator for {} driven with a foreign skeleton",
            self.owner
        );
        self.clip.update(dt);
        let skeleton = renderer.skeleton_mut();
        self.clip.apply(skeleton);
        skeleton.do_fk();
        renderer.update_joint_matrices();
    }

    pub fn owner(&self) -> Entity {
        self.owner
    }

    pub fn clip(&self) -> &SkeletalAnimClip {
        &self.clip
    }

    pub fn is_playing(&self) -> bool {
        self.clip.is_playing()
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.clip.set_playing(playing);
    }

    pub fn is_looping(&self) -> bool {
        self.clip.is_looping()
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.clip.set_looping(looping);
    }

    pub fn set_speed_multiplier(&mut self, speed: f32) {
        self.clip.set_speed_multiplier(speed);
    }

    /// Rewind the clip to its first frame.
    pub fn reset_playhead(&mut self) {
        self.clip.reset_playhead();
    }
}

/// Per-frame system: update every animator whose entity still has a renderer.
///
/// Returns the number of animators updated.
pub fn animate(world: &mut World, dt: f32) -> usize {
    let mut updated = 0;
    for entity in world.entities_with::<AnimatorComponent>() {
        let ran = world.with_pair_mut::<AnimatorComponent, SkinnedMeshRenderer, _>(
            entity,
            |animator, renderer| animator.update(renderer, dt),
        );
        match ran {
            Some(()) => updated += 1,
            None => warn!("Animator on {entity} has no SkinnedMeshRenderer; skipped"),
        }
    }
    trace!("Animated {updated} entities");
    updated
}
