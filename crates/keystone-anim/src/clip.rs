use std::sync::Arc;

use glam::{Quat, Vec3};
use tracing::warn;

use crate::anim::{sample_rotation, sample_translation, SkeletalAnim};
use crate::error::AnimError;
use crate::skeleton::Skeleton;

/// Sampled pose for one bound channel.
#[derive(Debug, Clone, Copy, Default)]
struct JointPose {
    translation: Option<Vec3>,
    rotation: Option<Quat>,
    scale: Option<Vec3>,
}

/// Plays a [`SkeletalAnim`] against one skeleton: owns the playhead, the
/// playing/looping flags and the speed multiplier.
#[derive(Debug, Clone)]
pub struct SkeletalAnimClip {
    anim: Arc<SkeletalAnim>,
    /// Joint index for each channel of `anim`, or `None` if the skeleton lacks it.
    bindings: Vec<Option<usize>>,
    pose: Vec<JointPose>,
    time: f32,
    playing: bool,
    looping: bool,
    speed: f32,
}

impl SkeletalAnimClip {
    /// Bind the animation's channels to `skeleton`'s joints by name.
    ///
    /// The clip starts playing and looping at normal speed. Fails with
    /// [`AnimError::InvalidClip`] if `anim` does not validate.
    pub fn new(anim: Arc<SkeletalAnim>, skeleton: &Skeleton) -> Result<Self, AnimError> {
        anim.validate()?;
        let bindings: Vec<Option<usize>> = anim
            .channels
            .iter()
            .map(|channel| {
                let joint = skeleton.find(&channel.joint);
                if joint.is_none() {
                    warn!(
                        "Animation '{}' drives joint '{}', which the skeleton lacks",
                        anim.name, channel.joint
                    );
                }
                joint
            })
            .collect();
        let mut clip = Self {
            pose: vec![JointPose::default(); bindings.len()],
            bindings,
            anim,
            time: 0.0,
            playing: true,
            looping: true,
            speed: 1.0,
        };
        clip.sample();
        Ok(clip)
    }

    /// Advance the playhead by `dt * speed` and sample the pose.
    ///
    /// A looping clip wraps at either end. A one-shot clip clamps and stops.
    pub fn update(&mut self, dt: f32) {
        let step = dt * self.speed;
        if !step.is_finite() {
            warn!("Ignoring non-finite step {step} for animation '{}'", self.anim.name);
        } else if self.playing {
            let duration = self.anim.duration;
            self.time += step;
            if self.time >= duration || self.time < 0.0 {
                if self.looping {
                    self.time = self.time.rem_euclid(duration);
                } else {
                    self.time = self.time.clamp(0.0, duration);
                    self.playing = false;
                }
            }
        }
        self.sample();
    }

    fn sample(&mut self) {
        for (pose, channel) in self.pose.iter_mut().zip(&self.anim.channels) {
            *pose = JointPose {
                translation: sample_translation(&channel.translation, self.time),
                rotation: sample_rotation(&channel.rotation, self.time),
                scale: sample_translation(&channel.scale, self.time),
            };
        }
    }

    /// Write the sampled pose into the skeleton's local transforms.
    pub fn apply(&self, skeleton: &mut Skeleton) {
        for (pose, binding) in self.pose.iter().zip(&self.bindings) {
            let Some(joint) = binding.and_then(|index| skeleton.joint_mut(index)) else {
                continue;
            };
            if let Some(translation) = pose.translation {
                joint.local.translation = translation;
            }
            if let Some(rotation) = pose.rotation {
                joint.local.rotation = rotation.normalize();
            }
            if let Some(scale) = pose.scale {
                joint.local.scale = scale;
            }
        }
    }

    /// Whether every bound channel still names the same joint in `skeleton`.
    pub(crate) fn bindings_fit(&self, skeleton: &Skeleton) -> bool {
        self.bindings
            .iter()
            .zip(&self.anim.channels)
            .all(|(binding, channel)| match binding {
                Some(index) => skeleton.joint(*index).is_some_and(|j| j.name == channel.joint),
                None => true,
            })
    }

    /// Rewind the playhead to the start of the clip.
    pub fn reset_playhead(&mut self) {
        self.time = 0.0;
        self.sample();
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn duration(&self) -> f32 {
        self.anim.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed_multiplier(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn anim(&self) -> &SkeletalAnim {
        &self.anim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::skeleton::Joint;
    use keystone_core::Transform;

    fn clip() -> (SkeletalAnimClip, Skeleton) {
        let skeleton = fixtures::arm();
        (SkeletalAnimClip::new(fixtures::slide(), &skeleton).unwrap(), skeleton)
    }

    #[test]
    fn advances_by_speed() {
        let (mut clip, _) = clip();
        clip.set_speed_multiplier(2.0);
        clip.update(0.25);
        assert!((clip.time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn looping_wraps() {
        let (mut clip, _) = clip();
        clip.update(1.25);
        assert!(clip.is_playing());
        assert!((clip.time() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn one_shot_clamps_and_stops() {
        let (mut clip, _) = clip();
        clip.set_looping(false);
        clip.update(3.0);
        assert_eq!(clip.time(), clip.duration());
        assert!(!clip.is_playing());
        clip.update(1.0);
        assert_eq!(clip.time(), clip.duration());
    }

    #[test]
    fn reverse_playback_wraps_at_start() {
        let (mut clip, _) = clip();
        clip.set_speed_multiplier(-1.0);
        clip.update(0.25);
        assert!((clip.time() - 0.75).abs() < 1e-5);
    }

    #[test]
    fn paused_clip_holds_time() {
        let (mut clip, _) = clip();
        clip.update(0.5);
        clip.set_playing(false);
        clip.update(0.3);
        assert!((clip.time() - 0.5).abs() < 1e-6);
        clip.reset_playhead();
        assert_eq!(clip.time(), 0.0);
    }

    #[test]
    fn apply_poses_bound_joints_only() {
        let (mut clip, mut skeleton) = clip();
        clip.update(0.5);
        clip.apply(&mut skeleton);
        let elbow = skeleton.joint(1).unwrap();
        assert!(elbow.local.translation.abs_diff_eq(Vec3::new(1.0, 0.5, 0.0), 1e-5));
        // The wrist has no channel and the "tail" channel has no joint.
        assert_eq!(skeleton.joint(2).unwrap().local.translation, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn bindings_fit_only_the_bound_skeleton() {
        let (clip, skeleton) = clip();
        assert!(clip.bindings_fit(&skeleton));
        let other = Skeleton::new(vec![
            Joint::new("root", None, Transform::IDENTITY),
            Joint::new("elbow", Some(0), Transform::IDENTITY),
        ])
        .unwrap();
        assert!(clip.bindings_fit(&other));
        let foreign = Skeleton::new(vec![
            Joint::new("root", None, Transform::IDENTITY),
            Joint::new("knee", Some(0), Transform::IDENTITY),
        ])
        .unwrap();
        assert!(!clip.bindings_fit(&foreign));
    }

    #[test]
    fn zero_length_animation_is_rejected() {
        let mut anim = (*fixtures::slide()).clone();
        anim.duration = 0.0;
        let err = SkeletalAnimClip::new(Arc::new(anim), &fixtures::arm()).unwrap_err();
        assert!(matches!(err, AnimError::InvalidClip(name, _) if name == "slide"));
    }

    #[test]
    fn non_finite_step_leaves_playhead() {
        let (mut clip, mut skeleton) = clip();
        clip.update(0.5);
        clip.update(f32::NAN);
        clip.set_speed_multiplier(f32::INFINITY);
        clip.update(0.1);
        assert!((clip.time() - 0.5).abs() < 1e-6);
        clip.apply(&mut skeleton);
        let elbow = skeleton.joint(1).unwrap();
        assert!(elbow.local.translation.is_finite());
    }
}
