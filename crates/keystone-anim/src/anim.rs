//! Keyframed joint animation data.
//!
//! Clips are stored as JSON:
//!
//! ```json
//! {
//!   "name": "wave",
//!   "duration": 1.0,
//!   "channels": [
//!     { "joint": "elbow",
//!       "rotation": [ { "time": 0.0, "value": [0, 0, 0, 1] },
//!                     { "time": 1.0, "value": [0, 0, 0.7071068, 0.7071068] } ] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::AnimError;

/// A value at a point in clip time (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
}

/// Keyframes driving one joint. Empty tracks leave that part of the pose untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JointChannel {
    pub joint: String,
    #[serde(default)]
    pub translation: Vec<Keyframe<Vec3>>,
    #[serde(default)]
    pub rotation: Vec<Keyframe<Quat>>,
    #[serde(default)]
    pub scale: Vec<Keyframe<Vec3>>,
}

/// An authored skeletal animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletalAnim {
    #[serde(default)]
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
    pub channels: Vec<JointChannel>,
}

impl SkeletalAnim {
    pub fn from_json(text: &str) -> Result<Self, AnimError> {
        let anim: SkeletalAnim = serde_json::from_str(text)?;
        anim.validate()?;
        Ok(anim)
    }

    pub fn load(path: &Path) -> Result<Self, AnimError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Check duration and keyframe ordering.
    pub fn validate(&self) -> Result<(), AnimError> {
        let invalid = |reason: String| Err(AnimError::InvalidClip(self.name.clone(), reason));
        if !(self.duration > 0.0 && self.duration.is_finite()) {
            return invalid(format!("duration must be positive and finite, got {}", self.duration));
        }
        for channel in &self.channels {
            let mut times = channel
                .translation
                .iter()
                .map(|k| k.time)
                .chain(channel.rotation.iter().map(|k| k.time))
                .chain(channel.scale.iter().map(|k| k.time));
            if let Some(t) = times.find(|t| *t < 0.0 || *t > self.duration) {
                return invalid(format!(
                    "joint '{}' has a key at {t}s outside 0..={}",
                    channel.joint, self.duration
                ));
            }
            let sorted = is_sorted(&channel.translation)
                && is_sorted(&channel.rotation)
                && is_sorted(&channel.scale);
            if !sorted {
                return invalid(format!("joint '{}' has unsorted keys", channel.joint));
            }
        }
        Ok(())
    }
}

fn is_sorted<T>(keys: &[Keyframe<T>]) -> bool {
    keys.windows(2).all(|w| w[0].time <= w[1].time)
}

/// Sample a track at `time`. Holds the first and last keys outside the keyed range.
pub(crate) fn sample<T: Copy>(
    keys: &[Keyframe<T>],
    time: f32,
    blend: impl Fn(T, T, f32) -> T,
) -> Option<T> {
    let first = keys.first()?;
    if keys.len() == 1 || time.is_nan() || time <= first.time {
        return Some(first.value);
    }
    // Index of the first key strictly after `time`.
    let next = keys.partition_point(|k| k.time <= time);
    if next >= keys.len() {
        return keys.last().map(|k| k.value);
    }
    let (a, b) = (&keys[next - 1], &keys[next]);
    let span = (b.time - a.time).max(f32::EPSILON);
    Some(blend(a.value, b.value, ((time - a.time) / span).clamp(0.0, 1.0)))
}

pub(crate) fn sample_translation(keys: &[Keyframe<Vec3>], time: f32) -> Option<Vec3> {
    sample(keys, time, Vec3::lerp)
}

pub(crate) fn sample_rotation(keys: &[Keyframe<Quat>], time: f32) -> Option<Quat> {
    sample(keys, time, Quat::slerp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<Keyframe<Vec3>> {
        vec![
            Keyframe { time: 0.0, value: Vec3::ZERO },
            Keyframe { time: 1.0, value: Vec3::new(2.0, 0.0, 0.0) },
            Keyframe { time: 2.0, value: Vec3::new(2.0, 4.0, 0.0) },
        ]
    }

    #[test]
    fn samples_between_keys() {
        let keys = keys();
        assert_eq!(sample_translation(&keys, 0.5), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(sample_translation(&keys, 1.5), Some(Vec3::new(2.0, 2.0, 0.0)));
        assert_eq!(sample_translation(&keys, 1.0), Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn holds_outside_range() {
        let keys = keys();
        assert_eq!(sample_translation(&keys, -1.0), Some(Vec3::ZERO));
        assert_eq!(sample_translation(&keys, 5.0), Some(Vec3::new(2.0, 4.0, 0.0)));
        assert_eq!(sample_translation(&[], 0.5), None);
        assert_eq!(sample_translation(&keys, f32::NAN), Some(Vec3::ZERO));
        assert_eq!(sample_translation(&keys, f32::INFINITY), Some(Vec3::new(2.0, 4.0, 0.0)));
    }

    #[test]
    fn rotation_slerps() {
        let quarter = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let keys = [
            Keyframe { time: 0.0, value: Quat::IDENTITY },
            Keyframe { time: 1.0, value: quarter },
        ];
        let half = sample_rotation(&keys, 0.5).unwrap();
        let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
        assert!(half.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn parses_json_clip() {
        let anim = SkeletalAnim::from_json(
            r#"{
                "name": "wave",
                "duration": 1.0,
                "channels": [
                    { "joint": "elbow",
                      "translation": [ { "time": 0.0, "value": [1.0, 0.0, 0.0] } ],
                      "rotation": [ { "time": 0.0, "value": [0.0, 0.0, 0.0, 1.0] },
                                    { "time": 1.0, "value": [0.0, 0.0, 0.7071068, 0.7071068] } ] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(anim.name, "wave");
        assert_eq!(anim.channels[0].rotation.len(), 2);
        assert!(anim.channels[0].scale.is_empty());
    }

    #[test]
    fn rejects_bad_clips() {
        let zero = r#"{ "duration": 0.0, "channels": [] }"#;
        assert!(matches!(SkeletalAnim::from_json(zero), Err(AnimError::InvalidClip(..))));

        let late = r#"{ "duration": 1.0, "channels": [
            { "joint": "a", "translation": [ { "time": 2.0, "value": [0, 0, 0] } ] } ] }"#;
        assert!(matches!(SkeletalAnim::from_json(late), Err(AnimError::InvalidClip(..))));

        let unsorted = r#"{ "duration": 1.0, "channels": [
            { "joint": "a", "translation": [ { "time": 0.5, "value": [0, 0, 0] },
                                             { "time": 0.2, "value": [0, 0, 0] } ] } ] }"#;
        assert!(matches!(SkeletalAnim::from_json(unsorted), Err(AnimError::InvalidClip(..))));

        assert!(matches!(SkeletalAnim::from_json("{"), Err(AnimError::Parse(_))));
    }
}
