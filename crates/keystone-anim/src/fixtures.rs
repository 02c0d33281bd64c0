//! Shared skeletons and clips for tests.

use std::sync::Arc;

use glam::Vec3;
use keystone_core::Transform;

use crate::anim::{JointChannel, Keyframe, SkeletalAnim};
use crate::skeleton::{Joint, Skeleton};

/// Three joints in a line along +X, lifted one unit up.
pub(crate) fn arm() -> Skeleton {
    Skeleton::new(vec![
        Joint::new("shoulder", None, Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))),
        Joint::new("elbow", Some(0), Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))),
        Joint::new("wrist", Some(1), Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))),
    ])
    .expect("arm skeleton is well formed")
}

/// One second sliding the elbow up by one unit, plus a channel for a missing joint.
pub(crate) fn slide() -> Arc<SkeletalAnim> {
    Arc::new(SkeletalAnim {
        name: "slide".into(),
        duration: 1.0,
        channels: vec![
            JointChannel {
                joint: "elbow".into(),
                translation: vec![
                    Keyframe { time: 0.0, value: Vec3::new(1.0, 0.0, 0.0) },
                    Keyframe { time: 1.0, value: Vec3::new(1.0, 1.0, 0.0) },
                ],
                ..Default::default()
            },
            JointChannel {
                joint: "tail".into(),
                translation: vec![Keyframe { time: 0.0, value: Vec3::ONE }],
                ..Default::default()
            },
        ],
    })
}
