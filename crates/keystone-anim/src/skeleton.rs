use glam::Mat4;
use keystone_core::Transform;

use crate::error::AnimError;

/// One bone of a skeleton.
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    /// Index of the parent joint. Always lower than this joint's own index.
    pub parent: Option<usize>,
    /// Pose relative to the parent.
    pub local: Transform,
    /// Model-space matrix, valid after [`Skeleton::do_fk`].
    pub world: Mat4,
}

impl Joint {
    pub fn new(name: impl Into<String>, parent: Option<usize>, local: Transform) -> Self {
        Self {
            name: name.into(),
            parent,
            local,
            world: Mat4::IDENTITY,
        }
    }
}

/// A joint hierarchy stored parent-before-child.
#[derive(Debug, Clone)]
pub struct Skeleton {
    joints: Vec<Joint>,
}

impl Skeleton {
    /// Build a skeleton and resolve its initial world matrices.
    pub fn new(joints: Vec<Joint>) -> Result<Self, AnimError> {
        for (index, joint) in joints.iter().enumerate() {
            if let Some(parent) = joint.parent {
                if parent >= index {
                    return Err(AnimError::InvalidSkeleton(format!(
                        "joint '{}' ({index}) lists parent {parent}, which does not precede it",
                        joint.name
                    )));
                }
            }
        }
        let mut skeleton = Self { joints };
        skeleton.do_fk();
        Ok(skeleton)
    }

    /// Forward kinematics: `world = parent.world * local`, root to leaves.
    pub fn do_fk(&mut self) {
        for i in 0..self.joints.len() {
            let local = self.joints[i].local.matrix();
            self.joints[i].world = match self.joints[i].parent {
                Some(parent) => self.joints[parent].world * local,
                None => local,
            };
        }
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    pub fn joint_mut(&mut self, index: usize) -> Option<&mut Joint> {
        self.joints.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}
