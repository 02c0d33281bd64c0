use glam::Mat4;

use crate::error::AnimError;
use crate::skeleton::Skeleton;

/// Skinned mesh component. Owns the skeleton and the per-joint skinning matrices
/// uploaded for vertex skinning.
#[derive(Debug, Clone)]
pub struct SkinnedMeshRenderer {
    skeleton: Skeleton,
    inverse_bind: Vec<Mat4>,
    joint_matrices: Vec<Mat4>,
}

impl SkinnedMeshRenderer {
    /// Use the skeleton's current pose as the bind pose.
    pub fn new(skeleton: Skeleton) -> Self {
        let inverse_bind = skeleton.joints().iter().map(|j| j.world.inverse()).collect();
        Self::assemble(skeleton, inverse_bind)
    }

    /// Use explicit inverse bind matrices, one per joint.
    pub fn with_inverse_bind(skeleton: Skeleton, inverse_bind: Vec<Mat4>) -> Result<Self, AnimError> {
        if inverse_bind.len() != skeleton.len() {
            return Err(AnimError::InvalidSkeleton(format!(
                "{} inverse bind matrices for {} joints",
                inverse_bind.len(),
                skeleton.len()
            )));
        }
        Ok(Self::assemble(skeleton, inverse_bind))
    }

    fn assemble(skeleton: Skeleton, inverse_bind: Vec<Mat4>) -> Self {
        let mut renderer = Self {
            joint_matrices: vec![Mat4::IDENTITY; skeleton.len()],
            skeleton,
            inverse_bind,
        };
        renderer.update_joint_matrices();
        renderer
    }

    /// Recompute `joint = world * inverse_bind` from the skeleton's world matrices.
    pub fn update_joint_matrices(&mut self) {
        for ((out, joint), inverse_bind) in self
            .joint_matrices
            .iter_mut()
            .zip(self.skeleton.joints())
            .zip(&self.inverse_bind)
        {
            *out = joint.world * *inverse_bind;
        }
    }

    pub fn joint_matrices(&self) -> &[Mat4] {
        &self.joint_matrices
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use glam::Vec3;

    #[test]
    fn bind_pose_skins_to_identity() {
        let renderer = SkinnedMeshRenderer::new(fixtures::arm());
        for m in renderer.joint_matrices() {
            assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-5));
        }
    }

    #[test]
    fn moved_joint_skins_by_its_delta() {
        let mut renderer = SkinnedMeshRenderer::new(fixtures::arm());
        renderer.skeleton_mut().joint_mut(0).unwrap().local.translation = Vec3::new(0.0, 3.0, 0.0);
        renderer.skeleton_mut().do_fk();
        renderer.update_joint_matrices();
        // Every joint inherits the root's +2 Y shift.
        for m in renderer.joint_matrices() {
            let shifted = m.transform_point3(Vec3::ZERO);
            assert!(shifted.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5), "{shifted}");
        }
    }

    #[test]
    fn inverse_bind_count_must_match() {
        let err = SkinnedMeshRenderer::with_inverse_bind(fixtures::arm(), vec![Mat4::IDENTITY]);
        assert!(matches!(err, Err(AnimError::InvalidSkeleton(_))));
    }
}
