use glam::Vec3;

use crate::units::Attributes3d;

/// Gain and panning for an emitter relative to the listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialParams {
    /// Volume attenuation factor (0.0–1.0).
    pub volume: f32,
    /// Stereo panning (-1.0 = full left, 0.0 = center, 1.0 = full right).
    pub panning: f32,
}

impl SpatialParams {
    pub const CENTERED: SpatialParams = SpatialParams {
        volume: 1.0,
        panning: 0.0,
    };
}

/// Compute spatial parameters for an emitter position relative to the listener.
///
/// Inverse-distance attenuation between `min_distance` and `max_distance`. Panning is
/// the projection of the emitter direction onto the listener's right vector.
pub fn compute_spatial(
    listener: &Attributes3d,
    emitter: Vec3,
    min_distance: f32,
    max_distance: f32,
) -> SpatialParams {
    let to_emitter = emitter - Vec3::from(listener.position);
    let distance = to_emitter.length();

    if distance < f32::EPSILON {
        return SpatialParams::CENTERED;
    }

    let min_distance = min_distance.max(f32::EPSILON);
    let clamped = distance.clamp(min_distance, max_distance.max(min_distance));
    let volume = min_distance / clamped;

    let forward = Vec3::from(listener.forward);
    let up = Vec3::from(listener.up);
    let panning = forward
        .cross(up)
        .try_normalize()
        .map_or(0.0, |right| to_emitter.normalize().dot(right));

    SpatialParams {
        volume: volume.clamp(0.0, 1.0),
        panning: panning.clamp(-1.0, 1.0),
    }
}
