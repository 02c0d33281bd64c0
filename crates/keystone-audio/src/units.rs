use glam::Vec3;

/// Vector in the middleware's layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AudioVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AudioVector {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for AudioVector {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<AudioVector> for Vec3 {
    fn from(v: AudioVector) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Convert an engine vector to the middleware layout (field-wise copy).
pub fn vector_to_audio(v: Vec3) -> AudioVector {
    AudioVector::from(v)
}

/// Full set of 3D attributes pushed for an emitter or the listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attributes3d {
    pub position: AudioVector,
    pub velocity: AudioVector,
    pub forward: AudioVector,
    pub up: AudioVector,
}

impl Default for Attributes3d {
    fn default() -> Self {
        Self {
            position: AudioVector::default(),
            velocity: AudioVector::default(),
            forward: AudioVector::new(0.0, 0.0, -1.0),
            up: AudioVector::new(0.0, 1.0, 0.0),
        }
    }
}

/// Decibels to linear volume: `10^(db / 20)`.
pub fn db_to_volume(db: f32) -> f32 {
    10.0_f32.powf(0.05 * db)
}

/// Linear volume to decibels: `20 * log10(volume)`.
pub fn volume_to_db(volume: f32) -> f32 {
    20.0 * volume.log10()
}
