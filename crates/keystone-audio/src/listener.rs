use glam::Vec3;

use crate::backend::AudioBackend;
use crate::engine::LISTENER_INDEX;
use crate::error::{check, AudioError};
use crate::units::{vector_to_audio, Attributes3d};

/// Borrowed access to the engine's single listener.
///
/// Getters read the cached attributes. Every setter updates the cache and pushes the
/// complete attribute set to the backend.
pub struct Listener<'a, B: AudioBackend> {
    backend: &'a mut B,
    attributes: &'a mut Attributes3d,
}

impl<'a, B: AudioBackend> Listener<'a, B> {
    pub(crate) fn new(backend: &'a mut B, attributes: &'a mut Attributes3d) -> Self {
        Self {
            backend,
            attributes,
        }
    }

    pub fn set_position(&mut self, position: Vec3) -> Result<(), AudioError> {
        self.attributes.position = vector_to_audio(position);
        self.push()
    }

    pub fn set_velocity(&mut self, velocity: Vec3) -> Result<(), AudioError> {
        self.attributes.velocity = vector_to_audio(velocity);
        self.push()
    }

    pub fn set_forward(&mut self, forward: Vec3) -> Result<(), AudioError> {
        self.attributes.forward = vector_to_audio(forward);
        self.push()
    }

    pub fn set_up(&mut self, up: Vec3) -> Result<(), AudioError> {
        self.attributes.up = vector_to_audio(up);
        self.push()
    }

    pub fn position(&self) -> Vec3 {
        self.attributes.position.into()
    }

    pub fn velocity(&self) -> Vec3 {
        self.attributes.velocity.into()
    }

    pub fn forward(&self) -> Vec3 {
        self.attributes.forward.into()
    }

    pub fn up(&self) -> Vec3 {
        self.attributes.up.into()
    }

    pub fn attributes(&self) -> &Attributes3d {
        self.attributes
    }

    fn push(&mut self) -> Result<(), AudioError> {
        check(
            "listener set 3d attributes",
            self.backend
                .set_listener_attributes(LISTENER_INDEX, self.attributes),
        )
    }
}
