use glam::Vec3;

use crate::backend::{AudioBackend, PlaybackState, StopMode};
use crate::error::{check, AudioError};
use crate::registry::{EventHandle, EventSlot};
use crate::units::{vector_to_audio, Attributes3d};

/// A borrowed handle onto one registered event instance.
///
/// Obtained from [`AudioEngine::create_event`](crate::AudioEngine::create_event),
/// [`AudioEngine::get_event`](crate::AudioEngine::get_event) or
/// [`AudioEngine::event`](crate::AudioEngine::event). The engine keeps ownership of
/// the instance.
pub struct PlayableEvent<'a, B: AudioBackend> {
    backend: &'a mut B,
    slot: &'a mut EventSlot<B::Instance>,
    handle: EventHandle,
}

impl<'a, B: AudioBackend> PlayableEvent<'a, B> {
    pub(crate) fn new(
        backend: &'a mut B,
        slot: &'a mut EventSlot<B::Instance>,
        handle: EventHandle,
    ) -> Self {
        Self {
            backend,
            slot,
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.slot.name
    }

    pub fn handle(&self) -> EventHandle {
        self.handle
    }

    // ---- Transport ----

    /// Start the event unless it is already playing.
    pub fn play(&mut self) -> Result<(), AudioError> {
        if self.is_playing()? {
            return Ok(());
        }
        check("event start", self.backend.start(&self.slot.instance))
    }

    /// Start the event from the beginning, even if it is playing.
    pub fn restart(&mut self) -> Result<(), AudioError> {
        check("event restart", self.backend.start(&self.slot.instance))
    }

    /// Stop a playing event, letting fade-outs and release tails finish.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        self.stop_with(StopMode::AllowFadeOut)
    }

    /// Cut a playing event off immediately.
    pub fn stop_immediately(&mut self) -> Result<(), AudioError> {
        self.stop_with(StopMode::Immediate)
    }

    fn stop_with(&mut self, mode: StopMode) -> Result<(), AudioError> {
        if !self.is_playing()? {
            return Ok(());
        }
        check("event stop", self.backend.stop(&self.slot.instance, mode))
    }

    pub fn playback_state(&self) -> Result<PlaybackState, AudioError> {
        check(
            "playback state query",
            self.backend.playback_state(&self.slot.instance),
        )
    }

    pub fn is_playing(&self) -> Result<bool, AudioError> {
        Ok(self.playback_state()? == PlaybackState::Playing)
    }

    // ---- Parameters ----

    /// Set a per-instance parameter. `ignore_seek_speed` jumps straight to the value.
    pub fn set_parameter(
        &mut self,
        name: &str,
        value: f32,
        ignore_seek_speed: bool,
    ) -> Result<(), AudioError> {
        check(
            "event set parameter",
            self.backend
                .set_parameter(&self.slot.instance, name, value, ignore_seek_speed),
        )
    }

    pub fn parameter(&self, name: &str) -> Result<f32, AudioError> {
        check(
            "event get parameter",
            self.backend.parameter(&self.slot.instance, name),
        )
    }

    // ---- 3D ----

    /// Move the emitter. Pushes the full attribute set.
    pub fn set_position(&mut self, position: Vec3) -> Result<(), AudioError> {
        self.slot.attributes.position = vector_to_audio(position);
        self.push_attributes()
    }

    pub fn position(&self) -> Vec3 {
        self.slot.attributes.position.into()
    }

    pub fn set_velocity(&mut self, velocity: Vec3) -> Result<(), AudioError> {
        self.slot.attributes.velocity = vector_to_audio(velocity);
        self.push_attributes()
    }

    pub fn attributes(&self) -> &Attributes3d {
        &self.slot.attributes
    }

    fn push_attributes(&mut self) -> Result<(), AudioError> {
        check(
            "event set 3d attributes",
            self.backend
                .set_instance_attributes(&self.slot.instance, &self.slot.attributes),
        )
    }
}
