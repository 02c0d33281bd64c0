use std::path::Path;

use crate::error::BackendError;
use crate::units::Attributes3d;

/// Playback state reported for an event instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    /// Stop requested; release tails or fade-out still audible.
    Stopping,
    Stopped,
}

/// How an instance should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Let fade-outs and release tails play out.
    AllowFadeOut,
    Immediate,
}

/// The audio middleware runtime the [`AudioEngine`](crate::AudioEngine) drives.
///
/// Every call is synchronous and made from the thread that owns the engine.
pub trait AudioBackend {
    /// A loaded bank.
    type Bank;
    /// An authored event, resolved from the loaded banks.
    type EventDescription;
    /// A live instance of an event.
    type Instance;

    fn set_listener_count(&mut self, count: usize) -> Result<(), BackendError>;

    /// Advance the runtime by one frame.
    fn update(&mut self) -> Result<(), BackendError>;

    fn load_bank_file(&mut self, path: &Path) -> Result<Self::Bank, BackendError>;

    /// Unload every bank. Instances must already be released.
    fn unload_all(&mut self) -> Result<(), BackendError>;

    /// Look up an event by id. `Ok(None)` means no loaded bank contains it.
    fn event_description(
        &mut self,
        event_id: &str,
    ) -> Result<Option<Self::EventDescription>, BackendError>;

    fn create_instance(
        &mut self,
        description: &Self::EventDescription,
    ) -> Result<Self::Instance, BackendError>;

    fn release_instance(&mut self, instance: &Self::Instance) -> Result<(), BackendError>;

    /// Start the instance, restarting it if it is already playing.
    fn start(&mut self, instance: &Self::Instance) -> Result<(), BackendError>;

    fn stop(&mut self, instance: &Self::Instance, mode: StopMode) -> Result<(), BackendError>;

    fn playback_state(&self, instance: &Self::Instance) -> Result<PlaybackState, BackendError>;

    fn set_parameter(
        &mut self,
        instance: &Self::Instance,
        name: &str,
        value: f32,
        ignore_seek_speed: bool,
    ) -> Result<(), BackendError>;

    /// The last value set for the parameter (not the smoothed one).
    fn parameter(&self, instance: &Self::Instance, name: &str) -> Result<f32, BackendError>;

    fn set_global_parameter(
        &mut self,
        name: &str,
        value: f32,
        ignore_seek_speed: bool,
    ) -> Result<(), BackendError>;

    fn global_parameter(&self, name: &str) -> Result<f32, BackendError>;

    fn set_instance_attributes(
        &mut self,
        instance: &Self::Instance,
        attributes: &Attributes3d,
    ) -> Result<(), BackendError>;

    fn set_listener_attributes(
        &mut self,
        listener: usize,
        attributes: &Attributes3d,
    ) -> Result<(), BackendError>;

    /// Tear down the runtime.
    fn release(&mut self) -> Result<(), BackendError>;
}
