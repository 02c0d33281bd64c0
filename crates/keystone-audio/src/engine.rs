use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::backend::AudioBackend;
use crate::config::AudioConfig;
use crate::error::{check, AudioError};
use crate::event::PlayableEvent;
use crate::kira_backend::KiraBackend;
use crate::listener::Listener;
use crate::registry::{EventHandle, EventRegistry};
use crate::units::{self, Attributes3d, AudioVector};

/// File suffix appended to bank names.
pub const BANK_EXTENSION: &str = "bank";

/// The engine drives a single listener.
pub const LISTENER_INDEX: usize = 0;

/// The audio facade. Owns the backend runtime, the loaded banks, every created event
/// instance, and the listener.
///
/// Construct one per application and hand out references; it is meant to be driven
/// from the main loop: [`update`](Self::update) once per frame and
/// [`shutdown`](Self::shutdown) before exit.
pub struct AudioEngine<B: AudioBackend = KiraBackend> {
    backend: B,
    config: AudioConfig,
    banks: HashMap<String, B::Bank>,
    events: EventRegistry<B::Instance>,
    listener: Attributes3d,
    released: bool,
}

impl AudioEngine<KiraBackend> {
    /// Start the kira runtime and configure the listener.
    pub fn init(config: AudioConfig) -> Result<Self, AudioError> {
        let backend = check("backend init", KiraBackend::new(&config))?;
        Self::with_backend(backend, config)
    }
}

impl<B: AudioBackend> AudioEngine<B> {
    /// Wrap an already-created backend and configure one listener slot.
    pub fn with_backend(mut backend: B, config: AudioConfig) -> Result<Self, AudioError> {
        let listener = Attributes3d::default();
        check("listener setup", backend.set_listener_count(1))?;
        check(
            "listener setup",
            backend.set_listener_attributes(LISTENER_INDEX, &listener),
        )?;
        info!("Audio engine initialized");
        Ok(Self {
            backend,
            config,
            banks: HashMap::new(),
            events: EventRegistry::new(),
            listener,
            released: false,
        })
    }

    /// Tick the runtime. Call once per frame.
    pub fn update(&mut self) -> Result<(), AudioError> {
        check("update", self.backend.update())
    }

    /// Release every event instance, unload all banks, and tear down the runtime.
    pub fn shutdown(mut self) -> Result<(), AudioError> {
        self.teardown()
    }

    /// Runs every step even when one fails and reports the first failure.
    fn teardown(&mut self) -> Result<(), AudioError> {
        self.released = true;
        let count = self.events.len();
        let mut first_error = None;
        for slot in self.events.drain() {
            let released = check(
                "event release",
                self.backend.release_instance(&slot.instance),
            );
            if let Err(e) = released {
                first_error.get_or_insert(e);
            }
        }
        self.banks.clear();
        if let Err(e) = check("bank unload", self.backend.unload_all()) {
            first_error.get_or_insert(e);
        }
        if let Err(e) = check("backend release", self.backend.release()) {
            first_error.get_or_insert(e);
        }
        match first_error {
            Some(e) => Err(e),
            None => {
                info!("Audio engine shut down ({count} events released)");
                Ok(())
            }
        }
    }

    // ---- Banks ----

    /// Load `<bank_dir>/<name>.bank`. Loading a bank that is already loaded does nothing.
    pub fn load_bank(&mut self, name: &str) -> Result<(), AudioError> {
        if self.banks.contains_key(name) {
            debug!("Bank '{name}' already loaded");
            return Ok(());
        }
        let path = self.config.bank_path(name);
        let bank = check("bank load", self.backend.load_bank_file(&path))?;
        self.banks.insert(name.to_string(), bank);
        info!("Loaded bank '{name}' from {}", path.display());
        Ok(())
    }

    pub fn is_bank_loaded(&self, name: &str) -> bool {
        self.banks.contains_key(name)
    }

    pub fn bank_count(&self) -> usize {
        self.banks.len()
    }

    // ---- Events ----

    /// Instantiate the event `event_id` and register it under `name`.
    ///
    /// Fails with [`AudioError::AlreadyExists`] if `name` is taken and with
    /// [`AudioError::EventDescriptionNotFound`] if no loaded bank contains `event_id`.
    pub fn create_event(
        &mut self,
        name: &str,
        event_id: &str,
    ) -> Result<PlayableEvent<'_, B>, AudioError> {
        if self.events.contains(name) {
            return Err(AudioError::AlreadyExists(name.to_string()));
        }
        let description = check("event lookup", self.backend.event_description(event_id))?
            .ok_or_else(|| AudioError::EventDescriptionNotFound(event_id.to_string()))?;
        let instance = check(
            "event instantiation",
            self.backend.create_instance(&description),
        )?;
        let handle = self.events.insert(name, instance)?;
        debug!("Created event '{name}' from {event_id}");
        self.event(handle)
    }

    /// Look up a previously created event by name.
    pub fn get_event(&mut self, name: &str) -> Result<PlayableEvent<'_, B>, AudioError> {
        let handle = self.events.lookup(name)?;
        self.event(handle)
    }

    /// Look up a previously created event by handle.
    pub fn event(&mut self, handle: EventHandle) -> Result<PlayableEvent<'_, B>, AudioError> {
        let slot = self
            .events
            .get_mut(handle)
            .ok_or_else(|| AudioError::NotFound(format!("{handle:?}")))?;
        Ok(PlayableEvent::new(&mut self.backend, slot, handle))
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Names of all created events, in creation order.
    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.names()
    }

    // ---- Global parameters ----

    pub fn set_global_parameter(
        &mut self,
        name: &str,
        value: f32,
        ignore_seek_speed: bool,
    ) -> Result<(), AudioError> {
        check(
            "set global parameter",
            self.backend
                .set_global_parameter(name, value, ignore_seek_speed),
        )
    }

    pub fn global_parameter(&self, name: &str) -> Result<f32, AudioError> {
        check("get global parameter", self.backend.global_parameter(name))
    }

    // ---- Listener ----

    /// Mutable access to the listener. Each setter pushes to the backend.
    pub fn listener(&mut self) -> Listener<'_, B> {
        Listener::new(&mut self.backend, &mut self.listener)
    }

    pub fn listener_attributes(&self) -> &Attributes3d {
        &self.listener
    }

    // ---- Helpers ----

    pub fn db_to_volume(&self, db: f32) -> f32 {
        units::db_to_volume(db)
    }

    pub fn volume_to_db(&self, volume: f32) -> f32 {
        units::volume_to_db(volume)
    }

    pub fn vector_to_audio(&self, v: glam::Vec3) -> AudioVector {
        units::vector_to_audio(v)
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: AudioBackend> Drop for AudioEngine<B> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        warn!("Audio engine dropped without shutdown; releasing resources");
        if let Err(e) = self.teardown() {
            warn!("Audio teardown during drop failed: {e}");
        }
    }
}
