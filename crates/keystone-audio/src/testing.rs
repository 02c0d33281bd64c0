//! Recording backend used by the facade tests.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::backend::{AudioBackend, PlaybackState, StopMode};
use crate::config::AudioConfig;
use crate::engine::AudioEngine;
use crate::error::BackendError;
use crate::units::Attributes3d;

pub(crate) const THEME_ID: &str = "{b56cb9d2-1d47-4099-b80e-7d257b99a823}";

/// Every state-changing call that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ListenerCount(usize),
    Update,
    LoadBank(PathBuf),
    UnloadAll,
    FindEvent(String),
    CreateInstance(u32),
    ReleaseInstance(u32),
    Start(u32),
    Stop(u32, StopMode),
    SetParameter(u32, String, f32),
    SetGlobalParameter(String, f32),
    InstanceAttributes(u32, Attributes3d),
    ListenerAttributes(usize, Attributes3d),
    Release,
}

pub(crate) struct MockInstance {
    state: PlaybackState,
    parameters: HashMap<String, f32>,
}

#[derive(Default)]
pub(crate) struct MockBackend {
    pub log: Rc<RefCell<Vec<Call>>>,
    /// Instance whose release reports `InvalidHandle`.
    pub fail_release: Option<u32>,
    pub(crate) banks: u32,
    pub(crate) next_instance: u32,
    pub(crate) instances: HashMap<u32, MockInstance>,
    pub(crate) globals: HashMap<String, f32>,
}

impl MockBackend {
    pub fn calls(&self) -> Ref<'_, Vec<Call>> {
        self.log.borrow()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.log.borrow().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    fn instance(&self, id: &u32) -> Result<&MockInstance, BackendError> {
        self.instances.get(id).ok_or(BackendError::InvalidHandle)
    }

    fn instance_mut(&mut self, id: &u32) -> Result<&mut MockInstance, BackendError> {
        self.instances.get_mut(id).ok_or(BackendError::InvalidHandle)
    }
}

impl AudioBackend for MockBackend {
    type Bank = u32;
    type EventDescription = &'static str;
    type Instance = u32;

    fn set_listener_count(&mut self, count: usize) -> Result<(), BackendError> {
        self.record(Call::ListenerCount(count));
        Ok(())
    }

    fn update(&mut self) -> Result<(), BackendError> {
        self.record(Call::Update);
        Ok(())
    }

    fn load_bank_file(&mut self, path: &Path) -> Result<u32, BackendError> {
        self.record(Call::LoadBank(path.to_path_buf()));
        if path.file_stem().and_then(|s| s.to_str()) == Some("Missing") {
            return Err(BackendError::LoadFailed(path.to_path_buf(), "not found".into()));
        }
        self.banks += 1;
        Ok(self.banks)
    }

    fn unload_all(&mut self) -> Result<(), BackendError> {
        self.record(Call::UnloadAll);
        self.banks = 0;
        Ok(())
    }

    fn event_description(
        &mut self,
        event_id: &str,
    ) -> Result<Option<&'static str>, BackendError> {
        self.record(Call::FindEvent(event_id.to_string()));
        Ok((self.banks > 0 && event_id == THEME_ID).then_some(THEME_ID))
    }

    fn create_instance(&mut self, _description: &&'static str) -> Result<u32, BackendError> {
        self.next_instance += 1;
        let id = self.next_instance;
        self.record(Call::CreateInstance(id));
        self.instances.insert(
            id,
            MockInstance {
                state: PlaybackState::Stopped,
                parameters: HashMap::from([("Underwater".to_string(), 0.0)]),
            },
        );
        Ok(id)
    }

    fn release_instance(&mut self, instance: &u32) -> Result<(), BackendError> {
        self.record(Call::ReleaseInstance(*instance));
        if self.fail_release == Some(*instance) {
            return Err(BackendError::InvalidHandle);
        }
        self.instances
            .remove(instance)
            .map(|_| ())
            .ok_or(BackendError::InvalidHandle)
    }

    fn start(&mut self, instance: &u32) -> Result<(), BackendError> {
        self.record(Call::Start(*instance));
        self.instance_mut(instance)?.state = PlaybackState::Playing;
        Ok(())
    }

    fn stop(&mut self, instance: &u32, mode: StopMode) -> Result<(), BackendError> {
        self.record(Call::Stop(*instance, mode));
        self.instance_mut(instance)?.state = match mode {
            StopMode::AllowFadeOut => PlaybackState::Stopping,
            StopMode::Immediate => PlaybackState::Stopped,
        };
        Ok(())
    }

    fn playback_state(&self, instance: &u32) -> Result<PlaybackState, BackendError> {
        Ok(self.instance(instance)?.state)
    }

    fn set_parameter(
        &mut self,
        instance: &u32,
        name: &str,
        value: f32,
        _ignore_seek_speed: bool,
    ) -> Result<(), BackendError> {
        self.record(Call::SetParameter(*instance, name.to_string(), value));
        let slot = self
            .instance_mut(instance)?
            .parameters
            .get_mut(name)
            .ok_or_else(|| BackendError::ParameterNotFound(name.to_string()))?;
        *slot = value;
        Ok(())
    }

    fn parameter(&self, instance: &u32, name: &str) -> Result<f32, BackendError> {
        self.instance(instance)?
            .parameters
            .get(name)
            .copied()
            .ok_or_else(|| BackendError::ParameterNotFound(name.to_string()))
    }

    fn set_global_parameter(
        &mut self,
        name: &str,
        value: f32,
        _ignore_seek_speed: bool,
    ) -> Result<(), BackendError> {
        self.record(Call::SetGlobalParameter(name.to_string(), value));
        self.globals.insert(name.to_string(), value);
        Ok(())
    }

    fn global_parameter(&self, name: &str) -> Result<f32, BackendError> {
        self.globals
            .get(name)
            .copied()
            .ok_or_else(|| BackendError::ParameterNotFound(name.to_string()))
    }

    fn set_instance_attributes(
        &mut self,
        instance: &u32,
        attributes: &Attributes3d,
    ) -> Result<(), BackendError> {
        self.instance(instance)?;
        self.record(Call::InstanceAttributes(*instance, *attributes));
        Ok(())
    }

    fn set_listener_attributes(
        &mut self,
        listener: usize,
        attributes: &Attributes3d,
    ) -> Result<(), BackendError> {
        self.record(Call::ListenerAttributes(listener, *attributes));
        Ok(())
    }

    fn release(&mut self) -> Result<(), BackendError> {
        self.record(Call::Release);
        Ok(())
    }
}

pub(crate) fn mock_engine() -> AudioEngine<MockBackend> {
    AudioEngine::with_backend(MockBackend::default(), AudioConfig::default())
        .expect("mock backend never fails to start")
}

/// A mock engine with the Master bank loaded and the theme event registered as "theme".
pub(crate) fn engine_with_theme() -> AudioEngine<MockBackend> {
    let mut engine = mock_engine();
    engine.load_bank("Master").expect("mock bank loads");
    engine
        .create_event("theme", THEME_ID)
        .expect("theme exists in mock bank");
    engine
}
