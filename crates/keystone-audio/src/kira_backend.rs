use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;
use kira::manager::backend::DefaultBackend;
use kira::manager::{AudioManager, AudioManagerSettings};
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings};
use kira::sound::{PlaybackRate, PlaybackState as KiraPlaybackState};
use kira::tween::Tween;
use tracing::{debug, info, warn};

use crate::backend::{AudioBackend, PlaybackState, StopMode};
use crate::bank::{BankManifest, EventManifest};
use crate::config::AudioConfig;
use crate::error::BackendError;
use crate::parameter::{self, Modulation, ParameterState};
use crate::spatial::{compute_spatial, SpatialParams};
use crate::units::{db_to_volume, Attributes3d};

/// Identifies a bank loaded by [`KiraBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KiraBank(u32);

/// Identifies a live instance in [`KiraBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KiraInstance(u64);

/// An event from a loaded bank with its decoded audio.
#[derive(Clone)]
pub struct KiraEvent {
    manifest: EventManifest,
    sound: StaticSoundData,
}

struct LoadedBank {
    path: PathBuf,
    manifest: BankManifest,
    events: Vec<Arc<KiraEvent>>,
}

struct LiveInstance {
    event: Arc<KiraEvent>,
    handle: Option<StaticSoundHandle>,
    parameters: Vec<ParameterState>,
    attributes: Attributes3d,
}

/// Backend that plays bank events through a kira [`AudioManager`].
pub struct KiraBackend {
    manager: AudioManager<DefaultBackend>,
    master_volume: f64,
    min_distance: f32,
    max_distance: f32,
    max_instances: usize,
    banks: BTreeMap<KiraBank, LoadedBank>,
    next_bank: u32,
    globals: Vec<ParameterState>,
    instances: HashMap<KiraInstance, LiveInstance>,
    next_instance: u64,
    listeners: Vec<Attributes3d>,
    last_update: Instant,
}

impl KiraBackend {
    pub fn new(config: &AudioConfig) -> Result<Self, BackendError> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| BackendError::InitFailed(e.to_string()))?;
        info!("kira audio manager started");
        Ok(Self {
            manager,
            master_volume: config.master_volume,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            max_instances: config.max_instances,
            banks: BTreeMap::new(),
            next_bank: 0,
            globals: Vec::new(),
            instances: HashMap::new(),
            next_instance: 0,
            listeners: vec![Attributes3d::default()],
            last_update: Instant::now(),
        })
    }

    fn live(&self, instance: &KiraInstance) -> Result<&LiveInstance, BackendError> {
        self.instances.get(instance).ok_or(BackendError::InvalidHandle)
    }
}

/// Inputs shared by every instance when computing its output levels.
struct MixContext<'a> {
    master_volume: f64,
    listener: &'a Attributes3d,
    globals: &'a [ParameterState],
    min_distance: f32,
    max_distance: f32,
}

/// Output levels for one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Mix {
    /// Linear amplitude.
    volume: f64,
    /// -1.0 left to 1.0 right.
    panning: f64,
    playback_rate: f64,
}

impl Mix {
    /// kira expects 0.0 = left, 0.5 = center, 1.0 = right.
    fn kira_panning(&self) -> f64 {
        ((self.panning + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

fn mix(
    ctx: &MixContext<'_>,
    event: &EventManifest,
    parameters: &[ParameterState],
    attributes: &Attributes3d,
) -> Mix {
    let modulation = Modulation::default()
        .accumulate(ctx.globals)
        .accumulate(parameters);
    let spatial = if event.spatial {
        compute_spatial(
            ctx.listener,
            Vec3::from(attributes.position),
            ctx.min_distance,
            ctx.max_distance,
        )
    } else {
        SpatialParams::CENTERED
    };
    let gain = db_to_volume(event.volume_db) * modulation.volume.max(0.0) * spatial.volume;
    Mix {
        volume: ctx.master_volume * gain as f64,
        panning: (modulation.pan + spatial.panning).clamp(-1.0, 1.0) as f64,
        playback_rate: modulation.pitch.max(0.0) as f64,
    }
}

/// Facade state for an instance's current sound handle, if any.
fn playback_state_of(handle: Option<KiraPlaybackState>) -> PlaybackState {
    match handle {
        None | Some(KiraPlaybackState::Stopped) => PlaybackState::Stopped,
        Some(KiraPlaybackState::Playing) => PlaybackState::Playing,
        Some(KiraPlaybackState::Stopping) => PlaybackState::Stopping,
        Some(KiraPlaybackState::Pausing | KiraPlaybackState::Paused) => PlaybackState::Paused,
    }
}

/// Fade length for stopping an instance of `event`.
fn stop_fade(event: &EventManifest, mode: StopMode) -> Duration {
    match mode {
        StopMode::AllowFadeOut => Duration::from_millis(event.fade_out_ms),
        StopMode::Immediate => Duration::ZERO,
    }
}

/// Initial settings for a fresh sound of `event` at the given levels.
fn start_settings(event: &EventManifest, levels: &Mix) -> StaticSoundSettings {
    let settings = StaticSoundSettings::new()
        .volume(levels.volume)
        .panning(levels.kira_panning())
        .playback_rate(PlaybackRate::Factor(levels.playback_rate));
    if event.looping {
        settings.loop_region(..)
    } else {
        settings
    }
}

fn tween(duration: Duration) -> Tween {
    Tween {
        duration,
        ..Default::default()
    }
}

impl AudioBackend for KiraBackend {
    type Bank = KiraBank;
    type EventDescription = Arc<KiraEvent>;
    type Instance = KiraInstance;

    fn set_listener_count(&mut self, count: usize) -> Result<(), BackendError> {
        self.listeners.resize(count.max(1), Attributes3d::default());
        Ok(())
    }

    fn update(&mut self) -> Result<(), BackendError> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        for param in &mut self.globals {
            param.advance(dt);
        }
        for live in self.instances.values_mut() {
            for param in &mut live.parameters {
                param.advance(dt);
            }
        }

        let ctx = MixContext {
            master_volume: self.master_volume,
            listener: &self.listeners[0],
            globals: &self.globals,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
        };
        for live in self.instances.values_mut() {
            let levels = mix(&ctx, &live.event.manifest, &live.parameters, &live.attributes);
            let Some(handle) = live.handle.as_mut() else {
                continue;
            };
            if handle.state() == KiraPlaybackState::Stopped {
                continue;
            }
            handle.set_volume(levels.volume, Tween::default());
            handle.set_panning(levels.kira_panning(), Tween::default());
            handle.set_playback_rate(PlaybackRate::Factor(levels.playback_rate), Tween::default());
        }
        Ok(())
    }

    fn load_bank_file(&mut self, path: &Path) -> Result<KiraBank, BackendError> {
        let manifest = BankManifest::load(path)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut events = Vec::with_capacity(manifest.events.len());
        for event in &manifest.events {
            let file = dir.join(&event.file);
            let sound = StaticSoundData::from_file(&file)
                .map_err(|e| BackendError::LoadFailed(file.clone(), e.to_string()))?;
            events.push(Arc::new(KiraEvent {
                manifest: event.clone(),
                sound,
            }));
        }

        for declared in &manifest.parameters {
            if self.globals.iter().any(|p| p.name() == declared.name) {
                warn!(
                    "Global parameter '{}' already declared; ignoring copy in {}",
                    declared.name,
                    path.display()
                );
                continue;
            }
            self.globals.push(ParameterState::new(declared.clone()));
        }

        let id = KiraBank(self.next_bank);
        self.next_bank += 1;
        debug!("Bank {} holds {} events", path.display(), events.len());
        self.banks.insert(
            id,
            LoadedBank {
                path: path.to_path_buf(),
                manifest,
                events,
            },
        );
        Ok(id)
    }

    fn unload_all(&mut self) -> Result<(), BackendError> {
        if !self.instances.is_empty() {
            warn!("Unloading banks with {} live instances", self.instances.len());
        }
        for bank in self.banks.values() {
            debug!("Unloading bank {}", bank.path.display());
        }
        self.banks.clear();
        self.globals.clear();
        Ok(())
    }

    fn event_description(
        &mut self,
        event_id: &str,
    ) -> Result<Option<Arc<KiraEvent>>, BackendError> {
        let found = self.banks.values().find_map(|bank| {
            let manifest = bank.manifest.find_event(event_id)?;
            bank.events
                .iter()
                .find(|e| e.manifest.id == manifest.id)
                .cloned()
        });
        Ok(found)
    }

    fn create_instance(
        &mut self,
        description: &Arc<KiraEvent>,
    ) -> Result<KiraInstance, BackendError> {
        if self.instances.len() >= self.max_instances {
            return Err(BackendError::InstanceLimit(self.max_instances));
        }
        let id = KiraInstance(self.next_instance);
        self.next_instance += 1;
        let parameters = description
            .manifest
            .parameters
            .iter()
            .cloned()
            .map(ParameterState::new)
            .collect();
        self.instances.insert(
            id,
            LiveInstance {
                event: Arc::clone(description),
                handle: None,
                parameters,
                attributes: Attributes3d::default(),
            },
        );
        Ok(id)
    }

    fn release_instance(&mut self, instance: &KiraInstance) -> Result<(), BackendError> {
        let mut live = self
            .instances
            .remove(instance)
            .ok_or(BackendError::InvalidHandle)?;
        if let Some(handle) = live.handle.as_mut() {
            handle.stop(tween(Duration::ZERO));
        }
        Ok(())
    }

    fn start(&mut self, instance: &KiraInstance) -> Result<(), BackendError> {
        let ctx = MixContext {
            master_volume: self.master_volume,
            listener: &self.listeners[0],
            globals: &self.globals,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
        };
        let live = self
            .instances
            .get_mut(instance)
            .ok_or(BackendError::InvalidHandle)?;
        if let Some(previous) = live.handle.as_mut() {
            previous.stop(tween(Duration::ZERO));
        }

        let levels = mix(&ctx, &live.event.manifest, &live.parameters, &live.attributes);
        let settings = start_settings(&live.event.manifest, &levels);
        let data = live.event.sound.clone().with_settings(settings);
        let handle = self
            .manager
            .play(data)
            .map_err(|e| BackendError::PlaybackFailed(e.to_string()))?;
        live.handle = Some(handle);
        Ok(())
    }

    fn stop(&mut self, instance: &KiraInstance, mode: StopMode) -> Result<(), BackendError> {
        let live = self
            .instances
            .get_mut(instance)
            .ok_or(BackendError::InvalidHandle)?;
        let fade = stop_fade(&live.event.manifest, mode);
        if let Some(handle) = live.handle.as_mut() {
            handle.stop(tween(fade));
        }
        Ok(())
    }

    fn playback_state(&self, instance: &KiraInstance) -> Result<PlaybackState, BackendError> {
        let live = self.live(instance)?;
        Ok(playback_state_of(live.handle.as_ref().map(|h| h.state())))
    }

    fn set_parameter(
        &mut self,
        instance: &KiraInstance,
        name: &str,
        value: f32,
        ignore_seek_speed: bool,
    ) -> Result<(), BackendError> {
        let live = self
            .instances
            .get_mut(instance)
            .ok_or(BackendError::InvalidHandle)?;
        parameter::find_mut(&mut live.parameters, name)
            .ok_or_else(|| BackendError::ParameterNotFound(name.to_string()))?
            .set(value, ignore_seek_speed);
        Ok(())
    }

    fn parameter(&self, instance: &KiraInstance, name: &str) -> Result<f32, BackendError> {
        self.live(instance)?
            .parameters
            .iter()
            .find(|p| p.name() == name)
            .map(ParameterState::value)
            .ok_or_else(|| BackendError::ParameterNotFound(name.to_string()))
    }

    fn set_global_parameter(
        &mut self,
        name: &str,
        value: f32,
        ignore_seek_speed: bool,
    ) -> Result<(), BackendError> {
        parameter::find_mut(&mut self.globals, name)
            .ok_or_else(|| BackendError::ParameterNotFound(name.to_string()))?
            .set(value, ignore_seek_speed);
        Ok(())
    }

    fn global_parameter(&self, name: &str) -> Result<f32, BackendError> {
        self.globals
            .iter()
            .find(|p| p.name() == name)
            .map(ParameterState::value)
            .ok_or_else(|| BackendError::ParameterNotFound(name.to_string()))
    }

    fn set_instance_attributes(
        &mut self,
        instance: &KiraInstance,
        attributes: &Attributes3d,
    ) -> Result<(), BackendError> {
        let live = self
            .instances
            .get_mut(instance)
            .ok_or(BackendError::InvalidHandle)?;
        live.attributes = *attributes;
        Ok(())
    }

    fn set_listener_attributes(
        &mut self,
        listener: usize,
        attributes: &Attributes3d,
    ) -> Result<(), BackendError> {
        let slot = self
            .listeners
            .get_mut(listener)
            .ok_or(BackendError::InvalidHandle)?;
        *slot = *attributes;
        Ok(())
    }

    fn release(&mut self) -> Result<(), BackendError> {
        for live in self.instances.values_mut() {
            if let Some(handle) = live.handle.as_mut() {
                handle.stop(tween(Duration::ZERO));
            }
        }
        self.instances.clear();
        self.banks.clear();
        self.globals.clear();
        info!("kira audio backend released");
        Ok(())
    }
}
