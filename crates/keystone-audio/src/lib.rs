//! Keystone Audio - Event-based audio facade
//!
//! Authored events are packaged into banks, instantiated by name, and controlled
//! through borrowed handles. The middleware sits behind [`AudioBackend`]; the
//! default backend plays banks through kira.

mod backend;
mod bank;
mod config;
mod engine;
mod error;
mod event;
mod kira_backend;
mod listener;
mod parameter;
mod registry;
mod spatial;
mod units;

#[cfg(test)]
mod testing;

pub use backend::{AudioBackend, PlaybackState, StopMode};
pub use bank::{BankManifest, EventManifest, ParameterManifest, ParameterTarget};
pub use config::AudioConfig;
pub use engine::{AudioEngine, BANK_EXTENSION, LISTENER_INDEX};
pub use error::{AudioError, BackendError};
pub use event::PlayableEvent;
pub use kira_backend::{KiraBackend, KiraBank, KiraEvent, KiraInstance};
pub use listener::Listener;
pub use registry::EventHandle;
pub use spatial::{compute_spatial, SpatialParams};
pub use units::{db_to_volume, vector_to_audio, volume_to_db, Attributes3d, AudioVector};
