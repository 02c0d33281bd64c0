//! Keystone - Headless sample driving the audio facade and the skeletal animator
//!
//! Runs the classic init / update / render / shutdown game loop.

mod game;
mod settings;

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::game::Game;
use crate::settings::GameSettings;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Keystone sample...");

    let settings = GameSettings::load();
    let mut game = Game::init(settings)?;

    let frame_time = Duration::from_secs_f64(1.0 / game.frame_rate() as f64);
    let mut last = Instant::now();
    for _ in 0..game.frames() {
        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32();
        last = now;

        game.update(delta)?;
        game.render();

        let spent = now.elapsed();
        if spent < frame_time {
            thread::sleep(frame_time - spent);
        }
    }

    game.shutdown()
}
