//! Frame timing for the sample game loop.

use serde::{Deserialize, Serialize};

/// Configuration for the frame clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Scale applied to every frame delta (0.0 = frozen, 1.0 = real time)
    pub time_scale: f32,
    /// Largest delta handed to the simulation in one frame, in seconds
    pub max_delta: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta: 0.25,
        }
    }
}

/// Tracks elapsed time and the delta to feed into per-frame updates.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    pub config: ClockConfig,
    /// Scaled seconds since the clock started
    pub elapsed: f64,
    /// Scaled, clamped delta for the current frame
    pub delta: f32,
    /// Number of ticks so far
    pub frame: u64,
    pub paused: bool,
}

impl FrameClock {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Advance by the raw wall-clock delta of the previous frame and return the
    /// delta the simulation should use.
    pub fn tick(&mut self, raw_delta: f32) -> f32 {
        self.frame += 1;
        if self.paused {
            self.delta = 0.0;
            return 0.0;
        }
        self.delta = raw_delta.clamp(0.0, self.config.max_delta) * self.config.time_scale;
        self.elapsed += self.delta as f64;
        self.delta
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }
}
