//! The sample game: one audio event orbiting the listener and one animated arm.

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use keystone_anim::{
    animate, AnimatorComponent, JointChannel, Joint, Keyframe, SkeletalAnim, Skeleton,
    SkinnedMeshRenderer,
};
use keystone_audio::{AudioEngine, AudioError};
use keystone_core::{FrameClock, Transform};
use keystone_scene::{Entity, World};
use tracing::{debug, info, warn};

use crate::settings::GameSettings;

pub struct Game {
    settings: GameSettings,
    audio: Option<AudioEngine>,
    world: World,
    clock: FrameClock,
    arm: Entity,
}

impl Game {
    /// Called before the first update.
    pub fn init(settings: GameSettings) -> Result<Self> {
        let audio = match start_audio(&settings) {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!("Audio unavailable, continuing without sound: {e}");
                None
            }
        };

        let mut world = World::new();
        let arm = world.spawn();
        world.insert(arm, SkinnedMeshRenderer::new(arm_skeleton()?));

        let anim = match &settings.animation.clip {
            Some(path) => SkeletalAnim::load(path)
                .with_context(|| format!("Failed to load animation {}", path.display()))?,
            None => wave(),
        };
        let mut animator = AnimatorComponent::new(&world, arm, Arc::new(anim))?;
        animator.set_looping(settings.animation.looping);
        animator.set_speed_multiplier(settings.animation.speed);
        world.insert(arm, animator);

        Ok(Self {
            clock: FrameClock::new(settings.clock.clone()),
            settings,
            audio,
            world,
            arm,
        })
    }

    /// Called once per frame with the wall-clock time since the last frame.
    pub fn update(&mut self, raw_delta: f32) -> Result<()> {
        let dt = self.clock.tick(raw_delta);

        if let Some(audio) = self.audio.as_mut() {
            let demo = &self.settings.demo;
            let angle = self.clock.elapsed as f32;
            let orbit = Vec3::new(angle.cos(), 0.0, angle.sin()) * demo.orbit_radius;
            audio.get_event(&demo.event_name)?.set_position(orbit)?;
            audio.update()?;
        }

        animate(&mut self.world, dt);
        Ok(())
    }

    /// Headless: report what would be drawn.
    pub fn render(&self) {
        if self.clock.frame % 60 != 0 {
            return;
        }
        if let Some(renderer) = self.world.get::<SkinnedMeshRenderer>(self.arm) {
            let tip = renderer
                .skeleton()
                .joints()
                .last()
                .map(|j| j.world.transform_point3(Vec3::ZERO))
                .unwrap_or_default();
            debug!("frame {}: arm tip at {tip}", self.clock.frame);
        }
    }

    pub fn frame_rate(&self) -> u32 {
        self.settings.demo.frame_rate.max(1)
    }

    pub fn frames(&self) -> u64 {
        self.settings.demo.frames
    }

    /// Release audio resources. Must run before exit.
    pub fn shutdown(self) -> Result<()> {
        if let Some(audio) = self.audio {
            audio.shutdown().context("Audio shutdown failed")?;
        }
        info!("Ran {} frames ({:.2}s)", self.clock.frame, self.clock.elapsed);
        Ok(())
    }
}

fn start_audio(settings: &GameSettings) -> Result<AudioEngine, AudioError> {
    let demo = &settings.demo;
    let mut audio = AudioEngine::init(settings.audio.clone())?;
    audio.load_bank(&demo.bank)?;
    let mut event = audio.create_event(&demo.event_name, &demo.event_id)?;
    event.play()?;
    event.set_parameter(&demo.parameter, demo.parameter_value, false)?;
    Ok(audio)
}

fn arm_skeleton() -> Result<Skeleton> {
    let joints = vec![
        Joint::new("shoulder", None, Transform::from_translation(Vec3::Y)),
        Joint::new("elbow", Some(0), Transform::from_translation(Vec3::X)),
        Joint::new("wrist", Some(1), Transform::from_translation(Vec3::X)),
    ];
    Ok(Skeleton::new(joints)?)
}

/// Two-second wave: the elbow swings up and back down.
fn wave() -> SkeletalAnim {
    let swing = Quat::from_rotation_z(std::f32::consts::FRAC_PI_3);
    SkeletalAnim {
        name: "wave".into(),
        duration: 2.0,
        channels: vec![JointChannel {
            joint: "elbow".into(),
            rotation: vec![
                Keyframe { time: 0.0, value: Quat::IDENTITY },
                Keyframe { time: 1.0, value: swing },
                Keyframe { time: 2.0, value: Quat::IDENTITY },
            ],
            ..Default::default()
        }],
    }
}
