use crate::bank::{ParameterManifest, ParameterTarget};

/// Runtime state of one parameter: the value last set and the value currently
/// applied, which chases the set value at the authored seek speed.
#[derive(Debug, Clone)]
pub(crate) struct ParameterState {
    manifest: ParameterManifest,
    value: f32,
    applied: f32,
}

impl ParameterState {
    pub fn new(manifest: ParameterManifest) -> Self {
        let start = manifest.default.clamp(manifest.min, manifest.max);
        Self {
            manifest,
            value: start,
            applied: start,
        }
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn target(&self) -> ParameterTarget {
        self.manifest.target
    }

    /// The value last set, clamped to the authored range.
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn applied(&self) -> f32 {
        self.applied
    }

    pub fn set(&mut self, value: f32, ignore_seek_speed: bool) {
        self.value = value.clamp(self.manifest.min, self.manifest.max);
        if ignore_seek_speed || self.manifest.seek_speed <= 0.0 {
            self.applied = self.value;
        }
    }

    /// Move the applied value toward the set value by at most `seek_speed * dt`.
    pub fn advance(&mut self, dt: f32) {
        if self.manifest.seek_speed <= 0.0 {
            self.applied = self.value;
            return;
        }
        let step = self.manifest.seek_speed * dt.max(0.0);
        let gap = self.value - self.applied;
        if gap.abs() <= step {
            self.applied = self.value;
        } else {
            self.applied += step.copysign(gap);
        }
    }

    /// Applied value mapped from `[min, max]` onto `[from, to]`.
    pub fn mapped(&self) -> f32 {
        let span = self.manifest.max - self.manifest.min;
        let t = if span > f32::EPSILON {
            (self.applied() - self.manifest.min) / span
        } else {
            0.0
        };
        self.manifest.from + (self.manifest.to - self.manifest.from) * t
    }
}

/// Look up a parameter by name.
pub(crate) fn find_mut<'a>(
    params: &'a mut [ParameterState],
    name: &str,
) -> Option<&'a mut ParameterState> {
    params.iter_mut().find(|p| p.name() == name)
}

/// Aggregate effect of a set of parameters on an instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Modulation {
    pub volume: f32,
    pub pitch: f32,
    pub pan: f32,
}

impl Default for Modulation {
    fn default() -> Self {
        Self {
            volume: 1.0,
            pitch: 1.0,
            pan: 0.0,
        }
    }
}

impl Modulation {
    pub fn accumulate<'a>(mut self, params: impl IntoIterator<Item = &'a ParameterState>) -> Self {
        for param in params {
            match param.target() {
                ParameterTarget::None => {}
                ParameterTarget::Volume => self.volume *= param.mapped(),
                ParameterTarget::Pitch => self.pitch *= param.mapped(),
                ParameterTarget::Pan => self.pan += param.mapped(),
            }
        }
        self
    }
}
