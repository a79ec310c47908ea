use ai_core::{AgentId, Vec3};
use serde::{Deserialize, Serialize};

use crate::{FactKind, MemoryFact, Pose, Stimulus, StimulusKind};

/// Turns stimuli into detection confidences for one actor.
pub trait Sensor<A: AgentId>: 'static {
    fn accepts_stimulus_kind(&self, kind: StimulusKind) -> bool;

    /// Detection confidence in `[0, 1]`; `0` means not detected.
    fn detect(&self, pose: &Pose, stimulus: &Stimulus<A>) -> f32;

    /// Appends `(index into stimuli, confidence)` for every detected stimulus not emitted by
    /// `agent` itself.
    fn sense(&self, agent: A, pose: &Pose, stimuli: &[Stimulus<A>], out: &mut Vec<(usize, f32)>) {
        for (idx, stimulus) in stimuli.iter().enumerate() {
            if stimulus.source == agent || !self.accepts_stimulus_kind(stimulus.kind) {
                continue;
            }
            let confidence = self.detect(pose, stimulus);
            if confidence > 0.0 {
                out.push((idx, confidence));
            }
        }
    }

    fn validates_fact_kind(&self, _kind: FactKind) -> bool {
        false
    }

    /// How confidently this sensor would currently perceive the fact's last known position.
    fn validate_fact(&self, _pose: &Pose, _fact: &MemoryFact<A>) -> f32 {
        0.0
    }

    fn debug_string(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SightConfig {
    pub perfect_range: f32,
    pub max_range: f32,
    pub perfect_fov_degrees: f32,
    pub max_fov_degrees: f32,
}

impl Default for SightConfig {
    fn default() -> Self {
        Self {
            perfect_range: 5.0,
            max_range: 20.0,
            perfect_fov_degrees: 60.0,
            max_fov_degrees: 120.0,
        }
    }
}

impl SightConfig {
    pub fn new(max_range: f32, max_fov_degrees: f32) -> Self {
        Self {
            perfect_range: max_range,
            max_range,
            perfect_fov_degrees: max_fov_degrees,
            max_fov_degrees,
        }
    }

    pub fn with_perfect(mut self, range: f32, fov_degrees: f32) -> Self {
        self.perfect_range = range;
        self.perfect_fov_degrees = fov_degrees;
        self
    }
}

/// Two nested view cones.
///
/// Inside the perfect cone the falloff is 1. Between the cones it is the smaller of a radial
/// term (linear in squared distance) and an angular term (linear in the cosine of the view
/// angle). Cone membership is tested on squared quantities only.
#[derive(Debug, Clone)]
pub struct VisionSensor {
    config: SightConfig,
    perfect_r2: f32,
    max_r2: f32,
    perfect_cos: f32,
    max_cos: f32,
}

impl VisionSensor {
    pub fn new(config: SightConfig) -> Self {
        let max_range = config.max_range.max(0.0);
        let perfect_range = config.perfect_range.clamp(0.0, max_range);
        let max_half = (config.max_fov_degrees.clamp(0.0, 360.0) * 0.5).to_radians();
        let perfect_half = (config.perfect_fov_degrees.clamp(0.0, 360.0) * 0.5)
            .to_radians()
            .min(max_half);
        Self {
            config,
            perfect_r2: perfect_range * perfect_range,
            max_r2: max_range * max_range,
            perfect_cos: perfect_half.cos(),
            max_cos: max_half.cos(),
        }
    }

    pub fn config(&self) -> &SightConfig {
        &self.config
    }

    /// Falloff in `[0, 1]` of a point relative to `pose`.
    pub fn falloff(&self, pose: &Pose, point: Vec3) -> f32 {
        let to = point - pose.position;
        let d2 = to.length_squared();
        if d2 > self.max_r2 {
            return 0.0;
        }
        if d2 <= f32::EPSILON {
            return 1.0;
        }

        let forward = pose.forward.try_normalize().unwrap_or(Vec3::FORWARD);
        let dot = forward.dot(to);
        if !inside_cone(dot, d2, self.max_cos) || (self.max_cos >= 1.0 - f32::EPSILON) {
            return 0.0;
        }

        let in_perfect_range = d2 <= self.perfect_r2;
        let in_perfect_angle = inside_cone(dot, d2, self.perfect_cos);
        if in_perfect_range && in_perfect_angle {
            return 1.0;
        }

        let radial = if in_perfect_range {
            1.0
        } else {
            (self.max_r2 - d2) / (self.max_r2 - self.perfect_r2)
        };
        let angular = if in_perfect_angle {
            1.0
        } else {
            let cos = dot / d2.sqrt();
            (cos - self.max_cos) / (self.perfect_cos - self.max_cos)
        };
        radial.min(angular).clamp(0.0, 1.0)
    }
}

/// `angle(dir, forward) <= half` for a cone with `cos_half = cos(half)`, without `sqrt`.
fn inside_cone(dot: f32, d2: f32, cos_half: f32) -> bool {
    let threshold = cos_half * cos_half * d2;
    if cos_half >= 0.0 {
        dot >= 0.0 && dot * dot >= threshold
    } else {
        dot >= 0.0 || dot * dot <= threshold
    }
}

impl<A: AgentId> Sensor<A> for VisionSensor {
    fn accepts_stimulus_kind(&self, kind: StimulusKind) -> bool {
        kind == StimulusKind::Visible
    }

    fn detect(&self, pose: &Pose, stimulus: &Stimulus<A>) -> f32 {
        (self.falloff(pose, stimulus.position) * stimulus.intensity).clamp(0.0, 1.0)
    }

    fn validates_fact_kind(&self, kind: FactKind) -> bool {
        kind != FactKind::Noise
    }

    fn validate_fact(&self, pose: &Pose, fact: &MemoryFact<A>) -> f32 {
        self.falloff(pose, fact.position)
    }

    fn debug_string(&self) -> String {
        format!(
            "Vision(range={}/{}, fov={}/{})",
            self.config.perfect_range,
            self.config.max_range,
            self.config.perfect_fov_degrees,
            self.config.max_fov_degrees
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HearingConfig {
    pub radius: f32,
}

impl Default for HearingConfig {
    fn default() -> Self {
        Self { radius: 15.0 }
    }
}

impl HearingConfig {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

/// Hears sounds within the smaller of its own radius and the sound's radius.
#[derive(Debug, Clone)]
pub struct SoundSensor {
    config: HearingConfig,
}

impl SoundSensor {
    pub fn new(config: HearingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HearingConfig {
        &self.config
    }
}

impl<A: AgentId> Sensor<A> for SoundSensor {
    fn accepts_stimulus_kind(&self, kind: StimulusKind) -> bool {
        kind == StimulusKind::Sound
    }

    fn detect(&self, pose: &Pose, stimulus: &Stimulus<A>) -> f32 {
        let r = self.config.radius.min(stimulus.radius);
        if r <= 0.0 {
            return 0.0;
        }
        let r2 = r * r;
        let d2 = pose.position.distance_squared(stimulus.position);
        if d2 > r2 {
            return 0.0;
        }
        (stimulus.intensity * (1.0 - d2 / r2)).clamp(0.0, 1.0)
    }

    fn debug_string(&self) -> String {
        format!("Sound(radius={})", self.config.radius)
    }
}
