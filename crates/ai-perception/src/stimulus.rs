use ai_core::{AgentId, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StimulusKind {
    Visible,
    Sound,
}

/// World-unique stimulus handle. Facts keep it as a weak back-reference: the stimulus may be
/// gone by the time the fact is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StimulusId(pub u64);

/// Transient observation emitted by the world for one tick. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Stimulus<A: AgentId> {
    pub id: StimulusId,
    pub kind: StimulusKind,
    pub source: A,
    pub position: Vec3,
    /// Visibility coefficient for `Visible`, loudness for `Sound`.
    pub intensity: f32,
    /// Emission radius. Only sounds are limited by it.
    pub radius: f32,
}

impl<A: AgentId> Stimulus<A> {
    pub fn visible(id: StimulusId, source: A, position: Vec3) -> Self {
        Self {
            id,
            kind: StimulusKind::Visible,
            source,
            position,
            intensity: 1.0,
            radius: f32::INFINITY,
        }
    }

    pub fn sound(id: StimulusId, source: A, position: Vec3, intensity: f32, radius: f32) -> Self {
        Self {
            id,
            kind: StimulusKind::Sound,
            source,
            position,
            intensity: intensity.max(0.0),
            radius,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity.max(0.0);
        self
    }
}
