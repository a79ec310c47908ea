use ai_core::{StrId, Vec3, WorldView};

use crate::Stimulus;

/// Position and view direction of an actor's scene anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

/// Read-only scene queries needed by sensors and perceptors.
pub trait PerceptionWorld: WorldView {
    /// `None` when the actor has no scene anchor; the actor then senses nothing this tick.
    fn pose(&self, agent: Self::Agent) -> Option<Pose>;

    /// Stimuli alive this tick.
    fn stimuli(&self) -> &[Stimulus<Self::Agent>];

    fn obstacle_radius(&self, _entity: Self::Agent) -> Option<f32> {
        None
    }

    /// Whether `source` supervises `agent`.
    fn oversees(&self, _source: Self::Agent, _agent: Self::Agent) -> bool {
        false
    }

    fn smart_object_type(&self, _entity: Self::Agent) -> Option<StrId> {
        None
    }
}
