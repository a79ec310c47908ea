use ai_core::TickContext;

use crate::{FactData, FactKind, MemorySystem, Observation, PerceptionWorld, Stimulus, StimulusKind};

/// Interprets detected stimuli as memory facts of one kind.
pub trait Perceptor<W>: 'static
where
    W: PerceptionWorld,
{
    fn fact_kind(&self) -> FactKind;

    fn accepts_stimulus_kind(&self, kind: StimulusKind) -> bool;

    /// Kind-specific data for the stimulus source, or `None` if the source is not of interest
    /// to this perceptor.
    fn fact_data(&self, agent: W::Agent, world: &W, stimulus: &Stimulus<W::Agent>)
        -> Option<FactData>;

    /// Creates or refreshes the fact for `stimulus`. Returns `true` if the stimulus was used.
    fn process_stimulus(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        memory: &mut MemorySystem<W::Agent>,
        stimulus: &Stimulus<W::Agent>,
        confidence: f32,
    ) -> bool {
        if !self.accepts_stimulus_kind(stimulus.kind) {
            return false;
        }
        let Some(data) = self.fact_data(agent, world, stimulus) else {
            return false;
        };
        memory.observe(
            ctx.time_seconds,
            Observation {
                kind: self.fact_kind(),
                source: stimulus.source,
                stimulus: Some(stimulus.id),
                position: stimulus.position,
                confidence,
                data,
            },
        );
        true
    }

    fn debug_string(&self) -> String {
        format!("{}Perceptor", self.fact_kind().name())
    }
}

/// Remembers visible sources the world reports as obstacles, with their radius.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObstaclePerceptor;

impl<W: PerceptionWorld> Perceptor<W> for ObstaclePerceptor {
    fn fact_kind(&self) -> FactKind {
        FactKind::Obstacle
    }

    fn accepts_stimulus_kind(&self, kind: StimulusKind) -> bool {
        kind == StimulusKind::Visible
    }

    fn fact_data(&self, _agent: W::Agent, world: &W, stimulus: &Stimulus<W::Agent>) -> Option<FactData> {
        world
            .obstacle_radius(stimulus.source)
            .map(|radius| FactData::Obstacle { radius })
    }
}

/// Remembers visible sources that supervise the perceiving actor.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverseerPerceptor;

impl<W: PerceptionWorld> Perceptor<W> for OverseerPerceptor {
    fn fact_kind(&self) -> FactKind {
        FactKind::Overseer
    }

    fn accepts_stimulus_kind(&self, kind: StimulusKind) -> bool {
        kind == StimulusKind::Visible
    }

    fn fact_data(&self, agent: W::Agent, world: &W, stimulus: &Stimulus<W::Agent>) -> Option<FactData> {
        world
            .oversees(stimulus.source, agent)
            .then_some(FactData::None)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SmartObjectPerceptor;

impl<W: PerceptionWorld> Perceptor<W> for SmartObjectPerceptor {
    fn fact_kind(&self) -> FactKind {
        FactKind::SmartObject
    }

    fn accepts_stimulus_kind(&self, kind: StimulusKind) -> bool {
        kind == StimulusKind::Visible
    }

    fn fact_data(&self, _agent: W::Agent, world: &W, stimulus: &Stimulus<W::Agent>) -> Option<FactData> {
        world
            .smart_object_type(stimulus.source)
            .map(|object_type| FactData::SmartObject { object_type })
    }
}

/// Remembers every visible source.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisiblePerceptor;

impl<W: PerceptionWorld> Perceptor<W> for VisiblePerceptor {
    fn fact_kind(&self) -> FactKind {
        FactKind::Visible
    }

    fn accepts_stimulus_kind(&self, kind: StimulusKind) -> bool {
        kind == StimulusKind::Visible
    }

    fn fact_data(&self, _agent: W::Agent, _world: &W, _stimulus: &Stimulus<W::Agent>) -> Option<FactData> {
        Some(FactData::None)
    }
}

/// Remembers every heard source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoisePerceptor;

impl<W: PerceptionWorld> Perceptor<W> for NoisePerceptor {
    fn fact_kind(&self) -> FactKind {
        FactKind::Noise
    }

    fn accepts_stimulus_kind(&self, kind: StimulusKind) -> bool {
        kind == StimulusKind::Sound
    }

    fn fact_data(&self, _agent: W::Agent, _world: &W, _stimulus: &Stimulus<W::Agent>) -> Option<FactData> {
        Some(FactData::None)
    }
}
